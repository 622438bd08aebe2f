//! Query engine: query state, the filter pipeline, pagination controls, and
//! the session that keeps interactive refreshes in order.

pub mod engine;
pub mod pagination;
pub mod params;
pub mod session;
pub mod state;

pub use engine::{query, query_by, FilteredPage};
pub use pagination::{page_window, total_pages, PageMarker, PaginationControls};
pub use params::{validate_paging, ListingRequest};
pub use session::{CatalogSession, RequestSequencer, Ticket};
pub use state::{CategoryFilters, Dimension, QueryState, Selection};
