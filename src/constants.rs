//! Paging and catalog constants shared by the engine, the server, and the CLI.

/// Page size of the "all monsters" view.
pub const ALL_PAGE_SIZE: usize = 300;

/// Page size of the "owned monsters" view.
pub const OWNED_PAGE_SIZE: usize = 60;

/// Maximum number of numeric page buttons in a pagination window.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Listing endpoint defaults (`GET /monster/select/all`).
pub const API_DEFAULT_PAGE_SIZE: i64 = 20;
pub const API_MAX_PAGE_SIZE: usize = 100;

/// Number of monsters in the generated mock catalog.
pub const MOCK_MONSTER_COUNT: usize = 9000;

/// Remote endpoint paths
pub const SELECT_ALL_PATH: &str = "/monster/select/all";
pub const SELECT_BY_ID_PATH: &str = "/monster/select";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PORT: u16 = 8080;
