use crate::graphql::resolvers::Query;
use crate::masters::MasterRegistry;
use crate::source::InMemorySource;
use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// GraphQL context containing shared application state
pub struct GraphQLContext {
    pub catalog: Arc<InMemorySource>,
    pub masters: Arc<MasterRegistry>,
    pub max_page_size: NonZeroUsize,
}

/// The complete GraphQL schema
pub type GraphQLSchema = Schema<Query, EmptyMutation, EmptySubscription>;

/// Create a new GraphQL schema over the loaded catalog
pub fn create_schema(
    catalog: Arc<InMemorySource>,
    masters: Arc<MasterRegistry>,
    max_page_size: NonZeroUsize,
) -> GraphQLSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(GraphQLContext {
            catalog,
            masters,
            max_page_size,
        })
        .finish()
}
