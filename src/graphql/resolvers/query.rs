use crate::catalog::{engine, page_window, FilteredPage};
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{Master, Monster, MonsterFilter, MonsterPage};
use crate::masters::MasterType;
use async_graphql::{Context, FieldResult, Object, ID};

/// Root query object for GraphQL
pub struct Query;

#[Object]
impl Query {
    /// Get a monster by ID
    async fn monster(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Monster>> {
        let context = ctx.data::<GraphQLContext>()?;
        let monster_id: u64 = id.parse()?;

        Ok(context
            .catalog
            .get(monster_id)
            .map(|entry| entry.clone().into()))
    }

    /// Filter and page the catalog
    async fn monsters(
        &self,
        ctx: &Context<'_>,
        filter: Option<MonsterFilter>,
        page: Option<i32>,
        size: Option<i32>,
    ) -> FieldResult<MonsterPage> {
        let context = ctx.data::<GraphQLContext>()?;
        let request = filter
            .unwrap_or_default()
            .into_request(page, size, context.max_page_size)?;
        let state = &request.state;

        if request.unsatisfiable {
            return Ok(FilteredPage::<Monster>::empty(state.page(), state.page_size().get()).into());
        }

        let result = engine::query_by(context.catalog.entries(), state, |e| &e.record)
            .map(|entry| Monster::from(entry.clone()));
        Ok(result.into())
    }

    /// Rows of a master table (`attribute`, `tribe`, `battleType`, ...)
    async fn masters(&self, ctx: &Context<'_>, master_type: String) -> FieldResult<Vec<Master>> {
        let context = ctx.data::<GraphQLContext>()?;
        let master: MasterType = master_type.parse()?;

        Ok(context
            .masters
            .entries(master)
            .iter()
            .map(Master::from)
            .collect())
    }

    /// Page buttons for one-based `current` of `total_pages`
    async fn page_window(&self, current: i32, total_pages: i32) -> Vec<String> {
        let current = usize::try_from(current).unwrap_or(1).max(1);
        let total_pages = usize::try_from(total_pages).unwrap_or(1);
        page_window(current, total_pages)
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
