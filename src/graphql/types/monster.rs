use std::num::NonZeroUsize;

use async_graphql::{InputObject, Object, SimpleObject, ID};

use crate::catalog::params::validate_paging;
use crate::catalog::{FilteredPage, ListingRequest, PaginationControls, QueryState, Selection};
use crate::domain::{Element, Partition};
use crate::error;
use crate::source::CatalogEntry;

/// GraphQL representation of a catalog monster
#[derive(Clone)]
pub struct Monster {
    pub inner: CatalogEntry,
}

impl From<CatalogEntry> for Monster {
    fn from(entry: CatalogEntry) -> Self {
        Self { inner: entry }
    }
}

#[Object]
impl Monster {
    async fn id(&self) -> ID {
        ID(self.inner.record.id.to_string())
    }

    /// Display number in the catalog
    async fn number(&self) -> u32 {
        self.inner.record.number
    }

    async fn name(&self) -> &str {
        &self.inner.record.name
    }

    /// Element in lower-case English (`fire`, `water`, ...)
    async fn element(&self) -> &str {
        self.inner.record.element.as_str()
    }

    async fn rarity(&self) -> i32 {
        i32::from(self.inner.record.rarity)
    }

    async fn race(&self) -> Option<&str> {
        self.inner.record.race.as_deref()
    }

    async fn battle_type(&self) -> Option<&str> {
        self.inner.record.battle_type.as_deref()
    }

    async fn hit_type(&self) -> &str {
        &self.inner.detail.hit_type
    }

    async fn evolution_stage(&self) -> Option<&str> {
        self.inner.record.evolution_stage.as_deref()
    }

    async fn friendship_combo(&self) -> Option<&str> {
        self.inner.record.friendship_combo.as_deref()
    }

    async fn series(&self) -> Option<&str> {
        self.inner.record.series.as_deref()
    }

    async fn abilities(&self) -> Vec<&str> {
        self.inner.record.ability_names.iter().map(String::as_str).collect()
    }

    async fn strike_shot(&self) -> Option<&str> {
        self.inner.detail.strike_shot.name.as_deref()
    }

    async fn owned(&self) -> bool {
        self.inner.record.owned
    }

    /// Path of the icon image, relative to the image root
    async fn icon_path(&self) -> Option<&str> {
        self.inner.detail.images.icon.as_ref().map(|i| i.path.as_str())
    }
}

/// One page of monsters with its pager state
#[derive(SimpleObject)]
pub struct MonsterPage {
    pub items: Vec<Monster>,
    /// Zero-based page index
    pub page: u32,
    pub size: u32,
    pub total: u32,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    /// Page buttons; `...` marks a truncated range
    pub window: Vec<String>,
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

impl From<FilteredPage<Monster>> for MonsterPage {
    fn from(page: FilteredPage<Monster>) -> Self {
        let controls = PaginationControls::derive(page.page, page.total, page.size);
        Self {
            page: to_u32(page.page),
            size: to_u32(page.size),
            total: to_u32(page.total),
            total_pages: to_u32(controls.total_pages),
            has_prev: controls.has_prev,
            has_next: controls.has_next,
            window: controls.window.iter().map(ToString::to_string).collect(),
            items: page.items,
        }
    }
}

/// Filters of the `monsters` query; omitted fields do not narrow the result
#[derive(InputObject, Default)]
pub struct MonsterFilter {
    /// Substring of the name or a skill name, case-insensitive
    pub text: Option<String>,
    /// English name (`fire`) or label (`火`)
    pub element: Option<String>,
    pub rarity: Option<i32>,
    pub race: Option<String>,
    pub battle_type: Option<String>,
    pub evolution_stage: Option<String>,
    pub friendship_combo: Option<String>,
    pub series: Option<String>,
    /// Every listed ability must be present
    pub abilities: Option<Vec<String>>,
    /// `all` or `owned`
    pub partition: Option<String>,
}

impl MonsterFilter {
    /// Builds the request; rejects a negative page and a non-positive size.
    /// A rarity no monster can have makes the request unsatisfiable, as on
    /// the listing endpoint.
    pub fn into_request(
        self,
        page: Option<i32>,
        size: Option<i32>,
        max_size: NonZeroUsize,
    ) -> error::Result<ListingRequest> {
        let (page, size) = validate_paging(page.map(i64::from), size.map(i64::from), max_size)?;

        let partition = match self.partition.as_deref() {
            Some(p) => p.parse()?,
            None => Partition::All,
        };
        let mut state = QueryState::new(partition)
            .with_page(page)
            .with_page_size(size)
            .with_text(self.text.unwrap_or_default());
        let mut unsatisfiable = false;

        if let Some(element) = self.element {
            state = state.with(Selection::Element(element.parse::<Element>()?));
        }
        if let Some(rarity) = self.rarity {
            match u8::try_from(rarity) {
                Ok(rarity) => state = state.with(Selection::Rarity(rarity)),
                Err(_) => unsatisfiable = true,
            }
        }
        let named = [
            self.race.map(Selection::Race),
            self.battle_type.map(Selection::BattleType),
            self.evolution_stage.map(Selection::EvolutionStage),
            self.friendship_combo.map(Selection::FriendshipCombo),
            self.series.map(Selection::Series),
        ];
        for selection in named.into_iter().flatten() {
            state = state.with(selection);
        }
        for ability in self.abilities.unwrap_or_default() {
            state = state.with_ability(ability);
        }
        Ok(ListingRequest {
            state,
            include_images: false,
            unsatisfiable,
        })
    }
}
