use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use serde::Serialize;

use crate::domain::{Element, Partition};

/// A single-valued filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Element,
    Race,
    BattleType,
    Rarity,
    EvolutionStage,
    FriendshipCombo,
    Series,
}

/// An active selection on one [`Dimension`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Element(Element),
    Race(String),
    BattleType(String),
    Rarity(u8),
    EvolutionStage(String),
    FriendshipCombo(String),
    Series(String),
}

impl Selection {
    pub fn dimension(&self) -> Dimension {
        match self {
            Selection::Element(_) => Dimension::Element,
            Selection::Race(_) => Dimension::Race,
            Selection::BattleType(_) => Dimension::BattleType,
            Selection::Rarity(_) => Dimension::Rarity,
            Selection::EvolutionStage(_) => Dimension::EvolutionStage,
            Selection::FriendshipCombo(_) => Dimension::FriendshipCombo,
            Selection::Series(_) => Dimension::Series,
        }
    }
}

/// Zero or one selection per single-valued dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilters {
    pub element: Option<Element>,
    pub race: Option<String>,
    pub battle_type: Option<String>,
    pub rarity: Option<u8>,
    pub evolution_stage: Option<String>,
    pub friendship_combo: Option<String>,
    pub series: Option<String>,
}

impl CategoryFilters {
    fn apply(&mut self, selection: Selection) {
        match selection {
            Selection::Element(v) => self.element = Some(v),
            Selection::Race(v) => self.race = Some(v),
            Selection::BattleType(v) => self.battle_type = Some(v),
            Selection::Rarity(v) => self.rarity = Some(v),
            Selection::EvolutionStage(v) => self.evolution_stage = Some(v),
            Selection::FriendshipCombo(v) => self.friendship_combo = Some(v),
            Selection::Series(v) => self.series = Some(v),
        }
    }

    fn clear(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Element => self.element = None,
            Dimension::Race => self.race = None,
            Dimension::BattleType => self.battle_type = None,
            Dimension::Rarity => self.rarity = None,
            Dimension::EvolutionStage => self.evolution_stage = None,
            Dimension::FriendshipCombo => self.friendship_combo = None,
            Dimension::Series => self.series = None,
        }
    }

    /// Number of dimensions with an active selection.
    pub fn active_count(&self) -> usize {
        [
            self.element.is_some(),
            self.race.is_some(),
            self.battle_type.is_some(),
            self.rarity.is_some(),
            self.evolution_stage.is_some(),
            self.friendship_combo.is_some(),
            self.series.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// Ephemeral, client-held query over the catalog.
///
/// Built with the consuming `with_*` methods; mutated during interaction
/// through the `&mut self` methods, each of which resets the page index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    text: String,
    filters: CategoryFilters,
    abilities: BTreeSet<String>,
    partition: Partition,
    page: usize,
    page_size: NonZeroUsize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(Partition::All)
    }
}

impl QueryState {
    pub fn new(partition: Partition) -> Self {
        Self {
            text: String::new(),
            filters: CategoryFilters::default(),
            abilities: BTreeSet::new(),
            partition,
            page: 0,
            page_size: partition.page_size(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with(mut self, selection: Selection) -> Self {
        self.filters.apply(selection);
        self
    }

    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.abilities.insert(ability.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Overrides the partition's page size (server-side listings).
    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Trimmed, lower-cased search text; `None` when the query is blank.
    pub fn normalized_text(&self) -> Option<String> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    pub fn filters(&self) -> &CategoryFilters {
        &self.filters
    }

    pub fn abilities(&self) -> &BTreeSet<String> {
        &self.abilities
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.page = 0;
    }

    pub fn select(&mut self, selection: Selection) {
        self.filters.apply(selection);
        self.page = 0;
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.filters.clear(dimension);
        self.page = 0;
    }

    /// Adds the ability when absent, removes it when present.
    pub fn toggle_ability(&mut self, ability: &str) {
        if !self.abilities.remove(ability) {
            self.abilities.insert(ability.to_string());
        }
        self.page = 0;
    }

    pub fn clear_abilities(&mut self) {
        self.abilities.clear();
        self.page = 0;
    }

    /// Drops every filter and the search text; keeps the partition.
    pub fn reset_filters(&mut self) {
        self.text.clear();
        self.filters = CategoryFilters::default();
        self.abilities.clear();
        self.page = 0;
    }

    /// Switches the view partition; page index and page size follow it.
    pub fn set_partition(&mut self, partition: Partition) {
        self.partition = partition;
        self.page_size = partition.page_size();
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// True when no predicate narrows the collection.
    pub fn is_unfiltered(&self) -> bool {
        self.normalized_text().is_none()
            && self.filters.active_count() == 0
            && self.abilities.is_empty()
            && self.partition == Partition::All
    }
}
