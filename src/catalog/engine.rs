use std::collections::BTreeSet;

use serde::Serialize;

use super::pagination::total_pages;
use super::state::{CategoryFilters, QueryState};
use crate::domain::{MonsterRecord, Partition};

/// One page of matching records plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

impl<T> FilteredPage<T> {
    pub fn empty(page: usize, size: usize) -> Self {
        Self {
            items: Vec::new(),
            page,
            size,
            total: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.size)
    }

    /// True when the requested page starts at or beyond the last match.
    pub fn is_past_end(&self) -> bool {
        self.page.saturating_mul(self.size) >= self.total
    }

    /// One-based inclusive range of the items shown, `None` for an empty page.
    pub fn display_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let start = self.page * self.size;
        Some((start + 1, start + self.items.len()))
    }

    pub fn map<U, F>(self, f: F) -> FilteredPage<U>
    where
        F: FnMut(T) -> U,
    {
        FilteredPage {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

fn contains_normalized(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Stage 1: the needle (already normalized) appears in the name or a skill field.
pub fn matches_text(record: &MonsterRecord, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    contains_normalized(&record.name, needle)
        || record
            .skill_names
            .iter()
            .any(|skill| contains_normalized(skill, needle))
}

fn exact<T: PartialEq + ?Sized>(selected: Option<&T>, actual: Option<&T>) -> bool {
    match selected {
        None => true,
        Some(wanted) => actual == Some(wanted),
    }
}

/// Stage 2: every active single-valued selection matches exactly.
pub fn matches_categories(record: &MonsterRecord, filters: &CategoryFilters) -> bool {
    exact(filters.element.as_ref(), Some(&record.element))
        && exact(filters.rarity.as_ref(), Some(&record.rarity))
        && exact(filters.race.as_deref(), record.race.as_deref())
        && exact(filters.battle_type.as_deref(), record.battle_type.as_deref())
        && exact(filters.evolution_stage.as_deref(), record.evolution_stage.as_deref())
        && exact(filters.friendship_combo.as_deref(), record.friendship_combo.as_deref())
        && exact(filters.series.as_deref(), record.series.as_deref())
}

/// Stage 3: the record carries every selected ability.
pub fn matches_abilities(record: &MonsterRecord, selected: &BTreeSet<String>) -> bool {
    selected.is_subset(&record.ability_names)
}

/// Stage 4: the owned partition keeps owned records only.
pub fn matches_partition(record: &MonsterRecord, partition: Partition) -> bool {
    match partition {
        Partition::All => true,
        Partition::Owned => record.owned,
    }
}

/// Whether `record` survives every predicate stage of `state`.
pub fn matches(record: &MonsterRecord, state: &QueryState, needle: Option<&str>) -> bool {
    matches_text(record, needle)
        && matches_categories(record, state.filters())
        && matches_abilities(record, state.abilities())
        && matches_partition(record, state.partition())
}

/// Filters and pages any collection whose elements expose a [`MonsterRecord`].
///
/// Items keep their relative order from `collection`.
pub fn query_by<'a, T, F>(collection: &'a [T], state: &QueryState, record: F) -> FilteredPage<&'a T>
where
    F: Fn(&T) -> &MonsterRecord,
{
    let needle = state.normalized_text();
    let size = state.page_size().get();
    let start = state.page().saturating_mul(size);
    let end = start.saturating_add(size);

    let mut total = 0;
    let mut items = Vec::new();
    for item in collection {
        if !matches(record(item), state, needle.as_deref()) {
            continue;
        }
        if total >= start && total < end {
            items.push(item);
        }
        total += 1;
    }

    FilteredPage {
        items,
        page: state.page(),
        size,
        total,
    }
}

/// Runs `state` against `collection` and returns the requested page.
///
/// A page past the last match is a valid, empty result.
pub fn query(collection: &[MonsterRecord], state: &QueryState) -> FilteredPage<MonsterRecord> {
    query_by(collection, state, |r| r).map(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::state::Selection;
    use crate::domain::Element;
    use std::num::NonZeroUsize;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn ten_with_three_fire() -> Vec<MonsterRecord> {
        (1..=10)
            .map(|i| {
                let element = if i % 3 == 0 { Element::Fire } else { Element::Water };
                MonsterRecord::new(i, i as u32, format!("モンスター{i}"), element, 5)
            })
            .collect()
    }

    #[test]
    fn test_element_filter_scenario() {
        let collection = ten_with_three_fire();
        let state = QueryState::default().with(Selection::Element(Element::Fire));
        assert_eq!(state.page_size().get(), 300);

        let page = query(&collection, &state);
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.page, 0);
        let ids: Vec<u64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 6, 9]);
    }

    #[test]
    fn test_past_last_page_is_empty() {
        let collection: Vec<MonsterRecord> = (1..=15)
            .map(|i| MonsterRecord::new(i, i as u32, format!("m{i}"), Element::Wood, 4))
            .collect();
        let state = QueryState::default().with_page_size(size(20)).with_page(1);

        let page = query(&collection, &state);
        assert_eq!(page.total, 15);
        assert!(page.items.is_empty());
        assert!(page.is_past_end());
        assert_eq!(page.display_range(), None);
    }

    #[test]
    fn test_text_query_matches_kanji_substring() {
        let collection = vec![
            MonsterRecord::new(1, 1, "水龍", Element::Water, 5),
            MonsterRecord::new(2, 2, "雷獣", Element::Thunder, 5),
        ];
        let state = QueryState::default().with_text("龍");

        let page = query(&collection, &state);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "水龍");
    }

    #[test]
    fn test_text_query_is_case_insensitive_and_searches_skills() {
        let collection = vec![
            MonsterRecord::new(1, 1, "Lucifer", Element::Light, 6),
            MonsterRecord::new(2, 2, "Ragnarok", Element::Fire, 6).with_skill("Lucid Laser"),
            MonsterRecord::new(3, 3, "Nobunaga", Element::Fire, 6),
        ];
        let state = QueryState::default().with_text("LUCI");

        let page = query(&collection, &state);
        let ids: Vec<u64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ability_filter_is_and_of_membership() {
        let record = MonsterRecord::new(1, 1, "m", Element::Dark, 6).with_abilities(["A", "B"]);
        let collection = vec![record];

        let only_a = QueryState::default().with_ability("A");
        let a_and_b = QueryState::default().with_ability("A").with_ability("B");
        let a_and_c = QueryState::default().with_ability("A").with_ability("C");

        assert_eq!(query(&collection, &only_a).total, 1);
        assert_eq!(query(&collection, &a_and_b).total, 1);
        assert_eq!(query(&collection, &a_and_c).total, 0);
    }

    #[test]
    fn test_optional_dimension_does_not_match_missing_value() {
        let collection = vec![
            MonsterRecord::new(1, 1, "a", Element::Fire, 5).with_series("コラボ"),
            MonsterRecord::new(2, 2, "b", Element::Fire, 5),
        ];
        let state = QueryState::default().with(Selection::Series("コラボ".to_string()));
        let page = query(&collection, &state);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, 1);
    }

    #[test]
    fn test_owned_partition_keeps_owned_records() {
        let collection = vec![
            MonsterRecord::new(1, 1, "a", Element::Fire, 5).owned(true),
            MonsterRecord::new(2, 2, "b", Element::Fire, 5),
            MonsterRecord::new(3, 3, "c", Element::Water, 5).owned(true),
        ];
        let mut state = QueryState::default();
        state.set_partition(Partition::Owned);

        let page = query(&collection, &state);
        assert_eq!(page.total, 2);
        assert_eq!(page.size, 60);
    }

    #[test]
    fn test_pages_preserve_relative_order() {
        let collection: Vec<MonsterRecord> = (1..=7)
            .map(|i| MonsterRecord::new(i, i as u32, format!("m{i}"), Element::Light, 4))
            .collect();
        let state = QueryState::default().with_page_size(size(3)).with_page(1);

        let page = query(&collection, &state);
        let ids: Vec<u64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(page.display_range(), Some((4, 6)));
        assert_eq!(page.total_pages(), 3);

        let last = query(&collection, &state.clone().with_page(2));
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.display_range(), Some((7, 7)));
    }

    #[test]
    fn test_empty_collection() {
        let page = query(&[], &QueryState::default());
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_huge_page_index_does_not_overflow() {
        let collection = ten_with_three_fire();
        let state = QueryState::default().with_page(usize::MAX);
        let page = query(&collection, &state);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 10);
    }
}
