//! Translation of listing endpoint parameters into a [`QueryState`].

use std::num::NonZeroUsize;

use super::state::{QueryState, Selection};
use crate::constants::API_DEFAULT_PAGE_SIZE;
use crate::domain::{Element, ListParams, Partition};
use crate::error::{CatalogError, Result};
use crate::masters::{MasterRegistry, MasterType};

/// A validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub state: QueryState,
    pub include_images: bool,
    /// Set when a filter names something that cannot exist (unknown master
    /// id, rarity out of range); such a request matches nothing.
    pub unsatisfiable: bool,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validates boundary paging input into a page index and a capped page size.
///
/// A negative page or a non-positive size is rejected; a size above
/// `max_size` is capped; a missing size defaults to the listing default.
pub fn validate_paging(
    page: Option<i64>,
    size: Option<i64>,
    max_size: NonZeroUsize,
) -> Result<(usize, NonZeroUsize)> {
    let page = page.unwrap_or(0);
    if page < 0 {
        return Err(CatalogError::invalid("page", "must not be negative"));
    }
    let size = size.unwrap_or(API_DEFAULT_PAGE_SIZE);
    if size <= 0 {
        return Err(CatalogError::invalid("size", "must be greater than 0"));
    }
    let page = usize::try_from(page).unwrap_or(usize::MAX);
    let size = usize::try_from(size)
        .ok()
        .and_then(NonZeroUsize::new)
        .map_or(max_size, |size| size.min(max_size));
    Ok((page, size))
}

impl ListingRequest {
    /// Validates `params` and resolves master ids to names.
    pub fn from_params(
        params: &ListParams,
        masters: &MasterRegistry,
        max_size: NonZeroUsize,
    ) -> Result<Self> {
        let (page, size) = validate_paging(params.page, params.size, max_size)?;

        let partition = match non_blank(params.partition.as_deref()) {
            Some(p) => p.parse()?,
            None => Partition::All,
        };

        let mut state = QueryState::new(partition)
            .with_page(page)
            .with_page_size(size);
        let mut unsatisfiable = false;

        if let Some(q) = non_blank(params.q.as_deref()) {
            state = state.with_text(q);
        }

        if let Some(rarity) = params.rarity {
            match u8::try_from(rarity) {
                Ok(rarity) => state = state.with(Selection::Rarity(rarity)),
                Err(_) => unsatisfiable = true,
            }
        }

        if let Some(id) = params.attribute_id {
            match Element::from_master_id(id) {
                Some(element) => state = state.with(Selection::Element(element)),
                None => unsatisfiable = true,
            }
        }

        let by_id = [
            (params.tribe_id, MasterType::Tribe),
            (params.battle_type_id, MasterType::BattleType),
        ];
        for (id, master) in by_id {
            let Some(id) = id else { continue };
            match masters.name_of(master, id) {
                Some(name) => {
                    let name = name.to_string();
                    state = state.with(match master {
                        MasterType::Tribe => Selection::Race(name),
                        _ => Selection::BattleType(name),
                    });
                }
                None => unsatisfiable = true,
            }
        }

        if let Some(stage) = non_blank(params.evolution_stage.as_deref()) {
            state = state.with(Selection::EvolutionStage(stage.to_string()));
        }
        if let Some(series) = non_blank(params.series.as_deref()) {
            state = state.with(Selection::Series(series.to_string()));
        }
        if let Some(combo) = non_blank(params.friendship_combo.as_deref()) {
            state = state.with(Selection::FriendshipCombo(combo.to_string()));
        }
        if let Some(abilities) = params.abilities.as_deref() {
            for ability in abilities.split(',').map(str::trim).filter(|a| !a.is_empty()) {
                state = state.with_ability(ability);
            }
        }

        Ok(Self {
            state,
            include_images: params.include_images.unwrap_or(false),
            unsatisfiable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonsterRecord;

    fn max() -> NonZeroUsize {
        NonZeroUsize::new(100).unwrap()
    }

    fn masters() -> MasterRegistry {
        let records = vec![MonsterRecord::new(1, 1, "a", Element::Fire, 5)
            .with_race("ドラゴン")
            .with_battle_type("スピード")];
        MasterRegistry::from_records(&records)
    }

    #[test]
    fn test_defaults() {
        let request = ListingRequest::from_params(&ListParams::default(), &masters(), max()).unwrap();
        assert_eq!(request.state.page(), 0);
        assert_eq!(request.state.page_size().get(), 20);
        assert!(request.state.is_unfiltered());
        assert!(!request.include_images);
        assert!(!request.unsatisfiable);
    }

    #[test]
    fn test_rejects_negative_page_and_non_positive_size() {
        let err = ListingRequest::from_params(&ListParams::page(-1, 20), &masters(), max()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidQuery { ref field, .. } if field == "page"));

        for size in [0, -5] {
            let err = ListingRequest::from_params(&ListParams::page(0, size), &masters(), max())
                .unwrap_err();
            assert!(matches!(err, CatalogError::InvalidQuery { ref field, .. } if field == "size"));
        }
    }

    #[test]
    fn test_caps_size() {
        let request =
            ListingRequest::from_params(&ListParams::page(2, 5000), &masters(), max()).unwrap();
        assert_eq!(request.state.page_size().get(), 100);
        assert_eq!(request.state.page(), 2);
    }

    #[test]
    fn test_resolves_master_ids() {
        let params = ListParams {
            attribute_id: Some(1),
            tribe_id: Some(1),
            battle_type_id: Some(1),
            rarity: Some(5),
            abilities: Some("飛行, 魔法陣ブースト,".to_string()),
            q: Some("  ".to_string()),
            ..Default::default()
        };
        let request = ListingRequest::from_params(&params, &masters(), max()).unwrap();
        let filters = request.state.filters();
        assert_eq!(filters.element, Some(Element::Fire));
        assert_eq!(filters.race.as_deref(), Some("ドラゴン"));
        assert_eq!(filters.battle_type.as_deref(), Some("スピード"));
        assert_eq!(filters.rarity, Some(5));
        assert_eq!(request.state.abilities().len(), 2);
        assert_eq!(request.state.normalized_text(), None);
        assert!(!request.unsatisfiable);
    }

    #[test]
    fn test_unknown_ids_are_unsatisfiable() {
        let params = ListParams {
            tribe_id: Some(42),
            ..Default::default()
        };
        let request = ListingRequest::from_params(&params, &masters(), max()).unwrap();
        assert!(request.unsatisfiable);

        let params = ListParams {
            rarity: Some(900),
            ..Default::default()
        };
        assert!(ListingRequest::from_params(&params, &masters(), max()).unwrap().unsatisfiable);
    }

    #[test]
    fn test_partition_parameter() {
        let params = ListParams {
            partition: Some("owned".to_string()),
            ..Default::default()
        };
        let request = ListingRequest::from_params(&params, &masters(), max()).unwrap();
        assert_eq!(request.state.partition(), Partition::Owned);
        assert_eq!(request.state.page_size().get(), 20);

        let params = ListParams {
            partition: Some("friends".to_string()),
            ..Default::default()
        };
        assert!(ListingRequest::from_params(&params, &masters(), max()).is_err());
    }
}
