//! Master tables: the id/name lists behind each filter dimension.
//!
//! Attribute ids are fixed by [`Element::master_id`] and rarity ids are the
//! rarity value itself. Every other table is derived from the catalog:
//! distinct values sorted by name, numbered from 1.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{Element, MonsterFullResponse, MonsterRecord};
use crate::source::CatalogEntry;
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MasterType {
    Attribute,
    LuckSkill,
    FriendshipName,
    Tribe,
    BattleType,
    HitType,
    ShotSkill,
    AssistSkill,
    StrikeShotName,
    Series,
    AbilityStage,
    Rarity,
    EvolutionStage,
    Ability,
    StrikeShotEffect,
    FriendshipCategory,
}

impl MasterType {
    pub const ALL: [MasterType; 16] = [
        MasterType::Attribute,
        MasterType::LuckSkill,
        MasterType::FriendshipName,
        MasterType::Tribe,
        MasterType::BattleType,
        MasterType::HitType,
        MasterType::ShotSkill,
        MasterType::AssistSkill,
        MasterType::StrikeShotName,
        MasterType::Series,
        MasterType::AbilityStage,
        MasterType::Rarity,
        MasterType::EvolutionStage,
        MasterType::Ability,
        MasterType::StrikeShotEffect,
        MasterType::FriendshipCategory,
    ];

    /// Path segment used by `/master/{type}/select/all`.
    pub fn path(&self) -> &'static str {
        match self {
            MasterType::Attribute => "attribute",
            MasterType::LuckSkill => "luckSkill",
            MasterType::FriendshipName => "friendshipName",
            MasterType::Tribe => "tribe",
            MasterType::BattleType => "battleType",
            MasterType::HitType => "hitType",
            MasterType::ShotSkill => "shotSkill",
            MasterType::AssistSkill => "assistSkill",
            MasterType::StrikeShotName => "strikeShotName",
            MasterType::Series => "seriesInfo",
            MasterType::AbilityStage => "abilityStage",
            MasterType::Rarity => "rarity",
            MasterType::EvolutionStage => "evolutionStage",
            MasterType::Ability => "ability",
            MasterType::StrikeShotEffect => "strikeShotEffect",
            MasterType::FriendshipCategory => "friendshipCategory",
        }
    }
}

impl fmt::Display for MasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for MasterType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MasterType::ALL
            .into_iter()
            .find(|t| t.path() == s)
            .ok_or_else(|| CatalogError::UnknownMaster(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MasterEntry {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct MasterRegistry {
    tables: BTreeMap<MasterType, Vec<MasterEntry>>,
}

fn numbered(names: BTreeSet<&str>) -> Vec<MasterEntry> {
    names
        .into_iter()
        .zip(1..)
        .map(|(name, id)| MasterEntry {
            id,
            name: name.to_string(),
        })
        .collect()
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

impl MasterRegistry {
    /// Tables for the filterable dimensions only.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MonsterRecord>,
    {
        let mut distinct: BTreeMap<MasterType, BTreeSet<&'a str>> = BTreeMap::new();
        for record in records {
            let mut add = |master: MasterType, value: Option<&'a str>| {
                if let Some(value) = value {
                    distinct.entry(master).or_default().insert(value);
                }
            };
            add(MasterType::Tribe, record.race.as_deref());
            add(MasterType::BattleType, record.battle_type.as_deref());
            add(MasterType::EvolutionStage, record.evolution_stage.as_deref());
            add(MasterType::Series, record.series.as_deref());
            add(MasterType::FriendshipName, record.friendship_combo.as_deref());
            for ability in &record.ability_names {
                add(MasterType::Ability, Some(ability.as_str()));
            }
        }

        let mut tables: BTreeMap<MasterType, Vec<MasterEntry>> = distinct
            .into_iter()
            .map(|(master, names)| (master, numbered(names)))
            .collect();
        tables.insert(
            MasterType::Attribute,
            Element::ALL
                .iter()
                .map(|e| MasterEntry {
                    id: e.master_id(),
                    name: e.label().to_string(),
                })
                .collect(),
        );
        Self { tables }
    }

    /// Every table the catalog can answer, including the descriptive ones
    /// that only exist on the full documents.
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        let mut registry = Self::from_records(entries.iter().map(|e| &e.record));
        registry.add_document_tables(entries.iter().map(|e| &e.detail));
        registry
    }

    fn add_document_tables<'a, I>(&mut self, documents: I)
    where
        I: IntoIterator<Item = &'a MonsterFullResponse>,
    {
        let mut distinct: BTreeMap<MasterType, BTreeSet<&'a str>> = BTreeMap::new();
        let mut rarities = BTreeSet::new();
        for doc in documents {
            let mut add = |master: MasterType, value: Option<&'a str>| {
                if let Some(value) = value.and_then(non_empty) {
                    distinct.entry(master).or_default().insert(value);
                }
            };
            add(MasterType::LuckSkill, doc.luck_skill.as_ref().map(|l| l.name.as_str()));
            add(MasterType::HitType, Some(doc.hit_type.as_str()));
            add(MasterType::ShotSkill, doc.skills.shot.as_deref());
            add(MasterType::AssistSkill, doc.skills.assist.as_deref());
            add(MasterType::StrikeShotName, doc.strike_shot.name.as_deref());
            add(MasterType::StrikeShotEffect, doc.strike_shot.effect.as_deref());
            let abilities = doc.abilities.base.iter().chain(&doc.abilities.gauge);
            for ability in abilities.chain(&doc.connect_skill.abilities) {
                add(MasterType::AbilityStage, ability.stage.as_deref());
            }
            let combo = &doc.friendship_combo;
            for friendship in std::iter::once(&combo.main).chain(combo.sub.as_ref()) {
                add(MasterType::FriendshipCategory, Some(friendship.category.as_str()));
            }
            if let Ok(rarity) = u64::try_from(doc.rarity.value) {
                if rarity > 0 {
                    rarities.insert(rarity);
                }
            }
        }

        for (master, names) in distinct {
            self.tables.insert(master, numbered(names));
        }
        if !rarities.is_empty() {
            self.tables.insert(
                MasterType::Rarity,
                rarities
                    .into_iter()
                    .map(|r| MasterEntry {
                        id: r,
                        name: r.to_string(),
                    })
                    .collect(),
            );
        }
    }

    pub fn entries(&self, master: MasterType) -> &[MasterEntry] {
        self.tables.get(&master).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn name_of(&self, master: MasterType, id: u64) -> Option<&str> {
        self.entries(master)
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    pub fn id_of(&self, master: MasterType, name: &str) -> Option<u64> {
        self.entries(master)
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> MasterRegistry {
        let records = vec![
            MonsterRecord::new(1, 1, "a", Element::Fire, 5)
                .with_race("魔族")
                .with_battle_type("パワー")
                .with_abilities(["飛行", "魔法陣ブースト"]),
            MonsterRecord::new(2, 2, "b", Element::Water, 6)
                .with_race("ドラゴン")
                .with_series("コラボ")
                .with_abilities(["飛行"]),
        ];
        MasterRegistry::from_records(&records)
    }

    #[test]
    fn test_master_type_paths() {
        assert_eq!("battleType".parse::<MasterType>().unwrap(), MasterType::BattleType);
        assert_eq!("seriesInfo".parse::<MasterType>().unwrap(), MasterType::Series);
        assert_eq!("luckSkill".parse::<MasterType>().unwrap(), MasterType::LuckSkill);
        assert_eq!("strikeShotName".parse::<MasterType>().unwrap(), MasterType::StrikeShotName);
        for master in MasterType::ALL {
            assert_eq!(master.path().parse::<MasterType>().unwrap(), master);
        }
        assert!(matches!(
            "weapon".parse::<MasterType>(),
            Err(CatalogError::UnknownMaster(_))
        ));
    }

    #[test]
    fn test_attribute_table_is_fixed() {
        let registry = MasterRegistry::default();
        assert!(registry.entries(MasterType::Attribute).is_empty());

        let registry = self::registry();
        let attributes = registry.entries(MasterType::Attribute);
        assert_eq!(attributes.len(), 6);
        assert_eq!(registry.name_of(MasterType::Attribute, 1), Some("火"));
    }

    #[test]
    fn test_derived_tables_are_sorted_and_distinct() {
        let registry = registry();
        let tribes: Vec<&str> = registry
            .entries(MasterType::Tribe)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(tribes, vec!["ドラゴン", "魔族"]);
        assert_eq!(registry.entries(MasterType::Ability).len(), 2);
        assert_eq!(registry.id_of(MasterType::Tribe, "魔族"), Some(2));
        assert_eq!(registry.name_of(MasterType::Tribe, 9), None);
        assert!(registry.entries(MasterType::FriendshipName).is_empty());
    }

    #[test]
    fn test_document_tables() {
        use crate::domain::wire::{Friendship, MonsterAbility, NamedImage, Rarity, StrikeShot};
        use crate::source::InMemorySource;
        use std::collections::HashSet;

        let mut first = MonsterFullResponse {
            id: 1,
            number: 1,
            name: "水龍".to_string(),
            rarity: Rarity { value: 6, max_level: 120 },
            attribute: NamedImage::new("水", None),
            hit_type: "貫通".to_string(),
            luck_skill: Some(NamedImage::new("ケガ減り", None)),
            strike_shot: StrikeShot {
                name: Some("ドラゴンブレス".to_string()),
                effect: Some("自強化".to_string()),
            },
            ..Default::default()
        };
        first.abilities.base.push(MonsterAbility {
            name: "飛行".to_string(),
            stage: Some("超".to_string()),
        });
        first.friendship_combo.main = Friendship {
            name: "貫通レーザーL".to_string(),
            category: "メイン".to_string(),
            ..Default::default()
        };
        let second = MonsterFullResponse {
            id: 2,
            number: 2,
            name: "火の鳥".to_string(),
            rarity: Rarity { value: 4, max_level: 70 },
            attribute: NamedImage::new("火", None),
            hit_type: "反射".to_string(),
            ..Default::default()
        };

        let catalog = InMemorySource::new(vec![first, second], &HashSet::new());
        let registry = MasterRegistry::from_entries(catalog.entries());

        let hit_types: Vec<&str> = registry
            .entries(MasterType::HitType)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(hit_types, vec!["反射", "貫通"]);
        assert_eq!(registry.name_of(MasterType::LuckSkill, 1), Some("ケガ減り"));
        assert_eq!(registry.name_of(MasterType::StrikeShotName, 1), Some("ドラゴンブレス"));
        assert_eq!(registry.name_of(MasterType::StrikeShotEffect, 1), Some("自強化"));
        assert_eq!(registry.name_of(MasterType::AbilityStage, 1), Some("超"));
        assert_eq!(registry.name_of(MasterType::FriendshipCategory, 1), Some("メイン"));
        assert_eq!(registry.id_of(MasterType::Rarity, "6"), Some(6));
        assert_eq!(registry.entries(MasterType::Rarity).len(), 2);
        assert!(registry.entries(MasterType::ShotSkill).is_empty());
        assert_eq!(registry.entries(MasterType::Ability), &[MasterEntry {
            id: 1,
            name: "飛行".to_string(),
        }]);
    }
}
