//! Domain data shapes shared across layers: the filterable [`MonsterRecord`],
//! its categorical dimensions, and the wire shapes of the catalog API.

pub mod wire;

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ALL_PAGE_SIZE, OWNED_PAGE_SIZE};
use crate::error::CatalogError;

pub use wire::{
    ImageData, ListParams, MonsterAbility, MonsterFullListResponse, MonsterFullResponse,
    NamedImage,
};

/// Element (attribute) of a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Wood,
    Light,
    Dark,
    Thunder,
}

impl Element {
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Water,
        Element::Wood,
        Element::Light,
        Element::Dark,
        Element::Thunder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Wood => "wood",
            Element::Light => "light",
            Element::Dark => "dark",
            Element::Thunder => "thunder",
        }
    }

    /// Display label used by the attribute master table.
    pub fn label(&self) -> &'static str {
        match self {
            Element::Fire => "火",
            Element::Water => "水",
            Element::Wood => "木",
            Element::Light => "光",
            Element::Dark => "闇",
            Element::Thunder => "雷",
        }
    }

    /// Stable attribute master id (1-based, in declaration order).
    pub fn master_id(&self) -> u64 {
        Element::ALL
            .iter()
            .position(|e| e == self)
            .map(|i| i as u64 + 1)
            .unwrap_or_default()
    }

    pub fn from_master_id(id: u64) -> Option<Element> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        Element::ALL.get(index).copied()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = trimmed.strip_suffix("属性").unwrap_or(trimmed);
        Element::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(base) || e.label() == base)
            .ok_or_else(|| CatalogError::invalid("element", format!("unknown element '{s}'")))
    }
}

/// View partition: the whole catalog or only the monsters the user owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    #[default]
    All,
    Owned,
}

impl Partition {
    /// Fixed page size of the partition's view.
    pub fn page_size(&self) -> NonZeroUsize {
        let size = match self {
            Partition::All => ALL_PAGE_SIZE,
            Partition::Owned => OWNED_PAGE_SIZE,
        };
        NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::All => "all",
            Partition::Owned => "owned",
        }
    }
}

impl FromStr for Partition {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Partition::All),
            "owned" => Ok(Partition::Owned),
            other => Err(CatalogError::invalid(
                "partition",
                format!("unknown partition '{other}'"),
            )),
        }
    }
}

/// The filterable unit of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterRecord {
    pub id: u64,
    /// Display index; used for ordering only.
    pub number: u32,
    pub name: String,
    pub element: Element,
    pub rarity: u8,
    pub race: Option<String>,
    pub battle_type: Option<String>,
    #[serde(default)]
    pub ability_names: BTreeSet<String>,
    pub friendship_combo: Option<String>,
    pub evolution_stage: Option<String>,
    pub series: Option<String>,
    /// Named skill and combo fields matched by free-text search.
    #[serde(default)]
    pub skill_names: Vec<String>,
    #[serde(default)]
    pub owned: bool,
}

impl MonsterRecord {
    pub fn new(id: u64, number: u32, name: impl Into<String>, element: Element, rarity: u8) -> Self {
        Self {
            id,
            number,
            name: name.into(),
            element,
            rarity,
            race: None,
            battle_type: None,
            ability_names: BTreeSet::new(),
            friendship_combo: None,
            evolution_stage: None,
            series: None,
            skill_names: Vec::new(),
            owned: false,
        }
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn with_battle_type(mut self, battle_type: impl Into<String>) -> Self {
        self.battle_type = Some(battle_type.into());
        self
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ability_names = abilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_friendship_combo(mut self, combo: impl Into<String>) -> Self {
        let combo = combo.into();
        self.skill_names.push(combo.clone());
        self.friendship_combo = Some(combo);
        self
    }

    pub fn with_evolution_stage(mut self, stage: impl Into<String>) -> Self {
        self.evolution_stage = Some(stage.into());
        self
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill_names.push(skill.into());
        self
    }

    pub fn owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TryFrom<&MonsterFullResponse> for MonsterRecord {
    type Error = CatalogError;

    fn try_from(full: &MonsterFullResponse) -> Result<Self, Self::Error> {
        let element: Element = full.attribute.name.parse()?;
        let rarity = u8::try_from(full.rarity.value)
            .map_err(|_| CatalogError::invalid("rarity", format!("out of range: {}", full.rarity.value)))?;

        let ability_names = full
            .abilities
            .base
            .iter()
            .chain(full.abilities.gauge.iter())
            .chain(full.connect_skill.abilities.iter())
            .map(|a| a.name.clone())
            .collect();

        let mut skill_names = Vec::new();
        skill_names.extend(full.strike_shot.name.as_deref().and_then(non_blank));
        skill_names.extend(full.luck_skill.as_ref().and_then(|l| non_blank(&l.name)));
        skill_names.extend(non_blank(&full.friendship_combo.main.name));
        skill_names.extend(
            full.friendship_combo
                .sub
                .as_ref()
                .and_then(|s| non_blank(&s.name)),
        );

        Ok(Self {
            id: full.id,
            number: full.number,
            name: full.name.clone(),
            element,
            rarity,
            race: non_blank(&full.tribe),
            battle_type: non_blank(&full.battle_type),
            ability_names,
            friendship_combo: non_blank(&full.friendship_combo.main.name),
            evolution_stage: non_blank(&full.evolution_stage.name),
            series: full.series.as_deref().and_then(non_blank),
            skill_names,
            owned: false,
        })
    }
}
