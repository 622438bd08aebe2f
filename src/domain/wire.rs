//! JSON shapes of the catalog API (`/monster/select/...`).
//!
//! Field names are camelCase on the wire. Nested containers default when
//! absent so partially populated upstream documents still deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub path: String,
    pub mime_type: Option<String>,
    pub base64: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedImage {
    pub name: String,
    pub image: Option<ImageData>,
}

impl NamedImage {
    pub fn new(name: impl Into<String>, image: Option<ImageData>) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rarity {
    pub value: i32,
    pub max_level: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionStage {
    pub name: String,
    pub level_cap_release: bool,
    pub super_battle_release: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub max: i32,
    pub plus_max: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speed {
    pub max: f64,
    pub plus_max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub hp: Stat,
    pub attack: Stat,
    pub speed: Speed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterAbility {
    pub name: String,
    pub stage: Option<String>,
}

impl MonsterAbility {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Abilities {
    #[serde(default)]
    pub base: Vec<MonsterAbility>,
    #[serde(default)]
    pub gauge: Vec<MonsterAbility>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectSkill {
    pub condition: Option<String>,
    #[serde(default)]
    pub abilities: Vec<MonsterAbility>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub shot: Option<String>,
    pub assist: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeShot {
    pub name: Option<String>,
    pub effect: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Friendship {
    pub name: String,
    #[serde(default)]
    pub attribute: NamedImage,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub power: Option<i32>,
    pub image: Option<ImageData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FriendshipCombo {
    pub main: Friendship,
    pub sub: Option<Friendship>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Images {
    pub icon: Option<ImageData>,
    pub monster: Option<ImageData>,
}

/// Fully populated monster as returned by the detail and listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterFullResponse {
    pub id: u64,
    pub number: u32,
    pub name: String,

    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub evolution_stage: EvolutionStage,

    pub attribute: NamedImage,
    #[serde(default)]
    pub hit_type: String,
    #[serde(default)]
    pub tribe: String,
    #[serde(default)]
    pub battle_type: String,

    #[serde(default)]
    pub status: Status,

    pub luck_skill: Option<NamedImage>,

    #[serde(default)]
    pub abilities: Abilities,
    #[serde(default)]
    pub connect_skill: ConnectSkill,

    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub strike_shot: StrikeShot,

    #[serde(default)]
    pub friendship_combo: FriendshipCombo,
    pub series: Option<String>,

    #[serde(default)]
    pub images: Images,
}

impl MonsterFullResponse {
    /// Mutable handles to every image slot of the document.
    pub fn image_slots_mut(&mut self) -> Vec<&mut Option<ImageData>> {
        let mut slots = vec![
            &mut self.attribute.image,
            &mut self.friendship_combo.main.attribute.image,
            &mut self.friendship_combo.main.image,
            &mut self.images.icon,
            &mut self.images.monster,
        ];
        if let Some(luck) = self.luck_skill.as_mut() {
            slots.push(&mut luck.image);
        }
        if let Some(sub) = self.friendship_combo.sub.as_mut() {
            slots.push(&mut sub.attribute.image);
            slots.push(&mut sub.image);
        }
        slots
    }
}

/// One page of the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterFullListResponse {
    pub items: Vec<MonsterFullResponse>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

/// Query parameters of `GET /monster/select/all`.
///
/// `page` and `size` stay signed so that negative input can be rejected
/// explicitly instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tribe_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battle_type_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendship_combo: Option<String>,
    /// Comma-separated ability names; all must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,
}

impl ListParams {
    pub fn page(page: i64, size: i64) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Default::default()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_full(id: u64, name: &str, attribute: &str) -> MonsterFullResponse {
        MonsterFullResponse {
            id,
            number: id as u32,
            name: name.to_string(),
            rarity: Rarity {
                value: 6,
                max_level: 120,
            },
            evolution_stage: EvolutionStage {
                name: "獣神化".to_string(),
                level_cap_release: true,
                super_battle_release: false,
            },
            attribute: NamedImage::new(attribute, None),
            hit_type: "貫通".to_string(),
            tribe: "ドラゴン".to_string(),
            battle_type: "パワー".to_string(),
            abilities: Abilities {
                base: vec![MonsterAbility::new("アンチ重力バリア")],
                gauge: vec![MonsterAbility::new("ゲージ飛行")],
            },
            strike_shot: StrikeShot {
                name: Some("ドラゴンブレス".to_string()),
                effect: None,
            },
            friendship_combo: FriendshipCombo {
                main: Friendship {
                    name: "貫通レーザーL".to_string(),
                    ..Default::default()
                },
                sub: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_full_response_uses_camel_case() {
        let json = serde_json::to_value(sample_full(1, "水龍", "水")).unwrap();
        assert!(json.get("evolutionStage").is_some());
        assert!(json.get("friendshipCombo").is_some());
        assert_eq!(json["rarity"]["maxLevel"], 120);
    }

    #[test]
    fn test_full_response_tolerates_missing_sections() {
        let json = r#"{"id":3,"number":3,"name":"雷獣","attribute":{"name":"雷","image":null},"luckSkill":null,"series":null}"#;
        let parsed: MonsterFullResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.name, "雷獣");
        assert!(parsed.abilities.base.is_empty());
        assert!(parsed.images.icon.is_none());
    }

    #[test]
    fn test_image_slots_cover_optional_sections() {
        let mut full = sample_full(1, "水龍", "水");
        assert_eq!(full.image_slots_mut().len(), 5);

        full.luck_skill = Some(NamedImage::new("ケガ減り", None));
        full.friendship_combo.sub = Some(Friendship::default());
        assert_eq!(full.image_slots_mut().len(), 8);
    }
}
