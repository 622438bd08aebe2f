//! Deterministic mock catalog used when no real data source is configured.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::in_memory::CatalogFile;
use crate::config::CatalogConfig;
use crate::domain::wire::{
    Abilities, ConnectSkill, EvolutionStage, Friendship, FriendshipCombo, Images, Rarity, Skills,
    Speed, Stat, Status, StrikeShot,
};
use crate::domain::{Element, ImageData, MonsterAbility, MonsterFullResponse, NamedImage};
use crate::error::{CatalogError, Result};

const NAME_PREFIXES: &[&str] = &["水", "炎", "雷", "聖", "闇", "森", "氷", "星"];
const NAME_SUFFIXES: &[&str] = &["龍", "獣", "神", "姫", "騎士", "鬼", "王", "精霊"];
const TRIBES: &[&str] = &[
    "ドラゴン", "神", "魔族", "亜人", "獣", "妖精", "ロボット", "鉱物", "魔人", "聖騎士",
];
const BATTLE_TYPES: &[&str] = &["バランス", "パワー", "スピード", "砲撃"];
const HIT_TYPES: &[&str] = &["反射", "貫通"];
const EVOLUTION_STAGES: &[(&str, bool, bool)] = &[
    ("進化", false, false),
    ("神化", false, false),
    ("獣神化", true, false),
    ("獣神化・改", true, true),
];
const ABILITIES: &[&str] = &[
    "アンチ重力バリア",
    "飛行",
    "アンチダメージウォール",
    "アンチワープ",
    "魔法陣ブースト",
    "ゲージ飛行",
    "ドレイン",
    "SSターンアクセル",
];
const FRIENDSHIP_COMBOS: &[&str] = &[
    "貫通レーザーL",
    "爆発",
    "拡散弾16",
    "超強貫通ホーミング",
    "全敵落雷",
    "反射拡散弾",
];
const LUCK_SKILLS: &[&str] = &["クリティカル", "ケガ減り", "バリア", "シールド", "スピードアップ"];
const STRIKE_SHOTS: &[&str] = &["ドラゴンブレス", "天罰の光", "奈落の牙", "星の導き"];
const SERIES: &[&str] = &["限定", "コラボ", "激獣神祭", "超獣神祭"];

/// Settings of the generated catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCatalog {
    pub count: usize,
    pub seed: u64,
    /// Probability that any given monster is in the owned partition.
    pub owned_ratio: f64,
}

impl MockCatalog {
    pub fn new(count: usize, seed: u64, owned_ratio: f64) -> Self {
        Self {
            count,
            seed,
            owned_ratio,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.mock_count, config.mock_seed, config.owned_ratio)
    }

    /// Generates the catalog; the same settings always yield the same data.
    pub fn generate(&self) -> Result<CatalogFile> {
        if !(0.0..=1.0).contains(&self.owned_ratio) {
            return Err(CatalogError::Config(format!(
                "owned_ratio must be within 0..=1, got {}",
                self.owned_ratio
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut file = CatalogFile::default();
        for i in 1..=self.count {
            let id = i as u64;
            file.monsters.push(generate_monster(&mut rng, id));
            if rng.gen_bool(self.owned_ratio) {
                file.owned.push(id);
            }
        }

        info!(
            monsters = file.monsters.len(),
            owned = file.owned.len(),
            seed = self.seed,
            "Generated mock catalog"
        );
        Ok(file)
    }
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn image(kind: &str, id: u64) -> Option<ImageData> {
    Some(ImageData {
        path: format!("uploads/monsters/{kind}/{kind}_{id:04}.png"),
        mime_type: None,
        base64: None,
    })
}

fn abilities(rng: &mut StdRng, count: usize) -> Vec<MonsterAbility> {
    ABILITIES
        .choose_multiple(rng, count)
        .map(|name| MonsterAbility::new(*name))
        .collect()
}

fn generate_monster(rng: &mut StdRng, id: u64) -> MonsterFullResponse {
    let element = Element::ALL.choose(rng).copied().unwrap_or(Element::Fire);
    let rarity = rng.gen_range(4..=6);
    let (stage, level_cap_release, super_battle_release) =
        EVOLUTION_STAGES.choose(rng).copied().unwrap_or(EVOLUTION_STAGES[0]);

    let name = format!(
        "{}{}{}",
        pick(rng, NAME_PREFIXES),
        pick(rng, NAME_SUFFIXES),
        id
    );

    let base_count = rng.gen_range(0..=2);
    let gauge_count = rng.gen_range(0..=1);
    let main_combo = pick(rng, FRIENDSHIP_COMBOS);
    let sub_combo = rng.gen_bool(0.4).then(|| Friendship {
        name: pick(rng, FRIENDSHIP_COMBOS).to_string(),
        attribute: NamedImage::new(element.label(), None),
        category: "サブ".to_string(),
        description: String::new(),
        power: Some(rng.gen_range(1000..=30000)),
        image: None,
    });

    MonsterFullResponse {
        id,
        number: id as u32,
        name,
        rarity: Rarity {
            value: rarity,
            max_level: 40 + rarity * 15,
        },
        evolution_stage: EvolutionStage {
            name: stage.to_string(),
            level_cap_release,
            super_battle_release,
        },
        attribute: NamedImage::new(element.label(), None),
        hit_type: pick(rng, HIT_TYPES).to_string(),
        tribe: pick(rng, TRIBES).to_string(),
        battle_type: pick(rng, BATTLE_TYPES).to_string(),
        status: Status {
            hp: Stat {
                max: rng.gen_range(10_000..=30_000),
                plus_max: 4_000,
            },
            attack: Stat {
                max: rng.gen_range(10_000..=30_000),
                plus_max: 5_000,
            },
            speed: Speed {
                max: rng.gen_range(200.0..=450.0),
                plus_max: 50.0,
            },
        },
        luck_skill: rng
            .gen_bool(0.8)
            .then(|| NamedImage::new(pick(rng, LUCK_SKILLS), None)),
        abilities: Abilities {
            base: abilities(rng, base_count),
            gauge: abilities(rng, gauge_count),
        },
        connect_skill: ConnectSkill::default(),
        skills: Skills::default(),
        strike_shot: StrikeShot {
            name: Some(pick(rng, STRIKE_SHOTS).to_string()),
            effect: None,
        },
        friendship_combo: FriendshipCombo {
            main: Friendship {
                name: main_combo.to_string(),
                attribute: NamedImage::new(element.label(), None),
                category: "メイン".to_string(),
                description: String::new(),
                power: Some(rng.gen_range(1000..=30000)),
                image: None,
            },
            sub: sub_combo,
        },
        series: rng.gen_bool(0.3).then(|| pick(rng, SERIES).to_string()),
        images: Images {
            icon: image("icon", id),
            monster: image("monster", id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonsterRecord;

    #[test]
    fn test_generation_is_deterministic() {
        let a = MockCatalog::new(50, 7, 0.2).generate().unwrap();
        let b = MockCatalog::new(50, 7, 0.2).generate().unwrap();
        assert_eq!(a, b);

        let c = MockCatalog::new(50, 8, 0.2).generate().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_monsters_convert_to_records() {
        let file = MockCatalog::new(200, 1, 0.5).generate().unwrap();
        assert_eq!(file.monsters.len(), 200);
        for doc in &file.monsters {
            let record = MonsterRecord::try_from(doc).unwrap();
            assert!((4..=6).contains(&record.rarity));
            assert!(record.race.is_some());
        }
        assert!(!file.owned.is_empty());
        assert!(file.owned.len() < 200);
    }

    #[test]
    fn test_owned_ratio_bounds() {
        assert!(MockCatalog::new(1, 1, 1.5).generate().is_err());
        let none = MockCatalog::new(30, 1, 0.0).generate().unwrap();
        assert!(none.owned.is_empty());
        let all = MockCatalog::new(30, 1, 1.0).generate().unwrap();
        assert_eq!(all.owned.len(), 30);
    }
}
