//! Mob aggro catalog

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

pub const MOB_SCHEMA_VERSION: u32 = 1;

/// Aggro radius assumed for a hostile with no catalog record
pub const DEFAULT_AGGRO_DISTANCE: f32 = 16.0;

/// Full width of a sight cone, in radians (90°)
pub const SIGHT_CONE_RADIANS: f32 = std::f32::consts::FRAC_PI_2;

/// How a mob detects players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AggroType {
    #[default]
    Sight,
    Sound,
    Proximity,
    Magic,
    Blood,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobRecord {
    /// BattleNpc name id
    pub name_id: u32,
    pub aggro: AggroType,
    pub aggro_distance: f32,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct MobFile {
    schema_version: u32,
    mobs: Vec<MobRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct MobCatalog {
    records: FxHashMap<u32, MobRecord>,
}

impl MobCatalog {
    pub fn new(records: Vec<MobRecord>) -> Result<Self, DataError> {
        let mut map = FxHashMap::default();
        for record in records {
            let name_id = record.name_id;
            if map.insert(name_id, record).is_some() {
                return Err(DataError::DuplicateMob(name_id));
            }
        }
        Ok(Self { records: map })
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let file: MobFile = serde_json::from_str(json)
            .map_err(|source| DataError::Parse { catalog: "mob", source })?;
        if file.schema_version != MOB_SCHEMA_VERSION {
            return Err(DataError::SchemaVersion {
                catalog: "mob",
                found: file.schema_version,
                expected: MOB_SCHEMA_VERSION,
            });
        }
        Self::new(file.mobs)
    }

    pub fn get(&self, name_id: u32) -> Option<&MobRecord> {
        self.records.get(&name_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog;

    #[test]
    fn test_lookup() {
        let mobs = &catalog().mobs;
        let grimoire = mobs.get(7996).unwrap();
        assert_eq!(grimoire.aggro, AggroType::Sound);
        assert!((grimoire.aggro_distance - 14.8).abs() < 1e-6);
        assert_eq!(mobs.get(8004).unwrap().aggro, AggroType::Blood);
        assert!(mobs.get(7958).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let record = MobRecord {
            name_id: 1,
            aggro: AggroType::Sight,
            aggro_distance: 15.0,
            label: String::new(),
        };
        let result = MobCatalog::new(vec![record.clone(), record]);
        assert!(matches!(result, Err(DataError::DuplicateMob(1))));
    }
}
