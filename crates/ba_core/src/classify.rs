//! Object Classifier
//!
//! Sorts each world entity seen during a poll into chest, trap, mob or
//! nothing of interest. Classification is a pure function of the entity,
//! the area it stands in, and whether this session already found its chest.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::area::AreaTag;
use crate::geometry::WorldPos;
use crate::mob::{AggroType, MobCatalog, MobRecord, DEFAULT_AGGRO_DISTANCE};
use crate::trap::TrapType;

/// BattleNpc name id of a trap that has been set off
pub const TRIGGERED_TRAP_NAME_ID: u32 = 7958;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcKind {
    Enemy,
    Friendly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Treasure,
    EventObject,
    BattleNpc(NpcKind),
    Player,
    Other,
}

/// One status effect on a character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub id: u32,
    #[serde(default)]
    pub param: u32,
    /// Seconds left, 0 for permanent statuses
    #[serde(default)]
    pub remaining_secs: f32,
}

impl StatusEffect {
    pub fn new(id: u32, param: u32, remaining_secs: f32) -> Self {
        Self { id, param, remaining_secs }
    }
}

/// Plain-data view of a game object, as handed over by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    pub object_id: u64,
    pub kind: EntityKind,
    /// Object data id (event objects)
    #[serde(default)]
    pub base_id: u32,
    /// Name id (battle npcs)
    #[serde(default)]
    pub name_id: u32,
    pub position: WorldPos,
    /// Facing, radians
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub hitbox_radius: f32,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default)]
    pub in_combat: bool,
    /// Display name (players)
    #[serde(default)]
    pub name: String,
    /// ClassJob id (players)
    #[serde(default)]
    pub job_id: u32,
    #[serde(default = "default_targetable")]
    pub targetable: bool,
    #[serde(default)]
    pub statuses: Vec<StatusEffect>,
}

fn default_targetable() -> bool {
    true
}

impl WorldEntity {
    pub fn new(object_id: u64, kind: EntityKind, position: WorldPos) -> Self {
        Self {
            object_id,
            kind,
            base_id: 0,
            name_id: 0,
            position,
            rotation: 0.0,
            hitbox_radius: 0.0,
            is_dead: false,
            in_combat: false,
            name: String::new(),
            job_id: 0,
            targetable: true,
            statuses: Vec::new(),
        }
    }

    pub fn status(&self, id: u32) -> Option<&StatusEffect> {
        self.statuses.iter().find(|s| s.id == id)
    }

    pub fn has_any_status(&self, ids: &[u32]) -> bool {
        self.statuses.iter().any(|s| ids.contains(&s.id))
    }

    pub fn is_enemy(&self) -> bool {
        self.kind == EntityKind::BattleNpc(NpcKind::Enemy)
    }
}

/// A hostile that is alive and idle
#[derive(Debug, Clone, PartialEq)]
pub struct MobSighting {
    pub object_id: u64,
    pub name_id: u32,
    pub position: WorldPos,
    pub rotation: f32,
    pub hitbox_radius: f32,
    /// `None` when the species has no aggro data
    pub record: Option<MobRecord>,
}

impl MobSighting {
    /// Sight when the species has no record
    pub fn aggro(&self) -> AggroType {
        self.record.as_ref().map_or(AggroType::Sight, |r| r.aggro)
    }

    pub fn aggro_distance(&self) -> f32 {
        self.record.as_ref().map_or(DEFAULT_AGGRO_DISTANCE, |r| r.aggro_distance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// `announce` is set for the first chest of the session in an elemental room
    Chest { area: Option<AreaTag>, announce: bool },
    Trap(TrapType),
    Mob(MobSighting),
    Irrelevant,
}

/// Classify one entity.
///
/// `area` is where the entity stands; `chest_found` is the session's chest flag.
pub fn classify(
    entity: &WorldEntity,
    area: Option<AreaTag>,
    chest_found: bool,
    mobs: &MobCatalog,
) -> Classification {
    if entity.kind == EntityKind::Treasure {
        let elemental = area.is_some_and(|tag| tag.element().is_some());
        return Classification::Chest { area, announce: elemental && !chest_found };
    }

    if let Some(trap_type) = trap_type_of(entity, area) {
        return Classification::Trap(trap_type);
    }

    if entity.is_enemy() {
        if entity.is_dead || entity.in_combat {
            return Classification::Irrelevant;
        }
        let record = mobs.get(entity.name_id).cloned();
        if record.is_none() {
            trace!(name_id = entity.name_id, "Enemy without aggro record");
        }
        return Classification::Mob(MobSighting {
            object_id: entity.object_id,
            name_id: entity.name_id,
            position: entity.position,
            rotation: entity.rotation,
            hitbox_radius: entity.hitbox_radius,
            record,
        });
    }

    Classification::Irrelevant
}

/// Trap objects only count inside a known area.
fn trap_type_of(entity: &WorldEntity, area: Option<AreaTag>) -> Option<TrapType> {
    let area = area?;
    match entity.kind {
        EntityKind::EventObject => TrapType::from_data_id(entity.base_id),
        EntityKind::BattleNpc(NpcKind::Enemy) if entity.name_id == TRIGGERED_TRAP_NAME_ID => {
            Some(if area.holds_small_bombs() { TrapType::SmallBomb } else { TrapType::BigBomb })
        }
        _ => None,
    }
}
