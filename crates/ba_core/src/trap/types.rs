use serde::{Deserialize, Serialize};

use crate::area::AreaTag;
use crate::geometry::{distance_2d, WorldPos, LOCATION_EPSILON};

/// Stable trap identifier from the catalog
pub type TrapId = u32;

/// Kind of hidden trap, keyed by the world object data id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapType {
    BigBomb,
    Portal,
    SmallBomb,
}

impl TrapType {
    pub const BIG_BOMB_DATA_ID: u32 = 2009728;
    pub const PORTAL_DATA_ID: u32 = 2009729;
    pub const SMALL_BOMB_DATA_ID: u32 = 2009730;

    pub fn from_data_id(data_id: u32) -> Option<Self> {
        match data_id {
            Self::BIG_BOMB_DATA_ID => Some(TrapType::BigBomb),
            Self::PORTAL_DATA_ID => Some(TrapType::Portal),
            Self::SMALL_BOMB_DATA_ID => Some(TrapType::SmallBomb),
            _ => None,
        }
    }

    pub fn data_id(self) -> u32 {
        match self {
            TrapType::BigBomb => Self::BIG_BOMB_DATA_ID,
            TrapType::Portal => Self::PORTAL_DATA_ID,
            TrapType::SmallBomb => Self::SMALL_BOMB_DATA_ID,
        }
    }

    pub fn blast_radius(self) -> f32 {
        match self {
            TrapType::BigBomb => 7.0,
            TrapType::SmallBomb => 8.0,
            TrapType::Portal => 0.0,
        }
    }

    pub fn hitbox_radius(self) -> f32 {
        match self {
            TrapType::BigBomb => 5.0,
            TrapType::SmallBomb => 3.0,
            TrapType::Portal => 1.0,
        }
    }

    pub fn is_hazard(self) -> bool {
        !matches!(self, TrapType::Portal)
    }
}

/// Deduced state of a catalog trap
///
/// `Revealed` and `Disabled` are terminal until the session resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrapState {
    #[default]
    NotScanned,
    Revealed,
    Disabled,
}

impl TrapState {
    /// Still plausible as the real hazard
    pub fn is_live(self) -> bool {
        self != TrapState::Disabled
    }
}

/// Static trap record. Dynamic state lives in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trap {
    pub id: TrapId,
    #[serde(rename = "type")]
    pub trap_type: TrapType,
    pub location: WorldPos,
    /// Filled in by the registry from the area index
    #[serde(skip_deserializing, default = "default_area")]
    pub area: AreaTag,
    #[serde(default)]
    pub label: String,
}

fn default_area() -> AreaTag {
    AreaTag::Entry
}

impl Trap {
    pub fn blast_radius(&self) -> f32 {
        self.trap_type.blast_radius()
    }

    pub fn hitbox_radius(&self) -> f32 {
        self.trap_type.hitbox_radius()
    }

    /// Same spot on the horizontal plane, within the catalog tolerance.
    pub fn location_equals(&self, pos: &WorldPos) -> bool {
        distance_2d(&self.location, pos) < LOCATION_EPSILON
    }
}

/// How a trap set constrains its members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrapSetKind {
    /// Members come in triads sharing `id % 3`; exactly one lane is live.
    Lanes,
    /// Exactly one live subgroup; confirming any member kills the rest.
    Exclusive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapSet {
    pub name: String,
    pub kind: TrapSetKind,
    pub ids: Vec<TrapId>,
}

impl TrapSet {
    pub fn contains(&self, id: TrapId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_superset_of(&self, ids: &[TrapId]) -> bool {
        ids.iter().all(|id| self.contains(*id))
    }
}

/// Lane of a member of the lane set
#[inline]
pub fn lane_of(id: TrapId) -> u32 {
    id % 3
}

/// Verdict of a trap scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanResult {
    #[default]
    None,
    /// A trap is within 15y
    Discover,
    /// A trap is within 36y but not within 15y
    Sense,
    /// No trap within 36y
    NotSense,
}
