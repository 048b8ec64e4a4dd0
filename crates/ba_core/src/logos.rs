//! Logos actions
//!
//! Decodes the two logos actions a character carries and picks the next
//! player whose Protect / Shell is about to run out. Casting is left to the
//! host.

use serde::{Deserialize, Serialize};

use crate::classify::{EntityKind, WorldEntity};
use crate::config::ShieldOptions;
use crate::geometry::WorldPos;

/// Status whose param packs the carried logos actions
pub const CARRIED_LOGOS_STATUS: u32 = 1618;
pub const LOGOS_PROTECT_ACTION: u32 = 26;
pub const LOGOS_SHELL_ACTION: u32 = 27;
pub const PROTECT_STATUS: u32 = 1642;
pub const SHELL_STATUS: u32 = 1643;
/// Shield targets must stand closer than this
pub const SHIELD_RANGE: f32 = 25.0;

/// Wisdom logos actions: (action id, status id, name)
pub const WISDOMS: [(u32, u32, &str); 14] = [
    (1, 1631, "Wizard"),
    (2, 1632, "Martialist"),
    (3, 1633, "Platebearer"),
    (4, 1634, "Guardian"),
    (5, 1635, "Ordained"),
    (6, 1636, "Skirmisher"),
    (7, 1637, "Watcher"),
    (8, 1638, "Templar"),
    (9, 1639, "Irregular"),
    (10, 1640, "Rogue"),
    (52, 1739, "Elder"),
    (53, 1740, "Duelist"),
    (54, 1741, "Fiendhunter"),
    (55, 1742, "Indomitable"),
];

pub fn is_wisdom(action: u32) -> bool {
    WISDOMS.iter().any(|(id, _, _)| *id == action)
}

pub fn wisdom_name(action: u32) -> Option<&'static str> {
    WISDOMS.iter().find(|(id, _, _)| *id == action).map(|(_, _, name)| *name)
}

/// The two logos actions slotted by a character; 0 is an empty slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedLogos {
    pub first: u32,
    pub second: u32,
}

impl CarriedLogos {
    /// Unpack a status param: high byte first, low byte second. A Wisdom is
    /// always listed first.
    pub fn from_param(param: u32) -> Self {
        let (first, second) = (param >> 8, param & 0xFF);
        if !is_wisdom(first) && is_wisdom(second) {
            Self { first: second, second: first }
        } else {
            Self { first, second }
        }
    }

    pub fn of(entity: &WorldEntity) -> Self {
        entity.status(CARRIED_LOGOS_STATUS).map_or_else(Self::default, |s| Self::from_param(s.param))
    }

    pub fn carries(&self, action: u32) -> bool {
        action != 0 && (self.first == action || self.second == action)
    }

    pub fn is_empty(&self) -> bool {
        self.first == 0 && self.second == 0
    }

    /// e.g. `"Guardian + 26"`, `"-"` when nothing is slotted
    pub fn label(&self) -> String {
        let name = |action: u32| match wisdom_name(action) {
            Some(name) => name.to_string(),
            None => action.to_string(),
        };
        match (self.first, self.second) {
            (0, 0) => "-".to_string(),
            (action, 0) | (0, action) => name(action),
            (first, second) => format!("{} + {}", name(first), name(second)),
        }
    }
}

impl ShieldOptions {
    /// The shield run needs at least one check on, and every checked
    /// shield slotted.
    pub fn can_run(&self, carried: &CarriedLogos) -> bool {
        (self.check_protect || self.check_shell)
            && (!self.check_protect || carried.carries(LOGOS_PROTECT_ACTION))
            && (!self.check_shell || carried.carries(LOGOS_SHELL_ACTION))
    }

    /// A missing shield counts as zero seconds left.
    pub fn needs_shield(&self, player: &WorldEntity) -> bool {
        let threshold = self.threshold_secs();
        let due = |status: u32| {
            player.status(status).map_or(0.0, |s| s.remaining_secs) <= threshold
        };
        (self.check_protect && due(PROTECT_STATUS)) || (self.check_shell && due(SHELL_STATUS))
    }
}

/// First targetable player in range, other than `current_target`, with a
/// checked shield due for a refresh.
pub fn next_shield_target<'a>(
    entities: &'a [WorldEntity],
    player_pos: &WorldPos,
    current_target: Option<u64>,
    options: &ShieldOptions,
) -> Option<&'a WorldEntity> {
    if !options.check_protect && !options.check_shell {
        return None;
    }
    entities.iter().find(|e| {
        e.kind == EntityKind::Player
            && Some(e.object_id) != current_target
            && e.targetable
            && (e.position - *player_pos).norm() < SHIELD_RANGE
            && options.needs_shield(e)
    })
}
