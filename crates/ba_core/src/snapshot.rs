//! Render snapshots
//!
//! The update tick is the only writer. It builds a complete snapshot and
//! swaps it into a [`SnapshotCell`]; the render callback clones the `Arc`
//! and iterates without holding any lock.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use crate::area::{AreaTag, ScanSpot};
use crate::geometry::WorldPos;
use crate::mob::{AggroType, SIGHT_CONE_RADIANS};
use crate::trap::{DiscoveredTrap, TrapId, TrapState, TrapType};

/// Latest published value of `T`
///
/// The mutex guards the pointer swap only.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    current: Mutex<Arc<T>>,
}

impl<T> SnapshotCell<T> {
    pub fn new(value: T) -> Self {
        Self { current: Mutex::new(Arc::new(value)) }
    }

    pub fn publish(&self, value: T) {
        let next = Arc::new(value);
        let mut slot = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = next;
    }

    pub fn latest(&self) -> Arc<T> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Non-blocking read. `None` while the writer holds the slot.
    pub fn try_latest(&self) -> Option<Arc<T>> {
        match self.current.try_lock() {
            Ok(slot) => Some(Arc::clone(&slot)),
            Err(TryLockError::Poisoned(poisoned)) => Some(Arc::clone(&poisoned.into_inner())),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

impl<T: Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

// ========== Trap Board ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardTrap {
    pub id: TrapId,
    pub trap_type: TrapType,
    pub location: WorldPos,
    pub area: AreaTag,
    pub state: TrapState,
    pub blast_radius: f32,
    pub hitbox_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardScanSpot {
    pub area: AreaTag,
    pub spot: ScanSpot,
}

/// Everything the trap overlay draws in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrapBoard {
    /// Catalog traps within view distance
    pub traps: Vec<BoardTrap>,
    /// Trap objects seen this session
    pub discovered: Vec<DiscoveredTrap>,
    /// Spots of areas still holding unscanned traps
    pub scan_spots: Vec<BoardScanSpot>,
    pub possible_portal_areas: BTreeSet<AreaTag>,
    pub chest_area: Option<AreaTag>,
}

impl TrapBoard {
    pub fn trap(&self, id: TrapId) -> Option<&BoardTrap> {
        self.traps.iter().find(|t| t.id == id)
    }
}

// ========== Mobs ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobView {
    pub object_id: u64,
    pub name_id: u32,
    pub position: WorldPos,
    pub rotation: f32,
    pub hitbox_radius: f32,
    pub aggro: AggroType,
    pub aggro_distance: f32,
}

impl MobView {
    /// Full width of the detection cone; `None` for all-around detection.
    pub fn sight_cone(&self) -> Option<f32> {
        (self.aggro == AggroType::Sight).then_some(SIGHT_CONE_RADIANS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MobSnapshot {
    pub mobs: Vec<MobView>,
}

impl MobSnapshot {
    pub fn len(&self) -> usize {
        self.mobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }
}
