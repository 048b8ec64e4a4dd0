//! Trap State Engine
//!
//! Deduces which catalog traps can still be live from scan verdicts and
//! direct sightings. Every inference is applied as soon as it can be made;
//! nothing is ever undone short of [`TrapStateEngine::reset_all`].
//!
//! ## State machine
//! - `NotScanned -> Disabled` when a scan or a sighting proves it dead
//! - `NotScanned | Disabled -> Revealed` when the trap itself is seen
//! - `Revealed` is never downgraded

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::{ScanResult, Trap, TrapId, TrapState, TrapType};
use crate::area::AreaTag;
use crate::data::Catalog;
use crate::geometry::{distance_2d, is_finite, WorldPos, LOCATION_EPSILON};
use crate::host::{NotificationSink, Severity};

/// A scan reaches this far for a `Discover` verdict
pub const NEAR_RING: f32 = 15.0;
/// A scan reaches this far for a `Sense` verdict
pub const FAR_RING: f32 = 36.0;

/// A trap object seen in the world during this session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredTrap {
    pub trap_type: TrapType,
    pub location: WorldPos,
    pub area: Option<AreaTag>,
    /// Catalog id, `None` for a location missing from the catalog
    pub trap_id: Option<TrapId>,
}

/// What a sighting did to the board
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Bad input
    Ignored,
    /// Same spot was already processed this session
    AlreadyKnown,
    Revealed {
        id: TrapId,
        trap_type: TrapType,
        area: AreaTag,
        disabled: Vec<TrapId>,
    },
    Unregistered {
        trap_type: TrapType,
        location: WorldPos,
        area: Option<AreaTag>,
        disabled: Vec<TrapId>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub not_scanned: usize,
    pub revealed: usize,
    pub disabled: usize,
}

#[derive(Debug, Clone)]
pub struct TrapStateEngine {
    catalog: Arc<Catalog>,
    /// Parallel to `catalog.traps.all_traps()`
    states: Vec<TrapState>,
    discovered: Vec<DiscoveredTrap>,
}

impl TrapStateEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let states = vec![TrapState::NotScanned; catalog.traps.len()];
        Self { catalog, states, discovered: Vec::new() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self, id: TrapId) -> Option<TrapState> {
        self.catalog.traps.slot_of(id).map(|slot| self.states[slot])
    }

    /// Every catalog trap with its current state, in id order.
    pub fn traps(&self) -> impl Iterator<Item = (&Trap, TrapState)> + '_ {
        self.catalog.traps.all_traps().iter().zip(self.states.iter().copied())
    }

    pub fn discovered(&self) -> &[DiscoveredTrap] {
        &self.discovered
    }

    pub fn counts(&self) -> StateCounts {
        self.states.iter().fold(StateCounts::default(), |mut acc, state| {
            match state {
                TrapState::NotScanned => acc.not_scanned += 1,
                TrapState::Revealed => acc.revealed += 1,
                TrapState::Disabled => acc.disabled += 1,
            }
            acc
        })
    }

    /// Areas whose portal may still be any of their portal traps.
    pub fn possible_portal_areas(&self) -> BTreeSet<AreaTag> {
        self.traps()
            .filter(|(trap, state)| trap.trap_type == TrapType::Portal && state.is_live())
            .map(|(trap, _)| trap.area)
            .collect()
    }

    /// An area keeps its scan spots while any of its traps is unresolved.
    pub fn area_needs_scan(&self, area: AreaTag) -> bool {
        self.catalog
            .traps
            .traps_in_area(area)
            .iter()
            .any(|id| self.state(*id) == Some(TrapState::NotScanned))
    }

    /// Apply one scan verdict taken at `center`.
    ///
    /// Returns the ids that went from `NotScanned` to `Disabled`.
    pub fn update_by_scan_result(&mut self, center: &WorldPos, result: ScanResult) -> Vec<TrapId> {
        if result == ScanResult::None {
            return Vec::new();
        }
        if !is_finite(center) {
            debug!(?result, "Ignoring scan result at non-finite position");
            return Vec::new();
        }

        let mut near = Vec::new();
        let mut mid = Vec::new();
        for (trap, state) in self.traps() {
            if state != TrapState::NotScanned {
                continue;
            }
            let distance = distance_2d(&trap.location, center);
            if distance <= NEAR_RING {
                near.push(trap.id);
            } else if distance <= FAR_RING {
                mid.push(trap.id);
            }
        }

        let mut disabled = Vec::new();
        match result {
            ScanResult::None => {}
            ScanResult::NotSense => {
                self.disable_all(near.iter().chain(mid.iter()).copied(), &mut disabled);
            }
            ScanResult::Discover => {
                // The live one turns Revealed once its object is seen.
                self.disable_all(near.iter().copied(), &mut disabled);
            }
            ScanResult::Sense => {
                if !near.is_empty() {
                    let in_lane_set = self
                        .catalog
                        .traps
                        .lane_set()
                        .is_some_and(|lanes| lanes.is_superset_of(&near));
                    self.disable_all(near.iter().copied(), &mut disabled);
                    if in_lane_set {
                        let mates = self.catalog.traps.lane_mates_of(&near);
                        self.disable_all(mates, &mut disabled);
                    }
                }
                mid.retain(|id| self.state(*id) == Some(TrapState::NotScanned));
                if !mid.is_empty() {
                    let dead = self.catalog.traps.complement_of(&mid);
                    self.disable_all(dead, &mut disabled);
                }
            }
        }

        debug!(
            ?result,
            near = near.len(),
            mid = mid.len(),
            disabled = disabled.len(),
            "Applied scan result"
        );
        disabled
    }

    /// Process a trap or portal object seen at `location`.
    pub fn on_trap_observed(
        &mut self,
        location: &WorldPos,
        trap_type: TrapType,
        area: Option<AreaTag>,
        sink: &mut dyn NotificationSink,
    ) -> Observation {
        if !is_finite(location) {
            return Observation::Ignored;
        }
        if self.discovered.iter().any(|d| distance_2d(&d.location, location) < LOCATION_EPSILON) {
            return Observation::AlreadyKnown;
        }

        let found = self
            .catalog
            .traps
            .find_by_location(location, LOCATION_EPSILON)
            .map(|trap| (trap.id, trap.trap_type, trap.area));

        match found {
            Some((id, catalog_type, trap_area)) => {
                if catalog_type != trap_type {
                    debug!(id, ?catalog_type, ?trap_type, "Observed type differs from catalog");
                }
                self.reveal(id);
                let mut disabled = Vec::new();
                let dead = self.catalog.traps.complement_of(&[id]);
                self.disable_all(dead, &mut disabled);
                self.discovered.push(DiscoveredTrap {
                    trap_type: catalog_type,
                    location: *location,
                    area: Some(trap_area),
                    trap_id: Some(id),
                });
                debug!(id, disabled = disabled.len(), "Trap revealed");

                if catalog_type == TrapType::Portal {
                    let text = match trap_area.element() {
                        Some(element) => format!("{} portal!", element),
                        None => format!("Portal revealed in {:?}", trap_area),
                    };
                    sink.announce(&text, true);
                }

                Observation::Revealed { id, trap_type: catalog_type, area: trap_area, disabled }
            }
            None => {
                let entry = format!(
                    "{{ \"id\": ?, \"type\": \"{:?}\", \"location\": [{}, {}, {}] }}",
                    trap_type, location.x, location.y, location.z
                );
                warn!(?trap_type, ?area, "New trap location: {}", entry);
                sink.diagnostic(
                    Severity::Warn,
                    &format!("New trap location in {:?}: {}", area, entry),
                );

                // Rooms with uncatalogued spots hold a single live trap.
                let mut disabled = Vec::new();
                if let Some(tag) = area {
                    let in_area = self.catalog.traps.traps_in_area(tag).to_vec();
                    self.disable_all(in_area, &mut disabled);
                }
                self.discovered.push(DiscoveredTrap {
                    trap_type,
                    location: *location,
                    area,
                    trap_id: None,
                });

                Observation::Unregistered { trap_type, location: *location, area, disabled }
            }
        }
    }

    /// Back to the initial board: every trap `NotScanned`, nothing discovered.
    pub fn reset_all(&mut self) {
        self.states.fill(TrapState::NotScanned);
        self.discovered.clear();
        info!("Trap states reset");
    }

    fn reveal(&mut self, id: TrapId) {
        if let Some(slot) = self.catalog.traps.slot_of(id) {
            self.states[slot] = TrapState::Revealed;
        }
    }

    /// `NotScanned -> Disabled`; other states are left alone.
    fn disable(&mut self, id: TrapId) -> bool {
        match self.catalog.traps.slot_of(id) {
            Some(slot) if self.states[slot] == TrapState::NotScanned => {
                self.states[slot] = TrapState::Disabled;
                true
            }
            _ => false,
        }
    }

    fn disable_all(&mut self, ids: impl IntoIterator<Item = TrapId>, out: &mut Vec<TrapId>) {
        for id in ids {
            if self.disable(id) {
                out.push(id);
            }
        }
    }
}
