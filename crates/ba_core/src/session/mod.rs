//! Session Lifecycle
//!
//! One [`Session`] per plugin instance. The host drives it from two places:
//!
//! - the update tick calls [`Session::tick`], the only mutator
//! - the render callback reads [`Session::board`] / [`Session::mobs`] /
//!   [`Session::dashboard`] handles
//!
//! Zone changes reset everything back to a fresh board. The tank dashboard
//! is refreshed in every territory; trap and mob tracking only in Hydatos.

mod throttle;

pub use throttle::Throttle;

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::area::AreaTag;
use crate::classify::{classify, Classification, WorldEntity};
use crate::config::TrapperConfig;
use crate::dashboard::TankDashboard;
use crate::data::Catalog;
use crate::geometry::{distance_2d, WorldPos};
use crate::host::{EntityFeed, NotificationSink};
use crate::logos::next_shield_target;
use crate::scan::{ScanDecoder, ScanSignal};
use crate::snapshot::{BoardScanSpot, BoardTrap, MobSnapshot, MobView, SnapshotCell, TrapBoard};
use crate::trap::{Observation, ScanResult, TrapId, TrapStateEngine};

/// Hydatos territory id
pub const HYDATOS_TERRITORY_ID: u32 = 827;
/// The Arsenal sits below this height in Hydatos
pub const ARSENAL_CEILING_Y: f32 = 200.0;

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Verdict consumed this tick
    pub scan: ScanResult,
    /// Traps disabled by that verdict
    pub scan_disabled: Vec<TrapId>,
    /// Whether the entity feed was polled
    pub polled: bool,
    pub observations: Vec<Observation>,
}

pub struct Session {
    catalog: Arc<Catalog>,
    config: TrapperConfig,
    engine: TrapStateEngine,
    decoder: ScanDecoder,
    throttle: Throttle,
    territory: Option<u32>,
    pending_scan: ScanResult,
    chest_found_at: Option<AreaTag>,
    possible_portal_areas: BTreeSet<AreaTag>,
    board: Arc<SnapshotCell<TrapBoard>>,
    mobs: Arc<SnapshotCell<MobSnapshot>>,
    dashboard: Arc<SnapshotCell<TankDashboard>>,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, config: TrapperConfig) -> Self {
        let engine = TrapStateEngine::new(Arc::clone(&catalog));
        let possible_portal_areas = engine.possible_portal_areas();
        Self {
            decoder: ScanDecoder::new(config.scan_log_messages.clone()),
            throttle: Throttle::new(config.poll_interval_ms),
            catalog,
            config,
            engine,
            territory: None,
            pending_scan: ScanResult::None,
            chest_found_at: None,
            possible_portal_areas,
            board: Arc::new(SnapshotCell::default()),
            mobs: Arc::new(SnapshotCell::default()),
            dashboard: Arc::new(SnapshotCell::default()),
        }
    }

    pub fn config(&self) -> &TrapperConfig {
        &self.config
    }

    pub fn engine(&self) -> &TrapStateEngine {
        &self.engine
    }

    pub fn territory(&self) -> Option<u32> {
        self.territory
    }

    /// Tracking runs only inside Hydatos.
    pub fn is_active(&self) -> bool {
        self.territory == Some(HYDATOS_TERRITORY_ID)
    }

    pub fn in_arsenal(&self, player_pos: &WorldPos) -> bool {
        self.is_active()
            && player_pos.y < ARSENAL_CEILING_Y
            && self.catalog.areas.locate_tag(player_pos) != Some(AreaTag::Entry)
    }

    pub fn pending_scan(&self) -> ScanResult {
        self.pending_scan
    }

    pub fn chest_found_at(&self) -> Option<AreaTag> {
        self.chest_found_at
    }

    pub fn possible_portal_areas(&self) -> &BTreeSet<AreaTag> {
        &self.possible_portal_areas
    }

    /// Handle for the render side
    pub fn board(&self) -> Arc<SnapshotCell<TrapBoard>> {
        Arc::clone(&self.board)
    }

    /// Handle for the render side
    pub fn mobs(&self) -> Arc<SnapshotCell<MobSnapshot>> {
        Arc::clone(&self.mobs)
    }

    /// Handle for the render side
    pub fn dashboard(&self) -> Arc<SnapshotCell<TankDashboard>> {
        Arc::clone(&self.dashboard)
    }

    /// Next player to receive Protect / Shell, per the shield options.
    pub fn next_shield_target(
        &self,
        player_pos: &WorldPos,
        current_target: Option<u64>,
        feed: &dyn EntityFeed,
    ) -> Option<WorldEntity> {
        let entities = feed.entities();
        next_shield_target(&entities, player_pos, current_target, &self.config.shield).cloned()
    }

    pub fn on_zone_changed(&mut self, territory: u32) {
        self.territory = Some(territory);
        self.reset();
        info!(territory, active = self.is_active(), "Zone changed");
    }

    /// Decode a raw signal and keep it for the next tick. Latest verdict wins.
    pub fn on_scan_signal(&mut self, signal: &ScanSignal) -> ScanResult {
        if !self.config.deduction_enabled {
            return ScanResult::None;
        }
        let result = self.decoder.decode(signal);
        if result != ScanResult::None {
            debug!(?result, "Scan verdict received");
            self.pending_scan = result;
        }
        result
    }

    /// Back to a fresh board with empty snapshots.
    pub fn reset(&mut self) {
        self.engine.reset_all();
        self.pending_scan = ScanResult::None;
        self.chest_found_at = None;
        self.throttle.reset();
        self.possible_portal_areas = self.engine.possible_portal_areas();
        self.board.publish(TrapBoard::default());
        self.mobs.publish(MobSnapshot::default());
        self.dashboard.publish(TankDashboard::default());
    }

    pub fn tick(
        &mut self,
        now_ms: u64,
        player_pos: &WorldPos,
        feed: &dyn EntityFeed,
        sink: &mut dyn NotificationSink,
    ) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_active() {
            if self.throttle.ready(now_ms) {
                self.refresh_dashboard(&feed.entities());
            }
            return report;
        }

        if !self.config.deduction_enabled {
            self.pending_scan = ScanResult::None;
            if self.throttle.ready(now_ms) {
                self.board.publish(TrapBoard::default());
                self.mobs.publish(MobSnapshot::default());
                self.refresh_dashboard(&feed.entities());
                report.polled = true;
            }
            return report;
        }

        report.scan = std::mem::take(&mut self.pending_scan);
        report.scan_disabled = self.engine.update_by_scan_result(player_pos, report.scan);

        if self.throttle.ready(now_ms) {
            let entities = feed.entities();
            report.observations = self.poll(player_pos, &entities, sink);
            self.refresh_dashboard(&entities);
            self.possible_portal_areas = self.engine.possible_portal_areas();
            self.board.publish(self.build_board(player_pos));
            report.polled = true;
        }
        report
    }

    fn poll(
        &mut self,
        player_pos: &WorldPos,
        entities: &[WorldEntity],
        sink: &mut dyn NotificationSink,
    ) -> Vec<Observation> {
        let mut observations = Vec::new();
        let mut mobs = Vec::new();

        for entity in entities {
            let area = self.catalog.areas.locate_tag(&entity.position);
            let class =
                classify(entity, area, self.chest_found_at.is_some(), &self.catalog.mobs);
            match class {
                Classification::Chest { area, announce: true } => {
                    self.chest_found_at = area;
                    if let Some(element) = area.and_then(AreaTag::element) {
                        sink.announce(&format!("{} chest!", element), true);
                    }
                }
                Classification::Chest { .. } | Classification::Irrelevant => {}
                Classification::Trap(trap_type) => {
                    let observation =
                        self.engine.on_trap_observed(&entity.position, trap_type, area, sink);
                    if observation != Observation::AlreadyKnown {
                        observations.push(observation);
                    }
                }
                Classification::Mob(sighting) => {
                    // Species without aggro data are not drawn
                    if sighting.record.is_none()
                        || distance_2d(&sighting.position, player_pos) > self.config.mob_view_distance
                    {
                        continue;
                    }
                    mobs.push(MobView {
                        object_id: sighting.object_id,
                        name_id: sighting.name_id,
                        position: sighting.position,
                        rotation: sighting.rotation,
                        hitbox_radius: sighting.hitbox_radius,
                        aggro: sighting.aggro(),
                        aggro_distance: sighting.aggro_distance(),
                    });
                }
            }
        }

        let counts = self.engine.counts();
        debug!(
            mobs = mobs.len(),
            observed = observations.len(),
            not_scanned = counts.not_scanned,
            revealed = counts.revealed,
            disabled = counts.disabled,
            "Polled entities"
        );
        self.mobs.publish(MobSnapshot { mobs });
        observations
    }

    fn refresh_dashboard(&self, entities: &[WorldEntity]) {
        let dashboard = TankDashboard::build(entities, &self.config.dashboard);
        if !dashboard.is_empty() {
            debug!(tanks = dashboard.len(), "Dashboard refreshed");
        }
        self.dashboard.publish(dashboard);
    }

    fn build_board(&self, player_pos: &WorldPos) -> TrapBoard {
        let view = self.config.trap_view_distance;
        let traps = self
            .engine
            .traps()
            .filter(|(trap, _)| distance_2d(&trap.location, player_pos) <= view)
            .map(|(trap, state)| BoardTrap {
                id: trap.id,
                trap_type: trap.trap_type,
                location: trap.location,
                area: trap.area,
                state,
                blast_radius: trap.blast_radius(),
                hitbox_radius: trap.hitbox_radius(),
            })
            .collect();

        let scan_spots = self
            .catalog
            .areas
            .all()
            .iter()
            .filter(|area| self.engine.area_needs_scan(area.tag))
            .flat_map(|area| {
                area.scan_spots.iter().map(move |spot| BoardScanSpot { area: area.tag, spot: spot.clone() })
            })
            .filter(|entry| distance_2d(&entry.spot.center, player_pos) <= view)
            .collect();

        TrapBoard {
            traps,
            discovered: self.engine.discovered().to_vec(),
            scan_spots,
            possible_portal_areas: self.possible_portal_areas.clone(),
            chest_area: self.chest_found_at,
        }
    }
}

#[cfg(test)]
mod tests;
