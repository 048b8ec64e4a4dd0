//! # ba_core - Baldesion Arsenal Trap Deduction Engine
//!
//! Tracks the hidden traps of the Arsenal from scan verdicts and direct
//! sightings, and keeps render-ready snapshots of the trap board and nearby
//! mobs for a host overlay.
//!
//! ## Features
//! - Eager, monotonic trap-state deduction over fixed trap sets
//! - Per-poll entity classification (chests, traps, mobs)
//! - Chat / log-message scan verdict decoding
//! - Non-blocking reads of the latest snapshot for the render callback
//! - Party portal callout planning
//! - Tank-stance dashboard and logos shield-target selection

pub mod area;
pub mod callout;
pub mod classify;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logos;
pub mod mob;
pub mod scan;
pub mod session;
pub mod snapshot;
pub mod trap;

pub use area::{Area, AreaIndex, AreaTag, Element, ScanSpot};
pub use classify::{classify, Classification, EntityKind, NpcKind, StatusEffect, WorldEntity};
pub use config::{ConfigError, DashboardOptions, ShieldOptions, TrapperConfig};
pub use dashboard::{TankDashboard, TankEntry, TankJob};
pub use data::{catalog, shared_catalog, Catalog};
pub use error::{CoreError, DataError, Result};
pub use geometry::WorldPos;
pub use host::{EntityFeed, Notification, NotificationSink, RecordingSink, Severity};
pub use logos::{next_shield_target, CarriedLogos};
pub use scan::{LogMessageRule, ScanDecoder, ScanSignal};
pub use session::{Session, TickReport, HYDATOS_TERRITORY_ID};
pub use snapshot::{MobSnapshot, SnapshotCell, TrapBoard};
pub use trap::{
    Observation, ScanResult, Trap, TrapId, TrapRegistry, TrapState, TrapStateEngine, TrapType,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
