//! Trap catalog and deduction
//!
//! - [`registry`]: static trap records and trap sets
//! - [`engine`]: per-session trap state and the inference rules

pub mod engine;
pub mod registry;
pub mod types;

pub use engine::{DiscoveredTrap, Observation, StateCounts, TrapStateEngine, FAR_RING, NEAR_RING};
pub use registry::{TrapRegistry, TRAP_SCHEMA_VERSION};
pub use types::{lane_of, ScanResult, Trap, TrapId, TrapSet, TrapSetKind, TrapState, TrapType};
