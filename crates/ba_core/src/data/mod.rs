//! Static game data
//!
//! Areas, traps, trap sets, mob aggro records and party callout layouts.
//! All of it is immutable once loaded; only trap state changes at runtime,
//! and that lives in the engine.

pub mod embedded;

pub use embedded::{catalog, shared_catalog};

use crate::area::AreaIndex;
use crate::callout::PortalCallouts;
use crate::error::DataError;
use crate::mob::MobCatalog;
use crate::trap::TrapRegistry;

#[derive(Debug, Clone)]
pub struct Catalog {
    pub areas: AreaIndex,
    pub traps: TrapRegistry,
    pub mobs: MobCatalog,
    pub callouts: PortalCallouts,
}

impl Catalog {
    pub fn new(
        areas: AreaIndex,
        traps: TrapRegistry,
        mobs: MobCatalog,
        callouts: PortalCallouts,
    ) -> Self {
        Self { areas, traps, mobs, callouts }
    }

    /// Parse every catalog; traps are tagged against the parsed areas.
    pub fn from_json(
        areas_json: &str,
        traps_json: &str,
        mobs_json: &str,
        callouts_json: &str,
    ) -> Result<Self, DataError> {
        let areas = AreaIndex::from_json(areas_json)?;
        let traps = TrapRegistry::from_json(traps_json, &areas)?;
        let mobs = MobCatalog::from_json(mobs_json)?;
        let callouts = PortalCallouts::from_json(callouts_json)?;
        Ok(Self::new(areas, traps, mobs, callouts))
    }
}
