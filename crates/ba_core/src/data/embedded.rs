//! Catalog data embedded at compile time
//!
//! `include_str!` puts the JSON catalogs into the binary; they are parsed on
//! first access and shared for the rest of the process.

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::Catalog;

pub const AREAS_JSON: &str = include_str!("../../../../data/areas.json");

pub const TRAPS_JSON: &str = include_str!("../../../../data/traps.json");

pub const MOBS_JSON: &str = include_str!("../../../../data/mobs.json");

pub const PORTAL_CALLOUTS_JSON: &str = include_str!("../../../../data/portal_callouts.json");

static CATALOG: Lazy<Arc<Catalog>> = Lazy::new(|| {
    let catalog = Catalog::from_json(AREAS_JSON, TRAPS_JSON, MOBS_JSON, PORTAL_CALLOUTS_JSON)
        .expect("Embedded catalog data is corrupted");
    log::info!(
        "Embedded catalog ready: {} areas, {} traps, {} mobs",
        catalog.areas.len(),
        catalog.traps.len(),
        catalog.mobs.len()
    );
    Arc::new(catalog)
});

/// Embedded catalog, parsed on first call
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

/// Shared handle to the embedded catalog
pub fn shared_catalog() -> Arc<Catalog> {
    Arc::clone(&CATALOG)
}
