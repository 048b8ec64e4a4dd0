use thiserror::Error;

use crate::area::AreaTag;
use crate::config::ConfigError;

/// Defects in a static catalog, detected while loading it.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to parse {catalog} catalog: {source}")]
    Parse {
        catalog: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported {catalog} schema version {found} (expected {expected})")]
    SchemaVersion { catalog: &'static str, found: u32, expected: u32 },

    #[error("Duplicate area tag: {0:?}")]
    DuplicateArea(AreaTag),

    #[error("Areas {first:?} and {second:?} overlap")]
    OverlappingAreas { first: AreaTag, second: AreaTag },

    #[error("Duplicate trap id: {0}")]
    DuplicateTrap(u32),

    #[error("Trap {id} lies outside every area")]
    UnplacedTrap { id: u32 },

    #[error("Trap set '{set}' references unknown trap {id}")]
    UnknownSetMember { set: String, id: u32 },

    #[error("Lane set '{set}' has {len} members, expected a multiple of 3")]
    RaggedLaneSet { set: String, len: usize },

    #[error("More than one lane set: '{first}' and '{second}'")]
    MultipleLaneSets { first: String, second: String },

    #[error("Duplicate mob record: {0}")]
    DuplicateMob(u32),

    #[error("Callout layout '{layout}' must list {expected} portals per party for 6 parties")]
    CalloutShape { layout: String, expected: usize },
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
