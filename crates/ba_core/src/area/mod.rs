//! Area Index
//!
//! Static partition of the Arsenal into named rectangles on the X/Z plane.
//! Each area lists the recommended spots to stand on when scanning.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DataError;
use crate::geometry::{Footprint, WorldPos};

pub const AREA_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AreaTag {
    Entry,
    CorridorFromArt,
    CorridorFromOwain,
    CircularPlatform,
    OctagonRoomFromRaiden,
    OctagonRoomToRoomGroup1,
    OctagonRoomToRoomGroup2,
    IceRoom1,
    IceRoom2,
    WaterRoom1,
    WaterRoom2,
    LightningRoom1,
    LightningRoom2,
    WindRoom1,
    WindRoom2,
    FireRoom1,
    FireRoom2,
    EarthRoom1,
    EarthRoom2,
}

/// Element of a first room-group chamber, used in callouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Lightning,
    Wind,
    Ice,
    Water,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Lightning => "Lightning",
            Element::Wind => "Wind",
            Element::Ice => "Ice",
            Element::Water => "Water",
        };
        f.write_str(name)
    }
}

impl AreaTag {
    /// Element of the six first room-group chambers; `None` elsewhere.
    pub fn element(self) -> Option<Element> {
        match self {
            AreaTag::FireRoom1 => Some(Element::Fire),
            AreaTag::EarthRoom1 => Some(Element::Earth),
            AreaTag::LightningRoom1 => Some(Element::Lightning),
            AreaTag::WindRoom1 => Some(Element::Wind),
            AreaTag::IceRoom1 => Some(Element::Ice),
            AreaTag::WaterRoom1 => Some(Element::Water),
            _ => None,
        }
    }

    /// Rooms where a triggered trap is always a small bomb.
    pub fn holds_small_bombs(self) -> bool {
        matches!(
            self,
            AreaTag::CircularPlatform
                | AreaTag::OctagonRoomFromRaiden
                | AreaTag::OctagonRoomToRoomGroup2
        )
    }
}

/// Recommended place to stand when scanning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSpot {
    pub center: WorldPos,
    pub radius: f32,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub tag: AreaTag,
    pub name: String,
    pub origin: WorldPos,
    pub dims: WorldPos,
    #[serde(default)]
    pub scan_spots: Vec<ScanSpot>,
}

impl Area {
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.origin, self.dims)
    }

    pub fn contains(&self, pos: &WorldPos) -> bool {
        self.footprint().contains(pos)
    }
}

#[derive(Debug, Deserialize)]
struct AreaFile {
    schema_version: u32,
    areas: Vec<Area>,
}

/// Immutable lookup over all areas
#[derive(Debug, Clone)]
pub struct AreaIndex {
    areas: Vec<Area>,
}

impl AreaIndex {
    /// Build the index, rejecting duplicate tags and overlapping footprints.
    pub fn new(areas: Vec<Area>) -> Result<Self, DataError> {
        for (i, a) in areas.iter().enumerate() {
            for b in &areas[i + 1..] {
                if a.tag == b.tag {
                    return Err(DataError::DuplicateArea(a.tag));
                }
                if a.footprint().overlaps(&b.footprint()) {
                    return Err(DataError::OverlappingAreas { first: a.tag, second: b.tag });
                }
            }
        }
        Ok(Self { areas })
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let file: AreaFile = serde_json::from_str(json)
            .map_err(|source| DataError::Parse { catalog: "area", source })?;
        if file.schema_version != AREA_SCHEMA_VERSION {
            return Err(DataError::SchemaVersion {
                catalog: "area",
                found: file.schema_version,
                expected: AREA_SCHEMA_VERSION,
            });
        }
        log::debug!("Loaded {} areas", file.areas.len());
        Self::new(file.areas)
    }

    /// The unique area whose footprint contains `pos`, if any.
    pub fn locate(&self, pos: &WorldPos) -> Option<&Area> {
        self.areas.iter().find(|area| area.contains(pos))
    }

    pub fn locate_tag(&self, pos: &WorldPos) -> Option<AreaTag> {
        self.locate(pos).map(|area| area.tag)
    }

    pub fn get(&self, tag: AreaTag) -> Option<&Area> {
        self.areas.iter().find(|area| area.tag == tag)
    }

    pub fn scan_spots_of(&self, tag: AreaTag) -> &[ScanSpot] {
        self.get(tag).map(|area| area.scan_spots.as_slice()).unwrap_or(&[])
    }

    pub fn all(&self) -> &[Area] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
