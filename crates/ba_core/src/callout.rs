//! Party portal callout
//!
//! Each of the six parties owns eight portal positions on the Hydatos map.
//! A callout is a header line followed by, for every portal, a map flag and
//! a numbered line pointing at it. This module only plans the steps; the
//! host's chat dispatcher formats and sends them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::catalog;
use crate::error::{CoreError, DataError, Result};

pub const CALLOUT_SCHEMA_VERSION: u32 = 1;
pub const PARTY_COUNT: usize = 6;
pub const PORTALS_PER_PARTY: usize = 8;
/// Pause before each flag + line pair
pub const STEP_DELAY_MS: u64 = 100;

/// Which portal numbering the party follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PortalLayout {
    #[default]
    Global,
    MoogleDc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatChannel {
    Party,
    Echo,
}

impl ChatChannel {
    pub fn from_party_flag(use_party_channel: bool) -> Self {
        if use_party_channel {
            ChatChannel::Party
        } else {
            ChatChannel::Echo
        }
    }
}

/// Map coordinates as shown on the in-game map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalloutStep {
    Header { channel: ChatChannel, party: u8 },
    Wait { ms: u64 },
    PlaceFlag { territory_id: u32, map_id: u32, point: MapPoint },
    /// Line announcing portal `portal` (1-based) at the current flag
    PortalLine { channel: ChatChannel, party: u8, portal: u8 },
}

#[derive(Debug, Deserialize)]
struct CalloutFile {
    schema_version: u32,
    territory_id: u32,
    map_id: u32,
    layouts: BTreeMap<PortalLayout, Vec<Vec<(f32, f32)>>>,
}

#[derive(Debug, Clone)]
pub struct PortalCallouts {
    territory_id: u32,
    map_id: u32,
    layouts: BTreeMap<PortalLayout, Vec<Vec<MapPoint>>>,
}

impl PortalCallouts {
    pub fn from_json(json: &str) -> std::result::Result<Self, DataError> {
        let file: CalloutFile = serde_json::from_str(json)
            .map_err(|source| DataError::Parse { catalog: "callout", source })?;
        if file.schema_version != CALLOUT_SCHEMA_VERSION {
            return Err(DataError::SchemaVersion {
                catalog: "callout",
                found: file.schema_version,
                expected: CALLOUT_SCHEMA_VERSION,
            });
        }

        let mut layouts = BTreeMap::new();
        for (layout, parties) in file.layouts {
            let well_formed = parties.len() == PARTY_COUNT
                && parties.iter().all(|portals| portals.len() == PORTALS_PER_PARTY);
            if !well_formed {
                return Err(DataError::CalloutShape {
                    layout: format!("{:?}", layout),
                    expected: PORTALS_PER_PARTY,
                });
            }
            let points = parties
                .into_iter()
                .map(|portals| portals.into_iter().map(|(x, y)| MapPoint { x, y }).collect())
                .collect();
            layouts.insert(layout, points);
        }

        Ok(Self { territory_id: file.territory_id, map_id: file.map_id, layouts })
    }

    pub fn territory_id(&self) -> u32 {
        self.territory_id
    }

    pub fn map_id(&self) -> u32 {
        self.map_id
    }

    /// Portal positions of `party` (1-based)
    pub fn portals(&self, layout: PortalLayout, party: u8) -> Option<&[MapPoint]> {
        let index = usize::from(party).checked_sub(1)?;
        self.layouts.get(&layout)?.get(index).map(Vec::as_slice)
    }

    pub fn plan(
        &self,
        layout: PortalLayout,
        party: u8,
        channel: ChatChannel,
    ) -> Result<Vec<CalloutStep>> {
        if !(1..=PARTY_COUNT).contains(&usize::from(party)) {
            return Err(CoreError::InvalidParameter(format!(
                "party number must be 1..={}, got {}",
                PARTY_COUNT, party
            )));
        }
        let portals = self.portals(layout, party).ok_or_else(|| {
            CoreError::InvalidParameter(format!("no portal positions for layout {:?}", layout))
        })?;

        let mut steps = Vec::with_capacity(1 + portals.len() * 3);
        steps.push(CalloutStep::Header { channel, party });
        for (i, point) in portals.iter().enumerate() {
            steps.push(CalloutStep::Wait { ms: STEP_DELAY_MS });
            steps.push(CalloutStep::PlaceFlag {
                territory_id: self.territory_id,
                map_id: self.map_id,
                point: *point,
            });
            steps.push(CalloutStep::PortalLine { channel, party, portal: (i + 1) as u8 });
        }
        Ok(steps)
    }
}

/// Plan a callout from the embedded layouts.
pub fn plan(layout: PortalLayout, party: u8, channel: ChatChannel) -> Result<Vec<CalloutStep>> {
    catalog().callouts.plan(layout, party, channel)
}
