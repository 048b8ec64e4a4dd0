//! Tank dashboard
//!
//! Nearby tank-job players, their carried logos, and whether a tank stance
//! is up. Rebuilt from the entity feed on every poll.

use serde::Serialize;

use crate::classify::{EntityKind, WorldEntity};
use crate::config::DashboardOptions;
use crate::logos::CarriedLogos;

/// Iron Will, Defiance, Grit, Royal Guard
pub const TANK_STANCE_STATUSES: [u32; 4] = [79, 91, 743, 1833];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TankJob {
    Gladiator,
    Marauder,
    Paladin,
    Warrior,
    DarkKnight,
    Gunbreaker,
}

impl TankJob {
    pub fn from_job_id(job_id: u32) -> Option<Self> {
        match job_id {
            1 => Some(Self::Gladiator),
            3 => Some(Self::Marauder),
            19 => Some(Self::Paladin),
            21 => Some(Self::Warrior),
            32 => Some(Self::DarkKnight),
            37 => Some(Self::Gunbreaker),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankEntry {
    pub object_id: u64,
    pub name: String,
    pub job: TankJob,
    pub logos: CarriedLogos,
    pub stance_active: bool,
}

impl TankEntry {
    pub fn from_entity(entity: &WorldEntity) -> Option<Self> {
        if entity.kind != EntityKind::Player {
            return None;
        }
        let job = TankJob::from_job_id(entity.job_id)?;
        Some(Self {
            object_id: entity.object_id,
            name: entity.name.clone(),
            job,
            logos: CarriedLogos::of(entity),
            stance_active: entity.has_any_status(&TANK_STANCE_STATUSES),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TankDashboard {
    pub tanks: Vec<TankEntry>,
}

impl TankDashboard {
    /// Tanks in feed order, filtered by `options.only_stance_on`.
    pub fn build(entities: &[WorldEntity], options: &DashboardOptions) -> Self {
        let tanks = entities
            .iter()
            .filter_map(TankEntry::from_entity)
            .filter(|tank| !options.only_stance_on || tank.stance_active)
            .collect();
        Self { tanks }
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }
}
