//! Trap Registry
//!
//! The fixed catalog of every known trap and the trap sets that tie them
//! together. Built once; never mutated afterwards.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use super::types::{lane_of, Trap, TrapId, TrapSet, TrapSetKind, TrapType};
use crate::area::{AreaIndex, AreaTag};
use crate::error::DataError;
use crate::geometry::{distance_2d, WorldPos};

pub const TRAP_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct TrapFile {
    schema_version: u32,
    traps: Vec<Trap>,
    trap_sets: Vec<TrapSet>,
}

#[derive(Debug, Clone)]
pub struct TrapRegistry {
    /// Sorted by id
    traps: Vec<Trap>,
    index: FxHashMap<TrapId, usize>,
    sets: Vec<TrapSet>,
    lane_set: Option<usize>,
    by_area: FxHashMap<AreaTag, Vec<TrapId>>,
}

impl TrapRegistry {
    /// Build the registry, tagging each trap with the area that contains it.
    pub fn new(
        mut traps: Vec<Trap>,
        sets: Vec<TrapSet>,
        areas: &AreaIndex,
    ) -> Result<Self, DataError> {
        traps.sort_by_key(|t| t.id);

        let mut index = FxHashMap::default();
        let mut by_area: FxHashMap<AreaTag, Vec<TrapId>> = FxHashMap::default();
        for (i, trap) in traps.iter_mut().enumerate() {
            if index.insert(trap.id, i).is_some() {
                return Err(DataError::DuplicateTrap(trap.id));
            }
            trap.area =
                areas.locate_tag(&trap.location).ok_or(DataError::UnplacedTrap { id: trap.id })?;
            by_area.entry(trap.area).or_default().push(trap.id);
        }

        let mut lane_set: Option<usize> = None;
        for (i, set) in sets.iter().enumerate() {
            if let Some(id) = set.ids.iter().find(|id| !index.contains_key(id)) {
                return Err(DataError::UnknownSetMember { set: set.name.clone(), id: *id });
            }
            if set.kind == TrapSetKind::Lanes {
                if set.ids.len() % 3 != 0 {
                    return Err(DataError::RaggedLaneSet {
                        set: set.name.clone(),
                        len: set.ids.len(),
                    });
                }
                if let Some(prev) = lane_set {
                    return Err(DataError::MultipleLaneSets {
                        first: sets[prev].name.clone(),
                        second: set.name.clone(),
                    });
                }
                lane_set = Some(i);
            }
        }

        Ok(Self { traps, index, sets, lane_set, by_area })
    }

    pub fn from_json(json: &str, areas: &AreaIndex) -> Result<Self, DataError> {
        let file: TrapFile = serde_json::from_str(json)
            .map_err(|source| DataError::Parse { catalog: "trap", source })?;
        if file.schema_version != TRAP_SCHEMA_VERSION {
            return Err(DataError::SchemaVersion {
                catalog: "trap",
                found: file.schema_version,
                expected: TRAP_SCHEMA_VERSION,
            });
        }
        log::debug!("Loaded {} traps in {} sets", file.traps.len(), file.trap_sets.len());
        Self::new(file.traps, file.trap_sets, areas)
    }

    pub fn all_traps(&self) -> &[Trap] {
        &self.traps
    }

    pub fn len(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    pub fn by_id(&self, id: TrapId) -> Option<&Trap> {
        self.index.get(&id).map(|&i| &self.traps[i])
    }

    pub fn contains(&self, id: TrapId) -> bool {
        self.index.contains_key(&id)
    }

    /// Position of `id` in [`Self::all_traps`]
    pub fn slot_of(&self, id: TrapId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn trap_sets(&self) -> &[TrapSet] {
        &self.sets
    }

    pub fn lane_set(&self) -> Option<&TrapSet> {
        self.lane_set.map(|i| &self.sets[i])
    }

    pub fn traps_in_area(&self, area: AreaTag) -> &[TrapId] {
        self.by_area.get(&area).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn portals(&self) -> impl Iterator<Item = &Trap> {
        self.traps.iter().filter(|t| t.trap_type == TrapType::Portal)
    }

    /// Ids provably dead once every id in `subset` is known to be live.
    ///
    /// Inside the lane set, every lane touched by `subset` is live and every
    /// other lane is dead. Otherwise the first exclusive set holding all of
    /// `subset` loses its remaining members. No holding set, no inference.
    pub fn complement_of(&self, subset: &[TrapId]) -> Vec<TrapId> {
        if subset.is_empty() {
            return Vec::new();
        }

        if let Some(lanes) = self.lane_set() {
            if lanes.is_superset_of(subset) {
                let live_lanes: FxHashSet<u32> = subset.iter().map(|id| lane_of(*id)).collect();
                return lanes
                    .ids
                    .iter()
                    .copied()
                    .filter(|id| !live_lanes.contains(&lane_of(*id)))
                    .collect();
            }
        }

        self.sets
            .iter()
            .filter(|set| set.kind == TrapSetKind::Exclusive)
            .find(|set| set.is_superset_of(subset))
            .map(|set| set.ids.iter().copied().filter(|id| !subset.contains(id)).collect())
            .unwrap_or_default()
    }

    /// Lane-set members sharing a lane with any id in `ids`.
    pub fn lane_mates_of(&self, ids: &[TrapId]) -> Vec<TrapId> {
        let Some(lanes) = self.lane_set() else {
            return Vec::new();
        };
        let touched: FxHashSet<u32> =
            ids.iter().filter(|id| lanes.contains(**id)).map(|id| lane_of(*id)).collect();
        lanes.ids.iter().copied().filter(|id| touched.contains(&lane_of(*id))).collect()
    }

    /// Nearest trap within `epsilon` of `pos` on the horizontal plane.
    pub fn find_by_location(&self, pos: &WorldPos, epsilon: f32) -> Option<&Trap> {
        self.traps
            .iter()
            .map(|trap| (trap, distance_2d(&trap.location, pos)))
            .filter(|(_, d)| *d < epsilon)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(trap, _)| trap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;
    use crate::data::catalog;
    use crate::geometry::LOCATION_EPSILON;

    fn registry() -> &'static TrapRegistry {
        &catalog().traps
    }

    fn sorted(mut ids: Vec<TrapId>) -> Vec<TrapId> {
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_embedded_registry_shape() {
        let reg = registry();
        assert_eq!(reg.len(), 101);
        assert_eq!(reg.trap_sets().len(), 19);
        assert_eq!(reg.lane_set().map(|s| s.ids.len()), Some(12));
        assert_eq!(reg.portals().count(), 14);
    }

    #[test]
    fn test_area_tagging() {
        let reg = registry();
        assert_eq!(reg.by_id(0).unwrap().area, AreaTag::CircularPlatform);
        assert_eq!(reg.by_id(13).unwrap().area, AreaTag::CorridorFromArt);
        assert_eq!(reg.by_id(27).unwrap().area, AreaTag::FireRoom1);
        assert_eq!(reg.by_id(39).unwrap().area, AreaTag::IceRoom1);
        assert_eq!(reg.by_id(84).unwrap().area, AreaTag::EarthRoom2);
        assert_eq!(reg.by_id(117).unwrap().area, AreaTag::OctagonRoomToRoomGroup2);
        assert_eq!(reg.traps_in_area(AreaTag::WindRoom1), &[32, 33, 58, 59, 60]);
        assert!(reg.traps_in_area(AreaTag::Entry).is_empty());
    }

    #[test]
    fn test_complement_lane_rule() {
        let reg = registry();
        assert_eq!(sorted(reg.complement_of(&[0])), vec![1, 2, 4, 5, 7, 8, 10, 11]);
        assert_eq!(sorted(reg.complement_of(&[4, 10])), vec![0, 2, 3, 5, 6, 8, 9, 11]);
        assert!(reg.complement_of(&[0, 1, 2]).is_empty());
    }

    #[test]
    fn test_complement_exclusive_rule() {
        let reg = registry();
        assert_eq!(sorted(reg.complement_of(&[13])), vec![12, 14]);
        assert_eq!(sorted(reg.complement_of(&[35, 36])), vec![37, 38, 39]);
        // Portals of the first room group form one set
        assert_eq!(reg.complement_of(&[27]).len(), 13);
    }

    #[test]
    fn test_complement_without_holding_set() {
        let reg = registry();
        // Spans two sets
        assert!(reg.complement_of(&[12, 15]).is_empty());
        // Mixes the lane set with another set
        assert!(reg.complement_of(&[0, 12]).is_empty());
        assert!(reg.complement_of(&[]).is_empty());
        assert!(reg.complement_of(&[999]).is_empty());
    }

    #[test]
    fn test_lane_mates() {
        let reg = registry();
        assert_eq!(sorted(reg.lane_mates_of(&[4])), vec![1, 4, 7, 10]);
        assert!(reg.lane_mates_of(&[13]).is_empty());
    }

    #[test]
    fn test_find_by_location_tolerance() {
        let reg = registry();
        let stored = reg.by_id(21).unwrap().location;

        let near = WorldPos::new(stored.x + 0.05, stored.y, stored.z);
        assert_eq!(reg.find_by_location(&near, LOCATION_EPSILON).map(|t| t.id), Some(21));

        let far = WorldPos::new(stored.x + 5.0, stored.y, stored.z);
        assert!(reg.find_by_location(&far, LOCATION_EPSILON).is_none());
    }

    #[test]
    fn test_find_by_location_prefers_nearest() {
        let areas = AreaIndex::new(vec![Area {
            tag: AreaTag::IceRoom1,
            name: "ice".to_string(),
            origin: WorldPos::new(0.0, 0.0, 0.0),
            dims: WorldPos::new(10.0, 0.0, 10.0),
            scan_spots: Vec::new(),
        }])
        .unwrap();
        let trap = |id, x| Trap {
            id,
            trap_type: TrapType::BigBomb,
            location: WorldPos::new(x, 0.0, 1.0),
            area: AreaTag::Entry,
            label: String::new(),
        };
        let reg = TrapRegistry::new(vec![trap(1, 1.0), trap(2, 1.3)], Vec::new(), &areas).unwrap();
        let found = reg.find_by_location(&WorldPos::new(1.2, 0.0, 1.0), 0.5);
        assert_eq!(found.map(|t| t.id), Some(2));
    }

    #[test]
    fn test_load_errors() {
        let areas = &catalog().areas;
        let dup = r#"{ "schema_version": 1, "trap_sets": [], "traps": [
            { "id": 1, "type": "Portal", "location": [-94.8, 80.0, 269.2] },
            { "id": 1, "type": "Portal", "location": [-84.9, 80.0, 269.2] } ] }"#;
        assert!(matches!(TrapRegistry::from_json(dup, areas), Err(DataError::DuplicateTrap(1))));

        let outside = r#"{ "schema_version": 1, "trap_sets": [], "traps": [
            { "id": 1, "type": "Portal", "location": [-50.0, 7.0, 610.0] } ] }"#;
        assert!(matches!(
            TrapRegistry::from_json(outside, areas),
            Err(DataError::UnplacedTrap { id: 1 })
        ));

        let unknown = r#"{ "schema_version": 1, "traps": [],
            "trap_sets": [ { "name": "x", "kind": "exclusive", "ids": [7] } ] }"#;
        assert!(matches!(
            TrapRegistry::from_json(unknown, areas),
            Err(DataError::UnknownSetMember { id: 7, .. })
        ));

        let ragged = r#"{ "schema_version": 1,
            "traps": [ { "id": 0, "type": "SmallBomb", "location": [-18.9, 22.1, 598.8] } ],
            "trap_sets": [ { "name": "p", "kind": "lanes", "ids": [0] } ] }"#;
        assert!(matches!(
            TrapRegistry::from_json(ragged, areas),
            Err(DataError::RaggedLaneSet { len: 1, .. })
        ));
    }
}
