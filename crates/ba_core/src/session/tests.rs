//! Session lifecycle scenarios

use super::*;
use crate::classify::{EntityKind, NpcKind, StatusEffect, WorldEntity};
use crate::data::{catalog, shared_catalog};
use crate::config::{DashboardOptions, ShieldOptions};
use crate::dashboard::TankJob;
use crate::host::RecordingSink;
use crate::mob::AggroType;
use crate::scan::LogMessageRule;
use crate::trap::{TrapState, TrapType};

const DISCOVER_LINE: &str = "发现了隐藏的陷阱！";
const NOT_SENSE_LINE: &str = "附近没感觉到隐藏的陷阱！";

fn location_of(id: TrapId) -> WorldPos {
    catalog().traps.by_id(id).unwrap().location
}

fn chat(text: &str) -> ScanSignal {
    ScanSignal::Chat { channel: 57, text: text.to_string() }
}

fn no_entities() -> Vec<WorldEntity> {
    Vec::new()
}

fn tank(id: u64, job_id: u32, stance: bool) -> WorldEntity {
    let mut entity = WorldEntity::new(id, EntityKind::Player, location_of(0));
    entity.job_id = job_id;
    if stance {
        entity.statuses.push(StatusEffect::new(1833, 0, 0.0));
    }
    entity
}

fn active_session(config: TrapperConfig) -> Session {
    let mut session = Session::new(shared_catalog(), config);
    session.on_zone_changed(HYDATOS_TERRITORY_ID);
    session
}

fn trap_object(id: u64, trap_type: TrapType, position: WorldPos) -> WorldEntity {
    let mut entity = WorldEntity::new(id, EntityKind::EventObject, position);
    entity.base_id = trap_type.data_id();
    entity
}

fn enemy(id: u64, name_id: u32, position: WorldPos) -> WorldEntity {
    let mut entity = WorldEntity::new(id, EntityKind::BattleNpc(NpcKind::Enemy), position);
    entity.name_id = name_id;
    entity
}

#[test]
fn test_inactive_outside_hydatos() {
    let mut session = Session::new(shared_catalog(), TrapperConfig::default());
    let mut sink = RecordingSink::new();
    session.on_scan_signal(&chat(NOT_SENSE_LINE));

    let report = session.tick(0, &location_of(13), &no_entities(), &mut sink);

    assert_eq!(report, TickReport::default());
    assert_eq!(session.engine().counts().not_scanned, 101);

    session.on_zone_changed(130);
    assert!(!session.is_active());
    assert_eq!(session.pending_scan(), ScanResult::None);
}

#[test]
fn test_scan_verdict_consumed_once() {
    let mut session = active_session(TrapperConfig::default());
    let mut sink = RecordingSink::new();
    let at_13 = location_of(13);

    assert_eq!(session.on_scan_signal(&chat(DISCOVER_LINE)), ScanResult::Discover);
    let first = session.tick(0, &at_13, &no_entities(), &mut sink);
    let second = session.tick(10, &at_13, &no_entities(), &mut sink);

    assert_eq!(first.scan, ScanResult::Discover);
    let mut disabled = first.scan_disabled.clone();
    disabled.sort_unstable();
    assert_eq!(disabled, vec![12, 13, 14]);
    assert_eq!(second.scan, ScanResult::None);
    assert!(second.scan_disabled.is_empty());
}

#[test]
fn test_latest_verdict_wins() {
    let mut session = active_session(TrapperConfig::default());
    session.on_scan_signal(&chat(DISCOVER_LINE));
    session.on_scan_signal(&chat(NOT_SENSE_LINE));
    session.on_scan_signal(&chat("Some unrelated system line"));

    assert_eq!(session.pending_scan(), ScanResult::NotSense);
}

#[test]
fn test_log_message_verdicts() {
    let config = TrapperConfig {
        scan_log_messages: vec![LogMessageRule {
            first_id: 9000,
            last_id: 9000,
            verdict: ScanResult::Sense,
        }],
        ..Default::default()
    };
    let mut session = active_session(config);

    assert_eq!(session.on_scan_signal(&ScanSignal::LogMessage { id: 9000 }), ScanResult::Sense);
    assert_eq!(session.on_scan_signal(&ScanSignal::LogMessage { id: 1 }), ScanResult::None);
    assert_eq!(session.pending_scan(), ScanResult::Sense);
}

#[test]
fn test_portal_observation_and_board() {
    let mut session = active_session(TrapperConfig::default());
    let mut sink = RecordingSink::new();
    let portal = location_of(27);
    let feed = vec![trap_object(1, TrapType::Portal, portal)];

    let report = session.tick(0, &portal, &feed, &mut sink);

    assert!(report.polled);
    assert!(matches!(report.observations[..], [Observation::Revealed { id: 27, .. }]));
    assert_eq!(sink.announcements(), vec!["Fire portal!"]);
    assert_eq!(session.possible_portal_areas(), &BTreeSet::from([AreaTag::FireRoom1]));

    let board = session.board().latest();
    assert_eq!(board.trap(27).map(|t| t.state), Some(TrapState::Revealed));
    assert_eq!(board.discovered.len(), 1);
    assert_eq!(board.possible_portal_areas, BTreeSet::from([AreaTag::FireRoom1]));

    // Same object on the next poll: nothing new
    let again = session.tick(1_000, &portal, &feed, &mut sink);
    assert!(again.observations.is_empty());
    assert_eq!(sink.announcements().len(), 1);
}

#[test]
fn test_poll_is_throttled() {
    let mut session = active_session(TrapperConfig::default());
    let mut sink = RecordingSink::new();
    let pos = location_of(0);

    assert!(session.tick(1_000, &pos, &no_entities(), &mut sink).polled);
    assert!(!session.tick(1_100, &pos, &no_entities(), &mut sink).polled);
    assert!(session.tick(1_200, &pos, &no_entities(), &mut sink).polled);
}

#[test]
fn test_first_elemental_chest_announced_once() {
    let mut session = active_session(TrapperConfig::default());
    let mut sink = RecordingSink::new();
    let spot = location_of(27) + WorldPos::new(2.0, 0.0, 0.0);
    let feed = vec![
        WorldEntity::new(1, EntityKind::Treasure, spot),
        WorldEntity::new(2, EntityKind::Treasure, spot + WorldPos::new(1.0, 0.0, 0.0)),
    ];

    session.tick(0, &spot, &feed, &mut sink);
    session.tick(500, &spot, &feed, &mut sink);

    assert_eq!(sink.announcements(), vec!["Fire chest!"]);
    assert_eq!(session.chest_found_at(), Some(AreaTag::FireRoom1));
    assert_eq!(session.board().latest().chest_area, Some(AreaTag::FireRoom1));
}

#[test]
fn test_mob_snapshot_filters() {
    let mut session = active_session(TrapperConfig::default());
    let mut sink = RecordingSink::new();
    let player = location_of(0);
    let mut dead = enemy(3, 7996, player);
    dead.is_dead = true;
    let feed = vec![
        enemy(1, 7996, player + WorldPos::new(10.0, 0.0, 0.0)),
        enemy(2, 1, player),
        dead,
        enemy(4, 7996, player + WorldPos::new(80.0, 0.0, 0.0)),
    ];

    session.tick(0, &player, &feed, &mut sink);

    let mobs = session.mobs().latest();
    assert_eq!(mobs.len(), 1);
    assert_eq!(mobs.mobs[0].object_id, 1);
    assert_eq!(mobs.mobs[0].aggro, AggroType::Sound);
}

#[test]
fn test_board_respects_view_distance() {
    let config = TrapperConfig { trap_view_distance: 20.0, ..Default::default() };
    let mut session = active_session(config);
    let mut sink = RecordingSink::new();

    session.tick(0, &location_of(13), &no_entities(), &mut sink);

    let board = session.board().latest();
    let mut ids: Vec<TrapId> = board.traps.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![12, 13, 14]);
    assert_eq!(board.scan_spots.len(), 1);
    assert_eq!(board.scan_spots[0].area, AreaTag::CorridorFromArt);
}

#[test]
fn test_scan_spots_hidden_once_area_resolved() {
    let config = TrapperConfig { trap_view_distance: 20.0, ..Default::default() };
    let mut session = active_session(config);
    let mut sink = RecordingSink::new();
    session.on_scan_signal(&chat(NOT_SENSE_LINE));

    session.tick(0, &location_of(13), &no_entities(), &mut sink);

    assert!(session.board().latest().scan_spots.is_empty());
}

#[test]
fn test_zone_change_resets_everything() {
    let mut session = active_session(TrapperConfig::default());
    let mut sink = RecordingSink::new();
    let portal = location_of(27);
    session.on_scan_signal(&chat(NOT_SENSE_LINE));
    session.tick(0, &portal, &vec![trap_object(1, TrapType::Portal, portal)], &mut sink);
    assert!(session.engine().counts().disabled > 0);

    session.on_zone_changed(HYDATOS_TERRITORY_ID);

    assert_eq!(session.engine().counts().not_scanned, 101);
    assert!(session.engine().discovered().is_empty());
    assert_eq!(session.possible_portal_areas().len(), 6);
    assert_eq!(*session.board().latest(), TrapBoard::default());
    assert!(session.mobs().latest().is_empty());

    // The same portal is news again after the reset
    let report = session.tick(10, &portal, &vec![trap_object(1, TrapType::Portal, portal)], &mut sink);
    assert_eq!(report.observations.len(), 1);
    assert_eq!(sink.announcements().len(), 2);
}

#[test]
fn test_deduction_disabled() {
    let mut session = active_session(TrapperConfig::passive());
    let mut sink = RecordingSink::new();
    let portal = location_of(27);

    assert_eq!(session.on_scan_signal(&chat(NOT_SENSE_LINE)), ScanResult::None);
    let report =
        session.tick(0, &portal, &vec![trap_object(1, TrapType::Portal, portal)], &mut sink);

    assert!(report.observations.is_empty());
    assert_eq!(session.engine().counts().not_scanned, 101);
    assert!(sink.notifications.is_empty());
    assert!(session.board().latest().traps.is_empty());
}

#[test]
fn test_in_arsenal() {
    let mut session = Session::new(shared_catalog(), TrapperConfig::default());
    let platform = location_of(0);
    assert!(!session.in_arsenal(&platform));

    session.on_zone_changed(HYDATOS_TERRITORY_ID);
    assert!(session.in_arsenal(&platform));
    assert!(!session.in_arsenal(&WorldPos::new(platform.x, 250.0, platform.z)));
    // Tower entrance
    assert!(!session.in_arsenal(&WorldPos::new(0.0, 0.0, 700.0)));
}

#[test]
fn test_dashboard_refreshed_outside_hydatos() {
    let mut session = Session::new(shared_catalog(), TrapperConfig::default());
    let mut sink = RecordingSink::new();
    let feed = vec![tank(1, 37, true), tank(2, 28, false)];

    let report = session.tick(0, &location_of(0), &feed, &mut sink);

    assert!(!report.polled);
    let dashboard = session.dashboard().latest();
    assert_eq!(dashboard.len(), 1);
    assert_eq!(dashboard.tanks[0].job, TankJob::Gunbreaker);
    assert!(dashboard.tanks[0].stance_active);
}

#[test]
fn test_dashboard_stance_filter_and_reset() {
    let config = TrapperConfig {
        dashboard: DashboardOptions { only_stance_on: true },
        ..Default::default()
    };
    let mut session = active_session(config);
    let mut sink = RecordingSink::new();
    let feed = vec![tank(1, 19, false), tank(2, 21, true)];

    session.tick(0, &location_of(0), &feed, &mut sink);

    let ids: Vec<u64> = session.dashboard().latest().tanks.iter().map(|t| t.object_id).collect();
    assert_eq!(ids, vec![2]);

    session.on_zone_changed(HYDATOS_TERRITORY_ID);
    assert!(session.dashboard().latest().is_empty());
}

#[test]
fn test_next_shield_target_uses_config() {
    let config = TrapperConfig {
        shield: ShieldOptions { check_shell: false, remaining_threshold_minutes: 10, ..Default::default() },
        ..Default::default()
    };
    let session = active_session(config);
    let me = location_of(0);
    let with_protect = |id: u64, secs: f32| {
        let mut entity = WorldEntity::new(id, EntityKind::Player, me);
        entity.statuses.push(StatusEffect::new(1642, 0, secs));
        entity
    };
    let feed = vec![with_protect(1, 601.0), with_protect(2, 600.0), with_protect(3, 0.0)];

    assert_eq!(session.next_shield_target(&me, None, &feed).map(|e| e.object_id), Some(2));
    assert_eq!(session.next_shield_target(&me, Some(2), &feed).map(|e| e.object_id), Some(3));
}
