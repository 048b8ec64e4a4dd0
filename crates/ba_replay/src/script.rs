//! Recorded session scripts
//!
//! One JSON object per line. Blank lines and `#` comments are skipped.
//!
//! ```text
//! {"event": "zone", "territory": 827}
//! {"event": "chat", "channel": 57, "text": "附近没感觉到隐藏的陷阱！"}
//! {"event": "log", "id": 9001}
//! {"event": "tick", "now_ms": 200, "player": [-18.9, 22.1, 598.8], "entities": []}
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use ba_core::{
    AreaTag, Notification, Observation, RecordingSink, ScanResult, ScanSignal, Session,
    TankDashboard, TrapBoard, WorldEntity, WorldPos,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ScriptEvent {
    Zone {
        territory: u32,
    },
    Chat {
        channel: u16,
        text: String,
    },
    Log {
        id: u32,
    },
    Tick {
        now_ms: u64,
        player: WorldPos,
        #[serde(default)]
        entities: Vec<WorldEntity>,
    },
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptEvent>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid event on line {}", number))
        })
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&content)
}

/// Outcome of a full replay
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaySummary {
    pub ticks: usize,
    pub scans_applied: Vec<ScanResult>,
    pub revealed: Vec<u32>,
    pub unregistered: usize,
    pub possible_portal_areas: BTreeSet<AreaTag>,
    pub notifications: Vec<Notification>,
    pub board: TrapBoard,
    pub dashboard: TankDashboard,
}

pub fn replay(session: &mut Session, events: &[ScriptEvent]) -> ReplaySummary {
    let mut sink = RecordingSink::new();
    let mut summary = ReplaySummary::default();

    for event in events {
        match event {
            ScriptEvent::Zone { territory } => session.on_zone_changed(*territory),
            ScriptEvent::Chat { channel, text } => {
                session.on_scan_signal(&ScanSignal::Chat { channel: *channel, text: text.clone() });
            }
            ScriptEvent::Log { id } => {
                session.on_scan_signal(&ScanSignal::LogMessage { id: *id });
            }
            ScriptEvent::Tick { now_ms, player, entities } => {
                let report = session.tick(*now_ms, player, entities, &mut sink);
                summary.ticks += 1;
                if report.scan != ScanResult::None {
                    debug!(scan = ?report.scan, disabled = report.scan_disabled.len(), "Scan applied");
                    summary.scans_applied.push(report.scan);
                }
                for observation in report.observations {
                    match observation {
                        Observation::Revealed { id, .. } => summary.revealed.push(id),
                        Observation::Unregistered { .. } => summary.unregistered += 1,
                        Observation::Ignored | Observation::AlreadyKnown => {}
                    }
                }
            }
        }
    }

    summary.possible_portal_areas = session.possible_portal_areas().clone();
    summary.notifications = sink.drain();
    summary.board = (*session.board().latest()).clone();
    summary.dashboard = (*session.dashboard().latest()).clone();
    summary
}
