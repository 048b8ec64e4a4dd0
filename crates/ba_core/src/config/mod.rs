//! # Trapper Configuration
//!
//! Options read by the core. Only `deduction_enabled`, the view distances
//! and the log-message rules change behavior; [`DrawOptions`] is carried
//! through untouched for the host's renderer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = TrapperConfig::load("trapper.yaml")?;
//! let session = Session::new(shared_catalog(), config);
//! ```

pub mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::callout::PortalLayout;
use crate::scan::LogMessageRule;

// ========== TrapperConfig Main Structure ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapperConfig {
    /// Master switch for scan deduction and polling
    pub deduction_enabled: bool,
    /// Traps and scan spots farther than this are left off the board
    pub trap_view_distance: f32,
    /// Mobs farther than this are left out of the mob snapshot
    pub mob_view_distance: f32,
    /// Minimum time between two entity polls
    pub poll_interval_ms: u64,
    /// Log-message id ranges that carry a scan verdict
    pub scan_log_messages: Vec<LogMessageRule>,
    pub draw: DrawOptions,
    pub callout: CalloutOptions,
    pub dashboard: DashboardOptions,
    pub shield: ShieldOptions,
}

impl Default for TrapperConfig {
    fn default() -> Self {
        Self {
            deduction_enabled: true,
            trap_view_distance: 100.0,
            mob_view_distance: 50.0,
            poll_interval_ms: 200,
            scan_log_messages: Vec::new(),
            draw: DrawOptions::default(),
            callout: CalloutOptions::default(),
            dashboard: DashboardOptions::default(),
            shield: ShieldOptions::default(),
        }
    }
}

// ========== Renderer Switches ==========

/// Renderer-only switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    pub recorded_traps: bool,
    pub blast_circles: bool,
    pub blast_circles_only_when_approaching: bool,
    pub near_ring: bool,
    pub near_ring_except_revealed: bool,
    pub far_ring: bool,
    pub far_ring_except_revealed: bool,
    pub area_borders: bool,
    pub scan_spots: bool,
    pub scan_spot_rings: bool,
    pub mob_views: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            recorded_traps: false,
            blast_circles: false,
            blast_circles_only_when_approaching: false,
            near_ring: false,
            near_ring_except_revealed: false,
            far_ring: false,
            far_ring_except_revealed: false,
            area_borders: false,
            scan_spots: false,
            scan_spot_rings: false,
            mob_views: true,
        }
    }
}

// ========== Party Callout ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalloutOptions {
    pub layout: PortalLayout,
    /// Party channel instead of echo
    pub use_party_channel: bool,
}

impl Default for CalloutOptions {
    fn default() -> Self {
        Self { layout: PortalLayout::Global, use_party_channel: true }
    }
}

// ========== Tank Dashboard ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    /// Hide tanks without an active stance
    pub only_stance_on: bool,
}

// ========== Logos Shields ==========

/// Accepted range for `ShieldOptions::remaining_threshold_minutes`
pub const SHIELD_THRESHOLD_RANGE: std::ops::RangeInclusive<u32> = 1..=29;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldOptions {
    /// Refresh Protect (status 1642)
    pub check_protect: bool,
    /// Refresh Shell (status 1643)
    pub check_shell: bool,
    /// A shield with this many minutes left or fewer is due
    pub remaining_threshold_minutes: u32,
}

impl Default for ShieldOptions {
    fn default() -> Self {
        Self { check_protect: true, check_shell: true, remaining_threshold_minutes: 15 }
    }
}

impl ShieldOptions {
    pub fn threshold_secs(&self) -> f32 {
        (self.remaining_threshold_minutes * 60) as f32
    }
}

// ========== TrapperConfig Implementation ==========

impl TrapperConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TrapperConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: TrapperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk. `.yaml` / `.yml` are read as YAML, anything else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let config =
            if is_yaml { Self::from_yaml_str(&content)? } else { Self::from_json_str(&content)? };
        log::info!("Loaded trapper config from {}", path.display());
        Ok(config)
    }

    /// Write as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        log::debug!("Saved trapper config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance("trap_view_distance", self.trap_view_distance)?;
        check_distance("mob_view_distance", self.mob_view_distance)?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            });
        }

        if !SHIELD_THRESHOLD_RANGE.contains(&self.shield.remaining_threshold_minutes) {
            return Err(ConfigError::Invalid {
                field: "shield.remaining_threshold_minutes",
                reason: format!(
                    "must be within 1..=29, got {}",
                    self.shield.remaining_threshold_minutes
                ),
            });
        }

        for (i, rule) in self.scan_log_messages.iter().enumerate() {
            if rule.first_id > rule.last_id {
                return Err(ConfigError::Invalid {
                    field: "scan_log_messages",
                    reason: format!(
                        "rule {} has first_id {} above last_id {}",
                        i, rule.first_id, rule.last_id
                    ),
                });
            }
            if let Some(j) = self.scan_log_messages[..i].iter().position(|r| r.overlaps(rule)) {
                return Err(ConfigError::Invalid {
                    field: "scan_log_messages",
                    reason: format!("rules {} and {} overlap", j, i),
                });
            }
        }

        Ok(())
    }

    /// Wider view distances for the party's scout
    pub fn scout() -> Self {
        Self {
            trap_view_distance: 150.0,
            mob_view_distance: 80.0,
            draw: DrawOptions {
                recorded_traps: true,
                near_ring: true,
                far_ring: true,
                scan_spots: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Tracking switched off; snapshots stay empty
    pub fn passive() -> Self {
        Self { deduction_enabled: false, ..Default::default() }
    }
}

fn check_distance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must be finite and > 0, got {}", value) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trap::ScanResult;

    #[test]
    fn test_default_config() {
        let config = TrapperConfig::default();
        assert!(config.deduction_enabled);
        assert_eq!(config.trap_view_distance, 100.0);
        assert_eq!(config.poll_interval_ms, 200);
        assert!(config.scan_log_messages.is_empty());
        assert!(config.draw.mob_views);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let scout = TrapperConfig::scout();
        assert!(scout.trap_view_distance > 100.0);
        assert!(scout.validate().is_ok());

        let passive = TrapperConfig::passive();
        assert!(!passive.deduction_enabled);
        assert!(passive.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TrapperConfig::from_json_str(r#"{ "trap_view_distance": 60.0 }"#).unwrap();
        assert_eq!(config.trap_view_distance, 60.0);
        assert_eq!(config.mob_view_distance, 50.0);
        assert_eq!(config.callout.layout, PortalLayout::Global);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
deduction_enabled: false
scan_log_messages:
  - first_id: 9001
    last_id: 9003
    verdict: Sense
callout:
  layout: MoogleDc
  use_party_channel: false
dashboard:
  only_stance_on: true
shield:
  check_shell: false
  remaining_threshold_minutes: 5
"#;
        let config = TrapperConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.deduction_enabled);
        assert_eq!(config.scan_log_messages[0].verdict, ScanResult::Sense);
        assert_eq!(config.callout.layout, PortalLayout::MoogleDc);
        assert!(!config.callout.use_party_channel);
        assert!(config.dashboard.only_stance_on);
        assert!(config.shield.check_protect);
        assert!(!config.shield.check_shell);
        assert_eq!(config.shield.threshold_secs(), 300.0);
    }

    #[test]
    fn test_validation_errors() {
        let bad_distance = TrapperConfig { mob_view_distance: -1.0, ..Default::default() };
        assert!(matches!(
            bad_distance.validate(),
            Err(ConfigError::Invalid { field: "mob_view_distance", .. })
        ));

        let nan = TrapperConfig { trap_view_distance: f32::NAN, ..Default::default() };
        assert!(nan.validate().is_err());

        let zero_poll = TrapperConfig { poll_interval_ms: 0, ..Default::default() };
        assert!(zero_poll.validate().is_err());

        let shield = |minutes| TrapperConfig {
            shield: ShieldOptions { remaining_threshold_minutes: minutes, ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(
            shield(30).validate(),
            Err(ConfigError::Invalid { field: "shield.remaining_threshold_minutes", .. })
        ));
        assert!(shield(0).validate().is_err());
        assert!(shield(29).validate().is_ok());

        let rule = |first_id, last_id| LogMessageRule { first_id, last_id, verdict: ScanResult::Discover };
        let inverted = TrapperConfig { scan_log_messages: vec![rule(5, 1)], ..Default::default() };
        assert!(inverted.validate().is_err());

        let overlapping =
            TrapperConfig { scan_log_messages: vec![rule(1, 5), rule(4, 8)], ..Default::default() };
        assert!(overlapping.validate().is_err());
    }

    #[test]
    fn test_invalid_json_reported() {
        assert!(matches!(TrapperConfig::from_json_str("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            TrapperConfig::from_json_str(r#"{ "poll_interval_ms": 0 }"#),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trapper.json");
        let config = TrapperConfig::scout();

        config.save(&path).unwrap();
        let loaded = TrapperConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_yaml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trapper.yml");
        std::fs::write(&path, "mob_view_distance: 30.0\n").unwrap();

        let loaded = TrapperConfig::load(&path).unwrap();

        assert_eq!(loaded.mob_view_distance, 30.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TrapperConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
