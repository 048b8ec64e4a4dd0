//! Scan Signal Decoder
//!
//! Turns a raw chat line or log-message id into a [`ScanResult`]. Anything
//! that is not a scan verdict decodes to [`ScanResult::None`].

use serde::{Deserialize, Serialize};

use crate::trap::ScanResult;

/// System message channel, compared after masking with [`CHANNEL_MASK`]
pub const SYSTEM_CHANNEL: u16 = 57;
pub const CHANNEL_MASK: u16 = 0x7f;

/// Every scan verdict line ends with this
pub const SCAN_SUFFIX: &str = "隐藏的陷阱！";
const DISCOVER_KEYWORD: &str = "发现";
const SENSE_KEYWORD: &str = "感觉到有";

/// Raw signal delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanSignal {
    Chat { channel: u16, text: String },
    LogMessage { id: u32 },
}

/// Log-message ids `first_id..=last_id` carry `verdict`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessageRule {
    pub first_id: u32,
    pub last_id: u32,
    pub verdict: ScanResult,
}

impl LogMessageRule {
    pub fn matches(&self, id: u32) -> bool {
        (self.first_id..=self.last_id).contains(&id)
    }

    pub fn overlaps(&self, other: &LogMessageRule) -> bool {
        self.first_id <= other.last_id && other.first_id <= self.last_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanDecoder {
    rules: Vec<LogMessageRule>,
}

impl ScanDecoder {
    pub fn new(rules: Vec<LogMessageRule>) -> Self {
        Self { rules }
    }

    pub fn decode(&self, signal: &ScanSignal) -> ScanResult {
        match signal {
            ScanSignal::Chat { channel, text } => decode_chat(*channel, text),
            ScanSignal::LogMessage { id } => self.decode_log_message(*id),
        }
    }

    pub fn decode_log_message(&self, id: u32) -> ScanResult {
        self.rules.iter().find(|rule| rule.matches(id)).map_or(ScanResult::None, |rule| rule.verdict)
    }
}

/// Decode a chat line. Only system messages ending in the scan suffix count.
pub fn decode_chat(channel: u16, text: &str) -> ScanResult {
    if channel & CHANNEL_MASK != SYSTEM_CHANNEL {
        return ScanResult::None;
    }
    let Some(prefix) = text.strip_suffix(SCAN_SUFFIX) else {
        return ScanResult::None;
    };
    if prefix.contains(DISCOVER_KEYWORD) {
        ScanResult::Discover
    } else if prefix.contains(SENSE_KEYWORD) {
        ScanResult::Sense
    } else {
        ScanResult::NotSense
    }
}
