//! Sweep job and log types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sweep status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SweepStatus {
    Running,
    Completed,
    /// Session open or broadcast failed before device processing
    Failed,
}

/// Sweep log event type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SweepLogEventType {
    Broadcast,
    DeviceResolved,
    DeviceSkipped,
    DeviceAbandoned,
    LoginDenied,
    Info,
    Error,
}

/// Sweep log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepLogEntry {
    pub timestamp: DateTime<Utc>,
    /// Device address, or "*" for sweep-level entries
    pub address: String,
    pub event_type: SweepLogEventType,
    pub message: String,
}

impl SweepLogEntry {
    pub fn new(address: &str, event_type: SweepLogEventType, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            address: address.to_string(),
            event_type,
            message: message.to_string(),
        }
    }
}

/// One discovery sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepJob {
    pub sweep_id: Uuid,
    pub status: SweepStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub summary: Option<SweepSummary>,
    #[serde(default)]
    pub logs: Vec<SweepLogEntry>,
}

impl SweepJob {
    pub fn new(sweep_id: Uuid) -> Self {
        Self {
            sweep_id,
            status: SweepStatus::Running,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
            summary: None,
            logs: Vec::new(),
        }
    }
}

/// Per-device outcome counters for one sweep.
///
/// `devices_resolved + devices_skipped + devices_abandoned` equals
/// `devices_announced` once the sweep completes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepSummary {
    pub devices_announced: u32,
    pub devices_resolved: u32,
    pub devices_skipped: u32,
    pub devices_abandoned: u32,
}
