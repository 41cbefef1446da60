//! Sweep event distribution
//!
//! Per-device outcomes are published on a broadcast channel so callers can
//! surface live progress (device lists, WebSocket feeds) without touching
//! the result collection mid-sweep. Events are advisory: the completion
//! callback remains the only completion signal, and a subscriber that lags
//! behind loses events rather than slowing the sweep down.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::job::SweepSummary;
use crate::error::Result;

/// Sweep event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum SweepEvent {
    SweepStarted {
        sweep_id: Uuid,
    },
    /// Broadcast round finished; `count` devices responded
    DevicesAnnounced {
        sweep_id: Uuid,
        count: usize,
    },
    DeviceResolved {
        sweep_id: Uuid,
        index: usize,
        address: String,
        name: Option<String>,
    },
    /// Advertisement could not be parsed
    DeviceSkipped {
        sweep_id: Uuid,
        index: usize,
    },
    /// Credential provider declined, or the configured attempt cap was hit
    DeviceAbandoned {
        sweep_id: Uuid,
        index: usize,
        address: String,
        attempts: u32,
    },
    LoginDenied {
        sweep_id: Uuid,
        index: usize,
        address: String,
        attempt: u32,
        code: i32,
    },
    SweepCompleted {
        sweep_id: Uuid,
        summary: SweepSummary,
    },
    SweepFailed {
        sweep_id: Uuid,
        message: String,
    },
}

impl SweepEvent {
    /// Wire form for callers forwarding events to WebSocket/SSE clients
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_form() {
        let event = SweepEvent::DeviceSkipped {
            sweep_id: Uuid::nil(),
            index: 3,
        };
        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"device_skipped\""));
        assert!(json.contains("\"index\":3"));
    }
}
