//! Protocol session boundary
//!
//! The actual WS-Discovery broadcast, SOAP calls, RTSP negotiation and XML
//! parsing live in an external protocol backend. This module defines the
//! seam the sweep drives it through: a [`SessionFactory`] opens one
//! [`Session`] per broadcast round, and the session performs all network
//! I/O against the devices it found. The session is owned exclusively by
//! the sweep task and dropped when the sweep returns.

use async_trait::async_trait;

use crate::config::DiscoveryConfig;
use crate::device::OnvifDevice;
use crate::error::Result;

/// Outcome of an authenticated stream-URI resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    /// Login succeeded and the stream URI has been set on the record
    Ok,
    /// Login failed; the backend's status code is kept for diagnostics
    Denied(i32),
}

impl LoginStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, LoginStatus::Ok)
    }
}

/// One discovery round against the local network segment.
///
/// Timeouts on the network calls are whatever the backend enforces; the
/// sweep does not impose its own.
#[async_trait]
pub trait Session: Send {
    /// Send the discovery broadcast and collect responses. Returns the
    /// number of responding devices.
    async fn broadcast(&mut self) -> Result<usize>;

    /// Extract the advertised metadata for device `index` into `device`.
    /// Returns `false` when the advertisement cannot be parsed; the sweep
    /// skips such devices.
    async fn prepare_device(&mut self, index: usize, device: &mut OnvifDevice) -> bool;

    /// Resolve the stream URI using the credentials already set on the
    /// record.
    async fn fill_rtsp(&mut self, device: &mut OnvifDevice) -> LoginStatus;

    /// Populate media profile metadata in place
    async fn get_profile(&mut self, device: &mut OnvifDevice);

    /// Populate device information in place
    async fn get_device_information(&mut self, device: &mut OnvifDevice);
}

/// Opens protocol sessions for sweep and fill tasks
#[async_trait]
pub trait SessionFactory: Send + Sync + 'static {
    type Session: Session + 'static;

    /// Open a network session for one broadcast round
    async fn open(&self, config: &DiscoveryConfig) -> Result<Self::Session>;
}
