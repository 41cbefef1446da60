//! onvif-sweep
//!
//! Discovery-and-login sweep orchestration for ONVIF cameras.
//!
//! ## Architecture (5 components)
//!
//! 1. DiscoveryManager - detached sweep tasks, job registry, events
//! 2. Session boundary - injected external protocol backend
//! 3. CredentialProvider - caller-supplied login strategy
//! 4. OnvifDevice - progressively resolved device records
//! 5. SweepEvent stream - per-device outcome distribution
//!
//! ## Design Principles
//!
//! - The protocol backend owns every wire format; this crate owns only the
//!   orchestration contract
//! - Resolved records only: a device never reaches the caller half-filled
//! - Completion is unconditional and uninformative; outcomes are read from
//!   the results, the job registry, or the event stream

pub mod config;
pub mod credentials;
pub mod device;
pub mod error;
pub mod session;
pub mod sweep;

pub use config::DiscoveryConfig;
pub use credentials::{Credential, CredentialList, CredentialProvider, StaticCredentials};
pub use device::{DeviceInfo, MediaProfile, OnvifDevice};
pub use error::{Error, Result};
pub use session::{LoginStatus, Session, SessionFactory};
pub use sweep::{
    DiscoveryManager, SharedDevices, SweepEvent, SweepJob, SweepLogEntry, SweepLogEventType,
    SweepStatus, SweepSummary,
};
