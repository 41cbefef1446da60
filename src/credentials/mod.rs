//! Credential providers
//!
//! The sweep asks its [`CredentialProvider`] for credentials before every
//! login attempt. Returning `true` means "credentials were set on the
//! record, retry the login"; returning `false` abandons the device and the
//! sweep moves on. The provider is awaited inline on the sweep task, so a
//! provider that waits on user input stalls progress through the device
//! list for exactly as long as the user takes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::device::OnvifDevice;

/// Supplies login credentials for discovered devices
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Set credential fields on `device` and return `true` to attempt a
    /// login, or return `false` to abandon the device.
    async fn get_credential(&self, device: &mut OnvifDevice) -> bool;
}

/// One username/password candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
    /// Lower values are tried first
    #[serde(default)]
    pub priority: u8,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            priority: 0,
        }
    }
}

/// A single stored username/password pair.
///
/// The pair is offered as long as the record carries no login error, so a
/// device gets exactly one attempt with it: after a failed login the sweep
/// records the error and the retry ask is declined.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn get_credential(&self, device: &mut OnvifDevice) -> bool {
        if device.last_error.is_some() {
            tracing::debug!(
                address = %device.address,
                "Stored credentials already failed, abandoning device"
            );
            return false;
        }
        device.set_credentials(&self.username, &self.password);
        true
    }
}

/// An ordered list of candidate credentials, tried per device in priority
/// order until one logs in or the list is exhausted.
pub struct CredentialList {
    candidates: Vec<Credential>,
    /// Next candidate index per device address
    cursor: RwLock<HashMap<String, usize>>,
}

impl CredentialList {
    pub fn new(mut candidates: Vec<Credential>) -> Self {
        candidates.sort_by_key(|c| c.priority);
        Self {
            candidates,
            cursor: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CredentialProvider for CredentialList {
    async fn get_credential(&self, device: &mut OnvifDevice) -> bool {
        let mut cursor = self.cursor.write().await;
        let next = cursor.entry(device.address.clone()).or_insert(0);
        match self.candidates.get(*next) {
            Some(candidate) => {
                *next += 1;
                tracing::debug!(
                    address = %device.address,
                    username = %candidate.username,
                    candidate = *next,
                    "Trying credential"
                );
                device.set_credentials(&candidate.username, &candidate.password);
                true
            }
            None => {
                tracing::debug!(
                    address = %device.address,
                    "All credentials exhausted, abandoning device"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credentials_single_attempt() {
        let provider = StaticCredentials::new("admin", "secret");
        let mut device = OnvifDevice::new("192.168.1.20", "http://192.168.1.20/onvif/device_service");

        assert!(provider.get_credential(&mut device).await);
        assert_eq!(device.username.as_deref(), Some("admin"));
        assert_eq!(device.password.as_deref(), Some("secret"));

        // A failed login records an error; the retry ask is declined.
        device.last_error = Some("login denied (status 401)".to_string());
        assert!(!provider.get_credential(&mut device).await);
    }

    #[tokio::test]
    async fn test_credential_list_walks_in_priority_order() {
        let mut low = Credential::new("admin", "admin");
        low.priority = 2;
        let mut high = Credential::new("admin", "secret");
        high.priority = 1;
        let provider = CredentialList::new(vec![low, high]);

        let mut device = OnvifDevice::new("192.168.1.20", "http://192.168.1.20/onvif/device_service");

        assert!(provider.get_credential(&mut device).await);
        assert_eq!(device.password.as_deref(), Some("secret"));

        assert!(provider.get_credential(&mut device).await);
        assert_eq!(device.password.as_deref(), Some("admin"));

        assert!(!provider.get_credential(&mut device).await);
    }

    #[tokio::test]
    async fn test_credential_list_tracks_devices_independently() {
        let provider = CredentialList::new(vec![Credential::new("admin", "secret")]);

        let mut first = OnvifDevice::new("192.168.1.20", "http://192.168.1.20/onvif/device_service");
        let mut second = OnvifDevice::new("192.168.1.21", "http://192.168.1.21/onvif/device_service");

        assert!(provider.get_credential(&mut first).await);
        assert!(!provider.get_credential(&mut first).await);

        // A fresh device starts at the top of the list.
        assert!(provider.get_credential(&mut second).await);
    }
}
