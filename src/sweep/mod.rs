//! DiscoveryManager - discovery-and-login sweeps
//!
//! ## Responsibilities
//!
//! - Spawn one detached sweep task per `start_discover` call
//! - Drive the per-device credential/login retry protocol
//! - Append fully resolved records to the caller's collection
//! - Job bookkeeping and outcome event distribution
//!
//! The sweep task holds clones of everything it needs, so dropping the
//! manager (or the caller moving on) never invalidates a running sweep.
//! There is no cancellation handle: a sweep ends when its device loop does.

mod events;
mod job;

pub use events::SweepEvent;
pub use job::{SweepJob, SweepLogEntry, SweepLogEventType, SweepStatus, SweepSummary};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::config::DiscoveryConfig;
use crate::credentials::CredentialProvider;
use crate::device::OnvifDevice;
use crate::session::{LoginStatus, Session, SessionFactory};

/// Caller-owned result collection shared with sweep tasks.
///
/// Sweeps only append, and only fully resolved records. Shared ownership
/// keeps the collection alive for as long as a sweep is running; the lock
/// makes caller reads during a sweep safe.
pub type SharedDevices = Arc<RwLock<Vec<OnvifDevice>>>;

type Jobs = Arc<RwLock<HashMap<Uuid, SweepJob>>>;

/// Discovery sweep orchestrator
pub struct DiscoveryManager<F: SessionFactory> {
    factory: Arc<F>,
    config: DiscoveryConfig,
    jobs: Jobs,
    events: broadcast::Sender<SweepEvent>,
}

impl<F: SessionFactory> DiscoveryManager<F> {
    /// Create a manager with the default configuration
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, DiscoveryConfig::default())
    }

    pub fn with_config(factory: F, config: DiscoveryConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            factory: Arc::new(factory),
            config,
            jobs: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    /// Subscribe to sweep events
    pub fn subscribe(&self) -> broadcast::Receiver<SweepEvent> {
        self.events.subscribe()
    }

    /// Get a sweep job by id
    pub async fn job(&self, sweep_id: &Uuid) -> Option<SweepJob> {
        let jobs = self.jobs.read().await;
        jobs.get(sweep_id).cloned()
    }

    /// List all sweep jobs
    pub async fn jobs(&self) -> Vec<SweepJob> {
        let jobs = self.jobs.read().await;
        jobs.values().cloned().collect()
    }

    /// Start a discovery-and-login sweep.
    ///
    /// Returns as soon as the sweep task is scheduled; `results` is never
    /// touched synchronously. `on_complete` is invoked exactly once when
    /// every responding device has reached a terminal state, whether or not
    /// any of them resolved. Per-device parse failures and abandonments are
    /// not reported through it; inspect `results`, the returned job, or the
    /// event stream for outcomes.
    pub async fn start_discover<C>(
        &self,
        results: SharedDevices,
        on_complete: C,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Uuid
    where
        C: FnOnce() + Send + 'static,
    {
        let sweep_id = Uuid::new_v4();

        {
            let mut jobs = self.jobs.write().await;
            jobs.insert(sweep_id, SweepJob::new(sweep_id));
        }

        tracing::info!(sweep_id = %sweep_id, "Sweep scheduled");

        let factory = self.factory.clone();
        let config = self.config.clone();
        let jobs = self.jobs.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            run_sweep(sweep_id, factory, config, jobs, events, results, credentials).await;
            on_complete();
        });

        sweep_id
    }

    /// Fetch profile and device information for a single known device.
    ///
    /// Spawns a detached task that opens its own session, refreshes the
    /// record in place and hands it to `on_filled`. On session failure the
    /// record is returned unfilled with `last_error` set.
    pub fn start_fill<C>(&self, device: OnvifDevice, on_filled: C)
    where
        C: FnOnce(OnvifDevice) + Send + 'static,
    {
        let factory = self.factory.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            let mut device = device;
            match factory.open(&config).await {
                Ok(mut session) => {
                    session.get_profile(&mut device).await;
                    session.get_device_information(&mut device).await;
                    device.filled = true;
                    tracing::debug!(address = %device.address, "Device record filled");
                }
                Err(e) => {
                    tracing::error!(
                        address = %device.address,
                        error = %e,
                        "Session open failed, returning device unfilled"
                    );
                    device.last_error = Some(e.to_string());
                }
            }
            on_filled(device);
        });
    }
}

/// Add a log entry to a job
async fn add_log(jobs: &Jobs, sweep_id: &Uuid, entry: SweepLogEntry) {
    let mut jobs = jobs.write().await;
    if let Some(job) = jobs.get_mut(sweep_id) {
        job.logs.push(entry);
    }
}

/// Mark a sweep failed before any device was processed
async fn fail_sweep(jobs: &Jobs, events: &broadcast::Sender<SweepEvent>, sweep_id: Uuid, message: String) {
    tracing::error!(sweep_id = %sweep_id, error = %message, "Sweep failed");
    {
        let mut jobs = jobs.write().await;
        if let Some(job) = jobs.get_mut(&sweep_id) {
            job.status = SweepStatus::Failed;
            job.ended_at = Some(Utc::now());
            job.logs
                .push(SweepLogEntry::new("*", SweepLogEventType::Error, &message));
        }
    }
    let _ = events.send(SweepEvent::SweepFailed { sweep_id, message });
}

/// Run one sweep to completion (executed on the detached task)
async fn run_sweep<F: SessionFactory>(
    sweep_id: Uuid,
    factory: Arc<F>,
    config: DiscoveryConfig,
    jobs: Jobs,
    events: broadcast::Sender<SweepEvent>,
    results: SharedDevices,
    credentials: Arc<dyn CredentialProvider>,
) {
    {
        let mut jobs = jobs.write().await;
        if let Some(job) = jobs.get_mut(&sweep_id) {
            job.started_at = Some(Utc::now());
            job.logs
                .push(SweepLogEntry::new("*", SweepLogEventType::Info, "Sweep started"));
        }
    }
    let _ = events.send(SweepEvent::SweepStarted { sweep_id });

    let mut session = match factory.open(&config).await {
        Ok(session) => session,
        Err(e) => {
            fail_sweep(&jobs, &events, sweep_id, format!("Session open failed: {}", e)).await;
            return;
        }
    };

    let count = match session.broadcast().await {
        Ok(count) => count,
        Err(e) => {
            fail_sweep(&jobs, &events, sweep_id, format!("Broadcast failed: {}", e)).await;
            return;
        }
    };

    tracing::info!(sweep_id = %sweep_id, devices = count, "Discovery broadcast complete");
    add_log(
        &jobs,
        &sweep_id,
        SweepLogEntry::new(
            "*",
            SweepLogEventType::Broadcast,
            &format!("{} device(s) responded", count),
        ),
    )
    .await;
    let _ = events.send(SweepEvent::DevicesAnnounced { sweep_id, count });

    let mut summary = SweepSummary {
        devices_announced: count as u32,
        ..Default::default()
    };

    for index in 0..count {
        let mut device = OnvifDevice::default();

        if !session.prepare_device(index, &mut device).await {
            summary.devices_skipped += 1;
            tracing::debug!(sweep_id = %sweep_id, index, "Unreadable advertisement, skipping device");
            add_log(
                &jobs,
                &sweep_id,
                SweepLogEntry::new(
                    "*",
                    SweepLogEventType::DeviceSkipped,
                    &format!("Device {} advertisement could not be parsed", index),
                ),
            )
            .await;
            let _ = events.send(SweepEvent::DeviceSkipped { sweep_id, index });
            continue;
        }

        let mut attempts = 0u32;
        loop {
            if !credentials.get_credential(&mut device).await {
                summary.devices_abandoned += 1;
                tracing::debug!(
                    sweep_id = %sweep_id,
                    address = %device.address,
                    attempts,
                    "Credentials declined, abandoning device"
                );
                add_log(
                    &jobs,
                    &sweep_id,
                    SweepLogEntry::new(
                        &device.address,
                        SweepLogEventType::DeviceAbandoned,
                        "Credentials declined",
                    ),
                )
                .await;
                let _ = events.send(SweepEvent::DeviceAbandoned {
                    sweep_id,
                    index,
                    address: device.address.clone(),
                    attempts,
                });
                break;
            }

            attempts += 1;
            match session.fill_rtsp(&mut device).await {
                LoginStatus::Ok => {
                    device.clear_last_error();
                    session.get_profile(&mut device).await;
                    session.get_device_information(&mut device).await;

                    {
                        let mut devices = results.write().await;
                        devices.push(device.clone());
                    }

                    summary.devices_resolved += 1;
                    tracing::info!(
                        sweep_id = %sweep_id,
                        address = %device.address,
                        name = ?device.camera_name,
                        "Log in success"
                    );
                    add_log(
                        &jobs,
                        &sweep_id,
                        SweepLogEntry::new(
                            &device.address,
                            SweepLogEventType::DeviceResolved,
                            &format!("Resolved as {}", device.display_name()),
                        ),
                    )
                    .await;
                    let _ = events.send(SweepEvent::DeviceResolved {
                        sweep_id,
                        index,
                        address: device.address.clone(),
                        name: device.camera_name.clone(),
                    });
                    break;
                }
                LoginStatus::Denied(code) => {
                    device.last_error = Some(format!("login denied (status {})", code));
                    tracing::debug!(
                        sweep_id = %sweep_id,
                        address = %device.address,
                        attempt = attempts,
                        code,
                        "Login denied, requesting credentials again"
                    );
                    add_log(
                        &jobs,
                        &sweep_id,
                        SweepLogEntry::new(
                            &device.address,
                            SweepLogEventType::LoginDenied,
                            &format!("Login denied (status {}), attempt {}", code, attempts),
                        ),
                    )
                    .await;
                    let _ = events.send(SweepEvent::LoginDenied {
                        sweep_id,
                        index,
                        address: device.address.clone(),
                        attempt: attempts,
                        code,
                    });

                    if let Some(cap) = config.max_login_attempts {
                        if attempts >= cap {
                            summary.devices_abandoned += 1;
                            tracing::warn!(
                                sweep_id = %sweep_id,
                                address = %device.address,
                                attempts,
                                "Login attempt cap reached, abandoning device"
                            );
                            add_log(
                                &jobs,
                                &sweep_id,
                                SweepLogEntry::new(
                                    &device.address,
                                    SweepLogEventType::DeviceAbandoned,
                                    &format!("Abandoned after {} login attempts", attempts),
                                ),
                            )
                            .await;
                            let _ = events.send(SweepEvent::DeviceAbandoned {
                                sweep_id,
                                index,
                                address: device.address.clone(),
                                attempts,
                            });
                            break;
                        }
                    }
                }
            }
        }
    }

    {
        let mut jobs = jobs.write().await;
        if let Some(job) = jobs.get_mut(&sweep_id) {
            job.status = SweepStatus::Completed;
            job.ended_at = Some(Utc::now());
            job.summary = Some(summary);
            job.logs.push(SweepLogEntry::new(
                "*",
                SweepLogEventType::Info,
                &format!(
                    "Sweep complete: resolved={} skipped={} abandoned={}",
                    summary.devices_resolved, summary.devices_skipped, summary.devices_abandoned
                ),
            ));
        }
    }
    let _ = events.send(SweepEvent::SweepCompleted { sweep_id, summary });

    tracing::info!(
        sweep_id = %sweep_id,
        devices_announced = summary.devices_announced,
        devices_resolved = summary.devices_resolved,
        devices_skipped = summary.devices_skipped,
        devices_abandoned = summary.devices_abandoned,
        "Sweep completed"
    );
}
