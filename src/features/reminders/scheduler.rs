//! # Feature: Reminder Scheduler
//!
//! Persists user reminders and delivers each one once its time comes, across
//! restarts and dropped connections.
//!
//! A single supervised dispatch loop always sleeps on the globally earliest
//! stored reminder inside the search horizon. Creating an earlier reminder
//! interrupts that sleep so the loop re-queries. Rows are deleted before the
//! notification goes out, so a crash in between drops the reminder instead of
//! duplicating it. Reminders due within the short threshold never reach the
//! store and are delivered by a one-off timer.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Any successful query resets the restart backoff
//! - 1.2.0: Skip delivery when the slept-on reminder was deleted meanwhile
//! - 1.1.0: Bounded idle wait so reminders beyond the horizon are picked up later
//! - 1.0.0: Initial release with gate, pre-emption and restart-on-failure

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use thiserror::Error;
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::clock::{Clock, SystemClock};
use super::duration::{parse_duration, DurationParseError};
use super::reminder::{NewReminder, Reminder};
use super::sink::{DeliveryError, ReminderSink};
use super::store::ReminderStore;

/// Reminders due this soon skip the store
pub const SHORT_REMINDER_THRESHOLD_SECS: i64 = 60;
/// Sleeping much beyond ~48 days is unreliable, 40 leaves margin
pub const SEARCH_HORIZON_DAYS: i64 = 40;
/// Ceiling for the delay between consecutive failed loop restarts
pub const MAX_RESTART_BACKOFF_SECS: u64 = 60;

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub short_threshold: Duration,
    pub horizon: Duration,
    pub max_restart_backoff: StdDuration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            short_threshold: Duration::seconds(SHORT_REMINDER_THRESHOLD_SECS),
            horizon: Duration::days(SEARCH_HORIZON_DAYS),
            max_restart_backoff: StdDuration::from_secs(MAX_RESTART_BACKOFF_SECS),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error(transparent)]
    InvalidDuration(#[from] DurationParseError),
    #[error("reminder time is out of range")]
    OutOfRange,
    #[error("failed to store reminder")]
    Store(#[source] anyhow::Error),
}

/// Handle to the reminder scheduler; cheap to clone and share between handlers
#[derive(Clone)]
pub struct ReminderScheduler {
    shared: Arc<Shared>,
}

struct Shared {
    store: Arc<dyn ReminderStore>,
    sink: Arc<dyn ReminderSink>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    /// Open while at least one reminder is known to be due inside the horizon
    gate: watch::Sender<bool>,
    /// Interrupts the loop's current sleep so it re-queries
    reschedule: Notify,
    shutdown: watch::Sender<bool>,
    /// Reminder the loop is currently sleeping on
    current: Mutex<Option<Reminder>>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn ReminderStore>, sink: Arc<dyn ReminderSink>) -> Self {
        Self::with_options(store, sink, Arc::new(SystemClock), SchedulerConfig::default())
    }

    pub fn with_options(
        store: Arc<dyn ReminderStore>,
        sink: Arc<dyn ReminderSink>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        let (gate, _) = watch::channel(false);
        let (shutdown, _) = watch::channel(false);

        Self {
            shared: Arc::new(Shared {
                store,
                sink,
                clock,
                config,
                gate,
                reschedule: Notify::new(),
                shutdown,
                current: Mutex::new(None),
                supervisor: Mutex::new(None),
            }),
        }
    }

    /// Spawn the dispatch loop. Calling this while it already runs is a no-op.
    pub async fn start(&self) {
        let mut supervisor = self.shared.supervisor.lock().await;
        if supervisor.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Reminder scheduler already running");
            return;
        }

        self.shared.shutdown.send_replace(false);
        let shared = Arc::clone(&self.shared);
        *supervisor = Some(tokio::spawn(async move { shared.supervise().await }));
    }

    /// Stop the dispatch loop at its next suspension point and wait for it
    pub async fn stop(&self) {
        self.shared.shutdown.send_replace(true);
        let handle = self.shared.supervisor.lock().await.take();

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Reminder dispatch loop ended abnormally: {e}");
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.shared
            .supervisor
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Current time according to the scheduler's clock
    pub fn now(&self) -> NaiveDateTime {
        self.shared.clock.now()
    }

    /// The reminder the dispatch loop is currently sleeping on, if any
    pub async fn current(&self) -> Option<Reminder> {
        self.shared.current.lock().await.clone()
    }

    /// Parse `delay` and create a reminder for `user_id`
    pub async fn create(
        &self,
        user_id: u64,
        delay: &str,
        initiator_message_url: &str,
        content: &str,
    ) -> Result<Reminder, ReminderError> {
        let delta = parse_duration(delay)?;
        self.create_after(user_id, delta, initiator_message_url, content)
            .await
    }

    /// Create a reminder firing `delta` from now
    pub async fn create_after(
        &self,
        user_id: u64,
        delta: Duration,
        initiator_message_url: &str,
        content: &str,
    ) -> Result<Reminder, ReminderError> {
        if delta <= Duration::zero() {
            return Err(DurationParseError::Zero.into());
        }

        let shared = &self.shared;
        let now = shared.clock.now();
        let trigger_at = now
            .checked_add_signed(delta)
            .ok_or(ReminderError::OutOfRange)?;

        let new = NewReminder {
            user_id,
            created_at: now,
            trigger_at,
            initiator_message_url: initiator_message_url.to_string(),
            content: content.to_string(),
        };

        if delta <= shared.config.short_threshold {
            let reminder = new.into_unsaved();
            debug!("Scheduling {reminder} on a one-off timer");
            self.spawn_short(reminder.clone(), delta);
            return Ok(reminder);
        }

        let id = shared
            .store
            .insert_reminder(&new)
            .await
            .map_err(ReminderError::Store)?;
        let reminder = Reminder::from_new(id, new);
        info!("Created {reminder}");

        if delta <= shared.config.horizon {
            shared.gate.send_replace(true);
        }

        // With nothing recorded the loop may be between its query and its
        // sleep; the stored permit makes it re-query once it gets there.
        let preempt = match shared.current.lock().await.as_ref() {
            Some(current) => reminder.trigger_at < current.trigger_at,
            None => true,
        };
        if preempt {
            debug!("{reminder} pre-empts the dispatch loop");
            shared.reschedule.notify_one();
        }

        Ok(reminder)
    }

    /// Pending reminders of `user_id`, earliest first
    pub async fn list(&self, user_id: u64) -> Result<Vec<Reminder>> {
        self.shared.store.get_user_reminders(user_id).await
    }

    /// Delete reminder `id` if `user_id` owns it
    pub async fn delete(&self, id: i64, user_id: u64) -> Result<bool> {
        let deleted = self.shared.store.delete_user_reminder(id, user_id).await?;
        if deleted {
            info!("Deleted reminder #{id} for user {user_id}");
            self.release_current_if(|current| current.id == Some(id))
                .await;
        }
        Ok(deleted)
    }

    /// Delete every reminder owned by `user_id`
    pub async fn clear(&self, user_id: u64) -> Result<bool> {
        let cleared = self.shared.store.clear_user_reminders(user_id).await?;
        if cleared {
            info!("Cleared reminders for user {user_id}");
            self.release_current_if(|current| current.user_id == user_id)
                .await;
        }
        Ok(cleared)
    }

    /// Wake the loop if it is sleeping on a reminder that no longer exists
    async fn release_current_if<F>(&self, predicate: F)
    where
        F: Fn(&Reminder) -> bool,
    {
        let sleeping_on_removed = self
            .shared
            .current
            .lock()
            .await
            .as_ref()
            .is_some_and(predicate);
        if sleeping_on_removed {
            self.shared.reschedule.notify_one();
        }
    }

    fn spawn_short(&self, reminder: Reminder, delta: Duration) {
        let sink = Arc::clone(&self.shared.sink);
        let wait = delta.to_std().unwrap_or_default();

        tokio::spawn(async move {
            sleep(wait).await;
            match sink.deliver(&reminder).await {
                Ok(()) => info!("Delivered {reminder}"),
                Err(DeliveryError::Unreachable(user_id)) => {
                    info!("Dropped {reminder}: user {user_id} is unreachable")
                }
                Err(DeliveryError::Transient(e)) => warn!("Failed to deliver {reminder}: {e:#}"),
            }
        });
    }
}

impl Shared {
    async fn supervise(self: Arc<Self>) {
        info!("⏰ Reminder dispatch loop started");
        let mut failures: u32 = 0;

        loop {
            match self.dispatch(&mut failures).await {
                Ok(()) => break,
                Err(e) => {
                    *self.current.lock().await = None;
                    let backoff = restart_backoff(failures, self.config.max_restart_backoff);
                    failures = failures.saturating_add(1);
                    warn!(
                        "Reminder dispatch loop failed: {e:#}; restarting in {:.0}s",
                        backoff.as_secs_f64()
                    );

                    if !backoff.is_zero() {
                        let mut shutdown = self.shutdown.subscribe();
                        tokio::select! {
                            _ = wait_until_set(&mut shutdown) => break,
                            _ = sleep(backoff) => {}
                        }
                    }
                }
            }
        }

        *self.current.lock().await = None;
        info!("Reminder dispatch loop stopped");
    }

    /// Runs until shutdown (`Ok`) or the first store/delivery failure (`Err`)
    async fn dispatch(&self, failures: &mut u32) -> Result<()> {
        let mut shutdown = self.shutdown.subscribe();
        let mut gate = self.gate.subscribe();

        loop {
            if *shutdown.borrow() {
                return Ok(());
            }

            // Closed before the query: a reminder inserted after this point
            // reopens it, one inserted before is seen by the query.
            self.gate.send_replace(false);

            let now = self.clock.now();
            let horizon_end = now
                .checked_add_signed(self.config.horizon)
                .unwrap_or(NaiveDateTime::MAX);
            let next = self
                .store
                .next_reminder_before(horizon_end)
                .await
                .context("failed to fetch the next reminder")?;
            *failures = 0;

            let Some(reminder) = next else {
                *self.current.lock().await = None;
                debug!("No reminders due within the horizon, idling");

                let idle_limit = self.config.horizon.to_std().unwrap_or(StdDuration::MAX);
                tokio::select! {
                    _ = wait_until_set(&mut shutdown) => return Ok(()),
                    _ = wait_until_set(&mut gate) => {}
                    _ = sleep(idle_limit) => {}
                }
                continue;
            };

            *self.current.lock().await = Some(reminder.clone());
            let wait = (reminder.trigger_at - self.clock.now())
                .to_std()
                .unwrap_or_default();
            debug!("Sleeping {:.0}s until {reminder}", wait.as_secs_f64());

            tokio::select! {
                _ = wait_until_set(&mut shutdown) => return Ok(()),
                _ = self.reschedule.notified() => {
                    debug!("Dispatch loop pre-empted while waiting on {reminder}");
                    continue;
                }
                _ = sleep(wait) => {}
            }

            *self.current.lock().await = None;
            self.fire(&reminder).await?;
        }
    }

    /// Delete then deliver; the delete is the durability boundary
    async fn fire(&self, reminder: &Reminder) -> Result<()> {
        let Some(id) = reminder.id else {
            return Ok(());
        };

        let deleted = self
            .store
            .delete_reminder_by_id(id)
            .await
            .with_context(|| format!("failed to delete {reminder}"))?;
        if !deleted {
            debug!("{reminder} was removed before it fired");
            return Ok(());
        }

        match self.sink.deliver(reminder).await {
            Ok(()) => {
                info!("Delivered {reminder}");
                Ok(())
            }
            Err(DeliveryError::Unreachable(user_id)) => {
                info!("Dropped {reminder}: user {user_id} is unreachable");
                Ok(())
            }
            Err(DeliveryError::Transient(e)) => {
                Err(e.context(format!("failed to deliver {reminder}")))
            }
        }
    }
}

/// First restart after a healthy run is immediate, then 1s doubling up to `max`
fn restart_backoff(failures: u32, max: StdDuration) -> StdDuration {
    if failures == 0 {
        return StdDuration::ZERO;
    }
    let exponent = (failures - 1).min(16);
    StdDuration::from_secs(1u64 << exponent).min(max)
}

/// Resolve once the watched flag is true
async fn wait_until_set(flag: &mut watch::Receiver<bool>) {
    if flag.wait_for(|set| *set).await.is_err() {
        // Sender gone means the scheduler is being torn down
        std::future::pending::<()>().await;
    }
}
