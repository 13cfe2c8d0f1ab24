//! Credential-expiry countdown
//!
//! Owns the single repeating timer that turns a token's expiry window into
//! a "time remaining as percentage" signal, mirroring the password progress
//! bar of the portal web UI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::token::TokenExpiry;

/// Tick resolution of the countdown timer.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Wall-clock source, injectable so countdown behavior is testable under
/// simulated time.
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> i64;
}

/// Production clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Receiver of countdown updates (the presentation surface).
///
/// `percent` is delivered on every tick while counting, plus immediately on
/// activation (100) and deactivation (0). `expired` is delivered at most
/// once per activation.
pub trait ExpirySink: Send + Sync + 'static {
    fn percent(&self, value: f64);
    fn expired(&self);
}

/// Countdown signal for channel-based sinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpirySignal {
    Percent(f64),
    Expired,
}

/// Sink forwarding signals over an unbounded channel.
pub struct ChannelSink(pub mpsc::UnboundedSender<ExpirySignal>);

impl ExpirySink for ChannelSink {
    fn percent(&self, value: f64) {
        let _ = self.0.send(ExpirySignal::Percent(value));
    }

    fn expired(&self) {
        let _ = self.0.send(ExpirySignal::Expired);
    }
}

/// Tracks the expiry of the current token.
///
/// At most one timer task is alive at any time; `set_token` and `clear`
/// abort the previous task before anything else. Aborting alone cannot stop
/// a tick already mid-poll on another worker thread, so every task emission
/// happens under the generation lock: a tick whose generation was replaced
/// is discarded, never emitted. No tick from an earlier token generation is
/// observed after `set_token`/`clear` return.
pub struct ExpiryTracker {
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ExpirySink>,
    timer: Option<JoinHandle<()>>,
    active: Arc<AtomicBool>,
    /// Current token generation; bumped on every cancel.
    generation: Arc<Mutex<u64>>,
}

fn lock_generation(generation: &Mutex<u64>) -> MutexGuard<'_, u64> {
    generation.lock().unwrap_or_else(|e| e.into_inner())
}

impl ExpiryTracker {
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn ExpirySink>) -> Self {
        Self {
            clock,
            sink,
            timer: None,
            active: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(Mutex::new(0)),
        }
    }

    /// Track a new token value.
    ///
    /// A token without usable expiry metadata (including the empty string)
    /// deactivates tracking and drops the gauge to 0, the "field cleared"
    /// case. A valid token emits 100 immediately and starts the 1-second
    /// countdown timer.
    pub fn set_token(&mut self, token: &str) {
        let current = self.cancel_timer();

        let Some(expiry) = TokenExpiry::parse(token) else {
            self.active.store(false, Ordering::Relaxed);
            self.sink.percent(0.0);
            return;
        };

        tracing::debug!(
            expires_at_millis = expiry.expires_at_millis,
            window_millis = expiry.window_millis,
            "starting expiry countdown"
        );

        self.active.store(true, Ordering::Relaxed);
        self.sink.percent(100.0);

        let clock = Arc::clone(&self.clock);
        let sink = Arc::clone(&self.sink);
        let active = Arc::clone(&self.active);
        let generation = Arc::clone(&self.generation);
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            // The first interval tick completes immediately; 100% was
            // already emitted synchronously.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let percent = expiry.percent_at(clock.now_millis());
                // Emit under the generation lock: once a cancel has bumped
                // the generation, this tick is stale and must be dropped.
                let guard = lock_generation(&generation);
                if *guard != current {
                    break;
                }
                if percent <= 0.0 {
                    active.store(false, Ordering::Relaxed);
                    sink.expired();
                    break;
                }
                sink.percent(percent);
                drop(guard);
            }
        }));
    }

    /// Stop tracking and drop the gauge to 0. Idempotent.
    pub fn clear(&mut self) {
        self.cancel_timer();
        self.active.store(false, Ordering::Relaxed);
        self.sink.percent(0.0);
    }

    /// Whether a countdown is currently running.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Bump the token generation and abort any outstanding timer task.
    /// Returns the new generation. Taking the lock waits out a tick that is
    /// already emitting, so once this returns no stale emission can follow.
    fn cancel_timer(&mut self) -> u64 {
        let mut guard = lock_generation(&self.generation);
        *guard += 1;
        let current = *guard;
        drop(guard);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        current
    }
}

impl Drop for ExpiryTracker {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
