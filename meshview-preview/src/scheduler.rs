//! Cooperative redraw scheduling on the host's event loop
//!
//! The preview never owns a loop or a thread. [`RenderLoop`] asks the host
//! for a one-shot timer through [`HostScheduler`], renders a frame when the
//! host calls back, and asks again. Timer ids make late callbacks harmless:
//! a callback whose id is not the one currently pending is dropped.

use meshview_core::Result;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Handle of a one-shot timer issued by a [`HostScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// One-shot timers on the host's event loop
pub trait HostScheduler {
    /// Call back into the preview after `delay`
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Forget a timer. Cancelling a fired or unknown timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Self-rescheduling redraw loop
#[derive(Debug)]
pub struct RenderLoop {
    interval: Duration,
    pending: Option<TimerId>,
    running: bool,
    frames: u64,
}

impl RenderLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            running: false,
            frames: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames rendered since the loop was created
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Begin ticking. Does nothing if already running.
    pub fn start(&mut self, host: &mut dyn HostScheduler) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = Some(host.schedule(self.interval));
        tracing::debug!("Render loop started ({:?} interval)", self.interval);
    }

    /// Stop ticking and withdraw the pending timer
    pub fn cancel(&mut self, host: &mut dyn HostScheduler) {
        if let Some(id) = self.pending.take() {
            host.cancel(id);
        }
        if self.running {
            tracing::debug!("Render loop stopped after {} frame(s)", self.frames);
        }
        self.running = false;
    }

    /// Handle a timer callback.
    ///
    /// Runs `tick` if `id` is the pending timer and schedules the next one.
    /// Returns `Ok(false)` for stale timers. An error from `tick` stops the
    /// loop and is handed back to the caller.
    pub fn on_timer<F>(&mut self, id: TimerId, host: &mut dyn HostScheduler, tick: F) -> Result<bool>
    where
        F: FnOnce() -> Result<()>,
    {
        if !self.running || self.pending != Some(id) {
            return Ok(false);
        }
        self.pending = None;

        match tick() {
            Ok(()) => {
                self.frames += 1;
                self.pending = Some(host.schedule(self.interval));
                Ok(true)
            }
            Err(e) => {
                self.running = false;
                tracing::error!("Render loop stopped: {}", e);
                Err(e)
            }
        }
    }
}

/// A plain deadline queue that implements [`HostScheduler`].
///
/// Hosts without their own timer facility can drive the preview from it:
/// feed the current time to [`TimerQueue::due`] and dispatch each id to the
/// widget. Time is always supplied by the caller.
#[derive(Debug)]
pub struct TimerQueue {
    now: Instant,
    next_id: u64,
    timers: BTreeMap<TimerId, Instant>,
}

impl TimerQueue {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            next_id: 0,
            timers: BTreeMap::new(),
        }
    }

    /// Clock used for deadlines of timers scheduled from now on
    pub fn set_now(&mut self, now: Instant) {
        self.now = self.now.max(now);
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().min().copied()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Remove and return the timers due at `now`, earliest first
    pub fn due(&mut self, now: Instant) -> Vec<TimerId> {
        self.set_now(now);
        let mut fired: Vec<(Instant, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        fired.sort();
        for (_, id) in &fired {
            self.timers.remove(id);
        }
        fired.into_iter().map(|(_, id)| id).collect()
    }
}

impl HostScheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, self.now + delay);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}
