//! Timers and frame callbacks
//!
//! Every deferred action on the page goes through a [`Scheduler`]: either a
//! one-shot timer or a callback for the next paint frame. Debounced actions
//! use a [`DebounceSlot`], which always cancels its pending timer before
//! scheduling a new one.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Nominal frame interval used by hosts that drive frames themselves
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Callback fired when a timer elapses
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Callback fired on the next paint frame, with the frame timestamp
pub type FrameCallback = Box<dyn FnOnce(Duration) + Send + 'static>;

/// Handle identifying a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Host capability for deferred work
pub trait Scheduler: Send + Sync {
    /// Run `callback` once after `delay`
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a pending timer. Cancelling a fired or unknown timer is a no-op.
    fn cancel(&self, handle: TimerHandle);

    /// Run `callback` before the next paint
    fn request_frame(&self, callback: FrameCallback);

    /// Current time on the host timeline
    fn now(&self) -> Duration;
}

#[derive(Default)]
struct SlotState {
    handle: Option<TimerHandle>,
    generation: u64,
}

/// A single debounce slot: at most one timer is pending at any time
pub struct DebounceSlot {
    scheduler: Arc<dyn Scheduler>,
    state: Arc<Mutex<SlotState>>,
}

impl DebounceSlot {
    /// Create an empty slot on the given scheduler
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            state: Arc::new(Mutex::new(SlotState::default())),
        }
    }

    /// Cancel the pending timer, if any, and schedule `f` after `delay`.
    ///
    /// The slot lock is released while talking to the scheduler, so a host
    /// that fires short timers inline cannot deadlock.
    pub fn reschedule<F>(&self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let (stale, generation) = {
            let mut state = self.state.lock();
            state.generation += 1;
            (state.handle.take(), state.generation)
        };
        if let Some(handle) = stale {
            self.scheduler.cancel(handle);
        }

        let slot = Arc::clone(&self.state);
        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || {
                {
                    let mut state = slot.lock();
                    if state.generation != generation {
                        return;
                    }
                    // Fired: later bookkeeping for this generation is void
                    state.generation += 1;
                    state.handle = None;
                }
                f();
            }),
        );

        let mut state = self.state.lock();
        if state.generation == generation {
            state.handle = Some(handle);
        }
    }

    /// Cancel the pending timer. Returns `true` if one was pending.
    pub fn cancel_pending(&self) -> bool {
        let pending = {
            let mut state = self.state.lock();
            let handle = state.handle.take();
            if handle.is_some() {
                state.generation += 1;
            }
            handle
        };

        match pending {
            Some(handle) => {
                self.scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }

    /// Whether a timer is currently pending in this slot
    pub fn is_pending(&self) -> bool {
        self.state.lock().handle.is_some()
    }
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, u64), TimerCallback>,
    deadlines: AHashMap<u64, Duration>,
    frames: Vec<FrameCallback>,
}

/// Deterministic scheduler whose time only moves when told to.
///
/// Used by the headless replay binary and by tests. Timers with equal
/// deadlines fire in scheduling order.
#[derive(Default)]
pub struct VirtualClock {
    state: Mutex<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `by`, firing every timer that falls due.
    ///
    /// Timers scheduled by fired callbacks also run if they fall inside the
    /// window. Returns the number of timers fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now + by;
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.state.lock();
                let due = state
                    .timers
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);

                due.and_then(|key| {
                    state.deadlines.remove(&key.1);
                    state.now = state.now.max(key.0);
                    state.timers.remove(&key)
                })
            };

            match next {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => break,
            }
        }

        let mut state = self.state.lock();
        state.now = state.now.max(target);
        fired
    }

    /// Run the callbacks queued for the current frame.
    ///
    /// Callbacks requested while the frame runs are queued for the next one.
    pub fn run_frame(&self) -> usize {
        let (frames, now) = {
            let mut state = self.state.lock();
            (std::mem::take(&mut state.frames), state.now)
        };

        let count = frames.len();
        for callback in frames {
            callback(now);
        }
        count
    }

    /// Advance by one frame interval, then run the frame
    pub fn tick(&self) -> usize {
        self.advance(FRAME_INTERVAL);
        self.run_frame()
    }

    /// Number of timers waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.state.lock().frames.len()
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let deadline = state.now + delay;
        state.timers.insert((deadline, id), callback);
        state.deadlines.insert(id, deadline);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut state = self.state.lock();
        if let Some(deadline) = state.deadlines.remove(&handle.0) {
            state.timers.remove(&(deadline, handle.0));
        }
    }

    fn request_frame(&self, callback: FrameCallback) {
        self.state.lock().frames.push(callback);
    }

    fn now(&self) -> Duration {
        self.state.lock().now
    }
}
