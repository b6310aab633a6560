//! Scroll sampler implementation

use super::{sanitize_scroll, ScrollFrame, ScrollSubscriber, Viewport};
use crate::scheduler::Scheduler;
use std::sync::{Arc, Weak};
use std::time::Duration;
use parking_lot::{Mutex, RwLock};
use tracing::trace;

/// Sampler state stored internally
#[derive(Debug, Default)]
struct SamplerState {
    /// A frame callback is pending
    ticking: bool,
    last_frame: Option<ScrollFrame>,
    frames_emitted: u64,
}

type Subscribers = Arc<RwLock<Vec<Weak<dyn ScrollSubscriber>>>>;

/// Collapses raw scroll events into one frame per paint
pub struct ScrollSampler {
    viewport: Arc<dyn Viewport>,
    scheduler: Arc<dyn Scheduler>,
    state: Arc<Mutex<SamplerState>>,
    subscribers: Subscribers,
}

impl ScrollSampler {
    /// Create a new sampler reading from `viewport`
    pub fn new(viewport: Arc<dyn Viewport>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            viewport,
            scheduler,
            state: Arc::new(Mutex::new(SamplerState::default())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Handle a raw scroll event from the host.
    ///
    /// Requests a frame callback unless one is already pending. Returns
    /// `true` if a new frame was requested.
    pub fn on_scroll(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.ticking {
                return false;
            }
            state.ticking = true;
        }

        let viewport = Arc::clone(&self.viewport);
        let state = Arc::clone(&self.state);
        let subscribers = Arc::clone(&self.subscribers);

        self.scheduler.request_frame(Box::new(move |timestamp| {
            state.lock().ticking = false;
            emit(&*viewport, &state, &subscribers, timestamp);
        }));
        true
    }

    /// Emit a frame right away, outside the frame cadence (initial paint)
    pub fn sample_now(&self) {
        let timestamp = self.scheduler.now();
        emit(&*self.viewport, &self.state, &self.subscribers, timestamp);
    }

    /// Add a subscriber. Only a weak reference is kept.
    pub fn add_subscriber(&self, subscriber: Arc<dyn ScrollSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Number of subscribers still alive
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Whether a frame callback is pending
    pub fn is_ticking(&self) -> bool {
        self.state.lock().ticking
    }

    /// The most recently emitted frame
    pub fn last_frame(&self) -> Option<ScrollFrame> {
        self.state.lock().last_frame
    }

    pub fn frames_emitted(&self) -> u64 {
        self.state.lock().frames_emitted
    }
}

/// Read the viewport now and notify all live subscribers
fn emit(
    viewport: &dyn Viewport,
    state: &Mutex<SamplerState>,
    subscribers: &RwLock<Vec<Weak<dyn ScrollSubscriber>>>,
    timestamp: Duration,
) {
    let frame = ScrollFrame {
        scroll_top: sanitize_scroll(viewport.scroll_top()),
        metrics: viewport.metrics(),
        timestamp,
    };

    {
        let mut state = state.lock();
        state.last_frame = Some(frame);
        state.frames_emitted += 1;
    }

    let live: Vec<Arc<dyn ScrollSubscriber>> = {
        let mut subscribers = subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);
        subscribers.iter().filter_map(Weak::upgrade).collect()
    };

    trace!(scroll_top = frame.scroll_top, subscribers = live.len(), "scroll frame");

    for subscriber in live {
        subscriber.on_scroll_frame(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::VirtualClock;
    use crate::scroll::{SimulatedViewport, ViewportMetrics};

    #[derive(Default)]
    struct Collector {
        seen: Mutex<Vec<f64>>,
    }

    impl ScrollSubscriber for Collector {
        fn on_scroll_frame(&self, frame: &ScrollFrame) {
            self.seen.lock().push(frame.scroll_top);
        }
    }

    fn setup() -> (Arc<SimulatedViewport>, Arc<VirtualClock>, ScrollSampler) {
        let viewport = Arc::new(SimulatedViewport::new(ViewportMetrics::new(1280.0, 800.0, 4000.0)));
        let clock = Arc::new(VirtualClock::new());
        let sampler = ScrollSampler::new(viewport.clone(), clock.clone());
        (viewport, clock, sampler)
    }

    #[test]
    fn test_one_frame_per_burst() {
        let (viewport, clock, sampler) = setup();
        let collector = Arc::new(Collector::default());
        sampler.add_subscriber(collector.clone());

        viewport.scroll_to(10.0);
        assert!(sampler.on_scroll());
        viewport.scroll_to(20.0);
        assert!(!sampler.on_scroll());
        viewport.scroll_to(30.0);
        assert!(!sampler.on_scroll());

        assert_eq!(clock.pending_frames(), 1);
        clock.tick();

        // Reads the offset at frame time, not at event time
        assert_eq!(*collector.seen.lock(), vec![30.0]);
        assert!(!sampler.is_ticking());
    }

    #[test]
    fn test_flag_resets_for_next_frame() {
        let (viewport, clock, sampler) = setup();
        let collector = Arc::new(Collector::default());
        sampler.add_subscriber(collector.clone());

        viewport.scroll_to(100.0);
        sampler.on_scroll();
        clock.tick();

        viewport.scroll_to(200.0);
        assert!(sampler.on_scroll());
        clock.tick();

        assert_eq!(*collector.seen.lock(), vec![100.0, 200.0]);
        assert_eq!(sampler.frames_emitted(), 2);
    }

    #[test]
    fn test_negative_scroll_is_clamped() {
        let (viewport, clock, sampler) = setup();
        let collector = Arc::new(Collector::default());
        sampler.add_subscriber(collector.clone());

        viewport.scroll_to(-45.0);
        sampler.on_scroll();
        clock.tick();

        assert_eq!(*collector.seen.lock(), vec![0.0]);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let (_viewport, clock, sampler) = setup();
        let kept = Arc::new(Collector::default());
        sampler.add_subscriber(kept.clone());
        {
            let dropped = Arc::new(Collector::default());
            sampler.add_subscriber(dropped.clone());
            assert_eq!(sampler.subscriber_count(), 2);
        }

        sampler.on_scroll();
        clock.tick();
        assert_eq!(sampler.subscriber_count(), 1);
        assert_eq!(kept.seen.lock().len(), 1);
    }

    #[test]
    fn test_frame_timestamps_are_monotonic() {
        let (_viewport, clock, sampler) = setup();
        let mut stamps = Vec::new();

        for _ in 0..3 {
            sampler.on_scroll();
            clock.tick();
            stamps.push(sampler.last_frame().map(|f| f.timestamp));
        }

        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }
}
