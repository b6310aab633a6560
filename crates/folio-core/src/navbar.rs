//! Navbar visibility controller
//!
//! Adds "scrolled" styling past a small offset and, on mobile widths, hides
//! the bar while the user scrolls down. A debounce forces it back into view
//! whenever scrolling pauses, so it can never stay hidden.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::NavbarConfig;
use crate::events::{events::NavbarModeChanged, EventBus};
use crate::present::{Command, PresentationSink, Target, Transform};
use crate::scheduler::{DebounceSlot, Scheduler};
use crate::scroll::{ScrollFrame, ScrollSubscriber};

/// Visual mode of the navbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavMode {
    /// Visible, page near the top (no "scrolled" styling)
    Top,
    /// Visible with "scrolled" styling
    Shown,
    /// Slid out of view
    Hidden,
}

impl NavMode {
    pub fn is_visible(self) -> bool {
        self != NavMode::Hidden
    }
}

#[derive(Debug)]
struct NavbarState {
    mode: NavMode,
    scrolled: bool,
    last_scroll_top: f64,
}

/// Owns the navbar mode and its direction memory
pub struct NavbarController {
    config: NavbarConfig,
    state: Arc<Mutex<NavbarState>>,
    settle: DebounceSlot,
    sink: Arc<dyn PresentationSink>,
    events: Arc<EventBus>,
}

impl NavbarController {
    pub fn new(
        config: NavbarConfig,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn PresentationSink>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(NavbarState {
                mode: NavMode::Top,
                scrolled: false,
                last_scroll_top: 0.0,
            })),
            settle: DebounceSlot::new(scheduler),
            sink,
            events,
        }
    }

    /// Process one sampled scroll offset at the given viewport width
    pub fn update(&self, scroll_top: f64, viewport_width: f64) -> NavMode {
        let mobile = viewport_width <= self.config.mobile_breakpoint;
        let mut commands = Vec::new();

        let (mode, changed) = {
            let mut state = self.state.lock();

            let scrolled = scroll_top > self.config.scrolled_threshold;
            if scrolled != state.scrolled {
                state.scrolled = scrolled;
                commands.push(Command::class(Target::Navbar, "scrolled", scrolled));
            }

            let scrolling_down = scroll_top > state.last_scroll_top;
            let mode = if mobile && scrolling_down && scroll_top > self.config.hide_threshold {
                NavMode::Hidden
            } else if scrolled {
                NavMode::Shown
            } else {
                NavMode::Top
            };

            let changed = set_mode(&mut state, mode, &mut commands);
            state.last_scroll_top = scroll_top;
            (mode, changed)
        };

        self.sink.apply_batch(commands);
        if changed {
            debug!(?mode, scroll_top, "navbar mode changed");
            self.events.publish(NavbarModeChanged { mode });
        }

        if mobile {
            let state = Arc::clone(&self.state);
            let sink = Arc::clone(&self.sink);
            let events = Arc::clone(&self.events);
            self.settle.reschedule(self.config.settle_delay(), move || {
                settle(&state, &*sink, &events);
            });
        }

        mode
    }

    pub fn mode(&self) -> NavMode {
        self.state.lock().mode
    }

    pub fn is_scrolled(&self) -> bool {
        self.state.lock().scrolled
    }

    pub fn last_scroll_top(&self) -> f64 {
        self.state.lock().last_scroll_top
    }

    /// Whether a settle timer is pending
    pub fn is_settling(&self) -> bool {
        self.settle.is_pending()
    }
}

impl ScrollSubscriber for NavbarController {
    fn on_scroll_frame(&self, frame: &ScrollFrame) {
        self.update(frame.scroll_top, frame.metrics.width);
    }
}

/// Store `mode`, pushing a transform when visibility flips.
/// Returns `true` if the mode changed.
fn set_mode(state: &mut NavbarState, mode: NavMode, commands: &mut Vec<Command>) -> bool {
    if state.mode == mode {
        return false;
    }

    if state.mode.is_visible() != mode.is_visible() {
        let transform = if mode.is_visible() {
            Transform::Identity
        } else {
            Transform::TranslateYPercent { percent: -100.0 }
        };
        commands.push(Command::transform(Target::Navbar, transform));
    }

    state.mode = mode;
    true
}

/// Scrolling paused: bring the navbar back
fn settle(state: &Mutex<NavbarState>, sink: &dyn PresentationSink, events: &EventBus) {
    let mut commands = Vec::new();
    let (mode, changed) = {
        let mut state = state.lock();
        let mode = if state.scrolled { NavMode::Shown } else { NavMode::Top };
        (mode, set_mode(&mut state, mode, &mut commands))
    };

    sink.apply_batch(commands);
    if changed {
        debug!(?mode, "navbar settled");
        events.publish(NavbarModeChanged { mode });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::RecordingSink;
    use crate::scheduler::VirtualClock;
    use std::time::Duration;

    fn setup() -> (Arc<VirtualClock>, Arc<RecordingSink>, NavbarController) {
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let navbar = NavbarController::new(
            NavbarConfig::default(),
            clock.clone(),
            sink.clone(),
            Arc::new(EventBus::new()),
        );
        (clock, sink, navbar)
    }

    #[test]
    fn test_mobile_scroll_down_sequence() {
        let (_clock, _sink, navbar) = setup();

        let modes: Vec<NavMode> = [0.0, 50.0, 250.0, 400.0]
            .iter()
            .map(|&top| navbar.update(top, 400.0))
            .collect();

        assert_eq!(modes, vec![NavMode::Top, NavMode::Top, NavMode::Hidden, NavMode::Hidden]);
    }

    #[test]
    fn test_desktop_never_hides() {
        let (clock, _sink, navbar) = setup();

        for top in [0.0, 150.0, 300.0, 900.0, 2000.0, 1500.0, 5000.0] {
            assert!(navbar.update(top, 1280.0).is_visible());
        }
        // Desktop widths do not schedule a settle timer
        assert_eq!(clock.pending_timers(), 0);
    }

    #[test]
    fn test_scroll_up_shows_navbar() {
        let (_clock, _sink, navbar) = setup();

        navbar.update(300.0, 400.0);
        assert_eq!(navbar.update(600.0, 400.0), NavMode::Hidden);
        assert_eq!(navbar.update(550.0, 400.0), NavMode::Shown);
    }

    #[test]
    fn test_pause_settles_to_shown() {
        let (clock, sink, navbar) = setup();

        navbar.update(300.0, 400.0);
        navbar.update(700.0, 400.0);
        assert_eq!(navbar.mode(), NavMode::Hidden);
        sink.take();

        clock.advance(Duration::from_millis(149));
        assert_eq!(navbar.mode(), NavMode::Hidden);

        clock.advance(Duration::from_millis(1));
        assert_eq!(navbar.mode(), NavMode::Shown);
        assert_eq!(
            sink.take(),
            vec![Command::transform(Target::Navbar, Transform::Identity)]
        );
    }

    #[test]
    fn test_continuous_scrolling_keeps_single_timer() {
        let (clock, _sink, navbar) = setup();

        let mut top = 250.0;
        for _ in 0..10 {
            navbar.update(top, 400.0);
            clock.advance(Duration::from_millis(16));
            top += 40.0;
            assert_eq!(clock.pending_timers(), 1);
        }
        assert_eq!(navbar.mode(), NavMode::Hidden);
    }

    #[test]
    fn test_scrolled_class_toggles_once() {
        let (_clock, sink, navbar) = setup();

        navbar.update(120.0, 1280.0);
        navbar.update(140.0, 1280.0);
        navbar.update(60.0, 1280.0);

        let classes: Vec<Command> = sink
            .commands()
            .into_iter()
            .filter(|c| matches!(c, Command::SetClass { .. }))
            .collect();
        assert_eq!(
            classes,
            vec![
                Command::class(Target::Navbar, "scrolled", true),
                Command::class(Target::Navbar, "scrolled", false),
            ]
        );
    }

    #[test]
    fn test_last_scroll_top_always_updated() {
        let (_clock, _sink, navbar) = setup();

        navbar.update(900.0, 1280.0);
        assert_eq!(navbar.last_scroll_top(), 900.0);
        navbar.update(10.0, 400.0);
        assert_eq!(navbar.last_scroll_top(), 10.0);
    }

    #[test]
    fn test_widening_viewport_reveals_hidden_navbar() {
        let (_clock, _sink, navbar) = setup();

        navbar.update(300.0, 400.0);
        navbar.update(600.0, 400.0);
        assert_eq!(navbar.mode(), NavMode::Hidden);

        assert_eq!(navbar.update(800.0, 1024.0), NavMode::Shown);
    }
}
