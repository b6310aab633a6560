//! Headless replay of a user session against a page layout

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use folio_core::scheduler::{Scheduler, FRAME_INTERVAL};
use folio_core::{Command, PageConfig, PageLayout, PageView, RecordingSink, SimulatedViewport, ViewportMetrics, VirtualClock};
use folio_ui::{ClickRegion, PageChrome, Theme};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One user action in a recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    /// Scroll to an absolute offset; one frame is rendered
    Scroll { top: f64 },
    /// Let time pass, rendering frames as they come
    Wait { ms: u64 },
    Resize { width: f64, height: f64 },
    ToggleTheme,
    ToggleMenu,
    ClickOutside,
    ClickLink { section: String },
    ClickFab,
    ImageLoaded { id: String },
}

/// Parse a JSON array of steps
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceStep>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("reading trace {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing trace {}", path.display()))
}

/// A command together with the virtual time it was emitted at
#[derive(Debug, Clone, Serialize)]
pub struct Emitted {
    pub at_ms: u64,
    pub command: Command,
}

pub struct Replay {
    viewport: Arc<SimulatedViewport>,
    clock: Arc<VirtualClock>,
    sink: Arc<RecordingSink>,
    page: PageView,
    chrome: PageChrome,
}

impl Replay {
    pub fn new(config: PageConfig, layout: PageLayout, width: f64, height: f64, theme: Theme) -> Self {
        let document_height = layout
            .sections
            .iter()
            .map(|s| s.bottom())
            .fold(height, f64::max);

        let viewport = Arc::new(SimulatedViewport::new(ViewportMetrics::new(width, height, document_height)));
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let page = PageView::new(config, layout, viewport.clone(), clock.clone(), sink.clone());
        let chrome = PageChrome::new(&page, theme);

        Self {
            viewport,
            clock,
            sink,
            page,
            chrome,
        }
    }

    /// Paint the initial state and kick off the load-time animations
    pub fn start(&self) -> Vec<Emitted> {
        self.page.start();
        self.chrome.start();
        self.drain()
    }

    pub fn step(&self, step: &TraceStep) -> Vec<Emitted> {
        debug!(?step, "replaying");
        match step {
            TraceStep::Scroll { top } => self.scroll(*top),
            TraceStep::Wait { ms } => self.wait(Duration::from_millis(*ms)),
            TraceStep::Resize { width, height } => self.viewport.resize(*width, *height),
            TraceStep::ToggleTheme => {
                self.chrome.theme.toggle();
            }
            TraceStep::ToggleMenu => {
                self.chrome.menu.toggle();
            }
            TraceStep::ClickOutside => {
                self.chrome.menu.on_document_click(ClickRegion::Outside);
            }
            TraceStep::ClickLink { section } => {
                self.chrome.navigator.on_link_click(section);
            }
            TraceStep::ClickFab => {
                self.chrome.navigator.on_fab_click();
            }
            TraceStep::ImageLoaded { id } => {
                self.page.on_image_loaded(id);
            }
        }

        let mut emitted = self.drain();

        // Smooth scrolling is instantaneous here; follow it with a frame
        let jumps: Vec<f64> = emitted
            .iter()
            .filter_map(|e| match e.command {
                Command::ScrollTo { top, .. } => Some(top),
                _ => None,
            })
            .collect();
        for top in jumps {
            self.scroll(top);
            emitted.extend(self.drain());
        }

        emitted
    }

    /// Replay every step and return the full command log
    pub fn run(&self, steps: &[TraceStep]) -> Vec<Emitted> {
        let mut log = self.start();
        for step in steps {
            log.extend(self.step(step));
        }
        info!(steps = steps.len(), commands = log.len(), "replay finished");
        log
    }

    pub fn page(&self) -> &PageView {
        &self.page
    }

    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }

    fn scroll(&self, top: f64) {
        self.viewport.scroll_to(top);
        self.page.on_scroll();
        self.clock.tick();
    }

    fn wait(&self, duration: Duration) {
        let mut left = duration;
        while left >= FRAME_INTERVAL {
            self.clock.tick();
            left -= FRAME_INTERVAL;
        }
        self.clock.advance(left);
    }

    fn drain(&self) -> Vec<Emitted> {
        let at_ms = self.clock.now().as_millis() as u64;
        self.sink
            .take()
            .into_iter()
            .map(|command| Emitted { at_ms, command })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use folio_core::{NavMode, Target};

    fn replay() -> Replay {
        Replay::new(PageConfig::default(), demo::layout(), 1280.0, 800.0, Theme::Dark)
    }

    #[test]
    fn test_trace_json_format() {
        let steps: Vec<TraceStep> = serde_json::from_str(
            r#"[
                {"step": "scroll", "top": 300},
                {"step": "wait", "ms": 200},
                {"step": "click_link", "section": "about"},
                {"step": "toggle_theme"}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps[0], TraceStep::Scroll { top: 300.0 });
        assert_eq!(steps[2], TraceStep::ClickLink { section: "about".into() });
        assert_eq!(steps[3], TraceStep::ToggleTheme);
    }

    #[test]
    fn test_link_click_follows_scroll() {
        let replay = replay();
        replay.start();

        let emitted = replay.step(&TraceStep::ClickLink { section: "projects".into() });

        assert!(emitted
            .iter()
            .any(|e| matches!(e.command, Command::ScrollTo { smooth: true, .. })));
        assert_eq!(replay.page().active_section().as_deref(), Some("projects"));
        assert_eq!(replay.page().nav_mode(), NavMode::Shown);
    }

    #[test]
    fn test_wait_renders_counter_frames() {
        let replay = replay();
        replay.start();

        let emitted = replay.step(&TraceStep::Wait { ms: 4000 });
        let stat_texts = emitted
            .iter()
            .filter(|e| matches!(&e.command, Command::SetText { target: Target::Stat(_), .. }))
            .count();
        assert!(stat_texts > 100);
    }

    #[test]
    fn test_demo_trace_replays() {
        let replay = replay();
        let log = replay.run(&demo::trace());

        assert!(!log.is_empty());
        assert!(log.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
        assert!(!replay.chrome().menu.is_open());
    }
}
