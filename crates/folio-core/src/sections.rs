//! Active-section tracking
//!
//! Highlights the navigation link of the section under the reader's eye.
//! The tracker only ever asserts a match: when no section contains the probe
//! the current highlight stays where it is.

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashSet;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::SectionConfig;
use crate::events::{events::SectionActivated, EventBus};
use crate::layout::SectionDescriptor;
use crate::present::{Command, Easing, PresentationSink, Target, Transform, Transition};
use crate::scheduler::{DebounceSlot, Scheduler};
use crate::scroll::{ScrollFrame, ScrollSubscriber};

/// Pick the section containing `probe`.
///
/// Sections are evaluated in document order and the last match wins when
/// intervals overlap.
pub fn select_section(sections: &[SectionDescriptor], probe: f64) -> Option<&SectionDescriptor> {
    sections.iter().filter(|section| section.contains(probe)).last()
}

/// Owns the active section id and the link highlight
pub struct ActiveSectionTracker {
    config: SectionConfig,
    sections: Vec<SectionDescriptor>,
    linked: AHashSet<String>,
    active: Mutex<Option<String>>,
    pulse: DebounceSlot,
    sink: Arc<dyn PresentationSink>,
    events: Arc<EventBus>,
}

impl ActiveSectionTracker {
    /// Create a tracker for `sections`; only ids in `nav_links` get link commands
    pub fn new(
        config: SectionConfig,
        sections: Vec<SectionDescriptor>,
        nav_links: &[String],
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn PresentationSink>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            config,
            sections,
            linked: nav_links.iter().cloned().collect(),
            active: Mutex::new(None),
            pulse: DebounceSlot::new(scheduler),
            sink,
            events,
        }
    }

    /// Process one sampled scroll offset.
    ///
    /// Returns the newly activated section id, or `None` when nothing changed.
    pub fn update(&self, scroll_top: f64) -> Option<String> {
        let probe = scroll_top + self.config.probe_offset;
        let section = select_section(&self.sections, probe)?;

        let previous = {
            let mut active = self.active.lock();
            if active.as_deref() == Some(section.id.as_str()) {
                return None;
            }
            active.replace(section.id.clone())
        };

        let mut commands = Vec::new();
        if let Some(prev) = previous.as_ref().filter(|id| self.linked.contains(*id)) {
            commands.push(Command::class(Target::NavLink(prev.clone()), "active", false));

            // The previous link may be mid-pulse; settle it before its timer is dropped
            if self.pulse.cancel_pending() {
                commands.push(Command::transform(
                    Target::NavLink(prev.clone()),
                    Transform::Scale { factor: 1.0 },
                ));
            }
        }

        if self.linked.contains(&section.id) {
            let link = Target::NavLink(section.id.clone());
            commands.push(Command::class(link.clone(), "active", true));
            commands.push(Command::transition(link.clone(), None));
            commands.push(Command::transform(
                link.clone(),
                Transform::Scale { factor: self.config.pulse_scale },
            ));
            self.schedule_pulse_end(link);
        }

        self.sink.apply_batch(commands);

        debug!(section = %section.id, ?previous, probe, "active section changed");
        self.events.publish(SectionActivated {
            section_id: section.id.clone(),
            previous,
        });

        Some(section.id.clone())
    }

    fn schedule_pulse_end(&self, link: Target) {
        let sink = Arc::clone(&self.sink);
        let transition = Transition::new(
            Duration::from_millis(self.config.pulse_duration_ms),
            Easing::Emphasized,
        );

        self.pulse.reschedule(Duration::from_millis(self.config.pulse_delay_ms), move || {
            sink.apply_batch(vec![
                Command::transition(link.clone(), Some(transition)),
                Command::transform(link, Transform::Scale { factor: 1.0 }),
            ]);
        });
    }

    /// Currently highlighted section
    pub fn active(&self) -> Option<String> {
        self.active.lock().clone()
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }
}

impl ScrollSubscriber for ActiveSectionTracker {
    fn on_scroll_frame(&self, frame: &ScrollFrame) {
        self.update(frame.scroll_top);
    }
}
