//! Reveal-on-scroll engine
//!
//! Elements start faded, offset and blurred, then animate in the first time
//! they become sufficiently visible. The transition is one-shot: a revealed
//! element is unobserved and never returns to its baseline.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::RevealConfig;
use crate::events::{events::ElementRevealed, EventBus};
use crate::layout::{intersection_ratio, ElementRect, RootMargin};
use crate::present::{Command, Easing, PresentationSink, Target, Transform, Transition};

/// Per-element reveal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    Pending,
    Revealed,
}

/// Visibility notification for one observed element
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub target: Target,
    /// Visible fraction of the element, in [0, 1]
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target: Target, ratio: f64) -> Self {
        Self { target, ratio }
    }
}

#[derive(Debug)]
struct Observed {
    stagger_index: usize,
    state: RevealState,
}

#[derive(Debug, Default)]
struct Registry {
    elements: AHashMap<Target, Observed>,
    /// Pending targets in registration order
    observing: Vec<Target>,
}

/// One-shot reveal animations for a group of elements
pub struct RevealEngine {
    config: RevealConfig,
    registry: Mutex<Registry>,
    sink: Arc<dyn PresentationSink>,
    events: Arc<EventBus>,
}

impl RevealEngine {
    pub fn new(config: RevealConfig, sink: Arc<dyn PresentationSink>, events: Arc<EventBus>) -> Self {
        Self {
            config,
            registry: Mutex::new(Registry::default()),
            sink,
            events,
        }
    }

    /// Start observing `target` and apply its baseline.
    ///
    /// Returns the stagger index. Registering a known target is a no-op that
    /// returns its existing index.
    pub fn register(&self, target: Target) -> usize {
        let index = {
            let mut registry = self.registry.lock();
            if let Some(existing) = registry.elements.get(&target) {
                return existing.stagger_index;
            }

            let index = registry.elements.len();
            registry.elements.insert(
                target.clone(),
                Observed {
                    stagger_index: index,
                    state: RevealState::Pending,
                },
            );
            registry.observing.push(target.clone());
            index
        };

        let mut commands = vec![
            Command::opacity(target.clone(), 0.0),
            Command::transform(target.clone(), Transform::TranslateY { px: self.config.offset_px }),
        ];
        if self.config.blur_px > 0.0 {
            commands.push(Command::SetBlur {
                target: target.clone(),
                px: self.config.blur_px,
            });
        }
        let transition = Transition::new(self.config.duration(), Easing::Emphasized)
            .with_delay(self.config.stagger_delay(index));
        commands.push(Command::transition(target, Some(transition)));

        self.sink.apply_batch(commands);
        index
    }

    /// Handle visibility notifications. Returns how many elements revealed.
    pub fn on_intersection(&self, entries: &[IntersectionEntry]) -> usize {
        let mut revealed = Vec::new();
        {
            let mut registry = self.registry.lock();
            for entry in entries {
                if !self.qualifies(entry.ratio) {
                    continue;
                }
                let Some(observed) = registry.elements.get_mut(&entry.target) else {
                    continue;
                };
                if observed.state == RevealState::Revealed {
                    continue;
                }
                observed.state = RevealState::Revealed;
                revealed.push((entry.target.clone(), observed.stagger_index));
            }

            if !revealed.is_empty() {
                registry
                    .observing
                    .retain(|target| !revealed.iter().any(|(done, _)| done == target));
            }
        }

        for (target, stagger_index) in &revealed {
            let mut commands = vec![
                Command::opacity(target.clone(), 1.0),
                Command::transform(target.clone(), Transform::Identity),
            ];
            if self.config.blur_px > 0.0 {
                commands.push(Command::SetBlur {
                    target: target.clone(),
                    px: 0.0,
                });
            }
            self.sink.apply_batch(commands);

            debug!(?target, stagger_index, "element revealed");
            self.events.publish(ElementRevealed {
                target: target.clone(),
                stagger_index: *stagger_index,
            });
        }

        revealed.len()
    }

    /// Derive intersection entries for pending elements from page geometry
    pub fn scan<F>(&self, scroll_top: f64, viewport_height: f64, rect_of: F) -> usize
    where
        F: Fn(&Target) -> Option<ElementRect>,
    {
        let margin = RootMargin::inset_bottom(self.config.bottom_margin);
        let entries: Vec<IntersectionEntry> = self
            .registry
            .lock()
            .observing
            .iter()
            .filter_map(|target| {
                let rect = rect_of(target)?;
                let ratio = intersection_ratio(rect, scroll_top, viewport_height, margin);
                Some(IntersectionEntry::new(target.clone(), ratio))
            })
            .collect();

        trace!(observing = entries.len(), scroll_top, "reveal scan");
        self.on_intersection(&entries)
    }

    fn qualifies(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.config.threshold
    }

    pub fn state(&self, target: &Target) -> Option<RevealState> {
        self.registry.lock().elements.get(target).map(|o| o.state)
    }

    /// Number of elements still waiting to be revealed
    pub fn pending_count(&self) -> usize {
        self.registry.lock().observing.len()
    }

    pub fn revealed_count(&self) -> usize {
        let registry = self.registry.lock();
        registry.elements.len() - registry.observing.len()
    }
}
