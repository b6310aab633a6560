//! Parallax, progress bar and floating button
//!
//! Everything here is a pure function of the current scroll frame. The
//! renderer keeps no state between frames.

use std::sync::Arc;

use crate::config::ParallaxConfig;
use crate::present::{Command, PresentationSink, Target, Transform};
use crate::scroll::{ScrollFrame, ScrollSubscriber};

/// Reading progress in percent, always within [0, 100].
///
/// Pages that cannot scroll (document no taller than the viewport) and
/// non-finite inputs report 0.
pub fn progress_percent(scroll_top: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Whether the hero effects are active: strictly above one viewport height
pub fn hero_in_range(scroll_top: f64, viewport_height: f64) -> bool {
    scroll_top < viewport_height
}

/// Vertical offset of particle `index`, or `None` once the hero is scrolled past
pub fn particle_offset(scroll_top: f64, viewport_height: f64, index: usize, config: &ParallaxConfig) -> Option<f64> {
    if !hero_in_range(scroll_top, viewport_height) {
        return None;
    }
    let speed = config.base_speed * (index + 1) as f64 * config.particle_factor;
    Some(scroll_top * speed)
}

/// Opacity and vertical shift of the hero content
pub fn hero_content(scroll_top: f64, viewport_height: f64, config: &ParallaxConfig) -> Option<(f64, f64)> {
    if !hero_in_range(scroll_top, viewport_height) || viewport_height <= 0.0 {
        return None;
    }
    let opacity = 1.0 - (scroll_top / viewport_height) * config.hero_fade;
    Some((opacity.clamp(0.0, 1.0), scroll_top * config.hero_shift))
}

/// Per-frame renderer for the decorative scroll effects
pub struct ParallaxRenderer {
    config: ParallaxConfig,
    particle_count: usize,
    has_hero_content: bool,
    sink: Arc<dyn PresentationSink>,
}

impl ParallaxRenderer {
    pub fn new(
        config: ParallaxConfig,
        particle_count: usize,
        has_hero_content: bool,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            config,
            particle_count,
            has_hero_content,
            sink,
        }
    }

    /// Commands for one frame
    pub fn render(&self, frame: &ScrollFrame) -> Vec<Command> {
        let scroll_top = frame.scroll_top;
        let metrics = frame.metrics;
        let mut commands = vec![
            Command::SetWidthPercent {
                target: Target::ProgressBar,
                percent: progress_percent(scroll_top, metrics.document_height, metrics.height),
            },
            Command::SetVisibility {
                target: Target::Fab,
                visible: scroll_top > self.config.fab_threshold,
            },
        ];

        for index in 0..self.particle_count {
            if let Some(px) = particle_offset(scroll_top, metrics.height, index, &self.config) {
                commands.push(Command::transform(Target::Particle(index), Transform::TranslateY { px }));
            }
        }

        if self.has_hero_content {
            if let Some((opacity, shift)) = hero_content(scroll_top, metrics.height, &self.config) {
                commands.push(Command::opacity(Target::HeroContent, opacity));
                commands.push(Command::transform(Target::HeroContent, Transform::TranslateY { px: shift }));
            }
        }

        commands
    }
}

impl ScrollSubscriber for ParallaxRenderer {
    fn on_scroll_frame(&self, frame: &ScrollFrame) {
        self.sink.apply_batch(self.render(frame));
    }
}
