//! Page behaviour configuration
//!
//! Every threshold, delay and factor used by the scroll-driven components
//! lives here. The defaults reproduce the stock portfolio page; a JSON file
//! may override any subset of fields.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{FolioError, Result};

/// Top-level configuration for a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub navbar: NavbarConfig,
    pub sections: SectionConfig,
    /// Staggered reveal for cards and timeline items
    pub reveal: RevealConfig,
    /// Reveal for whole page sections; omitted fields keep the section preset
    #[serde(deserialize_with = "section_reveal_overrides")]
    pub section_reveal: RevealConfig,
    pub parallax: ParallaxConfig,
    pub lazy_images: LazyImageConfig,
    pub navigation: NavigationConfig,
    pub counters: CounterConfig,
    pub intro: IntroConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            navbar: NavbarConfig::default(),
            sections: SectionConfig::default(),
            reveal: RevealConfig::cards(),
            section_reveal: RevealConfig::sections(),
            parallax: ParallaxConfig::default(),
            lazy_images: LazyImageConfig::default(),
            navigation: NavigationConfig::default(),
            counters: CounterConfig::default(),
            intro: IntroConfig::default(),
        }
    }
}

/// Navbar scroll behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Offset past which the navbar gets its "scrolled" styling
    pub scrolled_threshold: f64,
    /// Widths at or below this are treated as mobile
    pub mobile_breakpoint: f64,
    /// Offset past which scrolling down hides the navbar on mobile
    pub hide_threshold: f64,
    /// Quiet period after which the navbar is shown again
    pub settle_delay_ms: u64,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 100.0,
            mobile_breakpoint: 768.0,
            hide_threshold: 200.0,
            settle_delay_ms: 150,
        }
    }
}

impl NavbarConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Active-section tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Look-ahead added to the scroll offset before matching sections
    pub probe_offset: f64,
    pub pulse_scale: f64,
    pub pulse_delay_ms: u64,
    pub pulse_duration_ms: u64,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            probe_offset: 150.0,
            pulse_scale: 1.08,
            pulse_delay_ms: 50,
            pulse_duration_ms: 300,
        }
    }
}

/// One-shot reveal animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Minimum visible fraction of the element
    pub threshold: f64,
    /// Pixels the viewport bottom is pulled in by when testing visibility
    pub bottom_margin: f64,
    /// Initial downward offset
    pub offset_px: f64,
    /// Initial blur radius; 0 disables blur
    pub blur_px: f64,
    pub duration_ms: u64,
    /// Extra delay per registration index; 0 disables staggering
    pub stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::cards()
    }
}

/// Fields given for a reveal preset in JSON
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RevealOverrides {
    threshold: Option<f64>,
    bottom_margin: Option<f64>,
    offset_px: Option<f64>,
    blur_px: Option<f64>,
    duration_ms: Option<u64>,
    stagger_ms: Option<u64>,
}

impl RevealOverrides {
    fn apply(self, base: RevealConfig) -> RevealConfig {
        RevealConfig {
            threshold: self.threshold.unwrap_or(base.threshold),
            bottom_margin: self.bottom_margin.unwrap_or(base.bottom_margin),
            offset_px: self.offset_px.unwrap_or(base.offset_px),
            blur_px: self.blur_px.unwrap_or(base.blur_px),
            duration_ms: self.duration_ms.unwrap_or(base.duration_ms),
            stagger_ms: self.stagger_ms.unwrap_or(base.stagger_ms),
        }
    }
}

fn section_reveal_overrides<'de, D>(deserializer: D) -> std::result::Result<RevealConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let overrides = RevealOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(RevealConfig::sections()))
}

impl RevealConfig {
    /// Cards, timeline items and skill groups
    pub fn cards() -> Self {
        Self {
            threshold: 0.15,
            bottom_margin: 80.0,
            offset_px: 40.0,
            blur_px: 10.0,
            duration_ms: 800,
            stagger_ms: 100,
        }
    }

    /// Whole page sections
    pub fn sections() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 100.0,
            offset_px: 30.0,
            blur_px: 0.0,
            duration_ms: 800,
            stagger_ms: 0,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Delay applied to the element registered at `index`
    pub fn stagger_delay(&self, index: usize) -> Duration {
        Duration::from_millis(self.stagger_ms * index as u64)
    }
}

/// Hero parallax, progress bar and floating button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub base_speed: f64,
    /// Per-particle multiplier on top of `base_speed * (index + 1)`
    pub particle_factor: f64,
    /// Fraction of opacity the hero content loses over one viewport height
    pub hero_fade: f64,
    pub hero_shift: f64,
    /// Offset past which the floating action button is shown
    pub fab_threshold: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.5,
            particle_factor: 0.3,
            hero_fade: 0.8,
            hero_shift: 0.3,
            fab_threshold: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyImageConfig {
    /// Pixels the viewport is expanded by on every side
    pub root_margin: f64,
    pub fade_ms: u64,
}

impl Default for LazyImageConfig {
    fn default() -> Self {
        Self {
            root_margin: 50.0,
            fade_ms: 500,
        }
    }
}

/// Link clicks, mobile menu and floating button interactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Space left above a section when scrolling to it (fixed navbar height)
    pub scroll_offset: f64,
    pub ripple_ms: u64,
    pub fab_pulse_scale: f64,
    pub fab_pulse_ms: u64,
    pub menu_stagger_ms: u64,
    pub menu_transition_ms: u64,
    pub menu_offset_px: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_offset: 80.0,
            ripple_ms: 600,
            fab_pulse_scale: 0.9,
            fab_pulse_ms: 150,
            menu_stagger_ms: 50,
            menu_transition_ms: 300,
            menu_offset_px: 20.0,
        }
    }
}

/// Page-load entrance: body fade and hero element stagger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub body_fade_delay_ms: u64,
    pub body_fade_ms: u64,
    pub hero_stagger_ms: u64,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            body_fade_delay_ms: 50,
            body_fade_ms: 600,
            hero_stagger_ms: 100,
        }
    }
}

/// Hero stat counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub start_delay_ms: u64,
    pub duration_ms: u64,
    pub frame_ms: u64,
    /// Targets at or above this get a "+" suffix
    pub plus_threshold: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1000,
            duration_ms: 2000,
            frame_ms: 16,
            plus_threshold: 50,
        }
    }
}

impl PageConfig {
    /// Parse and validate a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Check that every value is inside its usable range
    pub fn validate(&self) -> Result<()> {
        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(FolioError::InvalidConfig(format!("{name} must be a non-negative number, got {value}")))
            }
        }

        fn fraction(name: &str, value: f64) -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(FolioError::InvalidConfig(format!("{name} must be within [0, 1], got {value}")))
            }
        }

        non_negative("navbar.scrolled_threshold", self.navbar.scrolled_threshold)?;
        non_negative("navbar.hide_threshold", self.navbar.hide_threshold)?;
        if !(self.navbar.mobile_breakpoint.is_finite() && self.navbar.mobile_breakpoint > 0.0) {
            return Err(FolioError::InvalidConfig(
                "navbar.mobile_breakpoint must be positive".to_string(),
            ));
        }

        non_negative("sections.probe_offset", self.sections.probe_offset)?;
        if !(self.sections.pulse_scale.is_finite() && self.sections.pulse_scale > 0.0) {
            return Err(FolioError::InvalidConfig(
                "sections.pulse_scale must be positive".to_string(),
            ));
        }

        for (name, reveal) in [("reveal", &self.reveal), ("section_reveal", &self.section_reveal)] {
            fraction(&format!("{name}.threshold"), reveal.threshold)?;
            non_negative(&format!("{name}.bottom_margin"), reveal.bottom_margin)?;
            non_negative(&format!("{name}.blur_px"), reveal.blur_px)?;
            if !reveal.offset_px.is_finite() {
                return Err(FolioError::InvalidConfig(format!("{name}.offset_px must be finite")));
            }
        }

        non_negative("parallax.base_speed", self.parallax.base_speed)?;
        non_negative("parallax.particle_factor", self.parallax.particle_factor)?;
        fraction("parallax.hero_fade", self.parallax.hero_fade)?;
        non_negative("parallax.fab_threshold", self.parallax.fab_threshold)?;
        non_negative("lazy_images.root_margin", self.lazy_images.root_margin)?;
        non_negative("navigation.scroll_offset", self.navigation.scroll_offset)?;

        if self.counters.frame_ms == 0 {
            return Err(FolioError::InvalidConfig("counters.frame_ms must be positive".to_string()));
        }
        if self.counters.duration_ms < self.counters.frame_ms {
            return Err(FolioError::InvalidConfig(
                "counters.duration_ms must be at least one frame".to_string(),
            ));
        }

        Ok(())
    }
}
