//! Static page layout
//!
//! Section boundaries and element rectangles are measured by the host once
//! and handed to the core read-only.

use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::{FolioError, Result};

/// A navigable page section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: String,
    /// Offset of the section's top edge from the document top
    pub top: f64,
    pub height: f64,
    /// The hero section is tracked but not revealed
    #[serde(default)]
    pub hero: bool,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
            hero: false,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `offset` falls inside `[top, top + height)`
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.top && offset < self.bottom()
    }

    pub fn rect(&self) -> ElementRect {
        ElementRect::new(self.top, self.height)
    }
}

/// Vertical extent of an element in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Adjustment applied to the viewport before intersection tests.
/// Positive values grow the viewport, negative values shrink it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: f64,
    pub bottom: f64,
}

impl RootMargin {
    pub fn uniform(px: f64) -> Self {
        Self { top: px, bottom: px }
    }

    /// Pull the bottom edge in by `px`
    pub fn inset_bottom(px: f64) -> Self {
        Self { top: 0.0, bottom: -px }
    }
}

/// Fraction of `rect` visible inside the (margin-adjusted) viewport.
///
/// Zero-height elements and degenerate roots report 0.
pub fn intersection_ratio(
    rect: ElementRect,
    scroll_top: f64,
    viewport_height: f64,
    margin: RootMargin,
) -> f64 {
    if !(rect.height > 0.0) {
        return 0.0;
    }

    let root_top = scroll_top - margin.top;
    let root_bottom = scroll_top + viewport_height + margin.bottom;
    if root_bottom <= root_top {
        return 0.0;
    }

    let overlap = rect.bottom().min(root_bottom) - rect.top.max(root_top);
    (overlap.max(0.0) / rect.height).clamp(0.0, 1.0)
}

/// Whether `rect` touches the margin-expanded viewport, edges included.
///
/// Unlike [`intersection_ratio`] this holds for zero-height elements.
pub fn touches_root(rect: ElementRect, scroll_top: f64, viewport_height: f64, margin: RootMargin) -> bool {
    let root_top = scroll_top - margin.top;
    let root_bottom = scroll_top + viewport_height + margin.bottom;
    root_bottom >= root_top && rect.top <= root_bottom && rect.bottom() >= root_top
}

/// An element animated in when it scrolls into view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealSpec {
    pub id: String,
    pub rect: ElementRect,
}

/// An image whose source is only set once it nears the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub id: String,
    /// Deferred source (the `data-src` attribute)
    pub src: String,
    pub rect: ElementRect,
}

/// An animated hero statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSpec {
    pub id: String,
    pub target: u64,
}

/// Everything the core needs to know about the page structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PageLayout {
    /// Sections in document order
    pub sections: Vec<SectionDescriptor>,
    /// Ids of the sections that have a navigation link
    pub nav_links: Vec<String>,
    pub reveal_targets: Vec<RevealSpec>,
    pub images: Vec<ImageSpec>,
    pub particle_count: usize,
    pub stats: Vec<StatSpec>,
    pub has_hero_content: bool,
    /// Hero elements whose entrance animation starts on load, in document order
    pub hero_elements: Vec<String>,
}

impl PageLayout {
    /// Parse and validate a layout from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: PageLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load and validate a layout file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn section(&self, id: &str) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn has_link(&self, section_id: &str) -> bool {
        self.nav_links.iter().any(|id| id == section_id)
    }

    /// Check ids are unique, geometry is finite and links point at sections
    pub fn validate(&self) -> Result<()> {
        let mut seen = AHashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(FolioError::InvalidLayout(format!("duplicate section id '{}'", section.id)));
            }
            check_rect(&section.id, section.rect())?;
        }

        for link in &self.nav_links {
            if !seen.contains(link.as_str()) {
                return Err(FolioError::InvalidLayout(format!("nav link '#{link}' has no matching section")));
            }
        }

        let mut element_ids = AHashSet::new();
        for target in &self.reveal_targets {
            if !element_ids.insert(target.id.as_str()) {
                return Err(FolioError::InvalidLayout(format!("duplicate reveal target '{}'", target.id)));
            }
            check_rect(&target.id, target.rect)?;
        }

        for image in &self.images {
            check_rect(&image.id, image.rect)?;
        }

        Ok(())
    }
}

fn check_rect(id: &str, rect: ElementRect) -> Result<()> {
    if rect.top.is_finite() && rect.height.is_finite() && rect.height >= 0.0 {
        Ok(())
    } else {
        Err(FolioError::InvalidLayout(format!("'{id}' has invalid geometry")))
    }
}
