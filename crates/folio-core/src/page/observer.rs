//! Geometry-based intersection observer
//!
//! Hosts without native intersection callbacks can let this subscriber derive
//! them from the static layout on every scroll frame.

use std::sync::Arc;

use ahash::AHashMap;

use crate::layout::{ElementRect, PageLayout};
use crate::lazy::LazyImageLoader;
use crate::present::Target;
use crate::reveal::RevealEngine;
use crate::scroll::{ScrollFrame, ScrollSubscriber};

pub struct GeometryObserver {
    rects: AHashMap<Target, ElementRect>,
    reveal: Arc<RevealEngine>,
    section_reveal: Arc<RevealEngine>,
    images: Arc<LazyImageLoader>,
}

impl GeometryObserver {
    pub fn new(
        layout: &PageLayout,
        reveal: Arc<RevealEngine>,
        section_reveal: Arc<RevealEngine>,
        images: Arc<LazyImageLoader>,
    ) -> Self {
        let mut rects = AHashMap::new();
        for target in &layout.reveal_targets {
            rects.insert(Target::Element(target.id.clone()), target.rect);
        }
        for section in &layout.sections {
            rects.insert(Target::Section(section.id.clone()), section.rect());
        }

        Self {
            rects,
            reveal,
            section_reveal,
            images,
        }
    }

    fn rect_of(&self, target: &Target) -> Option<ElementRect> {
        self.rects.get(target).copied()
    }
}

impl ScrollSubscriber for GeometryObserver {
    fn on_scroll_frame(&self, frame: &ScrollFrame) {
        let height = frame.metrics.height;
        self.reveal.scan(frame.scroll_top, height, |t| self.rect_of(t));
        self.section_reveal.scan(frame.scroll_top, height, |t| self.rect_of(t));
        self.images.scan(frame.scroll_top, height);
    }
}
