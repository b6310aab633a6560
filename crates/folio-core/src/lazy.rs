//! Lazy image loading
//!
//! Images carry their real source in `data-src` until they come within a
//! margin of the viewport. Each image loads once and fades in when the host
//! reports it decoded.

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LazyImageConfig;
use crate::events::{events::ImageLoaded, EventBus};
use crate::layout::{touches_root, ElementRect, ImageSpec, RootMargin};
use crate::present::{Command, Easing, PresentationSink, Target, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageState {
    Pending,
    /// Source assigned, waiting for the host's load notification
    Loading,
    Loaded,
}

#[derive(Debug)]
struct LazyImage {
    id: String,
    src: String,
    rect: ElementRect,
    state: ImageState,
}

#[derive(Debug, Default)]
struct Gallery {
    /// Images in registration order
    images: Vec<LazyImage>,
    index: AHashMap<String, usize>,
}

impl Gallery {
    fn get(&self, id: &str) -> Option<&LazyImage> {
        self.index.get(id).and_then(|&position| self.images.get(position))
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut LazyImage> {
        let position = *self.index.get(id)?;
        self.images.get_mut(position)
    }
}

pub struct LazyImageLoader {
    config: LazyImageConfig,
    gallery: Mutex<Gallery>,
    sink: Arc<dyn PresentationSink>,
    events: Arc<EventBus>,
}

impl LazyImageLoader {
    pub fn new(config: LazyImageConfig, sink: Arc<dyn PresentationSink>, events: Arc<EventBus>) -> Self {
        Self {
            config,
            gallery: Mutex::new(Gallery::default()),
            sink,
            events,
        }
    }

    pub fn register(&self, spec: &ImageSpec) {
        let mut gallery = self.gallery.lock();
        if gallery.index.contains_key(&spec.id) {
            return;
        }

        let position = gallery.images.len();
        gallery.index.insert(spec.id.clone(), position);
        gallery.images.push(LazyImage {
            id: spec.id.clone(),
            src: spec.src.clone(),
            rect: spec.rect,
            state: ImageState::Pending,
        });
    }

    /// Start loading every pending image near the viewport, in registration
    /// order. Returns the ids that started loading.
    pub fn scan(&self, scroll_top: f64, viewport_height: f64) -> Vec<String> {
        let margin = RootMargin::uniform(self.config.root_margin);
        let mut started = Vec::new();
        let mut commands = Vec::new();

        {
            let mut gallery = self.gallery.lock();
            for image in gallery.images.iter_mut() {
                if image.state != ImageState::Pending {
                    continue;
                }
                if !touches_root(image.rect, scroll_top, viewport_height, margin) {
                    continue;
                }

                image.state = ImageState::Loading;
                let target = Target::Image(image.id.clone());
                commands.push(Command::opacity(target.clone(), 0.0));
                commands.push(Command::transition(
                    target.clone(),
                    Some(Transition::new(Duration::from_millis(self.config.fade_ms), Easing::Ease)),
                ));
                commands.push(Command::SetAttribute {
                    target,
                    name: "src".to_string(),
                    value: image.src.clone(),
                });
                started.push(image.id.clone());
            }
        }

        self.sink.apply_batch(commands);
        if !started.is_empty() {
            debug!(images = ?started, "lazy images started loading");
        }
        started
    }

    /// The host finished decoding an image. Returns `false` if it was not loading.
    pub fn on_loaded(&self, id: &str) -> bool {
        {
            let mut gallery = self.gallery.lock();
            match gallery.get_mut(id) {
                Some(image) if image.state == ImageState::Loading => image.state = ImageState::Loaded,
                _ => return false,
            }
        }

        let target = Target::Image(id.to_string());
        self.sink.apply_batch(vec![
            Command::opacity(target.clone(), 1.0),
            Command::RemoveAttribute {
                target,
                name: "data-src".to_string(),
            },
        ]);
        self.events.publish(ImageLoaded {
            image_id: id.to_string(),
        });
        true
    }

    pub fn state(&self, id: &str) -> Option<ImageState> {
        self.gallery.lock().get(id).map(|image| image.state)
    }
}
