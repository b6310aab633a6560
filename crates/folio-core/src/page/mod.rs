use std::sync::Arc;
use tracing::info;

use crate::config::PageConfig;
use crate::events::EventBus;
use crate::layout::PageLayout;
use crate::lazy::LazyImageLoader;
use crate::navbar::{NavMode, NavbarController};
use crate::parallax::ParallaxRenderer;
use crate::present::{PresentationSink, Target};
use crate::reveal::{IntersectionEntry, RevealEngine};
use crate::scheduler::Scheduler;
use crate::scroll::{ScrollSampler, ScrollSubscriber, Viewport};
use crate::sections::ActiveSectionTracker;

mod observer;

pub use observer::GeometryObserver;

/// The scroll-driven view state of one page
pub struct PageView {
    /// Behaviour configuration
    pub config: Arc<PageConfig>,

    /// Static page structure
    pub layout: Arc<PageLayout>,

    /// The event bus
    pub events: Arc<EventBus>,

    /// Frame-gated scroll signal
    pub sampler: Arc<ScrollSampler>,

    pub navbar: Arc<NavbarController>,

    pub sections: Arc<ActiveSectionTracker>,

    pub parallax: Arc<ParallaxRenderer>,

    /// Card and timeline reveal
    pub reveal: Arc<RevealEngine>,

    /// Whole-section reveal
    pub section_reveal: Arc<RevealEngine>,

    pub images: Arc<LazyImageLoader>,

    pub observer: Arc<GeometryObserver>,

    /// Host capabilities, shared with the interaction layer
    pub scheduler: Arc<dyn Scheduler>,
    pub sink: Arc<dyn PresentationSink>,
}

impl PageView {
    /// Build every component and subscribe it to the scroll signal.
    ///
    /// Reveal baselines are applied immediately.
    pub fn new(
        config: PageConfig,
        layout: PageLayout,
        viewport: Arc<dyn Viewport>,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        let events = Arc::new(EventBus::new());
        let sampler = Arc::new(ScrollSampler::new(viewport, scheduler.clone()));

        let navbar = Arc::new(NavbarController::new(
            config.navbar.clone(),
            scheduler.clone(),
            sink.clone(),
            events.clone(),
        ));
        let sections = Arc::new(ActiveSectionTracker::new(
            config.sections.clone(),
            layout.sections.clone(),
            &layout.nav_links,
            scheduler.clone(),
            sink.clone(),
            events.clone(),
        ));
        let parallax = Arc::new(ParallaxRenderer::new(
            config.parallax.clone(),
            layout.particle_count,
            layout.has_hero_content,
            sink.clone(),
        ));

        let reveal = Arc::new(RevealEngine::new(config.reveal.clone(), sink.clone(), events.clone()));
        for target in &layout.reveal_targets {
            reveal.register(Target::Element(target.id.clone()));
        }

        let section_reveal = Arc::new(RevealEngine::new(
            config.section_reveal.clone(),
            sink.clone(),
            events.clone(),
        ));
        for section in layout.sections.iter().filter(|s| !s.hero) {
            section_reveal.register(Target::Section(section.id.clone()));
        }

        let images = Arc::new(LazyImageLoader::new(config.lazy_images.clone(), sink.clone(), events.clone()));
        for image in &layout.images {
            images.register(image);
        }

        let observer = Arc::new(GeometryObserver::new(
            &layout,
            reveal.clone(),
            section_reveal.clone(),
            images.clone(),
        ));

        // Independent subscribers; notification order is not relied upon
        let subscribers: [Arc<dyn ScrollSubscriber>; 4] = [
            navbar.clone(),
            sections.clone(),
            parallax.clone(),
            observer.clone(),
        ];
        for subscriber in subscribers {
            sampler.add_subscriber(subscriber);
        }

        info!(
            sections = layout.sections.len(),
            reveal_targets = layout.reveal_targets.len(),
            images = layout.images.len(),
            "page view ready"
        );

        Self {
            config: Arc::new(config),
            layout: Arc::new(layout),
            events,
            sampler,
            navbar,
            sections,
            parallax,
            reveal,
            section_reveal,
            images,
            observer,
            scheduler,
            sink,
        }
    }

    /// Paint the initial state without waiting for a scroll event
    pub fn start(&self) {
        self.sampler.sample_now();
    }

    /// Raw scroll event from the host
    pub fn on_scroll(&self) -> bool {
        self.sampler.on_scroll()
    }

    /// Native intersection notifications from the host
    pub fn on_intersection(&self, entries: &[IntersectionEntry]) -> usize {
        self.reveal.on_intersection(entries) + self.section_reveal.on_intersection(entries)
    }

    pub fn on_image_loaded(&self, id: &str) -> bool {
        self.images.on_loaded(id)
    }

    pub fn nav_mode(&self) -> NavMode {
        self.navbar.mode()
    }

    pub fn active_section(&self) -> Option<String> {
        self.sections.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::events::SectionActivated;
    use crate::layout::{ElementRect, RevealSpec, SectionDescriptor};
    use crate::present::{Command, RecordingSink};
    use crate::reveal::RevealState;
    use crate::scheduler::VirtualClock;
    use crate::scroll::{SimulatedViewport, ViewportMetrics};
    use parking_lot::Mutex;
    use std::time::Duration;

    fn layout() -> PageLayout {
        let mut hero = SectionDescriptor::new("home", 0.0, 800.0);
        hero.hero = true;
        PageLayout {
            sections: vec![
                hero,
                SectionDescriptor::new("about", 800.0, 700.0),
                SectionDescriptor::new("projects", 1500.0, 1000.0),
                SectionDescriptor::new("contact", 2500.0, 700.0),
            ],
            nav_links: vec!["home".into(), "about".into(), "projects".into(), "contact".into()],
            reveal_targets: vec![
                RevealSpec { id: "card-1".into(), rect: ElementRect::new(1600.0, 300.0) },
                RevealSpec { id: "card-2".into(), rect: ElementRect::new(1950.0, 300.0) },
            ],
            particle_count: 3,
            has_hero_content: true,
            ..Default::default()
        }
    }

    struct Harness {
        viewport: Arc<SimulatedViewport>,
        clock: Arc<VirtualClock>,
        sink: Arc<RecordingSink>,
        page: PageView,
    }

    impl Harness {
        fn new(width: f64) -> Self {
            let viewport = Arc::new(SimulatedViewport::new(ViewportMetrics::new(width, 800.0, 3200.0)));
            let clock = Arc::new(VirtualClock::new());
            let sink = Arc::new(RecordingSink::new());
            let page = PageView::new(
                PageConfig::default(),
                layout(),
                viewport.clone(),
                clock.clone(),
                sink.clone(),
            );
            Self { viewport, clock, sink, page }
        }

        fn scroll(&self, top: f64) {
            self.viewport.scroll_to(top);
            self.page.on_scroll();
            self.clock.tick();
        }
    }

    #[test]
    fn test_start_paints_initial_state() {
        let h = Harness::new(1280.0);
        h.page.start();

        assert_eq!(h.page.nav_mode(), NavMode::Top);
        assert_eq!(h.page.active_section().as_deref(), Some("home"));
        assert!(h.sink.commands().contains(&Command::SetWidthPercent {
            target: Target::ProgressBar,
            percent: 0.0,
        }));
    }

    #[test]
    fn test_scroll_fans_out_to_every_component() {
        let h = Harness::new(400.0);
        h.page.start();

        h.scroll(250.0);
        h.scroll(1500.0);

        assert_eq!(h.page.nav_mode(), NavMode::Hidden);
        assert_eq!(h.page.active_section().as_deref(), Some("projects"));
        assert_eq!(h.page.reveal.state(&Target::Element("card-1".into())), Some(RevealState::Revealed));
        assert_eq!(
            h.page.section_reveal.state(&Target::Section("about".into())),
            Some(RevealState::Revealed)
        );

        h.clock.advance(Duration::from_millis(150));
        assert_eq!(h.page.nav_mode(), NavMode::Shown);
    }

    #[test]
    fn test_burst_of_events_yields_single_frame() {
        let h = Harness::new(1280.0);

        for top in [10.0, 20.0, 30.0, 40.0] {
            h.viewport.scroll_to(top);
            h.page.on_scroll();
        }
        h.clock.tick();

        assert_eq!(h.page.sampler.frames_emitted(), 1);
        assert_eq!(h.page.navbar.last_scroll_top(), 40.0);
    }

    #[test]
    fn test_section_events_published() {
        let h = Harness::new(1280.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        h.page.events.subscribe_fn::<SectionActivated, _>(move |event| {
            log.lock().push(event.section_id.clone());
        });

        h.scroll(0.0);
        h.scroll(700.0);
        h.scroll(710.0);
        h.scroll(2400.0);

        assert_eq!(*seen.lock(), vec!["home", "about", "contact"]);
    }

    #[test]
    fn test_hero_section_not_revealed() {
        let h = Harness::new(1280.0);
        assert_eq!(h.page.section_reveal.state(&Target::Section("home".into())), None);
        assert_eq!(h.page.section_reveal.pending_count(), 3);
    }

    #[test]
    fn test_default_section_baseline_has_no_blur_or_stagger() {
        let h = Harness::new(1280.0);

        for id in ["about", "projects", "contact"] {
            let commands = h.sink.for_target(&Target::Section(id.into()));
            assert!(!commands.iter().any(|c| matches!(c, Command::SetBlur { .. })));
            assert!(commands.contains(&Command::transform(
                Target::Section(id.into()),
                crate::present::Transform::TranslateY { px: 30.0 },
            )));
            assert!(commands.iter().any(|c| matches!(
                c,
                Command::SetTransition { transition: Some(t), .. } if t.delay_ms == 0
            )));
        }
    }

    #[test]
    fn test_native_intersection_path() {
        let h = Harness::new(1280.0);
        let revealed = h.page.on_intersection(&[
            IntersectionEntry::new(Target::Element("card-2".into()), 0.4),
            IntersectionEntry::new(Target::Section("contact".into()), 0.2),
        ]);
        assert_eq!(revealed, 2);
    }
}
