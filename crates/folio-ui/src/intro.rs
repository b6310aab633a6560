//! Page-load entrance
//!
//! The body fades in from transparent and the hero elements start their
//! entrance animations one after another.

use std::sync::Arc;
use std::time::Duration;

use folio_core::config::IntroConfig;
use folio_core::present::{Command, Easing, PresentationSink, Target, Transition};
use folio_core::scheduler::Scheduler;
use tracing::debug;

pub struct PageIntro {
    config: IntroConfig,
    hero_elements: Vec<String>,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn PresentationSink>,
}

impl PageIntro {
    pub fn new(
        config: IntroConfig,
        hero_elements: Vec<String>,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            config,
            hero_elements,
            scheduler,
            sink,
        }
    }

    pub fn play(&self) {
        self.sink.apply_batch(vec![
            Command::opacity(Target::Body, 0.0),
            Command::transition(
                Target::Body,
                Some(Transition::new(Duration::from_millis(self.config.body_fade_ms), Easing::Ease)),
            ),
        ]);

        let sink = Arc::clone(&self.sink);
        self.scheduler.schedule(
            Duration::from_millis(self.config.body_fade_delay_ms),
            Box::new(move || sink.apply(Command::opacity(Target::Body, 1.0))),
        );

        for (index, id) in self.hero_elements.iter().enumerate() {
            let sink = Arc::clone(&self.sink);
            let target = Target::Element(id.clone());
            self.scheduler.schedule(
                Duration::from_millis(self.config.hero_stagger_ms * index as u64),
                Box::new(move || {
                    sink.apply(Command::SetStyle {
                        target,
                        property: "animation-play-state".to_string(),
                        value: "running".to_string(),
                    })
                }),
            );
        }

        debug!(hero_elements = self.hero_elements.len(), "page intro started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{RecordingSink, VirtualClock};

    fn running(id: &str) -> Command {
        Command::SetStyle {
            target: Target::Element(id.into()),
            property: "animation-play-state".into(),
            value: "running".into(),
        }
    }

    #[test]
    fn test_body_fades_in_after_delay() {
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let intro = PageIntro::new(IntroConfig::default(), Vec::new(), clock.clone(), sink.clone());

        intro.play();
        assert_eq!(
            sink.take(),
            vec![
                Command::opacity(Target::Body, 0.0),
                Command::transition(
                    Target::Body,
                    Some(Transition::new(Duration::from_millis(600), Easing::Ease))
                ),
            ]
        );

        clock.advance(Duration::from_millis(49));
        assert!(sink.is_empty());
        clock.advance(Duration::from_millis(1));
        assert_eq!(sink.take(), vec![Command::opacity(Target::Body, 1.0)]);
    }

    #[test]
    fn test_hero_elements_start_staggered() {
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let intro = PageIntro::new(
            IntroConfig::default(),
            vec!["greeting".into(), "title".into(), "tagline".into()],
            clock.clone(),
            sink.clone(),
        );

        intro.play();
        sink.take();

        clock.advance(Duration::ZERO);
        assert_eq!(sink.take(), vec![running("greeting")]);

        clock.advance(Duration::from_millis(100));
        // Body fade at 50ms, then the second element
        assert_eq!(sink.take(), vec![Command::opacity(Target::Body, 1.0), running("title")]);

        clock.advance(Duration::from_millis(99));
        assert!(sink.is_empty());
        clock.advance(Duration::from_millis(1));
        assert_eq!(sink.take(), vec![running("tagline")]);
    }
}
