//! Count-up animation for the stat figures in the hero section

use std::sync::Arc;
use std::time::Duration;

use folio_core::config::CounterConfig;
use folio_core::layout::StatSpec;
use folio_core::present::{Command, PresentationSink, Target};
use folio_core::scheduler::Scheduler;
use parking_lot::Mutex;
use tracing::debug;

/// Outcome of advancing a counter by one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterStep {
    /// Intermediate value to display
    Running(u64),
    /// Final text; the counter is finished
    Done(String),
}

/// Pure per-frame state of one counter
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
    plus_threshold: u64,
}

impl CounterAnimation {
    pub fn new(target: u64, config: &CounterConfig) -> Self {
        let frames = (config.duration_ms as f64 / config.frame_ms.max(1) as f64).max(1.0);
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
            plus_threshold: config.plus_threshold,
        }
    }

    pub fn step(&mut self) -> CounterStep {
        self.current += self.increment;
        if self.current < self.target as f64 {
            CounterStep::Running(self.current.floor() as u64)
        } else {
            CounterStep::Done(self.final_text())
        }
    }

    pub fn final_text(&self) -> String {
        if self.target >= self.plus_threshold {
            format!("{}+", self.target)
        } else {
            self.target.to_string()
        }
    }
}

/// Starts every stat counter once, after the configured delay
pub struct StatCounters {
    config: CounterConfig,
    stats: Vec<StatSpec>,
    started: Mutex<bool>,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn PresentationSink>,
}

impl StatCounters {
    pub fn new(
        config: CounterConfig,
        stats: Vec<StatSpec>,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            config,
            stats,
            started: Mutex::new(false),
            scheduler,
            sink,
        }
    }

    /// Schedule the count-up. Returns `false` if already started.
    pub fn start(&self) -> bool {
        {
            let mut started = self.started.lock();
            if *started {
                return false;
            }
            *started = true;
        }

        let animations: Vec<(Target, CounterAnimation)> = self
            .stats
            .iter()
            .map(|stat| (Target::Stat(stat.id.clone()), CounterAnimation::new(stat.target, &self.config)))
            .collect();

        let scheduler = Arc::clone(&self.scheduler);
        let sink = Arc::clone(&self.sink);
        self.scheduler.schedule(
            Duration::from_millis(self.config.start_delay_ms),
            Box::new(move || {
                debug!(counters = animations.len(), "stat counters started");
                for (target, animation) in animations {
                    drive(Arc::clone(&scheduler), Arc::clone(&sink), target, animation);
                }
            }),
        );
        true
    }
}

fn drive(
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn PresentationSink>,
    target: Target,
    mut animation: CounterAnimation,
) {
    let next = Arc::clone(&scheduler);
    scheduler.request_frame(Box::new(move |_: Duration| match animation.step() {
        CounterStep::Running(value) => {
            sink.apply(Command::SetText {
                target: target.clone(),
                text: value.to_string(),
            });
            drive(next, sink, target, animation);
        }
        CounterStep::Done(text) => sink.apply(Command::SetText { target, text }),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{RecordingSink, VirtualClock};

    fn texts(sink: &RecordingSink, id: &str) -> Vec<String> {
        sink.for_target(&Target::Stat(id.into()))
            .into_iter()
            .filter_map(|c| match c {
                Command::SetText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut animation = CounterAnimation::new(250, &CounterConfig::default());

        assert_eq!(animation.step(), CounterStep::Running(2));
        let mut frames = 1;
        let last = loop {
            frames += 1;
            if let CounterStep::Done(text) = animation.step() {
                break text;
            }
        };
        assert!((125..=126).contains(&frames));
        assert_eq!(last, "250+");
    }

    #[test]
    fn test_plus_suffix_threshold() {
        let config = CounterConfig::default();
        assert_eq!(CounterAnimation::new(49, &config).final_text(), "49");
        assert_eq!(CounterAnimation::new(50, &config).final_text(), "50+");
    }

    #[test]
    fn test_counters_wait_then_count_up() {
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let counters = StatCounters::new(
            CounterConfig::default(),
            vec![
                StatSpec { id: "projects".into(), target: 12 },
                StatSpec { id: "clients".into(), target: 80 },
            ],
            clock.clone(),
            sink.clone(),
        );

        assert!(counters.start());
        assert!(!counters.start());

        clock.advance(Duration::from_millis(999));
        assert_eq!(clock.pending_frames(), 0);
        clock.advance(Duration::from_millis(1));
        assert_eq!(clock.pending_frames(), 2);

        for _ in 0..200 {
            if clock.tick() == 0 {
                break;
            }
        }

        let projects = texts(&sink, "projects");
        assert_eq!(projects.first().map(String::as_str), Some("0"));
        assert_eq!(projects.last().map(String::as_str), Some("12"));
        assert_eq!(texts(&sink, "clients").last().map(String::as_str), Some("80+"));
    }
}
