//! Training session driver.
//!
//! A train step is a cooperative sequence: `StartTraining`, a run of paced
//! `AdvanceProgress` updates (21 by default, 0% to 100% in steps of 5), then
//! `CompleteTraining` with freshly evaluated metrics. Nothing runs
//! concurrently with it and it cannot be cancelled.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::thread;
use std::time::Duration;

use super::reducer::{reduce, Action};
use super::SimulationState;
use crate::domain::Season;
use crate::history::evaluate_step;
use crate::simulator::{MetricSimulator, SimulatorConfig};

/// Artificial delay between progress updates.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Blocks the current thread for the delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Skips every delay, counting how many were requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer {
    pub pauses: u32,
}

impl Pacer for InstantPacer {
    fn pause(&mut self, _delay: Duration) {
        self.pauses += 1;
    }
}

/// Evenly spaced progress percentages, first 0 and last 100.
pub fn progress_schedule(ticks: u8) -> impl Iterator<Item = u8> {
    let last = u32::from(ticks.max(2)) - 1;
    (0..=last).map(move |i| (i * 100 / last) as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Metrics appended for every season through this one
    Trained(Season),
    /// All seasons already trained, nothing happened
    Exhausted,
}

/// Owns the state value plus everything needed to advance it: the formula,
/// the random source, the pacer and the clock.
pub struct TrainingSession<R: Rng, P: Pacer> {
    simulator: MetricSimulator,
    rng: R,
    pacer: P,
    clock: fn() -> DateTime<Utc>,
    state: SimulationState,
}

impl<R: Rng, P: Pacer> TrainingSession<R, P> {
    pub fn new(config: SimulatorConfig, rng: R, pacer: P) -> Self {
        Self {
            simulator: MetricSimulator::new(config),
            rng,
            pacer,
            clock: Utc::now,
            state: SimulationState::new(),
        }
    }

    /// Replace the timestamp source (fixed clocks make output reproducible).
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_state(mut self, state: SimulationState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn into_state(self) -> SimulationState {
        self.state
    }

    /// Apply a UI action directly.
    pub fn dispatch(&mut self, action: Action) -> &SimulationState {
        self.state = reduce(&self.state, action);
        &self.state
    }

    pub fn train_step(&mut self) -> StepOutcome {
        self.train_step_with(|_| {})
    }

    /// Run one paced train step, calling `observe` after every progress update.
    pub fn train_step_with<F>(&mut self, mut observe: F) -> StepOutcome
    where
        F: FnMut(&SimulationState),
    {
        let Some(season) = self.state.next_season() else {
            tracing::debug!("train step requested after the final season");
            return StepOutcome::Exhausted;
        };

        self.dispatch(Action::StartTraining);

        let ticks = self.simulator.config().progress_ticks;
        let delay = Duration::from_millis(self.simulator.config().tick_delay_ms);
        let last = u32::from(ticks.max(2)) - 1;
        for (i, percent) in progress_schedule(ticks).enumerate() {
            self.dispatch(Action::AdvanceProgress { percent });
            observe(&self.state);
            if (i as u32) < last {
                self.pacer.pause(delay);
            }
        }

        let batch = evaluate_step(
            &self.simulator,
            season,
            &self.state.augmentations,
            &mut self.rng,
            (self.clock)(),
        );
        self.dispatch(Action::CompleteTraining { batch });

        tracing::info!(
            season = season.number(),
            naive_entries = self.state.naive_history.len(),
            ewc_entries = self.state.ewc_history.len(),
            "train step complete"
        );
        StepOutcome::Trained(season)
    }

    /// Run up to `steps` train steps and return how many actually trained.
    pub fn run(&mut self, steps: usize) -> usize {
        (0..steps)
            .map_while(|_| match self.train_step() {
                StepOutcome::Trained(_) => Some(()),
                StepOutcome::Exhausted => None,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Augmentation, AugmentationSettings};
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn session(seed: u64) -> TrainingSession<ChaCha8Rng, InstantPacer> {
        TrainingSession::new(SimulatorConfig::default(), ChaCha8Rng::seed_from_u64(seed), InstantPacer::default())
            .with_clock(fixed_clock)
    }

    #[test]
    fn test_progress_schedule_21_ticks() {
        let ticks: Vec<u8> = progress_schedule(21).collect();
        assert_eq!(ticks.len(), 21);
        assert_eq!(ticks.first(), Some(&0));
        assert_eq!(ticks.last(), Some(&100));
        assert!(ticks.windows(2).all(|w| w[1] - w[0] == 5));
    }

    #[test]
    fn test_step_observes_every_tick() {
        let mut session = session(1);
        let mut seen = Vec::new();
        let outcome = session.train_step_with(|state| {
            assert!(state.is_training);
            seen.push(state.progress);
        });

        assert_eq!(outcome, StepOutcome::Trained(Season::Baseline));
        assert_eq!(seen.len(), 21);
        assert_eq!(session.pacer().pauses, 20);
        assert!(!session.state().is_training);
        assert_eq!(session.state().progress, 100);
    }

    #[test]
    fn test_history_grows_triangularly() {
        let mut session = session(2);
        for n in 1..=4usize {
            assert!(matches!(session.train_step(), StepOutcome::Trained(_)));
            let expected = n * (n + 1) / 2;
            assert_eq!(session.state().naive_history.len(), expected);
            assert_eq!(session.state().ewc_history.len(), expected);
        }
    }

    #[test]
    fn test_run_stops_after_last_season() {
        let mut session = session(3);
        assert_eq!(session.run(10), 4);
        assert_eq!(session.train_step(), StepOutcome::Exhausted);
        assert_eq!(session.state().naive_history.len(), 10);
        assert_eq!(session.state().trained_up_to, Some(Season::LAST));
    }

    #[test]
    fn test_same_seed_same_state() {
        let mut a = session(99);
        let mut b = session(99);
        a.run(4);
        b.run(4);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_augmentations_dispatched_before_step_apply() {
        let mut session = session(4);
        session.dispatch(Action::ToggleAugmentation { augmentation: Augmentation::Rotation });
        session.train_step();

        assert_eq!(session.state().augmentations, AugmentationSettings::none().with(Augmentation::Rotation, true));
        let first = &session.state().naive_history.entries()[0];
        // 88 + U[0,5) + 1.2
        assert!(first.accuracy >= 89.2 && first.accuracy < 94.2);
        assert_eq!(first.timestamp, fixed_clock());
    }

    #[test]
    fn test_zero_delay_thread_pacer() {
        let mut config = SimulatorConfig::default();
        config.tick_delay_ms = 0;
        let mut session = TrainingSession::new(config, ChaCha8Rng::seed_from_u64(5), ThreadPacer);
        assert_eq!(session.run(2), 2);
    }
}
