//! Simulator Contract Tests
//!
//! End-to-end checks of the dashboard flow through the pure reducer:
//! 1. Accuracy bounds (0-100, unseen seasons 10-20)
//! 2. Forgetting shape (naive steep, EWC floored)
//! 3. Triangular history growth
//! 4. Last-matching chart reads

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::domain::{AugmentationSettings, Season, TrainingMode};
    use crate::history::{evaluate_step, latest_for_season};
    use crate::simulator::MetricSimulator;
    use crate::state::{reduce, Action, SimulationState};

    /// One train step the way the front end performs it.
    fn train(state: &SimulationState, sim: &MetricSimulator, rng: &mut ChaCha8Rng) -> SimulationState {
        let Some(season) = state.next_season() else {
            return reduce(state, Action::StartTraining);
        };
        let mut next = reduce(state, Action::StartTraining);
        for percent in (0..=100).step_by(5) {
            next = reduce(&next, Action::AdvanceProgress { percent });
        }
        let batch = evaluate_step(sim, season, &next.augmentations, rng, Utc::now());
        reduce(&next, Action::CompleteTraining { batch })
    }

    #[test]
    fn test_triangular_growth_contract() {
        let sim = MetricSimulator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(314);
        let mut state = SimulationState::new();

        for n in 1..=4usize {
            state = train(&state, &sim, &mut rng);
            assert_eq!(state.naive_history.len(), n * (n + 1) / 2);
            assert_eq!(state.ewc_history.len(), n * (n + 1) / 2);
        }

        // 마지막 시즌 이후에는 아무 변화 없음
        let after = train(&state, &sim, &mut rng);
        assert_eq!(after, state);
    }

    #[test]
    fn test_history_order_contract() {
        let sim = MetricSimulator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut state = SimulationState::new();
        for _ in 0..3 {
            state = train(&state, &sim, &mut rng);
        }

        // step k appends seasons 1..=k in increasing order
        let seasons: Vec<u8> = state.naive_history.iter().map(|m| m.season.number()).collect();
        assert_eq!(seasons, vec![1, 1, 2, 1, 2, 3]);
    }

    #[test]
    fn test_accuracy_bounds_contract() {
        let sim = MetricSimulator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(55);

        for augs in [AugmentationSettings::none(), AugmentationSettings::all()] {
            for trained in Season::ALL {
                for season in Season::ALL {
                    for mode in TrainingMode::BOTH {
                        let acc = sim.accuracy(season, trained, mode, &augs, &mut rng);
                        assert!((0.0..=100.0).contains(&acc));
                        if season > trained {
                            assert!((10.0..20.0).contains(&acc));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_forgetting_shape_contract() {
        let sim = MetricSimulator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(777);
        let mut state = SimulationState::new();
        for _ in 0..3 {
            state = train(&state, &sim, &mut rng);
        }

        // trained_up_to = 3: season 1 is two seasons back
        let naive_s1 = latest_for_season(&state.naive_history, Season::Baseline).unwrap().accuracy;
        let ewc_s1 = latest_for_season(&state.ewc_history, Season::Baseline).unwrap().accuracy;
        assert!(naive_s1 >= 20.0 && naive_s1 < 45.0, "naive S1 {naive_s1}");
        assert!(ewc_s1 >= 80.0, "ewc S1 {ewc_s1}");

        let current = latest_for_season(&state.naive_history, Season::BlurLowLight).unwrap().accuracy;
        assert!((88.0..=93.0).contains(&current));

        let gap = state.retention_gap().unwrap();
        assert!(gap > 0.0);
    }

    #[test]
    fn test_chart_reads_latest_contract() {
        let sim = MetricSimulator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut state = SimulationState::new();
        state = train(&state, &sim, &mut rng);
        let first_s1 = state.naive_history.entries()[0].accuracy;
        state = train(&state, &sim, &mut rng);

        let point = state.comparison()[0];
        let latest = state.naive_history.entries()[1].accuracy;
        assert_eq!(point.naive, Some(latest));
        assert_ne!(point.naive, Some(first_s1));
        assert_eq!(state.naive_history.entries()[0].accuracy, first_s1, "old entries are kept");
    }
}
