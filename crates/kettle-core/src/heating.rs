//! The cancellable heating loop.
//!
//! A [`HeatingLoop`] is handed out by [`Kettle::switch`] when a kettle with
//! water goes from OFF to ON. Driving it with [`HeatingLoop::run`] raises
//! the temperature once per tick until the boiling point, then turns the
//! kettle off through the same transition the switch uses.
//!
//! Every step boundary runs under the kettle's lock and starts by checking
//! the run's cancellation token, so a concurrent OFF is observed before the
//! next temperature change. The per-tick wait races the ticker against the
//! token and never holds the lock.

use std::sync::Arc;

use kettle_types::Notification;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::clock::Ticker;
use crate::config::PhysicsConfig;
use crate::kettle::Kettle;

/// How a heating run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatingOutcome {
    /// The water reached boiling temperature and the kettle turned itself
    /// off.
    Boiled,
    /// The run was stopped by an OFF switch before boiling.
    Interrupted,
}

/// Summary of a finished heating run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatingReport {
    /// How the run ended.
    pub outcome: HeatingOutcome,
    /// Number of temperature increments applied by this run.
    pub steps: u64,
    /// Temperature when the run ended.
    pub final_temperature: f64,
}

/// Per-step temperature increment for a run starting at `temperature`.
///
/// The remaining distance to boiling is split over `boiling_time` steps
/// and rounded down to whole degrees. A kettle still below boiling always
/// gains at least one degree per step.
pub fn heating_rate(temperature: f64, physics: &PhysicsConfig) -> f64 {
    let remaining = physics.boiling_temperature - temperature;
    let rate = (remaining / f64::from(physics.boiling_time)).floor();
    if remaining > 0.0 && rate < 1.0 {
        1.0
    } else {
        rate
    }
}

/// An active heating run bound to one kettle.
#[derive(Debug)]
pub struct HeatingLoop {
    kettle: Arc<Kettle>,
    token: CancelToken,
    ticker: Ticker,
}

impl HeatingLoop {
    pub(crate) const fn new(kettle: Arc<Kettle>, token: CancelToken, ticker: Ticker) -> Self {
        Self {
            kettle,
            token,
            ticker,
        }
    }

    #[cfg(test)]
    pub(crate) const fn cancel_token(&self) -> &CancelToken {
        &self.token
    }

    /// Drive the run to completion.
    pub async fn run(self) -> HeatingReport {
        let kettle = &self.kettle;
        let boiling = kettle.physics().boiling_temperature;

        let rate = {
            let state = kettle.lock_state().await;
            let rate = heating_rate(state.temperature, kettle.physics());
            info!(
                kettle_id = %kettle.id(),
                initial_temperature = state.temperature,
                delta = boiling - state.temperature,
                rate,
                tick_interval = ?self.ticker.interval(),
                "The heating of the kettle has been started"
            );
            rate
        };

        let mut steps: u64 = 0;
        loop {
            {
                let mut state = kettle.lock_state().await;

                if self.token.is_cancelled() || !state.is_owned_by(&self.token) {
                    if state.heating.is_some() {
                        // A newer run owns the kettle.
                        debug!(
                            kettle_id = %kettle.id(),
                            steps,
                            "Superseded heating run exited"
                        );
                    } else {
                        info!(
                            kettle_id = %kettle.id(),
                            temperature = state.temperature,
                            steps,
                            simulated_seconds = self.ticker.elapsed(),
                            "The heating process was interrupted"
                        );
                        kettle.emit(&Notification::Interrupted);
                    }
                    return HeatingReport {
                        outcome: HeatingOutcome::Interrupted,
                        steps,
                        final_temperature: state.temperature,
                    };
                }

                if state.temperature >= boiling {
                    kettle.emit(&Notification::AutoOff);
                    info!(
                        kettle_id = %kettle.id(),
                        temperature = state.temperature,
                        steps,
                        simulated_seconds = self.ticker.elapsed(),
                        "The water in the kettle was successfully boiled"
                    );
                    kettle.finish_heating_locked(&mut state, &self.token);
                    return HeatingReport {
                        outcome: HeatingOutcome::Boiled,
                        steps,
                        final_temperature: state.temperature,
                    };
                }

                kettle.emit(&Notification::Heating {
                    temperature: state.temperature,
                });
                state.temperature += rate;
                steps = steps.saturating_add(1);
            }

            tokio::select! {
                tick = self.ticker.tick() => {
                    if let Err(e) = tick {
                        warn!(kettle_id = %kettle.id(), error = %e, "Heating ticker stopped counting");
                    }
                }
                () = self.token.cancelled() => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use std::time::Duration;

    use kettle_types::Status;

    use super::*;
    use crate::kettle::{KettleModel, Transition};
    use crate::notifier::RecordingNotifier;

    fn model_with(physics: PhysicsConfig) -> Arc<KettleModel> {
        Arc::new(KettleModel {
            specs: kettle_types::KettleSpecs::default(),
            physics,
        })
    }

    fn heating_kettle(water: f64) -> (Arc<Kettle>, Arc<RecordingNotifier>) {
        let recorder = Arc::new(RecordingNotifier::default());
        let kettle = Kettle::create(
            water,
            model_with(PhysicsConfig::default()),
            recorder.clone(),
        )
        .unwrap();
        (Arc::new(kettle), recorder)
    }

    async fn start(kettle: &Arc<Kettle>) -> HeatingLoop {
        match kettle.switch().await {
            Transition::Heating(run) => run,
            other => panic!("expected heating, got {other:?}"),
        }
    }

    fn heating_temperatures(seen: &[Notification]) -> Vec<f64> {
        seen.iter()
            .filter_map(|n| match n {
                Notification::Heating { temperature } => Some(*temperature),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rate_splits_distance_over_boiling_time() {
        let physics = PhysicsConfig::default();
        assert_eq!(heating_rate(20.0, &physics), 8.0);
        assert_eq!(heating_rate(52.0, &physics), 4.0);
    }

    #[test]
    fn rate_is_at_least_one_degree_below_boiling() {
        let physics = PhysicsConfig::default();
        assert_eq!(heating_rate(95.0, &physics), 1.0);
        assert_eq!(heating_rate(99.5, &physics), 1.0);
    }

    #[test]
    fn rate_is_zero_or_negative_at_boiling() {
        let physics = PhysicsConfig::default();
        assert!(heating_rate(100.0, &physics) <= 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn boils_half_litre_in_ten_steps() {
        let (kettle, recorder) = heating_kettle(0.5);
        let run = start(&kettle).await;

        let report = run.run().await;
        assert_eq!(report.outcome, HeatingOutcome::Boiled);
        assert_eq!(report.steps, 10);
        assert_eq!(report.final_temperature, 100.0);

        let seen = recorder.take();
        let temperatures = heating_temperatures(&seen);
        assert_eq!(
            temperatures,
            vec![20.0, 28.0, 36.0, 44.0, 52.0, 60.0, 68.0, 76.0, 84.0, 92.0]
        );
        assert_eq!(seen.first(), Some(&Notification::TurnedOn));
        assert_eq!(
            &seen[seen.len() - 2..],
            &[Notification::AutoOff, Notification::TurnedOff]
        );
        assert_eq!(
            seen.iter().filter(|n| **n == Notification::AutoOff).count(),
            1
        );

        let snap = kettle.snapshot().await;
        assert_eq!(snap.status, Status::Off);
        assert!(!snap.heating);
        assert_eq!(snap.temperature, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_off_mid_run_stops_heating() {
        let (kettle, recorder) = heating_kettle(0.5);
        let run = start(&kettle).await;
        let handle = tokio::spawn(run.run());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let transition = kettle.switch().await;
        assert!(matches!(
            transition,
            Transition::SwitchedOff { interrupted: true }
        ));

        let report = handle.await.unwrap();
        assert_eq!(report.outcome, HeatingOutcome::Interrupted);
        assert_eq!(report.steps, 4);
        assert_eq!(report.final_temperature, 52.0);

        // No step may follow the interruption.
        tokio::time::sleep(Duration::from_secs(20)).await;
        let snap = kettle.snapshot().await;
        assert_eq!(snap.temperature, 52.0);
        assert_eq!(snap.status, Status::Off);

        let seen = recorder.take();
        assert_eq!(heating_temperatures(&seen), vec![20.0, 28.0, 36.0, 44.0]);
        assert!(seen.contains(&Notification::Interrupted));
        assert!(!seen.contains(&Notification::AutoOff));
    }

    #[tokio::test(start_paused = true)]
    async fn reheating_resumes_from_current_temperature() {
        let (kettle, recorder) = heating_kettle(0.5);
        let handle = tokio::spawn(start(&kettle).await.run());
        tokio::time::sleep(Duration::from_millis(3500)).await;
        let _off = kettle.switch().await;
        assert_eq!(handle.await.unwrap().final_temperature, 52.0);
        let _ = recorder.take();

        let report = start(&kettle).await.run().await;
        assert_eq!(report.outcome, HeatingOutcome::Boiled);
        assert_eq!(report.steps, 12);

        let temperatures = heating_temperatures(&recorder.take());
        assert_eq!(temperatures.first(), Some(&52.0));
        assert!(temperatures.windows(2).all(|w| w[1] - w[0] == 4.0));
    }

    #[tokio::test(start_paused = true)]
    async fn boiled_kettle_turns_off_at_first_check() {
        let (kettle, recorder) = heating_kettle(0.5);
        let _first = start(&kettle).await.run().await;
        let _ = recorder.take();

        let report = start(&kettle).await.run().await;
        assert_eq!(report.outcome, HeatingOutcome::Boiled);
        assert_eq!(report.steps, 0);
        assert_eq!(
            recorder.take(),
            vec![
                Notification::TurnedOn,
                Notification::AutoOff,
                Notification::TurnedOff
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn small_gap_still_reaches_boiling() {
        let physics = PhysicsConfig {
            room_temperature: 95.0,
            ..PhysicsConfig::default()
        };
        let recorder = Arc::new(RecordingNotifier::default());
        let kettle = Arc::new(Kettle::create(0.5, model_with(physics), recorder.clone()).unwrap());

        let report = start(&kettle).await.run().await;
        assert_eq!(report.outcome, HeatingOutcome::Boiled);
        assert_eq!(report.steps, 5);
        assert_eq!(report.final_temperature, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_latest_run_heats() {
        let (kettle, recorder) = heating_kettle(0.5);

        let stale = start(&kettle).await;
        let _off = kettle.switch().await;
        let fresh = start(&kettle).await;

        let stale = tokio::spawn(stale.run());
        let fresh = tokio::spawn(fresh.run());

        let stale = stale.await.unwrap();
        assert_eq!(stale.outcome, HeatingOutcome::Interrupted);
        assert_eq!(stale.steps, 0);

        let fresh = fresh.await.unwrap();
        assert_eq!(fresh.outcome, HeatingOutcome::Boiled);
        assert_eq!(fresh.steps, 10);

        let seen = recorder.take();
        let temperatures = heating_temperatures(&seen);
        assert_eq!(temperatures.len(), 10);
        assert!(temperatures.windows(2).all(|w| w[0] < w[1]));

        // The superseded run leaves no trace after the newer TurnedOn.
        assert!(!seen.contains(&Notification::Interrupted));
        assert_eq!(
            &seen[..3],
            &[
                Notification::TurnedOn,
                Notification::TurnedOff,
                Notification::TurnedOn
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn snapshots_never_show_torn_state() {
        let (kettle, _recorder) = heating_kettle(1.0);
        let handle = tokio::spawn(start(&kettle).await.run());

        let reader = {
            let kettle = Arc::clone(&kettle);
            tokio::spawn(async move {
                let mut last = f64::MIN;
                for _ in 0..40 {
                    let snap = kettle.snapshot().await;
                    assert!(snap.temperature >= last);
                    if snap.heating {
                        assert_eq!(snap.status, Status::On);
                    }
                    last = snap.temperature;
                    tokio::time::sleep(Duration::from_millis(300)).await;
                }
            })
        };

        tokio::time::sleep(Duration::from_millis(5200)).await;
        let _off = kettle.request(Status::Off).await;
        assert!(kettle.request(Status::Off).await.is_none());

        reader.await.unwrap();
        assert_eq!(handle.await.unwrap().outcome, HeatingOutcome::Interrupted);
        assert_eq!(kettle.snapshot().await.status, Status::Off);
    }

    #[tokio::test]
    async fn zero_interval_runs_without_real_waiting() {
        let physics = PhysicsConfig {
            tick_interval_ms: 0,
            ..PhysicsConfig::default()
        };
        let recorder = Arc::new(RecordingNotifier::default());
        let kettle = Arc::new(Kettle::create(0.2, model_with(physics), recorder).unwrap());

        let report = start(&kettle).await.run().await;
        assert_eq!(report.outcome, HeatingOutcome::Boiled);
        assert_eq!(report.steps, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn off_request_wins_against_parallel_steps() {
        let physics = PhysicsConfig {
            tick_interval_ms: 0,
            ..PhysicsConfig::default()
        };
        let model = model_with(physics);

        for round in 0..200_u32 {
            let kettle = Arc::new(
                Kettle::create(1.0, Arc::clone(&model), Arc::new(RecordingNotifier::default()))
                    .unwrap(),
            );
            let handle = tokio::spawn(start(&kettle).await.run());
            for _ in 0..round % 8 {
                tokio::task::yield_now().await;
            }

            let off = kettle.request(Status::Off).await;
            let after_off = kettle.snapshot().await;
            let report = handle.await.unwrap();

            assert_eq!(after_off.status, Status::Off);
            assert!(!after_off.heating);
            assert_eq!(
                report.final_temperature, after_off.temperature,
                "round {round}: a step ran after OFF returned"
            );
            match off {
                Some(_) => assert_eq!(report.outcome, HeatingOutcome::Interrupted),
                // The run boiled before the request got the lock.
                None => assert_eq!(report.outcome, HeatingOutcome::Boiled),
            }
            assert_eq!(kettle.snapshot().await.temperature, after_off.temperature);
        }
    }
}
