//! The kettle entity and its status-switch protocol.
//!
//! A [`Kettle`] owns its mutable state (status, temperature, broken flag
//! and the cancellation token of the active heating run) behind a single
//! async mutex. Every transition happens while that lock is held, and the
//! lock is never held across the heating loop's per-step wait.
//!
//! # State machine
//!
//! ```text
//!            switch (water > 0)             heating loop boils
//!   OFF  ---------------------->  ON  ------------------------->  OFF
//!    ^                            |        (auto-off)
//!    |     switch (cancel loop)   |
//!    +----------------------------+
//!
//!   OFF --switch (water == 0)--> ON + broken   (no heating, ever)
//! ```
//!
//! `switch()` toggles unconditionally. The broken flag is orthogonal to
//! the status: a broken kettle still toggles but never heats again.

use std::sync::Arc;

use kettle_types::{KettleId, KettleSnapshot, Notification, Status};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::clock::Ticker;
use crate::config::{KettleConfig, PhysicsConfig};
use crate::heating::HeatingLoop;
use crate::messages;
use crate::notifier::Notifier;
use crate::water::{self, WaterAmountError};

/// Static configuration shared by every kettle of one process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KettleModel {
    /// Descriptive attributes shown by [`Kettle::describe`].
    pub specs: kettle_types::KettleSpecs,
    /// Heating physics and water limits.
    pub physics: PhysicsConfig,
}

impl KettleModel {
    /// Extract the kettle model from the loaded configuration.
    pub fn from_config(config: &KettleConfig) -> Self {
        Self {
            specs: config.kettle.clone(),
            physics: config.physics.clone(),
        }
    }
}

/// Mutable part of a kettle, guarded by the kettle's mutex.
#[derive(Debug)]
pub(crate) struct KettleState {
    pub(crate) status: Status,
    pub(crate) temperature: f64,
    pub(crate) broken: bool,
    /// Token of the heating run that currently owns the kettle.
    pub(crate) heating: Option<CancelToken>,
}

impl KettleState {
    /// Whether the run identified by `token` still owns the kettle.
    pub(crate) fn is_owned_by(&self, token: &CancelToken) -> bool {
        self.status.is_on() && self.heating.as_ref().is_some_and(|t| t.same_run(token))
    }
}

/// Result of a status switch.
#[derive(Debug)]
#[must_use = "a heating transition does nothing until its loop is run"]
pub enum Transition {
    /// OFF to ON with water in the kettle. The caller must drive the
    /// returned loop, inline or on a background task.
    Heating(HeatingLoop),
    /// OFF to ON on an empty kettle. The kettle is broken and no loop
    /// was started.
    Broken,
    /// ON to OFF.
    SwitchedOff {
        /// `true` if an active heating run was signalled to stop.
        interrupted: bool,
    },
}

/// A simulated kettle.
pub struct Kettle {
    id: KettleId,
    water_amount: f64,
    model: Arc<KettleModel>,
    state: Mutex<KettleState>,
    notifier: Arc<dyn Notifier>,
}

impl core::fmt::Debug for Kettle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Kettle")
            .field("id", &self.id)
            .field("water_amount", &self.water_amount)
            .finish_non_exhaustive()
    }
}

impl Kettle {
    /// Create a kettle holding `water_amount` litres.
    ///
    /// The kettle starts OFF at room temperature, not broken, with a
    /// freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WaterAmountError`] if the amount lies outside the range
    /// configured in the model's physics.
    pub fn create(
        water_amount: f64,
        model: Arc<KettleModel>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, WaterAmountError> {
        let water_amount = water::check_water_amount(water_amount, &model.physics)?;
        let id = KettleId::new();
        debug!(kettle_id = %id, water_amount, "The kettle was initiated");

        Ok(Self {
            id,
            water_amount,
            state: Mutex::new(KettleState {
                status: Status::Off,
                temperature: model.physics.room_temperature,
                broken: false,
                heating: None,
            }),
            model,
            notifier,
        })
    }

    /// Return the kettle's identifier.
    pub const fn id(&self) -> KettleId {
        self.id
    }

    /// Return the amount of water in litres.
    pub const fn water_amount(&self) -> f64 {
        self.water_amount
    }

    /// Return `true` if the kettle holds no water.
    pub const fn is_empty(&self) -> bool {
        self.water_amount <= 0.0
    }

    /// Return the heating physics this kettle follows.
    pub fn physics(&self) -> &PhysicsConfig {
        &self.model.physics
    }

    /// Human-readable description of the kettle's static configuration.
    pub fn describe(&self) -> String {
        messages::describe(&self.model.specs)
    }

    /// Consistent snapshot of the mutable state.
    pub async fn snapshot(&self) -> KettleSnapshot {
        let state = self.state.lock().await;
        KettleSnapshot {
            id: self.id,
            water_amount: self.water_amount,
            status: state.status,
            temperature: state.temperature,
            broken: state.broken,
            heating: state.heating.is_some(),
        }
    }

    /// Toggle the status.
    ///
    /// Switching ON either breaks an empty kettle or hands back a heating
    /// loop bound to this kettle. Switching OFF cancels the active loop,
    /// if any, before the lock is released: once this returns, no further
    /// heating step can run.
    pub async fn switch(self: &Arc<Self>) -> Transition {
        let mut state = self.state.lock().await;
        self.switch_locked(&mut state)
    }

    /// Switch only if the kettle is not already in `desired` status.
    ///
    /// The check and the switch happen under one lock acquisition, so two
    /// concurrent "turn off" requests never toggle the kettle back on.
    /// Returns `None` when the kettle already is in `desired` status.
    pub async fn request(self: &Arc<Self>, desired: Status) -> Option<Transition> {
        let mut state = self.state.lock().await;
        if state.status == desired {
            debug!(kettle_id = %self.id, status = %desired, "Switch request ignored, already in status");
            return None;
        }
        Some(self.switch_locked(&mut state))
    }

    fn switch_locked(self: &Arc<Self>, state: &mut KettleState) -> Transition {
        debug!(
            kettle_id = %self.id,
            status = %state.status,
            "The switcher was used"
        );
        match state.status.toggled() {
            Status::On => self.turn_on_locked(state),
            Status::Off => {
                let interrupted = match self.turn_off_locked(state) {
                    Some(token) => {
                        token.cancel();
                        true
                    }
                    None => false,
                };
                Transition::SwitchedOff { interrupted }
            }
        }
    }

    fn turn_on_locked(self: &Arc<Self>, state: &mut KettleState) -> Transition {
        state.status = Status::On;
        debug!(kettle_id = %self.id, status = %state.status, "The kettle is now turned ON");
        self.emit(&Notification::TurnedOn);

        if self.is_empty() || state.broken {
            state.broken = true;
            debug!(
                kettle_id = %self.id,
                "The kettle was broken by the user, because it was turned on without water"
            );
            self.emit(&Notification::Broken);
            return Transition::Broken;
        }

        let token = CancelToken::new();
        state.heating = Some(token.clone());
        let ticker = Ticker::from_physics(&self.model.physics);
        Transition::Heating(HeatingLoop::new(Arc::clone(self), token, ticker))
    }

    /// Drive ON to OFF and hand back the token of the run that owned the
    /// kettle. Whether to cancel it is the caller's decision.
    fn turn_off_locked(&self, state: &mut KettleState) -> Option<CancelToken> {
        state.status = Status::Off;
        let previous = state.heating.take();
        debug!(kettle_id = %self.id, status = %state.status, "The kettle is now turned OFF");
        self.emit(&Notification::TurnedOff);
        previous
    }

    /// Auto-off at boiling point. Runs the same OFF transition as
    /// [`switch`](Self::switch) but leaves the finishing run's token alone.
    pub(crate) fn finish_heating_locked(&self, state: &mut KettleState, token: &CancelToken) {
        if state.is_owned_by(token) {
            // The finishing loop is the token's only other holder; it exits
            // right after this call, so there is nothing to cancel.
            let _own = self.turn_off_locked(state);
        }
    }

    #[cfg(test)]
    pub(crate) const fn with_id(mut self, id: KettleId) -> Self {
        self.id = id;
        self
    }

    pub(crate) async fn lock_state(&self) -> MutexGuard<'_, KettleState> {
        self.state.lock().await
    }

    pub(crate) fn emit(&self, notification: &Notification) {
        self.notifier.notify(self.id, notification);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::notifier::{NoOpNotifier, RecordingNotifier};

    fn model() -> Arc<KettleModel> {
        Arc::new(KettleModel::default())
    }

    fn kettle(water: f64, notifier: Arc<dyn Notifier>) -> Arc<Kettle> {
        Arc::new(Kettle::create(water, model(), notifier).unwrap())
    }

    #[tokio::test]
    async fn new_kettle_is_off_at_room_temperature() {
        let kettle = kettle(0.5, Arc::new(NoOpNotifier));
        let snap = kettle.snapshot().await;
        assert_eq!(snap.status, Status::Off);
        assert_eq!(snap.temperature, 20.0);
        assert!(!snap.broken);
        assert!(!snap.heating);
        assert_eq!(snap.water_amount, 0.5);
        assert_eq!(snap.id, kettle.id());
    }

    #[test]
    fn create_rejects_out_of_range_water() {
        let result = Kettle::create(1.5, model(), Arc::new(NoOpNotifier));
        assert!(matches!(result, Err(WaterAmountError::OutOfRange { .. })));
        let result = Kettle::create(f64::NAN, model(), Arc::new(NoOpNotifier));
        assert!(matches!(result, Err(WaterAmountError::NotANumber { .. })));
    }

    #[test]
    fn kettles_get_distinct_ids() {
        let a = Kettle::create(0.5, model(), Arc::new(NoOpNotifier)).unwrap();
        let b = Kettle::create(0.5, model(), Arc::new(NoOpNotifier)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn describe_uses_model_specs() {
        let a = Kettle::create(0.5, model(), Arc::new(NoOpNotifier)).unwrap();
        assert_eq!(a.describe(), messages::describe(&KettleModel::default().specs));
    }

    #[tokio::test]
    async fn switching_on_empty_kettle_breaks_it() {
        let recorder = Arc::new(RecordingNotifier::default());
        let kettle = kettle(0.0, recorder.clone());

        let transition = kettle.switch().await;
        assert!(matches!(transition, Transition::Broken));

        let snap = kettle.snapshot().await;
        assert!(snap.broken);
        assert_eq!(snap.status, Status::On);
        assert!(!snap.heating);
        assert_eq!(
            recorder.take(),
            vec![Notification::TurnedOn, Notification::Broken]
        );
    }

    #[tokio::test]
    async fn broken_kettle_toggles_but_never_heats() {
        let recorder = Arc::new(RecordingNotifier::default());
        let kettle = kettle(0.0, recorder.clone());

        for _ in 0..6 {
            match kettle.switch().await {
                Transition::Heating(_) => panic!("a broken kettle must never heat"),
                Transition::Broken | Transition::SwitchedOff { .. } => {}
            }
            let snap = kettle.snapshot().await;
            assert!(snap.broken);
            assert_eq!(snap.temperature, 20.0);
        }
        // Six toggles starting from OFF end OFF again.
        assert_eq!(kettle.snapshot().await.status, Status::Off);
        assert!(
            !recorder
                .take()
                .iter()
                .any(|n| matches!(n, Notification::Heating { .. } | Notification::AutoOff))
        );
    }

    #[tokio::test]
    async fn switching_on_with_water_starts_heating_run() {
        let kettle = kettle(0.5, Arc::new(NoOpNotifier));
        let transition = kettle.switch().await;
        assert!(matches!(transition, Transition::Heating(_)));
        let snap = kettle.snapshot().await;
        assert_eq!(snap.status, Status::On);
        assert!(snap.heating);
    }

    #[tokio::test]
    async fn switching_off_signals_the_run() {
        let recorder = Arc::new(RecordingNotifier::default());
        let kettle = kettle(0.5, recorder.clone());

        let Transition::Heating(heating) = kettle.switch().await else {
            panic!("expected heating transition");
        };
        let token = heating.cancel_token().clone();
        assert!(!token.is_cancelled());

        let transition = kettle.switch().await;
        assert!(matches!(
            transition,
            Transition::SwitchedOff { interrupted: true }
        ));
        assert!(token.is_cancelled());

        let snap = kettle.snapshot().await;
        assert_eq!(snap.status, Status::Off);
        assert!(!snap.heating);
        assert_eq!(
            recorder.take(),
            vec![Notification::TurnedOn, Notification::TurnedOff]
        );
    }

    #[tokio::test]
    async fn request_is_a_no_op_when_already_in_status() {
        let kettle = kettle(0.5, Arc::new(NoOpNotifier));
        assert!(kettle.request(Status::Off).await.is_none());

        let on = kettle.request(Status::On).await;
        assert!(matches!(on, Some(Transition::Heating(_))));
        assert!(kettle.request(Status::On).await.is_none());

        let off = kettle.request(Status::Off).await;
        assert!(matches!(
            off,
            Some(Transition::SwitchedOff { interrupted: true })
        ));
        assert!(kettle.request(Status::Off).await.is_none());
        assert_eq!(kettle.snapshot().await.status, Status::Off);
    }
}
