//! Enumeration types for the kettle simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Power status
// ---------------------------------------------------------------------------

/// Power status of a kettle.
///
/// Mutated only through the kettle's switch operation. The broken
/// condition is tracked separately and does not constrain this value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The kettle is switched off. Every kettle starts here.
    #[default]
    Off,
    /// The kettle is switched on.
    On,
}

impl Status {
    /// Return the opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    /// Return `true` if the kettle is switched on.
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Off => f.write_str("OFF"),
            Self::On => f.write_str("ON"),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A user-facing notification emitted by the kettle or a driver.
///
/// Notifications carry only data. Turning them into text is the job of
/// the message catalogue in `kettle-core`, which keeps formatting out of
/// the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Session greeting shown by the console driver.
    Welcome,
    /// A new kettle was created.
    Created,
    /// Descriptive snapshot of the kettle's static configuration.
    Described {
        /// The rendered description.
        text: String,
    },
    /// The kettle was switched on.
    TurnedOn,
    /// The kettle was switched off (manually or automatically).
    TurnedOff,
    /// The kettle was switched on without water and is now broken.
    Broken,
    /// Heating progress report, emitted once per heating step.
    Heating {
        /// Water temperature in degrees Celsius before the step.
        temperature: f64,
    },
    /// The water reached boiling point and the kettle switches itself off.
    AutoOff,
    /// The heating process was cancelled before the water boiled.
    Interrupted,
    /// The user entered a water amount that is not a number or out of range.
    WrongWaterAmount,
    /// Session farewell shown by the console driver.
    Goodbye,
}

impl Notification {
    /// Stable short name of the notification kind, used in log fields.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Created => "created",
            Self::Described { .. } => "described",
            Self::TurnedOn => "turned_on",
            Self::TurnedOff => "turned_off",
            Self::Broken => "broken",
            Self::Heating { .. } => "heating",
            Self::AutoOff => "auto_off",
            Self::Interrupted => "interrupted",
            Self::WrongWaterAmount => "wrong_water_amount",
            Self::Goodbye => "goodbye",
        }
    }
}
