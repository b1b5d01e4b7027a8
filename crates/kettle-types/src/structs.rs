//! Core entity structs for the kettle simulation.
//!
//! Covers the static descriptive attributes loaded from configuration and
//! the point-in-time snapshot served to the presentation layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Status;
use crate::ids::KettleId;

// ---------------------------------------------------------------------------
// Descriptive attributes
// ---------------------------------------------------------------------------

/// Immutable descriptive attributes of a kettle model.
///
/// Supplied through external configuration at startup. None of these
/// values influence heating behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct KettleSpecs {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Nominal volume in litres.
    pub volume: f64,
    /// Housing colour.
    pub color: String,
    /// Heating element power in watts.
    pub power: u32,
    /// Supply voltage in volts.
    pub voltage: u32,
    /// Power cord length in metres.
    pub wire_len: f64,
    /// Warranty period in months.
    pub warranty: u32,
}

impl Default for KettleSpecs {
    fn default() -> Self {
        Self {
            manufacturer: "Bosch".to_owned(),
            model: "TWK 7603".to_owned(),
            volume: 1.0,
            color: "white".to_owned(),
            power: 2200,
            voltage: 230,
            wire_len: 0.75,
            warranty: 24,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Consistent point-in-time view of a kettle's mutable state.
///
/// All fields are read under a single lock acquisition, so status and
/// temperature always belong to the same moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct KettleSnapshot {
    /// Kettle identifier.
    pub id: KettleId,
    /// Amount of water in litres (fixed at creation).
    pub water_amount: f64,
    /// Current power status.
    pub status: Status,
    /// Current water temperature in degrees Celsius.
    pub temperature: f64,
    /// Whether the kettle was broken by switching it on empty.
    pub broken: bool,
    /// Whether a heating loop currently owns the kettle.
    pub heating: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_fill_missing_fields_from_defaults() {
        let parsed: Result<KettleSpecs, _> =
            serde_json::from_str(r#"{"manufacturer": "Tefal", "power": 1800}"#);
        let specs = parsed.ok().unwrap_or_default();
        assert_eq!(specs.manufacturer, "Tefal");
        assert_eq!(specs.power, 1800);
        assert_eq!(specs.voltage, 230);
        assert_eq!(specs.warranty, 24);
    }
}
