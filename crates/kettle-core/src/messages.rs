//! Notification catalogue.
//!
//! Maps a [`Notification`] and its payload to the text shown to users and
//! written to the message log. The state machine never formats strings
//! itself; drivers call [`render`] (or [`render_console`]) on whatever the
//! [`Notifier`](crate::notifier::Notifier) hands them.

use kettle_types::{KettleSpecs, Notification};

use crate::config::PhysicsConfig;

/// Prompt asking the console user whether to switch the kettle on.
pub const TURN_ON_PROMPT: &str =
    "To turn on the kettle please enter `on`. Any other input will close the program.\nInput: ";

/// Error shown by the web form when the water amount is rejected.
pub const WRONG_VOLUME_FORM: &str = "Please enter a valid number for the water amount!";

/// Hint appended to heating progress on the console.
const CONSOLE_STOP_HINT: &str = "To stop the heating process press Ctrl+C.";

/// Render a notification as user-facing text.
pub fn render(notification: &Notification) -> String {
    match notification {
        Notification::Welcome => {
            "Hi there! You can control your virtual kettle with this script.".to_owned()
        }
        Notification::Created => "You successfully created the kettle.".to_owned(),
        Notification::Described { text } => text.clone(),
        Notification::TurnedOn => "The kettle is now turned ON.".to_owned(),
        Notification::TurnedOff => "The kettle is now turned OFF.".to_owned(),
        Notification::Broken => {
            "You turned on the kettle without any water and broke it.\nWhy did you do it?"
                .to_owned()
        }
        Notification::Heating { temperature } => {
            format!("The kettle is heating now, current temperature: {temperature}C.")
        }
        Notification::AutoOff => "The kettle was turned off automatically after the water \
                                  reached boiling temperature."
            .to_owned(),
        Notification::Interrupted => "The heating process was interrupted.".to_owned(),
        Notification::WrongWaterAmount => {
            "The wrong amount of water was entered. Please try again.".to_owned()
        }
        Notification::Goodbye => {
            "Thank you for using our virtual kettle. Come back soon!".to_owned()
        }
    }
}

/// Render a notification for the interactive console.
///
/// Identical to [`render`] except that heating progress tells the user how
/// to interrupt it.
pub fn render_console(notification: &Notification) -> String {
    match notification {
        Notification::Heating { .. } => {
            format!("{} {CONSOLE_STOP_HINT}", render(notification))
        }
        other => render(other),
    }
}

/// Human-readable description of a kettle model.
pub fn describe(specs: &KettleSpecs) -> String {
    format!(
        "It's a {color} kettle {manufacturer} {model}. It has {volume}L volume, the power of \
         {power}W with {voltage}V voltage and a wire with length of {wire_len}M. The \
         manufacturer provides {warranty} month warranty.",
        color = specs.color,
        manufacturer = specs.manufacturer,
        model = specs.model,
        volume = specs.volume,
        power = specs.power,
        voltage = specs.voltage,
        wire_len = specs.wire_len,
        warranty = specs.warranty,
    )
}

/// Prompt asking the console user for a water amount.
pub fn water_amount_prompt(physics: &PhysicsConfig) -> String {
    format!(
        "Please enter float water amount between {} and {}. This is a required value.\n\
         Amount of water: ",
        physics.min_water_amount, physics.max_water_amount
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heating_message_carries_temperature() {
        let text = render(&Notification::Heating { temperature: 28.0 });
        assert_eq!(text, "The kettle is heating now, current temperature: 28C.");
    }

    #[test]
    fn console_heating_message_adds_stop_hint() {
        let text = render_console(&Notification::Heating { temperature: 20.0 });
        assert!(text.starts_with("The kettle is heating now, current temperature: 20C."));
        assert!(text.ends_with("press Ctrl+C."));
    }

    #[test]
    fn console_leaves_other_messages_alone() {
        assert_eq!(
            render_console(&Notification::TurnedOff),
            render(&Notification::TurnedOff)
        );
    }

    #[test]
    fn auto_off_and_manual_off_differ() {
        assert_ne!(
            render(&Notification::AutoOff),
            render(&Notification::TurnedOff)
        );
    }

    #[test]
    fn description_uses_all_specs() {
        let specs = KettleSpecs::default();
        let text = describe(&specs);
        assert!(text.starts_with("It's a white kettle Bosch TWK 7603."));
        assert!(text.contains("2200W with 230V"));
        assert!(text.contains("0.75M"));
        assert!(text.ends_with("24 month warranty."));
    }

    #[test]
    fn described_passes_text_through() {
        let text = render(&Notification::Described {
            text: "A kettle.".to_owned(),
        });
        assert_eq!(text, "A kettle.");
    }

    #[test]
    fn water_prompt_shows_range() {
        let prompt = water_amount_prompt(&PhysicsConfig::default());
        assert!(prompt.contains("between 0 and 1."));
    }
}
