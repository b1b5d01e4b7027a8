//! HTML pages rendered with `minijinja`.
//!
//! Both templates are compiled into the binary and loaded once at startup.
//! Template names end in `.html`, so every interpolated value is
//! HTML-escaped.

use kettle_core::config::PhysicsConfig;
use kettle_core::messages;
use kettle_types::{KettleSnapshot, Notification};
use minijinja::{Environment, context};

use crate::error::ObserverError;

const NEW_KETTLE: &str = "new_kettle.html";
const KETTLE: &str = "kettle.html";

/// Loaded page templates.
pub struct Pages {
    env: Environment<'static>,
}

impl core::fmt::Debug for Pages {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pages").finish_non_exhaustive()
    }
}

impl Pages {
    /// Compile the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Template`] if a template fails to parse.
    pub fn new() -> Result<Self, ObserverError> {
        let mut env = Environment::new();
        env.add_template(NEW_KETTLE, include_str!("../templates/new_kettle.html"))?;
        env.add_template(KETTLE, include_str!("../templates/kettle.html"))?;
        Ok(Self { env })
    }

    /// Render the kettle creation form, optionally with an error message.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Template`] if rendering fails.
    pub fn new_kettle(
        &self,
        physics: &PhysicsConfig,
        error: Option<&str>,
    ) -> Result<String, ObserverError> {
        let page = self.env.get_template(NEW_KETTLE)?.render(context! {
            min_water_amount => physics.min_water_amount,
            max_water_amount => physics.max_water_amount,
            error => error,
        })?;
        Ok(page)
    }

    /// Render the page of one kettle.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Template`] if rendering fails.
    pub fn kettle(
        &self,
        snapshot: &KettleSnapshot,
        description: &str,
        physics: &PhysicsConfig,
    ) -> Result<String, ObserverError> {
        let page = self.env.get_template(KETTLE)?.render(context! {
            id => snapshot.id.to_string(),
            description => description,
            water_amount => snapshot.water_amount,
            status => snapshot.status.to_string(),
            temperature => snapshot.temperature,
            boiling_temperature => physics.boiling_temperature,
            heating => snapshot.heating,
            broken => snapshot.broken,
            broken_message => messages::render(&Notification::Broken),
        })?;
        Ok(page)
    }
}
