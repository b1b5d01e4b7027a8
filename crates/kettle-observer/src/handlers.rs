//! HTTP endpoint handlers for the web control surface.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Redirect to the creation form |
//! | `GET` | `/kettle/new` | Creation form (`?error=` shows a message) |
//! | `POST` | `/kettle/new` | Validate `water_amount`, create, redirect |
//! | `GET` | `/kettle/:id` | Kettle page |
//! | `POST` | `/kettle/:id` | `switch_status` = `Turn On` / `Turn Off` |
//! | `GET` | `/api/kettles` | Snapshots of all kettles, oldest first |
//! | `GET` | `/api/kettles/:id` | Kettle snapshot as JSON |
//!
//! Turning a kettle on returns immediately; the heating loop runs on a
//! background task and the kettle page refreshes while it is active.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use kettle_core::water::parse_water_amount;
use kettle_core::{Kettle, Transition, messages};
use kettle_types::{KettleId, KettleSnapshot, Notification, Status};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ObserverError;
use crate::state::AppState;

/// Value of the `error` query parameter after a rejected water amount.
pub const WATER_AMOUNT_ERROR: &str = "water_amount";

/// Form button value that switches a kettle on.
pub const TURN_ON: &str = "Turn On";

/// Form button value that switches a kettle off.
pub const TURN_OFF: &str = "Turn Off";

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Query parameters for `GET /kettle/new`.
#[derive(Debug, serde::Deserialize)]
pub struct NewKettleQuery {
    /// Error code from a previous rejected submission.
    pub error: Option<String>,
}

/// Form body of `POST /kettle/new`.
#[derive(Debug, serde::Deserialize)]
pub struct NewKettleForm {
    /// Water amount in litres, as typed by the user.
    #[serde(default)]
    pub water_amount: String,
}

/// Form body of `POST /kettle/:id`.
#[derive(Debug, serde::Deserialize)]
pub struct SwitchForm {
    /// Either [`TURN_ON`] or [`TURN_OFF`].
    #[serde(default)]
    pub switch_status: String,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Redirect the site root to the creation form.
pub async fn index() -> Redirect {
    Redirect::to("/kettle/new")
}

/// Serve the kettle creation form.
pub async fn new_kettle_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewKettleQuery>,
) -> Result<Html<String>, ObserverError> {
    let error = match query.error.as_deref() {
        Some(WATER_AMOUNT_ERROR) => Some(messages::WRONG_VOLUME_FORM),
        _ => None,
    };
    let page = state.pages.new_kettle(&state.model.physics, error)?;
    Ok(Html(page))
}

/// Create a kettle from the submitted form and redirect to its page.
///
/// A rejected water amount redirects back to the form with an error.
pub async fn create_kettle(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewKettleForm>,
) -> Result<Redirect, ObserverError> {
    let amount = match parse_water_amount(&form.water_amount, &state.model.physics) {
        Ok(amount) => amount,
        Err(e) => {
            warn!(input = %form.water_amount, error = %e, "Rejected water amount");
            return Ok(Redirect::to(&format!(
                "/kettle/new?error={WATER_AMOUNT_ERROR}"
            )));
        }
    };

    let kettle = Kettle::create(amount, Arc::clone(&state.model), Arc::clone(&state.notifier))
        .map_err(|e| ObserverError::InvalidInput(e.to_string()))?;
    let kettle = state.registry.put(kettle).await?;

    let id = kettle.id();
    state.notifier.notify(id, &Notification::Created);
    state.notifier.notify(
        id,
        &Notification::Described {
            text: kettle.describe(),
        },
    );
    info!(kettle_id = %id, water_amount = amount, "Kettle created");

    Ok(Redirect::to(&format!("/kettle/{id}")))
}

/// Serve the page of one kettle.
pub async fn show_kettle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, ObserverError> {
    let kettle = lookup(&state, &id).await?;
    let snapshot = kettle.snapshot().await;
    let page = state
        .pages
        .kettle(&snapshot, &kettle.describe(), kettle.physics())?;
    Ok(Html(page))
}

/// Switch a kettle on or off and redirect back to its page.
///
/// `Turn On` only acts on a kettle that is OFF and `Turn Off` only on one
/// that is ON, so a repeated submission never flips the kettle back.
pub async fn switch_kettle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<SwitchForm>,
) -> Result<Redirect, ObserverError> {
    let desired = match form.switch_status.as_str() {
        TURN_ON => Status::On,
        TURN_OFF => Status::Off,
        other => {
            return Err(ObserverError::InvalidInput(format!(
                "unknown switch_status {other:?}"
            )));
        }
    };

    let kettle = lookup(&state, &id).await?;
    match kettle.request(desired).await {
        Some(Transition::Heating(run)) => {
            let kettle_id = kettle.id();
            tokio::spawn(async move {
                let report = run.run().await;
                debug!(
                    kettle_id = %kettle_id,
                    outcome = ?report.outcome,
                    steps = report.steps,
                    "Background heating finished"
                );
            });
        }
        Some(Transition::Broken | Transition::SwitchedOff { .. }) | None => {}
    }

    Ok(Redirect::to(&format!("/kettle/{}", kettle.id())))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Return a snapshot of every registered kettle.
///
/// Identifiers are time-ordered, so kettles are listed in creation order.
pub async fn list_kettles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<KettleSnapshot>>, ObserverError> {
    let mut snapshots = Vec::new();
    for id in state.registry.ids().await {
        snapshots.push(state.registry.get(id).await?.snapshot().await);
    }
    Ok(Json(snapshots))
}

/// Return a consistent snapshot of one kettle.
pub async fn get_kettle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<KettleSnapshot>, ObserverError> {
    let kettle = lookup(&state, &id).await?;
    Ok(Json(kettle.snapshot().await))
}

/// Resolve a path segment to a registered kettle.
///
/// A segment that is not a UUID cannot name any kettle, so it is reported
/// as not found rather than as a bad request.
async fn lookup(state: &AppState, raw: &str) -> Result<Arc<Kettle>, ObserverError> {
    let uuid = Uuid::parse_str(raw)
        .map_err(|_e| ObserverError::NotFound(format!("kettle not found: {raw}")))?;
    Ok(state.registry.get(KettleId::from(uuid)).await?)
}
