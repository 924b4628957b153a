//! Room routes for Easel
//!
//! The single externally-addressable entry point: every request names a room,
//! the room token is checked against the configured allow-set, and the request
//! is dispatched to the event store or the transform registry. No business
//! logic lives here beyond validation and dispatch.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    config::Config,
    error::{Error, Result},
    models::{DrawCommand, FilterRequest},
    store::EventLogStore,
    transform::{Availability, TransformRegistry},
};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<Config>,
    /// Valid room tokens, fixed at startup
    pub rooms: Arc<HashSet<String>>,
    /// Room event logs
    pub store: Arc<EventLogStore>,
    /// Named image transforms
    pub transforms: Arc<TransformRegistry>,
}

impl AppState {
    /// Build the application state from configuration
    pub fn from_config(config: Arc<Config>) -> Self {
        let transforms = Arc::new(TransformRegistry::from_config(&config.transforms));
        Self::with_registry(config, transforms)
    }

    /// Build the application state with a pre-built transform registry
    ///
    /// Used by embedders that register native transform implementations.
    pub fn with_registry(config: Arc<Config>, transforms: Arc<TransformRegistry>) -> Self {
        let rooms = Arc::new(config.rooms.token_set());
        Self {
            config,
            rooms,
            store: Arc::new(EventLogStore::new()),
            transforms,
        }
    }

    /// Check a room token against the configured allow-set
    fn ensure_room(&self, token: &str) -> Result<()> {
        if self.rooms.contains(token) {
            Ok(())
        } else {
            Err(Error::room_not_found(token))
        }
    }
}

/// Response for a successful append
#[derive(Debug, Serialize)]
pub struct AppendResponse {
    /// Always "ok"
    pub status: &'static str,
    /// 0-based index assigned to the appended command
    pub index: usize,
}

/// Response for a successful clear
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    /// Always "ok"
    pub status: &'static str,
    /// Human-readable confirmation
    pub message: String,
}

/// Response carrying a transformed image payload
#[derive(Debug, Serialize)]
pub struct FilterResponse {
    /// The (possibly identity-passed) output bytes
    pub image_data: Vec<u8>,
}

/// A single entry in the transform listing
#[derive(Debug, Serialize)]
pub struct FilterInfo {
    /// Transform name
    pub name: String,
    /// Whether a native implementation is loaded
    pub availability: Availability,
}

/// Response listing the enabled transforms
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    /// Enabled transforms, sorted by name
    pub filters: Vec<FilterInfo>,
}

/// Append a draw command to a room's log
///
/// # Example
/// ```text
/// POST /draw/room_42
/// {"x": 5, "y": 5, "type": "line"}
/// ```
pub async fn append_command(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<AppendResponse>> {
    state.ensure_room(&room_id)?;

    let command = DrawCommand::from_value(body)?;
    let index = state.store.append(&room_id, command).await;

    tracing::info!(room = %room_id, index, "Draw command accepted");

    Ok(Json(AppendResponse {
        status: "ok",
        index,
    }))
}

/// Read all draw commands for a room, in append order
///
/// A room that has never been drawn to returns an empty array, not an error.
pub async fn read_commands(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<DrawCommand>>> {
    state.ensure_room(&room_id)?;

    let commands = state.store.read_all(&room_id).await;
    Ok(Json(commands))
}

/// Clear all draw commands for a room
pub async fn clear_commands(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ClearResponse>> {
    state.ensure_room(&room_id)?;

    state.store.clear(&room_id).await;

    tracing::info!(room = %room_id, "Room log cleared");

    Ok(Json(ClearResponse {
        status: "ok",
        message: format!("All commands for room {} have been cleared", room_id),
    }))
}

/// Apply a named transform to an image payload
///
/// Unknown or unimplemented transform names pass the payload through
/// unchanged; only structural problems or an exceeded execution budget fail
/// the request. Transforms never touch room state.
///
/// # Example
/// ```text
/// POST /filter/room_42
/// {"image_data": [1, 2, 3], "width": 1, "height": 3, "filter_name": "blur"}
/// ```
pub async fn apply_filter(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<FilterResponse>> {
    state.ensure_room(&room_id)?;

    let request = FilterRequest::from_value(body)?;
    let budget = state.config.transforms.apply_timeout();

    let outcome = state
        .transforms
        .clone()
        .apply_with_timeout(
            &request.filter_name,
            request.image_data,
            request.width,
            request.height,
            budget,
        )
        .await?;

    tracing::info!(
        room = %room_id,
        transform = %request.filter_name,
        applied = outcome.applied,
        bytes = outcome.data.len(),
        "Filter request served"
    );

    Ok(Json(FilterResponse {
        image_data: outcome.data,
    }))
}

/// List the enabled transforms and their availability
pub async fn list_filters(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<FiltersResponse>> {
    state.ensure_room(&room_id)?;

    let filters = state
        .transforms
        .catalog()
        .into_iter()
        .map(|(name, availability)| FilterInfo { name, availability })
        .collect();

    Ok(Json(FiltersResponse { filters }))
}
