//! Item routes.
//!
//! - GET /items?q=&min=&max= - List items, newest first
//! - POST /items - Add stock (creates the item or adds to an existing one)
//! - GET /items/{id} - Fetch one item

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use inventory_core::{Item, ItemDraft, ItemFilter};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::ItemAccess;
use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Query string for GET /items. Bounds stay strings so that junk values
/// are ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsParams {
    pub q: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl ListItemsParams {
    fn filter(&self) -> ItemFilter {
        ItemFilter::from_params(self.q.as_deref(), self.min.as_deref(), self.max.as_deref())
    }
}

/// Request body for POST /items.
///
/// Fields are loosely typed: a form may post the quantity as a string.
#[derive(Debug, Deserialize)]
pub struct UpsertItemRequest {
    pub name: Option<Value>,
    pub quantity: Option<Value>,
    pub description: Option<Value>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /items - List items matching the optional filters.
async fn list_items(
    State(state): State<AppState>,
    _access: ItemAccess,
    Query(params): Query<ListItemsParams>,
) -> ApiResult<Json<Vec<Item>>> {
    let filter = params.filter();
    let items = state.store().list_items(&filter).await?;

    tracing::debug!(count = items.len(), unfiltered = filter.is_empty(), "Listed items");

    Ok(Json(items))
}

/// POST /items - Create or top up an item.
///
/// # Response
///
/// - 201 Created: the stored item, whether it was new or updated
/// - 400 Bad Request: empty name or malformed body
async fn upsert_item(
    State(state): State<AppState>,
    access: ItemAccess,
    body: Result<Json<UpsertItemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let Json(request) = body?;
    let draft = ItemDraft::from_json(
        request.name.as_ref(),
        request.quantity.as_ref(),
        request.description.as_ref(),
    )?;

    let outcome = state.store().upsert_item(&draft).await?;

    tracing::info!(
        item_id = %outcome.item.id,
        created = outcome.created,
        added = draft.quantity,
        quantity = outcome.item.quantity,
        user_id = ?access.0.map(|s| s.user_id.get()),
        "Item upserted"
    );

    Ok((StatusCode::CREATED, Json(outcome.item)))
}

/// GET /items/{id} - Fetch a single item.
async fn get_item(
    State(state): State<AppState>,
    _access: ItemAccess,
    Path(id): Path<i64>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.store().get_item(id).await?))
}

/// Build item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(upsert_item))
        .route("/items/{id}", get(get_item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_request_accepts_loose_types() {
        let json = r#"{"name": "Screws", "quantity": "5"}"#;
        let request: UpsertItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, Some(Value::from("Screws")));
        assert_eq!(request.quantity, Some(Value::from("5")));
        assert!(request.description.is_none());
    }

    #[test]
    fn test_list_params_build_filter() {
        let params = ListItemsParams {
            q: Some("12".to_string()),
            min: Some("2".to_string()),
            max: Some("x".to_string()),
        };
        let filter = params.filter();
        assert_eq!(filter.query.unwrap().id.map(|id| id.get()), Some(12));
        assert_eq!(filter.min, Some(2));
        assert_eq!(filter.max, None);
    }
}
