//! Import bills: supplier stock purchases plus the warehouse inventory
//! entries they create. Staff-only.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateImportBill, ImportBill, ImportBillSearchQuery, WarehouseEntry};
use crate::util::{parse_day_end, parse_day_start};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_import_bill).get(list_import_bills))
        .route("/search", get(search_import_bills))
        .route("/warehouse", get(list_warehouse_entries))
        .route(
            "/{id}",
            get(get_import_bill)
                .put(update_import_bill)
                .delete(delete_import_bill),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn create_import_bill(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateImportBill>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_elevated()?;
    input.validate()?;
    let create_date = parse_day_start(&input.create_date)
        .ok_or_else(|| AppError::Validation("Invalid creation date format".to_string()))?;

    let conn = state.db.get()?;
    for detail in &input.details {
        queries::get_variant_by_id(&conn, &detail.variant_id)?
            .or_not_found(msg::VARIANT_NOT_FOUND)?;
    }
    let bill = queries::create_import_bill(&conn, create_date, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Import bill created successfully", "importBill": bill })),
    ))
}

async fn list_import_bills(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ImportBill>>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::list_import_bills(&conn).map(Json)
}

async fn search_import_bills(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ImportBillSearchQuery>,
) -> Result<Json<Vec<ImportBill>>> {
    auth.ensure_elevated()?;

    let start = match query.start_date.as_deref() {
        Some(s) => Some(
            parse_day_start(s)
                .ok_or_else(|| AppError::Validation("Invalid start date format".to_string()))?,
        ),
        None => None,
    };
    let end = match query.end_date.as_deref() {
        Some(s) => Some(
            parse_day_end(s)
                .ok_or_else(|| AppError::Validation("Invalid end date format".to_string()))?,
        ),
        None => None,
    };
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(AppError::Validation(
                "Start date cannot be after end date".to_string(),
            ));
        }
    }
    if let Some(min) = query.min_amount {
        if min < 0.0 {
            return Err(AppError::Validation(
                "Minimum amount must be a non-negative number".to_string(),
            ));
        }
    }
    if let Some(max) = query.max_amount {
        if max < 0.0 {
            return Err(AppError::Validation(
                "Maximum amount must be a non-negative number".to_string(),
            ));
        }
    }
    if let (Some(min), Some(max)) = (query.min_amount, query.max_amount) {
        if min > max {
            return Err(AppError::Validation(
                "Minimum amount cannot be greater than maximum amount".to_string(),
            ));
        }
    }

    let conn = state.db.get()?;
    queries::search_import_bills(&conn, start, end, query.min_amount, query.max_amount).map(Json)
}

async fn get_import_bill(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    let bill =
        queries::get_import_bill_by_id(&conn, &id)?.or_not_found(msg::IMPORT_BILL_NOT_FOUND)?;
    let details = queries::list_details_for_bill(&conn, &id)?;
    Ok(Json(json!({ "importBill": bill, "details": details })))
}

#[derive(Deserialize)]
struct UpdateImportBillRequest {
    create_date: String,
    total_amount: f64,
    #[serde(default)]
    image_bill: Option<String>,
}

async fn update_import_bill(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateImportBillRequest>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    if input.total_amount <= 0.0 {
        return Err(AppError::Validation(
            "Total amount must be a positive number".to_string(),
        ));
    }
    let create_date = parse_day_start(&input.create_date)
        .ok_or_else(|| AppError::Validation("Invalid creation date format".to_string()))?;

    let conn = state.db.get()?;
    let bill = queries::update_import_bill(
        &conn,
        &id,
        create_date,
        input.total_amount,
        input.image_bill.as_deref(),
    )?
    .or_not_found(msg::IMPORT_BILL_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Import bill updated successfully", "importBill": bill }),
    ))
}

async fn delete_import_bill(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    if !queries::delete_import_bill(&conn, &id)? {
        return Err(AppError::NotFound(msg::IMPORT_BILL_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Import bill deleted successfully" })))
}

#[derive(Deserialize)]
struct WarehouseQuery {
    variant_id: Option<String>,
}

async fn list_warehouse_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<WarehouseQuery>,
) -> Result<Json<Vec<WarehouseEntry>>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::list_warehouse_entries(&conn, query.variant_id.as_deref()).map(Json)
}
