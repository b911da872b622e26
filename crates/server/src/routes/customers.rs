use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use service::customer::domain::{Customer, CustomerDraft, CustomerInput};
use service::customer::validation::validate;
use service::errors::ServiceError;
use tracing::debug;
use uuid::Uuid;

use crate::{errors::JsonApiError, state::ServerState};

type JsonBody<T> = WithRejection<Json<T>, JsonApiError>;
type PathParam<T> = WithRejection<Path<T>, JsonApiError>;

/// Field rules are checked against today's UTC date.
fn validated(draft: &CustomerDraft) -> Result<CustomerInput, ServiceError> {
    Ok(validate(draft, Utc::now().date_naive())?)
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/customers", get(list).post(create))
        .route("/api/customers/:id", get(get_by_id).put(update).delete(delete))
        .route("/api/customers/tax-id/:tax_id", get(by_tax_id))
        .route("/api/customers/email/:email", get(by_email))
}

#[utoipa::path(
    post, path = "/api/customers", tag = "customers",
    request_body = crate::openapi::CustomerRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Tax id or email already taken", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(draft), _): JsonBody<CustomerDraft>,
) -> Result<(StatusCode, Json<Customer>), JsonApiError> {
    let input = validated(&draft)?;
    let created = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/customers", tag = "customers",
    responses((status = 200, description = "All customers", body = [crate::openapi::CustomerDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Customer>>, JsonApiError> {
    let all = state.customers.list_all().await?;
    debug!(count = all.len(), "list customers");
    Ok(Json(all))
}

#[utoipa::path(
    get, path = "/api/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> Result<Json<Customer>, JsonApiError> {
    Ok(Json(state.customers.get_by_id(id).await?))
}

#[utoipa::path(
    put, path = "/api/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = crate::openapi::CustomerRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Tax id or email already taken", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): PathParam<Uuid>,
    WithRejection(Json(draft), _): JsonBody<CustomerDraft>,
) -> Result<Json<Customer>, JsonApiError> {
    let input = validated(&draft)?;
    Ok(Json(state.customers.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/customers/tax-id/{taxId}", tag = "customers",
    params(("taxId" = String, Path, description = "Tax id, exact match", example = "20-12345678-9")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn by_tax_id(
    State(state): State<ServerState>,
    WithRejection(Path(tax_id), _): PathParam<String>,
) -> Result<Json<Customer>, JsonApiError> {
    Ok(Json(state.customers.find_by_tax_id(&tax_id).await?))
}

#[utoipa::path(
    get, path = "/api/customers/email/{email}", tag = "customers",
    params(("email" = String, Path, description = "Email, exact match")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn by_email(
    State(state): State<ServerState>,
    WithRejection(Path(email), _): PathParam<String>,
) -> Result<Json<Customer>, JsonApiError> {
    Ok(Json(state.customers.find_by_email(&email).await?))
}
