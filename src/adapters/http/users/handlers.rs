//! HTTP handlers for user endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::adapters::http::envelope::ApiResponse;
use crate::adapters::http::error::FaultResponse;
use crate::adapters::http::extract::{JsonBody, QueryParams};
use crate::adapters::http::middleware::RequireAuth;
use crate::domain::fault::Fault;
use crate::domain::foundation::{FieldError, UserId, ValidationError};
use crate::domain::users::{validate_claims, UserUpdate};
use crate::ports::IdentityProvider;

use super::dto::{
    CreateUserRequest, ListUsersQuery, SetClaimsRequest, UpdateUserRequest, UserListResponse,
};

pub const DEFAULT_MAX_RESULTS: u32 = 100;
pub const MAX_RESULTS_LIMIT: u32 = 1000;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct UserHandlers {
    identity: Arc<dyn IdentityProvider>,
}

impl UserHandlers {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }
}

fn parse_uid(raw: &str) -> Result<UserId, FaultResponse> {
    UserId::new(raw).map_err(|e| FaultResponse::invalid(e, raw))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/users - List users
pub async fn list_users(
    State(handlers): State<UserHandlers>,
    RequireAuth(_admin): RequireAuth,
    QueryParams(params): QueryParams<ListUsersQuery>,
) -> Result<ApiResponse<UserListResponse>, FaultResponse> {
    let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
        return Err(FaultResponse::invalid(
            ValidationError::out_of_range(
                "maxResults",
                1,
                i64::from(MAX_RESULTS_LIMIT),
                i64::from(max_results),
            ),
            max_results,
        ));
    }

    let users: Vec<Value> = handlers
        .identity
        .list_users(max_results)
        .await?
        .iter()
        .map(|u| u.to_payload())
        .collect();

    Ok(ApiResponse::ok(UserListResponse {
        count: users.len(),
        users,
    }))
}

/// POST /api/users - Create a user
pub async fn create_user(
    State(handlers): State<UserHandlers>,
    RequireAuth(admin): RequireAuth,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let mut user = req.to_new_user();
    let mut errors = user.validate();
    if let Some(raw) = &req.uid {
        user.uid = errors.check(UserId::new(raw.as_str()), raw.as_str());
    }
    Fault::check_fields(errors)?;

    let record = handlers.identity.create_user(user).await?;
    tracing::info!(uid = %record.uid, by = %admin.uid, "User created");

    Ok(ApiResponse::created(record.to_payload()).with_message("User created"))
}

/// GET /api/users/:uid - Fetch a user
pub async fn get_user(
    State(handlers): State<UserHandlers>,
    RequireAuth(_admin): RequireAuth,
    Path(uid): Path<String>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let uid = parse_uid(&uid)?;
    let record = handlers.identity.get_user(&uid).await?;
    Ok(ApiResponse::ok(record.to_payload()))
}

/// PATCH /api/users/:uid - Update selected fields
pub async fn update_user(
    State(handlers): State<UserHandlers>,
    RequireAuth(admin): RequireAuth,
    Path(uid): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let uid = parse_uid(&uid)?;
    let update = UserUpdate::from(req);
    if update.is_empty() {
        return Err(FieldError::new("body", "At least one field must be provided", Value::Null).into());
    }
    Fault::check_fields(update.validate())?;

    let record = handlers.identity.update_user(&uid, update).await?;
    tracing::info!(uid = %record.uid, by = %admin.uid, "User updated");

    Ok(ApiResponse::ok(record.to_payload()).with_message("User updated"))
}

/// DELETE /api/users/:uid - Delete a user
pub async fn delete_user(
    State(handlers): State<UserHandlers>,
    RequireAuth(admin): RequireAuth,
    Path(uid): Path<String>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let uid = parse_uid(&uid)?;
    let record = handlers.identity.delete_user(&uid).await?;
    tracing::info!(uid = %record.uid, by = %admin.uid, "User deleted");

    Ok(ApiResponse::ok(json!({ "uid": record.uid.as_str() })).with_message("User deleted"))
}

/// PUT /api/users/:uid/claims - Replace custom claims
pub async fn set_custom_claims(
    State(handlers): State<UserHandlers>,
    RequireAuth(admin): RequireAuth,
    Path(uid): Path<String>,
    JsonBody(req): JsonBody<SetClaimsRequest>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let uid = parse_uid(&uid)?;
    let claims = match req.claims {
        Value::Object(map) => map,
        other => {
            return Err(FaultResponse::invalid(
                ValidationError::invalid_format("claims", "must be a JSON object"),
                other,
            ))
        }
    };
    validate_claims(&claims)
        .map_err(|e| FaultResponse::invalid(e, Value::Object(claims.clone())))?;

    let record = handlers.identity.set_custom_claims(&uid, claims).await?;
    tracing::info!(uid = %record.uid, by = %admin.uid, "Custom claims replaced");

    Ok(ApiResponse::ok(record.to_payload()).with_message("Custom claims updated"))
}
