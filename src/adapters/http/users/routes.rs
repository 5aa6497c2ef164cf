//! HTTP routes for user endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    create_user, delete_user, get_user, list_users, set_custom_claims, update_user, UserHandlers,
};

/// Creates the user router, mounted under `/api/users`.
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:uid", get(get_user).patch(update_user).delete(delete_user))
        .route("/:uid/claims", put(set_custom_claims))
        .with_state(handlers)
}
