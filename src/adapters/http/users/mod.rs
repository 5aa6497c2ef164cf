//! HTTP adapter for identity-provider user endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateUserRequest, ListUsersQuery, SetClaimsRequest, UpdateUserRequest};
pub use handlers::UserHandlers;
pub use routes::user_routes;
