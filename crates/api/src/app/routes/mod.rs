use axum::{
    Router,
    routing::{get, post},
};

pub mod organizations;
pub mod projects;
pub mod system;
pub mod teams;
pub mod users;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/users/signup", post(users::sign_up))
        .route("/users/verify-otp", post(users::verify_otp))
        .route("/users/resend-otp", post(users::resend_otp))
        .route("/users/signin", post(users::sign_in))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/users/logout", post(users::logout))
        .nest("/organizations", organizations::router())
        .nest("/projects", projects::router())
        .nest("/teams", teams::router())
}
