use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    attach_athlete, attach_org, finish_profile, get_user, list_users, update_picture,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user))
        .route("/:id/finish", post(finish_profile))
        .route("/:id/picture", put(update_picture))
        .route("/:id/org", post(attach_org))
        .route("/:id/athlete", post(attach_athlete))
}
