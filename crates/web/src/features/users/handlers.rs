use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        athlete::{AttachAthleteResponse, CreateAthleteRequest},
        org::{AttachOrgResponse, CreateOrgRequest},
        user::{FinishProfileRequest, MutationResponse, UpdatePictureRequest, UserFoundResponse},
    },
    models::User,
};

use crate::error::WebError;
use crate::middleware::auth::SessionToken;
use crate::state::AppState;

use super::services::{self, Payload};

fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Payload<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| WebError::BadBody(rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "List all users", body = Vec<User>),
        (status = 404, description = "No users found"),
        (status = 500, description = "Failed to retrieve users")
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Response, WebError> {
    let users = services::list_users(state.store()).await?;

    Ok(Json(users).into_response())
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = UserFoundResponse),
        (status = 400, description = "Invalid id"),
        (status = 500, description = "Failed to get user")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let user = services::get_user(state.store(), &id).await?;

    Ok(Json(UserFoundResponse::from(user)).into_response())
}

#[utoipa::path(
    post,
    path = "/users/{id}/finish",
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = FinishProfileRequest,
    responses(
        (status = 200, description = "Profile finished", body = MutationResponse),
        (status = 400, description = "Invalid id, profile already finished or missing fields"),
        (status = 500, description = "Failed to get or update user")
    ),
    tag = "users"
)]
pub async fn finish_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<FinishProfileRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let result = services::finish_profile(state.store(), &id, payload(body)).await?;

    Ok(Json(MutationResponse::success(result)).into_response())
}

#[utoipa::path(
    put,
    path = "/users/{id}/picture",
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = UpdatePictureRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Picture updated", body = MutationResponse),
        (status = 400, description = "Invalid id, body or session update failure"),
        (status = 401, description = "Invalid header"),
        (status = 500, description = "Unauthenticated or failed to get/update user")
    ),
    tag = "users"
)]
pub async fn update_picture(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: SessionToken,
    body: Result<Json<UpdatePictureRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let result =
        services::update_picture(state.store(), session.as_str(), &id, payload(body)).await?;

    Ok(Json(MutationResponse::success(result)).into_response())
}

#[utoipa::path(
    post,
    path = "/users/{id}/org",
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = CreateOrgRequest,
    responses(
        (status = 200, description = "Org created and linked", body = AttachOrgResponse),
        (status = 400, description = "Invalid id, body or validation error"),
        (status = 500, description = "User lookup, already attached, insert or link failure")
    ),
    tag = "users"
)]
pub async fn attach_org(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CreateOrgRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let org = services::attach_org(state.store(), &id, payload(body)).await?;

    Ok(Json(AttachOrgResponse::from(org)).into_response())
}

#[utoipa::path(
    post,
    path = "/users/{id}/athlete",
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = CreateAthleteRequest,
    responses(
        (status = 200, description = "Athlete created and linked", body = AttachAthleteResponse),
        (status = 400, description = "Invalid id, body or validation error"),
        (status = 500, description = "User lookup, already attached, insert or link failure")
    ),
    tag = "users"
)]
pub async fn attach_athlete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CreateAthleteRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let athlete = services::attach_athlete(state.store(), &id, payload(body)).await?;

    Ok(Json(AttachAthleteResponse::from(athlete)).into_response())
}
