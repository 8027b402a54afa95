use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use super::with_timeout;
use crate::model::user::{CreateUserRequest, UserKeyResponse, UserResponse};

pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Json<UserKeyResponse>> {
    let repo = registry.user_repository().await?;

    let id = with_timeout(
        "create_user",
        registry.request_timeout(),
        repo.create_user(req.into()),
    )
    .await?;

    tracing::info!("Created new user at id={id}");
    Ok(Json(UserKeyResponse { id }))
}

pub async fn show_user(
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    let repo = registry.user_repository().await?;

    let user = with_timeout(
        "get_user",
        registry.request_timeout(),
        repo.get_user(user_id),
    )
    .await?;

    match user {
        Some(user) => Ok(Json(user.into())),
        None => {
            tracing::error!("User with id={user_id} not found.");
            Err(AppError::EntityNotFound(format!(
                "user with id={user_id} not found"
            )))
        }
    }
}

pub async fn delete_user(
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let repo = registry.user_repository().await?;

    with_timeout(
        "delete_user",
        registry.request_timeout(),
        repo.delete_user(user_id),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
