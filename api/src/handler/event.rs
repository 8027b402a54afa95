use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::model::{
    event::event::AddAttendees,
    id::{EventId, UserId},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use super::with_timeout;
use crate::model::event::{CreateEventRequest, EventKeyResponse, EventResponse};

pub async fn register_event(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<Json<EventKeyResponse>> {
    let repo = registry.event_repository().await?;

    let id = with_timeout(
        "create_event",
        registry.request_timeout(),
        repo.create_event(req.into()),
    )
    .await?;

    tracing::info!("Created new event at id={id}");
    Ok(Json(EventKeyResponse { id }))
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    let repo = registry.event_repository().await?;

    let event = with_timeout(
        "get_event",
        registry.request_timeout(),
        repo.get_event(event_id),
    )
    .await?;

    match event {
        Some(event) => Ok(Json(event.into())),
        None => {
            tracing::error!("Event with id={event_id} not found.");
            Err(AppError::EntityNotFound(format!(
                "event with id={event_id} not found"
            )))
        }
    }
}

pub async fn add_attendees_to_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(user_ids): Json<Vec<UserId>>,
) -> AppResult<StatusCode> {
    let repo = registry.event_repository().await?;

    let event = AddAttendees {
        event_id,
        attendees: user_ids.into_iter().collect(),
    };
    let succeeded = with_timeout(
        "add_attendees_to_event",
        registry.request_timeout(),
        repo.add_attendees_to_event(event),
    )
    .await?;

    if succeeded {
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::error!("Event with id={event_id} not found.");
        Err(AppError::EntityNotFound(format!(
            "event with id={event_id} not found"
        )))
    }
}

pub async fn delete_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let repo = registry.event_repository().await?;

    with_timeout(
        "delete_event",
        registry.request_timeout(),
        repo.delete_event(event_id),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
