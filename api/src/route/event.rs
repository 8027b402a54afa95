use axum::{routing::put, Router};
use registry::AppRegistry;

use crate::handler::event::{
    add_attendees_to_event, delete_event, register_event, show_event,
};

pub fn build_event_routers() -> Router<AppRegistry> {
    let events_routers = Router::new()
        .route("/create_event", put(register_event))
        .route("/get_event/:event_id", put(show_event))
        .route("/add_attendees_to_event/:event_id", put(add_attendees_to_event))
        .route("/delete_event/:event_id", put(delete_event));

    Router::new().nest("/events", events_routers)
}
