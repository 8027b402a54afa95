use axum::Router;
use registry::AppRegistry;

use super::{event::build_event_routers, user::build_user_routers};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_event_routers())
        .merge(build_user_routers());
    Router::new().nest("/api/v1", router)
}
