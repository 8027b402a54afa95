use axum::{routing::put, Router};
use registry::AppRegistry;

use crate::handler::user::{delete_user, register_user, show_user};

pub fn build_user_routers() -> Router<AppRegistry> {
    let users_routers = Router::new()
        .route("/create_user", put(register_user))
        .route("/get_user/:user_id", put(show_user))
        .route("/delete_user/:user_id", put(delete_user));

    Router::new().nest("/users", users_routers)
}
