use axum::{ routing::get, Router };

use crate::{ handlers, state::AppState };

pub fn create_routes(state: AppState) -> Router {
    let recipe_routes = Router::new()
        .route("/recipes", get(handlers::recipes::recipes))
        .route("/recipe", get(handlers::recipes::get_recipe));

    Router::new()
        .route("/status", get(handlers::status::status_check))
        .merge(recipe_routes.clone())
        .nest("/api", recipe_routes)
        .with_state(state)
}
