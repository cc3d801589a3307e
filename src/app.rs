use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::form_add))
        .route("/habits/:id/delete", post(handlers::form_delete))
        .route("/habits/:id/toggle", post(handlers::form_toggle))
        .route("/period/reset", post(handlers::form_reset_period))
        .route("/reset", post(handlers::form_reset_all))
        .route(
            "/api/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route("/api/habits/:id", delete(handlers::delete_habit))
        .route(
            "/api/completions/:frequency/:period_key",
            get(handlers::get_completions)
                .post(handlers::set_completion)
                .delete(handlers::reset_completions),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/period/:frequency", get(handlers::get_period))
        .route("/api/seed", post(handlers::seed))
        .route("/api/reset", post(handlers::reset_all))
        .with_state(state)
}
