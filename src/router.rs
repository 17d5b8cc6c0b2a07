use axum::{Router, extract::DefaultBodyLimit, routing::get};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::db::CarsStorage;
use crate::handlers::cars;

#[derive(Clone)]
pub struct CarlotState {
    pub storage: CarsStorage,
    pub config: Arc<Config>,
}

impl CarlotState {
    pub fn new(storage: CarsStorage, config: Config) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }
}

pub fn carlot_router(state: CarlotState) -> Router {
    let media = ServeDir::new(&state.config.media_root);
    let media_mount = state.config.media_mount().to_string();
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(cars::index))
        .route("/cars", get(cars::car_list))
        .route("/cars/new", get(cars::car_create_form).post(cars::car_create))
        .route("/cars/{id}", get(cars::car_detail))
        .route(
            "/cars/{id}/edit",
            get(cars::car_update_form).post(cars::car_update),
        )
        .route(
            "/cars/{id}/delete",
            get(cars::car_delete).post(cars::car_delete),
        )
        .nest_service(&media_mount, media)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
