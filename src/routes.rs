//! URL table.
use crate::api;
use crate::app::AppState;
use axum::routing::{get, post};
use axum::Router;

/// URL table of the service. Paths keep their trailing slashes on the
/// collection routes and none on the item routes.
pub fn survey_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/survey/",
            get(api::surveys::list_surveys).post(api::surveys::create_survey),
        )
        .route(
            "/survey/{id}",
            get(api::surveys::get_survey)
                .put(api::surveys::update_survey)
                .delete(api::surveys::delete_survey),
        )
        .route("/vote/", post(api::votes::vote))
        .route("/option/", post(api::options::create_option))
        .route(
            "/option/{id}",
            get(api::options::get_option)
                .put(api::options::update_option)
                .delete(api::options::delete_option),
        )
        .route("/surveys/", get(api::listing::survey_list))
        .route("/health", get(api::system::health))
}
