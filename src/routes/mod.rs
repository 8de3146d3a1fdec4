use axum::{Router, extract::FromRequest};
use tower_http::services::ServeDir;

use crate::{error::AppError, state::SharedState};

pub mod clubs;
pub mod docs;
pub mod health;
pub mod matches;
pub mod predictions;
pub mod reconcile;
pub mod time_slots;
pub mod users;

/// JSON body extractor whose rejections render as [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Compose all route trees, wiring in shared state, documentation and static assets.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(matches::router())
        .merge(predictions::router())
        .merge(users::router())
        .merge(clubs::router())
        .merge(time_slots::router())
        .merge(reconcile::router());

    let docs_router = docs::router(state.clone());

    let assets = ServeDir::new(&state.config().public_dir).append_index_html_on_directories(true);

    api_router
        .merge(docs_router)
        .fallback_service(assets)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };

    use super::*;
    use crate::dto::prediction::SubmitPredictionRequest;

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let rejection = ApiJson::<SubmitPredictionRequest>::from_request(json_request("{"), &())
            .await
            .err()
            .expect("rejected");
        assert!(matches!(rejection, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn partial_body_reaches_handler() {
        let request = json_request(r#"{"predicted_home_score":2}"#);
        let ApiJson(payload) = ApiJson::<SubmitPredictionRequest>::from_request(request, &())
            .await
            .ok()
            .expect("accepted");
        assert_eq!(payload.predicted_home_score, Some(2));
        assert!(payload.user_id.is_none());
    }
}
