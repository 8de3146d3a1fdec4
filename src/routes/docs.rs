use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Serve the Swagger UI for the tipping API at `/docs`, with the raw document under `/api-doc`.
pub fn router(state: SharedState) -> Router<SharedState> {
    let swagger = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());
    Router::<SharedState>::from(swagger).with_state(state)
}
