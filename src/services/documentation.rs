use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Tipping Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::matches::list_matches,
        crate::routes::matches::create_match,
        crate::routes::matches::get_match,
        crate::routes::matches::delete_match,
        crate::routes::matches::record_result,
        crate::routes::matches::list_predictions,
        crate::routes::predictions::submit_prediction,
        crate::routes::users::create_user,
        crate::routes::users::get_user,
        crate::routes::users::list_predictions,
        crate::routes::clubs::list_clubs,
        crate::routes::clubs::create_club,
        crate::routes::clubs::delete_club,
        crate::routes::time_slots::list_time_slots,
        crate::routes::time_slots::create_time_slot,
        crate::routes::time_slots::delete_time_slot,
        crate::routes::reconcile::reconcile_now,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::RecordResultRequest,
            crate::dto::matches::MatchSummary,
            crate::dto::prediction::SubmitPredictionRequest,
            crate::dto::prediction::PredictionSummary,
            crate::dto::user::CreateUserRequest,
            crate::dto::user::UserSummary,
            crate::dto::club::CreateClubRequest,
            crate::dto::club::ClubSummary,
            crate::dto::time_slot::CreateTimeSlotRequest,
            crate::dto::time_slot::TimeSlotSummary,
            crate::dto::reconcile::ReconcileResponse,
            crate::dao::models::MatchStatus,
            crate::dao::models::UserRole,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "matches", description = "Match schedule, results and status reconciliation"),
        (name = "predictions", description = "Tipper predictions"),
        (name = "users", description = "Tippers and administrators"),
        (name = "clubs", description = "Club reference data"),
        (name = "time-slots", description = "Reusable kickoff slots"),
    )
)]
pub struct ApiDoc;
