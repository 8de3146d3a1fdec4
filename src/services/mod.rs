/// Club reference data.
pub mod club_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Match scheduling, listing and result entry.
pub mod match_service;
/// Prediction submission guard.
pub mod prediction_service;
/// Batch status reconciliation.
pub mod reconciler;
/// Periodic reconciliation task.
pub mod scheduler;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
/// Kickoff time slots.
pub mod time_slot_service;
/// User registration and lookup.
pub mod user_service;
