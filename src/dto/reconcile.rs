use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of a manually triggered reconciliation pass.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileResponse {
    /// Number of matches whose status changed.
    pub transitioned: u64,
}
