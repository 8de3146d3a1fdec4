//! Match lifecycle rules: which status a match should be in at a given instant and which
//! moves between statuses are allowed.
//!
//! ```text
//! planned --(now >= kickoff)--> live --(now >= kickoff + play + stoppage)--> finished
//! ```
//!
//! Status only ever moves forward. Recording a final result may jump a live match straight
//! to `finished`; nothing moves a match back.

use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::dao::models::MatchStatus;

/// Configured length of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTiming {
    /// Regular playing time.
    pub play: Duration,
    /// Added time after regular play.
    pub stoppage: Duration,
}

impl MatchTiming {
    /// Time between kickoff and the final whistle.
    pub fn full_time(&self) -> Duration {
        self.play + self.stoppage
    }

    /// Status a match kicking off at `kickoff` has at `now` by the timer alone.
    pub fn status_at(&self, kickoff: OffsetDateTime, now: OffsetDateTime) -> MatchStatus {
        if now < kickoff {
            MatchStatus::Planned
        } else if now < kickoff.saturating_add(self.full_time()) {
            MatchStatus::Live
        } else {
            MatchStatus::Finished
        }
    }

    /// Batch transitions to run for `now`, in lifecycle order.
    ///
    /// Running `planned → live` first lets a match whose whole window already elapsed reach
    /// `finished` within the same pass.
    pub fn steps(&self, now: OffsetDateTime) -> [TransitionStep; 2] {
        [
            TransitionStep {
                from: MatchStatus::Planned,
                to: MatchStatus::Live,
                kicked_off_by: now,
            },
            TransitionStep {
                from: MatchStatus::Live,
                to: MatchStatus::Finished,
                kicked_off_by: now.saturating_sub(self.full_time()),
            },
        ]
    }
}

/// One conditional batch update: every match in `from` whose kickoff is at or before
/// `kicked_off_by` moves to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionStep {
    pub from: MatchStatus,
    pub to: MatchStatus,
    pub kicked_off_by: OffsetDateTime,
}

/// Reasons a requested status change is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Results can only be recorded once the match kicked off.
    #[error("match has not kicked off yet")]
    NotStarted,
    /// Status would move backwards.
    #[error("status cannot move from {from:?} back to {to:?}")]
    Regression { from: MatchStatus, to: MatchStatus },
}

/// Check that a match in `current` may move to `next`.
pub fn ensure_forward(current: MatchStatus, next: MatchStatus) -> Result<(), LifecycleError> {
    if next < current {
        return Err(LifecycleError::Regression {
            from: current,
            to: next,
        });
    }
    Ok(())
}

/// Status after recording a result on a match currently in `current`.
///
/// Planned matches are refused; a live match is finished only when `finish` is set.
pub fn status_after_result(
    current: MatchStatus,
    finish: bool,
) -> Result<MatchStatus, LifecycleError> {
    let next = match (current, finish) {
        (MatchStatus::Planned, _) => return Err(LifecycleError::NotStarted),
        (_, true) => MatchStatus::Finished,
        (status, false) => status,
    };
    ensure_forward(current, next)?;
    Ok(next)
}

/// True while predictions for a match may still be created or changed.
///
/// A planned match whose kickoff already passed is closed even if no reconciliation pass
/// has flipped it to live yet.
pub fn accepts_predictions(
    status: MatchStatus,
    kickoff: OffsetDateTime,
    now: OffsetDateTime,
) -> bool {
    status == MatchStatus::Planned && now < kickoff
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn timing() -> MatchTiming {
        MatchTiming {
            play: Duration::minutes(10),
            stoppage: Duration::minutes(10),
        }
    }

    #[test]
    fn status_follows_the_timer() {
        let kickoff = datetime!(2026-05-09 15:30 UTC);
        let timing = timing();

        assert_eq!(
            timing.status_at(kickoff, kickoff - Duration::seconds(1)),
            MatchStatus::Planned
        );
        assert_eq!(timing.status_at(kickoff, kickoff), MatchStatus::Live);
        assert_eq!(
            timing.status_at(kickoff, kickoff + Duration::minutes(15)),
            MatchStatus::Live
        );
        assert_eq!(
            timing.status_at(kickoff, kickoff + Duration::minutes(20)),
            MatchStatus::Finished
        );
        assert_eq!(
            timing.status_at(kickoff, kickoff + Duration::minutes(25)),
            MatchStatus::Finished
        );
    }

    #[test]
    fn steps_run_in_lifecycle_order() {
        let now = datetime!(2026-05-09 16:00 UTC);
        let [first, second] = timing().steps(now);

        assert_eq!(
            (first.from, first.to, first.kicked_off_by),
            (MatchStatus::Planned, MatchStatus::Live, now)
        );
        assert_eq!(
            (second.from, second.to, second.kicked_off_by),
            (
                MatchStatus::Live,
                MatchStatus::Finished,
                datetime!(2026-05-09 15:40 UTC)
            )
        );
    }

    #[test]
    fn huge_timing_does_not_overflow() {
        let timing = MatchTiming {
            play: Duration::MAX,
            stoppage: Duration::ZERO,
        };
        let now = datetime!(2026-05-09 16:00 UTC);

        let [_, finish] = timing.steps(now);
        assert!(finish.kicked_off_by < now);
        assert_eq!(timing.status_at(now, now), MatchStatus::Live);
    }

    #[test]
    fn regression_is_refused() {
        assert!(ensure_forward(MatchStatus::Planned, MatchStatus::Live).is_ok());
        assert!(ensure_forward(MatchStatus::Live, MatchStatus::Live).is_ok());
        assert_eq!(
            ensure_forward(MatchStatus::Finished, MatchStatus::Live),
            Err(LifecycleError::Regression {
                from: MatchStatus::Finished,
                to: MatchStatus::Live,
            })
        );
    }

    #[test]
    fn result_entry_policy() {
        assert_eq!(
            status_after_result(MatchStatus::Planned, true),
            Err(LifecycleError::NotStarted)
        );
        assert_eq!(
            status_after_result(MatchStatus::Planned, false),
            Err(LifecycleError::NotStarted)
        );
        assert_eq!(
            status_after_result(MatchStatus::Live, true),
            Ok(MatchStatus::Finished)
        );
        assert_eq!(
            status_after_result(MatchStatus::Live, false),
            Ok(MatchStatus::Live)
        );
        assert_eq!(
            status_after_result(MatchStatus::Finished, false),
            Ok(MatchStatus::Finished)
        );
    }

    #[test]
    fn predictions_close_at_kickoff() {
        let kickoff = datetime!(2026-05-09 15:30 UTC);
        let before = kickoff - Duration::minutes(1);

        assert!(accepts_predictions(MatchStatus::Planned, kickoff, before));
        assert!(!accepts_predictions(MatchStatus::Planned, kickoff, kickoff));
        assert!(!accepts_predictions(MatchStatus::Live, kickoff, before));
        assert!(!accepts_predictions(MatchStatus::Finished, kickoff, before));
    }
}
