//! Pickup status state machine
//!
//! ```text
//! Pending -> Dijemput -> Ditimbang -> Selesai
//!    \          |            /
//!     +----> Dibatalkan <---+        (cancel path only)
//! ```
//!
//! `Selesai` and `Dibatalkan` are terminal. The forward table is enforced by
//! [`PickupStatus::transition`]; cancellation bypasses it and only checks
//! [`PickupStatus::can_cancel`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pickup status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PickupStatus {
    /// Submitted, waiting for a collector
    #[default]
    Pending,
    /// Collected from the contributor
    Dijemput,
    /// Weighed at the depot
    Ditimbang,
    /// Completed
    Selesai,
    /// Cancelled
    Dibatalkan,
}

/// Rejected status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot change status from {from} to {to}")]
pub struct InvalidTransition {
    pub from: PickupStatus,
    pub to: PickupStatus,
}

/// Unknown status name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown pickup status: {0}")]
pub struct UnknownStatus(pub String);

impl PickupStatus {
    /// All statuses in lifecycle order
    pub const ALL: [PickupStatus; 5] = [
        PickupStatus::Pending,
        PickupStatus::Dijemput,
        PickupStatus::Ditimbang,
        PickupStatus::Selesai,
        PickupStatus::Dibatalkan,
    ];

    /// The single permitted forward successor, if any
    pub const fn next(self) -> Option<PickupStatus> {
        match self {
            PickupStatus::Pending => Some(PickupStatus::Dijemput),
            PickupStatus::Dijemput => Some(PickupStatus::Ditimbang),
            PickupStatus::Ditimbang => Some(PickupStatus::Selesai),
            PickupStatus::Selesai | PickupStatus::Dibatalkan => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, PickupStatus::Selesai | PickupStatus::Dibatalkan)
    }

    /// Cancellation is allowed from any non-terminal status
    pub const fn can_cancel(self) -> bool {
        !self.is_terminal()
    }

    /// Validate a forward transition.
    ///
    /// Succeeds only when `to` is exactly `from.next()`. Self-transitions,
    /// skips, moves backwards and `Dibatalkan` as a target are all rejected.
    pub fn transition(from: PickupStatus, to: PickupStatus) -> Result<PickupStatus, InvalidTransition> {
        match from.next() {
            Some(next) if next == to => Ok(to),
            _ => Err(InvalidTransition { from, to }),
        }
    }

    /// Validate a cancellation
    pub fn cancel(from: PickupStatus) -> Result<PickupStatus, InvalidTransition> {
        if from.can_cancel() {
            Ok(PickupStatus::Dibatalkan)
        } else {
            Err(InvalidTransition {
                from,
                to: PickupStatus::Dibatalkan,
            })
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PickupStatus::Pending => "Pending",
            PickupStatus::Dijemput => "Dijemput",
            PickupStatus::Ditimbang => "Ditimbang",
            PickupStatus::Selesai => "Selesai",
            PickupStatus::Dibatalkan => "Dibatalkan",
        }
    }
}

impl fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickupStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PickupStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_table() {
        assert_eq!(
            PickupStatus::transition(PickupStatus::Pending, PickupStatus::Dijemput),
            Ok(PickupStatus::Dijemput)
        );
        assert_eq!(
            PickupStatus::transition(PickupStatus::Dijemput, PickupStatus::Ditimbang),
            Ok(PickupStatus::Ditimbang)
        );
        assert_eq!(
            PickupStatus::transition(PickupStatus::Ditimbang, PickupStatus::Selesai),
            Ok(PickupStatus::Selesai)
        );
    }

    #[test]
    fn test_transition_is_total_and_exact() {
        for from in PickupStatus::ALL {
            for to in PickupStatus::ALL {
                let result = PickupStatus::transition(from, to);
                if from.next() == Some(to) {
                    assert_eq!(result, Ok(to), "{from} -> {to} should be allowed");
                } else {
                    assert_eq!(
                        result,
                        Err(InvalidTransition { from, to }),
                        "{from} -> {to} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn test_skip_and_self_transitions_rejected() {
        assert!(PickupStatus::transition(PickupStatus::Pending, PickupStatus::Ditimbang).is_err());
        assert!(PickupStatus::transition(PickupStatus::Dijemput, PickupStatus::Selesai).is_err());
        assert!(PickupStatus::transition(PickupStatus::Dijemput, PickupStatus::Dijemput).is_err());
        assert!(PickupStatus::transition(PickupStatus::Pending, PickupStatus::Dibatalkan).is_err());
    }

    #[test]
    fn test_cancel_only_from_non_terminal() {
        assert!(PickupStatus::cancel(PickupStatus::Pending).is_ok());
        assert!(PickupStatus::cancel(PickupStatus::Dijemput).is_ok());
        assert!(PickupStatus::cancel(PickupStatus::Ditimbang).is_ok());
        assert!(PickupStatus::cancel(PickupStatus::Selesai).is_err());
        assert!(PickupStatus::cancel(PickupStatus::Dibatalkan).is_err());
    }

    #[test]
    fn test_error_message_names_both_statuses() {
        let err = PickupStatus::transition(PickupStatus::Dijemput, PickupStatus::Selesai)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot change status from Dijemput to Selesai");
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("dijemput".parse::<PickupStatus>(), Ok(PickupStatus::Dijemput));
        assert_eq!(" Selesai ".parse::<PickupStatus>(), Ok(PickupStatus::Selesai));
        assert!("Shipped".parse::<PickupStatus>().is_err());

        let json = serde_json::to_string(&PickupStatus::Ditimbang).unwrap();
        assert_eq!(json, "\"Ditimbang\"");
    }
}
