// ABOUTME: Error types for location tracking lifecycle and position provider failures
// ABOUTME: Resource errors are terminal for a session and surface to the caller unretried
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::TrackingState;

/// Errors raised by the location tracking state machine
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    /// The position provider refused location access
    #[error("Location permission denied: {reason}")]
    PermissionDenied {
        /// Provider-supplied reason
        reason: String,
    },

    /// The provider could not open a position subscription
    #[error("Position subscription failed: {reason}")]
    SubscriptionFailed {
        /// Provider-supplied reason
        reason: String,
    },

    /// The provider had no current fix to seed the path with
    #[error("No position fix available to start tracking")]
    NoFixAvailable,

    /// Lifecycle action not allowed from the current state
    #[error("Cannot {action} while {from:?}")]
    InvalidTransition {
        /// State the tracker was in
        from: TrackingState,
        /// Attempted action
        action: &'static str,
    },
}
