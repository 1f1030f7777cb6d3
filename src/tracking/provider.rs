// ABOUTME: Position provider seam consumed by the location tracker
// ABOUTME: Defines the subscribe/unsubscribe contract and the fix channel types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use runline_core::errors::TrackingError;
use runline_core::models::Fix;
use tokio::sync::mpsc;

/// Sending half handed to a provider on subscribe
pub type FixSender = mpsc::UnboundedSender<Fix>;

/// Receiving half returned to the caller when tracking starts
pub type FixReceiver = mpsc::UnboundedReceiver<Fix>;

/// Opaque identifier of an open position subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    /// Wrap a provider-assigned identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Provider-assigned identifier
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Platform position source (GPS, fused location, recorded track, ...)
///
/// Permission acquisition and platform specifics live behind this trait.
pub trait PositionProvider: Send {
    /// One-shot read of the current position, used to seed the path
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` when location access is refused, or
    /// `NoFixAvailable` when the provider has no position yet
    fn current_fix(&mut self) -> Result<Fix, TrackingError>;

    /// Start delivering fixes into `sink`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `SubscriptionFailed` when updates cannot start
    fn subscribe(&mut self, sink: FixSender) -> Result<SubscriptionHandle, TrackingError>;

    /// Stop delivering fixes for `handle`
    fn unsubscribe(&mut self, handle: SubscriptionHandle);
}
