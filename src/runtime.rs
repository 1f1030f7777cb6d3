// ABOUTME: Async driver feeding fixes and timer ticks into a run session one event at a time
// ABOUTME: Stops the session when the fix stream closes or shutdown is signalled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use runline_core::models::FinishedRun;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::session::RunSession;
use crate::tracking::FixReceiver;

/// Drive `session` until the fix stream closes or `shutdown` fires
///
/// Fixes, timer ticks and shutdown are applied strictly one at a time, so
/// the synchronous pipeline never sees concurrent events. The timer period is
/// the session's `stats.refresh_interval_secs`. A dropped shutdown sender
/// counts as a shutdown request. Returns the finished run, or `None` when the
/// session was not tracking.
pub async fn drive_session(
    session: &mut RunSession,
    mut fixes: FixReceiver,
    mut shutdown: oneshot::Receiver<()>,
) -> Option<FinishedRun> {
    let tick_interval = session.config().stats.refresh_interval();
    debug!(?tick_interval, "Session driver started");
    let mut ticker = tokio::time::interval(tick_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Session driver received shutdown signal");
                break;
            }
            fix = fixes.recv() => {
                let Some(fix) = fix else {
                    info!("Fix stream closed");
                    break;
                };
                let outcome = session.on_fix_received(fix);
                debug!(?outcome, "Fix applied");
            }
            _ = ticker.tick() => {
                session.on_timer_tick();
            }
        }
    }

    session.stop()
}
