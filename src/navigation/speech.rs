// ABOUTME: Speech output seam for spoken turn announcements
// ABOUTME: Provides a no-op sink and a sink that writes announcements to the tracing log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::info;

/// Text-to-speech output
pub trait SpeechSink: Send {
    /// Speak `text`
    fn speak(&mut self, text: &str);

    /// Drop any queued or in-flight announcement
    fn cancel_all(&mut self);
}

/// Sink that discards every announcement
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeechSink;

impl SpeechSink for NullSpeechSink {
    fn speak(&mut self, _text: &str) {}

    fn cancel_all(&mut self) {}
}

/// Sink that logs announcements instead of speaking them
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSpeechSink;

impl SpeechSink for LoggingSpeechSink {
    fn speak(&mut self, text: &str) {
        info!(target: "runline::speech", text, "speak");
    }

    fn cancel_all(&mut self) {
        info!(target: "runline::speech", "cancel all");
    }
}
