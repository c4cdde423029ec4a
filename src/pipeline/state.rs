//! Per-event state machine.
//!
//! Every inbound event walks the same path; the orchestrator logs each
//! transition at debug level:
//!
//! ```text
//! Received ──▶ Detected ──▶ Prompted ──▶ Completed(success)
//!                                          ──▶ Parsed(ok | fallback)
//!                                                ──▶ PostProcessed ──▶ Assembled ──▶ Replied
//!                                    ──▶ Completed(failure) ──▶ Assembled (failure message)
//!                                          ──▶ Parsed(failed)   ──▶ Assembled (failure message)
//! Received ──non-text event / blank text──▶ Skipped
//! ```
//!
//! Nothing about an event outlives its task, so there is no shared state
//! here, only the labels.

use crate::lang::Direction;

// ---------------------------------------------------------------------------
// Sub-states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// Structured answer parsed (strictly or after repair).
    Ok,
    /// Only the plain-line fallback produced a result.
    Fallback,
    Failed,
}

// ---------------------------------------------------------------------------
// EventState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventState {
    #[default]
    Received,
    Detected(Direction),
    Prompted,
    Completed(CompletionStatus),
    Parsed(ParseStatus),
    PostProcessed,
    /// Reply segments are ready; still the final state when delivery fails.
    Assembled,
    Replied,
    /// Non-text event or blank text: no reply is sent.
    Skipped,
}

impl EventState {
    /// Short label used in log lines.
    ///
    /// ```
    /// use korthai::pipeline::{CompletionStatus, EventState, ParseStatus};
    ///
    /// assert_eq!(EventState::Completed(CompletionStatus::Failure).label(), "completed:failure");
    /// assert_eq!(EventState::Parsed(ParseStatus::Fallback).label(), "parsed:fallback");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            EventState::Received => "received",
            EventState::Detected(Direction::KrToTh) => "detected:KR2TH",
            EventState::Detected(Direction::ThToKr) => "detected:TH2KR",
            EventState::Prompted => "prompted",
            EventState::Completed(CompletionStatus::Success) => "completed:success",
            EventState::Completed(CompletionStatus::Failure) => "completed:failure",
            EventState::Parsed(ParseStatus::Ok) => "parsed:ok",
            EventState::Parsed(ParseStatus::Fallback) => "parsed:fallback",
            EventState::Parsed(ParseStatus::Failed) => "parsed:failed",
            EventState::PostProcessed => "post_processed",
            EventState::Assembled => "assembled",
            EventState::Replied => "replied",
            EventState::Skipped => "skipped",
        }
    }

    /// `true` once no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventState::Replied | EventState::Skipped)
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
