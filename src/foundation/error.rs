use std::collections::BTreeSet;

/// Convenience result type used across dualscape.
pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, unreadable or undecodable assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// A pixel buffer could not be allocated.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Failures inside a render pass (mismatched buffers, degenerate geometry).
    #[error("render error: {0}")]
    Render(String),

    /// Control transport failures (socket bind, queue disconnect).
    #[error("control error: {0}")]
    Control(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Build an [`EngineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`EngineError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build an [`EngineError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build an [`EngineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`EngineError::Control`] value.
    pub fn control(msg: impl Into<String>) -> Self {
        Self::Control(msg.into())
    }
}

/// Remembers which subsystems already reported a failure.
///
/// Per-frame faults repeat every frame while the underlying condition persists; they are logged
/// the first time and counted afterwards.
#[derive(Debug, Default)]
pub struct FaultLog {
    reported: BTreeSet<&'static str>,
    suppressed: u64,
}

impl FaultLog {
    /// Log `err` for `subsystem` unless that subsystem already reported. Returns `true` when logged.
    pub fn report(&mut self, subsystem: &'static str, err: &EngineError) -> bool {
        if self.reported.insert(subsystem) {
            tracing::error!(subsystem, error = %err, "subsystem degraded; continuing");
            true
        } else {
            self.suppressed = self.suppressed.saturating_add(1);
            false
        }
    }

    /// Forget a subsystem so its next failure is logged again (it recovered).
    pub fn clear(&mut self, subsystem: &'static str) {
        self.reported.remove(subsystem);
    }

    /// Whether `subsystem` is currently flagged as degraded.
    pub fn is_degraded(&self, subsystem: &'static str) -> bool {
        self.reported.contains(subsystem)
    }

    /// Number of repeated failures that were not logged.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
