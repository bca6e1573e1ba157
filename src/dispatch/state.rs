//! Per-invocation state machine.
//!
//! ```text
//! Idle ──▶ Building ──▶ InFlight ──▶ Succeeded
//!              │            │
//!              └────────────┴──────▶ Failed
//! ```
//!
//! `Succeeded` and `Failed` are terminal: there is no edge back to
//! `InFlight`.  A retry is a new invocation.

/// Phase of one `invoke` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationState {
    /// Created, nothing done yet.
    #[default]
    Idle,
    /// Validating inputs and assembling the request.
    Building,
    /// Request sent; waiting for the service.
    InFlight,
    /// A normalized result is available.
    Succeeded,
    /// The invocation ended with an error.
    Failed,
}

impl InvocationState {
    /// Returns `true` while work is pending.
    ///
    /// ```
    /// use kurdish_ai_tools::dispatch::InvocationState;
    ///
    /// assert!(!InvocationState::Idle.is_busy());
    /// assert!(InvocationState::Building.is_busy());
    /// assert!(InvocationState::InFlight.is_busy());
    /// assert!(!InvocationState::Succeeded.is_busy());
    /// assert!(!InvocationState::Failed.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, InvocationState::Building | InvocationState::InFlight)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InvocationState::Succeeded | InvocationState::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (*self, next),
            (Idle, Building)
                | (Building, InFlight)
                | (Building, Failed)
                | (InFlight, Succeeded)
                | (InFlight, Failed)
        )
    }

    /// A short label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            InvocationState::Idle => "Idle",
            InvocationState::Building => "Building",
            InvocationState::InFlight => "Waiting",
            InvocationState::Succeeded => "Done",
            InvocationState::Failed => "Failed",
        }
    }
}
