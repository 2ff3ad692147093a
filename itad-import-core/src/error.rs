/// Errors raised while turning user input into an importable selection.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("No order JSON provided")]
    EmptyInput,

    #[error("No games found in the JSON. Make sure it contains order data with items.")]
    EmptyResult,

    #[error("Select at least one matched game to import")]
    NoSelection,
}

/// Errors raised by the wizard session when a transition doesn't apply.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A response arrived for a request the session has since moved past.
    #[error("Discarding stale result (request {ticket}, current {current})")]
    Stale { ticket: u64, current: u64 },

    #[error("Cannot {action} while on the {step} step")]
    WrongStep {
        action: &'static str,
        step: crate::WizardStep,
    },

    #[error(transparent)]
    Import(#[from] ImportError),
}
