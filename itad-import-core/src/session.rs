//! Wizard session state.
//!
//! One session walks `Input -> Match -> Confirm -> Result`. It owns the parsed
//! records and the curated selection; front ends read snapshots through the
//! accessors and mutate only through the transitions below.
//!
//! Remote calls are issued outside the session. Each one is tied to a
//! [`Ticket`], and every transition bumps the session generation, so a
//! response that arrives after the user moved on (went back, reset, retried)
//! is rejected as stale instead of being applied.

use crate::curator::Selection;
use crate::error::SessionError;
use crate::record::{CommitOutcome, PurchaseRecord, ResolvedMatch};

/// The step the wizard is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStep {
    #[default]
    Input,
    Match,
    Confirm,
    Result,
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardStep::Input => write!(f, "input"),
            WizardStep::Match => write!(f, "match"),
            WizardStep::Confirm => write!(f, "confirm"),
            WizardStep::Result => write!(f, "result"),
        }
    }
}

/// Identifies the request a pending remote result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct ImportSession {
    step: WizardStep,
    generation: u64,
    records: Vec<PurchaseRecord>,
    selection: Selection,
    confirmed: Vec<ResolvedMatch>,
    outcome: Option<CommitOutcome>,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn records(&self) -> &[PurchaseRecord] {
        &self.records
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable access to the selection, available only while matching.
    pub fn selection_mut(&mut self) -> Result<&mut Selection, SessionError> {
        self.expect_step(WizardStep::Match, "edit the selection")?;
        Ok(&mut self.selection)
    }

    pub fn confirmed(&self) -> &[ResolvedMatch] {
        &self.confirmed
    }

    pub fn outcome(&self) -> Option<CommitOutcome> {
        self.outcome
    }

    /// Accept parsed records and move to the match step. The returned ticket
    /// belongs to the resolution request the caller issues next.
    pub fn load(&mut self, records: Vec<PurchaseRecord>) -> Result<Ticket, SessionError> {
        self.expect_step(WizardStep::Input, "load records")?;
        self.records = records;
        self.selection = Selection::default();
        self.step = WizardStep::Match;
        Ok(self.next_ticket())
    }

    /// Issue a fresh ticket for re-running resolution, invalidating any
    /// request still in flight.
    pub fn retry_resolution(&mut self) -> Result<Ticket, SessionError> {
        self.expect_step(WizardStep::Match, "retry resolution")?;
        Ok(self.next_ticket())
    }

    /// Install the resolver's matches if `ticket` is still current.
    pub fn apply_resolution(
        &mut self,
        ticket: Ticket,
        matches: Vec<ResolvedMatch>,
    ) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;
        self.expect_step(WizardStep::Match, "apply resolution")?;
        self.selection = Selection::new(matches);
        Ok(())
    }

    /// Freeze the current selection and move to the confirm step.
    pub fn confirm(&mut self) -> Result<&[ResolvedMatch], SessionError> {
        self.expect_step(WizardStep::Match, "confirm")?;
        self.confirmed = self.selection.confirm()?;
        self.step = WizardStep::Confirm;
        self.bump();
        Ok(&self.confirmed)
    }

    /// Ticket for the commit call. Calling again (a retry) invalidates the
    /// previous one.
    pub fn begin_commit(&mut self) -> Result<Ticket, SessionError> {
        self.expect_step(WizardStep::Confirm, "commit")?;
        Ok(self.next_ticket())
    }

    /// Record the commit outcome and move to the result step.
    pub fn finish(&mut self, ticket: Ticket, outcome: CommitOutcome) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;
        self.expect_step(WizardStep::Confirm, "finish")?;
        self.outcome = Some(outcome);
        self.step = WizardStep::Result;
        self.bump();
        Ok(())
    }

    /// Go back one step. Pending results for the step being left go stale.
    ///
    /// The result step is final: a committed selection is only left through
    /// [`ImportSession::reset`], so it cannot be committed twice.
    pub fn back(&mut self) {
        let previous = match self.step() {
            WizardStep::Input | WizardStep::Match => WizardStep::Input,
            WizardStep::Confirm => WizardStep::Match,
            WizardStep::Result => return,
        };
        if previous == WizardStep::Match {
            self.confirmed.clear();
        }
        self.step = previous;
        self.bump();
    }

    /// Drop everything and start over at the input step.
    pub fn reset(&mut self) {
        let generation = self.generation;
        *self = Self::default();
        self.generation = generation;
        self.bump();
    }

    fn next_ticket(&mut self) -> Ticket {
        self.bump();
        Ticket(self.generation)
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    fn check_ticket(&self, ticket: Ticket) -> Result<(), SessionError> {
        if ticket.0 != self.generation {
            log::debug!(
                "Stale result for request {} (current {})",
                ticket.0,
                self.generation
            );
            return Err(SessionError::Stale {
                ticket: ticket.0,
                current: self.generation,
            });
        }
        Ok(())
    }

    fn expect_step(&self, step: WizardStep, action: &'static str) -> Result<(), SessionError> {
        if self.step() != step {
            return Err(SessionError::WrongStep {
                action,
                step: self.step(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
