//! Core domain types for the vending machine.

use std::fmt;

use serde::Serialize;

use crate::Amount;

/// Number of units held by the machine.
pub type Stock = u32;

/// A command representing the possible inputs of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add credit to the in-progress transaction.
    InsertCredit { amount: Amount },
    /// Buy one unit with the accumulated credit.
    RequestDispense,
    /// Return the accumulated credit without buying.
    EjectCredit,
    /// Restock the machine.
    Refill { count: Stock },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::InsertCredit { .. } => "insert",
            Command::RequestDispense => "dispense",
            Command::EjectCredit => "eject",
            Command::Refill { .. } => "refill",
        }
    }
}

/// Mode of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    #[default]
    Idle,
    /// Credit has been inserted and no dispense has completed for it yet.
    HasCredit,
    /// Entered and left within a single dispense; never observable between calls.
    Dispensing,
    OutOfStock,
}

impl MachineState {
    pub fn name(&self) -> &'static str {
        match self {
            MachineState::Idle => "idle",
            MachineState::HasCredit => "has_credit",
            MachineState::Dispensing => "dispensing",
            MachineState::OutOfStock => "out_of_stock",
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of [`Command::InsertCredit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Accepted,
    Rejected,
}

/// Result of [`Command::RequestDispense`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispenseOutcome {
    /// One unit was handed out; the overpayment is returned as change.
    Dispensed { change: Amount },
    /// Credit is below the unit price by `shortfall`. Nothing changed.
    InsufficientCredit { shortfall: Amount },
    Rejected,
}

/// Result of [`Command::EjectCredit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EjectOutcome {
    Returned { amount: Amount },
    NothingToReturn,
}

/// Result of [`Command::Refill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillOutcome {
    Refilled,
    Rejected,
}

/// Outcome of any command, tagged by the operation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Insert(InsertOutcome),
    Dispense(DispenseOutcome),
    Eject(EjectOutcome),
    Refill(RefillOutcome),
}

impl Outcome {
    /// Short machine-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Insert(InsertOutcome::Accepted) => "accepted",
            Outcome::Insert(InsertOutcome::Rejected) => "rejected",
            Outcome::Dispense(DispenseOutcome::Dispensed { .. }) => "dispensed",
            Outcome::Dispense(DispenseOutcome::InsufficientCredit { .. }) => "insufficient_credit",
            Outcome::Dispense(DispenseOutcome::Rejected) => "rejected",
            Outcome::Eject(EjectOutcome::Returned { .. }) => "returned",
            Outcome::Eject(EjectOutcome::NothingToReturn) => "nothing_to_return",
            Outcome::Refill(RefillOutcome::Refilled) => "refilled",
            Outcome::Refill(RefillOutcome::Rejected) => "rejected",
        }
    }

    /// Amount carried by the outcome: change, shortfall or returned credit.
    pub fn detail(&self) -> Option<Amount> {
        match self {
            Outcome::Dispense(DispenseOutcome::Dispensed { change }) => Some(*change),
            Outcome::Dispense(DispenseOutcome::InsufficientCredit { shortfall }) => Some(*shortfall),
            Outcome::Eject(EjectOutcome::Returned { amount }) => Some(*amount),
            _ => None,
        }
    }

    /// Whether the command was refused because of the current state.
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Outcome::Insert(InsertOutcome::Rejected)
                | Outcome::Dispense(DispenseOutcome::Rejected)
                | Outcome::Eject(EjectOutcome::NothingToReturn)
                | Outcome::Refill(RefillOutcome::Rejected)
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(amount) => write!(f, "{}({amount})", self.label()),
            None => f.write_str(self.label()),
        }
    }
}
