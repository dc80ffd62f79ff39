//! Pure transition table of the machine.
//!
//! Every function here maps a [`Snapshot`] and an input to the next snapshot
//! and an outcome; apart from a debug log line they touch nothing else. The
//! controller owns the current snapshot and swaps it for the returned one, so
//! an operation either applies completely or (on error) not at all.

use tracing::debug;

use crate::Amount;
use crate::model::{
    Command, DispenseOutcome, EjectOutcome, InsertOutcome, MachineState, Outcome, RefillOutcome,
    Stock,
};

use super::error::{InsertError, MachineError, RefillError};
use super::state::Snapshot;

/// Apply `command` to `current` for a machine selling at `unit_price`.
pub fn transition(
    current: Snapshot,
    unit_price: Amount,
    command: Command,
) -> Result<(Snapshot, Outcome), MachineError> {
    let next = match command {
        Command::InsertCredit { amount } => {
            let (next, outcome) = insert_credit(current, amount)?;
            (next, Outcome::Insert(outcome))
        }
        Command::RequestDispense => {
            let (next, outcome) = request_dispense(current, unit_price);
            (next, Outcome::Dispense(outcome))
        }
        Command::EjectCredit => {
            let (next, outcome) = eject_credit(current);
            (next, Outcome::Eject(outcome))
        }
        Command::Refill { count } => {
            let (next, outcome) = refill(current, count)?;
            (next, Outcome::Refill(outcome))
        }
    };
    Ok(next)
}

pub fn insert_credit(
    current: Snapshot,
    amount: Amount,
) -> Result<(Snapshot, InsertOutcome), InsertError> {
    if amount.is_zero() {
        return Err(InsertError::ZeroAmount);
    }

    match current.state {
        // Idle with no stock is unreachable through the operations, but a
        // credit accepted there could never buy anything.
        MachineState::Idle if current.stock == 0 => Ok((current, InsertOutcome::Rejected)),
        MachineState::Idle | MachineState::HasCredit => {
            let credit = current
                .credit
                .checked_add(amount)
                .ok_or(InsertError::CreditOverflow {
                    credit: current.credit,
                    amount,
                })?;
            let next = Snapshot {
                state: MachineState::HasCredit,
                credit,
                ..current
            };
            Ok((next, InsertOutcome::Accepted))
        }
        MachineState::Dispensing | MachineState::OutOfStock => {
            Ok((current, InsertOutcome::Rejected))
        }
    }
}

pub fn request_dispense(current: Snapshot, unit_price: Amount) -> (Snapshot, DispenseOutcome) {
    match current.state {
        MachineState::HasCredit if current.credit < unit_price => {
            let shortfall = unit_price.saturating_sub(current.credit);
            (current, DispenseOutcome::InsufficientCredit { shortfall })
        }
        MachineState::HasCredit if current.stock > 0 => {
            let dispensing = begin_dispense(current);
            let (next, change) = complete_dispense(dispensing, unit_price);
            (next, DispenseOutcome::Dispensed { change })
        }
        MachineState::Idle
        | MachineState::HasCredit
        | MachineState::Dispensing
        | MachineState::OutOfStock => (current, DispenseOutcome::Rejected),
    }
}

/// Mark the machine busy. Every other input is refused until
/// [`complete_dispense`] runs.
pub(crate) fn begin_dispense(current: Snapshot) -> Snapshot {
    Snapshot {
        state: MachineState::Dispensing,
        ..current
    }
}

/// Hand out one unit, clear the credit and return the change.
pub(crate) fn complete_dispense(dispensing: Snapshot, unit_price: Amount) -> (Snapshot, Amount) {
    debug_assert_eq!(dispensing.state, MachineState::Dispensing);
    debug!(stock = dispensing.stock, credit = %dispensing.credit, "dispensing");

    let stock = dispensing.stock.saturating_sub(1);
    let change = dispensing.credit.saturating_sub(unit_price);
    let state = if stock == 0 {
        MachineState::OutOfStock
    } else {
        MachineState::Idle
    };
    let next = Snapshot {
        state,
        stock,
        credit: Amount::ZERO,
    };
    (next, change)
}

pub fn eject_credit(current: Snapshot) -> (Snapshot, EjectOutcome) {
    match current.state {
        MachineState::HasCredit => {
            let next = Snapshot {
                state: MachineState::Idle,
                credit: Amount::ZERO,
                ..current
            };
            let amount = current.credit;
            (next, EjectOutcome::Returned { amount })
        }
        MachineState::OutOfStock if !current.credit.is_zero() => {
            let next = Snapshot {
                credit: Amount::ZERO,
                ..current
            };
            let amount = current.credit;
            (next, EjectOutcome::Returned { amount })
        }
        MachineState::Idle | MachineState::Dispensing | MachineState::OutOfStock => {
            (current, EjectOutcome::NothingToReturn)
        }
    }
}

pub fn refill(current: Snapshot, count: Stock) -> Result<(Snapshot, RefillOutcome), RefillError> {
    if count == 0 {
        return Err(RefillError::ZeroCount);
    }

    match current.state {
        MachineState::Idle | MachineState::OutOfStock => {
            let stock = current
                .stock
                .checked_add(count)
                .ok_or(RefillError::StockOverflow {
                    stock: current.stock,
                    count,
                })?;
            let next = Snapshot {
                state: MachineState::Idle,
                stock,
                ..current
            };
            Ok((next, RefillOutcome::Refilled))
        }
        MachineState::HasCredit | MachineState::Dispensing => Ok((current, RefillOutcome::Rejected)),
    }
}
