//! Vending machine controller.
//!
//! The controller owns the machine's mode, stock and credit, and exposes the
//! four operations of the machine: insert credit, request dispense, eject
//! credit and refill. Also supports an async stream of commands.

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::Amount;
use crate::model::{
    Command, DispenseOutcome, EjectOutcome, InsertOutcome, MachineState, Outcome, RefillOutcome,
    Stock,
};

mod error;
pub use error::{ConfigError, InsertError, MachineError, RefillError};

mod shared;
pub use shared::SharedController;

mod state;
pub use state::Snapshot;

pub mod transition;

/// What happened to one command of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub command: Command,
    pub result: Result<Outcome, MachineError>,
    /// Machine status right after the command.
    pub snapshot: Snapshot,
}

/// A single vending machine.
///
/// Operations refused by the current state come back as outcome values;
/// only caller contract violations (zero amounts, overflowing counters) are
/// errors, and those leave the machine untouched.
#[derive(Debug, Clone)]
pub struct VendingController {
    current: Snapshot,
    unit_price: Amount,
}

/// Public API
impl VendingController {
    /// Build a machine holding `stock` units sold at `unit_price` each.
    pub fn new(stock: Stock, unit_price: Amount) -> Result<Self, ConfigError> {
        if unit_price.is_zero() {
            return Err(ConfigError::ZeroPrice);
        }
        Ok(Self {
            current: Snapshot::with_stock(stock),
            unit_price,
        })
    }

    pub fn state(&self) -> MachineState {
        self.current.state()
    }

    pub fn stock(&self) -> Stock {
        self.current.stock()
    }

    pub fn credit(&self) -> Amount {
        self.current.credit()
    }

    pub fn unit_price(&self) -> Amount {
        self.unit_price
    }

    /// Current status of the machine.
    pub fn status(&self) -> Snapshot {
        self.current
    }

    pub fn insert_credit(&mut self, amount: Amount) -> Result<InsertOutcome, MachineError> {
        let command = Command::InsertCredit { amount };
        match transition::insert_credit(self.current, amount) {
            Ok((next, outcome)) => {
                self.commit(command, next, Outcome::Insert(outcome));
                Ok(outcome)
            }
            Err(e) => Err(self.skip(command, e.into())),
        }
    }

    pub fn request_dispense(&mut self) -> DispenseOutcome {
        let (next, outcome) = transition::request_dispense(self.current, self.unit_price);
        self.commit(Command::RequestDispense, next, Outcome::Dispense(outcome));
        outcome
    }

    pub fn eject_credit(&mut self) -> EjectOutcome {
        let (next, outcome) = transition::eject_credit(self.current);
        self.commit(Command::EjectCredit, next, Outcome::Eject(outcome));
        outcome
    }

    pub fn refill(&mut self, count: Stock) -> Result<RefillOutcome, MachineError> {
        let command = Command::Refill { count };
        match transition::refill(self.current, count) {
            Ok((next, outcome)) => {
                self.commit(command, next, Outcome::Refill(outcome));
                Ok(outcome)
            }
            Err(e) => Err(self.skip(command, e.into())),
        }
    }

    /// Apply a single command on top of the current machine state
    pub fn apply(&mut self, command: Command) -> Result<Outcome, MachineError> {
        match transition::transition(self.current, self.unit_price, command) {
            Ok((next, outcome)) => {
                self.commit(command, next, outcome);
                Ok(outcome)
            }
            Err(e) => Err(self.skip(command, e)),
        }
    }

    /// Run the machine with the given command stream.
    ///
    /// Invalid commands do not stop the machine; every command gets a receipt.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) -> Vec<Receipt> {
        let mut receipts = Vec::new();
        while let Some(command) = stream.next().await {
            let result = self.apply(command);
            receipts.push(Receipt {
                command,
                result,
                snapshot: self.current,
            });
        }
        receipts
    }
}

/// Private API
impl VendingController {
    /// Store the next snapshot and log the applied command.
    fn commit(&mut self, command: Command, next: Snapshot, outcome: Outcome) {
        self.current = next;
        info!(
            op = command.name(),
            outcome = %outcome,
            state = %next.state(),
            stock = next.stock(),
            credit = %next.credit(),
            "{} applied",
            command.name()
        );
    }

    /// Log a command refused for a bad argument; the state is left as is.
    fn skip(&self, command: Command, error: MachineError) -> MachineError {
        info!(
            op = command.name(),
            state = %self.current.state(),
            reason = %error,
            "{} skipped",
            command.name()
        );
        error
    }
}
