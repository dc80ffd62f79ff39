pub mod amount;
pub mod config;
pub mod csv;
pub mod machine;
pub mod model;

pub use amount::Amount;
pub use machine::{MachineError, Receipt, SharedController, Snapshot, VendingController};
pub use model::{Command, MachineState, Outcome, Stock};
