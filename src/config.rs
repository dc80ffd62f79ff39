//! Command line configuration of the `vend-eng` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::machine::{ConfigError, VendingController};
use crate::model::Stock;
use crate::Amount;

/// Replay a csv file of vending machine commands and print one receipt per command.
#[derive(Parser, Debug)]
#[command(name = "vend-eng", version)]
pub struct Cli {
    /// CSV file with an `op,value` header
    pub commands: PathBuf,

    /// Units loaded in the machine at start
    #[arg(long, env = "VEND_STOCK", default_value_t = 3)]
    pub stock: Stock,

    /// Price of one unit
    #[arg(long, env = "VEND_PRICE", default_value_t = 50)]
    pub price: u64,
}

impl Cli {
    /// Build the machine described by the arguments.
    pub fn controller(&self) -> Result<VendingController, ConfigError> {
        VendingController::new(self.stock, Amount::new(self.price))
    }
}
