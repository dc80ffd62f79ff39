use std::fmt;

use crate::Amount;
use crate::model::{MachineState, Stock};

/// Mutable part of the machine: its mode and its two counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub(crate) state: MachineState,
    pub(crate) stock: Stock,
    pub(crate) credit: Amount,
}

impl Snapshot {
    /// Fresh machine holding `stock` units and no credit.
    pub fn with_stock(stock: Stock) -> Self {
        let state = if stock > 0 {
            MachineState::Idle
        } else {
            MachineState::OutOfStock
        };
        Self {
            state,
            stock,
            credit: Amount::ZERO,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn stock(&self) -> Stock {
        self.stock
    }

    pub fn credit(&self) -> Amount {
        self.credit
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={} stock={} credit={}",
            self.state, self.stock, self.credit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_stock_starts_idle() {
        let snapshot = Snapshot::with_stock(3);
        assert_eq!(snapshot.state(), MachineState::Idle);
        assert_eq!(snapshot.stock(), 3);
        assert_eq!(snapshot.credit(), Amount::ZERO);
    }

    #[test]
    fn with_no_stock_starts_out_of_stock() {
        let snapshot = Snapshot::with_stock(0);
        assert_eq!(snapshot.state(), MachineState::OutOfStock);
        assert_eq!(snapshot.stock(), 0);
    }

    #[test]
    fn display_lists_counters() {
        let snapshot = Snapshot::with_stock(2);
        assert_eq!(snapshot.to_string(), "state=idle stock=2 credit=0");
    }
}
