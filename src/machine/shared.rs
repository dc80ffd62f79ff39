use std::sync::Arc;

use tokio::sync::Mutex;

use crate::Amount;
use crate::model::{
    Command, DispenseOutcome, EjectOutcome, InsertOutcome, Outcome, RefillOutcome, Stock,
};

use super::{MachineError, Snapshot, VendingController};

/// Cloneable handle to one controller shared between tasks.
///
/// Each operation holds the lock for its whole read-modify-write, so no two
/// operations on the same machine interleave.
#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<VendingController>>,
}

impl SharedController {
    pub fn new(controller: VendingController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub async fn insert_credit(&self, amount: Amount) -> Result<InsertOutcome, MachineError> {
        self.inner.lock().await.insert_credit(amount)
    }

    pub async fn request_dispense(&self) -> DispenseOutcome {
        self.inner.lock().await.request_dispense()
    }

    pub async fn eject_credit(&self) -> EjectOutcome {
        self.inner.lock().await.eject_credit()
    }

    pub async fn refill(&self, count: Stock) -> Result<RefillOutcome, MachineError> {
        self.inner.lock().await.refill(count)
    }

    pub async fn apply(&self, command: Command) -> Result<Outcome, MachineError> {
        self.inner.lock().await.apply(command)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.lock().await.status()
    }
}

impl From<VendingController> for SharedController {
    fn from(controller: VendingController) -> Self {
        Self::new(controller)
    }
}
