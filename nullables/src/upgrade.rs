use agora_ledger::UpgradeTarget;
use agora_types::Address;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Records upgrades requested by the governance identity.
pub struct NullUpgradeTarget {
    governance: Address,
    upgrades: Mutex<Vec<(Address, Vec<u8>)>>,
    fail_calls: AtomicBool,
}

impl NullUpgradeTarget {
    pub fn new(governance: Address) -> Self {
        Self {
            governance,
            upgrades: Mutex::new(Vec::new()),
            fail_calls: AtomicBool::new(false),
        }
    }

    pub fn fail_calls(&self, fail: bool) {
        self.fail_calls.store(fail, Ordering::SeqCst);
    }

    pub fn upgrades(&self) -> Vec<(Address, Vec<u8>)> {
        self.upgrades.lock().unwrap().clone()
    }
}

impl UpgradeTarget for NullUpgradeTarget {
    fn upgrade_to_and_call(&self, caller: &Address, implementation: &Address, data: &[u8]) -> bool {
        if *caller != self.governance || self.fail_calls.load(Ordering::SeqCst) {
            return false;
        }
        self.upgrades
            .lock()
            .unwrap()
            .push((implementation.clone(), data.to_vec()));
        true
    }
}
