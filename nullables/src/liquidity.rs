use agora_ledger::LiquidityManager;
use agora_types::Address;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Records liquidity calls made by the consensus identity.
pub struct NullLiquidityManager {
    consensus: Address,
    router: Address,
    seeded: AtomicBool,
    added: Mutex<Vec<u128>>,
}

impl NullLiquidityManager {
    pub fn new(consensus: Address, router: Address) -> Self {
        Self {
            consensus,
            router,
            seeded: AtomicBool::new(false),
            added: Mutex::new(Vec::new()),
        }
    }

    /// Amounts passed to `add_liquidity`, in call order.
    pub fn added(&self) -> Vec<u128> {
        self.added.lock().unwrap().clone()
    }
}

impl LiquidityManager for NullLiquidityManager {
    fn initial_liquidity(&self, caller: &Address) -> bool {
        *caller == self.consensus && !self.seeded.swap(true, Ordering::SeqCst)
    }

    fn add_liquidity(&self, caller: &Address, amount: u128) -> bool {
        if *caller != self.consensus || !self.seeded.load(Ordering::SeqCst) || amount == 0 {
            return false;
        }
        self.added.lock().unwrap().push(amount);
        true
    }

    fn initial_liquidity_status(&self) -> bool {
        self.seeded.load(Ordering::SeqCst)
    }

    fn router_address(&self) -> Address {
        self.router.clone()
    }
}
