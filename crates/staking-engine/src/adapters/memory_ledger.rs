//! In-memory token ledger adapter.
//!
//! Implements the `TokenLedger` port against a plain balance map, for tests
//! and in-process embedding. The engine's custody account is an ordinary
//! account in the map; burns reduce custody and are tallied separately.

use crate::ports::TokenLedger;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, Amount};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct InMemoryTokenLedger {
    custody: Address,
    accounts: RwLock<HashMap<Address, Amount>>,
    burned: RwLock<Amount>,
    /// When set, the next transfer/transfer_from/burn fails (abort-path
    /// testing).
    fail_next: AtomicBool,
}

impl InMemoryTokenLedger {
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            accounts: RwLock::new(HashMap::new()),
            burned: RwLock::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Mint value into an account.
    pub fn credit(&self, account: Address, amount: Amount) {
        *self.accounts.write().entry(account).or_insert(0) += amount;
    }

    pub fn balance(&self, account: &Address) -> Amount {
        self.accounts.read().get(account).copied().unwrap_or(0)
    }

    pub fn custody_balance(&self) -> Amount {
        self.balance(&self.custody)
    }

    /// Total value destroyed via `burn`.
    pub fn burned(&self) -> Amount {
        *self.burned.read()
    }

    /// Make the next value-moving call fail.
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> Result<(), String> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err("injected ledger failure".to_string());
        }
        Ok(())
    }

    fn move_value(&self, from: Address, to: Address, amount: Amount) -> Result<(), String> {
        let mut accounts = self.accounts.write();
        let from_balance = accounts.get(&from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(format!(
                "insufficient balance: have {from_balance}, need {amount}"
            ));
        }
        accounts.insert(from, from_balance - amount);
        *accounts.entry(to).or_insert(0) += amount;
        Ok(())
    }
}

#[async_trait]
impl TokenLedger for InMemoryTokenLedger {
    async fn balance_of(&self, account: Address) -> Result<Amount, String> {
        Ok(self.balance(&account))
    }

    async fn transfer_from(
        &self,
        payer: Address,
        payee: Address,
        amount: Amount,
    ) -> Result<(), String> {
        self.take_injected_failure()?;
        self.move_value(payer, payee, amount)
    }

    async fn transfer(&self, payee: Address, amount: Amount) -> Result<(), String> {
        self.take_injected_failure()?;
        self.move_value(self.custody, payee, amount)
    }

    async fn burn(&self, amount: Amount) -> Result<(), String> {
        self.take_injected_failure()?;
        let mut accounts = self.accounts.write();
        let custody_balance = accounts.get(&self.custody).copied().unwrap_or(0);
        if custody_balance < amount {
            return Err(format!(
                "burn exceeds custody: have {custody_balance}, need {amount}"
            ));
        }
        accounts.insert(self.custody, custody_balance - amount);
        *self.burned.write() += amount;
        Ok(())
    }
}
