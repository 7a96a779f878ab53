use crate::snapshot_utils::report::HolderRow;
use num_bigint::BigUint;
use std::collections::HashMap;

/// Running per-owner totals collected while paging through coin objects.
#[derive(Debug, Default, Clone)]
pub struct BalanceAccumulator {
    balance_by_owner: HashMap<String, BigUint>,
    skipped_objects: u64,
}

impl BalanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_balance(&mut self, owner: &str, amount: &BigUint) {
        match self.balance_by_owner.get_mut(owner) {
            Some(balance) => *balance += amount,
            None => {
                self.balance_by_owner
                    .insert(owner.to_string(), amount.clone());
            }
        }
    }

    pub fn mark_skipped(&mut self) {
        self.skipped_objects += 1;
    }

    pub fn get_balance(&self, owner: &str) -> BigUint {
        self.balance_by_owner
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }

    pub fn total(&self) -> BigUint {
        self.balance_by_owner.values().sum()
    }

    pub fn skipped_objects(&self) -> u64 {
        self.skipped_objects
    }

    pub fn len(&self) -> usize {
        self.balance_by_owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_balances(self) -> HashMap<String, BigUint> {
        self.balance_by_owner
    }

    pub fn to_rows(self) -> Vec<HolderRow> {
        self.balance_by_owner
            .into_iter()
            .map(|(address, raw_balance)| HolderRow {
                address,
                raw_balance,
            })
            .collect()
    }
}
