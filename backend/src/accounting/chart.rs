//! Chart of accounts
//!
//! Accounts indexed by kind, then by name. A chart is constructed empty
//! and owns every account under management; transactions reference
//! accounts by (kind, name) key, and the chart resolves those keys at
//! dispatch time.

use std::collections::HashMap;

use crate::accounting::account::{Account, AccountKind};

/// A chart of accounts that manages and looks up accounts.
///
/// # Example
/// ```
/// use ledger_sim_core::{AccountKind, ChartOfAccounts};
///
/// let mut chart = ChartOfAccounts::new();
/// chart.create_asset_account("Cash", 50_000);
/// chart.create_income_account("Sales", 0);
///
/// assert_eq!(chart.len(), 2);
/// let cash = chart.by_name_and_kind("Cash", AccountKind::Asset).unwrap();
/// assert_eq!(cash.balance(), 50_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: HashMap<AccountKind, HashMap<String, Account>>,
}

impl ChartOfAccounts {
    /// Create an empty chart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of accounts under management.
    pub fn len(&self) -> usize {
        self.accounts.values().map(HashMap::len).sum()
    }

    /// Check if the chart holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.values().all(HashMap::is_empty)
    }

    /// Add an instantiated account, replacing any account of the same
    /// kind and name.
    pub fn add_account(&mut self, account: Account) {
        self.accounts
            .entry(account.kind())
            .or_default()
            .insert(account.name().to_string(), account);
    }

    /// Remove an account, returning it if it was present.
    pub fn remove_account(&mut self, kind: AccountKind, name: &str) -> Option<Account> {
        self.accounts.get_mut(&kind)?.remove(name)
    }

    /// Create an account from its constructor parameters, add it, and
    /// return a reference to the stored account.
    pub fn create_and_add_account(
        &mut self,
        kind: AccountKind,
        name: impl Into<String>,
        opening_balance: i64,
    ) -> &Account {
        let name = name.into();
        let account = Account::new(kind, name.clone(), opening_balance);
        let bucket = self.accounts.entry(kind).or_default();
        bucket.insert(name.clone(), account);
        &bucket[name.as_str()]
    }

    /// Create and add an asset account.
    pub fn create_asset_account(&mut self, name: impl Into<String>, opening_balance: i64) -> &Account {
        self.create_and_add_account(AccountKind::Asset, name, opening_balance)
    }

    /// Create and add a liability account.
    pub fn create_liability_account(
        &mut self,
        name: impl Into<String>,
        opening_balance: i64,
    ) -> &Account {
        self.create_and_add_account(AccountKind::Liability, name, opening_balance)
    }

    /// Create and add an equity account.
    pub fn create_equity_account(
        &mut self,
        name: impl Into<String>,
        opening_balance: i64,
    ) -> &Account {
        self.create_and_add_account(AccountKind::Equity, name, opening_balance)
    }

    /// Create and add an income account.
    pub fn create_income_account(
        &mut self,
        name: impl Into<String>,
        opening_balance: i64,
    ) -> &Account {
        self.create_and_add_account(AccountKind::Income, name, opening_balance)
    }

    /// Create and add an expense account.
    pub fn create_expense_account(
        &mut self,
        name: impl Into<String>,
        opening_balance: i64,
    ) -> &Account {
        self.create_and_add_account(AccountKind::Expense, name, opening_balance)
    }

    /// Check whether an equivalent account (same kind and name) is under
    /// management.
    pub fn has_account(&self, account: &Account) -> bool {
        self.by_name_and_kind(account.name(), account.kind())
            .is_some()
    }

    /// All accounts of a given kind, in no particular order.
    pub fn by_kind(&self, kind: AccountKind) -> Vec<&Account> {
        self.accounts
            .get(&kind)
            .map(|bucket| bucket.values().collect())
            .unwrap_or_default()
    }

    /// Look up an account by name and kind.
    pub fn by_name_and_kind(&self, name: &str, kind: AccountKind) -> Option<&Account> {
        self.accounts.get(&kind)?.get(name)
    }

    /// Mutable lookup by kind and name, for applying balance changes.
    pub fn account_mut(&mut self, kind: AccountKind, name: &str) -> Option<&mut Account> {
        self.accounts.get_mut(&kind)?.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_account_management() {
        let mut chart = ChartOfAccounts::new();
        assert!(chart.is_empty());

        let asset = Account::new(AccountKind::Asset, "Test Asset", 0);
        assert!(!chart.has_account(&asset));

        chart.add_account(asset.clone());
        assert_eq!(chart.len(), 1);
        assert!(chart.has_account(&asset));

        let removed = chart.remove_account(AccountKind::Asset, "Test Asset");
        assert_eq!(removed, Some(asset));
        assert!(chart.is_empty());
    }

    #[test]
    fn test_remove_miss_leaves_chart_alone() {
        let mut chart = ChartOfAccounts::new();
        chart.create_asset_account("Cash", 100);

        assert!(chart.remove_account(AccountKind::Asset, "Not Here").is_none());
        assert!(chart
            .remove_account(AccountKind::Expense, "Cash")
            .is_none());
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn test_create_helpers_cover_every_kind() {
        let mut chart = ChartOfAccounts::new();

        chart.create_asset_account("New Asset", 2_500);
        chart.create_liability_account("New Liability", 2_500);
        chart.create_equity_account("New Equity", 3_500);
        chart.create_income_account("New Income", 2_500);
        chart.create_expense_account("New Expense", 2_500);

        assert_eq!(chart.len(), 5);
        for kind in AccountKind::ALL {
            assert_eq!(chart.by_kind(kind).len(), 1, "missing {kind} account");
        }
    }

    #[test]
    fn test_create_and_add_account_indexes_by_kind_and_name() {
        let mut chart = ChartOfAccounts::new();

        let account = chart.create_and_add_account(AccountKind::Expense, "Rent", 5_500);
        assert_eq!(account.balance(), 5_500);

        assert!(chart
            .by_name_and_kind("Rent", AccountKind::Expense)
            .is_some());
        // Same name under a different kind is a different slot.
        assert!(chart.by_name_and_kind("Rent", AccountKind::Asset).is_none());
    }

    #[test]
    fn test_by_name_and_kind_misses() {
        let mut chart = ChartOfAccounts::new();
        chart.create_asset_account("Cash", 0);

        assert!(chart.by_name_and_kind("Not In Here", AccountKind::Asset).is_none());
        assert!(chart.by_name_and_kind("Cash", AccountKind::Income).is_none());
    }

    #[test]
    fn test_account_mut_applies_changes_in_place() {
        let mut chart = ChartOfAccounts::new();
        chart.create_asset_account("Cash", 1_000);

        chart
            .account_mut(AccountKind::Asset, "Cash")
            .expect("account exists")
            .debit(500);

        let cash = chart.by_name_and_kind("Cash", AccountKind::Asset).unwrap();
        assert_eq!(cash.balance(), 1_500);
    }
}
