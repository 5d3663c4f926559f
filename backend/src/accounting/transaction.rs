//! Transaction model
//!
//! A transaction is a concrete scheduled event: a set of debit and credit
//! line items applied to a chart of accounts when the engine dispatches
//! it. Application is all-or-nothing - an unbalanced transaction (total
//! debits != total credits) applies nothing and raises no error, so
//! callers check `is_balanced` before relying on a transaction having
//! taken effect.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};

use crate::accounting::account::{Account, AccountKind};
use crate::accounting::chart::ChartOfAccounts;
use crate::events::{Event, EventError, FollowOns, Timestamp};

/// One debit or credit leg of a transaction.
///
/// References its account by chart key (kind + name) rather than by
/// borrow; the chart resolves the key at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionItem {
    kind: AccountKind,
    account: String,
    amount: i64,
}

impl TransactionItem {
    /// Create a line item against the given account.
    ///
    /// # Panics
    /// Panics if `amount` is not positive.
    pub fn new(account: &Account, amount: i64) -> Self {
        assert!(amount > 0, "amount must be positive");
        Self {
            kind: account.kind(),
            account: account.name().to_string(),
            amount,
        }
    }

    /// Kind of the referenced account.
    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Name of the referenced account.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Line amount (i64 cents, always positive).
    pub fn amount(&self) -> i64 {
        self.amount
    }
}

/// A double-entry journal transaction, schedulable on the engine.
///
/// # Example
/// ```
/// use ledger_sim_core::{AccountKind, ChartOfAccounts, Event, Transaction};
///
/// let mut chart = ChartOfAccounts::new();
/// let cash = chart.create_asset_account("Cash", 100_000).clone();
/// let sales = chart.create_income_account("Sales", 0).clone();
///
/// let mut tx = Transaction::new(2, "Morning sale");
/// tx.add_debit(&cash, 25_000);
/// tx.add_credit(&sales, 25_000);
/// assert!(tx.is_balanced());
///
/// tx.dispatch(&mut chart).unwrap();
/// let cash = chart.by_name_and_kind("Cash", AccountKind::Asset).unwrap();
/// assert_eq!(cash.balance(), 125_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier (UUID).
    id: String,

    /// Logical time at which the transaction posts.
    timestamp: Timestamp,

    /// Display name.
    name: String,

    /// Debit legs.
    debits: Vec<TransactionItem>,

    /// Credit legs.
    credits: Vec<TransactionItem>,
}

impl Transaction {
    /// Create an empty transaction at the given logical time.
    pub fn new(timestamp: Timestamp, name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            name: name.into(),
            debits: Vec::new(),
            credits: Vec::new(),
        }
    }

    /// Unique transaction ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Debit legs, in insertion order.
    pub fn debits(&self) -> &[TransactionItem] {
        &self.debits
    }

    /// Credit legs, in insertion order.
    pub fn credits(&self) -> &[TransactionItem] {
        &self.credits
    }

    /// Add a debit leg against an account.
    pub fn add_debit(&mut self, account: &Account, amount: i64) {
        self.debits.push(TransactionItem::new(account, amount));
    }

    /// Add a credit leg against an account.
    pub fn add_credit(&mut self, account: &Account, amount: i64) {
        self.credits.push(TransactionItem::new(account, amount));
    }

    /// Add a prebuilt debit line item.
    pub fn add_debit_item(&mut self, item: TransactionItem) {
        self.debits.push(item);
    }

    /// Add a prebuilt credit line item.
    pub fn add_credit_item(&mut self, item: TransactionItem) {
        self.credits.push(item);
    }

    /// Sum of all debit legs (i64 cents).
    pub fn total_debits(&self) -> i64 {
        self.debits.iter().map(TransactionItem::amount).sum()
    }

    /// Sum of all credit legs (i64 cents).
    pub fn total_credits(&self) -> i64 {
        self.credits.iter().map(TransactionItem::amount).sum()
    }

    /// Number of legs across both sides.
    pub fn entry_count(&self) -> usize {
        self.debits.len() + self.credits.len()
    }

    /// Whether total debits equal total credits.
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Drop every leg, leaving an empty transaction.
    pub fn clear(&mut self) {
        self.debits.clear();
        self.credits.clear();
    }
}

impl Event<ChartOfAccounts> for Transaction {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Apply the line items to the chart, all-or-nothing.
    ///
    /// An unbalanced transaction is a deliberate no-op: no error, no
    /// partial application. A balanced transaction referencing an account
    /// the chart does not hold aborts the run before any balance changes.
    /// Yields no follow-on events.
    fn dispatch(
        &mut self,
        chart: &mut ChartOfAccounts,
    ) -> Result<FollowOns<ChartOfAccounts>, EventError> {
        if !self.is_balanced() {
            return Ok(Vec::new());
        }

        // Resolve every leg before touching any balance.
        for item in self.debits.iter().chain(self.credits.iter()) {
            if chart.by_name_and_kind(item.account(), item.kind()).is_none() {
                return Err(EventError::Abort(format!(
                    "unknown {} account '{}' in transaction '{}'",
                    item.kind(),
                    item.account(),
                    self.name
                )));
            }
        }

        for item in &self.debits {
            if let Some(account) = chart.account_mut(item.kind(), item.account()) {
                account.debit(item.amount());
            }
        }
        for item in &self.credits {
            if let Some(account) = chart.account_mut(item.kind(), item.account()) {
                account.credit(item.amount());
            }
        }

        Ok(Vec::new())
    }
}
