//! Account model
//!
//! A double-entry account: name, kind, and a balance. Whether a debit
//! grows or shrinks the balance depends on the kind's normal balance
//! side - one shared update rule covers all five kinds.
//!
//! CRITICAL: All money values are i64 (cents)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The five double-entry account kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountKind {
    /// Every kind, in statement order.
    pub const ALL: [AccountKind; 5] = [
        AccountKind::Asset,
        AccountKind::Liability,
        AccountKind::Equity,
        AccountKind::Income,
        AccountKind::Expense,
    ];

    /// The side on which this kind's balance grows.
    ///
    /// Assets and expenses are debit-normal; liabilities, equity, and
    /// income are credit-normal.
    pub fn normal_balance(self) -> NormalBalance {
        match self {
            AccountKind::Asset | AccountKind::Expense => NormalBalance::Debit,
            AccountKind::Liability | AccountKind::Equity | AccountKind::Income => {
                NormalBalance::Credit
            }
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountKind::Asset => "Asset",
            AccountKind::Liability => "Liability",
            AccountKind::Equity => "Equity",
            AccountKind::Income => "Income",
            AccountKind::Expense => "Expense",
        };
        f.write_str(name)
    }
}

/// Error parsing an [`AccountKind`] from a string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown account kind: {0}")]
pub struct ParseAccountKindError(String);

impl FromStr for AccountKind {
    type Err = ParseAccountKindError;

    /// Case-insensitive: "asset", "Asset", and "ASSET" all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asset" => Ok(AccountKind::Asset),
            "liability" => Ok(AccountKind::Liability),
            "equity" => Ok(AccountKind::Equity),
            "income" => Ok(AccountKind::Income),
            "expense" => Ok(AccountKind::Expense),
            _ => Err(ParseAccountKindError(s.to_string())),
        }
    }
}

/// Which operation grows an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    Debit,
    Credit,
}

/// A ledger account.
///
/// # Example
/// ```
/// use ledger_sim_core::{Account, AccountKind};
///
/// let mut cash = Account::new(AccountKind::Asset, "Cash", 100_000);
///
/// cash.credit(20_000); // pay a bill: an asset shrinks on credit
/// assert_eq!(cash.balance(), 80_000);
///
/// cash.debit(25_000); // take in a sale: an asset grows on debit
/// assert_eq!(cash.balance(), 105_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name, unique within its kind in a chart.
    name: String,

    /// The account kind, fixing debit/credit semantics.
    kind: AccountKind,

    /// Current balance (i64 cents). May go negative.
    balance: i64,
}

impl Account {
    /// Create a new account with an opening balance in cents.
    pub fn new(kind: AccountKind, name: impl Into<String>, opening_balance: i64) -> Self {
        Self {
            name: name.into(),
            kind,
            balance: opening_balance,
        }
    }

    /// Account name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Account kind.
    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Current balance (i64 cents).
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Overwrite the balance.
    pub fn set_balance(&mut self, amount: i64) {
        self.balance = amount;
    }

    /// Debit the account: grows a debit-normal balance, shrinks a
    /// credit-normal one.
    pub fn debit(&mut self, amount: i64) {
        self.apply(NormalBalance::Debit, amount);
    }

    /// Credit the account: grows a credit-normal balance, shrinks a
    /// debit-normal one.
    pub fn credit(&mut self, amount: i64) {
        self.apply(NormalBalance::Credit, amount);
    }

    // The single balance-update rule: an operation on the account's
    // normal side adds, on the opposite side subtracts.
    fn apply(&mut self, side: NormalBalance, amount: i64) {
        if self.kind.normal_balance() == side {
            self.balance += amount;
        } else {
            self.balance -= amount;
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.balance < 0 { "-" } else { "" };
        let cents = self.balance.unsigned_abs();
        write!(
            f,
            "{} ({}): {}${}.{:02}",
            self.name,
            self.kind,
            sign,
            cents / 100,
            cents % 100
        )
    }
}
