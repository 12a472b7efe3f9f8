use std::fmt;
use std::str::FromStr;

use crate::engine::Amount;
use crate::engine::record::RecordError;

/// A validated transaction record. Every field has been checked at the
/// validation boundary; aggregators only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub account_number: String,
    /// Kept verbatim, never interpreted.
    pub date: String,
    pub typ: TransactionType,
    pub amount: Amount,
    /// The amount as written in the input, reproduced in reports.
    pub amount_text: String,
    pub currency: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl FromStr for TransactionType {
    type Err = RecordError;

    // Exact match only: "Deposit" is not a deposit
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(RecordError::InvalidType(other.into())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
