use thiserror::Error;

use crate::engine::amount::AmountError;
use crate::engine::events::{Event, EventSink};
use crate::engine::table::OrderedTable;
use crate::engine::{Amount, Transaction, TransactionType};

/// Running totals of one account.
/// For deposits and withdrawals `balance == total_deposits - total_withdrawals`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account_number: String,
    pub balance: Amount,
    pub total_deposits: Amount,
    pub total_withdrawals: Amount,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account {account}: {source}")]
    Amount {
        account: String,
        #[source]
        source: AmountError,
    },
}

impl AccountSummary {
    pub fn new(account_number: impl Into<String>) -> Self {
        AccountSummary {
            account_number: account_number.into(),
            balance: Amount::ZERO,
            total_deposits: Amount::ZERO,
            total_withdrawals: Amount::ZERO,
        }
    }

    /// Both totals are computed before either is stored, so a failure leaves
    /// the summary untouched.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), AmountError> {
        let balance = self.balance.add(&amount)?;
        let total_deposits = self.total_deposits.add(&amount)?;
        self.balance = balance;
        self.total_deposits = total_deposits;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Amount) -> Result<(), AmountError> {
        let balance = self.balance.sub(&amount)?;
        let total_withdrawals = self.total_withdrawals.add(&amount)?;
        self.balance = balance;
        self.total_withdrawals = total_withdrawals;
        Ok(())
    }
}

/// Per-account summaries, in the order accounts were first seen.
#[derive(Debug, Default, Clone)]
pub struct AccountAggregator {
    summaries: OrderedTable<String, AccountSummary>,
}

impl AccountAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one transaction to its account. Not idempotent: applying the
    /// same transaction twice counts it twice.
    pub fn apply(&mut self, tx: &Transaction, sink: &mut dyn EventSink) -> Result<(), AccountError> {
        let summary = self
            .summaries
            .upsert_with(tx.account_number.as_str(), || {
                AccountSummary::new(tx.account_number.as_str())
            });

        let outcome = match tx.typ {
            TransactionType::Deposit => summary.deposit(tx.amount),
            TransactionType::Withdrawal => summary.withdraw(tx.amount),
            // Transfers leave balance and totals unchanged
            TransactionType::Transfer => Ok(()),
        };
        outcome.map_err(|source| AccountError::Amount {
            account: tx.account_number.clone(),
            source,
        })?;

        sink.emit(Event::AccountUpdated(summary));
        Ok(())
    }

    pub fn get(&self, account_number: &str) -> Option<&AccountSummary> {
        self.summaries.get(account_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountSummary> {
        self.summaries.values()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
