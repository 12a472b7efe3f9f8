use thiserror::Error;

use crate::engine::account::{AccountAggregator, AccountError};
use crate::engine::events::{Event, EventSink, LogSink};
use crate::engine::statistics::{StatisticsAggregator, StatisticsError};
use crate::engine::suspicion::{SuspicionClassifier, SuspicionConfig};
use crate::engine::{Amount, Transaction, TransactionType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("Account update failed for transaction {id}")]
    Account {
        id: String,
        #[source]
        source: AccountError,
    },

    #[error("Statistics update failed for transaction {id}")]
    Statistics {
        id: String,
        #[source]
        source: StatisticsError,
    },
}

/// Everything one processing run produces. Suspicious transactions borrow
/// from the slice that was processed.
#[derive(Debug, Default, Clone)]
pub struct AggregateResult<'a> {
    pub account_summaries: AccountAggregator,
    pub suspicious_transactions: Vec<&'a Transaction>,
    pub transaction_statistics: StatisticsAggregator,
}

impl AggregateResult<'_> {
    pub fn average_amount(&self, typ: TransactionType) -> Result<Amount, StatisticsError> {
        self.transaction_statistics.average_amount(typ)
    }
}

/// Runs validated transactions through the account, suspicion and statistics
/// stages. Each call to [`TransactionProcessor::process`] starts from empty
/// state, so runs never share aggregates.
pub struct TransactionProcessor<S: EventSink = LogSink> {
    classifier: SuspicionClassifier,
    sink: S,
}

impl TransactionProcessor<LogSink> {
    pub fn with_log_sink(config: SuspicionConfig) -> Self {
        Self::new(config, LogSink)
    }
}

impl<S: EventSink> TransactionProcessor<S> {
    pub fn new(config: SuspicionConfig, sink: S) -> Self {
        TransactionProcessor {
            classifier: SuspicionClassifier::new(config),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Applies every transaction, one at a time and in order: account update,
    /// suspicion check, then statistics update.
    pub fn process<'a>(
        &mut self,
        transactions: &'a [Transaction],
    ) -> Result<AggregateResult<'a>, ProcessingError> {
        let mut result = AggregateResult::default();

        for tx in transactions {
            result
                .account_summaries
                .apply(tx, &mut self.sink)
                .map_err(|source| ProcessingError::Account {
                    id: tx.id.clone(),
                    source,
                })?;

            self.classifier
                .check(tx, &mut result.suspicious_transactions, &mut self.sink);

            result
                .transaction_statistics
                .apply(tx, &mut self.sink)
                .map_err(|source| ProcessingError::Statistics {
                    id: tx.id.clone(),
                    source,
                })?;
        }

        self.sink.emit(Event::ProcessingComplete {
            records: transactions.len(),
        });
        Ok(result)
    }
}
