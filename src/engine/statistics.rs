use thiserror::Error;

use crate::engine::amount::AmountError;
use crate::engine::events::{Event, EventSink};
use crate::engine::table::OrderedTable;
use crate::engine::{Amount, Transaction, TransactionType};

/// Cumulative amount and count of one transaction type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeStatistics {
    pub total_amount: Amount,
    pub transaction_count: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("No statistics recorded for transaction type '{0}'")]
    UnknownType(TransactionType),

    #[error("Statistics for '{typ}': {source}")]
    Amount {
        typ: TransactionType,
        #[source]
        source: AmountError,
    },
}

impl TypeStatistics {
    pub fn record(&mut self, amount: Amount) -> Result<(), AmountError> {
        self.total_amount = self.total_amount.add(&amount)?;
        self.transaction_count += 1;
        Ok(())
    }

    /// Mean amount, or zero when nothing was recorded.
    pub fn average(&self) -> Result<Amount, AmountError> {
        if self.transaction_count == 0 {
            return Ok(Amount::ZERO);
        }
        self.total_amount.divide(self.transaction_count)
    }
}

/// Statistics per transaction type, in the order types were first seen.
#[derive(Debug, Default, Clone)]
pub struct StatisticsAggregator {
    buckets: OrderedTable<TransactionType, TypeStatistics>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, tx: &Transaction, sink: &mut dyn EventSink) -> Result<(), StatisticsError> {
        let statistics = self.buckets.upsert_with(&tx.typ, TypeStatistics::default);
        statistics
            .record(tx.amount)
            .map_err(|source| StatisticsError::Amount { typ: tx.typ, source })?;

        sink.emit(Event::StatisticsUpdated {
            typ: tx.typ,
            statistics,
        });
        Ok(())
    }

    pub fn get(&self, typ: TransactionType) -> Option<&TypeStatistics> {
        self.buckets.get(&typ)
    }

    /// Average amount of `typ`. A type that was never seen is an error,
    /// unlike an empty bucket which averages to zero.
    pub fn average_amount(&self, typ: TransactionType) -> Result<Amount, StatisticsError> {
        let statistics = self.get(typ).ok_or(StatisticsError::UnknownType(typ))?;
        statistics
            .average()
            .map_err(|source| StatisticsError::Amount { typ, source })
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransactionType, &TypeStatistics)> {
        self.buckets.iter().map(|(typ, statistics)| (*typ, statistics))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
