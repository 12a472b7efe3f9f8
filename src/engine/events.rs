use std::fmt;

use log::Level;

use crate::engine::{AccountSummary, Transaction, TransactionType, TypeStatistics};

/// Diagnostic event raised while aggregating. Events are observations only:
/// dropping them changes nothing in the aggregate result.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    AccountUpdated(&'a AccountSummary),
    SuspiciousTransaction(&'a Transaction),
    StatisticsUpdated {
        typ: TransactionType,
        statistics: &'a TypeStatistics,
    },
    ProcessingComplete {
        records: usize,
    },
}

impl Event<'_> {
    pub fn level(&self) -> Level {
        match self {
            Event::SuspiciousTransaction(_) => Level::Warn,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::AccountUpdated(summary) => write!(
                f,
                "Account summary updated: account={} balance={} deposits={} withdrawals={}",
                summary.account_number,
                summary.balance,
                summary.total_deposits,
                summary.total_withdrawals
            ),
            Event::SuspiciousTransaction(tx) => write!(
                f,
                "Suspicious transaction: id={} account={} type={} amount={} currency={}",
                tx.id, tx.account_number, tx.typ, tx.amount, tx.currency
            ),
            Event::StatisticsUpdated { typ, statistics } => write!(
                f,
                "Updated transaction statistics for: {typ} (total={} count={})",
                statistics.total_amount, statistics.transaction_count
            ),
            Event::ProcessingComplete { records } => {
                write!(f, "Data processing complete: {records} records")
            }
        }
    }
}

/// Receiver of diagnostic events, supplied to the processor at construction.
pub trait EventSink {
    fn emit(&mut self, event: Event<'_>);
}

/// Forwards every event to the `log` facade at the event's level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: Event<'_>) {
        log::log!(event.level(), "{event}");
    }
}

/// Keeps the level and rendered message of every event. Mostly useful in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<(Level, String)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, level: Level) -> usize {
        self.events.iter().filter(|(l, _)| *l == level).count()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|(_, message)| message.as_str())
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: Event<'_>) {
        self.events.push((event.level(), event.to_string()));
    }
}
