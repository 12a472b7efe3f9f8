pub mod account;
pub mod amount;
pub mod events;
pub mod processor;
pub mod record;
pub mod statistics;
pub mod suspicion;
mod table;
mod transaction;

pub use account::{AccountAggregator, AccountSummary};
pub use amount::Amount;
pub use events::{Event, EventSink, LogSink, RecordingSink};
pub use processor::{AggregateResult, ProcessingError, TransactionProcessor};
pub use record::{RawRecord, validate_records};
pub use statistics::{StatisticsAggregator, TypeStatistics};
pub use suspicion::{SuspicionClassifier, SuspicionConfig};
pub use table::OrderedTable;
pub use transaction::{Transaction, TransactionType};
