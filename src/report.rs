use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{AccountAggregator, AccountSummary, AggregateResult, StatisticsAggregator};
use crate::engine::{Transaction, TransactionType, TypeStatistics};

pub const ACCOUNT_SUMMARIES_FILE: &str = "account_summaries.csv";
pub const SUSPICIOUS_TRANSACTIONS_FILE: &str = "suspicious_transactions.csv";
pub const TRANSACTION_STATISTICS_FILE: &str = "transaction_statistics.csv";

pub const ACCOUNT_HEADERS: [&str; 4] = [
    "Account number",
    "Balance",
    "Total Deposits",
    "Total Withdrawals",
];
pub const SUSPICIOUS_HEADERS: [&str; 7] = [
    "Transaction ID",
    "Account number",
    "Date",
    "Transaction type",
    "Amount",
    "Currency",
    "Description",
];
pub const STATISTICS_HEADERS: [&str; 3] = ["Transaction type", "Total amount", "Transaction count"];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot write report {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// One row of the accounts report.
/// Amounts are kept as rendered text so rows compare exactly as written.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    #[serde(rename = "Account number")]
    pub account_number: String,
    #[serde(rename = "Balance")]
    pub balance: String,
    #[serde(rename = "Total Deposits")]
    pub total_deposits: String,
    #[serde(rename = "Total Withdrawals")]
    pub total_withdrawals: String,
}

impl From<&AccountSummary> for AccountRow {
    fn from(summary: &AccountSummary) -> Self {
        AccountRow {
            account_number: summary.account_number.clone(),
            balance: summary.balance.to_string(),
            total_deposits: summary.total_deposits.to_string(),
            total_withdrawals: summary.total_withdrawals.to_string(),
        }
    }
}

/// One row of the suspicious transactions report, in the input record shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SuspiciousRow {
    #[serde(rename = "Transaction ID")]
    pub id: String,
    #[serde(rename = "Account number")]
    pub account_number: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Transaction type")]
    pub typ: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl From<&Transaction> for SuspiciousRow {
    fn from(tx: &Transaction) -> Self {
        SuspiciousRow {
            id: tx.id.clone(),
            account_number: tx.account_number.clone(),
            date: tx.date.clone(),
            typ: tx.typ.to_string(),
            amount: tx.amount_text.clone(),
            currency: tx.currency.clone(),
            description: tx.description.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatisticsRow {
    #[serde(rename = "Transaction type")]
    pub typ: String,
    #[serde(rename = "Total amount")]
    pub total_amount: String,
    #[serde(rename = "Transaction count")]
    pub transaction_count: u64,
}

impl From<(TransactionType, &TypeStatistics)> for StatisticsRow {
    fn from((typ, statistics): (TransactionType, &TypeStatistics)) -> Self {
        StatisticsRow {
            typ: typ.to_string(),
            total_amount: statistics.total_amount.to_string(),
            transaction_count: statistics.transaction_count,
        }
    }
}

// The header is written up front so that empty reports still carry it
fn write_rows<W, T>(writer: W, headers: &[&str], rows: impl Iterator<Item = T>) -> Result<(), ReportError>
where
    W: Write,
    T: Serialize,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_account_summaries<W: Write>(
    writer: W,
    accounts: &AccountAggregator,
) -> Result<(), ReportError> {
    write_rows(writer, &ACCOUNT_HEADERS, accounts.iter().map(AccountRow::from))
}

pub fn write_suspicious_transactions<W: Write>(
    writer: W,
    transactions: &[&Transaction],
) -> Result<(), ReportError> {
    write_rows(
        writer,
        &SUSPICIOUS_HEADERS,
        transactions.iter().map(|tx| SuspiciousRow::from(*tx)),
    )
}

pub fn write_transaction_statistics<W: Write>(
    writer: W,
    statistics: &StatisticsAggregator,
) -> Result<(), ReportError> {
    write_rows(writer, &STATISTICS_HEADERS, statistics.iter().map(StatisticsRow::from))
}

/// Writes the three reports into `dir`, which must already exist.
pub fn write_reports(result: &AggregateResult<'_>, dir: &Path) -> Result<(), ReportError> {
    let path = dir.join(ACCOUNT_SUMMARIES_FILE);
    log::debug!("Writing account summaries to {path:?}");
    write_account_summaries(create(&path)?, &result.account_summaries)?;

    let path = dir.join(SUSPICIOUS_TRANSACTIONS_FILE);
    log::debug!("Writing suspicious transactions to {path:?}");
    write_suspicious_transactions(create(&path)?, &result.suspicious_transactions)?;

    let path = dir.join(TRANSACTION_STATISTICS_FILE);
    log::debug!("Writing transaction statistics to {path:?}");
    write_transaction_statistics(create(&path)?, &result.transaction_statistics)?;

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, ReportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::File {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::{
        ACCOUNT_SUMMARIES_FILE, AccountRow, STATISTICS_HEADERS, SUSPICIOUS_TRANSACTIONS_FILE,
        TRANSACTION_STATISTICS_FILE, write_account_summaries, write_reports,
        write_suspicious_transactions, write_transaction_statistics,
    };
    use crate::engine::{
        AccountAggregator, RecordingSink, StatisticsAggregator, SuspicionConfig, Transaction,
        TransactionProcessor,
    };
    use std::fs;

    fn tx(id: &str, account: &str, typ: &str, amount: &str, currency: &str, description: &str) -> Transaction {
        Transaction {
            id: id.into(),
            account_number: account.into(),
            date: "2023-03-01".into(),
            typ: typ.parse().unwrap(),
            amount: amount.parse().unwrap(),
            amount_text: amount.into(),
            currency: currency.into(),
            description: description.into(),
        }
    }

    fn render(write: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", "1002", "deposit", "1500", "CAD", "Salary"),
            tx("2", "1001", "withdrawal", "200.5", "CAD", "Groceries"),
            tx("3", "1002", "deposit", "12000", "LTC", "Sale, part 1"),
        ]
    }

    #[test]
    fn test_that_accounts_report_follows_first_seen_order() {
        let transactions = sample();
        let mut processor = TransactionProcessor::new(SuspicionConfig::default(), RecordingSink::new());
        let result = processor.process(&transactions).unwrap();

        let output = render(|buf| write_account_summaries(buf, &result.account_summaries).unwrap());

        assert_eq!(
            output,
            "Account number,Balance,Total Deposits,Total Withdrawals\n\
             1002,13500,13500,0\n\
             1001,-200.5,0,200.5\n"
        );
    }

    #[test]
    fn test_that_suspicious_report_quotes_free_text() {
        let transactions = sample();
        let mut processor = TransactionProcessor::new(SuspicionConfig::default(), RecordingSink::new());
        let result = processor.process(&transactions).unwrap();

        let output = render(|buf| {
            write_suspicious_transactions(buf, &result.suspicious_transactions).unwrap()
        });

        assert_eq!(
            output,
            "Transaction ID,Account number,Date,Transaction type,Amount,Currency,Description\n\
             3,1002,2023-03-01,deposit,12000,LTC,\"Sale, part 1\"\n"
        );
    }

    #[test]
    fn test_that_suspicious_report_keeps_amount_as_written() {
        let transactions = vec![
            tx("1", "1001", "deposit", "1.5E4", "CAD", "Bonus"),
            tx("2", "1001", "deposit", "1500.00", "XRP", "Swap"),
            tx("3", "1001", "deposit", "10000.00001", "CAD", "Just over"),
        ];
        let mut processor = TransactionProcessor::new(SuspicionConfig::default(), RecordingSink::new());
        let result = processor.process(&transactions).unwrap();

        let output = render(|buf| {
            write_suspicious_transactions(buf, &result.suspicious_transactions).unwrap()
        });

        assert_eq!(
            output,
            "Transaction ID,Account number,Date,Transaction type,Amount,Currency,Description\n\
             1,1001,2023-03-01,deposit,1.5E4,CAD,Bonus\n\
             2,1001,2023-03-01,deposit,1500.00,XRP,Swap\n\
             3,1001,2023-03-01,deposit,10000.00001,CAD,Just over\n"
        );
    }

    #[test]
    fn test_that_statistics_report_lists_every_type_seen() {
        let transactions = sample();
        let mut processor = TransactionProcessor::new(SuspicionConfig::default(), RecordingSink::new());
        let result = processor.process(&transactions).unwrap();

        let output = render(|buf| {
            write_transaction_statistics(buf, &result.transaction_statistics).unwrap()
        });

        assert_eq!(
            output,
            "Transaction type,Total amount,Transaction count\n\
             deposit,13500,2\n\
             withdrawal,200.5,1\n"
        );
    }

    #[test]
    fn test_that_empty_reports_still_have_headers() {
        let output = render(|buf| {
            write_transaction_statistics(buf, &StatisticsAggregator::new()).unwrap()
        });
        assert_eq!(output, format!("{}\n", STATISTICS_HEADERS.join(",")));

        let output = render(|buf| write_account_summaries(buf, &AccountAggregator::new()).unwrap());
        assert_eq!(output, "Account number,Balance,Total Deposits,Total Withdrawals\n");

        let output = render(|buf| write_suspicious_transactions(buf, &[]).unwrap());
        assert!(output.starts_with("Transaction ID,"));
    }

    #[test]
    fn test_that_reports_are_written_to_directory() {
        let transactions = sample();
        let mut processor = TransactionProcessor::new(SuspicionConfig::default(), RecordingSink::new());
        let result = processor.process(&transactions).unwrap();
        let dir = tempfile::tempdir().unwrap();

        write_reports(&result, dir.path()).unwrap();

        for file in [
            ACCOUNT_SUMMARIES_FILE,
            SUSPICIOUS_TRANSACTIONS_FILE,
            TRANSACTION_STATISTICS_FILE,
        ] {
            assert!(dir.path().join(file).is_file(), "{file} missing");
        }

        let mut rdr = csv::Reader::from_path(dir.path().join(ACCOUNT_SUMMARIES_FILE)).unwrap();
        let rows: Vec<AccountRow> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].account_number, "1002");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_that_missing_directory_is_reported() {
        let transactions = sample();
        let mut processor = TransactionProcessor::new(SuspicionConfig::default(), RecordingSink::new());
        let result = processor.process(&transactions).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = write_reports(&result, &dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains(ACCOUNT_SUMMARIES_FILE));
    }
}
