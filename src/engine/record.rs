use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::engine::amount::AmountError;
use crate::engine::{Amount, Transaction, TransactionType};

/// A record as read from an input file: field name to loosely typed value.
/// CSV cells arrive as strings, JSON values keep their native kind.
pub type RawRecord = HashMap<String, Value>;

/// Field names of the input files.
pub mod fields {
    pub const TRANSACTION_ID: &str = "Transaction ID";
    pub const ACCOUNT_NUMBER: &str = "Account number";
    pub const DATE: &str = "Date";
    pub const TRANSACTION_TYPE: &str = "Transaction type";
    pub const AMOUNT: &str = "Amount";
    pub const CURRENCY: &str = "Currency";
    pub const DESCRIPTION: &str = "Description";
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' is neither text nor a number")]
    InvalidField(&'static str),

    #[error("Invalid amount '{value}': {source}")]
    InvalidAmount {
        value: String,
        #[source]
        source: AmountError,
    },

    #[error("Unknown transaction type '{0}'")]
    InvalidType(String),
}

impl TryFrom<&RawRecord> for Transaction {
    type Error = RecordError;

    fn try_from(raw: &RawRecord) -> Result<Self, Self::Error> {
        let (amount, amount_text) = amount_field(raw)?;
        Ok(Transaction {
            id: text_field(raw, fields::TRANSACTION_ID)?,
            account_number: text_field(raw, fields::ACCOUNT_NUMBER)?,
            date: text_field(raw, fields::DATE)?,
            typ: type_field(raw)?,
            amount,
            amount_text,
            currency: text_field(raw, fields::CURRENCY)?,
            description: text_field(raw, fields::DESCRIPTION)?,
        })
    }
}

/// Keeps the records that are well-formed, in input order.
///
/// A record is kept when it converts into a [`Transaction`] and its amount is
/// not negative. Everything else is dropped without surfacing an error.
pub fn validate_records(records: &[RawRecord]) -> Vec<Transaction> {
    records
        .iter()
        .enumerate()
        .filter_map(|(position, raw)| match Transaction::try_from(raw) {
            Ok(tx) if tx.amount.is_negative() => {
                log::debug!("Dropping record #{position}: negative amount {}", tx.amount);
                None
            }
            Ok(tx) => Some(tx),
            Err(e) => {
                log::debug!("Dropping record #{position}: {e}");
                None
            }
        })
        .collect()
}

fn field<'r>(raw: &'r RawRecord, name: &'static str) -> Result<&'r Value, RecordError> {
    raw.get(name).ok_or(RecordError::MissingField(name))
}

fn text_field(raw: &RawRecord, name: &'static str) -> Result<String, RecordError> {
    match field(raw, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(RecordError::InvalidField(name)),
    }
}

fn type_field(raw: &RawRecord) -> Result<TransactionType, RecordError> {
    match field(raw, fields::TRANSACTION_TYPE)? {
        Value::String(s) => s.parse(),
        other => Err(RecordError::InvalidType(other.to_string())),
    }
}

fn amount_field(raw: &RawRecord) -> Result<(Amount, String), RecordError> {
    // JSON numbers keep their source text, so `10000.00001` and `1e19` are
    // parsed from the digits as written rather than through an f64
    let text = match field(raw, fields::AMOUNT)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    match text.parse() {
        Ok(amount) => Ok((amount, text)),
        Err(source) => Err(RecordError::InvalidAmount { value: text, source }),
    }
}
