use std::collections::HashSet;

use crate::engine::events::{Event, EventSink};
use crate::engine::{Amount, Transaction};

/// In whole currency units.
pub const DEFAULT_LARGE_TRANSACTION_THRESHOLD: i64 = 10_000;
pub const DEFAULT_UNCOMMON_CURRENCIES: [&str; 2] = ["XRP", "LTC"];

/// Rule thresholds for flagging transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspicionConfig {
    /// Amounts strictly above this are suspicious.
    pub large_transaction_threshold: Amount,
    /// Currency codes that are always suspicious, matched case-sensitively.
    pub uncommon_currencies: HashSet<String>,
}

impl Default for SuspicionConfig {
    fn default() -> Self {
        SuspicionConfig {
            large_transaction_threshold: Amount::from_whole(DEFAULT_LARGE_TRANSACTION_THRESHOLD),
            uncommon_currencies: DEFAULT_UNCOMMON_CURRENCIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuspicionClassifier {
    config: SuspicionConfig,
}

impl SuspicionClassifier {
    pub fn new(config: SuspicionConfig) -> Self {
        SuspicionClassifier { config }
    }

    pub fn config(&self) -> &SuspicionConfig {
        &self.config
    }

    pub fn is_suspicious(&self, tx: &Transaction) -> bool {
        tx.amount > self.config.large_transaction_threshold
            || self.config.uncommon_currencies.contains(&tx.currency)
    }

    /// Appends `tx` to `flagged` when it is suspicious and reports whether it did.
    /// Nothing is deduplicated: checking the same transaction twice flags it twice.
    pub fn check<'a>(
        &self,
        tx: &'a Transaction,
        flagged: &mut Vec<&'a Transaction>,
        sink: &mut dyn EventSink,
    ) -> bool {
        if !self.is_suspicious(tx) {
            return false;
        }
        flagged.push(tx);
        sink.emit(Event::SuspiciousTransaction(tx));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{SuspicionClassifier, SuspicionConfig};
    use crate::engine::events::RecordingSink;
    use crate::engine::{Amount, Transaction, TransactionType};
    use log::Level;

    fn tx(id: &str, amount: &str, currency: &str) -> Transaction {
        Transaction {
            id: id.into(),
            account_number: "1001".into(),
            date: "2023-03-01".into(),
            typ: TransactionType::Deposit,
            amount: amount.parse().unwrap(),
            amount_text: amount.into(),
            currency: currency.into(),
            description: "test".into(),
        }
    }

    #[test]
    fn test_that_large_amount_is_flagged() {
        let classifier = SuspicionClassifier::default();
        let mut sink = RecordingSink::new();
        let mut flagged = Vec::new();
        let large = tx("1", "15000", "CAD");

        assert!(classifier.check(&large, &mut flagged, &mut sink));
        assert_eq!(flagged, [&large]);
        assert_eq!(sink.count(Level::Warn), 1);
    }

    #[test]
    fn test_that_uncommon_currency_is_flagged() {
        let classifier = SuspicionClassifier::default();
        let mut sink = RecordingSink::new();
        let mut flagged = Vec::new();
        let xrp = tx("2", "1500", "XRP");
        let ltc = tx("3", "1", "LTC");

        classifier.check(&xrp, &mut flagged, &mut sink);
        classifier.check(&ltc, &mut flagged, &mut sink);

        assert_eq!(flagged, [&xrp, &ltc]);
    }

    #[test]
    fn test_that_ordinary_transaction_is_not_flagged() {
        let classifier = SuspicionClassifier::default();
        let mut sink = RecordingSink::new();
        let mut flagged = Vec::new();
        let ordinary = tx("4", "1000", "CAD");

        assert!(!classifier.check(&ordinary, &mut flagged, &mut sink));
        assert!(flagged.is_empty());
        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_that_rules_use_strict_threshold_and_exact_currency() {
        let classifier = SuspicionClassifier::default();
        let cases = [
            ("10000", "CAD", false),
            ("10000.0001", "CAD", true),
            ("0", "xrp", false),
            ("0", "Ltc", false),
            ("0", "LTC", true),
            ("20000", "XRP", true),
        ];
        for (amount, currency, expected) in cases {
            assert_eq!(
                classifier.is_suspicious(&tx("1", amount, currency)),
                expected,
                "{amount} {currency}"
            );
        }
    }

    #[test]
    fn test_that_threshold_boundary_is_exact() {
        let classifier = SuspicionClassifier::default();
        let cases = [
            ("9999.99999", false),
            ("10000", false),
            ("10000.00000", false),
            ("1e4", false),
            ("10000.00001", true),
            ("10000.0000000001", true),
            ("10000.0000000000000000000001", true),
            ("1.00000001e4", true),
            ("1e19", true),
        ];
        for (amount, expected) in cases {
            assert_eq!(
                classifier.is_suspicious(&tx("1", amount, "CAD")),
                expected,
                "{amount}"
            );
        }
    }

    #[test]
    fn test_that_boundary_holds_for_any_threshold() {
        // one ten-thousandth of a unit below, at and above each threshold
        for units in [0_i64, 1, 7, 500, 9_999, 10_000, 123_456_789] {
            let threshold = Amount::from_whole(units);
            let classifier = SuspicionClassifier::new(SuspicionConfig {
                large_transaction_threshold: threshold,
                ..SuspicionConfig::default()
            });
            let step: Amount = "0.0001".parse().unwrap();
            let below = threshold.sub(&step).unwrap().to_string();
            let above = threshold.add(&step).unwrap().to_string();

            assert!(!classifier.is_suspicious(&tx("1", &below, "CAD")), "{below}");
            assert!(!classifier.is_suspicious(&tx("1", &threshold.to_string(), "CAD")));
            assert!(classifier.is_suspicious(&tx("1", &above, "CAD")), "{above}");
        }
    }

    #[test]
    fn test_that_verdict_only_depends_on_amount_and_currency() {
        let classifier = SuspicionClassifier::default();
        for amount in ["0", "9999.99999", "10000", "10000.00001", "12000"] {
            for currency in ["CAD", "XRP", "LTC", "ltc"] {
                let base = tx("1", amount, currency);
                let mut other = base.clone();
                other.id = "99".into();
                other.account_number = "7777".into();
                other.date = "1999-12-31".into();
                other.typ = TransactionType::Transfer;
                other.description = "unrelated".into();

                let verdict = classifier.is_suspicious(&base);
                assert_eq!(verdict, classifier.is_suspicious(&other), "{amount} {currency}");
                assert_eq!(verdict, classifier.is_suspicious(&base), "{amount} {currency}");
            }
        }
    }

    #[test]
    fn test_that_repeated_checks_are_not_deduplicated() {
        let classifier = SuspicionClassifier::default();
        let mut sink = RecordingSink::new();
        let mut flagged = Vec::new();
        let large = tx("1", "15000", "CAD");

        classifier.check(&large, &mut flagged, &mut sink);
        classifier.check(&large, &mut flagged, &mut sink);

        assert_eq!(flagged.len(), 2);
    }

    #[test]
    fn test_that_configuration_overrides_rules() {
        let classifier = SuspicionClassifier::new(SuspicionConfig {
            large_transaction_threshold: Amount::from_whole(500),
            uncommon_currencies: ["DOGE".to_string()].into_iter().collect(),
        });

        assert!(classifier.is_suspicious(&tx("1", "501", "CAD")));
        assert!(classifier.is_suspicious(&tx("2", "1", "DOGE")));
        assert!(!classifier.is_suspicious(&tx("3", "1", "XRP")));
    }
}
