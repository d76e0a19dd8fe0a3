//! Turns untrusted transaction fields from the API, forms and imported files
//! into a [NewTransaction].

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    transaction::{Amount, NewTransaction, Transaction, TransactionType},
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The fields of a transaction as sent by a client.
///
/// Every field is optional so that missing fields can be reported with a
/// helpful message instead of a deserialization error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionPayload {
    /// A date in `YYYY-MM-DD` format.
    pub date: Option<String>,
    /// One of `income`, `expense` or `investment`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Who paid or was paid.
    pub source: Option<String>,
    /// A JSON number or a string holding a number.
    pub amount: Option<Value>,
    /// Optional free text.
    pub description: Option<String>,
}

impl TransactionPayload {
    /// Check the payload and convert it into a transaction ready to be saved.
    ///
    /// # Errors
    /// Checks are done in this order, returning the first failure:
    /// - [Error::MissingFields] if `date`, `type`, `source` or `amount` is missing or blank,
    /// - [Error::InvalidTransactionType] if `type` is not income, expense or investment,
    /// - [Error::InvalidAmount] if `amount` is not a number,
    /// - [Error::NegativeAmount] if `amount` is below zero,
    /// - [Error::InvalidDate] if `date` is not a `YYYY-MM-DD` date.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let (Some(date), Some(transaction_type), Some(source), Some(amount)) = (
            non_blank(self.date),
            non_blank(self.transaction_type),
            non_blank(self.source),
            self.amount.filter(|amount| !is_blank_value(amount)),
        ) else {
            return Err(Error::MissingFields);
        };

        let transaction_type = TransactionType::from_str(&transaction_type)?;
        let amount = parse_amount(&amount)?;
        let date = parse_date(&date)?;

        Ok(Transaction::build(date, transaction_type, &source, amount)
            .description(self.description.as_deref()))
    }
}

/// Parse a date in the form `YYYY-MM-DD`.
///
/// Anything after the first ten characters is ignored so that timestamps
/// like `2023-11-01T00:00:00` or `2023-11-01 00:00:00` are accepted.
///
/// # Errors
/// Returns [Error::InvalidDate] if the text does not start with a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);

    Date::parse(date_part, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn parse_amount(value: &Value) -> Result<Amount, Error> {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(number) => Amount::from_f64(number),
            None => Err(Error::InvalidAmount(number.to_string())),
        },
        Value::String(text) => Amount::from_str(text),
        other => Err(Error::InvalidAmount(other.to_string())),
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn is_blank_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error,
        transaction::{TransactionPayload, TransactionType},
    };

    use super::parse_date;

    fn payload(value: serde_json::Value) -> TransactionPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_valid_payload() {
        let transaction = payload(json!({
            "date": "2023-11-01",
            "type": "income",
            "source": " Salary ",
            "amount": 5000,
            "description": "Pay"
        }))
        .validate()
        .unwrap();

        assert_eq!(transaction.date, date!(2023 - 11 - 01));
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.source, "Salary");
        assert_eq!(transaction.amount.to_string(), "5000.00");
        assert_eq!(transaction.description.as_deref(), Some("Pay"));
    }

    #[test]
    fn accepts_amount_as_string() {
        let transaction = payload(json!({
            "date": "2023-11-01",
            "type": "expense",
            "source": "Taxes",
            "amount": "400.50"
        }))
        .validate()
        .unwrap();

        assert_eq!(transaction.amount.to_string(), "400.50");
    }

    #[test]
    fn rejects_missing_fields() {
        let result = payload(json!({
            "date": "2023-11-01",
            "type": "expense",
            "amount": 1
        }))
        .validate();

        assert_eq!(result, Err(Error::MissingFields));
    }

    #[test]
    fn blank_source_counts_as_missing() {
        let result = payload(json!({
            "date": "2023-11-01",
            "type": "expense",
            "source": "  ",
            "amount": 1
        }))
        .validate();

        assert_eq!(result, Err(Error::MissingFields));
    }

    #[test]
    fn rejects_unknown_type() {
        let result = payload(json!({
            "date": "2023-11-01",
            "type": "gift",
            "source": "Aunt",
            "amount": 1
        }))
        .validate();

        assert_eq!(result, Err(Error::InvalidTransactionType("gift".to_owned())));
    }

    #[test]
    fn rejects_negative_amount() {
        let result = payload(json!({
            "date": "2023-11-01",
            "type": "expense",
            "source": "Rent",
            "amount": -5
        }))
        .validate();

        assert_eq!(result, Err(Error::NegativeAmount(Decimal::from(-5))));
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let result = payload(json!({
            "date": "2023-11-01",
            "type": "expense",
            "source": "Rent",
            "amount": "lots"
        }))
        .validate();

        assert_eq!(result, Err(Error::InvalidAmount("lots".to_owned())));
    }

    #[test]
    fn rejects_invalid_date() {
        let result = payload(json!({
            "date": "2023-13-45",
            "type": "expense",
            "source": "Rent",
            "amount": 5
        }))
        .validate();

        assert_eq!(result, Err(Error::InvalidDate("2023-13-45".to_owned())));
    }

    #[test]
    fn type_is_checked_before_amount() {
        let result = payload(json!({
            "date": "not a date",
            "type": "gift",
            "source": "Rent",
            "amount": "lots"
        }))
        .validate();

        assert_eq!(result, Err(Error::InvalidTransactionType("gift".to_owned())));
    }

    #[test]
    fn parses_dates_with_time_suffix() {
        assert_eq!(
            parse_date("2023-12-01T09:30:00").unwrap(),
            date!(2023 - 12 - 01)
        );
        assert_eq!(
            parse_date("2023-12-01 00:00:00").unwrap(),
            date!(2023 - 12 - 01)
        );
    }
}
