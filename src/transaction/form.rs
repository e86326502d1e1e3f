//! Converts raw request data into a validated [TransactionBuilder].

use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::Deserialize;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{TransactionBuilder, TransactionType, core::date_format::parse_date},
};

/// The request body for creating or updating a transaction.
///
/// Every field is optional at this stage so that a missing field is reported
/// as a validation error naming the field, instead of a generic parse error.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TransactionForm {
    /// The value of the transaction, must be positive.
    pub amount: Option<f64>,
    /// A free-text label such as "Salary".
    pub category: Option<String>,
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The date the transaction happened, formatted as YYYY-MM-DD.
    pub date: Option<String>,
    /// Optional text detailing the transaction.
    pub description: Option<String>,
}

impl TryFrom<TransactionForm> for TransactionBuilder {
    type Error = Error;

    /// Parse and validate the form.
    ///
    /// An empty description is stored as no description.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingField] if amount, category, type or date is absent or empty,
    /// - [Error::InvalidTransactionType] if the type is not "income" or "expense",
    /// - [Error::InvalidDate] if the date is not formatted as YYYY-MM-DD,
    /// - or any error from [TransactionBuilder::validate].
    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        let amount = form.amount.ok_or(Error::MissingField("amount"))?;
        let category = required(form.category, "category")?;
        let kind: TransactionType = required(form.kind, "type")?.parse()?;
        let date = parse_date(&required(form.date, "date")?)?;
        let description = form
            .description
            .filter(|description| !description.trim().is_empty());

        let builder = TransactionBuilder {
            amount,
            category,
            kind,
            date,
            description,
        };
        builder.validate()?;

        Ok(builder)
    }
}

/// Validate the JSON body of a create or update request.
///
/// # Errors
/// Returns an [Error::InvalidRequest] if the body could not be parsed as a
/// [TransactionForm], otherwise the errors of converting the form.
pub(crate) fn parse_transaction_payload(
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<TransactionBuilder, Error> {
    let Json(form) = payload.map_err(|rejection| {
        tracing::debug!("Rejected transaction payload: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    })?;

    form.try_into()
}

/// Read the transaction ID from the request path.
///
/// # Errors
/// Returns an [Error::InvalidRequest] if the path segment is not an integer.
pub(crate) fn parse_transaction_id(
    path: Result<Path<TransactionId>, PathRejection>,
) -> Result<TransactionId, Error> {
    let Path(transaction_id) = path.map_err(|rejection| {
        tracing::debug!("Rejected transaction ID: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    })?;

    Ok(transaction_id)
}

fn required(field: Option<String>, name: &'static str) -> Result<String, Error> {
    field
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingField(name))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{TransactionBuilder, TransactionForm, TransactionType},
    };

    fn valid_form() -> TransactionForm {
        TransactionForm {
            amount: Some(300.0),
            category: Some("Food".to_owned()),
            kind: Some("expense".to_owned()),
            date: Some("2025-08-02".to_owned()),
            description: Some("Groceries".to_owned()),
        }
    }

    #[test]
    fn converts_valid_form() {
        let builder = TransactionBuilder::try_from(valid_form()).unwrap();

        assert_eq!(
            builder,
            TransactionBuilder {
                amount: 300.0,
                category: "Food".to_owned(),
                kind: TransactionType::Expense,
                date: date!(2025 - 08 - 02),
                description: Some("Groceries".to_owned()),
            }
        );
    }

    #[test]
    fn empty_description_becomes_none() {
        let form = TransactionForm {
            description: Some(String::new()),
            ..valid_form()
        };

        let builder = TransactionBuilder::try_from(form).unwrap();

        assert_eq!(builder.description, None);
    }

    #[test]
    fn reports_missing_fields() {
        let cases = [
            (
                TransactionForm {
                    amount: None,
                    ..valid_form()
                },
                "amount",
            ),
            (
                TransactionForm {
                    category: Some(String::new()),
                    ..valid_form()
                },
                "category",
            ),
            (
                TransactionForm {
                    kind: None,
                    ..valid_form()
                },
                "type",
            ),
            (
                TransactionForm {
                    date: None,
                    ..valid_form()
                },
                "date",
            ),
        ];

        for (form, field) in cases {
            assert_eq!(
                TransactionBuilder::try_from(form),
                Err(Error::MissingField(field))
            );
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let form = TransactionForm {
            kind: Some("refund".to_owned()),
            ..valid_form()
        };

        assert_eq!(
            TransactionBuilder::try_from(form),
            Err(Error::InvalidTransactionType("refund".to_owned()))
        );
    }

    #[test]
    fn rejects_invalid_date() {
        let form = TransactionForm {
            date: Some("2025-13-01".to_owned()),
            ..valid_form()
        };

        assert_eq!(
            TransactionBuilder::try_from(form),
            Err(Error::InvalidDate("2025-13-01".to_owned()))
        );
    }

    #[test]
    fn rejects_negative_amount() {
        let form = TransactionForm {
            amount: Some(-1.0),
            ..valid_form()
        };

        assert_eq!(
            TransactionBuilder::try_from(form),
            Err(Error::InvalidAmount(-1.0))
        );
    }

    #[test]
    fn deserializes_type_field() {
        let form: TransactionForm = serde_json::from_str(
            r#"{"amount": 1000, "category": "Salary", "type": "income", "date": "2025-08-01"}"#,
        )
        .unwrap();

        assert_eq!(form.kind.as_deref(), Some("income"));
        assert_eq!(form.amount, Some(1000.0));
        assert_eq!(form.description, None);
    }
}
