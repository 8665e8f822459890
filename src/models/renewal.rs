//! Renewal date rules for borrowed copies

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::form::{parse_date, FieldErrors, INVALID_DATE_MESSAGE, REQUIRED_MESSAGE};

/// Latest acceptable due date, in days from today (four weeks)
pub const MAX_RENEWAL_DAYS: i64 = 28;

/// Due date suggested on the renewal form, in days from today (three weeks)
pub const DEFAULT_RENEWAL_DAYS: i64 = 21;

pub const RENEWAL_DATE_FIELD: &str = "renewal_date";

/// Only copies on loan carry a meaningful due date
pub const NOT_ON_LOAN_MESSAGE: &str = "This copy is not on loan";

pub const RENEWAL_HELP_TEXT: &str = "Enter a date between now and 4 weeks (default 3).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenewalDateError {
    #[error("Invalid date - renewal in past")]
    InPast,

    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarAhead,
}

/// Accepts `proposed` iff `today <= proposed <= today + 28 days`
pub fn check_renewal_date(proposed: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalDateError> {
    if proposed < today {
        return Err(RenewalDateError::InPast);
    }
    if proposed > today + Duration::days(MAX_RENEWAL_DAYS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(proposed)
}

pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(DEFAULT_RENEWAL_DAYS)
}

/// Submitted renewal form
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct RenewBookForm {
    /// New due date (YYYY-MM-DD)
    #[serde(default)]
    pub renewal_date: Option<String>,
}

impl RenewBookForm {
    /// Parse and check the submitted date against `today`
    pub fn clean(&self, today: NaiveDate) -> Result<NaiveDate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let raw = match self.renewal_date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add(RENEWAL_DATE_FIELD, REQUIRED_MESSAGE);
                return Err(errors);
            }
            Some(raw) => raw,
        };

        let Some(proposed) = parse_date(raw) else {
            errors.add(RENEWAL_DATE_FIELD, INVALID_DATE_MESSAGE);
            return Err(errors);
        };

        check_renewal_date(proposed, today).map_err(|e| {
            errors.add(RENEWAL_DATE_FIELD, e.to_string());
            errors
        })
    }
}
