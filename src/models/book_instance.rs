//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Copy availability, stored as a single character code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

#[derive(Debug, Error)]
#[error("Unknown loan status code: {0:?}")]
pub struct UnknownLoanStatus(pub String);

impl LoanStatus {
    /// Database code
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = UnknownLoanStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            other => Err(UnknownLoanStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A copy is overdue once today is past its due date, whatever its status
pub fn is_overdue(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_back.map(|d| today > d).unwrap_or(false)
}

/// Borrower reference shown on staff views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BorrowerRef {
    pub id: i32,
    pub username: String,
}

/// Copy with its title and borrower, as listed and displayed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub status: LoanStatus,
    pub status_label: String,
    pub due_back: Option<NaiveDate>,
    pub borrower: Option<BorrowerRef>,
    pub is_overdue: bool,
}

impl BookInstance {
    /// "{id} ({title})"
    pub fn display(&self) -> String {
        format!("{} ({})", self.id, self.book_title.as_deref().unwrap_or(""))
    }
}

/// Create copy request (administrative)
#[derive(Debug, Deserialize)]
pub struct CreateBookInstance {
    pub book_id: Option<i32>,
    pub imprint: String,
    #[serde(default)]
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
}
