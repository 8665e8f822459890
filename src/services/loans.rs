//! Loan listings and the renewal workflow

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstance, LoanStatus},
        form::FieldErrors,
        renewal::{RenewBookForm, NOT_ON_LOAN_MESSAGE, RENEWAL_DATE_FIELD},
    },
    repository::Repository,
};

/// Result of a renewal submission
#[derive(Debug)]
pub enum RenewalOutcome {
    /// Due date replaced; the updated copy
    Renewed(BookInstance),
    /// Date refused; the untouched copy and the reasons, for redisplay
    Rejected {
        copy: BookInstance,
        errors: FieldErrors,
    },
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_copy(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.book_instances.get_by_id(id).await
    }

    /// Copies on loan to a user, soonest due first
    pub async fn borrowed_by(&self, user_id: i32) -> AppResult<Vec<BookInstance>> {
        self.repository
            .book_instances
            .list_on_loan_by_borrower(user_id)
            .await
    }

    /// Every copy on loan, soonest due first
    pub async fn on_loan(&self) -> AppResult<Vec<BookInstance>> {
        self.repository.book_instances.list_on_loan().await
    }

    /// Renew a copy: look it up, check it is on loan and the submitted date, store the new due date.
    ///
    /// Unknown copies fail with `NotFound` before the date is looked at.
    pub async fn renew(&self, id: Uuid, form: &RenewBookForm, today: NaiveDate) -> AppResult<RenewalOutcome> {
        let copy = self.repository.book_instances.get_by_id(id).await?;

        if copy.status != LoanStatus::OnLoan {
            tracing::warn!("Refusing to renew copy {} with status {}", id, copy.status);
            let mut errors = FieldErrors::new();
            errors.add(RENEWAL_DATE_FIELD, NOT_ON_LOAN_MESSAGE);
            return Ok(RenewalOutcome::Rejected { copy, errors });
        }

        let due_back = match form.clean(today) {
            Ok(date) => date,
            Err(errors) => {
                tracing::debug!("Renewal of {} rejected: {}", id, errors);
                return Ok(RenewalOutcome::Rejected { copy, errors });
            }
        };

        self.repository.book_instances.set_due_back(id, due_back).await?;
        tracing::info!("Copy {} renewed until {}", id, due_back);

        let renewed = self.repository.book_instances.get_by_id(id).await?;
        Ok(RenewalOutcome::Renewed(renewed))
    }
}
