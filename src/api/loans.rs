//! Loan endpoints: borrowed copies and the renewal form

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::BookInstance,
        form::FieldErrors,
        renewal::{default_renewal_date, RenewBookForm, RENEWAL_HELP_TEXT},
        user::Capability,
    },
    services::loans::RenewalOutcome,
    AppState,
};

use super::AuthenticatedUser;

const BORROWED_BOOKS_URL: &str = "/catalog/borrowed-books";

/// Renewal form page, shown before submission and again on rejection
#[derive(Serialize, ToSchema)]
pub struct RenewBookPage {
    pub book_instance: BookInstance,
    /// "{copy id} ({title})"
    pub title: String,
    pub form: RenewBookForm,
    pub help_text: String,
    pub errors: FieldErrors,
}

impl RenewBookPage {
    fn new(book_instance: BookInstance, form: RenewBookForm, errors: FieldErrors) -> Self {
        Self {
            title: book_instance.display(),
            book_instance,
            form,
            help_text: RENEWAL_HELP_TEXT.to_string(),
            errors,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Copies on loan to the current user, soonest due first
#[utoipa::path(
    get,
    path = "/catalog/mybooks/",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed copies", body = Vec<BookInstance>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstance>>> {
    let copies = state.services.loans.borrowed_by(claims.user_id).await?;
    Ok(Json(copies))
}

/// Every copy on loan (staff), soonest due first
#[utoipa::path(
    get,
    path = "/catalog/borrowed-books",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Copies on loan", body = Vec<BookInstance>),
        (status = 403, description = "Missing can_mark_returned capability")
    )
)]
pub async fn borrowed_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstance>>> {
    claims.require(Capability::MarkReturned)?;

    let copies = state.services.loans.on_loan().await?;
    Ok(Json(copies))
}

/// Renewal form with the suggested date (three weeks from today)
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Renewal form", body = RenewBookPage),
        (status = 403, description = "Missing can_mark_returned capability"),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_book_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewBookPage>> {
    claims.require(Capability::MarkReturned)?;

    let copy = state.services.loans.get_copy(id).await?;
    let form = RenewBookForm {
        renewal_date: Some(default_renewal_date(today()).to_string()),
    };

    Ok(Json(RenewBookPage::new(copy, form, FieldErrors::new())))
}

/// Renew a copy, then redirect to the borrowed books list
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body(content = RenewBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Renewed, redirect to borrowed books"),
        (status = 403, description = "Missing can_mark_returned capability"),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Date refused, form with errors", body = RenewBookPage)
    )
)]
pub async fn renew_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Form(form): Form<RenewBookForm>,
) -> AppResult<Response> {
    claims.require(Capability::MarkReturned)?;

    match state.services.loans.renew(id, &form, today()).await? {
        RenewalOutcome::Renewed(_) => Ok(Redirect::to(BORROWED_BOOKS_URL).into_response()),
        RenewalOutcome::Rejected { copy, errors } => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(RenewBookPage::new(copy, form, errors)),
        )
            .into_response()),
    }
}
