//! Author endpoints: browsing and record management

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorForm},
        book::BookShort,
        user::Capability,
    },
    AppState,
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse};

const AUTHOR_LIST_URL: &str = "/catalog/authors/";

/// Author detail page
#[derive(Serialize, ToSchema)]
pub struct AuthorDetailResponse {
    pub author: Author,
    /// "First, Last"
    pub display_name: String,
    pub url: String,
    pub books: Vec<BookShort>,
}

/// Author create/update form page
#[derive(Serialize, ToSchema)]
pub struct AuthorFormResponse {
    /// Author being edited, absent on create
    pub author: Option<Author>,
    pub form: AuthorForm,
}

/// Author delete confirmation page
#[derive(Serialize, ToSchema)]
pub struct AuthorDeleteResponse {
    pub author: Author,
    pub display_name: String,
}

/// List authors, ordered by first then last name
#[utoipa::path(
    get,
    path = "/catalog/authors/",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of authors", body = super::AuthorPage)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Author>>> {
    let (limit, offset) = query.limit_offset();
    let (items, total) = state.services.catalog.list_authors(limit, offset).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page(),
        per_page: query.per_page(),
    }))
}

/// Author details with their books
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetailResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetailResponse>> {
    let (author, books) = state.services.catalog.get_author(id).await?;

    Ok(Json(AuthorDetailResponse {
        display_name: author.display_name(),
        url: author.url(),
        author,
        books,
    }))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/authors/create/",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Author form", body = AuthorFormResponse),
        (status = 403, description = "Missing add_author capability")
    )
)]
pub async fn create_author_form(
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AuthorFormResponse>> {
    claims.require(Capability::AddAuthor)?;

    Ok(Json(AuthorFormResponse {
        author: None,
        form: AuthorForm::default(),
    }))
}

/// Create an author, then redirect to their page
#[utoipa::path(
    post,
    path = "/catalog/authors/create/",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to author page"),
        (status = 403, description = "Missing add_author capability"),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Form(form): Form<AuthorForm>,
) -> AppResult<Redirect> {
    claims.require(Capability::AddAuthor)?;

    let author = state.services.authors.create(&form).await?;
    Ok(Redirect::to(&author.url()))
}

/// Author form pre-filled with the current record
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}/update/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author form", body = AuthorFormResponse),
        (status = 403, description = "Missing change_author capability"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorFormResponse>> {
    claims.require(Capability::ChangeAuthor)?;

    let author = state.services.authors.get(id).await?;
    Ok(Json(AuthorFormResponse {
        form: AuthorForm::from_author(&author),
        author: Some(author),
    }))
}

/// Update an author, then redirect to their page
#[utoipa::path(
    post,
    path = "/catalog/authors/{id}/update/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirect to author page"),
        (status = 403, description = "Missing change_author capability"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Redirect> {
    claims.require(Capability::ChangeAuthor)?;

    let author = state.services.authors.update(id, &form).await?;
    Ok(Redirect::to(&author.url()))
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Confirmation page", body = AuthorDeleteResponse),
        (status = 403, description = "Missing delete_author capability"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDeleteResponse>> {
    claims.require(Capability::DeleteAuthor)?;

    let author = state.services.authors.get(id).await?;
    Ok(Json(AuthorDeleteResponse {
        display_name: author.display_name(),
        author,
    }))
}

/// Delete an author (their books keep no author), then redirect to the list
#[utoipa::path(
    post,
    path = "/catalog/authors/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Deleted, redirect to author list"),
        (status = 403, description = "Missing delete_author capability"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    claims.require(Capability::DeleteAuthor)?;

    state.services.authors.delete(id).await?;
    Ok(Redirect::to(AUTHOR_LIST_URL))
}
