//! HTTP handlers for the catalog site

pub mod authors;
pub mod books;
pub mod health;
pub mod index;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::Redirect,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    models::{author::Author, book::BookShort, user::UserClaims},
    AppState,
};

/// Largest page a client may ask for
pub const MAX_PER_PAGE: i64 = 100;

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Page selection query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 10, max: 100)
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub const DEFAULT_PER_PAGE: i64 = 10;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// (limit, offset) for SQL. Pages past the end saturate instead of overflowing.
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page();
        (per_page, (self.page() - 1).saturating_mul(per_page))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(BookPage = PaginatedResponse<BookShort>, AuthorPage = PaginatedResponse<Author>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Entries on this page
    pub items: Vec<T>,
    /// Total number of entries
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Entries per page
    pub per_page: i64,
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(|| async { Redirect::permanent("/catalog/") }))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Dashboard
        .route("/catalog/", get(index::index))
        // Books
        .route("/catalog/books/", get(books::list_books))
        .route("/catalog/books/:id", get(books::get_book))
        // Authors
        .route("/catalog/authors/", get(authors::list_authors))
        .route("/catalog/authors/:id", get(authors::get_author))
        .route(
            "/catalog/authors/create/",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route(
            "/catalog/authors/:id/update/",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/catalog/authors/:id/delete/",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        // Loans
        .route("/catalog/mybooks/", get(loans::my_books))
        .route("/catalog/borrowed-books", get(loans::borrowed_books))
        .route(
            "/catalog/book/:id/renew/",
            get(loans::renew_book_form).post(loans::renew_book),
        )
        .with_state(state);

    Router::new()
        .merge(catalog)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
