//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, index, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library Catalog API",
        version = "1.0.0",
        description = "Books, authors, copies and loan renewals of a small lending library"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Dashboard
        index::index,
        // Books
        books::list_books,
        books::get_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        authors::update_author_form,
        authors::update_author,
        authors::delete_author_form,
        authors::delete_author,
        // Loans
        loans::my_books,
        loans::borrowed_books,
        loans::renew_book_form,
        loans::renew_book,
    ),
    components(
        schemas(
            // Catalog
            crate::models::author::Author,
            crate::models::author::AuthorRef,
            crate::models::author::AuthorForm,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BorrowerRef,
            crate::models::book_instance::LoanStatus,
            crate::models::genre::Genre,
            crate::models::genre::Language,
            crate::models::stats::CatalogCounts,
            crate::models::renewal::RenewBookForm,
            crate::models::form::FieldErrors,
            crate::api::BookPage,
            crate::api::AuthorPage,
            // Pages
            index::IndexResponse,
            authors::AuthorDetailResponse,
            authors::AuthorFormResponse,
            authors::AuthorDeleteResponse,
            loans::RenewBookPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog dashboard"),
        (name = "books", description = "Book browsing"),
        (name = "authors", description = "Author browsing and management"),
        (name = "loans", description = "Borrowed copies and renewals")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
