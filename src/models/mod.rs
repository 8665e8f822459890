//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod form;
pub mod genre;
pub mod renewal;
pub mod stats;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorForm, AuthorRef};
pub use book::{Book, BookDetails, BookShort};
pub use book_instance::{BookInstance, LoanStatus};
pub use form::FieldErrors;
pub use genre::{Genre, Language};
pub use renewal::RenewBookForm;
pub use stats::CatalogCounts;
pub use user::{Capability, User, UserClaims};
