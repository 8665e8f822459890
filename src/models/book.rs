//! Book (title) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::AuthorRef;
use super::book_instance::BookInstance;
use super::genre::{Genre, Language};

/// Genres shown in list summaries
const DISPLAYED_GENRES: usize = 3;

pub fn book_url(id: i32) -> String {
    format!("/catalog/books/{}", id)
}

/// Book row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// 13 character ISBN, unique across the catalog
    pub isbn: String,
    pub author_id: Option<i32>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub author: Option<AuthorRef>,
    pub url: String,
}

/// Book with everything the detail page shows
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<AuthorRef>,
    pub genres: Vec<Genre>,
    pub languages: Vec<Language>,
    /// First three genre names, comma separated
    pub display_genre: String,
    pub display_language: String,
    pub copies: Vec<BookInstance>,
    pub url: String,
}

/// Comma separated names of the first three genres
pub fn display_genre(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(DISPLAYED_GENRES)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn display_language(languages: &[Language]) -> String {
    languages
        .iter()
        .map(|l| l.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Create book request (administrative)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub summary: String,
    #[validate(length(min = 1, max = 13))]
    pub isbn: String,
    pub author_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub language_ids: Vec<i32>,
}
