//! Catalog browsing service: dashboard counts, books and authors

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorRef},
        book::{book_url, display_genre, display_language, BookDetails, BookShort},
        book_instance::LoanStatus,
        stats::CatalogCounts,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard counters
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.book_instances.count().await?,
            num_instances_available: self
                .repository
                .book_instances
                .count_by_status(LoanStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.genres.count_genres().await?,
        })
    }

    pub async fn list_books(&self, limit: i64, offset: i64) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.list(limit, offset).await
    }

    /// Book with author, genres, languages and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let genres = self.repository.genres.genres_for_book(id).await?;
        let languages = self.repository.genres.languages_for_book(id).await?;
        let copies = self.repository.book_instances.list_by_book(id).await?;

        Ok(BookDetails {
            id: book.id,
            display_genre: display_genre(&genres),
            display_language: display_language(&languages),
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author: author.as_ref().map(AuthorRef::from),
            genres,
            languages,
            copies,
            url: book_url(book.id),
        })
    }

    pub async fn list_authors(&self, limit: i64, offset: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(limit, offset).await
    }

    /// Author and the books they wrote
    pub async fn get_author(&self, id: i32) -> AppResult<(Author, Vec<BookShort>)> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok((author, books))
    }

    /// Database readiness
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
