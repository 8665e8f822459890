//! Books repository

use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{author_url, AuthorRef},
        book::{book_url, Book, BookShort, CreateBook},
    },
};

const BOOK_SHORT_SELECT: &str = r#"
    SELECT b.id, b.title, a.id AS author_id, a.first_name, a.last_name
    FROM books b
    LEFT JOIN authors a ON b.author_id = a.id
"#;

fn book_short_from_row(row: &PgRow) -> BookShort {
    let id: i32 = row.get("id");
    let author_id: Option<i32> = row.get("author_id");
    let author = author_id.map(|author_id| {
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");
        AuthorRef {
            id: author_id,
            name: format!("{}, {}", first_name, last_name),
            url: author_url(author_id),
        }
    });

    BookShort {
        id,
        title: row.get("title"),
        author,
        url: book_url(id),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books ordered by title
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<BookShort>, i64)> {
        let query = format!("{} ORDER BY b.title, b.id LIMIT $1 OFFSET $2", BOOK_SHORT_SELECT);
        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total = self.count().await?;
        Ok((rows.iter().map(book_short_from_row).collect(), total))
    }

    /// Books written by an author
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>> {
        let query = format!("{} WHERE b.author_id = $1 ORDER BY b.title", BOOK_SHORT_SELECT);
        let rows = sqlx::query(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(book_short_from_row).collect())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a book with its genre and language links
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;

        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, summary, isbn, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.author_id)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &data.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(book.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        for language_id in &data.language_ids {
            sqlx::query("INSERT INTO book_languages (book_id, language_id) VALUES ($1, $2)")
                .bind(book.id)
                .bind(language_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book. Fails with `AppError::Integrity` while copies reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
