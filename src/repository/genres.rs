//! Genres and languages repository

use sqlx::{Pool, Postgres};
use validator::Validate;

use crate::{
    error::AppResult,
    models::genre::{CreateGenre, CreateLanguage, Genre, Language},
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Genres linked to a book, in name order
    pub async fn genres_for_book(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    /// Languages linked to a book, in name order
    pub async fn languages_for_book(&self, book_id: i32) -> AppResult<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>(
            r#"
            SELECT l.id, l.name
            FROM languages l
            JOIN book_languages bl ON bl.language_id = l.id
            WHERE bl.book_id = $1
            ORDER BY l.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(languages)
    }

    pub async fn count_genres(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create_genre(&self, data: &CreateGenre) -> AppResult<Genre> {
        data.validate()?;
        let genre = sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING *")
            .bind(&data.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(genre)
    }

    pub async fn create_language(&self, data: &CreateLanguage) -> AppResult<Language> {
        data.validate()?;
        let language =
            sqlx::query_as::<_, Language>("INSERT INTO languages (name) VALUES ($1) RETURNING *")
                .bind(&data.name)
                .fetch_one(&self.pool)
                .await?;
        Ok(language)
    }
}
