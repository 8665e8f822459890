//! Author record management

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorForm},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn create(&self, form: &AuthorForm) -> AppResult<Author> {
        let data = form.clean().map_err(AppError::Form)?;
        let author = self.repository.authors.create(&data).await?;
        tracing::info!("Author {} created: {}", author.id, author.display_name());
        Ok(author)
    }

    pub async fn update(&self, id: i32, form: &AuthorForm) -> AppResult<Author> {
        // Unknown ids are reported before form errors
        self.repository.authors.get_by_id(id).await?;
        let data = form.clean().map_err(AppError::Form)?;
        let author = self.repository.authors.update(id, &data).await?;
        tracing::info!("Author {} updated", id);
        Ok(author)
    }

    /// Delete an author; their books remain with no author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Author {} deleted", id);
        Ok(())
    }
}
