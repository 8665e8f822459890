//! Dashboard counters

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    /// Copies with status Available
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
}
