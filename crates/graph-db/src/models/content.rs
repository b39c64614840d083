//! Read models over tables owned by the content service

use sqlx::FromRow;

/// Content item id and view counter
#[derive(Debug, Clone, FromRow)]
pub struct OwnedContentModel {
    pub id: String,
    pub views: i64,
}
