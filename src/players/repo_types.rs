use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::players::progress::Progress;

/// Raw `users` row.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,     // display form
    pub normalized: String,   // trim + lowercase, uniqueness key
    pub email: String,
    pub password_hash: String,
    pub gold: i64,
    pub last_training: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

/// A stored player with their skill rows folded into `progress`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub progress: Progress,
}

/// Input for the transactional account insert.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub progress: Progress,
}
