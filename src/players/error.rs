use thiserror::Error;

/// Failures surfaced by the player store. Unique-key violations get their own
/// variants so handlers can tell the caller which field collided instead of
/// leaking a generic database error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already taken")]
    EmailTaken,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
