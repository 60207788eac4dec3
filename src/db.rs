use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DbConfig;

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.database);

    let pool = PgPoolOptions::new()
        .max_connections(cfg.pool_size)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Creates the schema objects at startup when missing. The constraint names
/// matter: the store maps unique violations back to specific errors by them.
pub async fn init_schema(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL,
            normalized TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            gold BIGINT NOT NULL DEFAULT 0,
            last_training TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ,
            CONSTRAINT users_normalized_key UNIQUE (normalized),
            CONSTRAINT users_email_key UNIQUE (email)
        )
        "#,
    )
    .execute(db)
    .await
    .context("create users table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_skills (
            user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            skill_name TEXT NOT NULL,
            level INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (user_id, skill_name)
        )
        "#,
    )
    .execute(db)
    .await
    .context("create user_skills table")?;

    Ok(())
}
