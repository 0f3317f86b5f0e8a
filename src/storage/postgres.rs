use super::{CredentialStore, PersistenceError, StoreFuture};
use sqlx::{Connection, PgPool};
use tracing::{Instrument, error, info_span};

const INSERT_USER: &str = "INSERT INTO users (email, password_hash) VALUES ($1, $2)";

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, email: &str, encoded_hash: &str) -> Result<(), PersistenceError> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = INSERT_USER
        );
        sqlx::query(INSERT_USER)
            .bind(email)
            .bind(encoded_hash)
            .execute(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    PersistenceError::DuplicateEmail
                }
                other => {
                    error!("Error inserting user: {}", other);
                    PersistenceError::Database(other)
                }
            })?;
        Ok(())
    }

    async fn check(&self) -> Result<(), PersistenceError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;
        Ok(())
    }
}

impl CredentialStore for PgCredentialStore {
    fn save<'a>(
        &'a self,
        email: &'a str,
        encoded_hash: &'a str,
    ) -> StoreFuture<'a, Result<(), PersistenceError>> {
        Box::pin(self.insert(email, encoded_hash))
    }

    fn ping(&self) -> StoreFuture<'_, Result<(), PersistenceError>> {
        Box::pin(self.check())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[test]
    fn insert_targets_users_table() {
        assert!(INSERT_USER.starts_with("INSERT INTO users"));
        assert!(INSERT_USER.contains("(email, password_hash)"));
    }

    #[tokio::test]
    async fn unreachable_database_is_a_persistence_error() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://registrar@127.0.0.1:1/registrar")
            .unwrap();
        let store = PgCredentialStore::new(pool);

        assert!(matches!(
            store.save("a@example.com", "$argon2id$").await,
            Err(PersistenceError::Database(_))
        ));
        assert!(store.ping().await.is_err());
    }
}
