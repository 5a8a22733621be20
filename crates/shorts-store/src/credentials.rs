//! Credential repository.
//!
//! Secret values are encrypted before they touch the database and only
//! decrypted on read; plaintext never appears in a row or a log line.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::StoreResult;
use crate::store::Store;

/// A service that has a credential on file. The value itself is never
/// exposed through this type.
#[derive(Debug, Clone, Serialize)]
pub struct ConfiguredService {
    pub service: String,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// Save (or replace) a credential for a service.
    pub async fn save_credential(&self, service: &str, secret: &str) -> StoreResult<()> {
        let sealed = self.cipher().encrypt(secret)?;

        sqlx::query(
            r#"
            INSERT INTO credentials (service, secret, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (service) DO UPDATE SET secret = excluded.secret,
                                                updated_at = excluded.updated_at
            "#,
        )
        .bind(service)
        .bind(&sealed)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        debug!(service = %service, "Credential saved");
        Ok(())
    }

    /// Fetch and decrypt a credential, if one is stored.
    pub async fn credential(&self, service: &str) -> StoreResult<Option<String>> {
        let sealed: Option<String> =
            sqlx::query_scalar("SELECT secret FROM credentials WHERE service = ?")
                .bind(service)
                .fetch_optional(self.pool())
                .await?;

        match sealed {
            Some(sealed) => Ok(Some(self.cipher().decrypt(&sealed)?)),
            None => Ok(None),
        }
    }

    /// List the services that have a credential on file.
    pub async fn configured_services(&self) -> StoreResult<Vec<ConfiguredService>> {
        let rows: Vec<(String, DateTime<Utc>)> =
            sqlx::query_as("SELECT service, updated_at FROM credentials ORDER BY service")
                .fetch_all(self.pool())
                .await?;

        Ok(rows
            .into_iter()
            .map(|(service, updated_at)| ConfiguredService {
                service,
                updated_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_read_back_round_trips() {
        let store = Store::in_memory().await.unwrap();

        store.save_credential("openai", "sk-first").await.unwrap();
        assert_eq!(
            store.credential("openai").await.unwrap().as_deref(),
            Some("sk-first")
        );

        // Overwrite replaces the value.
        store.save_credential("openai", "sk-second").await.unwrap();
        assert_eq!(
            store.credential("openai").await.unwrap().as_deref(),
            Some("sk-second")
        );

        assert!(store.credential("luma").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn secret_is_encrypted_at_rest() {
        let store = Store::in_memory().await.unwrap();
        store
            .save_credential("gemini", "very-secret-key")
            .await
            .unwrap();

        let raw: String = sqlx::query_scalar("SELECT secret FROM credentials WHERE service = ?")
            .bind("gemini")
            .fetch_one(store.pool())
            .await
            .unwrap();

        assert_ne!(raw, "very-secret-key");
        assert!(!raw.contains("very-secret-key"));
    }

    #[tokio::test]
    async fn configured_services_lists_names_only() {
        let store = Store::in_memory().await.unwrap();
        store.save_credential("openai", "a").await.unwrap();
        store.save_credential("gemini", "b").await.unwrap();

        let services = store.configured_services().await.unwrap();
        let names: Vec<_> = services.iter().map(|s| s.service.as_str()).collect();
        assert_eq!(names, vec!["gemini", "openai"]);
    }
}
