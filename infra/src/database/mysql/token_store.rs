//! MySQL implementation of the RefreshTokenStore trait.
//!
//! Persists refresh-token records in the `refresh_tokens` table (see
//! `migrations/001_refresh_tokens.sql`). Revocation is a guarded
//! `UPDATE ... WHERE revoked = FALSE`, so concurrent rotation attempts
//! on the same token resolve to exactly one winner without an explicit
//! row lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tg_core::domain::entities::token::RefreshTokenRecord;
use tg_core::errors::{TokenError, TokenResult};
use tg_core::repositories::RefreshTokenStore;

/// MySQL-backed refresh-token store.
pub struct MySqlRefreshTokenStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenStore {
    /// Create a new store on an SQLx MySQL pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Map a database row to a RefreshTokenRecord.
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> TokenResult<RefreshTokenRecord> {
        let id: String = row
            .try_get("id")
            .map_err(|e| TokenError::unavailable(format!("failed to get id: {}", e)))?;

        Ok(RefreshTokenRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| TokenError::unavailable(format!("invalid record uuid: {}", e)))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| TokenError::unavailable(format!("failed to get user_id: {}", e)))?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| TokenError::unavailable(format!("failed to get token_hash: {}", e)))?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| TokenError::unavailable(format!("failed to get user_agent: {}", e)))?,
            ip: row
                .try_get("ip")
                .map_err(|e| TokenError::unavailable(format!("failed to get ip: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| TokenError::unavailable(format!("failed to get created_at: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| TokenError::unavailable(format!("failed to get expires_at: {}", e)))?,
            revoked: row
                .try_get("revoked")
                .map_err(|e| TokenError::unavailable(format!("failed to get revoked: {}", e)))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| TokenError::unavailable(format!("failed to get revoked_at: {}", e)))?,
        })
    }
}

#[async_trait]
impl RefreshTokenStore for MySqlRefreshTokenStore {
    async fn create(&self, record: RefreshTokenRecord) -> TokenResult<RefreshTokenRecord> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, user_agent, ip, created_at, expires_at, revoked, revoked_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        // The unique index on token_hash rejects duplicates.
        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.user_id)
            .bind(&record.token_hash)
            .bind(&record.user_agent)
            .bind(&record.ip)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.revoked)
            .bind(record.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(|e| TokenError::unavailable(format!("failed to save refresh token: {}", e)))?;

        Ok(record)
    }

    async fn find_valid(&self, token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>> {
        let query = r#"
            SELECT id, user_id, token_hash, user_agent, ip, created_at, expires_at, revoked, revoked_at
            FROM refresh_tokens
            WHERE token_hash = ? AND revoked = FALSE AND expires_at > ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TokenError::unavailable(format!("failed to find refresh token: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_any(&self, token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>> {
        let query = r#"
            SELECT id, user_id, token_hash, user_agent, ip, created_at, expires_at, revoked, revoked_at
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TokenError::unavailable(format!("failed to find refresh token: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_latest_active_for_context(
        &self,
        user_id: i64,
        user_agent: &str,
        ip: &str,
    ) -> TokenResult<Option<RefreshTokenRecord>> {
        let query = r#"
            SELECT id, user_id, token_hash, user_agent, ip, created_at, expires_at, revoked, revoked_at
            FROM refresh_tokens
            WHERE user_id = ?
                AND user_agent = ?
                AND ip = ?
                AND revoked = FALSE
                AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(user_agent)
            .bind(ip)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                TokenError::unavailable(format!("failed to find sibling token: {}", e))
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke(&self, token_hash: &str) -> TokenResult<bool> {
        // Compare-and-swap on the revoked flag: rows_affected tells the
        // single winner apart from every concurrent loser, and
        // revoked_at keeps its first value.
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, revoked_at = ?
            WHERE token_hash = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| TokenError::unavailable(format!("failed to revoke token: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> TokenResult<usize> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, revoked_at = ?
            WHERE user_id = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TokenError::unavailable(format!("failed to revoke user tokens: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self) -> TokenResult<usize> {
        // Revoked rows stay until their expiry passes, preserving the
        // audit trail for reuse incidents.
        let query = r#"
            DELETE FROM refresh_tokens
            WHERE expires_at < ?
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| TokenError::unavailable(format!("failed to delete expired tokens: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}
