use super::unit_record_codec::{decode_record, encode_record};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tally_dns_application::ports::UnitStore;
use tally_dns_domain::{bucket_key, DomainError, UnitRecord};
use tracing::{error, warn};

/// SQLite-backed store of retired hour buckets.
///
/// One row per bucket, keyed by the `YYYYMMDDHH` partition string; the
/// value is the codec-encoded record. Keys are zero-padded so string
/// comparison matches chronological order, which the retention sweep
/// relies on.
pub struct SqliteUnitStore {
    pool: SqlitePool,
}

impl SqliteUnitStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, DomainError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS stats_units (
                 bucket TEXT PRIMARY KEY,
                 record BLOB NOT NULL
             )",
        )
        .execute(&pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to initialize stats_units table");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl UnitStore for SqliteUnitStore {
    async fn put(&self, hour: u64, record: &UnitRecord) -> Result<(), DomainError> {
        let bucket = bucket_key(hour);
        let encoded = encode_record(record);

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!(error = %e, bucket = %bucket, "Failed to begin bucket write transaction");
            DomainError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            "INSERT INTO stats_units (bucket, record) VALUES (?, ?)
             ON CONFLICT(bucket) DO UPDATE SET record = excluded.record",
        )
        .bind(&bucket)
        .bind(&encoded)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, bucket = %bucket, "Failed to write bucket record");
            DomainError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            error!(error = %e, bucket = %bucket, "Failed to commit bucket write");
            DomainError::DatabaseError(e.to_string())
        })
    }

    async fn get(&self, hour: u64) -> Result<Option<UnitRecord>, DomainError> {
        let bucket = bucket_key(hour);

        let row = sqlx::query_as::<_, (Vec<u8>,)>(
            "SELECT record FROM stats_units WHERE bucket = ?",
        )
        .bind(&bucket)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, bucket = %bucket, "Failed to read bucket record");
            DomainError::DatabaseError(e.to_string())
        })?;

        let Some((encoded,)) = row else {
            return Ok(None);
        };

        // A record we cannot decode is treated as absent, never as a
        // caller-visible failure.
        match decode_record(&encoded) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(error = %e, bucket = %bucket, "Discarding undecodable bucket record");
                Ok(None)
            }
        }
    }

    async fn delete_all(&self) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM stats_units")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to clear stats buckets");
                DomainError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    async fn delete_older_than(&self, hour: u64) -> Result<u64, DomainError> {
        let cutoff = bucket_key(hour);

        let result = sqlx::query("DELETE FROM stats_units WHERE bucket < ?")
            .bind(&cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, cutoff = %cutoff, "Failed to sweep expired stats buckets");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
