use async_trait::async_trait;
use dashmap::DashSet;
use sqlx::SqlitePool;
use std::net::IpAddr;
use tally_dns_application::ports::ClientRegistry;
use tally_dns_domain::{ClientSource, DomainError};
use tracing::{debug, error};

/// SQLite-backed client registry with an in-memory known-address cache.
///
/// `exists` is answered from the cache because it runs inline on the
/// request path (the rDNS enqueue check) and must not suspend. The
/// cache holds every address that has a hostname on record; it is
/// seeded from the table at construction and maintained on writes.
pub struct SqliteClientRegistry {
    pool: SqlitePool,
    known: DashSet<IpAddr>,
}

impl SqliteClientRegistry {
    pub async fn new(pool: SqlitePool) -> Result<Self, DomainError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS clients (
                 ip_address TEXT PRIMARY KEY,
                 hostname TEXT NOT NULL,
                 source TEXT NOT NULL,
                 first_seen TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                 last_seen TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
             )",
        )
        .execute(&pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to initialize clients table");
            DomainError::DatabaseError(e.to_string())
        })?;

        let known = DashSet::new();
        let rows = sqlx::query_as::<_, (String,)>("SELECT ip_address FROM clients")
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load known clients");
                DomainError::DatabaseError(e.to_string())
            })?;
        for (ip,) in rows {
            if let Ok(addr) = ip.parse::<IpAddr>() {
                known.insert(addr);
            }
        }

        Ok(Self { pool, known })
    }

    async fn current_source(&self, ip: &str) -> Result<Option<ClientSource>, DomainError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT source FROM clients WHERE ip_address = ?")
            .bind(ip)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, ip = %ip, "Failed to query client source");
                DomainError::DatabaseError(e.to_string())
            })?;
        Ok(row.and_then(|(s,)| ClientSource::from_str(&s)))
    }
}

#[async_trait]
impl ClientRegistry for SqliteClientRegistry {
    fn exists(&self, ip: IpAddr) -> bool {
        self.known.contains(&ip)
    }

    async fn add_host(
        &self,
        ip: IpAddr,
        hostname: &str,
        source: ClientSource,
    ) -> Result<bool, DomainError> {
        if hostname.is_empty() {
            return Ok(false);
        }
        let ip_str = ip.to_string();

        // A hostname from a lower-trust source never overwrites one
        // from a higher-trust source.
        if let Some(existing) = self.current_source(&ip_str).await? {
            if existing > source {
                debug!(ip = %ip, "Keeping higher-trust hostname for client");
                return Ok(false);
            }
        }

        sqlx::query(
            "INSERT INTO clients (ip_address, hostname, source)
             VALUES (?, ?, ?)
             ON CONFLICT(ip_address) DO UPDATE SET
                 hostname = excluded.hostname,
                 source = excluded.source,
                 last_seen = CURRENT_TIMESTAMP",
        )
        .bind(&ip_str)
        .bind(hostname)
        .bind(source.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, ip = %ip, "Failed to upsert client hostname");
            DomainError::DatabaseError(e.to_string())
        })?;

        self.known.insert(ip);
        debug!(ip = %ip, hostname = %hostname, source = source.as_str(), "Client hostname registered");
        Ok(true)
    }
}
