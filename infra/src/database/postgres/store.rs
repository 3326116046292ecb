//! PostgreSQL store handing out one transaction per session.

use async_trait::async_trait;
use sqlx::PgPool;

use sv_core::errors::DomainResult;
use sv_core::repositories::Store;

use super::session::PgSession;
use crate::database::connection::DatabasePool;
use crate::database_failure;

/// Session factory over a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn from_pool(pool: &DatabasePool) -> Self {
        Self::new(pool.get_pool().clone())
    }
}

#[async_trait]
impl Store for PgStore {
    type Session = PgSession;

    async fn begin(&self) -> DomainResult<PgSession> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_failure(&e, Some("begin")))?;
        Ok(PgSession::new(tx))
    }
}
