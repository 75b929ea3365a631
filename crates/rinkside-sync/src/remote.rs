//! `Dragonfly` + NATS implementation of [`SharedStore`].
//!
//! `Dragonfly` holds the records; NATS carries change notifications so
//! viewers do not poll. Every write republishes the full record on the
//! game's subject, and a deletion publishes an empty payload.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `game:{code}` | JSON | Shared game record, expires without heartbeat |
//! | `game:{code}:viewers` | Set | Registered viewer ids |
//!
//! # Subjects
//!
//! | Subject | Payload |
//! |---------|---------|
//! | `rinkside.game.{code}` | Full record JSON, or empty when deleted |

use std::time::Duration;

use async_trait::async_trait;
use fred::prelude::*;
use futures::StreamExt as _;
use rinkside_types::{GameCode, SharedGameRecord, SharedGameUpdate};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::store::{RemoteChange, SUBSCRIPTION_BUFFER, SharedStore, Subscription};

fn record_key(code: &GameCode) -> String {
    format!("game:{code}")
}

fn viewers_key(code: &GameCode) -> String {
    format!("game:{code}:viewers")
}

fn subject(code: &GameCode) -> String {
    format!("rinkside.game.{code}")
}

fn ttl_secs(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1)
}

/// Shared store backed by `Dragonfly` for state and NATS for fan-out.
#[derive(Clone)]
pub struct RemoteStore {
    redis: Client,
    nats: async_nats::Client,
}

impl RemoteStore {
    /// Wrap already-connected clients.
    pub const fn new(redis: Client, nats: async_nats::Client) -> Self {
        Self { redis, nats }
    }

    /// Connect to `Dragonfly` and NATS.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the `Dragonfly` URL cannot be parsed,
    /// [`SyncError::Dragonfly`] or [`SyncError::Nats`] if either connection
    /// fails.
    pub async fn connect(dragonfly_url: &str, nats_url: &str) -> Result<Self, SyncError> {
        let config = Config::from_url(dragonfly_url)
            .map_err(|e| SyncError::Config(format!("Invalid Dragonfly URL: {e}")))?;
        let redis = Builder::from_config(config).build()?;
        redis.init().await?;

        let nats = async_nats::connect(nats_url)
            .await
            .map_err(|e| SyncError::Nats(format!("failed to connect to {nats_url}: {e}")))?;

        info!(dragonfly = dragonfly_url, nats = nats_url, "Connected shared store");
        Ok(Self { redis, nats })
    }

    async fn read_raw(&self, code: &GameCode) -> Result<Option<SharedGameRecord>, SyncError> {
        let value: Option<String> = self.redis.get(record_key(code)).await?;
        value
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(SyncError::from)
    }

    async fn viewer_count(&self, code: &GameCode) -> Result<u32, SyncError> {
        let count: u32 = self.redis.scard(viewers_key(code)).await?;
        Ok(count)
    }

    async fn read(&self, code: &GameCode) -> Result<Option<SharedGameRecord>, SyncError> {
        let Some(mut record) = self.read_raw(code).await? else {
            return Ok(None);
        };
        record.viewer_count = self.viewer_count(code).await?;
        Ok(Some(record))
    }

    async fn announce(&self, code: &GameCode, payload: Vec<u8>) -> Result<(), SyncError> {
        let subject = subject(code);
        self.nats
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| SyncError::Nats(format!("failed to publish on {subject}: {e}")))?;
        self.nats
            .flush()
            .await
            .map_err(|e| SyncError::Nats(format!("failed to flush NATS: {e}")))?;
        Ok(())
    }

    async fn announce_current(&self, code: &GameCode) -> Result<(), SyncError> {
        if let Some(record) = self.read(code).await? {
            self.announce(code, serde_json::to_vec(&record)?).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SharedStore for RemoteStore {
    async fn put(
        &self,
        code: &GameCode,
        record: &SharedGameRecord,
        ttl: Duration,
    ) -> Result<(), SyncError> {
        let json = serde_json::to_string(record)?;
        let _: () = self
            .redis
            .set(
                record_key(code),
                json.as_str(),
                Some(Expiration::EX(ttl_secs(ttl))),
                None,
                false,
            )
            .await?;
        self.announce_current(code).await
    }

    async fn update(&self, code: &GameCode, update: &SharedGameUpdate) -> Result<(), SyncError> {
        let mut record = self
            .read_raw(code)
            .await?
            .ok_or_else(|| SyncError::NotFound(code.to_string()))?;
        update.apply_to(&mut record);
        let json = serde_json::to_string(&record)?;
        let _: () = self
            .redis
            .set(
                record_key(code),
                json.as_str(),
                Some(Expiration::KEEPTTL),
                None,
                false,
            )
            .await?;
        record.viewer_count = self.viewer_count(code).await?;
        self.announce(code, serde_json::to_vec(&record)?).await
    }

    async fn get(&self, code: &GameCode) -> Result<Option<SharedGameRecord>, SyncError> {
        self.read(code).await
    }

    async fn exists(&self, code: &GameCode) -> Result<bool, SyncError> {
        let count: u32 = self.redis.exists(record_key(code)).await?;
        Ok(count > 0)
    }

    async fn delete(&self, code: &GameCode) -> Result<(), SyncError> {
        let _: u32 = self
            .redis
            .del(vec![record_key(code), viewers_key(code)])
            .await?;
        self.announce(code, Vec::new()).await
    }

    async fn subscribe(&self, code: &GameCode) -> Result<Subscription, SyncError> {
        let subject = subject(code);
        let mut feed = self
            .nats
            .subscribe(subject.clone())
            .await
            .map_err(|e| SyncError::Nats(format!("failed to subscribe to {subject}: {e}")))?;

        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let task = tokio::spawn(async move {
            while let Some(msg) = feed.next().await {
                let change = if msg.payload.is_empty() {
                    RemoteChange::Deleted
                } else {
                    match serde_json::from_slice::<SharedGameRecord>(&msg.payload) {
                        Ok(record) => RemoteChange::Updated(Box::new(record)),
                        Err(e) => {
                            warn!(subject = %subject, error = %e, "Dropping malformed game record");
                            continue;
                        }
                    }
                };
                if tx.send(change).await.is_err() {
                    break;
                }
            }
            debug!(subject = %subject, "Game subscription closed");
            let _ = feed.unsubscribe().await;
        });
        Ok(Subscription::new(rx, task))
    }

    async fn heartbeat(&self, code: &GameCode, ttl: Duration) -> Result<(), SyncError> {
        let secs = ttl_secs(ttl);
        let refreshed: bool = self.redis.expire(record_key(code), secs, None).await?;
        if !refreshed {
            return Err(SyncError::NotFound(code.to_string()));
        }
        let _: bool = self.redis.expire(viewers_key(code), secs, None).await?;
        Ok(())
    }

    async fn register_viewer(&self, code: &GameCode, viewer_id: &str) -> Result<u32, SyncError> {
        if !self.exists(code).await? {
            return Err(SyncError::NotFound(code.to_string()));
        }
        let _: u32 = self.redis.sadd(viewers_key(code), viewer_id).await?;
        self.announce_current(code).await?;
        self.viewer_count(code).await
    }

    async fn remove_viewer(&self, code: &GameCode, viewer_id: &str) -> Result<u32, SyncError> {
        let removed: u32 = self.redis.srem(viewers_key(code), viewer_id).await?;
        if removed > 0 {
            self.announce_current(code).await?;
        }
        self.viewer_count(code).await
    }
}
