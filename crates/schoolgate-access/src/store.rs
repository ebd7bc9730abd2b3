//! The committed configuration and its persistence.
//!
//! `ConfigurationStore` owns the only committed copy of the configuration.
//! Readers take cheap `Arc` snapshots through [`ConfigurationStore::evaluator`];
//! the single writer path is an edit session commit.
//!
//! # Lifecycle
//!
//! ```ignore
//! let store = ConfigurationStore::init(backend, "schoolgate", defaults::shipped()).await?;
//! let evaluator = store.evaluator();
//! // ... read many, commit rarely ...
//! store.flush().await?;
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use schoolgate_core::{BlobStore, StoreError};
use tracing::{debug, info, instrument, warn};

use crate::config::AccessConfig;
use crate::error::ConfigError;
use crate::evaluator::AccessEvaluator;
use crate::keys::ConfigKey;
use crate::visibility::LoadOutcome;

#[derive(Debug)]
struct Committed {
    config: Arc<AccessConfig>,
    generation: u64,
    fingerprint: String,
}

pub struct ConfigurationStore {
    backend: Arc<dyn BlobStore>,
    key_prefix: String,
    defaults: Arc<AccessConfig>,
    committed: RwLock<Committed>,
}

impl std::fmt::Debug for ConfigurationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationStore")
            .field("backend", &self.backend.backend())
            .field("key_prefix", &self.key_prefix)
            .field("generation", &self.generation())
            .finish()
    }
}

impl ConfigurationStore {
    /// Load all six parts from `backend`, merging each over `defaults`.
    ///
    /// Malformed parts fall back to defaults and are logged, never returned as
    /// errors. A backend that cannot be read at all is an error.
    #[instrument(skip(backend, defaults), fields(backend = backend.backend()))]
    pub async fn init(
        backend: Arc<dyn BlobStore>,
        key_prefix: &str,
        defaults: AccessConfig,
    ) -> Result<Self, ConfigError> {
        let mut stored = Vec::with_capacity(ConfigKey::ALL.len());
        for key in ConfigKey::ALL {
            let bytes = backend.load(&key.storage_key(key_prefix)).await?;
            stored.push((key, bytes));
        }

        let (config, outcomes) = AccessConfig::from_parts(
            |key| {
                stored
                    .iter_mut()
                    .find(|(k, _)| *k == key)
                    .and_then(|(_, bytes)| bytes.take())
            },
            &defaults,
        );

        for (key, outcome) in outcomes {
            match outcome {
                LoadOutcome::Absent => debug!(%key, "No stored configuration, using defaults"),
                LoadOutcome::Loaded => debug!(%key, "Stored configuration loaded"),
                LoadOutcome::Malformed(reason) => {
                    warn!(%key, %reason, "Malformed stored configuration, using defaults")
                }
            }
        }

        let fingerprint = config.fingerprint()?;
        info!(%fingerprint, "Access configuration initialized");

        Ok(Self {
            backend,
            key_prefix: key_prefix.to_string(),
            defaults: Arc::new(defaults),
            committed: RwLock::new(Committed {
                config: Arc::new(config),
                generation: 0,
                fingerprint,
            }),
        })
    }

    /// The committed configuration.
    pub fn snapshot(&self) -> Arc<AccessConfig> {
        Arc::clone(&self.read().config)
    }

    /// A read-path view of the committed configuration as of now.
    pub fn evaluator(&self) -> AccessEvaluator {
        let committed = self.read();
        AccessEvaluator::new(
            Arc::clone(&committed.config),
            committed.generation,
            committed.fingerprint.clone(),
        )
    }

    /// Bumped once per commit that changed at least one part.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    pub fn fingerprint(&self) -> String {
        self.read().fingerprint.clone()
    }

    pub fn defaults(&self) -> Arc<AccessConfig> {
        Arc::clone(&self.defaults)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend()
    }

    /// Re-persist the committed configuration under all six keys.
    #[instrument(skip(self), fields(backend = self.backend.backend()))]
    pub async fn flush(&self) -> Result<(), ConfigError> {
        let payloads = self.snapshot().payloads()?;
        for (key, payload) in payloads {
            self.write_part(key, &payload).await?;
        }
        info!("Access configuration flushed");
        Ok(())
    }

    pub(crate) async fn write_part(&self, key: ConfigKey, payload: &[u8]) -> Result<(), StoreError> {
        self.backend
            .save(&key.storage_key(&self.key_prefix), payload)
            .await
    }

    /// Publish the parts named in `keys` from `source` as the new committed
    /// configuration. Returns the resulting generation and fingerprint.
    pub(crate) fn publish(
        &self,
        source: &AccessConfig,
        keys: &[ConfigKey],
    ) -> Result<(u64, String), serde_json::Error> {
        let mut committed = self.committed.write().unwrap_or_else(PoisonError::into_inner);
        if keys.is_empty() {
            return Ok((committed.generation, committed.fingerprint.clone()));
        }

        let mut next = AccessConfig::clone(&committed.config);
        for key in keys {
            next.copy_part_from(source, *key);
        }
        let fingerprint = next.fingerprint()?;

        committed.config = Arc::new(next);
        committed.generation += 1;
        committed.fingerprint = fingerprint.clone();

        Ok((committed.generation, fingerprint))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Committed> {
        self.committed.read().unwrap_or_else(PoisonError::into_inner)
    }
}
