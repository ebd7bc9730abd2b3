use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use schoolgate_access::{ConfigurationStore, EditSessionController, defaults};
use schoolgate_config::{CorsConfig, JwtConfig, ServerConfig, StorageConfig};
use schoolgate_observability::PrometheusHandle;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1800);

/// An open editor plus the last time a request touched it.
pub struct OpenSession {
    controller: EditSessionController,
    last_active: Instant,
}

impl OpenSession {
    pub fn new(controller: EditSessionController) -> Self {
        Self {
            controller,
            last_active: Instant::now(),
        }
    }

    pub fn controller(&self) -> &EditSessionController {
        &self.controller
    }

    /// Mutable access counts as activity.
    pub fn controller_mut(&mut self) -> &mut EditSessionController {
        self.last_active = Instant::now();
        &mut self.controller
    }
}

/// Open edit sessions keyed by the editor's token subject.
///
/// Sessions untouched for longer than the idle timeout are dropped the next
/// time the registry is locked.
#[derive(Clone)]
pub struct SessionRegistry {
    open: Arc<Mutex<HashMap<String, OpenSession>>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            open: Arc::default(),
            idle_timeout,
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, HashMap<String, OpenSession>> {
        let mut open = self.open.lock().await;
        let timeout = self.idle_timeout;
        open.retain(|editor, session| {
            let live = session.last_active.elapsed() < timeout;
            if !live {
                info!(editor = %editor, "Idle edit session dropped");
            }
            live
        });
        open
    }

    /// Remove the editor's session so slow work can run without the lock.
    pub async fn take(&self, editor: &str) -> Option<OpenSession> {
        self.lock().await.remove(editor)
    }

    /// Put a taken session back unless the editor opened a new one meanwhile.
    pub async fn restore(&self, editor: &str, session: OpenSession) {
        self.lock()
            .await
            .entry(editor.to_string())
            .or_insert(session);
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigurationStore>,
    pub sessions: SessionRegistry,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: ConfigurationStore, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            store: Arc::new(store),
            sessions: SessionRegistry::default(),
            jwt_config,
            cors_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<PrometheusHandle>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_session_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.sessions = SessionRegistry::new(idle_timeout);
        self
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let store = schoolgate_cli::open_store(&StorageConfig::from_env(), defaults::shipped()).await?;
    let server_config = ServerConfig::from_env();

    Ok(
        AppState::new(store, JwtConfig::from_env(), CorsConfig::from_env())
            .with_metrics(schoolgate_observability::init_metrics())
            .with_session_idle_timeout(Duration::from_secs(server_config.session_idle_timeout)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolgate_core::MemoryBlobStore;
    use schoolgate_models::RoleKey;

    async fn store() -> ConfigurationStore {
        ConfigurationStore::init(Arc::new(MemoryBlobStore::new()), "t", defaults::shipped())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_idle_sessions_are_pruned_on_lock() {
        let store = store().await;
        let registry = SessionRegistry::new(Duration::ZERO);
        registry.open.lock().await.insert(
            "a-1".to_string(),
            OpenSession::new(EditSessionController::for_store("a-1", RoleKey::Admin, &store)),
        );

        assert!(registry.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_restore_keeps_a_newer_session() {
        let store = store().await;
        let registry = SessionRegistry::default();
        let session = |role| OpenSession::new(EditSessionController::for_store("a-1", role, &store));

        registry.lock().await.insert("a-1".to_string(), session(RoleKey::Admin));
        let taken = registry.take("a-1").await.unwrap();
        assert!(registry.lock().await.is_empty());

        registry.lock().await.insert("a-1".to_string(), session(RoleKey::SuperAdmin));
        registry.restore("a-1", taken).await;

        let open = registry.lock().await;
        assert_eq!(open["a-1"].controller().role(), RoleKey::SuperAdmin);
    }
}
