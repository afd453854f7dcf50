use std::sync::{Arc, LazyLock};

use crate::app::{
    delete_app, get_app, initialize_app, ConnectionConfig, FirebaseApp, FirebaseAppSettings,
    DEFAULT_ENTRY_NAME,
};
use crate::bootstrap::constants::{AUTH_COMPONENT_NAME, BOOTSTRAP_LOG_MESSAGE};
use crate::bootstrap::error::{
    duplicate_initialization, invalid_config, BootstrapResult, InitializationErrorCode,
};
use crate::firestore::{get_firestore, Firestore};
use crate::logger::Logger;
use crate::platform::environment::connection_config_from_env;

pub static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@firebase/bootstrap"));

/// Brings up the app and its Firestore service from one credential record,
/// leaving Auth unregistered.
#[derive(Clone, Debug)]
pub struct ConfigBootstrap {
    config: ConnectionConfig,
    settings: FirebaseAppSettings,
    logger: Logger,
}

impl ConfigBootstrap {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            settings: FirebaseAppSettings::default(),
            logger: LOGGER.clone(),
        }
    }

    /// Builds a bootstrap from the credentials found in the environment.
    pub fn from_env() -> BootstrapResult<Self> {
        Ok(Self::new(connection_config_from_env()?))
    }

    pub fn with_settings(mut self, settings: FirebaseAppSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn app_name(&self) -> &str {
        self.settings.name.as_deref().unwrap_or(DEFAULT_ENTRY_NAME)
    }

    /// Registers the app and resolves Firestore.
    ///
    /// Fails if any field is empty, if the app name is already taken, or if
    /// Firestore refuses the project; in the last case the app registration
    /// is rolled back. Logs [`BOOTSTRAP_LOG_MESSAGE`] once on success.
    pub fn initialize(&self) -> BootstrapResult<ClientHandle> {
        let missing = self.config.missing_fields();
        if !missing.is_empty() {
            return Err(invalid_config(format!(
                "Firebase configuration is missing {}",
                missing.join(", ")
            )));
        }

        let app = initialize_app(self.config.clone(), Some(self.settings.clone()))?;
        let firestore = match get_firestore(Some(app.clone())) {
            Ok(firestore) => firestore,
            Err(err) => {
                delete_app(&app)?;
                return Err(err.into());
            }
        };

        self.logger.info(BOOTSTRAP_LOG_MESSAGE);
        Ok(ClientHandle { app, firestore })
    }

    /// Initialize-if-absent: hands back the registered app when it was
    /// created from the same configuration, otherwise initializes it.
    pub fn get_or_initialize(&self) -> BootstrapResult<ClientHandle> {
        match self.initialize() {
            Err(err) if err.code == InitializationErrorCode::DuplicateInitialization => {
                self.attach_existing()
            }
            other => other,
        }
    }

    fn attach_existing(&self) -> BootstrapResult<ClientHandle> {
        let app = get_app(Some(self.app_name()))
            .map_err(|err| duplicate_initialization(err.to_string()))?;

        let same_settings = app.automatic_data_collection_enabled()
            == self.settings.automatic_data_collection_enabled.unwrap_or(true);
        if app.options() != &self.config || !same_settings {
            return Err(duplicate_initialization(format!(
                "Firebase App named '{}' is already initialized with a different configuration",
                app.name()
            )));
        }

        let firestore = get_firestore(Some(app.clone()))?;
        Ok(ClientHandle { app, firestore })
    }
}

/// Initializes the default app from `config`. See [`ConfigBootstrap::initialize`].
pub fn initialize(config: ConnectionConfig) -> BootstrapResult<ClientHandle> {
    ConfigBootstrap::new(config).initialize()
}

/// Read-only access to the initialized storage client. Clones share state.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    app: FirebaseApp,
    firestore: Arc<Firestore>,
}

impl ClientHandle {
    pub fn app(&self) -> &FirebaseApp {
        &self.app
    }

    pub fn firestore(&self) -> &Firestore {
        &self.firestore
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.app.options()
    }

    /// Whether an Auth service was registered or created on the app.
    /// Does not add an `auth` provider to the container.
    pub fn auth_started(&self) -> bool {
        self.app
            .container()
            .find_provider(AUTH_COMPONENT_NAME)
            .is_some_and(|provider| provider.is_component_set() || provider.is_initialized())
    }

    pub fn is_same_client(&self, other: &ClientHandle) -> bool {
        self.app.ptr_eq(&other.app)
    }

    /// Deletes the app. Other clones of this handle become stale.
    pub fn shutdown(self) -> BootstrapResult<()> {
        delete_app(&self.app)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppError;
    use crate::logger::LogLevel;
    use crate::test_support::default_app_guard;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Barrier, Mutex};
    use std::thread;

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn sample_config() -> ConnectionConfig {
        ConnectionConfig::new(
            "demo-api-key",
            "ecobazaar-demo.firebaseapp.com",
            "ecobazaar-demo",
            "ecobazaar-demo.firebasestorage.app",
            "321134139960",
            "1:321134139960:web:0123456789abcdef",
            "G-DEMO0000",
        )
    }

    fn config_with_project(project_id: &str) -> ConnectionConfig {
        let base = sample_config();
        ConnectionConfig::new(
            base.api_key(),
            base.auth_domain(),
            project_id,
            base.storage_bucket(),
            base.messaging_sender_id(),
            base.app_id(),
            base.measurement_id(),
        )
    }

    fn unique_settings() -> FirebaseAppSettings {
        FirebaseAppSettings {
            name: Some(format!("bootstrap-{}", COUNTER.fetch_add(1, Ordering::SeqCst))),
            ..Default::default()
        }
    }

    fn capturing_logger() -> (Logger, Arc<Mutex<Vec<(LogLevel, String)>>>) {
        let logger = Logger::new("@firebase/bootstrap-test");
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        logger.set_log_handler(move |_, record| {
            sink.lock()
                .unwrap()
                .push((record.level, record.message.clone()));
        });
        (logger, records)
    }

    fn bootstrap_messages(records: &Mutex<Vec<(LogLevel, String)>>) -> usize {
        records
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, message)| *level == LogLevel::Info && message == BOOTSTRAP_LOG_MESSAGE)
            .count()
    }

    #[test]
    fn default_app_initializes_once_and_logs_once() {
        let _guard = default_app_guard();
        let (logger, records) = capturing_logger();
        let bootstrap = ConfigBootstrap::new(sample_config()).with_logger(logger);

        let handle = bootstrap.initialize().expect("bootstrap");
        assert_eq!(handle.app().name(), DEFAULT_ENTRY_NAME);
        assert_eq!(handle.firestore().project_id(), "ecobazaar-demo");
        assert_eq!(bootstrap_messages(&records), 1);

        let err = bootstrap.initialize().unwrap_err();
        assert_eq!(err.code, InitializationErrorCode::DuplicateInitialization);
        assert_eq!(bootstrap_messages(&records), 1);

        handle.shutdown().unwrap();
    }

    #[test]
    fn free_initialize_uses_default_app() {
        let _guard = default_app_guard();
        let handle = initialize(sample_config()).expect("bootstrap");
        assert!(get_app(None).unwrap().ptr_eq(handle.app()));
        handle.shutdown().unwrap();
        assert!(matches!(get_app(None), Err(AppError::NoApp { .. })));
    }

    #[test]
    fn empty_project_id_is_invalid_config() {
        let settings = unique_settings();
        let name = settings.name.clone().unwrap();
        let err = ConfigBootstrap::new(config_with_project(""))
            .with_settings(settings)
            .initialize()
            .unwrap_err();
        assert_eq!(err.code, InitializationErrorCode::InvalidConfig);
        assert!(err.message().contains("projectId"));
        assert!(matches!(get_app(Some(&name)), Err(AppError::NoApp { .. })));
    }

    #[test]
    fn malformed_project_id_is_rejected_and_rolled_back() {
        for bad in ["eco bazaar", "eco?bazaar", "eco#bazaar"] {
            let settings = unique_settings();
            let name = settings.name.clone().unwrap();
            let (logger, records) = capturing_logger();
            let err = ConfigBootstrap::new(config_with_project(bad))
                .with_settings(settings.clone())
                .with_logger(logger)
                .initialize()
                .unwrap_err();
            assert_eq!(err.code, InitializationErrorCode::SdkRejected, "{bad}");
            assert_eq!(bootstrap_messages(&records), 0, "{bad}");
            assert!(matches!(get_app(Some(&name)), Err(AppError::NoApp { .. })));

            let handle = ConfigBootstrap::new(sample_config())
                .with_settings(settings)
                .initialize()
                .expect("retry with a valid project");
            handle.shutdown().unwrap();
        }
    }

    #[test]
    fn auth_is_never_started() {
        let handle = ConfigBootstrap::new(sample_config())
            .with_settings(unique_settings())
            .initialize()
            .unwrap();
        assert!(!handle.auth_started());
        assert!(handle
            .app()
            .container()
            .find_provider(AUTH_COMPONENT_NAME)
            .is_none());
        assert!(handle.app().container().get_provider("firestore").is_initialized());
        handle.shutdown().unwrap();
    }

    #[test]
    fn shutdown_allows_a_fresh_initialize() {
        let bootstrap = ConfigBootstrap::new(sample_config()).with_settings(unique_settings());
        let first = bootstrap.initialize().unwrap();
        let stale = first.clone();
        first.shutdown().unwrap();
        assert!(stale.app().is_deleted());

        let second = bootstrap.initialize().unwrap();
        assert!(!second.is_same_client(&stale));
        second.shutdown().unwrap();
    }

    #[test]
    fn concurrent_initialize_has_exactly_one_winner() {
        let bootstrap = ConfigBootstrap::new(sample_config()).with_settings(unique_settings());
        let barrier = Arc::new(Barrier::new(6));
        let workers: Vec<_> = (0..6)
            .map(|_| {
                let bootstrap = bootstrap.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    bootstrap.initialize()
                })
            })
            .collect();
        let results: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| err.code == InitializationErrorCode::DuplicateInitialization));
        winners[0].clone().shutdown().unwrap();
    }

    #[test]
    fn concurrent_get_or_initialize_shares_one_client() {
        let (logger, records) = capturing_logger();
        let bootstrap = ConfigBootstrap::new(sample_config())
            .with_settings(unique_settings())
            .with_logger(logger);
        let barrier = Arc::new(Barrier::new(6));
        let workers: Vec<_> = (0..6)
            .map(|_| {
                let bootstrap = bootstrap.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    bootstrap.get_or_initialize()
                })
            })
            .collect();
        let handles: Vec<_> = workers
            .into_iter()
            .map(|w| w.join().unwrap().expect("shared client"))
            .collect();

        assert!(handles.iter().all(|h| h.is_same_client(&handles[0])));
        assert!(handles
            .iter()
            .all(|h| std::ptr::eq(h.firestore(), handles[0].firestore())));
        assert_eq!(bootstrap_messages(&records), 1);
        handles[0].clone().shutdown().unwrap();
    }

    #[test]
    fn get_or_initialize_refuses_a_different_config() {
        let settings = unique_settings();
        let handle = ConfigBootstrap::new(sample_config())
            .with_settings(settings.clone())
            .initialize()
            .unwrap();

        let err = ConfigBootstrap::new(config_with_project("other-project"))
            .with_settings(settings)
            .get_or_initialize()
            .unwrap_err();
        assert_eq!(err.code, InitializationErrorCode::DuplicateInitialization);
        handle.shutdown().unwrap();
    }
}
