//! Core application framework functionality.

use crate::config::ApplicationConfig;
use crate::error::LifecycleError;
use crate::manager::{LifecycleManager, ServiceManager};
use crate::provider::ProviderPtr;
use orchard_di::container::Container;
use orchard_di::error::{convert_error, ErrorPtr};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Application is already bootstrapped")]
    AlreadyBootstrapped,
    #[error("Application must be bootstrapped before booting")]
    NotBootstrapped,
    #[error("Application is already booted")]
    AlreadyBooted,
    #[error("Error loading configuration: {0}")]
    ConfigError(#[source] ErrorPtr),
    #[error(transparent)]
    LifecycleError(#[from] LifecycleError),
}

/// Lifecycle state of an [Application].
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ApplicationState {
    #[default]
    Idle,
    Bootstrapped,
    Running,
}

/// Main entrypoint for the application. Registers and boots
/// [ServiceProviders](crate::provider::ServiceProvider) using a [LifecycleManager], and shuts them
/// down afterwards. An application which has been shut down returns to the initial state and can
/// be run again.
pub struct Application<LM: LifecycleManager = ServiceManager> {
    manager: LM,
    state: ApplicationState,
}

impl<LM: LifecycleManager> Application<LM> {
    pub fn new(manager: LM) -> Self {
        Self {
            manager,
            state: ApplicationState::Idle,
        }
    }

    /// Queues a provider. Can be called in any state.
    pub fn register(&mut self, provider: ProviderPtr) -> &mut Self {
        self.manager.register_provider(provider);
        self
    }

    /// Registers all queued providers.
    pub async fn bootstrap(&mut self) -> Result<(), ApplicationError> {
        if self.state != ApplicationState::Idle {
            return Err(ApplicationError::AlreadyBootstrapped);
        }

        info!("Bootstrapping application...");

        self.manager.register_all().await?;
        self.state = ApplicationState::Bootstrapped;

        Ok(())
    }

    /// Boots registered providers.
    pub async fn boot(&mut self) -> Result<(), ApplicationError> {
        match self.state {
            ApplicationState::Idle => Err(ApplicationError::NotBootstrapped),
            ApplicationState::Running => Err(ApplicationError::AlreadyBooted),
            ApplicationState::Bootstrapped => {
                info!("Booting application...");

                self.manager.boot_all().await?;
                self.state = ApplicationState::Running;

                info!("Application is running.");

                Ok(())
            }
        }
    }

    /// Shuts all providers down. The application always returns to [ApplicationState::Idle], even
    /// if some providers failed to shut down. Does nothing if the application is idle.
    pub async fn shutdown(&mut self) -> Result<(), ApplicationError> {
        if self.state == ApplicationState::Idle {
            return Ok(());
        }

        info!("Shutting down application...");

        let result = self.manager.shutdown_all().await;
        self.state = ApplicationState::Idle;

        result.map_err(ApplicationError::from)
    }

    /// Bootstraps and boots the application.
    pub async fn run(&mut self) -> Result<(), ApplicationError> {
        self.bootstrap().await?;
        self.boot().await
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == ApplicationState::Running
    }

    #[inline]
    pub fn state(&self) -> ApplicationState {
        self.state
    }

    #[inline]
    pub fn manager(&self) -> &LM {
        &self.manager
    }

    #[inline]
    pub fn manager_mut(&mut self) -> &mut LM {
        &mut self.manager
    }
}

impl Application<ServiceManager> {
    /// Creates an application configured with given [ApplicationConfig].
    pub fn with_config(config: &ApplicationConfig) -> Self {
        if config.install_tracing_logger {
            install_tracing_logger();
        }

        Self::new(ServiceManager::new(Container::with_definition_overriding(
            config.allow_definition_overriding,
        )))
    }

    /// Creates an application configured from the environment. See [crate::config].
    pub fn from_environment() -> Result<Self, ApplicationError> {
        ApplicationConfig::init_from_environment()
            .map(|config| Self::with_config(&config))
            .map_err(|error| ApplicationError::ConfigError(convert_error(error)))
    }
}

impl Default for Application<ServiceManager> {
    fn default() -> Self {
        Self::new(ServiceManager::default())
    }
}

fn install_tracing_logger() {
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        debug!("Keeping existing tracing subscriber: {error}");
    }
}

#[cfg(test)]
mod tests {
    use crate::application::{Application, ApplicationError, ApplicationState};
    use crate::error::{LifecycleError, ServiceShutdownFailure};
    use crate::manager::MockLifecycleManager;
    use futures::FutureExt;
    use orchard_di::error::ErrorPtr;
    use std::fmt::{Display, Formatter};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError;

    impl Display for TestError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("test error")
        }
    }

    impl std::error::Error for TestError {}

    fn succeeding_manager() -> MockLifecycleManager {
        let mut manager = MockLifecycleManager::new();
        manager
            .expect_register_all()
            .returning(|| async { Ok(()) }.boxed());
        manager
            .expect_boot_all()
            .returning(|| async { Ok(()) }.boxed());
        manager
            .expect_shutdown_all()
            .returning(|| async { Ok(()) }.boxed());
        manager
    }

    #[tokio::test]
    async fn should_run_and_shut_down() {
        let mut application = Application::new(succeeding_manager());

        application.run().await.unwrap();
        assert!(application.is_running());

        application.shutdown().await.unwrap();
        assert!(!application.is_running());
        assert_eq!(application.state(), ApplicationState::Idle);

        application.run().await.unwrap();
        assert!(application.is_running());
    }

    #[tokio::test]
    async fn should_require_bootstrap_before_boot() {
        let mut manager = MockLifecycleManager::new();
        manager.expect_boot_all().never();

        let mut application = Application::new(manager);

        assert!(matches!(
            application.boot().await.unwrap_err(),
            ApplicationError::NotBootstrapped
        ));
        assert_eq!(application.state(), ApplicationState::Idle);
    }

    #[tokio::test]
    async fn should_reject_repeated_transitions() {
        let mut application = Application::new(succeeding_manager());

        application.bootstrap().await.unwrap();
        assert!(matches!(
            application.bootstrap().await.unwrap_err(),
            ApplicationError::AlreadyBootstrapped
        ));

        application.boot().await.unwrap();
        assert!(matches!(
            application.boot().await.unwrap_err(),
            ApplicationError::AlreadyBooted
        ));
        assert!(matches!(
            application.bootstrap().await.unwrap_err(),
            ApplicationError::AlreadyBootstrapped
        ));
    }

    #[tokio::test]
    async fn should_ignore_shutdown_when_idle() {
        let mut manager = MockLifecycleManager::new();
        manager.expect_shutdown_all().never();

        let mut application = Application::new(manager);
        application.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn should_stay_idle_on_bootstrap_error() {
        let mut manager = MockLifecycleManager::new();
        manager.expect_register_all().times(1).returning(|| {
            async {
                Err(LifecycleError::ServiceRegistrationFailure {
                    provider: "test".to_string(),
                    cause: Arc::new(TestError) as ErrorPtr,
                })
            }
            .boxed()
        });

        let mut application = Application::new(manager);

        assert!(matches!(
            application.run().await.unwrap_err(),
            ApplicationError::LifecycleError(LifecycleError::ServiceRegistrationFailure { .. })
        ));
        assert_eq!(application.state(), ApplicationState::Idle);
    }

    #[tokio::test]
    async fn should_reset_state_on_shutdown_error() {
        let mut manager = MockLifecycleManager::new();
        manager
            .expect_register_all()
            .returning(|| async { Ok(()) }.boxed());
        manager
            .expect_boot_all()
            .returning(|| async { Ok(()) }.boxed());
        manager.expect_shutdown_all().times(1).returning(|| {
            async {
                Err(LifecycleError::GroupedShutdownFailure(vec![
                    ServiceShutdownFailure::new("test".to_string(), Arc::new(TestError)),
                ]))
            }
            .boxed()
        });

        let mut application = Application::new(manager);
        application.run().await.unwrap();

        assert!(matches!(
            application.shutdown().await.unwrap_err(),
            ApplicationError::LifecycleError(LifecycleError::GroupedShutdownFailure(failures))
                if failures.len() == 1
        ));
        assert_eq!(application.state(), ApplicationState::Idle);
    }

    #[tokio::test]
    async fn should_shut_down_after_failed_boot() {
        let mut manager = MockLifecycleManager::new();
        manager
            .expect_register_all()
            .returning(|| async { Ok(()) }.boxed());
        manager.expect_boot_all().times(1).returning(|| {
            async { Err(LifecycleError::DuplicateProviderName("x".to_string())) }.boxed()
        });
        manager
            .expect_shutdown_all()
            .times(1)
            .returning(|| async { Ok(()) }.boxed());

        let mut application = Application::new(manager);

        assert!(application.run().await.is_err());
        assert_eq!(application.state(), ApplicationState::Bootstrapped);

        application.shutdown().await.unwrap();
        assert_eq!(application.state(), ApplicationState::Idle);
    }

    #[test]
    fn should_queue_providers_in_any_state() {
        let mut manager = MockLifecycleManager::new();
        manager.expect_register_provider().times(2).return_const(());

        let mut application = Application::new(manager);
        application
            .register(Arc::new(crate::provider::FnProvider::named("a")))
            .register(Arc::new(crate::provider::FnProvider::named("b")));
    }
}
