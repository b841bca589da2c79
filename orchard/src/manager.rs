//! Lifecycle orchestration of [ServiceProvider](crate::provider::ServiceProvider)s.
//!
//! Providers go through three phases, each processed strictly sequentially:
//!
//! 1. registration - in the order providers were queued; the first failure aborts the phase
//! 2. boot - in dependency order; the first failure aborts the phase
//! 3. shutdown - in reverse dependency order; failures are collected and every provider gets a
//! chance to clean up

use crate::boot_order::boot_order;
use crate::error::{LifecycleError, ServiceShutdownFailure};
use crate::naming::ProviderNamer;
use crate::provider::{ManagedProvider, ProviderPtr};
#[cfg(test)]
use mockall::automock;
use orchard_di::container::Container;
use orchard_di::future::{BoxFuture, FutureExt};
use std::collections::VecDeque;
use tracing::{debug, info, trace, warn};

/// Drives providers through lifecycle phases. The [Application](crate::application::Application)
/// uses this trait to manage its state.
#[cfg_attr(test, automock)]
pub trait LifecycleManager {
    /// Queues a provider for registration. No validation takes place at this point.
    fn register_provider(&mut self, provider: ProviderPtr);

    /// Registers all queued providers in FIFO order.
    fn register_all(&mut self) -> BoxFuture<'_, Result<(), LifecycleError>>;

    /// Boots registered providers in dependency order.
    fn boot_all(&mut self) -> BoxFuture<'_, Result<(), LifecycleError>>;

    /// Shuts registered providers down in reverse dependency order and resets all state.
    fn shutdown_all(&mut self) -> BoxFuture<'_, Result<(), LifecycleError>>;
}

/// Default [LifecycleManager] owning the [Container] shared by all its providers.
#[derive(Default)]
pub struct ServiceManager {
    container: Container,
    namer: ProviderNamer,
    pending: VecDeque<ManagedProvider>,
    registered: Vec<ManagedProvider>,
    booted: Vec<ManagedProvider>,
}

impl ServiceManager {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            namer: Default::default(),
            pending: Default::default(),
            registered: Default::default(),
            booted: Default::default(),
        }
    }

    #[inline]
    pub fn container(&self) -> &Container {
        &self.container
    }

    #[inline]
    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Names of providers waiting for registration.
    pub fn pending_providers(&self) -> Vec<&str> {
        self.pending.iter().map(ManagedProvider::name).collect()
    }

    /// Names of registered providers, in registration order.
    pub fn registered_providers(&self) -> Vec<&str> {
        self.registered.iter().map(ManagedProvider::name).collect()
    }

    /// Names of providers which have been booted successfully, in boot order.
    pub fn booted_providers(&self) -> Vec<&str> {
        self.booted.iter().map(ManagedProvider::name).collect()
    }

    /// Names of registered providers in the order they would be booted.
    pub fn boot_order(&self) -> Result<Vec<&str>, LifecycleError> {
        boot_order(&self.registered).map(|order| {
            order
                .into_iter()
                .map(|index| self.registered[index].name())
                .collect()
        })
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.registered.clear();
        self.booted.clear();
        self.container.clear();
    }
}

impl LifecycleManager for ServiceManager {
    fn register_provider(&mut self, provider: ProviderPtr) {
        let name = self.namer.name(provider.as_ref());
        debug!(provider = %name, "Queueing service provider.");

        self.pending.push_back(ManagedProvider::new(name, provider));
    }

    fn register_all(&mut self) -> BoxFuture<'_, Result<(), LifecycleError>> {
        async move {
            info!("Registering {} service providers...", self.pending.len());

            while let Some(provider) = self.pending.pop_front() {
                debug!(provider = provider.name(), "Registering services.");

                let result = provider.provider().register(&mut self.container).await;
                if let Err(cause) = result {
                    let name = provider.name().to_string();
                    self.pending.push_front(provider);

                    return Err(LifecycleError::ServiceRegistrationFailure {
                        provider: name,
                        cause,
                    });
                }

                self.registered.push(provider);
            }

            Ok(())
        }
        .boxed()
    }

    fn boot_all(&mut self) -> BoxFuture<'_, Result<(), LifecycleError>> {
        async move {
            let order = boot_order(&self.registered)?;

            info!("Booting {} service providers...", order.len());

            for index in order {
                let provider = self.registered[index].clone();

                let Some(boot) = provider.provider().as_boot() else {
                    trace!(provider = provider.name(), "Provider does not support booting.");
                    continue;
                };

                debug!(provider = provider.name(), "Booting provider.");

                boot.boot(&mut self.container).await.map_err(|cause| {
                    LifecycleError::ServiceBootFailure {
                        provider: provider.name().to_string(),
                        cause,
                    }
                })?;

                self.booted.push(provider);
            }

            debug!("Done booting service providers.");

            Ok(())
        }
        .boxed()
    }

    fn shutdown_all(&mut self) -> BoxFuture<'_, Result<(), LifecycleError>> {
        async move {
            let order = match boot_order(&self.registered) {
                Ok(order) => order,
                Err(error) => {
                    self.reset();
                    return Err(error);
                }
            };

            info!("Shutting down {} service providers...", order.len());

            let mut failures = Vec::new();
            for index in order.into_iter().rev() {
                let provider = self.registered[index].clone();

                let Some(shutdown) = provider.provider().as_shutdown() else {
                    trace!(provider = provider.name(), "Provider does not support shutdown.");
                    continue;
                };

                debug!(provider = provider.name(), "Shutting down provider.");

                if let Err(cause) = shutdown.shutdown(&mut self.container).await {
                    warn!(provider = provider.name(), "Error shutting down provider: {cause}");
                    failures.push(ServiceShutdownFailure::new(
                        provider.name().to_string(),
                        cause,
                    ));
                }
            }

            self.reset();

            if failures.is_empty() {
                debug!("Done shutting down service providers.");
                Ok(())
            } else {
                Err(LifecycleError::GroupedShutdownFailure(failures))
            }
        }
        .boxed()
    }
}
