//! Resolved dependencies handed over to constructors. The order always matches the order of
//! tokens declared in the [ServiceDefinition](crate::registry::ServiceDefinition), so constructors
//! can rely on positional access.

use crate::error::ResolveError;
use crate::instance_provider::{downcast_instance, InstancePtr, ServicePtr};
use crate::token::Token;
use std::any::Any;

/// Ordered list of resolved dependency instances.
#[derive(Clone, Default)]
pub struct Dependencies {
    instances: Vec<(Token, InstancePtr)>,
}

impl Dependencies {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, token: Token, instance: InstancePtr) {
        self.instances.push((token, instance));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Returns the type-erased dependency at given position.
    pub fn get(&self, index: usize) -> Result<InstancePtr, ResolveError> {
        self.instances
            .get(index)
            .map(|(_, instance)| instance.clone())
            .ok_or(ResolveError::MissingArgument {
                index,
                available: self.instances.len(),
            })
    }

    /// Returns the dependency at given position cast to the requested type.
    pub fn get_typed<T: Any + Send + Sync>(
        &self,
        index: usize,
    ) -> Result<ServicePtr<T>, ResolveError> {
        let (token, instance) =
            self.instances
                .get(index)
                .ok_or(ResolveError::MissingArgument {
                    index,
                    available: self.instances.len(),
                })?;

        downcast_instance(token, instance.clone())
    }

    /// Iterates over dependency tokens and instances in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Token, &InstancePtr)> {
        self.instances.iter().map(|(token, instance)| (token, instance))
    }
}

#[cfg(test)]
mod tests {
    use crate::dependencies::Dependencies;
    use crate::error::ResolveError;
    use crate::instance_provider::{InstancePtr, ServicePtr};
    use crate::token::Token;

    fn create_dependencies() -> Dependencies {
        let mut dependencies = Dependencies::with_capacity(2);
        dependencies.push(Token::named("a"), ServicePtr::new(1u8) as InstancePtr);
        dependencies.push(Token::named("b"), ServicePtr::new("b".to_string()) as InstancePtr);
        dependencies
    }

    #[test]
    fn should_return_positional_dependencies() {
        let dependencies = create_dependencies();

        assert_eq!(dependencies.len(), 2);
        assert_eq!(*dependencies.get_typed::<u8>(0).unwrap(), 1);
        assert_eq!(*dependencies.get_typed::<String>(1).unwrap(), "b");
    }

    #[test]
    fn should_reject_missing_argument() {
        assert!(matches!(
            create_dependencies().get(2).unwrap_err(),
            ResolveError::MissingArgument {
                index: 2,
                available: 2
            }
        ));
    }

    #[test]
    fn should_reject_incompatible_type() {
        assert!(matches!(
            create_dependencies().get_typed::<u8>(1).unwrap_err(),
            ResolveError::IncompatibleInstance { token, .. } if token == Token::named("b")
        ));
    }
}
