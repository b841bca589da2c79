//! Service instances are either shared or created anew on each request, depending on the [Scope]
//! of their definition. Shared instances live in the [SingletonScope] owned by a
//! [Container](crate::container::Container), so independent containers never share instances.
//!
//! Note: scope resolution happens at instantiation time, which can lead to unexpected consequences
//! if scopes are mixed together, e.g. a [singleton](Scope::Singleton) service can depend on a
//! [transient](Scope::Transient) one. In such case when creating the singleton, a new instance of
//! the dependency will be created, but then that single instance will live as long as the
//! singleton lives.

use crate::instance_provider::InstancePtr;
use crate::token::Token;
use fxhash::FxHashMap;

/// Decides when to reuse or create a service instance.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Scope {
    /// One cached instance per container, created on first resolution.
    #[default]
    Singleton,
    /// New instance on every resolution.
    Transient,
}

/// Cache for instances shared between dependents.
#[derive(Default, Clone)]
pub struct SingletonScope {
    instances: FxHashMap<Token, InstancePtr>,
}

impl SingletonScope {
    /// Gets a cached instance for the given token, if already created.
    #[inline]
    pub fn instance(&self, token: &Token) -> Option<InstancePtr> {
        self.instances.get(token).cloned()
    }

    /// Stores given instance for later reuse.
    #[inline]
    pub fn store_instance(&mut self, token: Token, instance: InstancePtr) {
        self.instances.insert(token, instance);
    }

    /// Drops the cached instance, if any. Returns true if an instance was present.
    #[inline]
    pub fn evict(&mut self, token: &Token) -> bool {
        self.instances.remove(token).is_some()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::instance_provider::{InstancePtr, ServicePtr};
    use crate::scope::{Scope, SingletonScope};
    use crate::token::Token;

    #[test]
    fn should_default_to_singleton() {
        assert_eq!(Scope::default(), Scope::Singleton);
    }

    #[test]
    fn should_store_instances() {
        let token = Token::named("value");
        let mut scope = SingletonScope::default();

        let instance = ServicePtr::new(0) as InstancePtr;
        scope.store_instance(token.clone(), instance.clone());

        assert!(ServicePtr::ptr_eq(&scope.instance(&token).unwrap(), &instance));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn should_evict_instances() {
        let token = Token::named("value");
        let mut scope = SingletonScope::default();

        scope.store_instance(token.clone(), ServicePtr::new(0) as InstancePtr);

        assert!(scope.evict(&token));
        assert!(!scope.evict(&token));
        assert!(scope.instance(&token).is_none());
        assert!(scope.is_empty());
    }
}
