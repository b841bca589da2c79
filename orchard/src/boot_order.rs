//! Provider-level dependency graph. Every provider is a node, and an edge `Q -> P` means `Q`
//! provides a token `P` depends on, so `Q` has to be booted before `P`. Shutdown uses the same
//! order reversed.

use crate::error::LifecycleError;
use crate::provider::ManagedProvider;
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use orchard_di::token::Token;
use std::collections::hash_map::Entry;
use std::collections::VecDeque;
use tracing::trace;

/// Computes the order in which given providers should be booted, as indices into `providers`.
/// Providers without dependencies between them keep their relative registration order.
pub fn boot_order(providers: &[ManagedProvider]) -> Result<Vec<usize>, LifecycleError> {
    let mut names = FxHashSet::default();
    for provider in providers {
        if !names.insert(provider.name()) {
            return Err(LifecycleError::DuplicateProviderName(
                provider.name().to_string(),
            ));
        }
    }

    let providers_by_token = index_provided_services(providers)?;

    let mut successors = vec![Vec::new(); providers.len()];
    let mut in_degree = vec![0usize; providers.len()];
    let mut edges = FxHashSet::default();

    for (index, provider) in providers.iter().enumerate() {
        for token in provider.provider().dependencies() {
            let dependency_index = *providers_by_token.get(&token).ok_or_else(|| {
                LifecycleError::MissingProviderDependency {
                    provider: provider.name().to_string(),
                    token: token.clone(),
                }
            })?;

            if dependency_index == index || !edges.insert((dependency_index, index)) {
                continue;
            }

            successors[dependency_index].push(index);
            in_degree[index] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..providers.len())
        .filter(|index| in_degree[*index] == 0)
        .collect();
    let mut order = Vec::with_capacity(providers.len());

    while let Some(index) = queue.pop_front() {
        order.push(index);

        for successor in &successors[index] {
            in_degree[*successor] -= 1;
            if in_degree[*successor] == 0 {
                queue.push_back(*successor);
            }
        }
    }

    if order.len() != providers.len() {
        return Err(LifecycleError::CircularProviderDependency(
            (0..providers.len())
                .filter(|index| in_degree[*index] > 0)
                .map(|index| providers[index].name().to_string())
                .collect(),
        ));
    }

    trace!(
        "Computed provider boot order: {}",
        order.iter().map(|index| providers[*index].name()).join(", ")
    );

    Ok(order)
}

fn index_provided_services(
    providers: &[ManagedProvider],
) -> Result<FxHashMap<Token, usize>, LifecycleError> {
    let mut providers_by_token = FxHashMap::default();

    for (index, provider) in providers.iter().enumerate() {
        for token in provider.provider().provided_services() {
            match providers_by_token.entry(token) {
                Entry::Vacant(entry) => {
                    entry.insert(index);
                }
                Entry::Occupied(entry) if *entry.get() != index => {
                    return Err(LifecycleError::AmbiguousServiceProvider {
                        token: entry.key().clone(),
                        first: providers[*entry.get()].name().to_string(),
                        second: provider.name().to_string(),
                    });
                }
                Entry::Occupied(_) => {}
            }
        }
    }

    Ok(providers_by_token)
}

#[cfg(test)]
mod tests {
    use crate::boot_order::boot_order;
    use crate::error::LifecycleError;
    use crate::provider::{FnProvider, ManagedProvider, ProviderPtr, ServiceProvider};
    use orchard_di::token::Token;
    use std::sync::Arc;

    fn managed(provider: FnProvider) -> ManagedProvider {
        let name = provider.name().unwrap_or_default();
        ManagedProvider::new(name, Arc::new(provider) as ProviderPtr)
    }

    fn names(providers: &[ManagedProvider], order: Vec<usize>) -> Vec<&str> {
        order
            .into_iter()
            .map(|index| providers[index].name())
            .collect()
    }

    #[test]
    fn should_order_dependencies_first() {
        let providers = vec![
            managed(FnProvider::named("p3").depends_on(Token::named("y"))),
            managed(
                FnProvider::named("p2")
                    .depends_on(Token::named("x"))
                    .provides(Token::named("y")),
            ),
            managed(FnProvider::named("p1").provides(Token::named("x"))),
        ];

        let order = boot_order(&providers).unwrap();
        assert_eq!(names(&providers, order), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn should_keep_registration_order_for_independent_providers() {
        let providers = vec![
            managed(FnProvider::named("b")),
            managed(FnProvider::named("a").provides(Token::named("x"))),
            managed(FnProvider::named("c").depends_on(Token::named("x"))),
            managed(FnProvider::named("d")),
        ];

        let order = boot_order(&providers).unwrap();
        assert_eq!(names(&providers, order), vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn should_ignore_self_and_duplicate_dependencies() {
        let providers = vec![
            managed(
                FnProvider::named("b")
                    .depends_on(Token::named("x"))
                    .depends_on(Token::named("y"))
                    .depends_on(Token::named("z"))
                    .provides(Token::named("z")),
            ),
            managed(
                FnProvider::named("a")
                    .provides(Token::named("x"))
                    .provides(Token::named("y")),
            ),
        ];

        let order = boot_order(&providers).unwrap();
        assert_eq!(names(&providers, order), vec!["a", "b"]);
    }

    #[test]
    fn should_reject_duplicate_names() {
        let providers = vec![
            managed(FnProvider::named("x")),
            managed(FnProvider::named("x")),
        ];

        assert!(matches!(
            boot_order(&providers).unwrap_err(),
            LifecycleError::DuplicateProviderName(name) if name == "x"
        ));
    }

    #[test]
    fn should_reject_missing_dependency() {
        let providers = vec![managed(
            FnProvider::named("p").depends_on(Token::named("missing")),
        )];

        assert!(matches!(
            boot_order(&providers).unwrap_err(),
            LifecycleError::MissingProviderDependency { provider, token }
                if provider == "p" && token == Token::named("missing")
        ));
    }

    #[test]
    fn should_reject_ambiguous_provided_service() {
        let providers = vec![
            managed(FnProvider::named("a").provides(Token::named("x"))),
            managed(FnProvider::named("b").provides(Token::named("x"))),
        ];

        assert!(matches!(
            boot_order(&providers).unwrap_err(),
            LifecycleError::AmbiguousServiceProvider { first, second, .. }
                if first == "a" && second == "b"
        ));
    }

    #[test]
    fn should_report_cycle_members() {
        let providers = vec![
            managed(FnProvider::named("free")),
            managed(
                FnProvider::named("a")
                    .depends_on(Token::named("b"))
                    .provides(Token::named("a")),
            ),
            managed(
                FnProvider::named("b")
                    .depends_on(Token::named("a"))
                    .provides(Token::named("b")),
            ),
            managed(FnProvider::named("after").depends_on(Token::named("a"))),
        ];

        assert!(matches!(
            boot_order(&providers).unwrap_err(),
            LifecycleError::CircularProviderDependency(names)
                if names == vec!["a".to_string(), "b".to_string(), "after".to_string()]
        ));
    }

    #[test]
    fn should_accept_empty_input() {
        assert!(boot_order(&[]).unwrap().is_empty());
    }
}
