//! Stable display names for providers. A name is resolved once, when the provider gets queued, and
//! used afterwards as its identity in the boot order graph and in error messages.

use crate::provider::ServiceProvider;

const ANONYMOUS_PREFIX: &str = "AnonymousProvider#";

/// Resolves provider names in the following order: explicit name, meaningful structural name,
/// generated placeholder. Placeholders are unique per namer.
#[derive(Default, Debug)]
pub struct ProviderNamer {
    anonymous_count: usize,
}

impl ProviderNamer {
    pub fn name(&mut self, provider: &dyn ServiceProvider) -> String {
        if let Some(name) = provider.name().filter(|name| !name.is_empty()) {
            return name;
        }

        if let Some(name) = provider.type_name().and_then(structural_name) {
            return name.to_string();
        }

        self.anonymous_count += 1;
        format!("{ANONYMOUS_PREFIX}{}", self.anonymous_count)
    }
}

/// Last path segment of a type name, without generic arguments. Closures are not meaningful.
fn structural_name(type_name: &str) -> Option<&str> {
    if type_name.contains("{{") {
        return None;
    }

    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::")
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
