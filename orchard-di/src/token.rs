//! [Token]s are the only vocabulary for wiring services together. A token identifies a single
//! service definition in a [ServiceRegistry](crate::registry::ServiceRegistry) and is compared by
//! exact equality - there is no prefix or fuzzy matching.
//!
//! Three kinds of tokens are supported:
//!
//! * names - plain strings, e.g. `Token::named("database")`
//! * types - derived from a Rust type, e.g. `Token::of::<Database>()`
//! * symbols - unique values which never compare equal to any other token, even if created with
//! the same description, e.g. `Token::symbol("logger")`
//!
//! ```
//! use orchard_di::token::Token;
//!
//! struct Database;
//!
//! assert_eq!(Token::named("db"), Token::from("db"));
//! assert_eq!(Token::of::<Database>(), Token::of::<Database>());
//! assert_ne!(Token::symbol("db"), Token::symbol("db"));
//! ```

use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identifier of a service.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Token {
    Name(Cow<'static, str>),
    Type { id: TypeId, name: &'static str },
    Symbol { id: u64, description: Cow<'static, str> },
}

impl Token {
    /// Creates a token from a name.
    #[inline]
    pub fn named<T: Into<Cow<'static, str>>>(name: T) -> Self {
        Self::Name(name.into())
    }

    /// Creates a token identifying given type.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Creates a new unique token. The description is only used for display purposes.
    pub fn symbol<T: Into<Cow<'static, str>>>(description: T) -> Self {
        Self::Symbol {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Name(name) => f.write_str(name),
            Token::Type { name, .. } => f.write_str(name),
            Token::Symbol { description, .. } => write!(f, "Symbol({description})"),
        }
    }
}

impl From<&'static str> for Token {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::named(value)
    }
}

impl From<String> for Token {
    #[inline]
    fn from(value: String) -> Self {
        Self::named(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::token::Token;

    struct TestService;

    #[test]
    fn should_compare_names_exactly() {
        assert_eq!(Token::named("service"), Token::from("service".to_string()));
        assert_ne!(Token::named("service"), Token::named("service2"));
        assert_ne!(Token::named("serv"), Token::named("service"));
    }

    #[test]
    fn should_not_confuse_kinds() {
        let type_token = Token::of::<TestService>();
        let name_token = Token::named(type_token.to_string());

        assert_ne!(type_token, name_token);
    }

    #[test]
    fn should_create_unique_symbols() {
        let symbol = Token::symbol("logger");

        assert_eq!(symbol, symbol.clone());
        assert_ne!(symbol, Token::symbol("logger"));
        assert_eq!(symbol.to_string(), "Symbol(logger)");
    }
}
