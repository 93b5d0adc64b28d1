//! The naming convention that marks a class as a specification class.
//!
//! Only specification classes are rewritten.  By default that means any
//! class whose short name ends in `Spec`, but the convention is a plain
//! predicate over the fully-qualified class name and can be replaced.

use std::fmt;
use std::sync::Arc;

use crate::util::{namespace_of, short_name};

/// Default class-name suffix for specification classes.
pub const DEFAULT_SPEC_SUFFIX: &str = "Spec";

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate deciding which classes are specification classes.
#[derive(Clone)]
pub struct SpecNaming {
    predicate: Predicate,
    description: String,
}

impl SpecNaming {
    /// Classes whose short name ends with `suffix`.
    pub fn suffix(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        let description = format!("*{}", suffix);
        Self {
            predicate: Arc::new(move |fqn: &str| short_name(fqn).ends_with(suffix.as_str())),
            description,
        }
    }

    /// Any predicate over the fully-qualified class name.
    pub fn custom<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            description: description.into(),
        }
    }

    /// Additionally require the class to live in `prefix` or one of its
    /// sub-namespaces.
    pub fn within_namespace(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_matches('\\').to_string();
        let inner = self.predicate;
        let description = format!("{}\\{}", prefix, self.description);
        Self {
            predicate: Arc::new(move |fqn: &str| {
                let in_namespace = match namespace_of(fqn) {
                    Some(ns) => {
                        ns == prefix
                            || ns
                                .strip_prefix(prefix.as_str())
                                .is_some_and(|rest| rest.starts_with('\\'))
                    }
                    None => prefix.is_empty(),
                };
                in_namespace && inner(fqn)
            }),
            description,
        }
    }

    /// Whether the class named `fqn` is a specification class.
    pub fn matches(&self, fqn: &str) -> bool {
        (self.predicate)(fqn.trim_start_matches('\\'))
    }
}

impl Default for SpecNaming {
    fn default() -> Self {
        Self::suffix(DEFAULT_SPEC_SUFFIX)
    }
}

impl fmt::Debug for SpecNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SpecNaming").field(&self.description).finish()
    }
}
