//! Validation and resolution of extracted type hints.
//!
//! Composite types are rejected without asking the resolver: no double can
//! satisfy more than one declared type, so there is nothing to resolve.
//! Simple names are resolved to their fully-qualified form because the
//! index is keyed by fully-qualified identity, whatever alias the source
//! used.

use super::extractor::HintShape;
use crate::error::ResolveError;
use crate::index::TypeHintSink;
use crate::resolver::NameResolver;
use crate::types::{InvalidTypeHintRecord, Parameter, RejectionReason, Resolution, TypeHintRecord};

/// Turn a collected hint into a [`Resolution`].
///
/// Returns `Ok(None)` when no type was declared.  A non-object type is a
/// rejection, not an error; any other resolver failure is returned as-is.
pub(crate) fn resolve_hint<R>(
    resolver: &R,
    shape: &HintShape,
    position: u32,
) -> Result<Option<Resolution>, ResolveError>
where
    R: NameResolver + ?Sized,
{
    let name = match shape {
        HintShape::Absent => return Ok(None),
        HintShape::Union(_) => {
            return Ok(Some(Resolution::Rejected(
                RejectionReason::UnionTypeRejected,
            )));
        }
        HintShape::Intersection(_) => {
            return Ok(Some(Resolution::Rejected(
                RejectionReason::IntersectionTypeRejected,
            )));
        }
        HintShape::Simple(name) => name,
    };

    match resolver.resolve(name, position) {
        Ok(fqn) => Ok(Some(Resolution::Resolved(fqn))),
        Err(ResolveError::NonObjectType(_)) => Ok(Some(Resolution::Rejected(
            RejectionReason::NonObjectTypeRejected,
        ))),
        Err(err) => Err(err),
    }
}

/// A record waiting for the rewrite to finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingRecord {
    Valid(TypeHintRecord),
    Invalid(InvalidTypeHintRecord),
}

impl PendingRecord {
    pub(crate) fn new(
        class: &str,
        method: &str,
        parameter: Parameter,
        resolution: Resolution,
    ) -> Self {
        match resolution {
            Resolution::Resolved(type_hint) => {
                tracing::trace!(class, method, %parameter, %type_hint, "resolved type hint");
                PendingRecord::Valid(TypeHintRecord {
                    class: class.to_string(),
                    method: method.to_string(),
                    parameter,
                    type_hint,
                })
            }
            Resolution::Rejected(reason) => {
                tracing::warn!(class, method, %parameter, %reason, "rejected type hint");
                PendingRecord::Invalid(InvalidTypeHintRecord {
                    class: class.to_string(),
                    method: method.to_string(),
                    parameter,
                    reason,
                })
            }
        }
    }

    pub(crate) fn flush_into(self, sink: &dyn TypeHintSink) {
        match self {
            PendingRecord::Valid(record) => sink.add(record),
            PendingRecord::Invalid(record) => sink.add_invalid(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Resolver that prefixes everything with `Acme\` and refuses `int` and
    /// `Missing`.
    struct Prefixing;

    impl NameResolver for Prefixing {
        fn analyse(&mut self, _source: &str) {}

        fn resolve(&self, name: &str, _position: u32) -> Result<String, ResolveError> {
            match name {
                "int" => Err(ResolveError::NonObjectType(name.into())),
                "Missing" => Err(ResolveError::Unresolvable(name.into())),
                _ => Ok(format!("Acme\\{}", name)),
            }
        }

        fn qualify_class(&self, name: &str, _position: u32) -> String {
            name.to_string()
        }
    }

    #[test]
    fn composite_types_skip_the_resolver() {
        let union = resolve_hint(&Prefixing, &HintShape::Union("Missing|B".into()), 0);
        assert_eq!(
            union,
            Ok(Some(Resolution::Rejected(RejectionReason::UnionTypeRejected)))
        );
        let intersection =
            resolve_hint(&Prefixing, &HintShape::Intersection("Missing&B".into()), 0);
        assert_eq!(
            intersection,
            Ok(Some(Resolution::Rejected(
                RejectionReason::IntersectionTypeRejected
            )))
        );
    }

    #[test]
    fn simple_names_resolve_or_reject() {
        assert_eq!(resolve_hint(&Prefixing, &HintShape::Absent, 0), Ok(None));
        assert_eq!(
            resolve_hint(&Prefixing, &HintShape::Simple("Mailer".into()), 0),
            Ok(Some(Resolution::Resolved("Acme\\Mailer".into())))
        );
        assert_eq!(
            resolve_hint(&Prefixing, &HintShape::Simple("int".into()), 0),
            Ok(Some(Resolution::Rejected(
                RejectionReason::NonObjectTypeRejected
            )))
        );
        assert_eq!(
            resolve_hint(&Prefixing, &HintShape::Simple("Missing".into()), 0),
            Err(ResolveError::Unresolvable("Missing".into()))
        );
    }
}
