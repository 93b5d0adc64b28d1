//! Type-hint rewriting for specification classes.
//!
//! [`TypeHintRewriter::rewrite`] takes the source of a class definition and
//! returns it with the parameter type hints of every specification-class
//! method removed.  The declared types are not lost: each one is resolved
//! and recorded in a [`TypeHintSink`] so the double generator can still
//! build type-aware doubles.
//!
//! # Pipeline
//!
//!   1. **Analyse imports**: the resolver learns the namespaces and `use`
//!      statements of the source.
//!   2. **Tokenize**: [`crate::lexer::tokenize`].
//!   3. **Forward pass**: the [`ParseMachine`] walks the tokens and asks for
//!      an extraction at every parameter of a specification-class method.
//!   4. **Backward scan**: the extractor collects the tokens of that
//!      parameter's type and marks them deleted.
//!   5. **Resolve**: unions and intersections are rejected outright, simple
//!      names go through the resolver.
//!   6. **Render**: surviving tokens are concatenated.
//!
//! Records are buffered during the pass and only handed to the sink once
//! the whole source has been rewritten, so a failed rewrite leaves the
//! index untouched.

mod extractor;
mod resolution;
pub mod state_machine;

use std::sync::Arc;

use crate::error::RewriteError;
use crate::index::TypeHintSink;
use crate::lexer;
use crate::naming::SpecNaming;
use crate::resolver::{NameResolver, NamespaceResolver};
use crate::token::{self, Token};
use crate::types::{ParseContext, Parameter};

use self::resolution::PendingRecord;
pub use self::state_machine::{Action, ParseMachine};

/// Shared handle to the index every rewrite reports into.
pub type SharedSink = Arc<dyn TypeHintSink + Send + Sync>;

/// Strips parameter type hints from specification classes.
///
/// A rewriter can be reused for any number of sources.  Parse state is
/// created fresh for every call, and the resolver re-analyses each source.
pub struct TypeHintRewriter<R = NamespaceResolver> {
    resolver: R,
    index: SharedSink,
    naming: SpecNaming,
}

impl TypeHintRewriter<NamespaceResolver> {
    /// A rewriter using the `use`-statement resolver and the default
    /// `*Spec` naming convention.
    pub fn new(index: SharedSink) -> Self {
        Self::with_resolver(NamespaceResolver::new(), index)
    }
}

impl<R: NameResolver> TypeHintRewriter<R> {
    pub fn with_resolver(resolver: R, index: SharedSink) -> Self {
        Self {
            resolver,
            index,
            naming: SpecNaming::default(),
        }
    }

    /// Replace the convention that decides which classes are rewritten.
    pub fn with_naming(mut self, naming: SpecNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn naming(&self) -> &SpecNaming {
        &self.naming
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Rewrite one class-definition source text.
    ///
    /// On success the index has received one record per typed parameter of
    /// every specification-class method.  On error nothing was recorded.
    pub fn rewrite(&mut self, source: &str) -> Result<String, RewriteError> {
        self.resolver.analyse(source);
        let tokens = lexer::tokenize(source);
        let mut deleted = vec![false; tokens.len()];
        let mut pending = Vec::new();
        let mut machine = ParseMachine::new();

        for (index, token) in tokens.iter().enumerate() {
            let action = machine.advance(token, |name| {
                let fqn = self.resolver.qualify_class(name.text, name.position);
                self.naming.matches(&fqn).then_some(fqn)
            });
            if action == Some(Action::ExtractTypeHint)
                && let Some(record) =
                    self.extract(&tokens, &mut deleted, index, machine.context())?
            {
                pending.push(record);
            }
        }

        tracing::debug!(records = pending.len(), "rewrite complete");
        for record in pending {
            record.flush_into(self.index.as_ref());
        }
        Ok(token::render(&tokens, &deleted))
    }

    /// Strip and resolve the type hint of the parameter at `index`.
    fn extract(
        &self,
        tokens: &[Token<'_>],
        deleted: &mut [bool],
        index: usize,
        context: &ParseContext,
    ) -> Result<Option<PendingRecord>, RewriteError> {
        let token = &tokens[index];
        let Some(class) = context.class.spec_name() else {
            return Err(RewriteError::NoEnclosingClass {
                parameter: token.text.to_string(),
                position: token.position,
            });
        };
        let Some(method) = context.function.as_deref() else {
            return Err(RewriteError::NoEnclosingMethod {
                class: class.to_string(),
                parameter: token.text.to_string(),
            });
        };

        let shape = extractor::collect_type_hint(tokens, deleted, index);
        let parameter = Parameter::from_token(token);
        let resolution = resolution::resolve_hint(&self.resolver, &shape, token.position)
            .map_err(|source| RewriteError::Resolve {
                class: class.to_string(),
                method: method.to_string(),
                parameter: parameter.clone(),
                source,
            })?;

        Ok(resolution.map(|resolution| PendingRecord::new(class, method, parameter, resolution)))
    }
}
