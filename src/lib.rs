//! Type-hint stripping for PHP specification classes.
//!
//! A spec runner replaces the collaborators of a specification class with
//! generated test doubles.  Those doubles are not guaranteed to satisfy the
//! parameter types a specification declares, so before a spec class is
//! loaded its method signatures are rewritten without type hints.  The declared types
//! are resolved to fully-qualified names and kept in a [`TypeHintIndex`],
//! where the double generator looks them up.
//!
//! ```no_run
//! use std::sync::Arc;
//! use phpspec_rewriter::{TypeHintIndex, TypeHintRewriter};
//!
//! let index = Arc::new(TypeHintIndex::new());
//! let mut rewriter = TypeHintRewriter::new(index.clone());
//!
//! let php = "<?php\nnamespace spec\\Acme;\nuse Acme\\Mailer;\n\
//!            class NewsletterSpec {\n    function let(Mailer $mailer) {}\n}\n";
//! let rewritten = rewriter.rewrite(php).unwrap();
//!
//! assert!(rewritten.contains("function let($mailer)"));
//! assert_eq!(
//!     index.lookup("spec\\Acme\\NewsletterSpec", "let", "mailer"),
//!     Ok(Some("Acme\\Mailer".to_string())),
//! );
//! ```
//!
//! The crate is organised as follows:
//!
//! - [`lexer`]: maps the `mago_syntax` lexer onto the rewriter's [`Token`]s
//! - [`rewriter`]: the parse state machine, the backward type-hint scan,
//!   and [`TypeHintRewriter`] tying them together
//! - [`resolver`]: the [`NameResolver`] seam and the `use`-statement based
//!   [`NamespaceResolver`]
//! - [`index`]: the [`TypeHintSink`] seam and the in-memory
//!   [`TypeHintIndex`]
//! - [`naming`]: which classes count as specification classes
//! - [`config`]: TOML configuration for the command-line tool

pub mod config;
pub mod error;
pub mod index;
pub mod lexer;
pub mod naming;
pub mod resolver;
pub mod rewriter;
pub mod token;
pub mod types;
mod util;

pub use config::Config;
pub use error::{ConfigError, InvalidTypeHint, ResolveError, RewriteError};
pub use index::{IndexSnapshot, TypeHintIndex, TypeHintSink};
pub use naming::SpecNaming;
pub use resolver::{NameResolver, NamespaceResolver};
pub use rewriter::{SharedSink, TypeHintRewriter};
pub use token::{Token, TokenKind};
pub use types::{
    ClassScope, InvalidTypeHintRecord, Parameter, ParseContext, ParseState, RejectionReason,
    Resolution, TypeHintRecord,
};
