//! Error types.
//!
//! Only two kinds of failure escape a rewrite: an invariant violation in the
//! state machine, and a resolver failure that is not the expected
//! "non-object type" outcome.  Rejected type hints are not errors; they are
//! recorded in the index (see [`crate::types::RejectionReason`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Parameter, RejectionReason};

/// Failure of the import resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The name denotes a scalar or builtin type that cannot back an object
    /// double.
    #[error("`{0}` is not an object type")]
    NonObjectType(String),
    /// The name cannot be turned into a fully-qualified class name.
    #[error("cannot resolve `{0}` to a class name")]
    Unresolvable(String),
}

/// Failure of a whole rewrite call.  No output is produced and nothing is
/// written to the index when one of these is returned.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A parameter was reached while no specification class was open.  The
    /// state machine only enters a parameter list inside a class, so this
    /// is a bug, not bad input.
    #[error("parameter {parameter} at byte {position} is not inside a specification class")]
    NoEnclosingClass { parameter: String, position: u32 },

    /// A parameter list was entered for a function without a name.
    #[error("parameter {parameter} of class {class} is not inside a named method")]
    NoEnclosingMethod { class: String, parameter: String },

    #[error("cannot resolve the type of {class}::{method}() parameter {parameter}")]
    Resolve {
        class: String,
        method: String,
        parameter: Parameter,
        #[source]
        source: ResolveError,
    },
}

/// A type hint that was recorded as invalid, surfaced when the double
/// generator looks it up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{class}::{method}() parameter {parameter}: {reason}")]
pub struct InvalidTypeHint {
    pub class: String,
    pub method: String,
    pub parameter: String,
    pub reason: RejectionReason,
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
