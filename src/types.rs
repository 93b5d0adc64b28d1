//! Data types used throughout the rewriter.
//!
//! This module contains the parse-state model driven by the state machine
//! and the owned record types that end up in the type-hint index.  Records
//! own all their data so they outlive the source text they were extracted
//! from.

use std::fmt;

use serde::Serialize;

use crate::token::Token;

/// Structural region the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    /// Outside any class.
    #[default]
    Default,
    /// Inside a class declaration (header or body), outside any method.
    ReadingClass,
    /// After a `function` keyword, before its parameter list.
    ReadingFunction,
    /// Inside a method's parameter list.
    ReadingArguments,
    /// Inside a method body.
    ReadingFunctionBody,
}

/// Which class, if any, the state machine is currently inside.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClassScope {
    /// Not inside a class.
    #[default]
    None,
    /// Saw `class`, waiting for the name.
    Pending,
    /// Inside a specification class, identified by its fully-qualified
    /// name.  Only these classes have their methods rewritten.
    Spec(String),
    /// Inside a class that is not a specification class (or an anonymous
    /// class).  Its contents are passed through untouched.
    Skipped,
}

impl ClassScope {
    /// The fully-qualified name of the enclosing specification class.
    pub fn spec_name(&self) -> Option<&str> {
        match self {
            ClassScope::Spec(name) => Some(name),
            _ => None,
        }
    }
}

/// Mutable fields carried alongside [`ParseState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    pub class: ClassScope,
    /// Name of the method whose signature or body is being read.
    pub function: Option<String>,
    /// Brace depth inside the current method body.  The opening brace of the
    /// body counts as 1.
    pub body_depth: u32,
    /// Brace depth of the class itself, counted outside method bodies.
    pub class_depth: u32,
    /// Parenthesis depth inside the current parameter list.  The list's own
    /// `(` counts as 1.
    pub paren_depth: u32,
}

/// A parameter as recorded in the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Parameter {
    /// The parameter name without the `$` prefix.
    pub name: String,
    /// Byte offset of the `$name` token in the original source.
    pub position: u32,
}

impl Parameter {
    pub fn from_token(token: &Token<'_>) -> Self {
        Self {
            name: token.text.trim_start_matches('$').to_string(),
            position: token.position,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

/// Why a declared type cannot back a test double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RejectionReason {
    /// `A|B`: no double satisfies more than one declared type.
    UnionTypeRejected,
    /// `A&B`: same problem as a union.
    IntersectionTypeRejected,
    /// A scalar or builtin type such as `int` or `array`.
    NonObjectTypeRejected,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectionReason::UnionTypeRejected => "union types cannot be doubled",
            RejectionReason::IntersectionTypeRejected => "intersection types cannot be doubled",
            RejectionReason::NonObjectTypeRejected => "non-object types cannot be doubled",
        })
    }
}

/// A successfully resolved parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeHintRecord {
    /// Fully-qualified name of the specification class.
    pub class: String,
    pub method: String,
    pub parameter: Parameter,
    /// Fully-qualified name of the declared type.
    pub type_hint: String,
}

/// A parameter type that was stripped but cannot be used for a double.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidTypeHintRecord {
    pub class: String,
    pub method: String,
    pub parameter: Parameter,
    pub reason: RejectionReason,
}

/// Outcome of validating a non-empty type-hint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The type resolved to this fully-qualified name.
    Resolved(String),
    /// The type is valid PHP but cannot back a double.
    Rejected(RejectionReason),
}
