//! The parse state machine.
//!
//! A single left-to-right pass over the token sequence.  The machine only
//! knows enough PHP structure to find specification classes, their
//! methods, the methods' parameter lists and the extent of their bodies.
//!
//! | State               | Token                         | Next                | Effect                  |
//! |---------------------|-------------------------------|---------------------|-------------------------|
//! | Default             | `class`                       | ReadingClass        | class pending           |
//! | ReadingClass        | name (class pending)          | ReadingClass        | spec class or skipped   |
//! | ReadingClass        | `function` (spec class)       | ReadingFunction     |                         |
//! | ReadingClass        | `{` (method recorded)         | ReadingFunctionBody | body depth = 1          |
//! | ReadingClass        | `;` (method recorded)         | ReadingClass        | forget method           |
//! | ReadingClass        | `}` closing the class         | Default             | forget class            |
//! | ReadingFunction     | name (no method yet)          | ReadingFunction     | record method           |
//! | ReadingFunction     | `(`                           | ReadingArguments    | paren depth = 1         |
//! | ReadingArguments    | `)` closing the list          | ReadingClass        |                         |
//! | ReadingArguments    | variable at depth 1           | ReadingArguments    | [`Action::ExtractTypeHint`] |
//! | ReadingFunctionBody | `}` closing the body          | ReadingClass        | forget method           |
//!
//! Braces inside a method body are counted, so closures, anonymous classes
//! and control blocks never end the body early.  A `${` interpolation
//! opener closes with a plain `}` and counts as a brace.  Braces of the class
//! itself (outside method bodies) are counted too, so property hooks and
//! trait adaptation blocks never end the class early.

use crate::token::{Token, TokenKind};
use crate::types::{ClassScope, ParseContext, ParseState};

/// Work the caller must do for the token just consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The token is a parameter of a specification-class method; extract
    /// and strip its type hint.
    ExtractTypeHint,
}

/// Explicit state plus context.  Create a fresh machine for every source
/// text; nothing carries over between runs.
#[derive(Debug, Clone, Default)]
pub struct ParseMachine {
    state: ParseState,
    context: ParseContext,
}

impl ParseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Consume one token.
    ///
    /// `qualify_spec_class` is called with the name token of every class
    /// declaration.  It returns the class's fully-qualified name when the
    /// class is a specification class, and `None` when it should be skipped.
    pub fn advance<F>(&mut self, token: &Token<'_>, qualify_spec_class: F) -> Option<Action>
    where
        F: FnOnce(&Token<'_>) -> Option<String>,
    {
        match self.state {
            ParseState::Default => {
                if token.kind == TokenKind::ClassKeyword {
                    self.state = ParseState::ReadingClass;
                    self.context.class = ClassScope::Pending;
                    self.context.class_depth = 0;
                }
                None
            }
            ParseState::ReadingClass => {
                self.read_class(token, qualify_spec_class);
                None
            }
            ParseState::ReadingFunction => {
                self.read_function(token);
                None
            }
            ParseState::ReadingArguments => self.read_arguments(token),
            ParseState::ReadingFunctionBody => {
                self.read_function_body(token);
                None
            }
        }
    }

    fn read_class<F>(&mut self, token: &Token<'_>, qualify_spec_class: F)
    where
        F: FnOnce(&Token<'_>) -> Option<String>,
    {
        if self.context.class == ClassScope::Pending {
            match token.kind {
                TokenKind::Whitespace => return,
                _ if token.is_comment() => return,
                TokenKind::Identifier => {
                    self.context.class = match qualify_spec_class(token) {
                        Some(fqn) => {
                            tracing::debug!(class = %fqn, "entering specification class");
                            ClassScope::Spec(fqn)
                        }
                        None => {
                            tracing::debug!(class = token.text, "skipping class");
                            ClassScope::Skipped
                        }
                    };
                    return;
                }
                // `new class(...) extends Foo { ... }`: anonymous classes
                // are never specification classes.
                _ => self.context.class = ClassScope::Skipped,
            }
        }

        match token.kind {
            TokenKind::FunctionKeyword if self.context.class.spec_name().is_some() => {
                self.state = ParseState::ReadingFunction;
                self.context.function = None;
            }
            _ if token.opens_block() => {
                if self.context.function.is_some() {
                    self.state = ParseState::ReadingFunctionBody;
                    self.context.body_depth = 1;
                } else {
                    self.context.class_depth += 1;
                }
            }
            TokenKind::Punctuation => match token.text {
                "}" => {
                    self.context.class_depth = self.context.class_depth.saturating_sub(1);
                    if self.context.class_depth == 0 {
                        self.state = ParseState::Default;
                        self.context = ParseContext::default();
                    }
                }
                // Abstract method: the signature ends without a body.
                ";" if self.context.function.is_some() => self.context.function = None,
                _ => {}
            },
            _ => {}
        }
    }

    fn read_function(&mut self, token: &Token<'_>) {
        match token.kind {
            TokenKind::Identifier if self.context.function.is_none() => {
                tracing::debug!(method = token.text, "entering method");
                self.context.function = Some(token.text.to_string());
            }
            TokenKind::Punctuation if token.text == "(" => {
                self.state = ParseState::ReadingArguments;
                self.context.paren_depth = 1;
            }
            _ => {}
        }
    }

    fn read_arguments(&mut self, token: &Token<'_>) -> Option<Action> {
        match token.kind {
            TokenKind::Variable if self.context.paren_depth == 1 => {
                return Some(Action::ExtractTypeHint);
            }
            TokenKind::Punctuation => match token.text {
                "(" => self.context.paren_depth += 1,
                ")" => {
                    self.context.paren_depth = self.context.paren_depth.saturating_sub(1);
                    if self.context.paren_depth == 0 {
                        self.state = ParseState::ReadingClass;
                    }
                }
                _ => {}
            },
            _ => {}
        }
        None
    }

    fn read_function_body(&mut self, token: &Token<'_>) {
        if token.opens_block() {
            self.context.body_depth += 1;
        } else if token.is_punct("}") {
            self.context.body_depth = self.context.body_depth.saturating_sub(1);
            if self.context.body_depth == 0 {
                self.state = ParseState::ReadingClass;
                self.context.function = None;
            }
        }
    }
}
