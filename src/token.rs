//! Token model shared by the lexer and the rewriter.
//!
//! Tokens borrow their text from the source being rewritten, so a token
//! sequence is only valid for as long as the source string lives.  The
//! rewriter never mutates a token; it keeps a separate deletion mask and
//! renders whatever survives.

/// The closed set of token categories the rewriter cares about.
///
/// Everything the control logic does not need to distinguish (keywords,
/// literals, comments, operators other than the structural ones) collapses
/// into [`TokenKind::Other`] or [`TokenKind::Punctuation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of spaces, tabs and newlines.
    Whitespace,
    /// A bare name such as `Foo`, `int` or `it_is_initializable`.
    Identifier,
    /// A lone `\` that is not part of a name token.
    NamespaceSeparator,
    /// A name with a leading `\` (e.g. `\Acme\Mailer`).
    FullyQualifiedName,
    /// A name containing `\` but no leading one (e.g. `Acme\Mailer`,
    /// `namespace\Mailer`).
    QualifiedName,
    /// A variable such as `$mailer`.
    Variable,
    /// An `&` that is *not* followed by a variable or `...`, i.e. the
    /// separator of an intersection type.
    AmpersandNotReference,
    /// A literal punctuation token: braces, parens, `|`, `?`, `,`, the
    /// by-reference `&`, `...`, and every other operator.
    Punctuation,
    /// The `class` keyword.
    ClassKeyword,
    /// The `function` keyword.
    FunctionKeyword,
    /// Keywords, literals, comments, open/close tags and inline HTML.
    Other,
}

impl TokenKind {
    /// Whether a token of this kind can be part of a parameter's type-hint
    /// expression on its own merits (punctuation such as `|` and `?` is
    /// judged by text, see [`Token::is_type_hint_part`]).
    pub fn is_type_hint_kind(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Identifier
                | TokenKind::NamespaceSeparator
                | TokenKind::FullyQualifiedName
                | TokenKind::QualifiedName
                | TokenKind::AmpersandNotReference
        )
    }
}

/// A single lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: &'src str,
    /// Byte offset of the first character of the token in the source.
    pub position: u32,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, position: u32) -> Self {
        Self {
            kind,
            text,
            position,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Other && is_comment_text(self.text)
    }

    /// Whether this token is the literal punctuation `text`.
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == text
    }

    /// Membership test for the backward type-hint scan.
    ///
    /// A token belongs to the type-hint expression if its kind is one of the
    /// name-ish kinds, or it is the union separator `|` or the nullable
    /// marker `?`.  Parentheses of DNF types are handled by the scanner
    /// itself because they need depth tracking.
    pub fn is_type_hint_part(&self) -> bool {
        self.kind.is_type_hint_kind() || self.is_punct("|") || self.is_punct("?")
    }

    /// Whether this token opens a brace-delimited block.  `${` inside a
    /// string or a variable-variable closes with a plain `}`, so it counts.
    pub fn opens_block(&self) -> bool {
        self.is_punct("{") || self.is_punct("${")
    }

    /// Whether this token marks a by-reference or variadic parameter, which
    /// sits between the type and the variable but is not part of the type.
    pub fn is_parameter_marker(&self) -> bool {
        self.is_punct("&") || self.is_punct("...")
    }
}

/// Whether `text` is a `//`, `#` or `/* */` comment.  The attribute opener
/// `#[` is not a comment.
fn is_comment_text(text: &str) -> bool {
    text.starts_with("//")
        || text.starts_with("/*")
        || (text.starts_with('#') && !text.starts_with("#["))
}

/// Render a token sequence back into source text, skipping every token
/// whose slot in `deleted` is set.
///
/// `deleted` must be the same length as `tokens`.
pub fn render(tokens: &[Token<'_>], deleted: &[bool]) -> String {
    debug_assert_eq!(tokens.len(), deleted.len());
    let capacity = tokens
        .iter()
        .zip(deleted)
        .filter(|(_, gone)| !**gone)
        .map(|(t, _)| t.text.len())
        .sum();
    let mut out = String::with_capacity(capacity);
    for (token, gone) in tokens.iter().zip(deleted) {
        if !gone {
            out.push_str(token.text);
        }
    }
    out
}
