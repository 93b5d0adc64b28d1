//! PHP tokenization for the rewriter.
//!
//! The heavy lifting is done by the `mago_syntax` lexer, the same front end
//! the resolver parses with.  This module maps its token stream onto the
//! rewriter's [`TokenKind`]s and adds the two context rules the rewriter
//! needs on top:
//!
//!   - **Ampersands**: an `&` followed (after optional whitespace) by a
//!     variable or `...` is a by-reference marker and maps to
//!     [`TokenKind::Punctuation`].  Any other lone `&` is
//!     [`TokenKind::AmpersandNotReference`], which is how an intersection
//!     type such as `Countable&Traversable` is told apart from `Foo &$bar`.
//!   - **Member names**: a word right after `::`, `->` or `?->`, or after
//!     `function` (optionally followed by a by-reference `&`), is a name.
//!     `Foo::class` never opens a class and `function &list()` still names
//!     its method.
//!
//! Names follow PHP 8 tokenization, where a namespaced name is a single
//! token:
//!
//! | Source            | Kind                                    |
//! |-------------------|-----------------------------------------|
//! | `Mailer`          | [`TokenKind::Identifier`]               |
//! | `Acme\Mailer`     | [`TokenKind::QualifiedName`]            |
//! | `\Acme\Mailer`    | [`TokenKind::FullyQualifiedName`]       |
//! | `namespace\Mailer`| [`TokenKind::QualifiedName`]            |
//!
//! Tokenization never fails.  Bytes the lexer rejects come back as
//! [`TokenKind::Other`] tokens, so concatenating the text of every token
//! always reproduces the source byte for byte.

use mago_database::file::FileId;
use mago_syntax::lexer::Lexer;
use mago_syntax::settings::LexerSettings;
use mago_syntax::token::TokenKind as PhpKind;
use mago_syntax_core::input::Input;

use crate::token::{Token, TokenKind};

/// A token straight from the lexer.  `kind` is `None` for source text the
/// lexer reported an error on.
#[derive(Debug, Clone, Copy)]
struct RawToken<'src> {
    kind: Option<PhpKind>,
    text: &'src str,
    position: u32,
}

/// Tokenize PHP source text.
///
/// Text before the first open tag (and after a `?>`) is inline HTML and
/// comes back as [`TokenKind::Other`].
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let raw = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| lex(source))) {
        Ok(raw) => raw,
        Err(_) => {
            tracing::error!("lexer panicked; treating the source as opaque text");
            vec![RawToken {
                kind: None,
                text: source,
                position: 0,
            }]
        }
    };
    classify(&raw)
}

/// Run the `mago_syntax` lexer over `source`, filling every gap it leaves
/// (error bytes, an aborted interpolation) with an opaque token.
fn lex(source: &str) -> Vec<RawToken<'_>> {
    let input = Input::new(FileId::new("input.php"), source.as_bytes());
    let mut lexer = Lexer::new(input, LexerSettings::default());
    let mut raw = Vec::new();
    let mut covered = 0usize;

    while let Some(next) = lexer.advance() {
        let token = match next {
            Ok(token) => token,
            Err(err) => {
                tracing::debug!(error = %err, "lexer error");
                continue;
            }
        };
        let start = token.start.offset as usize;
        let end = start + token.value.len();
        if start < covered {
            continue;
        }
        // Only the length of the token's value is used; the text is sliced
        // from the source by offset.
        let Some(text) = source.get(start..end) else {
            continue;
        };
        if start > covered {
            push_gap(source, covered, start, &mut raw);
        }
        raw.push(RawToken {
            kind: Some(token.kind),
            text,
            position: token.start.offset,
        });
        covered = end;
    }

    if covered < source.len() {
        push_gap(source, covered, source.len(), &mut raw);
    }
    raw
}

fn push_gap<'src>(source: &'src str, start: usize, end: usize, raw: &mut Vec<RawToken<'src>>) {
    if let Some(text) = source.get(start..end) {
        raw.push(RawToken {
            kind: None,
            text,
            position: start as u32,
        });
    }
}

// ─── Classification ─────────────────────────────────────────────────────────

fn classify<'src>(raw: &[RawToken<'src>]) -> Vec<Token<'src>> {
    let mut tokens = Vec::with_capacity(raw.len());
    // The last two significant (non-trivia) lexer kinds, most recent first.
    let mut recent: [Option<PhpKind>; 2] = [None, None];

    for (index, token) in raw.iter().enumerate() {
        let kind = match token.kind {
            None => TokenKind::Other,
            Some(kind) => classify_kind(kind, raw, index, recent),
        };
        tokens.push(Token::new(kind, token.text, token.position));

        if let Some(kind) = token.kind
            && !kind.is_trivia()
        {
            recent = [Some(kind), recent[0]];
        }
    }
    tokens
}

fn classify_kind(
    kind: PhpKind,
    raw: &[RawToken<'_>],
    index: usize,
    recent: [Option<PhpKind>; 2],
) -> TokenKind {
    match kind {
        PhpKind::Whitespace => TokenKind::Whitespace,
        PhpKind::Variable => TokenKind::Variable,
        PhpKind::NamespaceSeparator => TokenKind::NamespaceSeparator,
        PhpKind::FullyQualifiedIdentifier => TokenKind::FullyQualifiedName,
        PhpKind::QualifiedIdentifier => TokenKind::QualifiedName,
        PhpKind::Ampersand if is_reference_marker(raw, index) => TokenKind::Punctuation,
        PhpKind::Ampersand => TokenKind::AmpersandNotReference,
        _ if kind.is_identifier_maybe_reserved() => classify_word(kind, recent),
        _ if is_opaque(kind) => TokenKind::Other,
        _ => TokenKind::Punctuation,
    }
}

/// Classify an identifier or reserved word.
fn classify_word(kind: PhpKind, recent: [Option<PhpKind>; 2]) -> TokenKind {
    let is_name_position = match recent {
        [
            Some(
                PhpKind::ColonColon | PhpKind::MinusGreaterThan | PhpKind::QuestionMinusGreaterThan,
            ),
            _,
        ] => true,
        [Some(PhpKind::Function), _] => true,
        [Some(PhpKind::Ampersand), Some(PhpKind::Function)] => true,
        _ => false,
    };
    if is_name_position {
        return TokenKind::Identifier;
    }

    match kind {
        PhpKind::Class => TokenKind::ClassKeyword,
        PhpKind::Function => TokenKind::FunctionKeyword,
        // Reserved words that are valid in a type position; the resolver
        // decides what they mean.
        PhpKind::Identifier
        | PhpKind::Self_
        | PhpKind::Parent
        | PhpKind::Static
        | PhpKind::Array
        | PhpKind::Callable
        | PhpKind::Null
        | PhpKind::False
        | PhpKind::True => TokenKind::Identifier,
        _ => TokenKind::Other,
    }
}

/// Kinds the rewriter never looks inside: keywords, literals, strings,
/// comments, casts, tags and inline HTML.
fn is_opaque(kind: PhpKind) -> bool {
    kind.is_keyword()
        || kind.is_literal()
        || kind.is_comment()
        || kind.is_cast()
        || matches!(
            kind,
            PhpKind::InlineText
                | PhpKind::InlineShebang
                | PhpKind::OpenTag
                | PhpKind::EchoTag
                | PhpKind::ShortOpenTag
                | PhpKind::CloseTag
                | PhpKind::StringPart
                | PhpKind::DocumentStart(_)
                | PhpKind::DocumentEnd
                | PhpKind::DoubleQuote
                | PhpKind::Backtick
        )
}

/// Whether the `&` at `index` is followed by a variable or `...`.
fn is_reference_marker(raw: &[RawToken<'_>], index: usize) -> bool {
    raw[index + 1..]
        .iter()
        .find(|token| token.kind != Some(PhpKind::Whitespace))
        .is_some_and(|token| {
            matches!(token.kind, Some(PhpKind::Variable | PhpKind::DotDotDot))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        tokenize(src)
            .into_iter()
            .filter(|t| !t.is_whitespace())
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn rendered(src: &str) -> String {
        tokenize(src).iter().map(|t| t.text).collect()
    }

    fn brace_balance(src: &str) -> (usize, usize) {
        let tokens = tokenize(src);
        let opens = tokens.iter().filter(|t| t.opens_block()).count();
        let closes = tokens.iter().filter(|t| t.is_punct("}")).count();
        (opens, closes)
    }

    #[test]
    fn concatenation_is_lossless() {
        let src = "<?php\n// hi {\nclass A { function b(\\X\\Y &$y) { return \"}\"; } }\n?>\n<p>";
        assert_eq!(rendered(src), src);
    }

    #[test]
    fn lexer_errors_stay_lossless() {
        for src in [
            "<?php $a = 1 \u{1} ; $b = 2;",
            "<?php /* never closed {",
            "<?php $s = \"never closed {$x",
            "<?php $n = 0o99;",
        ] {
            assert_eq!(rendered(src), src);
        }
    }

    #[test]
    fn classifies_keywords_and_names() {
        let toks = kinds("<?php class FooSpec extends ObjectBehavior { function let(Acme\\Bar $b) {} }");
        assert_eq!(toks[0], (TokenKind::Other, "<?php"));
        assert_eq!(toks[1], (TokenKind::ClassKeyword, "class"));
        assert_eq!(toks[2], (TokenKind::Identifier, "FooSpec"));
        assert_eq!(toks[3], (TokenKind::Other, "extends"));
        assert_eq!(toks[4], (TokenKind::Identifier, "ObjectBehavior"));
        assert_eq!(toks[6], (TokenKind::FunctionKeyword, "function"));
        assert_eq!(toks[7], (TokenKind::Identifier, "let"));
        assert_eq!(toks[9], (TokenKind::QualifiedName, "Acme\\Bar"));
        assert_eq!(toks[10], (TokenKind::Variable, "$b"));
    }

    #[test]
    fn type_keywords_are_identifiers() {
        let toks = kinds("<?php f(self $a, array $b, null $c, static $d, readonly $e)");
        for word in ["self", "array", "null", "static"] {
            assert!(toks.contains(&(TokenKind::Identifier, word)), "{}", word);
        }
        assert!(toks.contains(&(TokenKind::Other, "readonly")));
    }

    #[test]
    fn member_names_are_never_keywords() {
        let toks = kinds("<?php Foo::class; $a->function; $b?->class;");
        assert!(toks.contains(&(TokenKind::Identifier, "class")));
        assert!(toks.contains(&(TokenKind::Identifier, "function")));
        assert!(!toks.iter().any(|(k, _)| *k == TokenKind::ClassKeyword));
    }

    #[test]
    fn reserved_method_names_are_identifiers() {
        let toks = kinds("<?php function list() {} function &match() {}");
        assert!(toks.contains(&(TokenKind::Identifier, "list")));
        assert!(toks.contains(&(TokenKind::Identifier, "match")));
    }

    #[test]
    fn ampersand_disambiguation() {
        let toks = kinds("<?php function f(A&B $x, C &$y, D & ...$z) {}");
        assert!(toks.contains(&(TokenKind::AmpersandNotReference, "&")));
        let by_ref = toks
            .iter()
            .filter(|(k, t)| *k == TokenKind::Punctuation && *t == "&")
            .count();
        assert_eq!(by_ref, 2);
    }

    #[test]
    fn asymmetric_visibility_is_one_token() {
        let toks = kinds("<?php function __construct(public private(set) Foo $x) {}");
        assert!(toks.contains(&(TokenKind::Other, "private(set)")));
        assert!(!toks.contains(&(TokenKind::Punctuation, "(set")));
    }

    #[test]
    fn strings_and_comments_hide_braces() {
        assert_eq!(brace_balance("<?php $a = '{'; /* { */ # }\n"), (0, 0));
        assert_eq!(brace_balance("<?php $b = \"}{$c}\";"), (1, 1));
        assert_eq!(brace_balance("<?php $s = \"{$m[\"}\"]}\";"), (1, 1));
        assert_eq!(brace_balance("<?php $t = \"${name}\";"), (1, 1));
    }

    #[test]
    fn heredoc_body_is_opaque() {
        let src = "<?php $a = <<<EOT\n  { not a brace }\n  EOT;\n";
        assert_eq!(brace_balance(src), (0, 0));
        assert_eq!(kinds(src).last(), Some(&(TokenKind::Punctuation, ";")));
        assert_eq!(rendered(src), src);
    }

    #[test]
    fn fully_qualified_and_relative_names() {
        let toks = kinds("<?php \\Acme\\Mailer namespace\\Foo");
        assert_eq!(toks[1], (TokenKind::FullyQualifiedName, "\\Acme\\Mailer"));
        assert_eq!(toks[2], (TokenKind::QualifiedName, "namespace\\Foo"));
    }

    #[test]
    fn union_pipe_is_single_punctuation() {
        let toks = kinds("<?php A|B || C |= D");
        assert_eq!(toks[2], (TokenKind::Punctuation, "|"));
        assert_eq!(toks[4], (TokenKind::Punctuation, "||"));
        assert_eq!(toks[6], (TokenKind::Punctuation, "|="));
    }

    #[test]
    fn source_without_open_tag_is_inline_html() {
        let toks = tokenize("class FooSpec {}");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Other);
    }
}
