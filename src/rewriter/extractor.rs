//! Backward type-hint scan.
//!
//! Given the index of a parameter's variable token, walk backward over the
//! tokens that make up its declared type and mark them deleted.  The scan
//! never touches the token slice itself; deletions go into the caller's
//! mask, so indices stay stable for the rest of the forward pass.

use crate::token::Token;

/// Shape of the collected type-hint expression, after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HintShape {
    /// No type declared.
    Absent,
    /// A single name, with any nullable `?` already removed.
    Simple(String),
    /// Contains `|`, including DNF types such as `(A&B)|null`.
    Union(String),
    /// Contains `&` but no `|`.
    Intersection(String),
}

impl HintShape {
    fn classify(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            HintShape::Absent
        } else if text.contains('|') {
            HintShape::Union(text.to_string())
        } else if text.contains('&') {
            HintShape::Intersection(text.to_string())
        } else {
            HintShape::Simple(text.trim_start_matches('?').trim().to_string())
        }
    }
}

/// Collect and strip the type hint of the parameter at `index`.
///
/// By-reference `&` and variadic `...` markers directly before the variable
/// are kept in place; the type is whatever precedes them.  When no type is
/// declared, nothing is deleted, not even the whitespace the scan walked
/// over.  Whitespace containing a line break is never deleted.
pub(crate) fn collect_type_hint(
    tokens: &[Token<'_>],
    deleted: &mut [bool],
    index: usize,
) -> HintShape {
    let end = marker_start(tokens, index);
    let start = scan_back(tokens, end, true)
        .or_else(|| scan_back(tokens, end, false))
        .unwrap_or(end);

    let text: String = tokens[start..end].iter().map(|t| t.text).collect();
    let shape = HintShape::classify(&text);
    if shape != HintShape::Absent {
        for (token, gone) in tokens[start..end].iter().zip(&mut deleted[start..end]) {
            // Line breaks survive so the line numbers of the rewritten
            // source match the original.
            *gone = !(token.is_whitespace() && token.text.contains(['\n', '\r']));
        }
    }
    shape
}

/// Index of the leftmost `&`/`...` marker belonging to the parameter at
/// `index`, or `index` itself when there is none.
fn marker_start(tokens: &[Token<'_>], index: usize) -> usize {
    let mut start = index;
    let mut i = index;
    while i > 0 {
        let token = &tokens[i - 1];
        if token.is_whitespace() {
            i -= 1;
        } else if token.is_parameter_marker() {
            i -= 1;
            start = i;
        } else {
            break;
        }
    }
    start
}

/// Walk backward from `end` (exclusive) while tokens belong to a type-hint
/// expression and return the index of the first one that does.
///
/// With `dnf` set, a balanced parenthesised group is part of the expression
/// when a `|` sits directly before or after it.  Any other group (the
/// `(set)` of an asymmetric visibility modifier, say) ends the scan right
/// after its `)`.  Returns `None` if a `)` was consumed without its `(`, in
/// which case the caller retries without DNF support.
fn scan_back(tokens: &[Token<'_>], end: usize, dnf: bool) -> Option<usize> {
    let mut parens = 0u32;
    let mut group_end = end;
    let mut i = end;
    while i > 0 {
        let token = &tokens[i - 1];
        let member = if dnf && token.is_punct(")") {
            if parens == 0 {
                group_end = i - 1;
            }
            parens += 1;
            true
        } else if dnf && token.is_punct("(") && parens > 0 {
            parens -= 1;
            if parens == 0 && !touches_pipe(tokens, i - 1, group_end, end) {
                return Some(group_end + 1);
            }
            true
        } else {
            token.is_type_hint_part()
        };
        if !member {
            break;
        }
        i -= 1;
    }
    (parens == 0).then_some(i)
}

/// Whether the nearest non-whitespace token before `open` or after `close`
/// (but before `end`) is a `|`.
fn touches_pipe(tokens: &[Token<'_>], open: usize, close: usize, end: usize) -> bool {
    let before = tokens[..open].iter().rev().find(|t| !t.is_whitespace());
    let after = tokens[close + 1..end].iter().find(|t| !t.is_whitespace());
    [before, after]
        .into_iter()
        .flatten()
        .any(|token| token.is_punct("|"))
}
