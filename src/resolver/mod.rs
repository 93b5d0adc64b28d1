//! Import-table name resolution.
//!
//! The rewriter only needs two questions answered about a name: what is
//! its fully-qualified form, and can it back an object double at all.  The
//! [`NameResolver`] trait is the seam; [`NamespaceResolver`] is the
//! implementation used by the CLI and the tests, built on the `mago_syntax`
//! parser.
//!
//! # Resolution rules
//!
//!   - `\Acme\Mailer` is already fully qualified
//!   - `namespace\Mailer` is relative to the current namespace
//!   - `Mailer` goes through the import table, then the current namespace
//!   - `Acme\Mailer` expands its first segment through the import table,
//!     otherwise the current namespace is prepended
//!   - builtin types (`int`, `array`, `mixed`, ...) fail with
//!     [`ResolveError::NonObjectType`]
//!   - `self`, `static`, `parent` and malformed names fail with
//!     [`ResolveError::Unresolvable`]
//!
//! Import aliases match case-insensitively, like PHP.

mod use_statements;

use std::collections::HashMap;

use bumpalo::Bump;
use mago_syntax::parser::parse_file_content;

use crate::error::ResolveError;

/// Builtin type names that can never be an object double.
/// Aliases such as `integer` or `boolean` are not among them: PHP reads
/// those as class names.
const NON_OBJECT_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "array", "callable", "iterable", "object", "mixed", "void",
    "never", "null", "false", "true",
];

/// Class-relative type names that an import table cannot resolve.
const RELATIVE_CLASS_TYPES: &[&str] = &["self", "static", "parent"];

/// Maps names as written in source to fully-qualified names.
pub trait NameResolver {
    /// Learn the namespaces and imports of `source`.  Must be called before
    /// any [`resolve`](NameResolver::resolve) for that source; replaces
    /// whatever was learned before.
    fn analyse(&mut self, source: &str);

    /// Resolve a type name referenced at byte offset `position`.
    fn resolve(&self, name: &str, position: u32) -> Result<String, ResolveError>;

    /// Fully-qualified name of a class *declared* at `position`.  Declared
    /// names only take the namespace prefix; imports do not apply.
    fn qualify_class(&self, name: &str, position: u32) -> String;
}

/// One `namespace` block and the imports declared inside it.
#[derive(Debug, Clone, Default)]
pub(crate) struct NamespaceScope {
    pub namespace: Option<String>,
    /// Byte offset of the `namespace` keyword.
    pub start: u32,
    /// Lowercase alias → fully-qualified name.
    pub imports: HashMap<String, String>,
}

impl NamespaceScope {
    fn qualify(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, name),
            None => name.to_string(),
        }
    }
}

/// [`NameResolver`] backed by the `use` statements and `namespace`
/// declarations of the analysed source.
#[derive(Debug, Clone, Default)]
pub struct NamespaceResolver {
    /// Imports outside any namespace declaration.
    global: NamespaceScope,
    /// Namespace blocks in source order.
    scopes: Vec<NamespaceScope>,
}

impl NamespaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The namespace in effect at `position`, if any.
    pub fn namespace_at(&self, position: u32) -> Option<&str> {
        self.scope_at(position).namespace.as_deref()
    }

    /// The scope governing `position`: the last namespace declared at or
    /// before it.  PHP forbids code between braced namespace blocks, so this
    /// is correct for both the braced and the statement form.
    fn scope_at(&self, position: u32) -> &NamespaceScope {
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.start <= position)
            .unwrap_or(&self.global)
    }
}

impl NameResolver for NamespaceResolver {
    fn analyse(&mut self, source: &str) {
        let source_owned = source.to_string();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let arena = Bump::new();
            let file_id = mago_database::file::FileId::new("input.php");
            let program = parse_file_content(&arena, file_id, &source_owned);

            let mut global = HashMap::new();
            let mut scopes = Vec::new();
            use_statements::collect_scopes(program.statements.iter(), &mut global, &mut scopes);
            (global, scopes)
        }));

        match result {
            Ok((global, scopes)) => {
                tracing::debug!(
                    namespaces = scopes.len(),
                    global_imports = global.len(),
                    "analysed import table"
                );
                self.global = NamespaceScope {
                    imports: global,
                    ..NamespaceScope::default()
                };
                self.scopes = scopes;
            }
            Err(_) => {
                tracing::error!("parser panicked while analysing imports");
                self.global = NamespaceScope::default();
                self.scopes.clear();
            }
        }
    }

    fn resolve(&self, name: &str, position: u32) -> Result<String, ResolveError> {
        if !is_valid_name(name) {
            return Err(ResolveError::Unresolvable(name.to_string()));
        }
        let scope = self.scope_at(position);

        // ── Fully qualified name (leading `\`) ──────────────
        if let Some(stripped) = name.strip_prefix('\\') {
            return Ok(stripped.to_string());
        }

        // ── Namespace-relative name (`namespace\Foo`) ───────
        if let Some((head, rest)) = name.split_once('\\')
            && head.eq_ignore_ascii_case("namespace")
        {
            return Ok(scope.qualify(rest));
        }

        // ── Unqualified name ────────────────────────────────
        if !name.contains('\\') {
            let lower = name.to_ascii_lowercase();
            if NON_OBJECT_TYPES.contains(&lower.as_str()) {
                return Err(ResolveError::NonObjectType(name.to_string()));
            }
            if RELATIVE_CLASS_TYPES.contains(&lower.as_str()) {
                return Err(ResolveError::Unresolvable(name.to_string()));
            }
            if let Some(fqn) = scope.imports.get(&lower) {
                return Ok(fqn.clone());
            }
            return Ok(scope.qualify(name));
        }

        // ── Qualified name ──────────────────────────────────
        // `OA\Endpoint` with `use Swagger\OpenAPI as OA;` expands to
        // `Swagger\OpenAPI\Endpoint`.
        let first_segment = name.split('\\').next().unwrap_or(name);
        if let Some(prefix) = scope.imports.get(&first_segment.to_ascii_lowercase()) {
            return Ok(format!("{}{}", prefix, &name[first_segment.len()..]));
        }
        Ok(scope.qualify(name))
    }

    fn qualify_class(&self, name: &str, position: u32) -> String {
        self.scope_at(position).qualify(name)
    }
}

/// `Foo`, `Foo\Bar` or `\Foo\Bar`, with every segment a PHP identifier.
fn is_valid_name(name: &str) -> bool {
    let body = name.strip_prefix('\\').unwrap_or(name);
    !body.is_empty()
        && body.split('\\').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || !c.is_ascii())
                && chars.all(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii())
        })
}
