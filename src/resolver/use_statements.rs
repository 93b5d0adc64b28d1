//! `use` statement and namespace extraction.
//!
//! This module walks the `mago_syntax` AST and builds one import table per
//! namespace block, mapping lowercase aliases to fully-qualified names.
use std::collections::HashMap;

use mago_span::HasSpan;
use mago_syntax::ast::*;

use super::NamespaceScope;
use crate::util::short_name;

/// Walk top-level statements, filling `global` with imports that live
/// outside any namespace and pushing one [`NamespaceScope`] per namespace
/// declaration, in source order.
pub(super) fn collect_scopes<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
    global: &mut HashMap<String, String>,
    scopes: &mut Vec<NamespaceScope>,
) {
    for statement in statements {
        match statement {
            Statement::Use(use_stmt) => {
                extract_use_items(&use_stmt.items, global);
            }
            Statement::Namespace(namespace) => {
                let name = namespace
                    .name
                    .as_ref()
                    .map(|ident| ident.value().to_string())
                    .filter(|name| !name.is_empty());

                let mut imports = HashMap::new();
                for inner in namespace.statements().iter() {
                    if let Statement::Use(use_stmt) = inner {
                        extract_use_items(&use_stmt.items, &mut imports);
                    }
                }

                let span = namespace.span();
                scopes.push(NamespaceScope {
                    namespace: name,
                    start: span.start.offset,
                    imports,
                });
            }
            _ => {}
        }
    }
}

/// Extract individual use items from a `UseItems` node.
fn extract_use_items(items: &UseItems, imports: &mut HashMap<String, String>) {
    match items {
        UseItems::Sequence(seq) => {
            // `use Foo\Bar;` or `use Foo\Bar, Baz\Qux;`
            for item in seq.items.iter() {
                register_use_item(item, None, imports);
            }
        }
        UseItems::TypedSequence(seq) => {
            // `use function Foo\bar;` / `use const Foo\BAR;` never name a type.
            if seq.r#type.is_function() || seq.r#type.is_const() {
                return;
            }
            for item in seq.items.iter() {
                register_use_item(item, None, imports);
            }
        }
        UseItems::TypedList(list) => {
            if list.r#type.is_function() || list.r#type.is_const() {
                return;
            }
            let prefix = list.namespace.value();
            for item in list.items.iter() {
                register_use_item(item, Some(prefix), imports);
            }
        }
        UseItems::MixedList(list) => {
            // `use Foo\{Bar, function baz, const QUX};`
            let prefix = list.namespace.value();
            for maybe_typed in list.items.iter() {
                if let Some(ref t) = maybe_typed.r#type
                    && (t.is_function() || t.is_const())
                {
                    continue;
                }
                register_use_item(&maybe_typed.item, Some(prefix), imports);
            }
        }
    }
}

/// Register a single `UseItem`.
///
/// With a group prefix the item name is relative to it: for
/// `use Foo\{Bar}` the prefix is `"Foo"` and the FQN is `"Foo\Bar"`.
/// Aliases are stored lowercase because PHP class names are
/// case-insensitive.
fn register_use_item(
    item: &UseItem,
    group_prefix: Option<&str>,
    imports: &mut HashMap<String, String>,
) {
    let item_name = item.name.value();

    let fqn = match group_prefix {
        Some(prefix) => format!(
            "{}\\{}",
            prefix.trim_start_matches('\\').trim_end_matches('\\'),
            item_name
        ),
        None => item_name.trim_start_matches('\\').to_string(),
    };

    let alias = match item.alias {
        Some(ref alias) => alias.identifier.value.to_string(),
        None => short_name(&fqn).to_string(),
    };

    imports.insert(alias.to_ascii_lowercase(), fqn);
}
