//! Small string helpers shared across modules.

/// The last segment of a namespace-qualified name.
///
/// `"Acme\\Mailer"` → `"Mailer"`, `"Mailer"` → `"Mailer"`.
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// The namespace part of a qualified name, without the trailing `\`.
///
/// Returns `None` for names in the global namespace.
pub(crate) fn namespace_of(name: &str) -> Option<&str> {
    let name = name.strip_prefix('\\').unwrap_or(name);
    name.rsplit_once('\\').map(|(ns, _)| ns)
}
