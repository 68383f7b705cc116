//! Resolution of `@id` reference tokens against the global table.

use super::error::{Result, SiqError};
use super::models::Global;

/// Resolve a reference token of the form `@id` or `@id#specification`.
///
/// Text that does not start with `@` is not a reference and is returned
/// unchanged. Otherwise the id is looked up in the global author table first,
/// then the source table; a `#specification` suffix is appended to the
/// resolved display name, separated by a space.
///
/// # Errors
/// Returns [`SiqError::ReferenceNotFound`] (carrying the original token) if
/// the id is absent from both namespaces, or the package has no global table.
pub fn reference(token: &str, global: Option<&Global>) -> Result<String> {
    let Some(body) = token.strip_prefix('@') else {
        return Ok(token.to_string());
    };

    let (id, specification) = match body.split_once('#') {
        Some((id, spec)) => (id, spec),
        None => (body, ""),
    };

    let name = global.and_then(|g| {
        // Authors take priority over sources.
        g.authors
            .iter()
            .chain(g.sources.iter())
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
    });

    match name {
        Some(name) if !specification.is_empty() => Ok(format!("{name} {specification}")),
        Some(name) => Ok(name.to_string()),
        None => Err(SiqError::ReferenceNotFound {
            token: token.to_string(),
        }),
    }
}
