//! In-memory collection search. Pure and synchronous; never a network call.

use concierge_core::Resource;

/// Case-insensitive substring match over the given searchable fields.
pub fn matches<R: Resource>(entity: &R, fields: &[&'static str], query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    fields.iter().any(|field| {
        entity
            .search_field(field)
            .is_some_and(|value| value.to_lowercase().contains(&needle))
    })
}

/// Filter `rows` down to entities matching `query` on any of `fields`,
/// preserving order. A blank query is not a filter at all: the whole
/// collection comes back unchanged.
pub fn filter<R: Resource>(rows: &[R], fields: &[&'static str], query: &str) -> Vec<R> {
    if query.trim().is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|entity| matches(*entity, fields, query))
        .cloned()
        .collect()
}
