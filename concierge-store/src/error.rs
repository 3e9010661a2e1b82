/// Construction-time misconfiguration. Search fields are checked once when a
/// store is built, never per call.
#[derive(Debug, thiserror::Error)]
pub enum StoreConfigError {
    #[error("{field:?} is not a searchable field on {resource}")]
    UnknownSearchField {
        resource: &'static str,
        field: &'static str,
    },
}
