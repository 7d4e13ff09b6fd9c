/// Trimmed, non-empty view of an optional request field.
///
/// Create payloads model every field as `Option` so that a missing field
/// surfaces as the endpoint's own message instead of a deserialize rejection.
pub(crate) fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
