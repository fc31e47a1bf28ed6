//! Sub-resource URL references.
//!
//! Creation payloads may point at existing rows with a relative URI of
//! the form `/api/v1/<resource>/<id>/` instead of a bare value.

/// Returns the id embedded in `value` when it is a URL reference to the
/// given resource, `None` when it is a bare value.
pub fn parse_resource_ref<'a>(value: &'a str, resource: &str) -> Option<&'a str> {
    let rest = value.strip_prefix("/api/v1/")?;
    let rest = rest.strip_prefix(resource)?;
    let rest = rest.strip_prefix('/')?;
    let id = rest.strip_suffix('/').unwrap_or(rest);
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id)
}

/// Builds the canonical URI for a resource row.
pub fn resource_uri(resource: &str, id: &str) -> String {
    format!("/api/v1/{}/{}/", resource, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_refs() {
        assert_eq!(parse_resource_ref("/api/v1/category/42/", "category"), Some("42"));
        assert_eq!(parse_resource_ref("/api/v1/speaker/ab-cd/", "speaker"), Some("ab-cd"));
    }

    #[test]
    fn accepts_refs_without_trailing_slash() {
        assert_eq!(parse_resource_ref("/api/v1/tag/7", "tag"), Some("7"));
    }

    #[test]
    fn rejects_bare_values_and_other_resources() {
        assert_eq!(parse_resource_ref("Guido", "speaker"), None);
        assert_eq!(parse_resource_ref("/api/v1/category/42/", "speaker"), None);
        assert_eq!(parse_resource_ref("/api/v1/category/", "category"), None);
        assert_eq!(parse_resource_ref("/api/v1/category/42/extra/", "category"), None);
    }

    #[test]
    fn round_trips_with_resource_uri() {
        let uri = resource_uri("video", "abc");
        assert_eq!(parse_resource_ref(&uri, "video"), Some("abc"));
    }
}
