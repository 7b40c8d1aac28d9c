use std::sync::atomic::{AtomicU64, Ordering};

static TMP_TAG_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Client-side id for a tag created inline from the note form, so the
/// multi-select can display it before the server call resolves.
///
/// Server tag ids are decimal strings, so the `tmp-` prefix can never
/// collide with a catalog id.
pub(crate) fn temp_tag_id() -> String {
    format!("tmp-{}", TMP_TAG_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Numeric coercion applied to string ids when building update/delete
/// request paths. A non-numeric id (e.g. a `tmp-*` id that was never
/// confirmed) targets the literal `NaN` segment, which the server rejects;
/// the client performs no pre-validation.
pub(crate) fn coerce_numeric_id(id: &str) -> String {
    match id.trim().parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => "NaN".to_string(),
    }
}

/// The same coercion for ids embedded in JSON payloads. `None` serializes
/// as `null`, which is what a non-numeric id degrades to on the wire.
pub(crate) fn coerce_numeric_id_value(id: &str) -> Option<i64> {
    id.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_tag_ids_are_unique_and_prefixed() {
        let a = temp_tag_id();
        let b = temp_tag_id();
        assert_ne!(a, b);
        assert!(a.starts_with("tmp-"));
        assert!(b.starts_with("tmp-"));
    }

    #[test]
    fn numeric_id_coerces_to_canonical_form() {
        assert_eq!(coerce_numeric_id("42"), "42");
        assert_eq!(coerce_numeric_id(" 7 "), "7");
        assert_eq!(coerce_numeric_id("007"), "7");
    }

    #[test]
    fn non_numeric_id_coerces_to_nan() {
        assert_eq!(coerce_numeric_id("tmp-3"), "NaN");
        assert_eq!(coerce_numeric_id("abc"), "NaN");
        assert_eq!(coerce_numeric_id(""), "NaN");
    }

    #[test]
    fn non_numeric_payload_id_degrades_to_null() {
        assert_eq!(coerce_numeric_id_value("13"), Some(13));
        assert_eq!(coerce_numeric_id_value("tmp-1"), None);
    }
}
