//! Canonical schema constants for structured logging and events
//!
//! Field names used by the operation boundary macros and by the section span.

// Canonical field keys for structured logging
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_ORDINAL: &str = "ordinal";

// Section span fields
pub const FIELD_SECTION: &str = "section";
pub const FIELD_RUN_ID: &str = "run_id";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_INTEGRITY_WARNING: &str = "integrity_warning";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_INTEGRITY_WARNING);
    }

    #[test]
    fn test_span_fields_differ_from_event_fields() {
        for span_field in [FIELD_SECTION, FIELD_RUN_ID] {
            assert_ne!(span_field, FIELD_OP);
            assert_ne!(span_field, FIELD_EVENT);
            assert_ne!(span_field, FIELD_ORDINAL);
        }
    }
}
