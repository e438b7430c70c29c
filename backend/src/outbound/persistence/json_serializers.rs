//! JSONB encoding for note sections.
//!
//! Sections are stored as one JSON object keyed by section name. Missing
//! keys decode as empty text so rows written before a section existed still
//! load.

use serde_json::Value;

use crate::domain::NoteSections;

pub(super) fn sections_to_json(sections: &NoteSections) -> Result<Value, String> {
    serde_json::to_value(sections).map_err(|err| format!("encode note sections: {err}"))
}

/// Decode stored sections. `null` reads as empty sections.
pub(super) fn json_to_sections(value: Value) -> Result<NoteSections, String> {
    if value.is_null() {
        return Ok(NoteSections::default());
    }
    serde_json::from_value(value).map_err(|err| format!("decode note sections: {err}"))
}
