//! One module per Adamik endpoint family.
//!
//! Each service builds its endpoint path deterministically from typed
//! parameters, makes a single client call and turns the outcome into a
//! `Result<Value, ToolError>`.

pub mod account;
pub mod address;
pub mod chains;
pub mod generic;
pub mod presentation;
pub mod spec;
pub mod token;
pub mod transaction;
pub mod validators;

/// Appends `?nextPage=<cursor>`, percent-encoded, when a cursor is present.
pub(crate) fn with_next_page(path: String, next_page: Option<&str>) -> String {
    match next_page {
        Some(cursor) if !cursor.is_empty() => {
            let encoded: String = url::form_urlencoded::byte_serialize(cursor.as_bytes()).collect();
            format!("{}?nextPage={}", path, encoded)
        }
        _ => path,
    }
}
