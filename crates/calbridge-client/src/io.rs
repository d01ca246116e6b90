//! Input reading and JSON rendering.

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::ClientResult;

/// Reads the whole input, from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> ClientResult<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Returns true when `path` names an iCalendar file.
pub fn is_ics_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ics"))
}

/// Renders `value` as JSON, pretty-printed or on one line.
pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> ClientResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}
