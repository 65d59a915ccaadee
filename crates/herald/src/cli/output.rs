//! Shared output helpers.

use herald_error::{ConfigError, HeraldResult};
use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> HeraldResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ConfigError::new(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// First `max` characters of `text` on one line, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
