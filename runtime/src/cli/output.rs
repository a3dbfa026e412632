//! Terminal output helpers shared by the subcommands.
//!
//! Global flags are exported as `VITRINE_*` environment variables by `main`
//! so any command can consult them without threading them through.

use serde::Serialize;

pub fn is_json() -> bool {
    flag("VITRINE_JSON")
}

pub fn is_quiet() -> bool {
    flag("VITRINE_QUIET")
}

fn flag(key: &str) -> bool {
    std::env::var(key).map(|v| v == "1").unwrap_or(false)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: cannot encode output: {e}"),
    }
}

/// Status symbols, coloured unless `NO_COLOR`/`--no-color` is set.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        let color = std::env::var_os("NO_COLOR").is_none() && !flag("VITRINE_NO_COLOR");
        Self { color }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m✓\x1b[0m"
        } else {
            "✓"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m!\x1b[0m"
        } else {
            "!"
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[2m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

/// Shorten `text` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
