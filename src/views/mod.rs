//! Server-rendered HTML pages.
//!
//! Pages are assembled with `format!`; every value that originates from user input or the
//! database passes through [`escape`] before it is interpolated.

mod matches;
mod players;
mod students;

pub use matches::{dummy_matches_added, import_report};
pub use players::{create_player_form, dummy_player_added, initdb_done, players_index};
pub use students::{admin_page, dashboard, login_form, register_form};

/// Escape text for inclusion in HTML element content or a quoted attribute.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an optional value, rendering `None` as an empty string.
fn escape_opt(raw: Option<&str>) -> String {
    raw.map(escape).unwrap_or_default()
}

/// Wrap page content in the shared document shell.
#[must_use]
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | Pitchside</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Players</a> | <a href=\"/dashboard\">Dashboard</a> | \
         <a href=\"/login\">Login</a> | <a href=\"/register\">Register</a></nav>\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Human-readable error page used by `AppError`.
#[must_use]
pub fn error_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to home</a></p>",
            escape(title),
            escape(message)
        ),
    )
}
