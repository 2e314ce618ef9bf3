//! Human-readable rendering of compile errors.
//!
//! A located error renders as
//!
//! ```text
//! 2:8: syntax error: unterminated string
//! (print "oops
//!        ^
//! ```
//!
//! and an error without a location as `error: <message>`.

use cafelisp_foundation::Error;

use crate::error::CliError;

/// Renders a compile error with its source line and a caret.
#[must_use]
pub fn render(err: &Error) -> String {
    let Some(location) = &err.location else {
        return format!("error: {err}");
    };

    let mut out = format!("{location}: {err}\n{}\n", location.line_text);
    // Tabs are kept so the caret lines up under tab-indented source.
    let skip = usize::try_from(location.column.saturating_sub(1)).unwrap_or(0);
    let padding: String = location
        .line_text
        .chars()
        .chain(std::iter::repeat(' '))
        .take(skip)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    out.push_str(&padding);
    out.push('^');
    out
}

/// Renders any driver failure for the terminal.
#[must_use]
pub fn render_cli(err: &CliError) -> String {
    match err {
        CliError::Compile(err) => render(err),
        other => format!("error: {other}"),
    }
}
