use std::sync::LazyLock;

use regex::Regex;

pub const LINE_BREAK: &str = "<br>";
pub const BULLET_GLYPH: &str = "• ";

static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold span pattern is valid"));

/// Renders reply text into widget markup.
///
/// Lines starting with `"- "` become bullet lines, line breaks become `<br>`, and `**X**`
/// becomes `<strong>X</strong>`. Nothing is escaped. Run once at render time; the output is
/// not meant to be fed back in.
pub fn format_message(text: &str) -> String {
    let joined = text
        .split('\n')
        .map(bullet_line)
        .collect::<Vec<_>>()
        .join(LINE_BREAK);

    BOLD_SPAN
        .replace_all(&joined, "<strong>${1}</strong>")
        .into_owned()
}

fn bullet_line(line: &str) -> String {
    match line.strip_prefix("- ") {
        Some(rest) if !rest.is_empty() => format!("{BULLET_GLYPH}{rest}"),
        _ => line.to_string(),
    }
}
