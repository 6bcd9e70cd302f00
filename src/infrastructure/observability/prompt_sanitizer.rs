const MAX_VISIBLE_CHARS: usize = 100;

const SECRET_MARKERS: [&str; 6] = [
    "Bearer ",
    "api_key=",
    "apikey=",
    "password=",
    "secret=",
    "token=",
];

/// Shortens user-supplied prompt text and masks credentials before it is logged.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, total_chars)
    } else {
        trimmed.to_string()
    };

    SECRET_MARKERS
        .iter()
        .fold(visible, |text, marker| redact_after(&text, marker))
}

/// Replaces the value following every occurrence of `marker`.
fn redact_after(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(marker) {
        let value_start = idx + marker.len();
        out.push_str(&rest[..value_start]);
        out.push_str("[REDACTED]");

        let value_len = rest[value_start..]
            .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\''))
            .unwrap_or(rest.len() - value_start);
        rest = &rest[value_start + value_len..];
    }

    out.push_str(rest);
    out
}
