/// Longest upstream body excerpt that is logged or returned to clients.
pub const PREVIEW_CHARS: usize = 200;

/// Trims the input and keeps at most `max` characters.
pub fn clip(input: Option<&str>, max: usize) -> String {
    input
        .map(|s| s.trim().chars().take(max).collect::<String>())
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

/// Like [`clip`], but an empty result becomes `None`.
pub fn clip_opt(input: Option<&str>, max: usize) -> Option<String> {
    Some(clip(input, max)).filter(|s| !s.is_empty())
}

pub fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        return trimmed.to_string();
    }

    let mut out: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    out.push('…');
    out
}

/// Upstream fields that are present but empty count as missing.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
