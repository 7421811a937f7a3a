const MAX_STEM_CHARS: usize = 80;

/// Windows-safe download name: `{stem}-extracted-text-{timestamp_ms}.txt`.
///
/// Without a usable source name the stem part is dropped.
pub fn download_filename(source_name: Option<&str>, timestamp_ms: i64) -> String {
    match source_name.map(file_stem).and_then(sanitize_stem) {
        Some(stem) => format!("{stem}-extracted-text-{timestamp_ms}.txt"),
        None => format!("extracted-text-{timestamp_ms}.txt"),
    }
}

fn file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

fn sanitize_stem(input: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars().take(MAX_STEM_CHARS) {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    if compacted.is_empty() {
        return None;
    }
    if is_reserved_windows_name(&compacted) {
        compacted.push('_');
    }
    Some(compacted)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
