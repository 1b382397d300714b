//! Change detection between editor text and host text

/// Normalize text for comparison.
///
/// Line endings become `\n`, trailing whitespace is removed from every line,
/// and leading and trailing empty lines are dropped.
pub fn normalize(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

/// True when the two texts differ after [`normalize`].
pub fn differ(a: &str, b: &str) -> bool {
    normalize(a) != normalize(b)
}
