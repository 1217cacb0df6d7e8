/// Greedy word wrap.
///
/// Words are accumulated into a line, joined by single spaces, until appending the next word
/// would make `measure(line)` exceed `max_width`; the line is then committed and the word starts
/// the next one. A word wider than `max_width` on its own still gets its own line. Whitespace-only
/// input produces no lines.
pub fn wrap_text(text: &str, max_width: f64, mut measure: impl FnMut(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_owned()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Vertical centre of the first line of a block of `line_count` lines centred on `anchor_y`.
pub fn centered_block_start(anchor_y: f64, line_count: usize, line_height: f64) -> f64 {
    anchor_y - (line_count as f64 * line_height) / 2.0 + line_height / 2.0
}

/// Vertical centres of each line of a block centred on `anchor_y`.
pub fn block_line_centers(anchor_y: f64, line_count: usize, line_height: f64) -> Vec<f64> {
    let start = centered_block_start(anchor_y, line_count, line_height);
    (0..line_count)
        .map(|i| start + i as f64 * line_height)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
