//! Greedy word wrapping for status text.
//!
//! Input is split into paragraphs on `'\n'`, each paragraph is wrapped on
//! whitespace, and the resulting lines are stored newline-terminated.
//! Widths are counted in `char`s; there is no display-width handling.

/// Wraps `text` into lines of at most `max_line_length` chars.
///
/// Empty paragraphs are dropped. A word longer than the width is kept whole
/// on its own line. Always returns at least one (possibly empty) line.
///
/// `max_line_length` must be at least 1; callers clamp it.
pub fn reflow(text: &str, max_line_length: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n').filter(|p| !p.is_empty()) {
        wrap_paragraph(paragraph, max_line_length, &mut lines);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn wrap_paragraph(paragraph: &str, max_line_length: usize, lines: &mut Vec<String>) {
    let words: Vec<&str> = paragraph.split_whitespace().collect();

    // Width of `current` plus the trailing space the next word would need.
    let mut current = String::new();
    let mut current_width: usize = 0;

    for (index, word) in words.iter().enumerate() {
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        current_width += word.chars().count() + 1;

        // Look ahead one word; the last word always stays on the current line.
        if let Some(next) = words.get(index + 1)
            && current_width + next.chars().count() + 1 > max_line_length
        {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
    }

    // A whitespace-only paragraph has no words and still yields one empty line.
    lines.push(current);
}

/// Joins wrapped lines into the stored form, each line newline-terminated.
pub fn join_lines(lines: &[String]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Counts the newline-terminated lines of stored status text.
///
/// This is the number of `'\n'`-separated segments minus the trailing one,
/// so `"a\nb\n"` has 2 lines, `"\n"` has 1 and `""` has 0.
pub fn count_lines(stored: &str) -> usize {
    stored.split('\n').count() - 1
}
