/// Reflow `text` so each line fits in `width` columns, keeping every line's indentation.
///
/// Lines already within the budget are kept verbatim. Longer lines are greedily packed
/// word by word, each continuation line re-prefixed with the original indentation. A
/// single word longer than the budget is emitted on its own line rather than split.
/// Widths are counted in characters. Only ASCII whitespace separates words, so a
/// non-breaking space stays inside its word.
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        wrap_line(line, width, &mut out);
    }
    out.join("\n")
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    if line.chars().count() <= width {
        out.push(line.to_string());
        return;
    }

    let indent_len = line.len() - line.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
    let indent = &line[..indent_len];
    let indent_width = indent.chars().count();

    let mut current = String::new();
    let mut current_width = 0;
    for word in line.split(|c: char| c.is_ascii_whitespace()).filter(|w| !w.is_empty()) {
        let word_width = word.chars().count();
        if current.is_empty() {
            current.push_str(indent);
            current.push_str(word);
            current_width = indent_width + word_width;
        } else if current_width + 1 + word_width > width {
            out.push(std::mem::take(&mut current));
            current.push_str(indent);
            current.push_str(word);
            current_width = indent_width + word_width;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        }
    }

    // A whitespace-only line longer than the budget has no words to keep.
    out.push(current);
}
