//! Todo-list section selection.
//!
//! A todo file is a sequence of sections headed by `#name description` lines.
//! Selecting `name` keeps only that section, with its heading rewritten to the
//! `# name description` form the renderer understands.

/// Leading alphanumeric token of a `#token ...` heading, if any.
fn heading_token(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_alphanumeric())
        .map_or(rest.len(), |(i, _)| i);
    (end > 0).then(|| &rest[..end])
}

/// Keep only the section whose heading token equals `item`.
///
/// An empty `item` selects the whole document. Every emitted line is newline
/// terminated.
pub fn select_section(document: &str, item: &str) -> String {
    if item.is_empty() {
        return document.to_string();
    }

    let mut output = String::new();
    let mut current: Option<&str> = None;

    for line in document.split('\n') {
        if let Some(token) = heading_token(line) {
            current = Some(token);
            if token == item {
                output.push_str("# ");
                output.push_str(&line[1..]);
                output.push('\n');
                continue;
            }
        }
        if current == Some(item) {
            output.push_str(line);
            output.push('\n');
        }
    }

    output
}
