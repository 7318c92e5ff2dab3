const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"];

/// HTML-escapes `& < > " '`.
///
/// An `&` that already starts one of the five entities produced here is kept
/// as is, so escaping a value read back from a previous run is a no-op.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (idx, c) in input.char_indices() {
        match c {
            '&' => {
                let rest = &input[idx..];
                if ENTITIES.iter().any(|entity| rest.starts_with(entity)) {
                    out.push('&');
                } else {
                    out.push_str("&amp;");
                }
            }
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }

    out
}
