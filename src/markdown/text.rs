//! Plain-text extraction from rendered HTML
//!
//! Produces roughly what a browser yields when copying the rendered
//! fragment as text: tags removed, entities decoded, block elements on
//! their own lines and whitespace collapsed outside `<pre>`.

/// Extract the text content of an HTML fragment.
pub fn html_text_content(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_pre = false;
    let mut rest = html;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => match rest.find('>') {
                Some(end) => {
                    handle_tag(&rest[1..end], &mut out, &mut in_pre);
                    rest = &rest[end + 1..];
                }
                None => {
                    out.push('<');
                    rest = &rest[1..];
                }
            },
            '&' => match decode_entity(rest) {
                Some((decoded, len)) => {
                    out.push(decoded);
                    rest = &rest[len..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            },
            c if c.is_whitespace() && !in_pre => {
                if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                rest = &rest[c.len_utf8()..];
            }
            c => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    let lines: Vec<&str> = out.lines().map(str::trim_end).collect();
    lines.join("\n").trim_matches('\n').to_string()
}

fn handle_tag(tag: &str, out: &mut String, in_pre: &mut bool) {
    // Comments, doctypes and processing instructions carry no text.
    if tag.starts_with('!') || tag.starts_with('?') {
        return;
    }

    let closing = tag.starts_with('/');
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match (name.as_str(), closing) {
        ("pre", false) => {
            push_break(out, 1);
            *in_pre = true;
        }
        ("pre", true) => {
            *in_pre = false;
            push_break(out, 2);
        }
        ("p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "ul" | "ol"
        | "table" | "section", true) => push_break(out, 2),
        ("li" | "tr" | "div", true) | ("br" | "hr", _) => push_break(out, 1),
        ("td" | "th", true) => out.push('\t'),
        ("input", false) if tag.contains("checkbox") => {
            out.push_str(if tag.contains("checked") { "[x] " } else { "[ ] " });
        }
        ("img", false) => {
            if let Some(alt) = attribute_value(tag, "alt") {
                out.push_str(alt);
            }
        }
        _ => {}
    }
}

/// Make sure `out` ends with at least `count` newlines (never at the start).
fn push_break(out: &mut String, count: usize) {
    if out.is_empty() {
        return;
    }
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
    let existing = out.chars().rev().take_while(|&c| c == '\n').count();
    for _ in existing..count {
        out.push('\n');
    }
}

fn attribute_value<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", attr);
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

/// Decode the entity at the start of `s`, returning the character and its byte length.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    let semi = s.char_indices().take(12).find(|&(_, c)| c == ';')?.0;
    let name = &s[1..semi];

    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)?
        }
    };

    Some((decoded, semi + 1))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
