//! Markdown text helpers.

/// Backslash-escape the characters Markdown treats as emphasis or escapes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '_' | '*' | '~') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn bold(s: &str) -> String {
    format!("**{}**", s)
}

pub fn italic(s: &str) -> String {
    format!("_{}_", s)
}
