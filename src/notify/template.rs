//! Pure placeholder substitution for channel message templates.

/// Substitute `{name}` placeholders in `template` from `fields`.
///
/// Pure and total: a placeholder with no matching field renders as the empty
/// string, so a partially populated payload still yields a best-effort
/// message instead of no message.
pub fn render(template: &str, fields: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if let Some((_, value)) = fields.iter().find(|(key, _)| *key == name) {
                    out.push_str(value);
                }
                rest = &after[end + 1..];
            }
            None => {
                // unterminated placeholder, keep the raw text
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Join recipient tokens with a channel's mention delimiter.
pub fn join_mentions(receives: &[String], delimiter: &str) -> String {
    receives.join(delimiter)
}
