//! Outbound text sanitization
//!
//! Two audiences, two rule sets. Report bodies go back out through platform
//! embeds, so mass mentions are neutralized case-insensitively. Webhook text
//! lands in external channels that cannot scope mentions at all, so every
//! `@` and `<` is defanged.

/// Neutralize mass mentions in a report body
///
/// `@everyone` and `@here` (any case) become bracketed text that the platform
/// will not expand.
#[must_use]
pub fn sanitize_report(text: &str) -> String {
    let text = replace_ignore_ascii_case(text, "@everyone", "[at everyone]");
    replace_ignore_ascii_case(&text, "@here", "[at here]")
}

/// Defang text before posting to an external webhook
///
/// The receiving side has no way to disallow mentions or markup, so `@` and
/// `<` are replaced wholesale.
#[must_use]
pub fn sanitize_webhook(text: &str) -> String {
    text.replace('@', "[at]").replace('<', "[bracket]")
}

/// Case-insensitive ASCII substring replacement
///
/// Lowercasing ASCII never changes byte offsets, so indices found in the
/// lowered copy are valid in the original.
fn replace_ignore_ascii_case(input: &str, pattern: &str, replacement: &str) -> String {
    debug_assert!(pattern.is_ascii());

    let lowered = input.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();

    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    while let Some(found) = lowered[cursor..].find(&pattern) {
        let start = cursor + found;
        out.push_str(&input[cursor..start]);
        out.push_str(replacement);
        cursor = start + pattern.len();
    }
    out.push_str(&input[cursor..]);
    out
}
