/// Escape tokens the diagram source uses for characters that would otherwise
/// clash with shape delimiters.
const ESCAPES: [(&str, char); 5] = [
    ("#quot;", '"'),
    ("#40;", '('),
    ("#41;", ')'),
    ("#39;", '\''),
    ("#amp;", '&'),
];

/// Decode escape tokens, then strip surrounding double quotes and whitespace.
/// Total: `decode("")` is `""`.
///
/// Tokens are replaced in a single left-to-right pass, so the output of one
/// replacement is never decoded again.
///
/// Whitespace is trimmed both before and after the quotes are stripped, so
/// `  "x"  ` decodes to `x` rather than keeping the padding around the quotes.
pub fn decode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('#') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ESCAPES.iter().find(|(token, _)| rest.starts_with(token)) {
            Some((token, ch)) => {
                out.push(*ch);
                rest = &rest[token.len()..];
            }
            None => {
                out.push('#');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    out.trim().trim_matches('"').trim().to_string()
}
