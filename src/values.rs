//! Element-list splitting and repair
//!
//! An array-literal body arrives as one raw string. Splitting it on commas
//! is deliberately naive about quoting — a comma inside `"hello, world"`
//! fragments the element — and the repair pass owns putting such fragments
//! back together. Keeping the two steps separate makes each one trivially
//! testable; repair is idempotent.

/// Split a raw array-literal body into candidate element strings.
///
/// A boundary is a comma plus any following whitespace, except when the
/// text after the whitespace begins with `",` — that shape marks a literal
/// comma-string element, not a separator. Separators are consumed.
pub fn split_elements(body: &str) -> Vec<String> {
    let bytes = body.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b',' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if !body[j..].starts_with("\",") {
                out.push(body[start..i].to_string());
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    out.push(body[start..].to_string());
    out
}

/// True when a candidate opens with a quote/paren but does not close with
/// one, or vice versa — the symptom of a fragmented split.
fn is_broken(value: &str) -> bool {
    let (Some(first), Some(last)) = (value.chars().next(), value.chars().last()) else {
        return false;
    };
    let opens = matches!(first, '"' | '(');
    let closes = matches!(last, '"' | ')');
    opens != closes
}

/// Clean a noisy split into a well-formed ordered element list.
///
/// Zero-length candidates are dropped. A broken candidate absorbs its
/// immediate successor and is rechecked, repeating until it is well-formed;
/// a broken final candidate with no successor ends the pass as-is.
pub fn repair_elements(mut values: Vec<String>) -> Vec<String> {
    values.retain(|v| !v.is_empty());
    let mut i = 0;
    while i < values.len() {
        if is_broken(&values[i]) {
            if i + 1 >= values.len() {
                break;
            }
            let next = values.remove(i + 1);
            values[i].push_str(&next);
            continue;
        }
        i += 1;
    }
    values
}
