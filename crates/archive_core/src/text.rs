/// Trim and collapse internal whitespace runs to single spaces.
///
/// Every string field extracted from a page goes through this before a
/// record is built; the source markup pads cell text with newlines and
/// indentation.
pub fn normalize_ws(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for word in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
