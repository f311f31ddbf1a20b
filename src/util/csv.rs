//! CSV field escaping (RFC 4180).

/// Quote `field` if it contains a comma, quote, or line break.
///
/// # Examples
///
/// ```
/// use driller::util::csv::escape;
///
/// assert_eq!(escape("plain"), "plain");
/// assert_eq!(escape("a,b"), "\"a,b\"");
/// assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join already-rendered fields into one CSV line (without a newline).
pub fn join<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
