//! `|`-separated multi-value parameters

/// Separator the web service uses for multi-value parameters
pub const MULTI_SEPARATOR: char = '|';

/// Join values with the multi-value separator
pub fn join_multi<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// Split a multi-value parameter, dropping empty segments
pub fn split_multi(value: &str) -> Vec<String> {
    value
        .split(MULTI_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
