//! Small helpers shared by the catalog queries

/// Build a `LIKE`/`ILIKE` pattern that matches `keyword` literally anywhere in the column.
///
/// Backslash is the default escape character in PostgreSQL patterns.
pub fn contains_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Title match used by report and press release search.
///
/// `$1` is the raw keyword, `$2` the escaped substring pattern.
pub const TITLE_MATCH_SQL: &str = "(to_tsvector('english', {t}.title) @@ plainto_tsquery('english', $1) OR {t}.title ILIKE $2)";

/// Render [`TITLE_MATCH_SQL`] for a table alias
pub fn title_match(alias: &str) -> String {
    TITLE_MATCH_SQL.replace("{t}", alias)
}

/// Newest first; `created_date` is text and cast at query time
pub fn newest_first(alias: &str) -> String {
    format!("{a}.created_date::timestamp DESC, {a}.id ASC", a = alias)
}
