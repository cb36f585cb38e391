//! A1 range strings for sheet rows.

/// Letters of the last column in a span of `width` cells starting at A.
/// Widths below one are treated as one.
fn last_column(width: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = width.max(1);
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(char::from(b'A' + digit as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.into_iter().rev().collect()
}

/// Quote a sheet title for use in a range when it is not a plain word.
/// Embedded single quotes are doubled.
pub fn quote_sheet_title(title: &str) -> String {
    let plain = !title.is_empty()
        && title
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        title.to_string()
    } else {
        format!("'{}'", title.replace('\'', "''"))
    }
}

/// Anchor range for an append: first cell of the 1-based `row`.
pub fn row_anchor(title: &str, row: usize) -> String {
    format!("{}!A{row}", quote_sheet_title(title))
}

/// Range covering the first `width` cells of the 1-based `row`.
pub fn row_span(title: &str, row: usize, width: usize) -> String {
    format!(
        "{}!A{row}:{last}{row}",
        quote_sheet_title(title),
        last = last_column(width)
    )
}
