//! CSV encoding for record exports.
//!
//! Fields containing a comma, quote, CR or LF are wrapped in double quotes with
//! inner quotes doubled. Rows are joined with `\n`; the header row comes first.

/// A record that can be written as one CSV row.
pub trait CsvRow {
    /// Column names, in output order.
    fn headers() -> &'static [&'static str];

    /// Field values matching [`CsvRow::headers`].
    fn fields(&self) -> Vec<String>;
}

/// Escape a single field.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render an optional value as an empty field when absent.
pub fn opt_field<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build a CSV document with a header row followed by one row per record.
pub fn build_csv<R: CsvRow>(records: &[R]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(join_row(R::headers()));
    for record in records {
        lines.push(join_row(&record.fields()));
    }
    lines.join("\n")
}
