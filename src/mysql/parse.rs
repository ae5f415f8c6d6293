//! Parsing of `mysql --batch --raw --silent --column-names` output.
//!
//! The first line holds the column names, every following line one row.
//! Fields are separated by a single tab. `--raw` disables escaping, so a tab
//! or newline inside a value cannot be told apart from a separator; lines are
//! split naively and never unescaped.

use super::QueryResult;

/// Splits client stdout into column names and rows.
pub fn parse_batch_output(stdout: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut lines = stdout.lines();

    let Some(header) = lines.next() else {
        return (Vec::new(), Vec::new());
    };

    let columns = split_fields(header);
    let rows = lines.map(split_fields).collect();

    (columns, rows)
}

/// Builds a [`QueryResult`] from client stdout, keeping the raw text.
pub fn parse_query_result(stdout: &str) -> QueryResult {
    let (columns, rows) = parse_batch_output(stdout);
    QueryResult::with_data(columns, rows).with_raw_output(stdout)
}

fn split_fields(line: &str) -> Vec<String> {
    line.split('\t').map(String::from).collect()
}
