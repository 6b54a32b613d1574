//! Flat text rendering of query results.
//!
//! Every field of every row becomes one `column = value` line. Rows are not
//! delimited and values are not escaped.

use rusqlite::types::ValueRef;
use rusqlite::Statement;

use crate::error::{DbError, Result};

/// Render a single field the way SQLite's own text conversion does.
pub fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => format_real(r),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// Significant digits SQLite uses when converting a REAL to text (`%!.15g`).
const REAL_DIGITS: i32 = 15;

fn format_real(r: f64) -> String {
    if r.is_infinite() {
        let text = if r > 0.0 { "Inf" } else { "-Inf" };
        return text.to_string();
    }
    if r == 0.0 {
        return "0.0".to_string();
    }
    // Exponent after rounding to REAL_DIGITS significant digits decides the form
    let sci = format!("{:.*e}", (REAL_DIGITS - 1) as usize, r);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return r.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return r.to_string();
    };

    if (-4..REAL_DIGITS).contains(&exp) {
        let fixed = format!("{:.*}", (REAL_DIGITS - 1 - exp) as usize, r);
        with_point(trim_fraction(&fixed))
    } else {
        format!(
            "{}e{}{:02}",
            with_point(trim_fraction(mantissa)),
            if exp < 0 { '-' } else { '+' },
            exp.abs()
        )
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

// the `!` flag: a REAL always shows a decimal point
fn with_point(digits: &str) -> String {
    if digits.contains('.') {
        digits.to_string()
    } else {
        format!("{}.0", digits)
    }
}

/// Accumulates the result report row by row.
#[derive(Debug, Default)]
pub struct Report {
    text: String,
    rows: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `column = value` line.
    pub fn push_field(&mut self, column: &str, value: ValueRef<'_>) {
        self.text.push_str(column);
        self.text.push_str(" = ");
        self.text.push_str(&format_value(value));
        self.text.push('\n');
    }

    /// Number of rows appended so far, across all statements.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The accumulated report text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Step through all rows of a prepared statement, appending each field.
    pub fn collect(stmt: &mut Statement<'_>, params: impl rusqlite::Params) -> Result<Self> {
        let mut report = Report::new();
        report.append(stmt, params)?;
        Ok(report)
    }

    /// Run `stmt` to completion and append whatever rows it yields. Statements
    /// that return no columns are still executed.
    pub fn append(&mut self, stmt: &mut Statement<'_>, params: impl rusqlite::Params) -> Result<()> {
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params).map_err(DbError::execution)?;
        while let Some(row) = rows.next().map_err(DbError::execution)? {
            for (i, column) in columns.iter().enumerate() {
                let value = row.get_ref(i).map_err(DbError::execution)?;
                self.push_field(column, value);
            }
            self.rows += 1;
        }
        Ok(())
    }
}
