//! Presentation of a [`ResultSet`]: JSON records for HTTP, a text grid for the terminal.

use serde_json::{Map, Value};

use crate::db::ResultSet;

/// Columns and rows in the order the database returned them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Rows changed by a statement without a result set.
    pub affected_rows: u64,
}

impl Table {
    pub fn from_result_set(rs: ResultSet) -> Self {
        Self {
            columns: rs.columns,
            rows: rs.rows,
            affected_rows: rs.affected_rows,
        }
    }

    /// One JSON object per row, keys in column order.
    ///
    /// Duplicate column names (e.g. `SELECT a.id, b.id`) collapse to the last value, as any
    /// JSON object would; `columns`/`rows` keep them all.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<Map<String, Value>>()
            })
            .collect()
    }

    /// Aligned ASCII grid followed by a row count; every row is printed.
    pub fn render_text(&self) -> String {
        if self.columns.is_empty() {
            return format!("Query OK, {} rows affected\n", self.affected_rows);
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let border = {
            let mut s = String::from("+");
            for w in &widths {
                s.push_str(&"-".repeat(w + 2));
                s.push('+');
            }
            s.push('\n');
            s
        };
        let line = |values: &[String]| {
            let mut s = String::from("|");
            for (i, w) in widths.iter().enumerate() {
                let v = values.get(i).map(String::as_str).unwrap_or("");
                let pad = w - v.chars().count();
                s.push(' ');
                s.push_str(v);
                s.push_str(&" ".repeat(pad + 1));
                s.push('|');
            }
            s.push('\n');
            s
        };

        let mut out = border.clone();
        out.push_str(&line(&self.columns));
        out.push_str(&border);
        for row in &cells {
            out.push_str(&line(row));
        }
        if !cells.is_empty() {
            out.push_str(&border);
        }
        match self.rows.len() {
            1 => out.push_str("(1 row)\n"),
            n => out.push_str(&format!("({} rows)\n", n)),
        }
        out
    }
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
