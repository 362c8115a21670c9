//! Row model shared by every exporter, and the column-aligned text table.

use crate::parser::schema::{MappingRecord, MemorySwapRecord, ProcessMemoryRecord};
use crate::utils::config::TIMESTAMP_FORMAT;
use serde::Serialize;

/// One cell of an exported row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(u64),
    Float(f64),
    Empty,
}

impl Cell {
    /// Text as printed in a console table
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(n) => n.to_string(),
            Cell::Float(v) => format!("{:.2}", v),
            Cell::Empty => String::new(),
        }
    }
}

/// A record that can be written as one row of a table
///
/// `HEADERS` must match the serde field names so CSV and XLSX headers agree.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

impl TableRow for ProcessMemoryRecord {
    const HEADERS: &'static [&'static str] = &["timestamp", "entity_name", "pss", "rss", "vss"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            Cell::Text(self.entity_name.clone()),
            Cell::Float(self.pss),
            Cell::Float(self.rss),
            Cell::Float(self.vss),
        ]
    }
}

impl TableRow for MemorySwapRecord {
    const HEADERS: &'static [&'static str] = &[
        "timestamp",
        "index",
        "kind",
        "total",
        "used",
        "free",
        "shared",
        "buffers_cache",
        "available",
    ];

    fn cells(&self) -> Vec<Cell> {
        let optional = |v: Option<u64>| v.map(Cell::Int).unwrap_or(Cell::Empty);

        vec![
            Cell::Text(self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            Cell::Int(self.index as u64),
            Cell::Text(self.kind.to_string()),
            Cell::Int(self.total),
            Cell::Int(self.used),
            Cell::Int(self.free),
            optional(self.shared),
            optional(self.buffers_cache),
            optional(self.available),
        ]
    }
}

impl TableRow for MappingRecord {
    const HEADERS: &'static [&'static str] = &[
        "protection_mode",
        "mapping_label",
        "size_kb",
        "proportional_size_kb",
        "dirty_kb",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.protection_mode.clone()),
            Cell::Text(self.mapping_label.clone()),
            Cell::Int(self.size_kb),
            Cell::Int(self.proportional_size_kb),
            Cell::Int(self.dirty_kb),
        ]
    }
}

/// Column alignment in a text table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Console table with padded columns
///
/// Widths grow to fit the widest header or cell, never shrinking below the
/// configured minimum.
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    aligns: Vec<Align>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            aligns: columns.iter().map(|(_, a)| *a).collect(),
            widths: columns.iter().map(|(h, _)| h.chars().count()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_min_widths(mut self, min_widths: &[usize]) -> Self {
        for (width, min) in self.widths.iter_mut().zip(min_widths) {
            *width = (*width).max(*min);
        }
        self
    }

    pub fn push_row(&mut self, cells: &[Cell]) {
        let row: Vec<String> = cells.iter().map(Cell::display).collect();
        for (width, text) in self.widths.iter_mut().zip(&row) {
            *width = (*width).max(text.chars().count());
        }
        self.rows.push(row);
    }

    /// Header, dashed separator, then one line per row
    pub fn render(&self) -> Vec<String> {
        let header = self.format_line(&self.headers);
        let separator = "-".repeat(header.chars().count());

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(header);
        lines.push(separator);
        lines.extend(self.rows.iter().map(|row| self.format_line(row)));
        lines
    }

    fn format_line(&self, fields: &[String]) -> String {
        fields
            .iter()
            .zip(self.widths.iter().zip(&self.aligns))
            .map(|(field, (width, align))| pad(field, *width, *align))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn pad(field: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(field.chars().count()));
    match align {
        Align::Left => format!("{}{}", field, fill),
        Align::Right => format!("{}{}", fill, field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = TextTable::new(&[("Name", Align::Left), ("Size", Align::Right)]);
        table.push_row(&[Cell::Text("a".into()), Cell::Int(1000)]);
        table.push_row(&[Cell::Text("longer".into()), Cell::Int(5)]);

        let lines = table.render();
        assert_eq!(lines[0], "Name   Size");
        assert_eq!(lines[1], "-----------");
        assert_eq!(lines[2], "a      1000");
        assert_eq!(lines[3], "longer    5");
    }

    #[test]
    fn test_min_widths() {
        let table = TextTable::new(&[("Mode", Align::Left), ("PSS", Align::Right)])
            .with_min_widths(&[7, 3]);
        assert_eq!(table.render()[0], "Mode    PSS");
    }

    #[test]
    fn test_float_cells_use_two_decimals() {
        assert_eq!(Cell::Float(1.5).display(), "1.50");
        assert_eq!(Cell::Empty.display(), "");
    }
}
