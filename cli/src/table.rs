/*
 * table.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of unvm, a Node.js version manager.
 *
 * unvm is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * unvm is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with unvm.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Column-aligned text table for `unvm list`.

use std::fmt;

struct Column {
    label: &'static str,
    width: usize,
    left: bool,
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Columns as `(label, left_aligned)`.
    pub fn new(columns: &[(&'static str, bool)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|&(label, left)| Column {
                    label,
                    width: label.len(),
                    left,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells are blank, extra cells are ignored.
    pub fn push(&mut self, cells: Vec<String>) {
        let mut row = cells;
        row.resize(self.columns.len(), String::new());
        for (column, cell) in self.columns.iter_mut().zip(&row) {
            column.width = column.width.max(cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn write_line<'a>(
        &self,
        f: &mut fmt::Formatter<'_>,
        cells: impl Iterator<Item = &'a str>,
    ) -> fmt::Result {
        let mut line = String::new();
        for (column, cell) in self.columns.iter().zip(cells) {
            if column.left {
                line.push_str(&format!("{:<width$} ", cell, width = column.width));
            } else {
                line.push_str(&format!("{:>width$} ", cell, width = column.width));
            }
        }
        writeln!(f, "{}", line.trim_end())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_line(f, self.columns.iter().map(|c| c.label))?;
        for row in &self.rows {
            self.write_line(f, row.iter().map(String::as_str))?;
        }
        Ok(())
    }
}
