//! Tabular rendering of field histories
//!
//! Turns a watcher's accumulated histories into a [`TableView`]: a header
//! row of `Field`, `Initial`, `Change 1`, `Change 2`, ... plus one row per
//! tracked field, with empty cells where a field had nothing new to
//! report. The view is a logical shape plus side-effect-free text
//! formatting; pushing it to a refreshable terminal region is the
//! application's job.

use crate::watcher::Watcher;

/// A rendered table: ordered rows of ordered cells, plus a header row
///
/// Consumable by any terminal or stream sink. Rendering the same watcher
/// state twice produces an identical view.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Title shown in the table's top border (the record's identity)
    pub title: String,
    /// Header cells: `Field`, then one label per committed version
    pub header: Vec<String>,
    /// One row per tracked field; row length always equals header length
    pub rows: Vec<Vec<String>>,
}

/// Produces a [`TableView`] from a watcher's current state
pub struct Renderer;

impl Renderer {
    /// Render one row per tracked field, one column per committed version.
    ///
    /// Column 1 is labeled `Initial`, later columns `Change N`. A `None`
    /// history entry renders as an empty cell.
    pub fn render(watcher: &Watcher) -> TableView {
        let mut header = Vec::with_capacity(watcher.version_count() + 1);
        header.push("Field".to_string());
        for n in 0..watcher.version_count() {
            if n == 0 {
                header.push("Initial".to_string());
            } else {
                header.push(format!("Change {}", n));
            }
        }

        let rows = watcher
            .fields()
            .iter()
            .map(|field| {
                field
                    .versions()
                    .iter()
                    .map(|cell| cell.clone().unwrap_or_default())
                    .collect()
            })
            .collect();

        TableView {
            title: watcher.identity().to_string(),
            header,
            rows,
        }
    }
}

impl TableView {
    /// Format the view as ASCII box-drawing lines, title embedded in the
    /// top border. Pure formatting, no output.
    pub fn to_lines(&self) -> Vec<String> {
        let columns = self.header.len();
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        let separator = Self::separator(&widths);
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(Self::title_border(&separator, &self.title));
        lines.push(Self::format_row(&self.header, &widths));
        lines.push(separator.clone());
        for row in &self.rows {
            lines.push(Self::format_row(row, &widths));
        }
        lines.push(separator);
        lines
    }

    fn separator(widths: &[usize]) -> String {
        let mut line = String::from("+");
        for width in widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    }

    /// Splice ` title ` into the middle of a separator line, falling back
    /// to a plain separator when the title does not fit.
    fn title_border(separator: &str, title: &str) -> String {
        let label = format!(" {} ", title);
        if label.len() + 2 > separator.len() {
            return separator.to_string();
        }
        let start = (separator.len() - label.len()) / 2;
        let mut line = String::with_capacity(separator.len());
        line.push_str(&separator[..start]);
        line.push_str(&label);
        line.push_str(&separator[start + label.len()..]);
        line
    }

    fn format_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("|");
        for (i, &width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {:<width$} |", cell, width = width));
        }
        line
    }
}
