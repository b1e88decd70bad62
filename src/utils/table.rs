//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: usize,
}

impl Table {
    pub fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            max_width: 40,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column widths follow the widest cell, capped at `max_width`.
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.width().min(self.max_width));
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        // Header
        push_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);

        // Rows
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }

        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let cell = truncate(cell, *width);
        let pad = width.saturating_sub(cell.width());
        out.push_str(&cell);
        out.push_str(&" ".repeat(pad + 1));
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut acc = String::new();
    for ch in s.chars() {
        if acc.as_str().width() + 1 >= width {
            break;
        }
        acc.push(ch);
    }
    acc.push('…');
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_columns() {
        let mut t = Table::new(vec!["Event", "City"]);
        t.add_row(vec!["Le Mans".to_string(), "Le Mans".to_string()]);
        t.add_row(vec!["Spa 6h".to_string(), "Stavelot".to_string()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Event   City");
        assert_eq!(lines[1], "------- --------");
        assert_eq!(lines[3], "Spa 6h  Stavelot");
    }

    #[test]
    fn long_cells_are_truncated() {
        let mut t = Table::new(vec!["X"]);
        t.max_width = 5;
        t.add_row(vec!["abcdefghij".to_string()]);
        assert!(t.render().contains("abcd…"));
    }
}
