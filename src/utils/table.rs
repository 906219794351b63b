//! 表格渲染：列宽对齐的纯文本表格

use std::fmt;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    /// 每列取表头与所有单元格的最大宽度
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }
        widths
    }

    fn border(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn render_row(cells: &[String], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, w) in cells.iter().zip(widths) {
            s.push_str(&format!(" {:<width$} |", cell, width = w));
        }
        s
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let border = Self::border(&widths);

        writeln!(f, "{}", border)?;
        writeln!(f, "{}", Self::render_row(&self.headers, &widths))?;
        writeln!(f, "{}", border)?;
        for row in &self.rows {
            writeln!(f, "{}", Self::render_row(row, &widths))?;
        }
        write!(f, "{}", border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_keeps_headers() {
        let table = Table::new(&["Local Address", "PID"]);
        let out = table.to_string();
        assert!(out.contains("| Local Address | PID |"));
        // 无数据行时仍有上下边框
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_columns_align_to_widest_cell() {
        let mut table = Table::new(&["Name", "UID"]);
        table.add_row(vec!["root".to_string(), "0".to_string()]);
        table.add_row(vec!["somelongname".to_string(), "1000".to_string()]);
        let out = table.to_string();
        assert!(out.contains("| root         | 0    |"));
        assert!(out.contains("| somelongname | 1000 |"));
        assert!(out.contains("+--------------+------+"));
    }
}
