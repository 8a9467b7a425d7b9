//! Fixed-width text tables for console views and the history report.

/// Truncate text to at most `max_chars` characters.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Left-align `text` in exactly `width` characters.
///
/// # Examples
///
/// ```
/// use aptpark_services::table::pad_right;
///
/// assert_eq!(pad_right("Slot", 6), "Slot  ");
/// assert_eq!(pad_right("Platinum", 4), "Plat");
/// ```
pub fn pad_right(text: &str, width: usize) -> String {
    let char_count = text.chars().count();

    if char_count >= width {
        return truncate_text(text, width);
    }

    format!("{}{}", text, " ".repeat(width - char_count))
}

const SEPARATOR: &str = " | ";

/// Rows of cells rendered under a header of fixed-width columns.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<(&'static str, usize)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Columns as `(header, width)` pairs.
    pub fn new(columns: &[(&'static str, usize)]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render blank and extra cells are ignored.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn line<'a>(&self, mut cells: impl Iterator<Item = &'a str>) -> String {
        self.columns
            .iter()
            .map(|(_, width)| pad_right(cells.next().unwrap_or(""), *width))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    pub fn header(&self) -> String {
        self.line(self.columns.iter().map(|(header, _)| *header))
    }

    /// Dashes as long as the header line.
    pub fn separator(&self) -> String {
        "-".repeat(self.header().chars().count())
    }

    /// Header, separator, then one line per row.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.header());
        lines.push(self.separator());
        lines.extend(
            self.rows
                .iter()
                .map(|row| self.line(row.iter().map(String::as_str))),
        );
        lines
    }

    pub fn render(&self) -> String {
        let mut out = self.lines().join("\n");
        out.push('\n');
        out
    }
}
