use crate::error::Result;
use std::collections::HashMap;
use std::io::Read;

/// One table row as an ordered mapping of column name to cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// First present column out of `columns`, in the order given.
    pub fn get_any(&self, columns: &[String]) -> Option<&str> {
        columns.iter().find_map(|c| self.get(c))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }

    /// Sets `column`, replacing an existing value in place or appending a new column.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        let idx = self.cells.iter().position(|(name, _)| name == column)?;
        Some(self.cells.remove(idx).1)
    }

    /// Renames `from` to `to` keeping its position. Skipped when `from` is missing or
    /// `to` already exists.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if self.contains(to) {
            return false;
        }
        match self.cells.iter_mut().find(|(name, _)| name == from) {
            Some(cell) => {
                cell.0 = to.to_string();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Headers plus rows, the shape shared by CSV files and scraped HTML tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl RawTable {
    /// Builds a table from a header row and positional cells. Short rows leave the
    /// trailing columns absent; surplus cells are ignored.
    pub fn from_cells(raw_headers: Vec<String>, body: Vec<Vec<String>>) -> Self {
        let headers = dedupe_headers(&raw_headers);
        let rows = body
            .into_iter()
            .map(|cells| headers.iter().cloned().zip(cells).collect())
            .collect();
        Self { headers, rows }
    }

    /// Reads a CSV document whose first record is the header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut body = Vec::new();
        for record in reader.records() {
            let record = record?;
            body.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self::from_cells(headers, body))
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn drop_column(&mut self, column: &str) -> bool {
        let Some(idx) = self.headers.iter().position(|h| h == column) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            row.remove(column);
        }
        true
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if self.has_column(to) {
            return false;
        }
        let Some(header) = self.headers.iter_mut().find(|h| *h == from) else {
            return false;
        };
        *header = to.to_string();
        for row in &mut self.rows {
            row.rename(from, to);
        }
        true
    }

    /// Sets `column` to `value` on every row, adding the header if needed.
    pub fn set_column(&mut self, column: &str, value: &str) {
        if !self.has_column(column) {
            self.headers.push(column.to_string());
        }
        for row in &mut self.rows {
            row.insert(column, value);
        }
    }
}

/// Empty names become `Unnamed: <pos>`; repeats get a positional suffix, so two
/// `Left` columns become `Left` and `Left.1`.
pub fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (pos, name) in raw.iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", pos)
        } else {
            name.trim().to_string()
        };

        let mut candidate = base.clone();
        let count = seen.entry(base.clone()).or_insert(0);
        if *count > 0 {
            candidate = format!("{}.{}", base, count);
        }
        *count += 1;
        // A generated suffix can itself collide with a literal header
        while out.contains(&candidate) {
            candidate = format!("{}.{}", base, count);
            *count += 1;
        }
        out.push(candidate);
    }

    out
}
