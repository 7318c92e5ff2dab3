use crate::model::{Column, RawRow};
use crate::utils::{Result, SheetTranslatorError};
use std::path::{Path, PathBuf};

/// A value-rendered export of one sheet tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTab {
    pub header_rows: Vec<Vec<String>>,
    pub rows: Vec<RawRow>,
}

impl SheetTab {
    pub fn headers(&self) -> Option<&[String]> {
        self.header_rows.first().map(Vec::as_slice)
    }
}

pub struct SheetTabReader {
    path: PathBuf,
    header_rows: usize,
}

impl SheetTabReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header_rows: 1,
        }
    }

    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    pub fn read(&self) -> Result<SheetTab> {
        if !file_exists(&self.path) {
            return Err(SheetTranslatorError::FileNotFound(
                self.path.display().to_string(),
            ));
        }

        let file = std::fs::File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut tab = SheetTab::default();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            if index < self.header_rows {
                tab.header_rows.push(cells);
            } else {
                tab.rows.push(RawRow::new(cells));
            }
        }

        if let Some(headers) = tab.headers() {
            if headers.len() < Column::COUNT {
                tracing::warn!(
                    path = %self.path.display(),
                    columns = headers.len(),
                    expected = Column::COUNT,
                    "Header row is narrower than the fixed column layout"
                );
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            rows = tab.rows.len(),
            "Read sheet tab"
        );

        Ok(tab)
    }
}

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}
