use crate::sheet::reader::SheetTab;
use crate::utils::{sanitize_cell, Result, SheetTranslatorError, TargetColumns};
use csv::Writer;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;

/// Values to write back for one successfully built row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteInstruction {
    pub row_number: usize,
    pub id: String,
    pub name: String,
    pub content: String,
    pub json: String,
}

impl WriteInstruction {
    /// Patches the target columns, padding the row when it is too short.
    pub fn apply(&self, cells: &mut Vec<String>, columns: TargetColumns) {
        let width = columns.name.max(columns.content).max(columns.json) + 1;
        if cells.len() < width {
            cells.resize(width, String::new());
        }

        cells[columns.name] = sanitize_cell(&self.name);
        cells[columns.content] = sanitize_cell(&self.content);
        cells[columns.json] = self.json.clone();
    }
}

pub struct SheetTabWriter {
    path: PathBuf,
    writer: Option<Writer<File>>,
    rows_written: usize,
}

impl SheetTabWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            rows_written: 0,
        }
    }

    pub fn initialize(&mut self, header_rows: &[Vec<String>]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(file);
        for header in header_rows {
            writer.write_record(header)?;
        }
        self.writer = Some(writer);
        Ok(())
    }

    pub fn write_row(&mut self, row: &[String]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            SheetTranslatorError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Writer not initialized",
            ))
        })?;

        writer.write_record(row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Writes the whole tab, patching rows that have an instruction.
    /// Rows without one are copied through unchanged.
    pub fn write_tab(
        &mut self,
        tab: &SheetTab,
        instructions: &[WriteInstruction],
        columns: TargetColumns,
    ) -> Result<usize> {
        self.initialize(&tab.header_rows)?;

        let by_row: HashMap<usize, &WriteInstruction> = instructions
            .iter()
            .map(|instruction| (instruction.row_number, instruction))
            .collect();

        let header_rows = tab.header_rows.len();
        let mut patched = 0usize;

        for (index, raw) in tab.rows.iter().enumerate() {
            let row_number = header_rows + index + 1;
            let mut cells = raw.cells().to_vec();

            if let Some(instruction) = by_row.get(&row_number) {
                instruction.apply(&mut cells, columns);
                patched += 1;
            }

            self.write_row(&cells)?;
        }

        self.flush()?;
        Ok(patched)
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(self.rows_written)
    }
}
