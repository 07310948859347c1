//! Archive Data Loader Module
//! Reads CSV entries out of the crash data ZIP archive using Polars.

use super::schema::ColumnMap;
use super::tables::{CrashTables, CHARGES, DAMAGES, PRIMARY_PERSON, UNITS};
use crate::config::DataPaths;
use polars::prelude::*;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use thiserror::Error;
use ::zip::result::ZipError;
use ::zip::ZipArchive;

/// Cell values read as missing, on top of empty fields.
const NULL_MARKERS: [&str; 8] = ["NA", "N/A", "<NA>", "NULL", "null", "NaN", "nan", "None"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error for '{entry}': {source}")]
    Zip { entry: String, source: ZipError },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: &'static str, column: String },
}

/// Reads named CSV tables out of a ZIP archive.
pub struct ArchiveLoader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ArchiveLoader<File> {
    /// Open an archive on disk.
    pub fn open(path: &Path) -> Result<Self, LoaderError> {
        let file = File::open(path)?;
        let loader = Self::from_reader(file)?;
        log::info!(
            "Opened archive {} ({} entries)",
            path.display(),
            loader.archive.len()
        );
        Ok(loader)
    }
}

impl<R: Read + Seek> ArchiveLoader<R> {
    pub fn from_reader(reader: R) -> Result<Self, LoaderError> {
        let archive = ZipArchive::new(reader).map_err(|source| LoaderError::Zip {
            entry: String::new(),
            source,
        })?;
        Ok(Self { archive })
    }

    /// Entry names stored in the archive.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Load a CSV entry (with header row) into a DataFrame.
    ///
    /// Every column is read as String; `CrashTables` casts keys and counts.
    pub fn read_table(&mut self, entry: &str) -> Result<DataFrame, LoaderError> {
        let mut bytes = Vec::new();
        {
            let mut file = self
                .archive
                .by_name(entry)
                .map_err(|source| LoaderError::Zip {
                    entry: entry.to_string(),
                    source,
                })?;
            file.read_to_end(&mut bytes)?;
        }

        let null_values =
            NullValues::AllColumns(NULL_MARKERS.iter().map(|s| (*s).into()).collect());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        log::info!("Loaded {entry}: {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }

    /// Load the four tables the analytics need. Any failure aborts the load.
    pub fn load_tables(
        &mut self,
        paths: &DataPaths,
        columns: &ColumnMap,
    ) -> Result<CrashTables, LoaderError> {
        let primary = self.read_table(&paths.primary_person)?;
        let units = self.read_table(&paths.units)?;
        let charges = self.read_table(&paths.charges)?;
        let damages = self.read_table(&paths.damages)?;

        CrashTables::new(primary, units, charges, damages, columns.clone())
    }

    /// Load every configured entry, the optional restrict/endorse tables included.
    ///
    /// Optional entries missing from the archive are skipped with a warning.
    pub fn load_all(
        &mut self,
        paths: &DataPaths,
    ) -> Result<Vec<(&'static str, DataFrame)>, LoaderError> {
        let mut tables = vec![
            (PRIMARY_PERSON, self.read_table(&paths.primary_person)?),
            (UNITS, self.read_table(&paths.units)?),
            (CHARGES, self.read_table(&paths.charges)?),
            (DAMAGES, self.read_table(&paths.damages)?),
        ];

        let optional = [("restrict", &paths.restrict), ("endorse", &paths.endorse)];
        for (name, entry) in optional {
            let Some(entry) = entry else {
                continue;
            };
            match self.read_table(entry) {
                Ok(df) => tables.push((name, df)),
                Err(LoaderError::Zip {
                    source: ZipError::FileNotFound,
                    ..
                }) => log::warn!("Optional table {name} ({entry}) not found in archive"),
                Err(e) => return Err(e),
            }
        }

        Ok(tables)
    }
}
