//! Archive and tabular decoding
//!
//! Decompression and delimited-text parsing are capability traits so the
//! counting pipeline can be exercised with in-memory fakes instead of real
//! compressed files. Production uses ZIP archives of headered CSV entries.

use crate::error::{AnalyzeError, Result};
use phenostat_common::types::ArchiveRecord;
use std::io::{Cursor, Read};
use tracing::debug;

/// Column holding the categorical phenotype code
pub const CODE_COLUMN: &str = "code";

/// Column holding the human-readable label for the code
pub const DESCRIPTION_COLUMN: &str = "description";

/// A single named file extracted from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Decompress an archive into named entries
pub trait ArchiveDecoder: Send + Sync {
    fn entries(&self, data: &[u8]) -> Result<Vec<ArchiveEntry>>;
}

/// Parse delimited text into rows of named fields
pub trait RecordReader: Send + Sync {
    fn records(&self, data: &[u8]) -> Result<Vec<ArchiveRecord>>;
}

/// ZIP archive decoder over an in-memory buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipDecoder;

impl ArchiveDecoder for ZipDecoder {
    fn entries(&self, data: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let cursor = Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| AnalyzeError::archive(format!("failed to open zip archive: {}", e)))?;

        let mut result = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).map_err(|e| {
                AnalyzeError::archive(format!("failed to read zip entry at index {}: {}", i, e))
            })?;

            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            debug!("Extracted {} ({} bytes)", name, contents.len());
            result.push(ArchiveEntry {
                name,
                data: contents,
            });
        }

        Ok(result)
    }
}

/// Headered CSV record reader
///
/// Every row must carry the [`CODE_COLUMN`] and [`DESCRIPTION_COLUMN`]
/// fields; a row missing either is a parse error for the whole entry, which
/// in turn skips the containing location.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRecordReader;

impl RecordReader for CsvRecordReader {
    fn records(&self, data: &[u8]) -> Result<Vec<ArchiveRecord>> {
        let mut reader = csv::Reader::from_reader(data);

        let headers = reader.headers()?.clone();
        let code_idx = headers
            .iter()
            .position(|h| h == CODE_COLUMN)
            .ok_or_else(|| {
                AnalyzeError::parse(format!("tabular entry has no '{}' column", CODE_COLUMN))
            })?;
        let description_idx = headers
            .iter()
            .position(|h| h == DESCRIPTION_COLUMN)
            .ok_or_else(|| {
                AnalyzeError::parse(format!(
                    "tabular entry has no '{}' column",
                    DESCRIPTION_COLUMN
                ))
            })?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let code = row
                .get(code_idx)
                .ok_or_else(|| AnalyzeError::parse(format!("row missing '{}'", CODE_COLUMN)))?;
            let description = row.get(description_idx).ok_or_else(|| {
                AnalyzeError::parse(format!("row missing '{}'", DESCRIPTION_COLUMN))
            })?;

            records.push(ArchiveRecord {
                code: code.to_string(),
                description: description.to_string(),
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_zip_decoder_extracts_named_entries() {
        let archive = zip_archive(&[
            ("patients_1.csv", "code,description\nA01,Flu\n"),
            ("patients_2.csv", "code,description\nB02,Cold\n"),
        ]);

        let entries = ZipDecoder.entries(&archive).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "patients_1.csv");
        assert_eq!(entries[1].name, "patients_2.csv");
        assert!(entries[0].data.starts_with(b"code,description"));
    }

    #[test]
    fn test_zip_decoder_skips_directories() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("nested/", FileOptions::default()).unwrap();
        writer
            .start_file("nested/patients.csv", FileOptions::default())
            .unwrap();
        writer.write_all(b"code,description\nA01,Flu\n").unwrap();
        let archive = writer.finish().unwrap().into_inner();

        let entries = ZipDecoder.entries(&archive).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "nested/patients.csv");
    }

    #[test]
    fn test_zip_decoder_rejects_corrupt_archive() {
        let result = ZipDecoder.entries(b"definitely not a zip file");
        assert!(matches!(result, Err(AnalyzeError::Archive(_))));
    }

    #[test]
    fn test_csv_reader_parses_rows() {
        let data = b"code,description\nA01,Flu\nA01,Flu\nB02,Cold\n";
        let records = CsvRecordReader.records(data).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].code, "A01");
        assert_eq!(records[0].description, "Flu");
        assert_eq!(records[2].code, "B02");
    }

    #[test]
    fn test_csv_reader_ignores_extra_columns() {
        let data = b"patient_id,code,description\n17,A01,Flu\n";
        let records = CsvRecordReader.records(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "A01");
        assert_eq!(records[0].description, "Flu");
    }

    #[test]
    fn test_csv_reader_requires_code_column() {
        let data = b"id,description\n1,Flu\n";
        assert!(matches!(
            CsvRecordReader.records(data),
            Err(AnalyzeError::Parse(_))
        ));
    }

    #[test]
    fn test_csv_reader_rejects_ragged_row() {
        let data = b"code,description\nA01\n";
        assert!(matches!(
            CsvRecordReader.records(data),
            Err(AnalyzeError::Csv(_))
        ));
    }

    #[test]
    fn test_csv_reader_empty_entry_yields_no_records() {
        let data = b"code,description\n";
        let records = CsvRecordReader.records(data).unwrap();
        assert!(records.is_empty());
    }
}
