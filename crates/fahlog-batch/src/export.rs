use crate::row::ResultRow;
use crate::BatchError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One header line, then one record per row; missing values are empty.
    #[default]
    Csv,
    /// A pretty-printed array of row objects; missing values are `null`.
    Json,
}

pub fn write_rows<W: Write>(
    rows: &[ResultRow],
    format: ExportFormat,
    writer: W,
) -> Result<(), BatchError> {
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush().map_err(csv::Error::from)?;
        }
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer).map_err(serde_json::Error::io)?;
        }
    }
    Ok(())
}

pub fn export_to_path(
    rows: &[ResultRow],
    format: ExportFormat,
    path: &Path,
) -> Result<(), BatchError> {
    let io_error = |source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_rows(rows, format, &mut writer)?;
    writer.flush().map_err(io_error)?;
    log::info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(generation: u32, average_perf: Option<f64>) -> ResultRow {
        ResultRow {
            run: 3,
            clone: 7,
            generation,
            os: "linux2 4.19.0-5-amd64".to_string(),
            platform_name: "NVIDIA CUDA".to_string(),
            platform_vendor: "NVIDIA Corporation".to_string(),
            platform_version: "OpenCL 1.2 CUDA 11.0.228".to_string(),
            device_name: "GeForce RTX 2070 SUPER".to_string(),
            device_vendor: "NVIDIA Corporation".to_string(),
            device_version: "OpenCL 1.2 CUDA".to_string(),
            driver_version: None,
            cuda_enabled: true,
            average_perf,
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_rows(&[row(0, Some(181.5)), row(1, None)], ExportFormat::Csv, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "run,clone,gen,os,platform_name,platform_vendor,platform_version,device_name,device_vendor,device_version,driver_version,cuda_enabled,average_perf"
        );
        assert!(lines[1].starts_with("3,7,0,linux2 4.19.0-5-amd64,NVIDIA CUDA,"));
        assert!(lines[1].ends_with(",,true,181.5"));
        assert!(lines[2].ends_with(",,true,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_uses_gen_and_null() {
        let mut out = Vec::new();
        write_rows(&[row(4, None)], ExportFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["gen"], 4);
        assert!(value[0]["average_perf"].is_null());
        assert!(value[0].get("generation").is_none());
    }

    #[test]
    fn test_csv_rows_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![row(0, Some(12.5)), row(1, None)];
        export_to_path(&rows, ExportFormat::Csv, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let back: Vec<ResultRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_export_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("rows.json");
        let err = export_to_path(&[], ExportFormat::Json, &path).unwrap_err();
        assert!(matches!(err, BatchError::Io { .. }));
    }
}
