//! CSV file data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, with a header row
//! `time,open,high,low,close[,volume]` (`date` is accepted for `time`).

use crate::domain::error::RebaseError;
use crate::domain::ohlcv::RawBar;
use crate::ports::data_port::DataPort;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<RawBar>, RebaseError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(RebaseError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| RebaseError::Data {
                reason: format!("failed to open {}: {}", path.display(), e),
            })?;

        let mut bars = Vec::new();
        for (row, record) in rdr.deserialize::<RawBar>().enumerate() {
            let bar = record.map_err(|e| RebaseError::Data {
                reason: format!("{} row {}: {}", path.display(), row + 1, e),
            })?;
            bars.push(bar);
        }

        if bars.is_empty() {
            return Err(RebaseError::NoData {
                symbol: symbol.to_string(),
            });
        }

        tracing::debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, RebaseError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| RebaseError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| RebaseError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let qqq = "time,open,high,low,close,volume\n\
            2024-01-02,400.0,405.0,398.0,402.5,1000000\n\
            20240103,402.0,404.0,399.0,400.0,\n\
            1704412800,400.0,401.0,395.0,396.0,900000\n";
        fs::write(path.join("QQQ.csv"), qqq).unwrap();

        let tqqq = "date,open,high,low,close\n\
            2024-01-02,50.0,51.0,49.0,50.5\n";
        fs::write(path.join("TQQQ.csv"), tqqq).unwrap();

        fs::write(path.join("EMPTY.csv"), "time,open,high,low,close\n").unwrap();
        fs::write(path.join("BAD.csv"), "time,open,high,low,close\n2024-01-02,1,2,x,1\n")
            .unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_keeps_raw_time_text() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("QQQ").unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].time, "2024-01-02");
        assert_eq!(bars[1].time, "20240103");
        assert_eq!(bars[2].time, "1704412800");
        assert_eq!(bars[0].close, 402.5);
        assert_eq!(bars[0].volume, Some(1_000_000.0));
        assert_eq!(bars[1].volume, None);
    }

    #[test]
    fn fetch_bars_accepts_date_header_without_volume() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("TQQQ").unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].time, "2024-01-02");
        assert_eq!(bars[0].volume, None);
    }

    #[test]
    fn missing_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_bars("XYZ").unwrap_err();
        assert!(matches!(err, RebaseError::NoData { symbol } if symbol == "XYZ"));
    }

    #[test]
    fn header_only_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(matches!(
            adapter.fetch_bars("EMPTY").unwrap_err(),
            RebaseError::NoData { .. }
        ));
    }

    #[test]
    fn malformed_number_is_data_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_bars("BAD").unwrap_err();
        assert!(matches!(err, RebaseError::Data { reason } if reason.contains("row 1")));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["BAD", "EMPTY", "QQQ", "TQQQ"]);
    }
}
