//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::RebaseError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
dir = /var/lib/bars
etf = QQQ
letf = TQQQ

[strategy]
bb_len_etf = 40
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "etf"), Some("QQQ".to_string()));
        assert_eq!(
            adapter.get_string("data", "dir"),
            Some("/var/lib/bars".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nbb_len_etf = 40\n").unwrap();
        assert_eq!(adapter.get_string("strategy", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_usize_returns_value() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nbb_len_etf = 40\n").unwrap();
        assert_eq!(adapter.get_usize("strategy", "bb_len_etf", 50).unwrap(), 40);
    }

    #[test]
    fn get_usize_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[strategy]\n").unwrap();
        assert_eq!(adapter.get_usize("strategy", "missing", 42).unwrap(), 42);
    }

    #[test]
    fn get_usize_rejects_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nbb_len_etf = abc\n").unwrap();
        let err = adapter.get_usize("strategy", "bb_len_etf", 50).unwrap_err();
        assert!(matches!(err, RebaseError::ConfigInvalid { key, .. } if key == "bb_len_etf"));
    }

    #[test]
    fn get_usize_rejects_negative() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nema_len_etf = -5\n").unwrap();
        assert!(adapter.get_usize("strategy", "ema_len_etf", 5).is_err());
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\ninitial_capital = 100000.5\n").unwrap();
        assert_eq!(
            adapter.get_double("strategy", "initial_capital", 0.0).unwrap(),
            100000.5
        );
    }

    #[test]
    fn get_double_blank_uses_default() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nbb_sd_etf =\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "bb_sd_etf", 2.0).unwrap(), 2.0);
    }

    #[test]
    fn get_double_rejects_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\ninitial_capital = lots\n").unwrap();
        assert!(adapter.get_double("strategy", "initial_capital", 1.0).is_err());
    }

    #[test]
    fn get_bool_accepts_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("strategy", "a", false).unwrap());
        assert!(adapter.get_bool("strategy", "b", false).unwrap());
        assert!(adapter.get_bool("strategy", "c", false).unwrap());
    }

    #[test]
    fn get_bool_accepts_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\na = false\nb = NO\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("strategy", "a", true).unwrap());
        assert!(!adapter.get_bool("strategy", "b", true).unwrap());
        assert!(!adapter.get_bool("strategy", "c", true).unwrap());
    }

    #[test]
    fn get_bool_rejects_other_words() {
        let adapter = FileConfigAdapter::from_string("[strategy]\na = maybe\n").unwrap();
        assert!(adapter.get_bool("strategy", "a", true).is_err());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[report]\noutput_dir = /tmp/rebase\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "output_dir"),
            Some("/tmp/rebase".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
