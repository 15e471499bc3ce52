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

    fn get_usize(&self, section: &str, key: &str, default: usize) -> usize {
        self.config
            .getuint(section, key)
            .ok()
            .flatten()
            .map(|v| v as usize)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[groups]
sector = Auto, Bank, Energy

[windows]
trend = 30
breadth = not-a-number
";

    #[test]
    fn get_string_reads_value() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            config.get_string("groups", "sector").as_deref(),
            Some("Auto, Bank, Energy")
        );
    }

    #[test]
    fn get_string_missing_key() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert!(config.get_string("groups", "broad").is_none());
    }

    #[test]
    fn get_usize_reads_value() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(config.get_usize("windows", "trend", 40), 30);
    }

    #[test]
    fn get_usize_falls_back_on_missing_or_malformed() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(config.get_usize("windows", "drawdown", 52), 52);
        assert_eq!(config.get_usize("windows", "breadth", 40), 40);
    }
}
