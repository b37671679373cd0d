//! General output settings.

use serde::{Deserialize, Serialize};

/// Default page size for paginated searches.
const fn default_page_size() -> u32 {
    100
}

const fn default_csv_separator() -> char {
    ','
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Page size for search endpoints (issues always use 500).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Field separator of CSV reports.
    #[serde(default = "default_csv_separator")]
    pub csv_separator: char,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            csv_separator: default_csv_separator(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.csv_separator, ',');
    }
}
