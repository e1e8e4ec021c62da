#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::Result;
use crate::utils::validation::validate_range;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Items fetched per store query page.
    pub page_size: usize,
    /// Submissions allowed per batch-write group before giving up on its
    /// unprocessed items.
    pub batch_retry_limit: usize,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            batch_retry_limit: 3,
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        validate_range("page_size", self.page_size, 1, 1000)?;
        validate_range("batch_retry_limit", self.batch_retry_limit, 1, 10)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let config = AppConfig {
            page_size: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            batch_retry_limit: 50,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
