//! Vocabulary catalog source

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Catalog configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// JSON file of catalog words to load at startup
    pub seed_path: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.seed_path {
            Some(path) if !path.is_file() => Err(ValidationError::CatalogSeedMissing(
                path.display().to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_seed_file_is_invalid() {
        let config = CatalogConfig {
            seed_path: Some(PathBuf::from("/definitely/not/here.json")),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::CatalogSeedMissing(_))
        ));
    }

    #[test]
    fn existing_seed_file_is_valid() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = CatalogConfig {
            seed_path: Some(file.path().to_path_buf()),
        };
        assert!(config.validate().is_ok());
        assert!(CatalogConfig::default().validate().is_ok());
    }
}
