use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub analysis: AnalysisConfig,
    pub charts: ChartsConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rows returned by the 'sample' action
    pub sample_rows: usize,
    /// Numeric grade column the 'top' action ranks students by
    pub top_grade_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Directory chart files are written to; system temp when unset
    pub output_dir: Option<PathBuf>,
    pub figure_width: f64,
    pub figure_height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataConfig {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            analysis: AnalysisConfig::default(),
            charts: ChartsConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rows: 10,
            top_grade_column: "G3".to_string(),
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            figure_width: 10.0,
            figure_height: 6.0,
        }
    }
}

impl ChartsConfig {
    /// The size hint applied to every chart, in abstract figure units.
    pub fn figure_size(&self) -> (f64, f64) {
        (self.figure_width, self.figure_height)
    }

    /// Resolved output directory, falling back to the system temp dir.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("studex-charts"))
    }
}

// Configuration loading
impl AppConfig {
    /// Load configuration: defaults overlaid by the user config file if present
    pub fn load(app_name: &str) -> Result<Self> {
        let config = Self::load_user_config(app_name)?;
        config.validate()?;
        Ok(config)
    }

    /// Load user configuration from <config-dir>/studex/config.toml
    fn load_user_config(app_name: &str) -> Result<AppConfig> {
        let config_manager = ConfigManager::new(app_name)?;
        let config_path = config_manager.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.analysis.sample_rows == 0 {
            return Err(eyre!("analysis.sample_rows must be at least 1"));
        }
        if self.analysis.top_grade_column.is_empty() {
            return Err(eyre!("analysis.top_grade_column must not be empty"));
        }
        if self.charts.figure_width <= 0.0 || self.charts.figure_height <= 0.0 {
            return Err(eyre!(
                "charts.figure_width and figure_height must be positive"
            ));
        }
        Ok(())
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.sample_rows, 10);
        assert_eq!(config.analysis.top_grade_column, "G3");
        assert_eq!(config.charts.figure_width, 10.0);
        assert_eq!(config.charts.figure_height, 6.0);
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let parsed: AppConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(parsed.version, defaults.version);
        assert_eq!(parsed.analysis.sample_rows, defaults.analysis.sample_rows);
        assert_eq!(
            parsed.analysis.top_grade_column,
            defaults.analysis.top_grade_column
        );
        assert_eq!(parsed.charts.output_dir, defaults.charts.output_dir);
        assert_eq!(parsed.data.delimiter, defaults.data.delimiter);
    }

    #[test]
    fn partial_config_fills_missing_sections() {
        let parsed: AppConfig = toml::from_str("[analysis]\nsample_rows = 5\n").unwrap();
        assert_eq!(parsed.analysis.sample_rows, 5);
        assert_eq!(parsed.analysis.top_grade_column, "G3");
        assert_eq!(parsed.charts.figure_width, 10.0);
    }

    #[test]
    fn zero_sample_rows_rejected() {
        let parsed: AppConfig = toml::from_str("[analysis]\nsample_rows = 0\n").unwrap();
        assert!(parsed.validate().is_err());
    }
}
