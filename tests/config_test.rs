use color_eyre::Result;
use studex::config::{AppConfig, ConfigManager};

#[test]
fn write_default_config_creates_a_parseable_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = ConfigManager::with_dir(dir.path().join("studex"));

    let path = manager.write_default_config(false)?;
    assert!(path.exists());

    let content = std::fs::read_to_string(&path)?;
    let parsed: AppConfig = toml::from_str(&content)?;
    assert!(parsed.validate().is_ok());
    Ok(())
}

#[test]
fn write_default_config_refuses_to_overwrite_without_force() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = ConfigManager::with_dir(dir.path().join("studex"));

    manager.write_default_config(false)?;
    assert!(manager.write_default_config(false).is_err());
    assert!(manager.write_default_config(true).is_ok());
    Ok(())
}

#[test]
fn config_round_trips_through_toml() -> Result<()> {
    let mut config = AppConfig::default();
    config.analysis.sample_rows = 25;
    config.analysis.top_grade_column = "G1".to_string();
    config.charts.output_dir = Some("/tmp/charts".into());
    config.charts.figure_width = 7.5;
    config.data.delimiter = Some(b';');

    let serialized = toml::to_string(&config)?;
    let parsed: AppConfig = toml::from_str(&serialized)?;
    assert_eq!(parsed.analysis.sample_rows, 25);
    assert_eq!(parsed.analysis.top_grade_column, "G1");
    assert_eq!(parsed.charts.output_dir, config.charts.output_dir);
    assert_eq!(parsed.charts.figure_width, 7.5);
    assert_eq!(parsed.data.delimiter, Some(b';'));
    Ok(())
}

#[test]
fn resolved_output_dir_falls_back_to_temp() {
    let config = AppConfig::default();
    let dir = config.charts.resolved_output_dir();
    assert!(dir.ends_with("studex-charts"));

    let mut config = AppConfig::default();
    config.charts.output_dir = Some("/var/charts".into());
    assert_eq!(
        config.charts.resolved_output_dir(),
        std::path::PathBuf::from("/var/charts")
    );
}
