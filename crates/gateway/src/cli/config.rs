use ar_domain::config::{Config, ConfigSeverity, Credentials};

/// Parse and validate the config, printing any issues.
///
/// Also reports which credentials resolve from the environment, since a
/// relay without them starts but refuses chat/transcription requests.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let mut issues = config.validate();

    let credentials = Credentials::from_env(config);
    for missing in [
        credentials.require_api_key().err(),
        credentials.require_assistant().err(),
    ]
    .into_iter()
    .flatten()
    {
        issues.push(ar_domain::config::ConfigError {
            severity: ConfigSeverity::Warning,
            field: "credentials".into(),
            message: missing.to_string(),
        });
    }
    // The key check appears twice when the key itself is missing.
    issues.dedup_by(|a, b| a.message == b.message);

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count, warning_count,
    );

    error_count == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))?;
    print!("{output}");
    Ok(())
}
