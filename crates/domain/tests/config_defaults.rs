use ar_domain::config::Config;

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn default_poll_policy_is_one_second() {
    let config = Config::default();
    assert_eq!(config.assistants.poll_interval_ms, 1_000);
    assert_eq!(config.assistants.max_poll_attempts, 300);
    assert_eq!(config.assistants.poll_deadline_ms, 600_000);
}

#[test]
fn default_env_var_names() {
    let config = Config::default();
    assert_eq!(config.assistants.api_key_env, "OPENAI_API_KEY");
    assert_eq!(config.assistants.assistant_id_env, "ASSISTANT_ID");
    assert_eq!(config.transcription.model_env, "TRANSCRIBE_MODEL");
    assert_eq!(config.transcription.model, "whisper-1");
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(config.server.cors.allowed_origins.contains(&"http://localhost:*".to_string()));
    assert!(config.server.cors.allowed_origins.contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn partial_file_keeps_other_defaults() {
    let toml_str = r#"
[assistants]
base_url = "http://localhost:9000/v1"
poll_interval_ms = 250

[transcription]
model = "gpt-4o-mini-transcribe"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.assistants.base_url, "http://localhost:9000/v1");
    assert_eq!(config.assistants.poll_interval_ms, 250);
    assert_eq!(config.assistants.max_poll_attempts, 300);
    assert_eq!(config.transcription.model, "gpt-4o-mini-transcribe");
    assert_eq!(config.transcription.base_url, "https://api.openai.com/v1");
    assert_eq!(config.server.port, 3000);
}

#[test]
fn cors_wildcard_is_reported_as_warning() {
    let toml_str = r#"
[server.cors]
allowed_origins = ["*"]
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field, "server.cors.allowed_origins");
}
