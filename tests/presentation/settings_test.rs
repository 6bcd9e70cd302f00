use audiogist::presentation::config::UnknownEnvironment;
use audiogist::presentation::{Environment, Settings};

#[test]
fn given_known_names_when_parsing_environment_then_mapped() {
    assert_eq!("dev".parse::<Environment>(), Ok(Environment::Local));
    assert_eq!(" TEST ".parse::<Environment>(), Ok(Environment::Test));
    assert_eq!("production".parse::<Environment>(), Ok(Environment::Prod));
    assert_eq!(
        "staging".parse::<Environment>(),
        Err(UnknownEnvironment("staging".to_string()))
    );
}

#[test]
fn given_environment_when_locating_config_then_lowercase_profile_file() {
    assert_eq!(Environment::Prod.config_source(), "config/prod");
    assert_eq!(Environment::default().to_string(), "local");
}

#[test]
fn given_test_profile_when_loading_then_file_values_layer_over_defaults() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.llm.chat_model, "gpt-4o-mini");
    assert_eq!(settings.worker.queue_capacity, 8);
    assert_eq!(settings.worker.pool_size, 1);
    assert_eq!(settings.llm.azure_api_version, "2024-02-01");
    assert!(!settings.retention.cleanup_after_processing);
    assert_eq!(settings.retention.sweep_interval_secs, 300);
    assert_eq!(
        settings.max_upload_bytes(),
        settings.server.max_upload_mb * 1024 * 1024
    );
}

#[test]
fn given_record_ttl_beyond_a_century_when_validating_then_rejected() {
    let mut settings = Settings::load(Environment::Test).unwrap();
    settings.retention.record_ttl_secs = 9_000_000_000_000;

    let err = settings.validate().unwrap_err();

    assert!(err.to_string().contains("retention.record_ttl_secs"));
}
