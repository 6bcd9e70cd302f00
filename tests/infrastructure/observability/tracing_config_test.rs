use audiogist::infrastructure::observability::TracingConfig;

#[test]
fn given_no_level_when_creating_config_then_default_filter_used() {
    let config = TracingConfig::new("local", false, None);

    assert_eq!(config.environment, "local");
    assert!(!config.json_format);
    assert!(config.filter.contains("audiogist=debug"));
}

#[test]
fn given_level_when_creating_config_then_filter_applies_it_everywhere() {
    let config = TracingConfig::new("prod", true, Some(" warn "));

    assert!(config.json_format);
    assert_eq!(config.filter, "warn,audiogist=warn,tower_http=warn");
}

#[test]
fn given_blank_level_when_creating_config_then_falls_back_to_default() {
    let config = TracingConfig::new("test", false, Some(""));

    assert_eq!(config.filter, TracingConfig::new("test", false, None).filter);
}

#[test]
fn given_default_config_when_created_then_environment_is_set() {
    let config = TracingConfig::default();
    assert!(!config.environment.is_empty());
}
