const DEFAULT_FILTER: &str = "info,audiogist=debug,tower_http=debug";

/// How the global subscriber is set up. `RUST_LOG` still wins over `filter`.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub filter: String,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, json_format: bool, level: Option<&str>) -> Self {
        let filter = match level.map(str::trim) {
            Some(level) if !level.is_empty() => {
                format!("{level},audiogist={level},tower_http={level}")
            }
            _ => DEFAULT_FILTER.to_string(),
        };
        Self {
            environment: environment.into(),
            json_format,
            filter,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::new(
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            None,
        )
    }
}
