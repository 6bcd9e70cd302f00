use std::fmt;
use std::str::FromStr;

const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";

/// Deployment profile. Picks the optional `config/{profile}.toml` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown environment `{0}`, expected local, test or prod")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }

    /// Path of the profile's config file, without extension.
    pub fn config_source(&self) -> String {
        format!("config/{}", self.as_str())
    }

    /// Profile named by `APP_ENVIRONMENT`; unset means local.
    pub fn from_env() -> Result<Self, UnknownEnvironment> {
        match std::env::var(ENVIRONMENT_VARIABLE) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "local" | "dev" | "development" => Ok(Self::Local),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
