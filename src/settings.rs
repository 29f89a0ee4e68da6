use config::{Config, ConfigError, Environment, File};
use tam_models::settings::Settings;

// Layered settings: appsettings.toml, an optional local override, then
// TAM_* environment variables (e.g. TAM_TELEGRAM__TOKEN).
pub fn load() -> Result<Settings, ConfigError> {
    Config::builder()
        .add_source(File::with_name("appsettings").required(true))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(Environment::with_prefix("TAM").separator("__"))
        .build()?
        .try_deserialize()
}
