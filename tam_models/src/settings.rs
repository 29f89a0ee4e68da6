use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramSettings {
    pub token: String,
    pub owner_chat_id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeofenceSettings {
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
}

impl Default for GeofenceSettings {
    fn default() -> Self {
        Self {
            radius_m: default_radius_m(),
        }
    }
}

fn default_radius_m() -> f64 {
    1_000.0
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub telegram: TelegramSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub geofence: GeofenceSettings,
}
