//! Field-resolution policy.
//!
//! Every fallback and coercion applied to loosely-populated store rows or
//! request payloads is declared here once:
//!
//! | Field | Sources (in order) | Coercion | Default |
//! |-------|--------------------|----------|---------|
//! | display name | `display_name` | blank → absent | per view, see [`NameFallback`] |
//! | battery warning | `batt_warning` | none | `20` |
//! | maintenance | `em_manutencao` / `maintenance_mode` | null → `false` | `false` |
//! | latitude | `latitude`, `lat` | none | absent |
//! | longitude | `longitude`, `lng` | none | absent |
//! | altitude | `altitude` | none | `0` |
//! | numeric config fields | payload value | `""` / null → absent, numeric text parsed | absent |
//! | text config fields | payload value | blank → absent | absent |

use serde::{Deserialize, Deserializer};

/// Battery warning threshold (percent) used when a device has none configured.
pub const DEFAULT_BATTERY_WARNING_PCT: f64 = 20.0;

/// Which view is asking for a display name; each has its own fallback label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFallback {
    /// Device catalog (`/api/dispositivos`)
    Catalog,
    /// Latest readings grid
    LatestReading,
    /// History view of a device with no stored config
    Unconfigured,
    /// Door panel, labelled after the cold room
    DoorPanel,
}

impl NameFallback {
    #[must_use]
    pub fn resolve(self, configured: Option<&str>, device_id: &str) -> String {
        if let Some(name) = configured.filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        match self {
            Self::Catalog => "Novo Sensor".to_string(),
            Self::LatestReading => "Sensor Sem Nome".to_string(),
            Self::Unconfigured => "Sensor Não Configurado".to_string(),
            Self::DoorPanel => format!("Câmara {device_id}"),
        }
    }
}

#[must_use]
pub fn battery_warning_or_default(value: Option<f64>) -> f64 {
    value.unwrap_or(DEFAULT_BATTERY_WARNING_PCT)
}

#[must_use]
pub fn maintenance_flag(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

#[must_use]
pub fn first_present(primary: Option<f64>, fallback: Option<f64>) -> Option<f64> {
    primary.or(fallback)
}

#[must_use]
pub fn altitude_or_default(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

/// Deserialize a numeric config field that may arrive as a number, numeric
/// text, an empty string or null.
///
/// # Errors
///
/// Fails when the value is non-empty text that does not parse as a number.
pub fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LooseNumber::Number(n)) => Ok(Some(n)),
        Some(LooseNumber::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid number: {text}")))
        }
    }
}
