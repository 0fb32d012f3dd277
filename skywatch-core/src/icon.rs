use serde::{Deserialize, Serialize};

/// Pictogram category, independent of the provider's condition vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IconCategory {
    #[default]
    ClearDay,
    Cloudy,
    Rain,
    Snow,
    Wind,
    Sleet,
    Fog,
}

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::ClearDay => "CLEAR_DAY",
            IconCategory::Cloudy => "CLOUDY",
            IconCategory::Rain => "RAIN",
            IconCategory::Snow => "SNOW",
            IconCategory::Wind => "WIND",
            IconCategory::Sleet => "SLEET",
            IconCategory::Fog => "FOG",
        }
    }

    pub const fn all() -> &'static [IconCategory] {
        &[
            IconCategory::ClearDay,
            IconCategory::Cloudy,
            IconCategory::Rain,
            IconCategory::Snow,
            IconCategory::Wind,
            IconCategory::Sleet,
            IconCategory::Fog,
        ]
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider condition (`weather[0].main`) to icon category. Exact match.
pub const ICON_TABLE: &[(&str, IconCategory)] = &[
    ("Haze", IconCategory::ClearDay),
    ("Clouds", IconCategory::Cloudy),
    ("Rain", IconCategory::Rain),
    ("Snow", IconCategory::Snow),
    ("Dust", IconCategory::Wind),
    ("Drizzle", IconCategory::Sleet),
    ("Fog", IconCategory::Fog),
    ("Smoke", IconCategory::Fog),
    ("Tornado", IconCategory::Wind),
];

/// Map a condition string to its icon. Unknown conditions fall back to
/// [`IconCategory::ClearDay`].
pub fn icon_for(condition: &str) -> IconCategory {
    ICON_TABLE
        .iter()
        .find(|(name, _)| *name == condition)
        .map(|(_, icon)| *icon)
        .unwrap_or_default()
}
