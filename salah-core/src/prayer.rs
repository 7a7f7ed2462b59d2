//! Prayer names and the daily prayer-time record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrayerName {
    Fadjr,
    /// Sunrise. A boundary marker only; never active and never "next".
    Shuruk,
    Duhr,
    Assr,
    Maghrib,
    Ishaa,
}

impl PrayerName {
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fadjr,
        PrayerName::Shuruk,
        PrayerName::Duhr,
        PrayerName::Assr,
        PrayerName::Maghrib,
        PrayerName::Ishaa,
    ];

    /// The five real prayers, in day order.
    pub const PRAYERS: [PrayerName; 5] = [
        PrayerName::Fadjr,
        PrayerName::Duhr,
        PrayerName::Assr,
        PrayerName::Maghrib,
        PrayerName::Ishaa,
    ];

    pub fn is_prayer(self) -> bool {
        self != PrayerName::Shuruk
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrayerName::Fadjr => "Fadjr",
            PrayerName::Shuruk => "Shuruk",
            PrayerName::Duhr => "Duhr",
            PrayerName::Assr => "Assr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Ishaa => "Ishaa",
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrayerName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PrayerName::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownPrayer(s.to_string()))
    }
}

/// One calendar day of prayer times as delivered by the data source.
///
/// Times are zero-padded `HH:MM` strings; they are validated when a schedule is built,
/// not here, so a bad record surfaces as a `ParseError` at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPrayerTimes {
    #[serde(rename = "Fadjr")]
    pub fadjr: String,
    #[serde(rename = "Shuruk")]
    pub shuruk: String,
    #[serde(rename = "Duhr")]
    pub duhr: String,
    #[serde(rename = "Assr")]
    pub assr: String,
    #[serde(rename = "Maghrib")]
    pub maghrib: String,
    #[serde(rename = "Ishaa")]
    pub ishaa: String,
    /// Hijri date, `Y/M/D`.
    #[serde(default)]
    pub hijri: String,
}

impl DailyPrayerTimes {
    pub fn time_of(&self, name: PrayerName) -> &str {
        match name {
            PrayerName::Fadjr => &self.fadjr,
            PrayerName::Shuruk => &self.shuruk,
            PrayerName::Duhr => &self.duhr,
            PrayerName::Assr => &self.assr,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Ishaa => &self.ishaa,
        }
    }

    #[cfg(test)]
    pub(crate) fn sample() -> Self {
        Self {
            fadjr: "05:30".to_string(),
            shuruk: "07:00".to_string(),
            duhr: "13:30".to_string(),
            assr: "17:30".to_string(),
            maghrib: "20:30".to_string(),
            ishaa: "22:00".to_string(),
            hijri: "1446/1/22".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuruk_is_not_a_prayer() {
        assert!(!PrayerName::Shuruk.is_prayer());
        assert!(PrayerName::PRAYERS.iter().all(|p| p.is_prayer()));
        assert_eq!(PrayerName::ALL.iter().filter(|p| p.is_prayer()).count(), 5);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("maghrib".parse::<PrayerName>().unwrap(), PrayerName::Maghrib);
        assert_eq!(" ISHAA ".parse::<PrayerName>().unwrap(), PrayerName::Ishaa);
        assert!(matches!(
            "Jumuah".parse::<PrayerName>(),
            Err(ConfigError::UnknownPrayer(_))
        ));
    }

    #[test]
    fn deserializes_wire_field_names() {
        let json = r#"{"Fadjr":"05:30","Shuruk":"07:00","Duhr":"13:30","Assr":"17:30","Maghrib":"20:30","Ishaa":"22:00","hijri":"1446/1/22"}"#;
        let d: DailyPrayerTimes = serde_json::from_str(json).unwrap();
        assert_eq!(d, DailyPrayerTimes::sample());
        assert_eq!(d.time_of(PrayerName::Assr), "17:30");
    }
}
