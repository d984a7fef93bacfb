//! Typed daily-feed document consumed by the calendar modules.
//!
//! Both the ephemeris and the events tile read from one feed endpoint; each
//! picks its own sections out of the shared document. Every section and
//! field is lenient: absent parts deserialize to defaults so a partial feed
//! still renders.

use heapless::{String, Vec};
use serde::Deserialize;
use tessera_protocol::panel::{MAX_BIRTHDAYS, MAX_CLOCK, MAX_NAME, MAX_SEASON};

/// Sunrise/sunset section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SunInfo {
    pub sunrise: String<MAX_CLOCK>,
    pub sunset: String<MAX_CLOCK>,
    pub daily_change: String<MAX_CLOCK>,
}

/// Season section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeasonInfo {
    pub name: String<MAX_SEASON>,
    pub progress: f32,
    pub days_until_spring: i16,
    pub days_until_summer: i16,
    pub days_until_fall: i16,
    pub days_until_winter: i16,
}

/// One collection bin's schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BinSchedule {
    pub today: bool,
    pub next_in_days: i16,
}

/// Trash collection section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrashInfo {
    pub black: BinSchedule,
    pub yellow: BinSchedule,
}

/// One birthday entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Birthday {
    pub name: String<MAX_NAME>,
    pub day: u8,
    pub days_until: i16,
    pub is_today: bool,
}

/// Birthdays section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BirthdayFeed {
    pub this_month: Vec<Birthday, MAX_BIRTHDAYS>,
}

/// The whole daily document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DailyFeed {
    pub sun: SunInfo,
    pub season: SeasonInfo,
    pub trash: TrashInfo,
    pub birthdays: BirthdayFeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_deserializes() {
        let json = br#"{"sun":{"sunrise":"06:31","sunset":"21:07","daily_change":"-2:10"}}"#;
        let (feed, _) = serde_json_core::de::from_slice::<DailyFeed>(json).unwrap();
        assert_eq!(feed.sun.sunrise.as_str(), "06:31");
        assert_eq!(feed.season, SeasonInfo::default());
        assert!(feed.birthdays.this_month.is_empty());
    }

    #[test]
    fn events_sections_deserialize() {
        let json = br#"{
            "trash":{"black":{"today":false,"next_in_days":3},"yellow":{"today":true,"next_in_days":0}},
            "birthdays":{"this_month":[{"name":"Ada","day":15,"days_until":9,"is_today":false}]}
        }"#;
        let (feed, _) = serde_json_core::de::from_slice::<DailyFeed>(json).unwrap();
        assert!(feed.trash.yellow.today);
        assert_eq!(feed.trash.black.next_in_days, 3);
        assert_eq!(feed.birthdays.this_month.len(), 1);
        assert_eq!(feed.birthdays.this_month[0].name.as_str(), "Ada");
    }
}
