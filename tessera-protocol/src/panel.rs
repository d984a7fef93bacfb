//! Panel-link message surface.
//!
//! Typed render payloads for the e-paper tiles, postcard-encoded inside
//! frames of kind [`KIND_PANEL`]. The co-processor owns layout, fonts and
//! waveforms; the controller only decides *what* each tile shows and *when*
//! it refreshes.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

/// Frame kind for panel messages
pub const KIND_PANEL: u8 = 0x10;

/// Cells on one sensor tile (4 rows × 2 columns)
pub const SENSOR_CELLS: usize = 8;

/// Maximum birthdays shown on the events tile
pub const MAX_BIRTHDAYS: usize = 16;

/// Maximum person/label name length
pub const MAX_NAME: usize = 24;

/// "HH:MM"-style strings (sun times, update stamp)
pub const MAX_CLOCK: usize = 8;

/// Maximum season name length
pub const MAX_SEASON: usize = 12;

/// Maximum formatted sensor value length
pub const MAX_VALUE: usize = 12;

/// Maximum error banner length
pub const MAX_ERROR: usize = 48;

/// Calendar block of the ephemeris tile, computed from the wall clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateCard {
    pub day_name: String<MAX_SEASON>,
    pub day: u8,
    pub month_name: String<MAX_SEASON>,
    pub year: u16,
    pub day_of_year: u16,
    pub days_in_year: u16,
    pub week: u8,
}

/// Sunrise/sunset block of the ephemeris tile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SunCard {
    pub sunrise: String<MAX_CLOCK>,
    pub sunset: String<MAX_CLOCK>,
    pub daily_change: String<MAX_CLOCK>,
}

/// Season wheel of the ephemeris tile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeasonCard {
    pub name: String<MAX_SEASON>,
    pub progress_pct: f32,
    pub days_until_spring: i16,
    pub days_until_summer: i16,
    pub days_until_fall: i16,
    pub days_until_winter: i16,
}

/// Full payload for the ephemeris (color) tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EphemerisFrame {
    pub date: DateCard,
    pub sun: SunCard,
    pub season: SeasonCard,
}

/// One collection bin's schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BinCard {
    pub today: bool,
    pub next_in_days: i16,
}

/// Trash collection block of the events tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrashCard {
    pub black: BinCard,
    pub yellow: BinCard,
}

/// One birthday row on the events tile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BirthdayCard {
    pub name: String<MAX_NAME>,
    pub day: u8,
    pub days_until: i16,
    pub is_today: bool,
}

/// Full payload for the events tile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventsFrame {
    pub trash: TrashCard,
    pub birthdays: Vec<BirthdayCard, MAX_BIRTHDAYS>,
    /// Today's day-of-month, for highlighting rows
    pub today: u8,
}

/// One cell on a sensor tile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorCell {
    pub label: String<MAX_NAME>,
    pub value: String<MAX_VALUE>,
    pub unit: String<MAX_CLOCK>,
}

/// Full payload for a sensor tile: always a complete eight-cell snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFrame {
    pub cells: [SensorCell; SENSOR_CELLS],
    /// "HH:MM" stamp of the pass that produced this snapshot (may be empty)
    pub updated_at: String<5>,
    /// Layout style selector
    pub style: u8,
}

impl Default for SensorFrame {
    fn default() -> Self {
        Self {
            cells: core::array::from_fn(|_| SensorCell::default()),
            updated_at: String::new(),
            style: 0,
        }
    }
}

/// Render payload for one tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::large_enum_variant)]
pub enum PanelFrame {
    Ephemeris(EphemerisFrame),
    Events(EventsFrame),
    Sensors(SensorFrame),
}

/// One message to the panel co-processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::large_enum_variant)]
pub enum PanelMessage {
    /// Power up and configure one tile
    Init { panel: u8 },
    /// Blank one tile
    Clear { panel: u8 },
    /// Replace one tile's pending payload
    Frame { panel: u8, frame: PanelFrame },
    /// Redraw one tile from its pending payload
    Refresh { panel: u8, full: bool },
    /// Show an error banner on one tile
    ShowError {
        panel: u8,
        message: String<MAX_ERROR>,
    },
}

/// Postcard-encode a panel message, returning the written prefix of `buf`
pub fn encode_message<'b>(
    message: &PanelMessage,
    buf: &'b mut [u8],
) -> postcard::Result<&'b mut [u8]> {
    postcard::to_slice(message, buf)
}

/// Decode a panel message payload
pub fn decode_message(payload: &[u8]) -> postcard::Result<PanelMessage> {
    postcard::from_bytes(payload)
}

/// Copy `s` into a bounded string, truncating on a character boundary
pub fn clipped<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_frame_roundtrips() {
        let mut frame = SensorFrame::default();
        frame.cells[3].label = clipped("Grid power");
        frame.cells[3].value = clipped("1.2");
        frame.cells[3].unit = clipped("kW");
        frame.updated_at = clipped("07:45");
        frame.style = 1;

        let message = PanelMessage::Frame {
            panel: 1,
            frame: PanelFrame::Sensors(frame),
        };
        let mut buf = [0u8; 1024];
        let encoded = encode_message(&message, &mut buf).unwrap();
        let decoded = decode_message(encoded).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn events_frame_roundtrips() {
        let mut frame = EventsFrame::default();
        frame.trash.yellow = BinCard {
            today: true,
            next_in_days: 0,
        };
        frame.today = 14;
        frame
            .birthdays
            .push(BirthdayCard {
                name: clipped("Ada"),
                day: 15,
                days_until: 1,
                is_today: false,
            })
            .unwrap();

        let message = PanelMessage::Frame {
            panel: 2,
            frame: PanelFrame::Events(frame),
        };
        let mut buf = [0u8; 1024];
        let encoded = encode_message(&message, &mut buf).unwrap();
        assert_eq!(decode_message(encoded).unwrap(), message);
    }

    #[test]
    fn refresh_and_error_roundtrip() {
        for message in [
            PanelMessage::Refresh {
                panel: 0,
                full: true,
            },
            PanelMessage::ShowError {
                panel: 3,
                message: clipped("Fetch failed"),
            },
        ] {
            let mut buf = [0u8; 128];
            let encoded = encode_message(&message, &mut buf).unwrap();
            assert_eq!(decode_message(encoded).unwrap(), message);
        }
    }

    #[test]
    fn clipped_respects_capacity_and_boundaries() {
        let s: String<4> = clipped("éléphant");
        assert_eq!(s.as_str(), "él"); // 'é' is two bytes; the next one does not fit
        let s: String<16> = clipped("ok");
        assert_eq!(s.as_str(), "ok");
    }
}
