use deku::prelude::*;
use serde::ser::Serializer;
use serde::Serialize;
use tracing::debug;

use super::OctetCursor;

pub mod bds40;
pub mod bds50;
pub mod bds60;

pub use bds40::SelectedVerticalIntention;
pub use bds50::TrackAndTurnReport;
pub use bds60::HeadingAndSpeedReport;

fn f64_threedecimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let rounded_value = (value * 1000.0).round() / 1000.0;
    serializer.serialize_f64(rounded_value)
}

/**
 * ## Data Item I048/250: BDS Register Data
 *
 * Comm-B replies extracted by the interrogator. A one-octet REP field
 * counts the 8-octet repetitions; in each one, the last octet carries
 * the BDS register number and the first seven its content. Registers
 * 4,0, 5,0 and 6,0 get a full decoding, any other register is only
 * listed; when one register repeats, the last occurrence wins.
 */
#[derive(Debug, PartialEq, Serialize, Clone, Default)]
pub struct ModeSMBData {
    /// All registers present in the item, in order, e.g. "BDS:4,0"
    pub registers: Vec<String>,
    #[serde(rename = "bds40", skip_serializing_if = "Option::is_none")]
    pub selected_vertical_intention: Option<SelectedVerticalIntention>,
    #[serde(rename = "bds50", skip_serializing_if = "Option::is_none")]
    pub track_and_turn: Option<TrackAndTurnReport>,
    #[serde(rename = "bds60", skip_serializing_if = "Option::is_none")]
    pub heading_and_speed: Option<HeadingAndSpeedReport>,
}

#[derive(Debug, PartialEq, DekuRead)]
struct BdsRegister {
    data: [u8; 7],
    #[deku(bits = "4")]
    bds1: u8,
    #[deku(bits = "4")]
    bds2: u8,
}

impl ModeSMBData {
    pub fn read(
        cursor: &mut OctetCursor,
    ) -> Result<Option<Self>, DekuError> {
        let Some(octet) = cursor.take(1) else {
            return Ok(None);
        };
        let count = octet[0];
        let mut item = Self::default();
        for _ in 0..count {
            let Some(octets) = cursor.take(8) else {
                // a repetition is announced but the record stops short
                return Ok(None);
            };
            let (_, register) = BdsRegister::from_bytes((octets, 0))?;
            item.registers
                .push(format!("BDS:{},{}", register.bds1, register.bds2));
            match (register.bds1, register.bds2) {
                (4, 0) => {
                    let (_, decoded) = SelectedVerticalIntention::from_bytes(
                        (&register.data[..], 0),
                    )?;
                    item.selected_vertical_intention = Some(decoded);
                }
                (5, 0) => {
                    let (_, decoded) = TrackAndTurnReport::from_bytes((
                        &register.data[..],
                        0,
                    ))?;
                    item.track_and_turn = Some(decoded);
                }
                (6, 0) => {
                    let (_, decoded) = HeadingAndSpeedReport::from_bytes((
                        &register.data[..],
                        0,
                    ))?;
                    item.heading_and_speed = Some(decoded);
                }
                (bds1, bds2) => {
                    debug!("no decoding for BDS {},{}", bds1, bds2)
                }
            }
        }
        Ok(Some(item))
    }
}
