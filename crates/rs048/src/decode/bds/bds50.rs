use super::f64_threedecimals;
use deku::prelude::*;
use serde::Serialize;

/**
 * ## Track and turn report (BDS 5,0)
 */
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct TrackAndTurnReport {
    #[deku(bits = "1")]
    #[serde(skip)]
    pub roll_status: bool,
    /// Roll angle in degrees (negative sign means left wing down)
    #[deku(reader = "read_roll(deku::reader)")]
    #[serde(rename = "roll", serialize_with = "f64_threedecimals")]
    pub roll_angle: f64,

    #[deku(bits = "1")]
    #[serde(skip)]
    pub track_status: bool,
    /// True track angle in degrees, negative west of north
    #[deku(reader = "read_track(deku::reader)")]
    #[serde(rename = "track", serialize_with = "f64_threedecimals")]
    pub track_angle: f64,

    #[deku(bits = "2")]
    #[serde(skip)]
    pub groundspeed_status: u8,
    /// Groundspeed in kts
    #[deku(reader = "read_speed(deku::reader)")]
    pub groundspeed: u16,

    #[deku(bits = "1")]
    #[serde(skip)]
    pub rate_status: bool,
    /// Track angle rate in degrees/second
    #[deku(reader = "read_rate(deku::reader)")]
    #[serde(serialize_with = "f64_threedecimals")]
    pub track_rate: f64,

    #[deku(bits = "2")]
    #[serde(skip)]
    pub airspeed_status: u8,
    /// True Airspeed (TAS) in kts, IAS is in BDS 6,0
    #[deku(reader = "read_speed(deku::reader)")]
    #[serde(rename = "TAS")]
    pub true_airspeed: u16,
}

/// 10 bits two's complement, LSB = 45/256 degrees
fn read_roll<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(10)),
    )?;
    let value = if value >= 512 {
        value as i16 - 1024
    } else {
        value as i16
    };
    Ok(value as f64 * (45. / 256.))
}

/// 11 bits two's complement, LSB = 90/512 degrees
fn read_track<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(11)),
    )?;
    let value = if value >= 1024 {
        value as i16 - 2048
    } else {
        value as i16
    };
    Ok(value as f64 * (90. / 512.))
}

/// 9 bits, LSB = 2 kts
fn read_speed<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<u16, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(9)),
    )?;
    Ok(value * 2)
}

/// 10 bits two's complement, LSB = 8/256 degrees/second
fn read_rate<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(10)),
    )?;
    let value = if value >= 512 {
        value as i16 - 1024
    } else {
        value as i16
    };
    Ok(value as f64 * (8. / 256.))
}
