use super::f64_threedecimals;
use deku::prelude::*;
use serde::Serialize;

/**
 * ## Heading and speed report (BDS 6,0)
 */
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct HeadingAndSpeedReport {
    #[deku(bits = "1")]
    #[serde(skip)]
    pub heading_status: bool,
    /// The magnetic heading is the aircraft's heading with respect to
    /// the magnetic North, in degrees, negative west of north
    #[deku(reader = "read_heading(deku::reader)")]
    #[serde(rename = "heading", serialize_with = "f64_threedecimals")]
    pub magnetic_heading: f64,

    #[deku(bits = "1")]
    #[serde(skip)]
    pub airspeed_status: bool,
    /// Indicated Airspeed (IAS) in kts, TAS is in BDS 5,0
    #[deku(reader = "read_airspeed(deku::reader)")]
    #[serde(rename = "IAS")]
    pub indicated_airspeed: u16,

    #[deku(bits = "1")]
    #[serde(skip)]
    pub mach_status: bool,
    /// Mach number
    #[deku(reader = "read_mach(deku::reader)")]
    #[serde(rename = "Mach", serialize_with = "f64_threedecimals")]
    pub mach_number: f64,

    #[deku(bits = "1")]
    #[serde(skip)]
    pub barometric_status: bool,
    /// Barometric altitude rates (in ft/mn) are only derived from
    /// barometer measurements (noisy).
    #[deku(reader = "read_vertical_rate(deku::reader)")]
    #[serde(rename = "vrate_barometric")]
    pub barometric_altitude_rate: i16,

    #[deku(bits = "1")]
    #[serde(skip)]
    pub inertial_status: bool,
    /// Inertial vertical velocities (in ft/mn) are values provided by
    /// navigational equipment from different sources including the FMS
    #[deku(reader = "read_vertical_rate(deku::reader)")]
    #[serde(rename = "vrate_inertial")]
    pub inertial_vertical_velocity: i16,
}

/// 11 bits two's complement, LSB = 90/512 degrees
fn read_heading<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
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

/// 10 bits, LSB = 1 kt
fn read_airspeed<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<u16, DekuError> {
    u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(10)),
    )
}

/// 10 bits, LSB = 2.048/512 Mach
fn read_mach<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(10)),
    )?;
    Ok(value as f64 * (2.048 / 512.))
}

/// 10 bits two's complement, LSB = 32 ft/mn
fn read_vertical_rate<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<i16, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(10)),
    )?;
    let value = if value >= 512 {
        value as i16 - 1024
    } else {
        value as i16
    };
    Ok(value * 32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hexlit::hex;

    #[test]
    fn test_heading_and_speed() {
        let bytes = hex!("f009f5323f4464");
        let (_, register) =
            HeadingAndSpeedReport::from_bytes((&bytes, 0)).unwrap();
        assert_relative_eq!(register.magnetic_heading, -45.);
        assert_eq!(register.indicated_airspeed, 250);
        assert_relative_eq!(register.mach_number, 0.8, max_relative = 1e-9);
        assert_eq!(register.barometric_altitude_rate, -768);
        assert_eq!(register.inertial_vertical_velocity, 3200);
    }

    #[test]
    fn test_descending() {
        // both vertical rates at the negative extreme
        let bytes = hex!("00000000100200");
        let (_, register) =
            HeadingAndSpeedReport::from_bytes((&bytes, 0)).unwrap();
        assert_eq!(register.barometric_altitude_rate, -16384);
        assert_eq!(register.inertial_vertical_velocity, -16384);
    }
}
