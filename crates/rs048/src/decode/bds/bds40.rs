use deku::prelude::*;
use serde::Serialize;
use std::fmt;

/**
 * ## Selected vertical intention (BDS 4,0)
 *
 * Altitudes selected on the MCP/FCU or the FMS, the barometric
 * pressure setting, and which of those targets the aircraft honours.
 * The status bits are kept but the values are decoded regardless.
 */
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct SelectedVerticalIntention {
    #[deku(bits = "1")]
    #[serde(skip)]
    pub mcp_status: bool,
    /// MCP/FCU selected altitude, in ft
    #[deku(reader = "read_selected_altitude(deku::reader)")]
    #[serde(rename = "selected_mcp")]
    pub mcp_selected_altitude: u16,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub fms_status: bool,
    /// FMS selected altitude, in ft
    #[deku(reader = "read_selected_altitude(deku::reader)")]
    #[serde(rename = "selected_fms")]
    pub fms_selected_altitude: u16,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub barometric_status: bool,
    /// Barometric pressure setting, in mb
    #[deku(reader = "read_pressure(deku::reader)")]
    #[serde(rename = "barometric_setting")]
    pub barometric_setting: f64,
    #[deku(reader = "read_reserved(deku::reader)")]
    #[serde(skip)]
    pub reserved: u16,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub mode_status: bool,
    #[serde(rename = "vnav")]
    pub vnav_mode: ModeEngagement,
    #[serde(rename = "alt_hold")]
    pub alt_hold_mode: ModeEngagement,
    #[serde(rename = "approach")]
    pub approach_mode: ModeEngagement,
    #[deku(bits = "2")]
    #[serde(skip)]
    pub reserved_final: u8,
    #[serde(rename = "target_source")]
    pub altitude_source: TargetAltitudeSource,
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum ModeEngagement {
    NotActive = 0,
    Active = 1,
}

impl fmt::Display for ModeEngagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NotActive => "Not Active",
                Self::Active => "Active",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "2")]
#[serde(rename_all = "snake_case")]
pub enum TargetAltitudeSource {
    #[deku(id = "0")]
    Unknown,
    #[deku(id = "1")]
    AircraftAltitude,
    #[deku(id = "2")]
    FcuMcpSelected,
    #[deku(id = "3")]
    FmsSelected,
}

impl fmt::Display for TargetAltitudeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Unknown => "Unknown",
                Self::AircraftAltitude => "Aircraft Altitude",
                Self::FcuMcpSelected => "FCU/MCP Selected Altitude",
                Self::FmsSelected => "FMS Selected Altitude",
            }
        )
    }
}

/// 12 bits, LSB = 16 ft
fn read_selected_altitude<
    R: deku::no_std_io::Read + deku::no_std_io::Seek,
>(
    reader: &mut Reader<R>,
) -> Result<u16, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(12)),
    )?;
    Ok(value * 16)
}

/// 12 bits, LSB = 0.1 mb, offset 800 mb
fn read_pressure<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(12)),
    )?;
    Ok(value as f64 * 0.1 + 800.)
}

fn read_reserved<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<u16, DekuError> {
    u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(9)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hexlit::hex;

    #[test]
    fn test_selected_vertical_intention() {
        let bytes = hex!("85e42f30a800c2");
        let (_, register) =
            SelectedVerticalIntention::from_bytes((&bytes, 0)).unwrap();
        assert_eq!(register.mcp_selected_altitude, 3008);
        assert_eq!(register.fms_selected_altitude, 3008);
        assert_relative_eq!(
            register.barometric_setting,
            1013.2,
            max_relative = 1e-6
        );
        assert_eq!(register.vnav_mode, ModeEngagement::Active);
        assert_eq!(register.alt_hold_mode, ModeEngagement::NotActive);
        assert_eq!(register.approach_mode, ModeEngagement::NotActive);
        assert_eq!(
            register.altitude_source,
            TargetAltitudeSource::FcuMcpSelected
        );
        assert_eq!(
            format!("{}", register.altitude_source),
            "FCU/MCP Selected Altitude"
        );
    }

    #[test]
    fn test_low_pressure_setting() {
        // all-zero register reads as the 800 mb offset
        let bytes = hex!("00000000000000");
        let (_, register) =
            SelectedVerticalIntention::from_bytes((&bytes, 0)).unwrap();
        assert_eq!(register.mcp_selected_altitude, 0);
        assert_relative_eq!(register.barometric_setting, 800.);
        assert_eq!(
            register.altitude_source,
            TargetAltitudeSource::Unknown
        );
    }
}
