use deku::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Data Item I048/010: Data Source Identifier
///
/// Identification of the radar station from which the data is received,
/// as a System Area Code (SAC) and a System Identification Code (SIC).
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct DataSourceIdentifier {
    /// System Area Code
    #[serde(rename = "SAC")]
    pub sac: u8,
    /// System Identification Code
    #[serde(rename = "SIC")]
    pub sic: u8,
}

/// Data Item I048/140: Time of Day
///
/// Absolute time stamping expressed as UTC time elapsed since last
/// midnight, LSB = 1/128 s. The antenna revolution makes this the key
/// downstream tools group plots by.
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct TimeOfDay {
    /// Seconds since midnight (UTC)
    #[deku(reader = "read_time(deku::reader)")]
    pub seconds: f64,
}

impl TimeOfDay {
    /// Whole seconds, rounded to nearest
    pub fn whole_seconds(&self) -> u32 {
        libm::round(self.seconds) as u32
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let milliseconds = libm::round(self.seconds * 1000.) as u64;
        let (hours, rest) =
            (milliseconds / 3_600_000, milliseconds % 3_600_000);
        let (minutes, rest) = (rest / 60_000, rest % 60_000);
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            hours,
            minutes,
            rest / 1000,
            rest % 1000
        )
    }
}

fn read_time<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u32::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(24)),
    )?;
    Ok(value as f64 / 128.)
}

/// Data Item I048/040: Measured Position in Slant Polar Coordinates
///
/// Measured position of an aircraft in local polar coordinates:
/// slant range (LSB = 1/256 NM) and azimuth (LSB = 360/2^16 degrees,
/// clockwise from geographical north).
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct MeasuredPositionPolar {
    /// Slant range, in nautical miles
    #[deku(reader = "read_rho(deku::reader)")]
    pub rho: f64,
    /// Azimuth, in degrees
    #[deku(reader = "read_theta(deku::reader)")]
    pub theta: f64,
}

fn read_rho<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(16)),
    )?;
    Ok(value as f64 / 256.)
}

fn read_theta<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(16)),
    )?;
    Ok(value as f64 * 360. / 65536.)
}

/// Validation flag shared by the Mode-3/A code and the flight level
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum CodeValidation {
    Validated = 0,
    NotValidated = 1,
}

impl fmt::Display for CodeValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Validated => "Code Validated",
                Self::NotValidated => "Code not validated",
            }
        )
    }
}

/// Garbled flag shared by the Mode-3/A code and the flight level
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum GarbledStatus {
    Default = 0,
    Garbled = 1,
}

impl fmt::Display for GarbledStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Default => "Default",
                Self::Garbled => "Garbled code",
            }
        )
    }
}

/// Whether the Mode-3/A code was extracted during the last scan
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum CodeSource {
    Transponder = 0,
    NotExtracted = 1,
}

impl fmt::Display for CodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Transponder =>
                    "Mode-3/A code derived from the reply of the transponder",
                Self::NotExtracted =>
                    "Mode-3/A code not extracted during the last scan",
            }
        )
    }
}

/// Data Item I048/070: Mode-3/A Code in Octal Representation
///
/// Reply to a Mode-3/A interrogation: validity flags and four 3-bit
/// octal digits (A, B, C, D groups).
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Clone)]
pub struct Mode3ACode {
    #[serde(rename = "V")]
    pub validation: CodeValidation,
    #[serde(rename = "G")]
    pub garbled: GarbledStatus,
    #[serde(rename = "L")]
    pub source: CodeSource,
    /// The four octal digits, e.g. "7700"
    #[deku(reader = "read_squawk(deku::reader)")]
    pub squawk: String,
}

fn read_squawk<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<String, DekuError> {
    // one spare bit before the A digit
    let _spare = u8::from_reader_with_ctx(reader, deku::ctx::BitSize(1))?;
    let mut code = String::with_capacity(4);
    for _ in 0..4 {
        let digit = u8::from_reader_with_ctx(reader, deku::ctx::BitSize(3))?;
        code.push((b'0' + digit) as char);
    }
    trace!("Reading Mode-3/A code {}", code);
    Ok(code)
}

/// Data Item I048/090: Flight Level in Binary Representation
///
/// Flight level converted into binary representation, two's complement,
/// LSB = 1/4 FL (25 ft).
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct FlightLevel {
    #[serde(rename = "V")]
    pub validation: CodeValidation,
    #[serde(rename = "G")]
    pub garbled: GarbledStatus,
    /// Flight level, in units of 100 ft
    #[deku(reader = "read_level(deku::reader)")]
    pub level: f64,
}

fn read_level<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(14)),
    )?;
    let level = if value >= 8192 {
        (value as f64 - 16384.) * 0.25
    } else {
        value as f64 * 0.25
    };
    Ok(level)
}

/// Data Item I048/220: Aircraft Address
///
/// The 24-bit Mode S transponder address, rendered in uppercase
/// hexadecimal.
#[derive(Debug, PartialEq, Eq, DekuRead, Copy, Clone, Hash)]
pub struct AircraftAddress(
    #[deku(reader = "read_address(deku::reader)")] pub u32,
);

impl fmt::Display for AircraftAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl Serialize for AircraftAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{}", &self))
    }
}

fn read_address<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<u32, DekuError> {
    u32::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(24)),
    )
}

/// Character lookup table for the 6-bit encoding of item I048/240.
///
/// A subset of IA-5: letters at 1..26, space at 32, digits at 48..57.
/// All other positions decode to '?'.
const CHAR_LOOKUP: &[u8; 64] =
    b"?ABCDEFGHIJKLMNOPQRSTUVWXYZ????? ???????????????0123456789??????";

/// Data Item I048/240: Aircraft Identification
///
/// The callsign, in 8 characters of 6 bits each, as reported by the
/// aircraft. Space padding is dropped from the decoded string.
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Clone)]
pub struct AircraftIdentification {
    #[deku(reader = "callsign_read(deku::reader)")]
    pub callsign: String,
}

impl fmt::Display for AircraftIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.callsign)
    }
}

pub fn callsign_read<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<String, DekuError> {
    let mut chars = vec![];
    for _ in 1..=8 {
        let c = u8::from_reader_with_ctx(reader, deku::ctx::BitSize(6))?;
        if c != 32 {
            chars.push(c);
        }
    }
    let callsign = chars
        .into_iter()
        .map(|b| CHAR_LOOKUP[b as usize] as char)
        .collect::<String>();
    trace!("Reading callsign {}", callsign);
    Ok(callsign)
}

/// Data Item I048/161: Track Number
///
/// An integer uniquely identifying the track at the radar station. The
/// top four bits of the field are spare.
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct TrackNumber {
    #[deku(reader = "read_track_number(deku::reader)")]
    pub number: u16,
}

fn read_track_number<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<u16, DekuError> {
    u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(16)),
    )
}

/// Data Item I048/042: Calculated Position in Cartesian Coordinates
///
/// Calculated position in a grid centered on the radar, two's
/// complement components, LSB = 1/128 NM. X is positive east, Y
/// positive north.
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct CalculatedPositionCartesian {
    #[deku(reader = "read_component(deku::reader)")]
    pub x: f64,
    #[deku(reader = "read_component(deku::reader)")]
    pub y: f64,
}

fn read_component<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(16)),
    )?;
    let component = if value >= 32768 {
        (value as f64 - 65536.) / 128.
    } else {
        value as f64 / 128.
    };
    Ok(component)
}

/// Data Item I048/200: Calculated Track Velocity in Polar Representation
///
/// Groundspeed (LSB = 2^-14 NM/s, rendered in knots) and heading
/// (LSB = 360/2^16 degrees).
#[derive(Debug, PartialEq, Serialize, DekuRead, Copy, Clone)]
pub struct CalculatedTrackVelocity {
    /// Calculated groundspeed, in knots
    #[deku(reader = "read_groundspeed(deku::reader)")]
    pub groundspeed: f64,
    /// Calculated heading, in degrees clockwise from north
    #[deku(reader = "read_theta(deku::reader)")]
    pub heading: f64,
}

fn read_groundspeed<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<f64, DekuError> {
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(16)),
    )?;
    // 2^-14 NM/s, converted to knots
    Ok(value as f64 / 16384. * 3600.)
}

/// Data Item I048/110: Height Measured by a 3D Radar
///
/// Height above mean sea level measured by the radar itself, two's
/// complement over 14 bits, LSB = 25 ft.
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct Height3D {
    /// Measured height, in feet
    #[deku(reader = "read_height(deku::reader)")]
    pub height: i32,
}

fn read_height<R: deku::no_std_io::Read + deku::no_std_io::Seek>(
    reader: &mut Reader<R>,
) -> Result<i32, DekuError> {
    let _spare = u8::from_reader_with_ctx(reader, deku::ctx::BitSize(2))?;
    let value = u16::from_reader_with_ctx(
        reader,
        (deku::ctx::Endian::Big, deku::ctx::BitSize(14)),
    )?;
    let height = if value >= 8192 {
        (value as i32 - 16384) * 25
    } else {
        value as i32 * 25
    };
    Ok(height)
}

/// Transponder communications capability, item I048/230
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "3")]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    #[deku(id = "0")]
    SurveillanceOnly,
    #[deku(id = "1")]
    CommACommB,
    #[deku(id = "2")]
    CommAUplinkElm,
    #[deku(id = "3")]
    CommADownlinkElm,
    #[deku(id = "4")]
    Level5,
    #[deku(id_pat = "_")]
    NotAssigned(u8),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::SurveillanceOnly =>
                    "No communications capability (surveillance only)",
                Self::CommACommB => "Comm. A and Comm. B capability",
                Self::CommAUplinkElm => "Comm. A, Comm. B and Uplink ELM",
                Self::CommADownlinkElm =>
                    "Comm. A, Comm. B, Uplink ELM and Downlink ELM",
                Self::Level5 => "Level 5 Transponder capability",
                Self::NotAssigned(_) => "Not assigned",
            }
        )
    }
}

/// Flight status of the aircraft, item I048/230
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "3")]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    #[deku(id = "0")]
    NoAlertAirborne,
    #[deku(id = "1")]
    NoAlertOnGround,
    #[deku(id = "2")]
    AlertAirborne,
    #[deku(id = "3")]
    AlertOnGround,
    #[deku(id = "4")]
    AlertSpi,
    #[deku(id = "5")]
    NoAlertSpi,
    #[deku(id = "6")]
    NotAssigned,
    #[deku(id = "7")]
    Unknown,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoAlertAirborne =>
                    "No alert, no SPI, aircraft airborne",
                Self::NoAlertOnGround =>
                    "No alert, no SPI, aircraft on ground",
                Self::AlertAirborne => "Alert, no SPI, aircraft airborne",
                Self::AlertOnGround => "Alert, no SPI, aircraft on ground",
                Self::AlertSpi =>
                    "Alert, SPI, aircraft airborne or on ground",
                Self::NoAlertSpi =>
                    "No alert, SPI, aircraft airborne or on ground",
                Self::NotAssigned => "Not assigned",
                Self::Unknown => "Unknown",
            }
        )
    }
}

/// SI/II transponder capability, item I048/230
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum SICapability {
    SiCode = 0,
    IiCode = 1,
}

impl fmt::Display for SICapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::SiCode => "SI-Code Capable",
                Self::IiCode => "II-Code Capable",
            }
        )
    }
}

/// Altitude reporting resolution, item I048/230
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeReportingCapability {
    HundredFt = 0,
    TwentyFiveFt = 1,
}

impl fmt::Display for AltitudeReportingCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::HundredFt => "100 ft resolution",
                Self::TwentyFiveFt => "25 ft resolution",
            }
        )
    }
}

/// Data Item I048/230: Communications/ACAS Capability and Flight Status
///
/// Communications capability of the transponder, flight status and a
/// few capability bits lifted from BDS 1,0.
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct CommunicationsCapability {
    #[serde(rename = "COM")]
    pub com: Capability,
    #[serde(rename = "STAT")]
    pub status: FlightStatus,
    #[serde(rename = "SI")]
    pub si: SICapability,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub spare: bool,
    /// Mode S specific service capability
    #[deku(bits = "1")]
    #[serde(rename = "MSSC")]
    pub mssc: bool,
    #[serde(rename = "ARC")]
    pub altitude_reporting: AltitudeReportingCapability,
    /// Aircraft identification capability
    #[deku(bits = "1")]
    #[serde(rename = "AIC")]
    pub aic: bool,
    /// BDS 1,0 bit 16
    #[deku(bits = "1")]
    #[serde(rename = "B1A")]
    pub b1a: bool,
    /// BDS 1,0 bits 37/40
    #[deku(bits = "4")]
    #[serde(rename = "B1B")]
    pub b1b: u8,
}
