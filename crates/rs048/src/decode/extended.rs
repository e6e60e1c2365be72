use deku::prelude::*;
use serde::Serialize;
use std::fmt;

use super::OctetCursor;

/**
 * ## Data Item I048/020: Target Report Descriptor
 *
 * Type and properties of the report, over one mandatory octet and up
 * to two extensions announced by FX bits. An announced extension
 * missing from a truncated record leaves the corresponding fields
 * empty.
 */
#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct TargetReportDescriptor {
    #[serde(flatten)]
    pub report: TargetReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<TargetReportExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_extension: Option<TargetReportSecondExtension>,
}

impl TargetReportDescriptor {
    pub fn read(
        cursor: &mut OctetCursor,
    ) -> Result<Option<Self>, DekuError> {
        let Some(octet) = cursor.take(1) else {
            return Ok(None);
        };
        let (_, report) = TargetReport::from_bytes((octet, 0))?;
        let mut descriptor = Self {
            report,
            extension: None,
            second_extension: None,
        };
        if descriptor.report.fx {
            let Some(octet) = cursor.take(1) else {
                return Ok(Some(descriptor));
            };
            let (_, extension) =
                TargetReportExtension::from_bytes((octet, 0))?;
            let follows = extension.fx;
            descriptor.extension = Some(extension);
            if follows {
                let Some(octet) = cursor.take(1) else {
                    return Ok(Some(descriptor));
                };
                let (_, second) =
                    TargetReportSecondExtension::from_bytes((octet, 0))?;
                descriptor.second_extension = Some(second);
            }
        }
        Ok(Some(descriptor))
    }
}

/// First octet of the target report descriptor
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct TargetReport {
    #[serde(rename = "TYP")]
    pub detection: DetectionType,
    #[serde(rename = "SIM")]
    pub simulated: SimulatedTarget,
    #[serde(rename = "RDP")]
    pub rdp: RdpChain,
    #[serde(rename = "SPI")]
    pub spi: SpecialPosition,
    #[serde(rename = "RAB")]
    pub source: ReportSource,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub fx: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "3")]
#[serde(rename_all = "snake_case")]
pub enum DetectionType {
    #[deku(id = "0")]
    NoDetection,
    #[deku(id = "1")]
    SinglePsr,
    #[deku(id = "2")]
    SingleSsr,
    #[deku(id = "3")]
    SsrPsr,
    #[deku(id = "4")]
    ModeSAllCall,
    #[deku(id = "5")]
    ModeSRollCall,
    #[deku(id = "6")]
    ModeSAllCallPsr,
    #[deku(id = "7")]
    ModeSRollCallPsr,
}

impl fmt::Display for DetectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoDetection => "No detection",
                Self::SinglePsr => "Single PSR detection",
                Self::SingleSsr => "Single SSR detection",
                Self::SsrPsr => "SSR + PSR detection",
                Self::ModeSAllCall => "Single ModeS All-Call",
                Self::ModeSRollCall => "Single ModeS Roll-Call",
                Self::ModeSAllCallPsr => "ModeS All-Call + PSR",
                Self::ModeSRollCallPsr => "ModeS Roll-Call + PSR",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedTarget {
    Actual = 0,
    Simulated = 1,
}

impl fmt::Display for SimulatedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Actual => "Actual target report",
                Self::Simulated => "Simulated target report",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum RdpChain {
    Chain1 = 0,
    Chain2 = 1,
}

impl fmt::Display for RdpChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Chain1 => "RDP Chain 1",
                Self::Chain2 => "RDP Chain 2",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum SpecialPosition {
    Absence = 0,
    Presence = 1,
}

impl fmt::Display for SpecialPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Absence => "Absence of SPI",
                Self::Presence => "Presence of SPI",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Transponder = 0,
    FieldMonitor = 1,
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Transponder => "Report from aircraft transponder",
                Self::FieldMonitor =>
                    "Report from field monitor (fixed transponder)",
            }
        )
    }
}

/// First extension of the target report descriptor
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct TargetReportExtension {
    #[serde(rename = "TST")]
    pub test_target: TestTarget,
    #[serde(rename = "ERR")]
    pub extended_range: ExtendedRange,
    #[serde(rename = "XPP")]
    pub xpulse: XPulse,
    #[serde(rename = "ME")]
    pub military_emergency: MilitaryEmergency,
    #[serde(rename = "MI")]
    pub military_identification: MilitaryIdentification,
    #[serde(rename = "FOE_FRI")]
    pub mode4: Mode4Interrogation,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub fx: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum TestTarget {
    Real = 0,
    Test = 1,
}

impl fmt::Display for TestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Real => "Real target report",
                Self::Test => "Test target report",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum ExtendedRange {
    NoExtendedRange = 0,
    ExtendedRange = 1,
}

impl fmt::Display for ExtendedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoExtendedRange => "No Extended Range",
                Self::ExtendedRange => "Extended Range present",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum XPulse {
    NoXPulse = 0,
    XPulse = 1,
}

impl fmt::Display for XPulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoXPulse => "No X-Pulse present",
                Self::XPulse => "X-Pulse present",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum MilitaryEmergency {
    NoEmergency = 0,
    Emergency = 1,
}

impl fmt::Display for MilitaryEmergency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoEmergency => "No military emergency",
                Self::Emergency => "Military emergency",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum MilitaryIdentification {
    NoIdentification = 0,
    Identification = 1,
}

impl fmt::Display for MilitaryIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoIdentification => "No military identification",
                Self::Identification => "Military identification",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "2")]
#[serde(rename_all = "snake_case")]
pub enum Mode4Interrogation {
    #[deku(id = "0")]
    NoInterrogation,
    #[deku(id = "1")]
    Friendly,
    #[deku(id = "2")]
    Unknown,
    #[deku(id = "3")]
    NoReply,
}

impl fmt::Display for Mode4Interrogation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoInterrogation => "No Mode 4 interrogation",
                Self::Friendly => "Friendly target",
                Self::Unknown => "Unknown target",
                Self::NoReply => "No reply",
            }
        )
    }
}

/// Second extension of the target report descriptor
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct TargetReportSecondExtension {
    /// ADS-B element populated
    #[deku(bits = "1")]
    pub adsb_populated: bool,
    /// On-site ADS-B information available
    #[deku(bits = "1")]
    pub adsb_available: bool,
    /// Surveillance cluster network element populated
    #[deku(bits = "1")]
    pub scn_populated: bool,
    /// Surveillance cluster network information available
    #[deku(bits = "1")]
    pub scn_available: bool,
    /// Passive acquisition interface element populated
    #[deku(bits = "1")]
    pub pai_populated: bool,
    /// Passive acquisition interface information available
    #[deku(bits = "1")]
    pub pai_available: bool,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub spare: bool,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub fx: bool,
}

/**
 * ## Data Item I048/170: Track Status
 *
 * Status of a monoradar track, one mandatory octet followed by as many
 * extensions as the FX chain announces.
 */
#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct TrackStatus {
    #[serde(flatten)]
    pub report: TrackReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<TrackStatusExtension>,
}

impl TrackStatus {
    pub fn read(
        cursor: &mut OctetCursor,
    ) -> Result<Option<Self>, DekuError> {
        let Some(octet) = cursor.take(1) else {
            return Ok(None);
        };
        let (_, report) = TrackReport::from_bytes((octet, 0))?;
        let mut status = Self {
            report,
            extensions: vec![],
        };
        let mut follows = status.report.fx;
        while follows {
            let Some(octet) = cursor.take(1) else {
                break;
            };
            let (_, extension) =
                TrackStatusExtension::from_bytes((octet, 0))?;
            follows = extension.fx;
            status.extensions.push(extension);
        }
        Ok(Some(status))
    }
}

/// First octet of the track status
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct TrackReport {
    #[serde(rename = "CNF")]
    pub confirmation: TrackConfirmation,
    #[serde(rename = "RAD")]
    pub sensor: SensorType,
    #[serde(rename = "DOU")]
    pub confidence: ConfidenceLevel,
    #[serde(rename = "MAH")]
    pub maneuver: HorizontalManeuver,
    #[serde(rename = "CDM")]
    pub climb_descent: ClimbDescentMode,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub fx: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum TrackConfirmation {
    Confirmed = 0,
    Tentative = 1,
}

impl fmt::Display for TrackConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Confirmed => "Confirmed Track",
                Self::Tentative => "Tentative Track",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "2")]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    #[deku(id = "0")]
    Combined,
    #[deku(id = "1")]
    Psr,
    #[deku(id = "2")]
    SsrModeS,
    #[deku(id = "3")]
    Invalid,
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Combined => "Combined Track",
                Self::Psr => "PSR Track",
                Self::SsrModeS => "SSR/Mode S Track",
                Self::Invalid => "N/A",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Normal = 0,
    Low = 1,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Normal => "Normal confidence",
                Self::Low => "Low confidence",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalManeuver {
    NotSensed = 0,
    Sensed = 1,
}

impl fmt::Display for HorizontalManeuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NotSensed => "No horizontal maneuver sensed",
                Self::Sensed => "Horizontal maneuver sensed",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "2")]
#[serde(rename_all = "snake_case")]
pub enum ClimbDescentMode {
    #[deku(id = "0")]
    Maintaining,
    #[deku(id = "1")]
    Climbing,
    #[deku(id = "2")]
    Descending,
    #[deku(id = "3")]
    Invalid,
}

impl fmt::Display for ClimbDescentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Maintaining => "Maintaining",
                Self::Climbing => "Climbing",
                Self::Descending => "Descending",
                Self::Invalid => "N/A",
            }
        )
    }
}

/// Extension octet of the track status
#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
pub struct TrackStatusExtension {
    #[serde(rename = "TRE")]
    pub end_of_track: TrackEnd,
    #[serde(rename = "GHO")]
    pub ghost: GhostTarget,
    #[serde(rename = "SUP")]
    pub neighbour: NeighbouringNode,
    #[serde(rename = "TCC")]
    pub slant_correction: SlantRangeCorrection,
    #[deku(bits = "3")]
    #[serde(skip)]
    pub spare: u8,
    #[deku(bits = "1")]
    #[serde(skip)]
    pub fx: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum TrackEnd {
    Alive = 0,
    End = 1,
}

impl fmt::Display for TrackEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Alive => "Track still alive",
                Self::End => "End of track",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum GhostTarget {
    TrueTarget = 0,
    Ghost = 1,
}

impl fmt::Display for GhostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::TrueTarget => "True target",
                Self::Ghost => "Ghost target",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum NeighbouringNode {
    NoNode = 0,
    Maintained = 1,
}

impl fmt::Display for NeighbouringNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::NoNode => "No neighboring node",
                Self::Maintained => "Track maintained by neighboring node",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, DekuRead, Copy, Clone)]
#[deku(id_type = "u8", bits = "1")]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum SlantRangeCorrection {
    RadarPlane = 0,
    SlantRange = 1,
}

impl fmt::Display for SlantRangeCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::RadarPlane => "Radar plane tracking",
                Self::SlantRange => "Slant range correction",
            }
        )
    }
}

/**
 * ## Data Item I048/130: Radar Plot Characteristics
 *
 * A primary subfield announces which of the seven one-octet subfields
 * follow. The FX bit of the primary subfield is read but no further
 * subfield is defined for this category.
 */
#[derive(Debug, PartialEq, Serialize, Clone, Default)]
pub struct RadarPlotCharacteristics {
    /// SSR plot runlength, in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssr_runlength: Option<f64>,
    /// Number of received replies for MSSR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssr_replies: Option<u8>,
    /// Amplitude of MSSR reply, in dBm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssr_amplitude: Option<i8>,
    /// Primary plot runlength, in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psr_runlength: Option<f64>,
    /// Amplitude of primary plot, in dBm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psr_amplitude: Option<i8>,
    /// Difference in range between PSR and SSR plot, in NM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_difference: Option<f64>,
    /// Difference in azimuth between PSR and SSR plot, in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azimuth_difference: Option<f64>,
}

#[derive(Debug, PartialEq, DekuRead)]
struct PlotSubfields {
    #[deku(bits = "1")]
    srl: bool,
    #[deku(bits = "1")]
    srr: bool,
    #[deku(bits = "1")]
    sam: bool,
    #[deku(bits = "1")]
    prl: bool,
    #[deku(bits = "1")]
    pam: bool,
    #[deku(bits = "1")]
    rpd: bool,
    #[deku(bits = "1")]
    apd: bool,
    #[deku(bits = "1")]
    fx: bool,
}

impl RadarPlotCharacteristics {
    pub fn read(
        cursor: &mut OctetCursor,
    ) -> Result<Option<Self>, DekuError> {
        let Some(octet) = cursor.take(1) else {
            return Ok(None);
        };
        let (_, subfields) = PlotSubfields::from_bytes((octet, 0))?;
        let mut characteristics = Self::default();
        if subfields.srl {
            if let Some(octet) = cursor.take(1) {
                characteristics.ssr_runlength =
                    Some(octet[0] as f64 * (360. / 8192.));
            }
        }
        if subfields.srr {
            if let Some(octet) = cursor.take(1) {
                characteristics.ssr_replies = Some(octet[0]);
            }
        }
        if subfields.sam {
            if let Some(octet) = cursor.take(1) {
                characteristics.ssr_amplitude = Some(octet[0] as i8);
            }
        }
        if subfields.prl {
            if let Some(octet) = cursor.take(1) {
                characteristics.psr_runlength =
                    Some(octet[0] as f64 * (360. / 8192.));
            }
        }
        if subfields.pam {
            if let Some(octet) = cursor.take(1) {
                characteristics.psr_amplitude = Some(octet[0] as i8);
            }
        }
        if subfields.rpd {
            if let Some(octet) = cursor.take(1) {
                characteristics.range_difference =
                    Some((octet[0] as i8) as f64 / 256.);
            }
        }
        if subfields.apd {
            if let Some(octet) = cursor.take(1) {
                characteristics.azimuth_difference =
                    Some((octet[0] as i8) as f64 * (360. / 16384.));
            }
        }
        Ok(Some(characteristics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hexlit::hex;

    #[test]
    fn test_target_report_single_octet() {
        let bytes = hex!("40");
        let mut cursor = OctetCursor::new(&bytes);
        let descriptor =
            TargetReportDescriptor::read(&mut cursor).unwrap().unwrap();
        assert_eq!(descriptor.report.detection, DetectionType::SingleSsr);
        assert_eq!(descriptor.report.simulated, SimulatedTarget::Actual);
        assert_eq!(descriptor.report.source, ReportSource::Transponder);
        assert!(descriptor.extension.is_none());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_target_report_with_extensions() {
        // Mode S Roll-Call + PSR, then both extensions
        let bytes = hex!("e187c0ff");
        let mut cursor = OctetCursor::new(&bytes);
        let descriptor =
            TargetReportDescriptor::read(&mut cursor).unwrap().unwrap();
        assert_eq!(
            descriptor.report.detection,
            DetectionType::ModeSRollCallPsr
        );
        let extension = descriptor.extension.unwrap();
        assert_eq!(extension.test_target, TestTarget::Test);
        assert_eq!(extension.mode4, Mode4Interrogation::NoReply);
        let second = descriptor.second_extension.unwrap();
        assert!(second.adsb_populated);
        assert!(second.adsb_available);
        assert!(!second.scn_populated);
        // the record continues after the descriptor
        assert_eq!(cursor.len(), 1);
    }

    #[test]
    fn test_target_report_truncated_extension() {
        // FX announces an extension the record no longer carries
        let bytes = hex!("41");
        let mut cursor = OctetCursor::new(&bytes);
        let descriptor =
            TargetReportDescriptor::read(&mut cursor).unwrap().unwrap();
        assert_eq!(descriptor.report.detection, DetectionType::SingleSsr);
        assert!(descriptor.extension.is_none());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_track_status() {
        let bytes = hex!("2106");
        let mut cursor = OctetCursor::new(&bytes);
        let status = TrackStatus::read(&mut cursor).unwrap().unwrap();
        assert_eq!(
            status.report.confirmation,
            TrackConfirmation::Confirmed
        );
        assert_eq!(status.report.sensor, SensorType::Psr);
        assert_eq!(status.extensions.len(), 1);
        assert_eq!(status.extensions[0].end_of_track, TrackEnd::Alive);
        assert_eq!(format!("{}", status.extensions[0].ghost), "True target");
    }

    #[test]
    fn test_track_status_chained_extensions() {
        let bytes = hex!("018140");
        let mut cursor = OctetCursor::new(&bytes);
        let status = TrackStatus::read(&mut cursor).unwrap().unwrap();
        assert_eq!(status.extensions.len(), 2);
        assert_eq!(status.extensions[0].end_of_track, TrackEnd::End);
        assert_eq!(status.extensions[1].ghost, GhostTarget::Ghost);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_plot_characteristics() {
        // SRL, SRR and SAM present
        let bytes = hex!("e02405c4");
        let mut cursor = OctetCursor::new(&bytes);
        let characteristics =
            RadarPlotCharacteristics::read(&mut cursor).unwrap().unwrap();
        assert_relative_eq!(
            characteristics.ssr_runlength.unwrap(),
            1.58203125
        );
        assert_eq!(characteristics.ssr_replies, Some(5));
        assert_eq!(characteristics.ssr_amplitude, Some(-60));
        assert!(characteristics.psr_runlength.is_none());
        assert!(characteristics.range_difference.is_none());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_plot_characteristics_truncated() {
        // announced subfields beyond the end of the record are dropped
        let bytes = hex!("e024");
        let mut cursor = OctetCursor::new(&bytes);
        let characteristics =
            RadarPlotCharacteristics::read(&mut cursor).unwrap().unwrap();
        assert!(characteristics.ssr_runlength.is_some());
        assert!(characteristics.ssr_replies.is_none());
        assert!(characteristics.ssr_amplitude.is_none());
    }
}
