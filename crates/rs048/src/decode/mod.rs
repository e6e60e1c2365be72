//! Decoding of ASTERIX Category 048 data blocks.
//!
//! A data block is framed as `CAT | LEN (big-endian, 2 octets) | payload`,
//! the payload opening with an FX-chained FSPEC that announces which of the
//! 21 data items of the category follow. Items are consumed in ascending
//! FRN order from a shared cursor since each takes a data-dependent number
//! of octets. A truncated record never fails: every item past the
//! truncation point simply comes out absent.

use deku::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use self::bds::ModeSMBData;
use self::extended::{
    RadarPlotCharacteristics, TargetReportDescriptor, TrackStatus,
};
use self::geodesy::{GeodeticPosition, RadarSite};
use self::items::{
    AircraftAddress, AircraftIdentification, CalculatedPositionCartesian,
    CalculatedTrackVelocity, CommunicationsCapability, DataSourceIdentifier,
    FlightLevel, Height3D, MeasuredPositionPolar, Mode3ACode, TimeOfDay,
    TrackNumber,
};

pub mod bds;
pub mod extended;
pub mod geodesy;
pub mod items;

/// A destructive octet reader shared by all items of one record.
///
/// `take` hands out the next `count` octets, or drains the cursor when
/// fewer remain. Draining is what turns a truncated record into a clean
/// run of absent items instead of a decode error.
#[derive(Debug)]
pub struct OctetCursor<'a> {
    rest: &'a [u8],
}

impl<'a> OctetCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }

    pub fn take(&mut self, count: usize) -> Option<&'a [u8]> {
        if self.rest.len() < count {
            self.rest = &[];
            return None;
        }
        let (taken, rest) = self.rest.split_at(count);
        self.rest = rest;
        Some(taken)
    }

    pub fn len(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

/// The field specification opening each record: one presence bit per FRN.
#[derive(Debug, PartialEq, Eq)]
struct Fspec {
    items: [bool; 21],
}

impl Fspec {
    /// Consumes FSPEC octets until the first one with a cleared FX bit.
    ///
    /// Each octet carries 7 presence bits, most significant first, and an
    /// FX bit in the least significant position. Bits past FRN 21 are
    /// dropped, bits never announced stay false.
    fn read(cursor: &mut OctetCursor) -> Self {
        let mut items = [false; 21];
        let mut index = 0;
        while let Some(octet) = cursor.take(1) {
            let octet = octet[0];
            for bit in 0..7 {
                if index < items.len() {
                    items[index] = octet & (0x80 >> bit) != 0;
                    index += 1;
                }
            }
            if octet & 1 == 0 {
                break;
            }
        }
        Self { items }
    }

    fn contains(&self, frn: usize) -> bool {
        self.items[frn - 1]
    }
}

/// Splits a raw capture into record payloads.
///
/// Each record advertises its own total length; the category and length
/// octets are consumed here and not part of the returned slices. An
/// incomplete trailing record is truncated (or dropped when even its
/// header is cut short).
pub fn data_blocks(data: &[u8]) -> Vec<&[u8]> {
    let mut records = Vec::new();
    let mut rest = data;
    loop {
        let [_category, high, low, tail @ ..] = rest else {
            break;
        };
        let length = u16::from_be_bytes([*high, *low]) as usize;
        let length = length.saturating_sub(3).min(tail.len());
        let (payload, remainder) = tail.split_at(length);
        records.push(payload);
        rest = remainder;
    }
    records
}

fn read_item<'a, T: DekuContainerRead<'a>>(
    cursor: &mut OctetCursor<'a>,
    count: usize,
) -> Result<Option<T>, DekuError> {
    match cursor.take(count) {
        Some(bytes) => {
            let (_, item) = T::from_bytes((bytes, 0))?;
            Ok(Some(item))
        }
        None => Ok(None),
    }
}

/// Consumes octets chained by their least significant (FX) bit.
fn skip_extensible(cursor: &mut OctetCursor) {
    while let Some(octet) = cursor.take(1) {
        if octet[0] & 1 == 0 {
            break;
        }
    }
}

/// Consumes I048/120 without decoding it. The primary subfield flags a
/// 2-octet calculated Doppler speed (CAL) and a 7-octet raw Doppler
/// speed (RDS) before its own extension chain.
fn skip_radial_doppler(cursor: &mut OctetCursor) {
    if let Some(primary) = cursor.take(1) {
        let primary = primary[0];
        if primary & 0x80 != 0 {
            cursor.take(2);
        }
        if primary & 0x40 != 0 {
            cursor.take(7);
        }
        if primary & 0x01 != 0 {
            skip_extensible(cursor);
        }
    }
}

/// One decoded CAT048 record.
///
/// Every item is optional: either the FSPEC did not announce it, or the
/// record was truncated before it. The two derived fields at the end are
/// computed after item decoding from I048/040, I048/090 and the BDS 4,0
/// barometric pressure setting.
#[derive(Debug, PartialEq, Serialize, Clone, Default)]
pub struct Cat048 {
    #[serde(rename = "010", skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceIdentifier>,

    #[serde(rename = "140", skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,

    #[serde(rename = "020", skip_serializing_if = "Option::is_none")]
    pub target_report: Option<TargetReportDescriptor>,

    #[serde(rename = "040", skip_serializing_if = "Option::is_none")]
    pub polar_position: Option<MeasuredPositionPolar>,

    #[serde(rename = "070", skip_serializing_if = "Option::is_none")]
    pub mode_3a: Option<Mode3ACode>,

    #[serde(rename = "090", skip_serializing_if = "Option::is_none")]
    pub flight_level: Option<FlightLevel>,

    #[serde(rename = "130", skip_serializing_if = "Option::is_none")]
    pub plot_characteristics: Option<RadarPlotCharacteristics>,

    #[serde(rename = "220", skip_serializing_if = "Option::is_none")]
    pub aircraft_address: Option<AircraftAddress>,

    #[serde(rename = "240", skip_serializing_if = "Option::is_none")]
    pub aircraft_identification: Option<AircraftIdentification>,

    #[serde(rename = "250", skip_serializing_if = "Option::is_none")]
    pub mode_s_data: Option<ModeSMBData>,

    #[serde(rename = "161", skip_serializing_if = "Option::is_none")]
    pub track_number: Option<TrackNumber>,

    #[serde(rename = "042", skip_serializing_if = "Option::is_none")]
    pub cartesian_position: Option<CalculatedPositionCartesian>,

    #[serde(rename = "200", skip_serializing_if = "Option::is_none")]
    pub track_velocity: Option<CalculatedTrackVelocity>,

    #[serde(rename = "170", skip_serializing_if = "Option::is_none")]
    pub track_status: Option<TrackStatus>,

    #[serde(rename = "110", skip_serializing_if = "Option::is_none")]
    pub height_3d: Option<Height3D>,

    #[serde(rename = "230", skip_serializing_if = "Option::is_none")]
    pub communications: Option<CommunicationsCapability>,

    /// Mode C altitude in feet after the QNH correction, when one applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_altitude: Option<f64>,

    /// WGS84 position reconstructed from slant range, azimuth and altitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GeodeticPosition>,
}

impl Cat048 {
    /// Decodes one record payload, radar site defaulted to
    /// [`geodesy::DEFAULT_SITE`].
    pub fn from_record(data: &[u8]) -> Result<Self, DekuError> {
        Self::from_record_with_site(data, &geodesy::DEFAULT_SITE)
    }

    /// Decodes one record payload (FSPEC plus data items, the 3-octet
    /// block header already stripped) and derives the geodesic fields
    /// relative to the given radar site.
    pub fn from_record_with_site(
        data: &[u8],
        site: &RadarSite,
    ) -> Result<Self, DekuError> {
        let mut cursor = OctetCursor::new(data);
        let fspec = Fspec::read(&mut cursor);
        let mut record = Cat048::default();

        if fspec.contains(1) {
            record.data_source = read_item(&mut cursor, 2)?;
        }
        if fspec.contains(2) {
            record.time_of_day = read_item(&mut cursor, 3)?;
        }
        if fspec.contains(3) {
            record.target_report = TargetReportDescriptor::read(&mut cursor)?;
        }
        if fspec.contains(4) {
            record.polar_position = read_item(&mut cursor, 4)?;
        }
        if fspec.contains(5) {
            record.mode_3a = read_item(&mut cursor, 2)?;
        }
        if fspec.contains(6) {
            record.flight_level = read_item(&mut cursor, 2)?;
        }
        if fspec.contains(7) {
            record.plot_characteristics =
                RadarPlotCharacteristics::read(&mut cursor)?;
        }
        if fspec.contains(8) {
            record.aircraft_address = read_item(&mut cursor, 3)?;
        }
        if fspec.contains(9) {
            record.aircraft_identification = read_item(&mut cursor, 6)?;
        }
        if fspec.contains(10) {
            record.mode_s_data = ModeSMBData::read(&mut cursor)?;
        }
        if fspec.contains(11) {
            record.track_number = read_item(&mut cursor, 2)?;
        }
        if fspec.contains(12) {
            record.cartesian_position = read_item(&mut cursor, 4)?;
        }
        if fspec.contains(13) {
            record.track_velocity = read_item(&mut cursor, 4)?;
        }
        if fspec.contains(14) {
            record.track_status = TrackStatus::read(&mut cursor)?;
        }
        if fspec.contains(15) {
            cursor.take(4); // I048/210 track quality
        }
        if fspec.contains(16) {
            skip_extensible(&mut cursor); // I048/030 warning/error conditions
        }
        if fspec.contains(17) {
            cursor.take(2); // I048/080 mode-3/A confidence
        }
        if fspec.contains(18) {
            cursor.take(4); // I048/100 mode-C code and confidence
        }
        if fspec.contains(19) {
            record.height_3d = read_item(&mut cursor, 2)?;
        }
        if fspec.contains(20) {
            skip_radial_doppler(&mut cursor);
        }
        if fspec.contains(21) {
            record.communications = read_item(&mut cursor, 2)?;
        }

        record.correct_mode_c();
        record.derive_position(site);
        Ok(record)
    }

    /// Applies the QNH correction to the Mode C altitude.
    ///
    /// The correction only applies below flight level 60 and when the
    /// BDS 4,0 barometric pressure setting departs from the standard
    /// [1013, 1013.3] hPa band; the result is in feet, rounded to two
    /// decimal places.
    fn correct_mode_c(&mut self) {
        let Some(flight_level) = &self.flight_level else {
            return;
        };
        let qnh = self
            .mode_s_data
            .as_ref()
            .and_then(|data| data.selected_vertical_intention.as_ref())
            .map(|register| register.barometric_setting);
        let Some(qnh) = qnh else {
            return;
        };
        if flight_level.level < 60. && !(1013.0..=1013.3).contains(&qnh) {
            let corrected =
                flight_level.level * 100. + (qnh - 1013.2) * 30.;
            self.corrected_altitude = Some(libm::round(corrected * 100.) / 100.);
        }
    }

    /// Reconstructs latitude, longitude and height from the polar
    /// measurement. A missing flight level feeds a zero altitude to the
    /// elevation formula rather than giving up on the whole position.
    fn derive_position(&mut self, site: &RadarSite) {
        let Some(polar) = &self.polar_position else {
            return;
        };
        let altitude = match (&self.flight_level, self.corrected_altitude) {
            (_, Some(corrected)) => corrected * 0.3048,
            (Some(flight_level), None) => flight_level.level * 100. * 0.3048,
            (None, None) => 0.,
        };
        self.position =
            geodesy::track_position(polar.rho, polar.theta, altitude, site);
    }
}

/// Decodes a whole capture with the default radar site.
pub fn decode_stream(data: &[u8]) -> Vec<Cat048> {
    decode_stream_with_site(data, &geodesy::DEFAULT_SITE)
}

/// Decodes a whole capture, one record per data block, in input order.
///
/// Records are independent after framing so the pass fans out with
/// rayon. A record failing with a structural fault is logged and
/// skipped, the rest of the stream still decodes.
pub fn decode_stream_with_site(data: &[u8], site: &RadarSite) -> Vec<Cat048> {
    let records: Vec<Cat048> = data_blocks(data)
        .par_iter()
        .enumerate()
        .filter_map(|(index, payload)| {
            match Cat048::from_record_with_site(payload, site) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!("skipping record {}: {}", index + 1, error);
                    None
                }
            }
        })
        .collect();
    info!("decoded {} records", records.len());
    records
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use hexlit::hex;

    use super::items::{Capability, SICapability};
    use super::*;

    #[test]
    fn test_octet_cursor() {
        let data = hex!("0102030405");
        let mut cursor = OctetCursor::new(&data);
        assert_eq!(cursor.take(2), Some(&data[..2]));
        assert_eq!(cursor.len(), 3);
        // a shortfall drains everything that was left
        assert_eq!(cursor.take(4), None);
        assert!(cursor.is_empty());
        assert_eq!(cursor.take(1), None);
    }

    #[test]
    fn test_fspec_single_octet() {
        let data = hex!("f6");
        let mut cursor = OctetCursor::new(&data);
        let fspec = Fspec::read(&mut cursor);
        assert!(fspec.contains(1));
        assert!(fspec.contains(4));
        assert!(!fspec.contains(5));
        assert!(fspec.contains(7));
        // never announced, padded with false
        assert!(!fspec.contains(8));
        assert!(!fspec.contains(21));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_fspec_chained() {
        let data = hex!("ffff0a1481");
        let mut cursor = OctetCursor::new(&data);
        let fspec = Fspec::read(&mut cursor);
        for frn in 1..=14 {
            assert!(fspec.contains(frn));
        }
        assert!(!fspec.contains(15));
        assert!(!fspec.contains(18));
        assert!(fspec.contains(19));
        assert!(!fspec.contains(20));
        assert!(fspec.contains(21));
        // the cursor starts right after the last FSPEC octet
        assert_eq!(cursor.take(2), Some(&hex!("1481")[..]));
    }

    #[test]
    fn test_data_blocks() {
        let data = hex!("300006aabbcc3000051122");
        let blocks = data_blocks(&data);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], &hex!("aabbcc"));
        assert_eq!(blocks[1], &hex!("1122"));
    }

    #[test]
    fn test_data_blocks_truncated_tail() {
        // LEN announces 16 octets but the capture ends after 2
        let data = hex!("3000100102");
        let blocks = data_blocks(&data);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], &hex!("0102"));
        // a header cut short is dropped without a record
        assert!(data_blocks(&hex!("3000")).is_empty());
        assert!(data_blocks(&[]).is_empty());
    }

    const SAMPLE: [u8; 59] = hex!(
        "30003bffff0a148138a4404100c580400008040578e02405c44ca8f25054d4c72cf40185e42f30a800c2400d3bcdc00a200800c0004100006420f6"
    );

    #[test]
    fn test_full_record() {
        let blocks = data_blocks(&SAMPLE);
        assert_eq!(blocks.len(), 1);
        let record = Cat048::from_record(blocks[0]).unwrap();

        let data_source = record.data_source.unwrap();
        assert_eq!(data_source.sac, 20);
        assert_eq!(data_source.sic, 129);

        let time = record.time_of_day.unwrap();
        assert_relative_eq!(time.seconds, 29000.5);
        assert_eq!(format!("{time}"), "08:03:20.500");
        assert_eq!(time.whole_seconds(), 29001);

        let target_report = record.target_report.unwrap();
        assert_eq!(
            format!("{}", target_report.report.detection),
            "Single SSR detection"
        );
        assert!(target_report.extension.is_some());
        assert!(target_report.second_extension.is_none());

        let polar = record.polar_position.unwrap();
        assert_relative_eq!(polar.rho, 197.5);
        assert_relative_eq!(polar.theta, 90.);

        assert_eq!(record.mode_3a.unwrap().squawk, "4004");
        assert_relative_eq!(record.flight_level.unwrap().level, 350.);

        let plot = record.plot_characteristics.unwrap();
        assert_relative_eq!(plot.ssr_runlength.unwrap(), 1.58203125);
        assert_eq!(plot.ssr_replies, Some(5));
        assert_eq!(plot.ssr_amplitude, Some(-60));
        assert_eq!(plot.psr_runlength, None);

        assert_eq!(format!("{}", record.aircraft_address.unwrap()), "4CA8F2");
        assert_eq!(
            record.aircraft_identification.unwrap().callsign,
            "TEST1234"
        );

        let mode_s = record.mode_s_data.unwrap();
        assert_eq!(mode_s.registers, vec!["BDS:4,0"]);
        let intention = mode_s.selected_vertical_intention.unwrap();
        assert_eq!(intention.mcp_selected_altitude, 3008);
        assert_relative_eq!(
            intention.barometric_setting,
            1013.2,
            epsilon = 1e-6
        );

        assert_eq!(record.track_number.unwrap().number, 3387);
        let cartesian = record.cartesian_position.unwrap();
        assert_relative_eq!(cartesian.x, -100.5);
        assert_relative_eq!(cartesian.y, 20.25);

        let velocity = record.track_velocity.unwrap();
        assert_relative_eq!(velocity.groundspeed, 450.);
        assert_relative_eq!(velocity.heading, 270.);

        let track_status = record.track_status.unwrap();
        assert_eq!(
            format!("{}", track_status.report.confirmation),
            "Confirmed Track"
        );
        assert_eq!(track_status.extensions.len(), 1);

        assert_eq!(record.height_3d.unwrap().height, 2500);

        let communications = record.communications.unwrap();
        assert_eq!(communications.com, Capability::CommACommB);
        assert_eq!(communications.si, SICapability::SiCode);
        assert!(communications.mssc);
        assert_eq!(communications.b1b, 0b0110);

        // flight level 350 with a standard QNH: no Mode C correction
        assert_eq!(record.corrected_altitude, None);
        let position = record.position.unwrap();
        assert!(position.latitude > 40.9 && position.latitude < 41.4);
        assert!(position.longitude > 6.0 && position.longitude < 7.0);
        assert!(position.altitude > 10000. && position.altitude < 11500.);
    }

    #[test]
    fn test_truncated_record() {
        // FSPEC announces 010, 140, 020 and 040 but the payload stops
        // in the middle of 140
        let payload = hex!("f0148138a4");
        let record = Cat048::from_record(&payload).unwrap();
        let data_source = record.data_source.unwrap();
        assert_eq!(data_source.sac, 20);
        assert_eq!(data_source.sic, 129);
        assert_eq!(record.time_of_day, None);
        assert_eq!(record.target_report, None);
        assert_eq!(record.polar_position, None);
        assert_eq!(record.position, None);
    }

    #[test]
    fn test_skip_only_items_keep_alignment() {
        // 210, 030, 080, 100 and 120 are consumed without decoding;
        // 230 right after them must still land on the right octets
        let payload = hex!("0101f6aabbccdd03020000000000008112340020f6");
        let record = Cat048::from_record(&payload).unwrap();
        let communications = record.communications.unwrap();
        assert_eq!(communications.com, Capability::CommACommB);
        assert!(communications.aic);
        assert_eq!(record.data_source, None);
        assert_eq!(record.track_status, None);
    }

    #[test]
    fn test_position_without_flight_level() {
        // 040 present, 090 absent: the altitude defaults to zero and
        // the position is still derived, below the radar horizon
        let payload = hex!("10c5804000");
        let record = Cat048::from_record(&payload).unwrap();
        assert_eq!(record.flight_level, None);
        let position = record.position.unwrap();
        assert!(position.altitude < 100.);
        assert!(position.longitude > 2.1020588);
    }

    #[test]
    fn test_mode_c_correction() {
        // flight level 20 with QNH 995.1: the correction kicks in
        // 090 = 0x0050 (level 20), BDS 4,0 with BP field 1951
        let payload = hex!("05200050010000000f3e000040");
        let record = Cat048::from_record(&payload).unwrap();
        assert_relative_eq!(record.flight_level.unwrap().level, 20.);
        let qnh = record
            .mode_s_data
            .unwrap()
            .selected_vertical_intention
            .unwrap()
            .barometric_setting;
        assert_relative_eq!(qnh, 995.1, epsilon = 1e-6);
        let corrected = record.corrected_altitude.unwrap();
        assert_relative_eq!(corrected, 2000. + (995.1 - 1013.2) * 30., epsilon = 0.01);
    }

    #[test]
    fn test_decode_stream() {
        let mut data = SAMPLE.to_vec();
        data.extend_from_slice(&hex!("300008f0148138a4"));
        let records = decode_stream(&data);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].track_number.unwrap().number, 3387);
        assert_eq!(records[1].time_of_day, None);
    }

    #[test]
    fn test_csv_row() {
        let records = decode_stream(&SAMPLE);
        let row = crate::csv::format_row(1, &records[0]);
        let fields: Vec<&str> = row.split(';').collect();
        assert_eq!(fields.len(), 77);
        assert_eq!(fields[0], "1");
        assert_eq!(fields[1], "20");
        assert_eq!(fields[2], "129");
        assert_eq!(fields[3], "08:03:20.500");
        assert_eq!(fields[4], "29001");
        assert_eq!(fields[8], "Single SSR detection");
        assert_eq!(fields[13], "Real target report");
        assert_eq!(fields[19], "197.5");
        assert_eq!(fields[20], "90");
        assert_eq!(fields[23], "4004");
        assert_eq!(fields[26], "350");
        // no correction applies: the column stays empty
        assert_eq!(fields[27], "");
        assert_eq!(fields[28], "1.58203125 dg");
        assert_eq!(fields[30], "-60 dBm");
        assert_eq!(fields[31], "N/A");
        assert_eq!(fields[35], "4CA8F2");
        assert_eq!(fields[36], "TEST1234");
        assert_eq!(fields[37], "3008");
        assert_eq!(fields[40], "Active");
        assert_eq!(fields[43], "FCU/MCP Selected Altitude");
        assert_eq!(fields[44], "N/A");
        assert_eq!(fields[54], "3387");
        assert_eq!(fields[55], "-100.5");
        assert_eq!(fields[57], "450");
        assert_eq!(fields[58], "270");
        assert_eq!(fields[59], "Confirmed Track");
        assert_eq!(fields[64], "Track still alive");
        assert_eq!(fields[68], "2500");
        assert_eq!(fields[69], "Comm. A and Comm. B capability");
        assert_eq!(fields[72], "Yes");
        assert_eq!(fields[73], "25 ft resolution");
        assert_eq!(fields[75], "BDS 1,0 bit 16 = 1");
        assert_eq!(fields[76], "BDS 1,0 bits 37/40 = 0110");
    }
}
