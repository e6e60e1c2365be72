//! Flat semicolon-separated rendition of decoded records.
//!
//! One row per record, 77 columns, matching the layout expected by the
//! trajectory analysis tools downstream. Missing items resolve to
//! `N/A`; the Mode C corrected altitude column is left empty when no
//! correction applies.

use once_cell::sync::Lazy;

use crate::decode::Cat048;

pub const COLUMNS: [&str; 77] = [
    "NUM",
    "SAC",
    "SIC",
    "TIME",
    "TIME(s)",
    "LAT",
    "LON",
    "H",
    "TYP_020",
    "SIM_020",
    "RDP_020",
    "SPI_020",
    "RAB_020",
    "TST_020",
    "ERR_020",
    "XPP_020",
    "ME_020",
    "MI_020",
    "FOE_FRI_020",
    "RHO",
    "THETA",
    "V_070",
    "G_070",
    "MODE 3/A",
    "V_090",
    "G_090",
    "FL",
    "MODE C Corrected Altitude",
    "SRL_130",
    "SSR_130",
    "SAM_130",
    "PRL_130",
    "PAM_130",
    "RPD_130",
    "APD_130",
    "TA",
    "TI",
    "MCP_ALT",
    "FMS_ALT",
    "BP",
    "VNAV",
    "ALT_HOLD",
    "APP",
    "TARGET_ALT_SOURCE",
    "RA",
    "TTA",
    "GS",
    "TAR",
    "TAS",
    "HDG",
    "IAS",
    "MACH",
    "BAR",
    "IVV",
    "TN",
    "X",
    "Y",
    "GS_KT",
    "HEADING",
    "CNF_170",
    "RAD_170",
    "DOU_170",
    "MAH_170",
    "CDM_170",
    "TRE_170",
    "GHO_170",
    "SUP_170",
    "TCC_170",
    "HEIGHT",
    "COM_230",
    "STAT_230",
    "SI_230",
    "MSCC_230",
    "ARC_230",
    "AIC_230",
    "B1A_230",
    "B1B_230",
];

/// The semicolon-separated header line
pub static HEADER: Lazy<String> = Lazy::new(|| COLUMNS.join(";"));

const NA: &str = "N/A";

fn na(fields: &mut Vec<String>, count: usize) {
    for _ in 0..count {
        fields.push(NA.to_string());
    }
}

/// Formats one record as a semicolon-separated row.
///
/// `num` is the 1-based index of the record in its stream.
pub fn format_row(num: usize, record: &Cat048) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(COLUMNS.len());
    fields.push(num.to_string());

    match &record.data_source {
        Some(item) => {
            fields.push(item.sac.to_string());
            fields.push(item.sic.to_string());
        }
        None => na(&mut fields, 2),
    }

    match &record.time_of_day {
        Some(item) => {
            fields.push(item.to_string());
            fields.push(item.whole_seconds().to_string());
        }
        None => na(&mut fields, 2),
    }

    match &record.position {
        Some(position) => {
            fields.push(position.latitude.to_string());
            fields.push(position.longitude.to_string());
            fields.push(position.altitude.to_string());
        }
        None => na(&mut fields, 3),
    }

    match &record.target_report {
        Some(item) => {
            fields.push(item.report.detection.to_string());
            fields.push(item.report.simulated.to_string());
            fields.push(item.report.rdp.to_string());
            fields.push(item.report.spi.to_string());
            fields.push(item.report.source.to_string());
            match &item.extension {
                Some(extension) => {
                    fields.push(extension.test_target.to_string());
                    fields.push(extension.extended_range.to_string());
                    fields.push(extension.xpulse.to_string());
                    fields.push(extension.military_emergency.to_string());
                    fields
                        .push(extension.military_identification.to_string());
                    fields.push(extension.mode4.to_string());
                }
                None => na(&mut fields, 6),
            }
        }
        None => na(&mut fields, 11),
    }

    match &record.polar_position {
        Some(item) => {
            fields.push(item.rho.to_string());
            fields.push(item.theta.to_string());
        }
        None => na(&mut fields, 2),
    }

    match &record.mode_3a {
        Some(item) => {
            fields.push(item.validation.to_string());
            fields.push(item.garbled.to_string());
            fields.push(item.squawk.clone());
        }
        None => na(&mut fields, 3),
    }

    match &record.flight_level {
        Some(item) => {
            fields.push(item.validation.to_string());
            fields.push(item.garbled.to_string());
            fields.push(item.level.to_string());
        }
        None => na(&mut fields, 3),
    }

    // empty, not N/A, when no correction applies
    fields.push(match record.corrected_altitude {
        Some(value) => value.to_string(),
        None => String::new(),
    });

    match &record.plot_characteristics {
        Some(item) => {
            fields.push(match item.ssr_runlength {
                Some(value) => format!("{value} dg"),
                None => NA.to_string(),
            });
            fields.push(match item.ssr_replies {
                Some(value) => value.to_string(),
                None => NA.to_string(),
            });
            fields.push(match item.ssr_amplitude {
                Some(value) => format!("{value} dBm"),
                None => NA.to_string(),
            });
            fields.push(match item.psr_runlength {
                Some(value) => format!("{value} dg"),
                None => NA.to_string(),
            });
            fields.push(match item.psr_amplitude {
                Some(value) => format!("{value} dBm"),
                None => NA.to_string(),
            });
            fields.push(match item.range_difference {
                Some(value) => format!("{value} NM"),
                None => NA.to_string(),
            });
            fields.push(match item.azimuth_difference {
                Some(value) => format!("{value} dg"),
                None => NA.to_string(),
            });
        }
        None => na(&mut fields, 7),
    }

    match &record.aircraft_address {
        Some(item) => fields.push(item.to_string()),
        None => na(&mut fields, 1),
    }

    match &record.aircraft_identification {
        Some(item) => fields.push(item.callsign.clone()),
        None => na(&mut fields, 1),
    }

    let registers = record.mode_s_data.as_ref();
    match registers.and_then(|item| item.selected_vertical_intention.as_ref())
    {
        Some(register) => {
            fields.push(register.mcp_selected_altitude.to_string());
            fields.push(register.fms_selected_altitude.to_string());
            fields.push(register.barometric_setting.to_string());
            fields.push(register.vnav_mode.to_string());
            fields.push(register.alt_hold_mode.to_string());
            fields.push(register.approach_mode.to_string());
            fields.push(register.altitude_source.to_string());
        }
        None => na(&mut fields, 7),
    }
    match registers.and_then(|item| item.track_and_turn.as_ref()) {
        Some(register) => {
            fields.push(register.roll_angle.to_string());
            fields.push(register.track_angle.to_string());
            fields.push(register.groundspeed.to_string());
            fields.push(register.track_rate.to_string());
            fields.push(register.true_airspeed.to_string());
        }
        None => na(&mut fields, 5),
    }
    match registers.and_then(|item| item.heading_and_speed.as_ref()) {
        Some(register) => {
            fields.push(register.magnetic_heading.to_string());
            fields.push(register.indicated_airspeed.to_string());
            fields.push(register.mach_number.to_string());
            fields.push(register.barometric_altitude_rate.to_string());
            fields.push(register.inertial_vertical_velocity.to_string());
        }
        None => na(&mut fields, 5),
    }

    match &record.track_number {
        Some(item) => fields.push(item.number.to_string()),
        None => na(&mut fields, 1),
    }

    match &record.cartesian_position {
        Some(item) => {
            fields.push(item.x.to_string());
            fields.push(item.y.to_string());
        }
        None => na(&mut fields, 2),
    }

    match &record.track_velocity {
        Some(item) => {
            fields.push(item.groundspeed.to_string());
            fields.push(item.heading.to_string());
        }
        None => na(&mut fields, 2),
    }

    match &record.track_status {
        Some(item) => {
            fields.push(item.report.confirmation.to_string());
            fields.push(item.report.sensor.to_string());
            fields.push(item.report.confidence.to_string());
            fields.push(item.report.maneuver.to_string());
            fields.push(item.report.climb_descent.to_string());
            if item.extensions.is_empty() {
                na(&mut fields, 4);
            } else {
                let join = |values: Vec<String>| values.join(", ");
                fields.push(join(
                    item.extensions
                        .iter()
                        .map(|e| e.end_of_track.to_string())
                        .collect(),
                ));
                fields.push(join(
                    item.extensions
                        .iter()
                        .map(|e| e.ghost.to_string())
                        .collect(),
                ));
                fields.push(join(
                    item.extensions
                        .iter()
                        .map(|e| e.neighbour.to_string())
                        .collect(),
                ));
                fields.push(join(
                    item.extensions
                        .iter()
                        .map(|e| e.slant_correction.to_string())
                        .collect(),
                ));
            }
        }
        None => na(&mut fields, 9),
    }

    match &record.height_3d {
        Some(item) => fields.push(item.height.to_string()),
        None => na(&mut fields, 1),
    }

    match &record.communications {
        Some(item) => {
            fields.push(item.com.to_string());
            fields.push(item.status.to_string());
            fields.push(item.si.to_string());
            fields.push(if item.mssc { "Yes" } else { "No" }.to_string());
            fields.push(item.altitude_reporting.to_string());
            fields.push(if item.aic { "Yes" } else { "No" }.to_string());
            fields.push(format!("BDS 1,0 bit 16 = {}", item.b1a as u8));
            fields.push(format!("BDS 1,0 bits 37/40 = {:04b}", item.b1b));
        }
        None => na(&mut fields, 8),
    }

    fields.join(";")
}

/// Formats a whole stream of records, header line included.
pub fn to_table(records: &[Cat048]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(HEADER.clone());
    for (index, record) in records.iter().enumerate() {
        lines.push(format_row(index + 1, record));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        assert_eq!(COLUMNS.len(), 77);
        assert!(HEADER.starts_with("NUM;SAC;SIC;TIME;TIME(s);LAT;LON;H;"));
        assert!(HEADER.ends_with("AIC_230;B1A_230;B1B_230"));
        assert_eq!(HEADER.split(';').count(), 77);
    }

    #[test]
    fn test_empty_record() {
        let row = format_row(4, &Cat048::default());
        let fields: Vec<&str> = row.split(';').collect();
        assert_eq!(fields.len(), 77);
        assert_eq!(fields[0], "4");
        assert_eq!(fields[1], "N/A");
        // the Mode C corrected altitude column stays empty
        assert_eq!(fields[27], "");
        assert_eq!(fields[76], "N/A");
    }

    #[test]
    fn test_na_cascade_keeps_shape() {
        let records = vec![Cat048::default(), Cat048::default()];
        let table = to_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert_eq!(line.split(';').count(), 77);
        }
    }
}
