#![doc = include_str!("../readme.md")]
pub mod csv;
pub mod decode;

pub mod prelude {
    /// This re-export is necessary to decode messages
    pub use deku::prelude::*;

    pub use crate::csv::{format_row, to_table, HEADER};
    pub use crate::decode::bds::bds40::SelectedVerticalIntention;
    pub use crate::decode::bds::bds50::TrackAndTurnReport;
    pub use crate::decode::bds::bds60::HeadingAndSpeedReport;
    pub use crate::decode::geodesy::{GeodeticPosition, RadarSite};
    /// The root structure to decode records
    pub use crate::decode::Cat048;
    pub use crate::decode::{data_blocks, decode_stream, decode_stream_with_site};
}
