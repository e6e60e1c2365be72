#![doc = include_str!("../readme.md")]

use std::fs;
use std::io::Write;

use clap::Parser;
use rs048::prelude::*;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "decode048",
    version,
    about = "Decode ASTERIX Category 048 radar messages to JSON or CSV"
)]
struct Options {
    /// Binary capture file to decode as a CSV table
    #[arg(long, short, default_value = None)]
    input: Option<String>,

    /// Output file instead of stdout
    #[arg(long, short, default_value = None)]
    output: Option<String>,

    /// Radar site for position reconstruction
    ///  (e.g. --site 41.3007023,2.1020588,27.257 for latitude,
    ///   longitude in degrees and height in meters)
    #[arg(long, default_value = None)]
    site: Option<RadarSite>,

    /// Individual hex-encoded messages to decode
    msgs: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = Options::parse();
    let site = options.site.unwrap_or_default();

    if !options.msgs.is_empty() {
        let mut file = match &options.output {
            Some(path) => Some(
                fs::OpenOptions::new().append(true).create(true).open(path)?,
            ),
            None => None,
        };
        for msg in options.msgs {
            let bytes = hex::decode(&msg)?;
            for payload in data_blocks(&bytes) {
                let record = Cat048::from_record_with_site(payload, &site)?;
                let json = serde_json::to_string(&record)?;
                if let Some(file) = &mut file {
                    writeln!(file, "{}", json)?;
                } else {
                    println!("{}", json);
                }
            }
        }
        return Ok(());
    }

    if let Some(input_path) = options.input {
        let bytes = fs::read(&input_path)?;
        let records = decode_stream_with_site(&bytes, &site);
        let table = to_table(&records);
        match options.output {
            Some(output_path) => {
                fs::write(&output_path, table + "\n")?;
                info!("{} rows written to {}", records.len(), output_path);
            }
            None => println!("{}", table),
        }
    }
    Ok(())
}
