
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::DigSigProcErr;
use crate::gnss::common::Satellite;

/// Per-channel telemetry decoder settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TelemetryDecoderConfig {
	pub dump:bool,
	/// Prefix of the per-channel dump file; empty selects the signal's default
	pub dump_filename:String,
	pub satellite:Satellite,
	/// Largest TOW jump [ms] accepted between consecutive pages; None means one symbol period
	pub tow_tolerance_ms:Option<u32>,
}

impl TelemetryDecoderConfig {

	pub fn for_satellite(satellite:Satellite) -> Self { Self{ satellite, ..Self::default() } }

	pub fn from_file<P: AsRef<Path>>(path:P) -> Result<Self, DigSigProcErr> {
		let file = File::open(path)?;
		serde_json::from_reader(BufReader::new(file)).map_err(|e| DigSigProcErr::Config(e.to_string()))
	}

	pub fn from_json(text:&str) -> Result<Self, DigSigProcErr> {
		serde_json::from_str(text).map_err(|e| DigSigProcErr::Config(e.to_string()))
	}

}
