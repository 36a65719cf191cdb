
use num_complex::Complex;
use serde::{Serialize, Deserialize};

use super::GnssSystem;

/// One record per tracked channel per symbol.  Filled in by tracking, then stamped with the
/// time of week by the telemetry decoder before it moves on to observables and PVT.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct SynchroRecord {
	pub channel_id:i32,
	pub system:GnssSystem,
	pub prn:u32,

	// Tracking
	pub prompt:Complex<f64>,
	pub carrier_phase_rads:f64,
	pub carrier_doppler_hz:f64,
	pub tracking_sample_counter:u64,
	pub flag_valid_symbol_output:bool,

	// Telemetry
	pub tow_at_current_symbol_ms:u32,
	pub flag_valid_word:bool,

	// Observables
	pub pseudorange_m:f64,
	pub rx_time:f64,
	pub flag_valid_pseudorange:bool,
}

impl SynchroRecord {

	pub fn prompt_i(&self) -> f64 { self.prompt.re }
	pub fn prompt_q(&self) -> f64 { self.prompt.im }

}
