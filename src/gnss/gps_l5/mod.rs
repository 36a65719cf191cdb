
use std::sync::Arc;

use crate::gnss::common::{Satellite, SatelliteBlockTable, SynchroRecord};
use crate::gnss::telemetry_decode::{Signal, TelemetryDecoder};

pub mod tlm_decode;

use self::tlm_decode::GpsL5Sync;
use self::tlm_decode::message_decode::CnavDecoder;

#[cfg(test)]
mod tests;

pub const SYMBOL_PERIOD_MS:u32 = 10;
pub const SYMBOLS_PER_BIT:usize = 2;
pub const CNAV_PAGE_BITS:usize = 300;

// Symbols the convolutional encoder needs before a bit is fully represented
pub const ENCODER_TRANSITORY_SYMBOLS:u32 = 12;

/// GPS L5 CNAV, carried on the I5 component and read from the quadrature prompt
pub struct GpsL5;

impl Signal for GpsL5 {
	type Sync = GpsL5Sync;
	type Decoder = CnavDecoder;

	const NAME:&'static str = "GPS L5 CNAV";
	const SYMBOL_PERIOD_MS:u32 = SYMBOL_PERIOD_MS;
	const SYMBOLS_PER_BIT:usize = SYMBOLS_PER_BIT;
	const PAGE_BITS:usize = CNAV_PAGE_BITS;
	const TRANSITORY_SYMBOLS:u32 = ENCODER_TRANSITORY_SYMBOLS;
	const DUMP_PREFIX:&'static str = "telemetry_L5_";

	fn symbol(record:&SynchroRecord) -> bool { record.prompt_q() > 0.0 }

	fn new_decoder(satellite:Satellite, blocks:Arc<SatelliteBlockTable>) -> CnavDecoder { CnavDecoder::new(satellite, blocks) }
}

pub type GpsL5TelemetryDecoder = TelemetryDecoder<GpsL5>;
