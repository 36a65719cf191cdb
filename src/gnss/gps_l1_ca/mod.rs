
use std::sync::Arc;

use crate::gnss::common::{Satellite, SatelliteBlockTable, SynchroRecord};
use crate::gnss::telemetry_decode::{Signal, TelemetryDecoder};

pub mod telemetry_decode;

use self::telemetry_decode::{LnavDecoder, LnavSync, SUBFRAME_SIZE_W_PARITY_BITS};


pub const BIT_PERIOD_MS:u32 = 20;

/// GPS L1 C/A LNAV.  Symbols are uncoded bits read from the in-phase prompt.
pub struct GpsL1Ca;

impl Signal for GpsL1Ca {
	type Sync = LnavSync;
	type Decoder = LnavDecoder;

	const NAME:&'static str = "GPS L1 C/A";
	const SYMBOL_PERIOD_MS:u32 = BIT_PERIOD_MS;
	const SYMBOLS_PER_BIT:usize = 1;
	const PAGE_BITS:usize = SUBFRAME_SIZE_W_PARITY_BITS;
	const TRANSITORY_SYMBOLS:u32 = 0;
	const DUMP_PREFIX:&'static str = "telemetry_L1CA_";

	fn symbol(record:&SynchroRecord) -> bool { record.prompt_i() > 0.0 }

	fn new_decoder(satellite:Satellite, blocks:Arc<SatelliteBlockTable>) -> LnavDecoder { LnavDecoder::new(satellite, blocks) }
}

pub type GpsL1CaTelemetryDecoder = TelemetryDecoder<GpsL1Ca>;
