
use crate::utils::bools_to_int;
use crate::gnss::telemetry_decode::{FrameSync, SyncedPage};

use super::ENCODER_TRANSITORY_SYMBOLS;

pub mod error_correction;
pub mod error_detection;
pub mod preamble_and_crc;
pub mod message_decode;

use self::error_correction::{ViterbiDecoder, TRACEBACK_DEPTH};
use self::preamble_and_crc::PreambleAndCrc;

// Symbols between the end of a page and the moment its last bit leaves the Viterbi decoder
pub const DECODER_DELAY_SYMBOLS:u32 = 2 * (TRACEBACK_DEPTH as u32 - 1);

// One symbol-pair alignment of the stream
#[derive(Debug, Default)]
struct Part {
	viterbi:ViterbiDecoder,
	frames:PreambleAndCrc,
	first:Option<bool>,
	skip:usize,
}

impl Part {

	fn offset_by(skip:usize) -> Self { Self{ skip, ..Self::default() } }

	fn add_symbol(&mut self, symbol:bool) -> Option<(Vec<bool>, bool)> {
		if self.skip > 0 {
			self.skip -= 1;
			return None;
		}
		match self.first.take() {
			None     => { self.first = Some(symbol); None },
			Some(g1) => {
				let bit = self.viterbi.decode_pair(g1, symbol)?;
				self.frames.apply(bit)
			}
		}
	}

}

/// CNAV symbol synchronizer.  Symbol pairing is unknown, so both alignments are decoded in
/// parallel and whichever one finds a page first reports it.
#[derive(Debug)]
pub struct GpsL5Sync {
	parts:[Part; 2],
}

impl Default for GpsL5Sync {
	fn default() -> Self { Self{ parts: [Part::offset_by(0), Part::offset_by(1)] } }
}

impl GpsL5Sync {

	pub fn is_locked(&self) -> bool { self.parts.iter().any(|p| p.frames.is_locked()) }

}

impl FrameSync for GpsL5Sync {

	fn add_symbol(&mut self, symbol:bool) -> Option<SyncedPage> {
		let mut ans:Option<SyncedPage> = None;
		for part in self.parts.iter_mut() {
			if let Some((bits, inverted)) = part.add_symbol(symbol) {
				if ans.is_some() { continue; }
				match bools_to_int::to_u32(&bits[20..37]) {
					Ok(tow) => ans = Some(SyncedPage{ bits, tow, delay: DECODER_DELAY_SYMBOLS - ENCODER_TRANSITORY_SYMBOLS, inverted }),
					Err(e)  => log::debug!("Unable to read CNAV TOW count: {}", e),
				}
			}
		}
		ans
	}

	fn reset(&mut self) { *self = Self::default(); }

}
