
use std::collections::VecDeque;

use crate::utils::bools_to_int;
use crate::gnss::telemetry_decode::{FrameSync, SyncedPage};

use super::{PREAMBLE, SUBFRAME_SIZE_W_PARITY_BITS as SUBFRAME_BITS, WORD_BITS};

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
	Searching,
	Locked{ inverse_sense:bool },
}

/// LNAV subframe synchronizer.  While searching, every 300-bit window that starts with the
/// preamble in either polarity and passes parity on all ten words is a candidate.  Once
/// locked, subframes are taken back to back until one fails.
#[derive(Debug)]
pub struct LnavSync {
	buffer:VecDeque<bool>,
	state:State,
}

impl Default for LnavSync {
	fn default() -> Self { Self{ buffer: VecDeque::with_capacity(SUBFRAME_BITS), state: State::Searching } }
}

// TOW count of the next subframe from the HOW, undoing the D30* complementing of word 2
fn how_tow(bits:&[bool]) -> Option<u32> {
	let d30:bool = bits[WORD_BITS - 1];
	let tow_bits:Vec<bool> = bits[30..47].iter().map(|b| b ^ d30).collect();
	bools_to_int::to_u32(&tow_bits).ok()
}

// Page bits with polarity corrected if the window holds a whole valid subframe
fn valid_subframe(window:&[bool], inverse_sense:bool) -> Option<Vec<bool>> {
	let bits:Vec<bool> = window.iter().map(|b| b ^ inverse_sense).collect();
	if bits[0..8] == PREAMBLE && super::data_recover(&bits).is_ok() { Some(bits) } else { None }
}

impl LnavSync {

	pub fn new() -> Self { Self::default() }

	pub fn is_locked(&self) -> bool { self.state != State::Searching }

	fn page(&self, bits:Vec<bool>, inverted:bool) -> Option<SyncedPage> {
		let tow = how_tow(&bits)?;
		Some(SyncedPage{ bits, tow, delay: 0, inverted })
	}

}

impl FrameSync for LnavSync {

	fn add_symbol(&mut self, symbol:bool) -> Option<SyncedPage> {
		self.buffer.push_back(symbol);
		match self.state {
			State::Searching => {
				while self.buffer.len() > SUBFRAME_BITS { self.buffer.pop_front(); }
				if self.buffer.len() < SUBFRAME_BITS { return None; }

				let window:Vec<bool> = self.buffer.iter().cloned().collect();
				for inverse_sense in [false, true].iter() {
					if let Some(bits) = valid_subframe(&window, *inverse_sense) {
						self.buffer.clear();
						self.state = State::Locked{ inverse_sense: *inverse_sense };
						return self.page(bits, *inverse_sense);
					}
				}
				None
			},
			State::Locked{ inverse_sense } => {
				if self.buffer.len() < SUBFRAME_BITS { return None; }

				let window:Vec<bool> = self.buffer.drain(..).collect();
				match valid_subframe(&window, inverse_sense) {
					Some(bits) => self.page(bits, inverse_sense),
					None => {
						log::debug!("LNAV subframe failed preamble or parity, returning to search");
						self.state = State::Searching;
						self.buffer.extend(window.into_iter().skip(1));
						None
					}
				}
			}
		}
	}

	fn reset(&mut self) { *self = Self::default(); }

}
