
use std::collections::VecDeque;

use super::error_detection;

pub const PREAMBLE:[bool; 8] = [true, false, false, false, true, false, true, true];
pub const PAGE_BITS:usize = 300;

/// Finds 300-bit CNAV pages in a stream of decoded bits by preamble and CRC-24Q.  Once a page
/// is found, the following pages are expected back to back with the same polarity.
#[derive(Debug)]
pub struct PreambleAndCrc {
	buffer:VecDeque<bool>,
	state:State,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
	Initial,
	Valid{ is_inverse:bool },
}

fn is_page(bits:&[bool]) -> bool { bits[0..8] == PREAMBLE && error_detection::is_subframe_crc_ok(bits) }

impl Default for PreambleAndCrc {
	fn default() -> Self { Self{ buffer: VecDeque::with_capacity(PAGE_BITS), state: State::Initial } }
}

impl PreambleAndCrc {

	pub fn new() -> Self { Self::default() }

	pub fn reset(&mut self) { *self = Self::default(); }

	pub fn is_locked(&self) -> bool { self.state != State::Initial }

	/// Returns the page bits with polarity corrected and whether they came in inverted
	pub fn apply(&mut self, b:bool) -> Option<(Vec<bool>, bool)> {
		match self.state {
			State::Initial => {
				self.buffer.push_back(b);
				while self.buffer.len() > PAGE_BITS { self.buffer.pop_front(); }
				if self.buffer.len() < PAGE_BITS { return None; }

				let upright:Vec<bool> = self.buffer.iter().cloned().collect();
				if is_page(&upright) {
					self.buffer.clear();
					self.state = State::Valid{ is_inverse: false };
					return Some((upright, false));
				}

				let inverse:Vec<bool> = upright.iter().map(|x| !x).collect();
				if is_page(&inverse) {
					self.buffer.clear();
					self.state = State::Valid{ is_inverse: true };
					return Some((inverse, true));
				}
				None
			},
			State::Valid{ is_inverse } => {
				self.buffer.push_back(b ^ is_inverse);
				if self.buffer.len() < PAGE_BITS { return None; }

				let page:Vec<bool> = self.buffer.drain(..).collect();
				if is_page(&page) {
					Some((page, is_inverse))
				} else {
					// Lost the frame, so go back to searching bit by bit
					log::debug!("CNAV page failed CRC, returning to preamble search");
					self.state = State::Initial;
					None
				}
			}
		}
	}

}
