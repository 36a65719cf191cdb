
#![allow(non_snake_case)]

use crate::DigSigProcErr;

/*	GPS L1 C/A Telemetry Decoding Pipeline:
	- Preamble detector (frame sync on preamble and word parity)
	- Parity check and data recovery
	- Subframe decode
*/

pub const SUBFRAME_SIZE_W_PARITY_BITS:usize = 300;
pub const SUBFRAME_SIZE_DATA_ONLY_BITS:usize = 240;
pub const WORD_BITS:usize = 30;
pub const WORD_DATA_BITS:usize = 24;

pub const PREAMBLE:[bool; 8] = [true, false, false, false, true, false, true, true];

pub mod preamble_detector;
pub mod subframe;

pub use self::preamble_detector::LnavSync;
pub use self::subframe::LnavDecoder;

/// Parity bits D25 through D30 of one word from its source data bits d1 through d24 and the
/// last two bits of the previous word, IS-GPS-200K Table 20-XIV
pub fn parity_bits(d:&[bool], last_D29:bool, last_D30:bool) -> [bool; 6] {
	[
		last_D29 ^ d[0] ^ d[1] ^ d[2] ^ d[4] ^ d[5] ^ d[9]  ^ d[10] ^ d[11] ^ d[12] ^ d[13] ^ d[16] ^ d[17] ^ d[19] ^ d[22],
		last_D30 ^ d[1] ^ d[2] ^ d[3] ^ d[5] ^ d[6] ^ d[10] ^ d[11] ^ d[12] ^ d[13] ^ d[14] ^ d[17] ^ d[18] ^ d[20] ^ d[23],
		last_D29 ^ d[0] ^ d[2] ^ d[3] ^ d[4] ^ d[6] ^ d[7]  ^ d[11] ^ d[12] ^ d[13] ^ d[14] ^ d[15] ^ d[18] ^ d[19] ^ d[21],
		last_D30 ^ d[1] ^ d[3] ^ d[4] ^ d[5] ^ d[7] ^ d[8]  ^ d[12] ^ d[13] ^ d[14] ^ d[15] ^ d[16] ^ d[19] ^ d[20] ^ d[22],
		last_D30 ^ d[0] ^ d[2] ^ d[4] ^ d[5] ^ d[6] ^ d[8]  ^ d[9]  ^ d[13] ^ d[14] ^ d[15] ^ d[16] ^ d[17] ^ d[20] ^ d[21] ^ d[23],
		last_D29 ^ d[2] ^ d[4] ^ d[5] ^ d[7] ^ d[8] ^ d[9]  ^ d[10] ^ d[12] ^ d[14] ^ d[18] ^ d[21] ^ d[22] ^ d[23],
	]
}

/// Checks one received 30-bit word against the last two bits of the previous word
pub fn parity_check(word:&[bool], last_D29:bool, last_D30:bool) -> bool {
	if word.len() != WORD_BITS { return false; }

	let d:Vec<bool> = word.iter().take(WORD_DATA_BITS).map(|b| b ^ last_D30).collect();
	word[WORD_DATA_BITS..] == parity_bits(&d, last_D29, last_D30)
}

/// Validates the parity of all ten words of a subframe and strips it, undoing the D30*
/// complementing of the data bits.  Word 1 is checked assuming D29* = D30* = 0.
pub fn data_recover(subframe:&[bool]) -> Result<[bool; SUBFRAME_SIZE_DATA_ONLY_BITS], DigSigProcErr> {
	if subframe.len() != SUBFRAME_SIZE_W_PARITY_BITS {
		return Err(DigSigProcErr::InvalidTelemetryData("Expected a 300-bit LNAV subframe in data_recover"));
	}

	let mut ans:[bool; SUBFRAME_SIZE_DATA_ONLY_BITS] = [false; SUBFRAME_SIZE_DATA_ONLY_BITS];
	let mut last:(bool, bool) = (false, false);
	for (word_idx, word) in subframe.chunks(WORD_BITS).enumerate() {
		if !parity_check(word, last.0, last.1) {
			return Err(DigSigProcErr::InvalidTelemetryData("LNAV word failed parity check"));
		}
		for bit_idx in 0..WORD_DATA_BITS { ans[(WORD_DATA_BITS*word_idx)+bit_idx] = word[bit_idx] ^ last.1; }
		last = (word[28], word[29]);
	}

	Ok(ans)
}

/// Encodes 24 source data bits into a 30-bit word as it would be transmitted
pub fn encode_word(d:&[bool], last_D29:bool, last_D30:bool) -> Vec<bool> {
	let mut word:Vec<bool> = d.iter().take(WORD_DATA_BITS).map(|b| b ^ last_D30).collect();
	word.extend_from_slice(&parity_bits(d, last_D29, last_D30));
	word
}

/// Encodes a 240-bit subframe into its 300 transmitted bits.  The last two data bits of words
/// 2 and 10 are overwritten with the values that force D29 = D30 = 0 on those words, so that
/// each subframe starts from a known parity state.
pub fn encode_subframe(data:&[bool]) -> Result<Vec<bool>, DigSigProcErr> {
	if data.len() != SUBFRAME_SIZE_DATA_ONLY_BITS {
		return Err(DigSigProcErr::InvalidTelemetryData("Expected 240 data bits in encode_subframe"));
	}

	let mut ans:Vec<bool> = Vec::with_capacity(SUBFRAME_SIZE_W_PARITY_BITS);
	let mut last:(bool, bool) = (false, false);
	for (word_idx, chunk) in data.chunks(WORD_DATA_BITS).enumerate() {
		let mut d:Vec<bool> = chunk.to_vec();
		if word_idx == 1 || word_idx == 9 {
			// d24 enters D29, then d23 only enters D30
			d[22] = false;
			d[23] = false;
			d[23] = parity_bits(&d, last.0, last.1)[4];
			d[22] = parity_bits(&d, last.0, last.1)[5];
		}
		let word = encode_word(&d, last.0, last.1);
		last = (word[28], word[29]);
		ans.extend(word);
	}

	Ok(ans)
}

#[cfg(test)]
mod tests {

	use rand::{Rng, SeedableRng};
	use rand::rngs::StdRng;

	use super::*;

	fn random_data(rng:&mut StdRng) -> Vec<bool> { (0..SUBFRAME_SIZE_DATA_ONLY_BITS).map(|_| rng.gen()).collect() }

	#[test]
	fn encoded_subframes_pass_parity() {
		let mut rng = StdRng::seed_from_u64(9);
		for _ in 0..50 {
			let data = random_data(&mut rng);
			let encoded = encode_subframe(&data).unwrap();
			assert_eq!(encoded.len(), SUBFRAME_SIZE_W_PARITY_BITS);
			assert!(!encoded[58] && !encoded[59]);
			assert!(!encoded[298] && !encoded[299]);

			let recovered = data_recover(&encoded).unwrap();
			// Everything but the solved bits comes back
			for idx in (0..SUBFRAME_SIZE_DATA_ONLY_BITS).filter(|i| ![46, 47, 238, 239].contains(i)) {
				assert_eq!(recovered[idx], data[idx]);
			}
		}
	}

	#[test]
	fn single_bit_errors_fail_parity() {
		let mut rng = StdRng::seed_from_u64(10);
		let encoded = encode_subframe(&random_data(&mut rng)).unwrap();
		for idx in 0..SUBFRAME_SIZE_W_PARITY_BITS {
			let mut corrupted = encoded.clone();
			corrupted[idx] = !corrupted[idx];
			assert!(data_recover(&corrupted).is_err(), "bit {} flip not detected", idx);
		}
	}

	#[test]
	fn complemented_words_pass_with_complemented_history() {
		let mut rng = StdRng::seed_from_u64(11);
		let d:Vec<bool> = (0..WORD_DATA_BITS).map(|_| rng.gen()).collect();
		let word = encode_word(&d, true, true);
		assert!(parity_check(&word, true, true));
		assert!(!parity_check(&word, false, false));
		assert!(!parity_check(&word[0..29], true, true));
	}

}
