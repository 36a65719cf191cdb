
// Rate 1/2, constraint length 7 convolutional code of IS-GPS-705, section 3.3.3.1.1

pub const NUM_STATES:usize = 64;

// Bits decided this many bits after they enter the decoder
pub const TRACEBACK_DEPTH:usize = 64;

// The register holds the newest bit in bit 6 and the oldest in bit 0
fn cnav_fec(x:u8) -> (bool, bool) {

	let bit6:bool = (x & 0x40) != 0;
	let bit5:bool = (x & 0x20) != 0;
	let bit4:bool = (x & 0x10) != 0;
	let bit3:bool = (x & 0x08) != 0;

	// Both G1 and G2 skip bit2

	let bit1:bool = (x & 0x02) != 0;
	let bit0:bool = (x & 0x01) != 0;

	let g1:bool = bit6 ^ bit5 ^ bit4 ^ bit3 ^        bit0;
	let g2:bool = bit6 ^        bit4 ^ bit3 ^ bit1 ^ bit0;

	(g1, g2)

}

/// Encodes message bits into G1, G2 symbol pairs
#[derive(Debug, Clone, Default)]
pub struct ConvolutionalEncoder {
	register:u8,
}

impl ConvolutionalEncoder {

	pub fn new() -> Self { Self::default() }

	pub fn encode_bit(&mut self, b:bool) -> (bool, bool) {
		self.register = (self.register >> 1) | if b { 0x40 } else { 0x00 };
		cnav_fec(self.register)
	}

	pub fn encode(&mut self, bits:&[bool]) -> Vec<bool> {
		bits.iter().flat_map(|b| { let (g1, g2) = self.encode_bit(*b); vec![g1, g2] }).collect()
	}

}

/// Hard-decision Viterbi decoder using register exchange.  Each state is the six most recent
/// bits, newest in bit 5, and owns the last TRACEBACK_DEPTH decisions leading to it.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
	metrics:[u32; NUM_STATES],
	paths:[u64; NUM_STATES],
	bits_in:usize,
}

impl Default for ViterbiDecoder {
	fn default() -> Self { Self{ metrics: [0; NUM_STATES], paths: [0; NUM_STATES], bits_in: 0 } }
}

impl ViterbiDecoder {

	pub fn new() -> Self { Self::default() }

	pub fn reset(&mut self) { *self = Self::default(); }

	/// Consumes one symbol pair and returns the bit decided TRACEBACK_DEPTH-1 bits ago, once there is one
	pub fn decode_pair(&mut self, g1:bool, g2:bool) -> Option<bool> {
		let mut new_metrics = [u32::MAX; NUM_STATES];
		let mut new_paths   = [0_u64; NUM_STATES];

		for ns in 0..NUM_STATES {
			let b:bool = (ns >> 5) & 1 == 1;
			for x in 0..2 {
				let s:usize = ((ns & 0x1F) << 1) | x;
				let (e1, e2) = cnav_fec(((b as u8) << 6) | (s as u8));
				let m:u32 = self.metrics[s] + ((e1 != g1) as u32) + ((e2 != g2) as u32);
				if m < new_metrics[ns] {
					new_metrics[ns] = m;
					new_paths[ns] = (self.paths[s] << 1) | (b as u64);
				}
			}
		}

		// Keep the metrics bounded
		let (best, min_metric) = new_metrics.iter().enumerate()
			.fold((0, u32::MAX), |(bi, bm), (i, m)| if *m < bm { (i, *m) } else { (bi, bm) });
		for m in new_metrics.iter_mut() { *m -= min_metric; }

		self.metrics = new_metrics;
		self.paths = new_paths;
		self.bits_in += 1;

		if self.bits_in >= TRACEBACK_DEPTH { Some((self.paths[best] >> (TRACEBACK_DEPTH - 1)) & 1 == 1) }
		else                               { None }
	}

	pub fn decode(&mut self, symbols:&[bool]) -> Vec<bool> {
		symbols.chunks_exact(2).filter_map(|pair| self.decode_pair(pair[0], pair[1])).collect()
	}

}

#[cfg(test)]
mod tests {

	use rand::{Rng, SeedableRng};
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn generator_polynomials() {
		// An impulse reads the taps of G1 = 171 and G2 = 133 (octal) out newest first
		let mut enc = ConvolutionalEncoder::new();
		let mut impulse = vec![true];
		impulse.extend(vec![false; 6]);
		let symbols = enc.encode(&impulse);
		let g1:Vec<bool> = symbols.iter().step_by(2).cloned().collect();
		let g2:Vec<bool> = symbols.iter().skip(1).step_by(2).cloned().collect();
		assert_eq!(g1, vec![true, true, true, true, false, false, true]);
		assert_eq!(g2, vec![true, false, true, true, false, true, true]);
	}

	#[test]
	fn corrects_sparse_symbol_errors() {
		let mut rng = StdRng::seed_from_u64(705);
		let bits:Vec<bool> = (0..500).map(|_| rng.gen()).collect();
		let mut symbols = ConvolutionalEncoder::new().encode(&bits);
		for idx in (50..symbols.len()).step_by(37) { symbols[idx] = !symbols[idx]; }

		let decoded = ViterbiDecoder::new().decode(&symbols);
		assert_eq!(decoded.len(), bits.len() - (TRACEBACK_DEPTH - 1));
		assert_eq!(&decoded[..], &bits[..decoded.len()]);
	}

	#[test]
	fn inverted_symbols_decode_to_inverted_bits() {
		let mut rng = StdRng::seed_from_u64(5);
		let mut bits:Vec<bool> = vec![false; 6];
		bits.extend((0..200).map(|_| rng.gen::<bool>()));
		let symbols:Vec<bool> = ConvolutionalEncoder::new().encode(&bits).iter().map(|s| !s).collect();

		let decoded = ViterbiDecoder::new().decode(&symbols);
		for (d, b) in decoded.iter().zip(bits.iter()).skip(6) { assert_eq!(*d, !*b); }
	}

}
