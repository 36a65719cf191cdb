
pub const CRC_24Q_POLYNOMIAL:[bool; 25] = [true, true, false, false, false, false, true, true, false, false, true, false,
	false, true, true, false, false, true, true, true, true, true, false, true, true];

pub const CRC_BITS:usize = 24;

// Polynomial long division in place; the remainder is left in the last 24 bits
fn divide(m:&mut [bool]) {
	if m.len() < CRC_24Q_POLYNOMIAL.len() { return; }
	for i in 0..(m.len() - CRC_24Q_POLYNOMIAL.len() + 1) {
		if m[i] {
			for j in 0..CRC_24Q_POLYNOMIAL.len() {
				m[i+j] ^= CRC_24Q_POLYNOMIAL[j];
			}
		}
	}
}

/// Parity bits to append to a message so the whole thing divides evenly by the CRC-24Q polynomial
pub fn crc24q(message:&[bool]) -> Vec<bool> {
	let mut m:Vec<bool> = message.to_vec();
	m.extend_from_slice(&[false; CRC_BITS]);
	divide(&mut m);
	m.split_off(message.len())
}

pub fn is_subframe_crc_ok(message_w_crc:&[bool]) -> bool {
	if message_w_crc.len() != 300 { return false; }

	let mut m:Vec<bool> = message_w_crc.to_vec();
	divide(&mut m);
	m.iter().all(|b| !b)
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn appended_crc_checks_and_single_flips_fail() {
		let mut msg:Vec<bool> = (0..276).map(|i| (i * 7) % 5 == 0).collect();
		let crc = crc24q(&msg);
		assert_eq!(crc.len(), CRC_BITS);
		msg.extend(crc);
		assert!(is_subframe_crc_ok(&msg));

		for idx in [0, 13, 150, 275, 299].iter() {
			let mut bad = msg.clone();
			bad[*idx] = !bad[*idx];
			assert!(!is_subframe_crc_ok(&bad));
		}
		assert!(!is_subframe_crc_ok(&msg[..299]));
	}

}
