
use serde::{Serialize, Deserialize};

const SECONDS_PER_WEEK:f64 = 604800.0;
const SECONDS_PER_DAY:f64 = 86400.0;

/// GPS to UTC conversion parameters.  Week numbers are kept as broadcast, truncated to
/// `week_bits` bits (8 for LNAV, 13 for CNAV).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct UtcModel {
	pub a0:f64,					// [sec]
	pub a1:f64,					// [sec/sec]
	pub a2:f64,					// [sec/sec^2]
	pub delta_t_ls:i32,			// [sec]
	pub t_ot:u32,				// [sec]
	pub wn_t:u32,
	pub wn_lsf:u32,
	pub dn:u32,					// [day] 1 through 7
	pub delta_t_lsf:i32,		// [sec]
	pub week_bits:u32,
}

impl UtcModel {

	// Signed number of weeks from a truncated broadcast week to the full week number
	fn weeks_since(&self, broadcast:u32, week:u32) -> f64 {
		if self.week_bits == 0 || self.week_bits >= 32 { return (week as f64) - (broadcast as f64); }
		let modulus:i64 = 1 << self.week_bits;
		let diff:i64 = ((week as i64) - (broadcast as i64)).rem_euclid(modulus);
		(if diff >= modulus/2 { diff - modulus } else { diff }) as f64
	}

	/// GPS minus UTC [sec] at GPS time of week tow [sec] in the given full week number,
	/// following IS-GPS-200K 20.3.3.5.2.4 (outside the six hour window around a leap second)
	pub fn offset(&self, tow:f64, week:u32) -> f64 {
		let t:f64 = tow - (self.t_ot as f64) + SECONDS_PER_WEEK*self.weeks_since(self.wn_t, week);
		let polynomial:f64 = self.a0 + self.a1*t + self.a2*t*t;

		let since_leap:f64 = SECONDS_PER_WEEK*self.weeks_since(self.wn_lsf, week) + tow - (self.dn as f64)*SECONDS_PER_DAY;
		let leap:i32 = if since_leap >= 0.0 { self.delta_t_lsf } else { self.delta_t_ls };

		(leap as f64) + polynomial
	}

}

#[cfg(test)]
mod tests {

	use super::*;

	fn model() -> UtcModel {
		UtcModel{ a0: 1.0e-9, a1: 2.0e-15, a2: 0.0, delta_t_ls: 18, t_ot: 405504, wn_t: 2100 % 256,
			wn_lsf: 2102 % 256, dn: 3, delta_t_lsf: 19, week_bits: 8 }
	}

	#[test]
	fn polynomial_before_leap() {
		let utc = model();
		let expected = 18.0 + 1.0e-9 + 2.0e-15*(405600.0 - 405504.0);
		assert!((utc.offset(405600.0, 2100) - expected).abs() < 1.0e-15);
	}

	#[test]
	fn leap_second_applies_after_effectivity() {
		let utc = model();
		assert!((utc.offset(3.0*86400.0 - 1.0, 2102) - 18.0).abs() < 1.0e-5);
		assert!((utc.offset(3.0*86400.0 + 1.0, 2102) - 19.0).abs() < 1.0e-5);
		assert!((utc.offset(0.0, 2103) - 19.0).abs() < 1.0e-5);
	}

	#[test]
	fn truncated_weeks_across_rollover() {
		let utc = UtcModel{ wn_t: 255, week_bits: 8, a1: 1.0e-12, ..UtcModel::default() };
		// Full week 512 is one week after a broadcast 255 (full week 511)
		assert!((utc.offset(0.0, 512) - 1.0e-12*SECONDS_PER_WEEK).abs() < 1.0e-15);
	}

}
