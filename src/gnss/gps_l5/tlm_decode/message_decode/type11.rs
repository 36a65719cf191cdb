
use serde::{Serialize, Deserialize};

use crate::utils::bools_to_int;
use crate::DigSigProcErr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Body {
	pub t_oe: u32,
	pub omega0_n: f64, pub i0_n: f64, pub delta_omega_dot: f64, pub i0_n_dot: f64,
	pub cis_n: f64, pub cic_n: f64,
	pub crs_n: f64, pub crc_n: f64,
	pub cus_n: f64, pub cuc_n: f64,
}

impl Body {

	pub fn new(bits:&[bool]) -> Result<Self, DigSigProcErr> {
		if bits.len() == 238 {
			// Scale factors given in IS-GPS-705J, Table 20-I
			let t_oe            = (bools_to_int::to_u16(&bits[  0.. 11])? as u32) * 300u32;
			let omega0_n        = (bools_to_int::to_i64(&bits[ 11.. 44])? as f64) * 2.0_f64.powi(-32);	// Longitude of ascending node at weekly epoch [semicircles]
			let i0_n            = (bools_to_int::to_i64(&bits[ 44.. 77])? as f64) * 2.0_f64.powi(-32);	// Inclination angle at reference time [semicircles]
			let delta_omega_dot = (bools_to_int::to_i32(&bits[ 77.. 94])? as f64) * 2.0_f64.powi(-44);	// Rate of right ascension difference [semicircles/sec]
			let i0_n_dot        = (bools_to_int::to_i16(&bits[ 94..109])? as f64) * 2.0_f64.powi(-44);	// Rate of inclination angle [semicircles/sec]
			let cis_n           = (bools_to_int::to_i16(&bits[109..125])? as f64) * 2.0_f64.powi(-30);	// [rad]
			let cic_n           = (bools_to_int::to_i16(&bits[125..141])? as f64) * 2.0_f64.powi(-30);	// [rad]
			let crs_n           = (bools_to_int::to_i32(&bits[141..165])? as f64) * 2.0_f64.powi(-8);	// [meters]
			let crc_n           = (bools_to_int::to_i32(&bits[165..189])? as f64) * 2.0_f64.powi(-8);	// [meters]
			let cus_n           = (bools_to_int::to_i32(&bits[189..210])? as f64) * 2.0_f64.powi(-30);	// [rad]
			let cuc_n           = (bools_to_int::to_i32(&bits[210..231])? as f64) * 2.0_f64.powi(-30);	// [rad]
			// 7 bits reserved

			Ok(Self{ t_oe, omega0_n, i0_n, delta_omega_dot, i0_n_dot, cis_n, cic_n, crs_n, crc_n, cus_n, cuc_n })

		} else {
			Err(DigSigProcErr::InvalidTelemetryData("Expected a bool slice of length 238 in type11::Body::new"))
		}
	}

}
