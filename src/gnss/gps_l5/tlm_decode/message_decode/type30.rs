
use serde::{Serialize, Deserialize};

use crate::utils::bools_to_int;
use crate::DigSigProcErr;
use crate::gnss::nav_message::IonoModel;

use super::ClockParams;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Body {
	pub clock: ClockParams,
	pub t_gd: f64,
	pub isc_l1ca: f64, pub isc_l2c: f64, pub isc_l5i5: f64, pub isc_l5q5: f64,
	pub alpha0: f64, pub alpha1: f64, pub alpha2: f64, pub alpha3: f64,
	pub beta0:  f64, pub beta1:  f64, pub beta2:  f64, pub beta3:  f64,
	pub wn_op: u8
}

impl Body {

	pub fn new(bits:&[bool]) -> Result<Self, DigSigProcErr> {
		if bits.len() == 238 {
			let clock = ClockParams::new(&bits[0..89])?;

			// Group delay differential parameters
			let t_gd     = (bools_to_int::to_i16(&bits[ 89..102])? as f64) * 2.0_f64.powi(-35);	// [sec]
			let isc_l1ca = (bools_to_int::to_i16(&bits[102..115])? as f64) * 2.0_f64.powi(-35); // [sec]
			let isc_l2c  = (bools_to_int::to_i16(&bits[115..128])? as f64) * 2.0_f64.powi(-35); // [sec]
			let isc_l5i5 = (bools_to_int::to_i16(&bits[128..141])? as f64) * 2.0_f64.powi(-35); // [sec]
			let isc_l5q5 = (bools_to_int::to_i16(&bits[141..154])? as f64) * 2.0_f64.powi(-35); // [sec]

			// Klobuchar coefficients, IS-GPS-200K Table 20-X
			let alpha0   = (bools_to_int::to_i8( &bits[154..162])? as f64) * 2.0_f64.powi(-30);	// [sec]
			let alpha1   = (bools_to_int::to_i8( &bits[162..170])? as f64) * 2.0_f64.powi(-27);	// [sec/semicircle]
			let alpha2   = (bools_to_int::to_i8( &bits[170..178])? as f64) * 2.0_f64.powi(-24); // [sec/semicircle^2]
			let alpha3   = (bools_to_int::to_i8( &bits[178..186])? as f64) * 2.0_f64.powi(-24); // [sec/semicircle^3]
			let beta0    = (bools_to_int::to_i8( &bits[186..194])? as f64) * 2.0_f64.powi( 11); // [sec]
			let beta1    = (bools_to_int::to_i8( &bits[194..202])? as f64) * 2.0_f64.powi( 14);	// [sec/semicircle]
			let beta2    = (bools_to_int::to_i8( &bits[202..210])? as f64) * 2.0_f64.powi( 16); // [sec/semicircle^2]
			let beta3    = (bools_to_int::to_i8( &bits[210..218])? as f64) * 2.0_f64.powi( 16); // [sec/semicircle^3]

			// CEI data sequence propagation week number
			let wn_op    =  bools_to_int::to_u8( &bits[218..226])?;

			// 12 reserved bits

			Ok(Self{ clock, t_gd, isc_l1ca, isc_l2c, isc_l5i5, isc_l5q5,
					 alpha0, alpha1, alpha2, alpha3, beta0, beta1, beta2, beta3, wn_op })

		} else {
			Err(DigSigProcErr::InvalidTelemetryData("Expected a bool slice of length 238 in type30::Body::new"))
		}
	}

	pub fn iono(&self) -> IonoModel {
		IonoModel{ alpha0: self.alpha0, alpha1: self.alpha1, alpha2: self.alpha2, alpha3: self.alpha3,
			beta0: self.beta0, beta1: self.beta1, beta2: self.beta2, beta3: self.beta3 }
	}

}
