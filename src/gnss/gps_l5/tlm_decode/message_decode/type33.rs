
use serde::{Serialize, Deserialize};

use crate::utils::bools_to_int;
use crate::DigSigProcErr;
use crate::gnss::nav_message::UtcModel;

use super::ClockParams;

// Week numbers in CNAV UTC parameters are 13 bits
pub const WEEK_BITS:u32 = 13;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Body {
	pub clock: ClockParams,
	pub a0_n: f64, pub a1_n: f64, pub a2_n: f64,
	pub delta_t_ls: i8,
	pub t_ot: u32,
	pub wn_ot: u16,
	pub wn_lsf: u16,
	pub dn: u8,
	pub delta_t_lsf: i8,
}

impl Body {

	pub fn new(bits:&[bool]) -> Result<Self, DigSigProcErr> {
		if bits.len() == 238 {
			let clock = ClockParams::new(&bits[0..89])?;

			// UTC parameters, IS-GPS-705J Table 20-IX
			let a0_n        = (bools_to_int::to_i16(&bits[ 89..105])? as f64) * 2.0_f64.powi(-35);	// Bias coefficient of GPS time scale relative to UTC [sec]
			let a1_n        = (bools_to_int::to_i16(&bits[105..118])? as f64) * 2.0_f64.powi(-51);	// Drift coefficient [sec/sec]
			let a2_n        = (bools_to_int::to_i8( &bits[118..125])? as f64) * 2.0_f64.powi(-68);	// Drift rate correction coefficient [sec/sec^2]
			let delta_t_ls  =  bools_to_int::to_i8( &bits[125..133])?;								// Current leap seconds
			let t_ot        = (bools_to_int::to_u16(&bits[133..149])? as u32) * 16u32;				// Time data reference time of week [sec]
			let wn_ot       =  bools_to_int::to_u16(&bits[149..162])?;
			let wn_lsf      =  bools_to_int::to_u16(&bits[162..175])?;
			let dn          =  bools_to_int::to_u8( &bits[175..179])?;								// Leap second reference day number
			let delta_t_lsf =  bools_to_int::to_i8( &bits[179..187])?;
			// 51 reserved bits

			Ok(Self{ clock, a0_n, a1_n, a2_n, delta_t_ls, t_ot, wn_ot, wn_lsf, dn, delta_t_lsf })

		} else {
			Err(DigSigProcErr::InvalidTelemetryData("Expected a bool slice of length 238 in type33::Body::new"))
		}
	}

	pub fn utc_model(&self) -> UtcModel {
		UtcModel{ a0: self.a0_n, a1: self.a1_n, a2: self.a2_n, delta_t_ls: self.delta_t_ls as i32, t_ot: self.t_ot,
			wn_t: self.wn_ot as u32, wn_lsf: self.wn_lsf as u32, dn: self.dn as u32, delta_t_lsf: self.delta_t_lsf as i32,
			week_bits: WEEK_BITS }
	}

}
