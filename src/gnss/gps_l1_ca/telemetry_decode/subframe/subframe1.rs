
use serde::{Serialize, Deserialize};

use crate::DigSigProcErr;
use crate::utils::bools_to_int;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
#[allow(non_camel_case_types)]
pub enum CodeOnL2 {
	Reserved,
	P_Code,
	CA_Code,
}

/// Week number, SV health and accuracy, and clock correction terms
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub week_number:u16,			// modulo 1024
	pub code_on_l2:CodeOnL2,
	pub ura_index:u8,
	pub sv_health:u8,
	pub l2_p_data_off:bool,
	pub iodc:u16,
	pub t_gd:f64,					// [sec]
	pub t_oc:u32,					// [sec]
	pub a_f2:f64,					// [sec/sec^2]
	pub a_f1:f64,					// [sec/sec]
	pub a_f0:f64,					// [sec]
}

impl Body {

	// IS-GPS-200K, Figure 20-1 sheet 1 and Table 20-I
	pub fn new(bits:&[bool; 240]) -> Result<Body, DigSigProcErr> {
		let code_on_l2 = match (bits[58], bits[59]) {
			(false, false) => CodeOnL2::Reserved,
			(false, true ) => CodeOnL2::P_Code,
			(true,  false) => CodeOnL2::CA_Code,
			(true,  true ) => return Err(DigSigProcErr::InvalidTelemetryData("Invalid code_on_l2 field in subframe 1")),
		};

		// IODC is split between word 3 (MSBs) and word 8 (LSBs)
		let iodc_bits:Vec<bool> = bits[70..72].iter().chain(bits[168..176].iter()).cloned().collect();

		Ok(Body {
			week_number:   bools_to_int::to_u16(&bits[ 48.. 58])?,
			code_on_l2,
			ura_index:     bools_to_int::to_u8( &bits[ 60.. 64])?,
			sv_health:     bools_to_int::to_u8( &bits[ 64.. 70])?,
			l2_p_data_off: bits[72],
			iodc:          bools_to_int::to_u16(&iodc_bits)?,
			t_gd:         (bools_to_int::to_i8( &bits[160..168])? as f64) * 2.0_f64.powi(-31),
			t_oc:          bools_to_int::to_u32(&bits[176..192])? * 16,
			a_f2:         (bools_to_int::to_i8( &bits[192..200])? as f64) * 2.0_f64.powi(-55),
			a_f1:         (bools_to_int::to_i16(&bits[200..216])? as f64) * 2.0_f64.powi(-43),
			a_f0:         (bools_to_int::to_i32(&bits[216..238])? as f64) * 2.0_f64.powi(-31),
		})
	}

	/// Subframes 2 and 3 belong with this one when their IODE equals the 8 LSBs of IODC
	pub fn matches_iode(&self, iode:u8) -> bool { (self.iodc & 0xFF) as u8 == iode }

}
