
use serde::{Serialize, Deserialize};

use crate::DigSigProcErr;
use crate::utils::bools_to_int;
use crate::gnss::nav_message::{IonoModel, UtcModel};

// SV ID carried by page 18 of subframe 4
pub const PAGE_18_SV_ID:u8 = 56;

// Week numbers in LNAV UTC parameters are 8 bits
pub const WEEK_BITS:u32 = 8;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub data_id:u8,
	pub sv_id:u8,
	pub page:Page
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
#[allow(non_snake_case)]
pub enum Page {
	Page18{ alpha0:f64, alpha1:f64, alpha2:f64, alpha3:f64, beta0:f64, beta1:f64, beta2:f64, beta3:f64,
		a1:f64, a0:f64, t_ot:u32, wn_t:u8, delta_t_LS:i8, wn_LSF:u8, dn:u8, delta_t_LSF:i8 },
	Other,
}

impl Body {

	pub fn new(bits:&[bool; 240]) -> Result<Body, DigSigProcErr> {
		let data_id:u8 = bools_to_int::to_u8(&bits[48..50])?;
		let sv_id:u8   = bools_to_int::to_u8(&bits[50..56])?;
		let page:Page = match sv_id {
			PAGE_18_SV_ID => {
				// IS-GPS-200K, Figure 20-1 sheet 8 and Table 20-X
				let alpha0:f64     = (bools_to_int::to_i8(&bits[ 56..64 ])? as f64) * (2.0_f64).powi(-30);
				let alpha1:f64     = (bools_to_int::to_i8(&bits[ 64..72 ])? as f64) * (2.0_f64).powi(-27);
				let alpha2:f64     = (bools_to_int::to_i8(&bits[ 72..80 ])? as f64) * (2.0_f64).powi(-24);
				let alpha3:f64     = (bools_to_int::to_i8(&bits[ 80..88 ])? as f64) * (2.0_f64).powi(-24);
				let beta0:f64      = (bools_to_int::to_i8(&bits[ 88..96 ])? as f64) * (2.0_f64).powi(11);
				let beta1:f64      = (bools_to_int::to_i8(&bits[ 96..104])? as f64) * (2.0_f64).powi(14);
				let beta2:f64      = (bools_to_int::to_i8(&bits[104..112])? as f64) * (2.0_f64).powi(16);
				let beta3:f64      = (bools_to_int::to_i8(&bits[112..120])? as f64) * (2.0_f64).powi(16);
				let a1:f64         = (bools_to_int::to_i32(&bits[120..144])? as f64) * (2.0_f64).powi(-50);
				let a0:f64         = (bools_to_int::to_i32(&bits[144..176])? as f64) * (2.0_f64).powi(-30);
				let t_ot:u32       =  bools_to_int::to_u32(&bits[176..184])? * (2_u32).pow(12);
				let wn_t:u8        =  bools_to_int::to_u8(&bits[184..192])?;
				let delta_t_LS:i8  =  bools_to_int::to_i8(&bits[192..200])?;
				let wn_LSF:u8      =  bools_to_int::to_u8(&bits[200..208])?;
				let dn:u8          =  bools_to_int::to_u8(&bits[208..216])?;
				let delta_t_LSF:i8 =  bools_to_int::to_i8(&bits[216..224])?;

				Page::Page18{ alpha0, alpha1, alpha2, alpha3, beta0, beta1, beta2, beta3, a1, a0, t_ot, wn_t, delta_t_LS, wn_LSF, dn, delta_t_LSF }
			},
			_ => Page::Other,
		};

		Ok(Body{ data_id, sv_id, page })
	}

	pub fn iono(&self) -> Option<IonoModel> {
		match self.page {
			Page::Page18{ alpha0, alpha1, alpha2, alpha3, beta0, beta1, beta2, beta3, .. } =>
				Some(IonoModel{ alpha0, alpha1, alpha2, alpha3, beta0, beta1, beta2, beta3 }),
			Page::Other => None,
		}
	}

	pub fn utc_model(&self) -> Option<UtcModel> {
		match self.page {
			Page::Page18{ a1, a0, t_ot, wn_t, delta_t_LS, wn_LSF, dn, delta_t_LSF, .. } =>
				Some(UtcModel{ a0, a1, a2: 0.0, delta_t_ls: delta_t_LS as i32, t_ot, wn_t: wn_t as u32, wn_lsf: wn_LSF as u32,
					dn: dn as u32, delta_t_lsf: delta_t_LSF as i32, week_bits: WEEK_BITS }),
			Page::Other => None,
		}
	}

}
