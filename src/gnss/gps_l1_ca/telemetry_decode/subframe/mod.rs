
use std::f64::consts;
use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::DigSigProcErr;
use crate::utils::bools_to_int;
use crate::gnss::common::{Satellite, SatelliteBlockTable};
use crate::gnss::ephemeris::Ephemeris;
use crate::gnss::nav_message::{IonoModel, UtcModel};
use crate::gnss::telemetry_decode::{BitPage, NavigationDecoder};

use super::SUBFRAME_SIZE_DATA_ONLY_BITS;

pub mod subframe1;
pub mod subframe2;
pub mod subframe3;
pub mod subframe4;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Subframe {
	pub time_of_week_truncated:u32,
	pub alert_flag:bool,
	pub anti_spoof_flag:bool,
	pub subframe_id:u8,
	pub body:SubframeBody,
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub enum SubframeBody {
	Subframe1(subframe1::Body),
	Subframe2(subframe2::Body),
	Subframe3(subframe3::Body),
	Subframe4(subframe4::Body),
	Subframe5,
}

impl Subframe {

	pub fn time_of_week(&self) -> f64 { (self.time_of_week_truncated as f64) * 6.0 }

}

/// Decodes a subframe with parity already stripped
pub fn decode(bits:&[bool; SUBFRAME_SIZE_DATA_ONLY_BITS]) -> Result<Subframe, DigSigProcErr> {
	let time_of_week_truncated:u32 = bools_to_int::to_u32(&bits[24..41])?;
	let alert_flag:bool = bits[41];
	let anti_spoof_flag:bool = bits[42];
	let subframe_id:u8 = bools_to_int::to_u8(&bits[43..46])?;

	let body = match subframe_id {
		1 => SubframeBody::Subframe1(subframe1::Body::new(bits)?),
		2 => SubframeBody::Subframe2(subframe2::Body::new(bits)?),
		3 => SubframeBody::Subframe3(subframe3::Body::new(bits)?),
		4 => SubframeBody::Subframe4(subframe4::Body::new(bits)?),
		5 => SubframeBody::Subframe5,
		_ => return Err(DigSigProcErr::InvalidTelemetryData("Subframe number other than 1 through 5")),
	};

	Ok(Subframe{ time_of_week_truncated, alert_flag, anti_spoof_flag, subframe_id, body })
}

/// Collects LNAV subframes for one satellite.  LNAV repeats the same data every frame, so
/// messages are only flagged as new when their content changes.
#[derive(Debug)]
pub struct LnavDecoder {
	satellite:Satellite,
	blocks:Arc<SatelliteBlockTable>,
	sf1:Option<subframe1::Body>,
	sf2:Option<subframe2::Body>,
	sf3:Option<subframe3::Body>,
	ephemeris:Option<Ephemeris>,
	iono:Option<IonoModel>,
	utc_model:Option<UtcModel>,
	new_ephemeris:bool,
	new_iono:bool,
	new_utc_model:bool,
}

impl LnavDecoder {

	pub fn new(satellite:Satellite, blocks:Arc<SatelliteBlockTable>) -> Self {
		Self{ satellite, blocks, sf1: None, sf2: None, sf3: None, ephemeris: None, iono: None, utc_model: None,
			new_ephemeris: false, new_iono: false, new_utc_model: false }
	}

	fn try_assemble_ephemeris(&mut self) {
		if let (Some(sf1), Some(sf2), Some(sf3)) = (self.sf1, self.sf2, self.sf3) {
			if !sf1.matches_iode(sf2.iode) || sf2.iode != sf3.iode { return; }

			let eph = Ephemeris {
				satellite:   self.satellite,
				sv_block:    self.blocks.block(&self.satellite),
				week_number: sf1.week_number as u32,
				iode:        sf2.iode as u32,
				iodc:        sf1.iodc as u32,
				sv_health:   sf1.sv_health,
				t_gd:        sf1.t_gd,
				t_oc:        sf1.t_oc as f64,
				a_f0:        sf1.a_f0,
				a_f1:        sf1.a_f1,
				a_f2:        sf1.a_f2,
				t_oe:        sf2.t_oe,
				sqrt_a:      sf2.sqrt_a,
				delta_n:     sf2.dn * consts::PI,
				m0:          sf2.m0 * consts::PI,
				e:           sf2.e,
				omega:       sf3.omega * consts::PI,
				omega0:      sf3.omega0 * consts::PI,
				omega_dot:   sf3.omega_dot * consts::PI,
				cus:         sf2.cus,
				cuc:         sf2.cuc,
				crs:         sf2.crs,
				crc:         sf3.crc,
				cis:         sf3.cis,
				cic:         sf3.cic,
				i0:          sf3.i0 * consts::PI,
				idot:        sf3.idot * consts::PI,
			};
			if self.ephemeris != Some(eph) {
				self.ephemeris = Some(eph);
				self.new_ephemeris = true;
			}
		}
	}

	pub fn decode_subframe(&mut self, sf:&Subframe) {
		match sf.body {
			SubframeBody::Subframe1(body) => self.sf1 = Some(body),
			SubframeBody::Subframe2(body) => self.sf2 = Some(body),
			SubframeBody::Subframe3(body) => self.sf3 = Some(body),
			SubframeBody::Subframe4(body) => {
				if let (Some(iono), Some(utc)) = (body.iono(), body.utc_model()) {
					if self.iono != Some(iono) {
						self.iono = Some(iono);
						self.new_iono = true;
					}
					if self.utc_model != Some(utc) {
						self.utc_model = Some(utc);
						self.new_utc_model = true;
					}
				}
			},
			SubframeBody::Subframe5 => (),
		}
		self.try_assemble_ephemeris();
	}

}

impl NavigationDecoder for LnavDecoder {

	fn decode_page(&mut self, page:&BitPage) {
		let bits = page.transmission_order();
		if bits.len() < super::PREAMBLE.len() || bits[0..8] != super::PREAMBLE {
			log::debug!("Dropping LNAV subframe from {}: no preamble", self.satellite);
			return;
		}
		let decoded = super::data_recover(&bits).and_then(|data| decode(&data));
		match decoded {
			Ok(sf) => self.decode_subframe(&sf),
			Err(e) => log::debug!("Dropping LNAV subframe from {}: {}", self.satellite, e),
		}
	}

	fn have_new_ephemeris(&mut self) -> bool { std::mem::replace(&mut self.new_ephemeris, false) }
	fn have_new_iono(&mut self) -> bool { std::mem::replace(&mut self.new_iono, false) }
	fn have_new_utc_model(&mut self) -> bool { std::mem::replace(&mut self.new_utc_model, false) }

	fn ephemeris(&self) -> Option<Ephemeris> { self.ephemeris }
	fn iono(&self) -> Option<IonoModel> { self.iono }
	fn utc_model(&self) -> Option<UtcModel> { self.utc_model }

	fn set_satellite(&mut self, satellite:Satellite) {
		self.satellite = satellite;
		self.reset();
	}

	fn reset(&mut self) {
		*self = Self::new(self.satellite, self.blocks.clone());
	}

}
