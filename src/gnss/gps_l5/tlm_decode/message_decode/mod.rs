
use std::f64::consts;
use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::utils::bools_to_int;
use crate::DigSigProcErr;
use crate::gnss::common::{Satellite, SatelliteBlockTable};
use crate::gnss::ephemeris::Ephemeris;
use crate::gnss::nav_message::{IonoModel, UtcModel};
use crate::gnss::telemetry_decode::{BitPage, NavigationDecoder};

use super::error_detection;
use super::preamble_and_crc::{PREAMBLE, PAGE_BITS};

pub mod type10;
pub mod type11;
pub mod type30;
pub mod type33;

// IS-GPS-705J, Table 20-II
pub const A_REF:f64 = 26_559_710.0;				// [meters]
pub const OMEGA_DOT_REF:f64 = -2.6e-9;			// [semicircles/sec]

/// Clock correction and accuracy parameters shared by message types 30 through 37
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ClockParams {
	pub t_op: u32,
	pub ura_ned0: i8, pub ura_ned1: u8, pub ura_ned2: u8,
	pub t_oc: u32,
	pub a_f0n: f64, pub a_f1n: f64, pub a_f2n: f64,
}

impl ClockParams {

	pub fn new(bits:&[bool]) -> Result<Self, DigSigProcErr> {
		if bits.len() == 89 {
			// IS-GPS-705J, Table 20-III
			let t_op     = (bools_to_int::to_u16(&bits[  0.. 11])? as u32) * 300u32;			// CEI data sequence propagation time of week
			let ura_ned0 =  bools_to_int::to_i8( &bits[ 11.. 16])?;								// NED accuracy index
			let ura_ned1 =  bools_to_int::to_u8( &bits[ 16.. 19])?;								// NED accuracy change index
			let ura_ned2 =  bools_to_int::to_u8( &bits[ 19.. 22])?;								// NED accuracy change rate index
			let t_oc     = (bools_to_int::to_u16(&bits[ 22.. 33])? as u32) * 300u32;			// Clock data reference time of week
			let a_f0n    = (bools_to_int::to_i32(&bits[ 33.. 59])? as f64) * 2.0_f64.powi(-35);	// SV clock bias correction coefficient [sec]
			let a_f1n    = (bools_to_int::to_i32(&bits[ 59.. 79])? as f64) * 2.0_f64.powi(-48);	// SV clock drift correction coefficient [sec/sec]
			let a_f2n    = (bools_to_int::to_i16(&bits[ 79.. 89])? as f64) * 2.0_f64.powi(-60);	// SV clock drift rate correction coefficient [sec/sec^2]
			Ok(Self{ t_op, ura_ned0, ura_ned1, ura_ned2, t_oc, a_f0n, a_f1n, a_f2n })
		} else {
			Err(DigSigProcErr::InvalidTelemetryData("Expected a bool slice of length 89 in ClockParams::new"))
		}
	}

}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Message {
	pub prn: u8,
	pub type_id:u8,
	pub time_of_week_truncated:u32,
	pub alert_flag:bool,
	pub body:MessageBody,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum MessageBody {
	Type10(type10::Body),
	Type11(type11::Body),
	Type30(type30::Body),
	Type33(type33::Body),
	Clock(ClockParams),
	Unknown
}

impl Message {

	/// Parses a page in transmission order, CRC included.  The CRC itself is not checked here.
	pub fn new(bits:&[bool]) -> Result<Self, DigSigProcErr> {

		if bits.len() == PAGE_BITS {
			let prn                    = bools_to_int::to_u8( &bits[ 8..14])?;
			let type_id                = bools_to_int::to_u8( &bits[14..20])?;
			let time_of_week_truncated = bools_to_int::to_u32(&bits[20..37])?;
			let alert_flag             = bits[37];
			let body_bits = &bits[38..276];
			let body = match type_id {
				10 => MessageBody::Type10(type10::Body::new(body_bits)?),
				11 => MessageBody::Type11(type11::Body::new(body_bits)?),
				30 => MessageBody::Type30(type30::Body::new(body_bits)?),
				33 => MessageBody::Type33(type33::Body::new(body_bits)?),
				31 | 32 | 34 | 35 | 36 | 37 => MessageBody::Clock(ClockParams::new(&body_bits[0..89])?),
				_  => MessageBody::Unknown,
			};
			Ok(Self{ prn, type_id, time_of_week_truncated, alert_flag, body })
		} else {
			Err(DigSigProcErr::InvalidTelemetryData("Expected a 300-bit CNAV page but got a different size"))
		}

	}

}

/// Collects CNAV messages for one satellite into ephemeris, ionosphere, and UTC records
#[derive(Debug)]
pub struct CnavDecoder {
	satellite:Satellite,
	blocks:Arc<SatelliteBlockTable>,
	type10:Option<type10::Body>,
	type11:Option<type11::Body>,
	clock:Option<ClockParams>,
	t_gd:f64,
	ephemeris:Option<Ephemeris>,
	iono:Option<IonoModel>,
	utc_model:Option<UtcModel>,
	new_ephemeris:bool,
	new_iono:bool,
	new_utc_model:bool,
}

impl CnavDecoder {

	pub fn new(satellite:Satellite, blocks:Arc<SatelliteBlockTable>) -> Self {
		Self{ satellite, blocks, type10: None, type11: None, clock: None, t_gd: 0.0, ephemeris: None, iono: None,
			utc_model: None, new_ephemeris: false, new_iono: false, new_utc_model: false }
	}

	// Ephemeris needs both orbit messages from the same issue and some clock message
	fn try_assemble_ephemeris(&mut self) {
		if let (Some(t10), Some(t11), Some(clk)) = (self.type10, self.type11, self.clock) {
			if t10.t_oe != t11.t_oe { return; }

			let a:f64 = A_REF + t10.d_a;
			self.ephemeris = Some(Ephemeris {
				satellite:   self.satellite,
				sv_block:    self.blocks.block(&self.satellite),
				week_number: t10.week_num as u32,
				iode:        t10.t_oe / 300,
				iodc:        clk.t_oc / 300,
				sv_health:   t10.sv_health(),
				t_gd:        self.t_gd,
				t_oc:        clk.t_oc as f64,
				a_f0:        clk.a_f0n,
				a_f1:        clk.a_f1n,
				a_f2:        clk.a_f2n,
				t_oe:        t10.t_oe as f64,
				sqrt_a:      a.sqrt(),
				delta_n:     t10.d_n0 * consts::PI,
				m0:          t10.m0_n * consts::PI,
				e:           t10.e_n,
				omega:       t10.om_n * consts::PI,
				omega0:      t11.omega0_n * consts::PI,
				omega_dot:   (OMEGA_DOT_REF + t11.delta_omega_dot) * consts::PI,
				cus:         t11.cus_n,
				cuc:         t11.cuc_n,
				crs:         t11.crs_n,
				crc:         t11.crc_n,
				cis:         t11.cis_n,
				cic:         t11.cic_n,
				i0:          t11.i0_n * consts::PI,
				idot:        t11.i0_n_dot * consts::PI,
			});
			self.new_ephemeris = true;

			// The next ephemeris needs a fresh pair of orbit messages
			self.type10 = None;
			self.type11 = None;
		}
	}

	pub fn decode_message(&mut self, msg:&Message) {
		match msg.body {
			MessageBody::Type10(body) => self.type10 = Some(body),
			MessageBody::Type11(body) => self.type11 = Some(body),
			MessageBody::Type30(body) => {
				self.clock = Some(body.clock);
				self.t_gd = body.t_gd;
				self.iono = Some(body.iono());
				self.new_iono = true;
			},
			MessageBody::Type33(body) => {
				self.clock = Some(body.clock);
				self.utc_model = Some(body.utc_model());
				self.new_utc_model = true;
			},
			MessageBody::Clock(clock) => self.clock = Some(clock),
			MessageBody::Unknown => log::debug!("Ignoring CNAV message type {} from {}", msg.type_id, self.satellite),
		}
		self.try_assemble_ephemeris();
	}

}

impl NavigationDecoder for CnavDecoder {

	fn decode_page(&mut self, page:&BitPage) {
		let bits = page.transmission_order();
		if bits.len() != PAGE_BITS || bits[0..8] != PREAMBLE || !error_detection::is_subframe_crc_ok(&bits) {
			log::debug!("Dropping CNAV page from {} that failed preamble or CRC", self.satellite);
			return;
		}
		match Message::new(&bits) {
			Ok(msg) if msg.prn as u32 == self.satellite.prn => self.decode_message(&msg),
			Ok(msg) => log::debug!("Dropping CNAV page for PRN {} on channel assigned to {}", msg.prn, self.satellite),
			Err(e)  => log::debug!("Dropping CNAV page from {}: {}", self.satellite, e),
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
