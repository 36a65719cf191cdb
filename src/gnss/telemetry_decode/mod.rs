
use std::f64::consts;
use std::io::Write;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::DigSigProcErr;
use crate::block::{BlockFunctionality, BlockResult};
use crate::gnss::common::{Satellite, SatelliteBlockTable, SynchroRecord};
use crate::gnss::ephemeris::Ephemeris;
use crate::gnss::nav_message::{IonoModel, MessagePorts, NavMessage, TrackingControl, UtcModel};
use crate::io::{DumpRecord, TelemetryDump};

pub mod config;

pub use config::TelemetryDecoderConfig;


pub const WEEK_MS:u32 = 604_800_000;

// The TOW count in a page is in units of six seconds
pub const TOW_COUNT_MS:u32 = 6000;

// Pages' worth of symbols without a valid frame before tracking is told
const PAGES_BEFORE_TELEMETRY_FAILED:usize = 10;

/// One navigation page as handed to a frame decoder.  Bits are held in reverse transmission
/// order: stored bit i is page bit N-1-i.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPage {
	bits:Vec<bool>,
}

impl BitPage {

	pub fn from_transmission_order(bits:&[bool]) -> Self { Self{ bits: bits.iter().rev().cloned().collect() } }

	pub fn len(&self) -> usize { self.bits.len() }
	pub fn is_empty(&self) -> bool { self.bits.is_empty() }
	pub fn stored(&self) -> &[bool] { &self.bits }

	pub fn reversed(&self) -> Self { Self{ bits: self.bits.iter().rev().cloned().collect() } }

	/// The bits as broadcast, first bit first
	pub fn transmission_order(&self) -> Vec<bool> { self.bits.iter().rev().cloned().collect() }

}

/// A complete page found by a frame synchronizer
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedPage {
	/// Page bits in transmission order with polarity already corrected
	pub bits:Vec<bool>,
	/// TOW count [6 sec] carried in the page
	pub tow:u32,
	/// Symbols received after the end of the page, not counting encoder transitory symbols
	pub delay:u32,
	pub inverted:bool,
}

/// Lower-level bit and frame synchronizer fed one hard-decision symbol at a time
pub trait FrameSync: Send {

	fn add_symbol(&mut self, symbol:bool) -> Option<SyncedPage>;
	fn reset(&mut self);

}

/// Assembles ephemeris, ionosphere, and UTC messages from validated pages.  Pages that fail
/// validation are dropped without setting any flag.  The have_new_* flags clear when read.
pub trait NavigationDecoder: Send {

	fn decode_page(&mut self, page:&BitPage);

	fn have_new_ephemeris(&mut self) -> bool;
	fn have_new_iono(&mut self) -> bool;
	fn have_new_utc_model(&mut self) -> bool;

	fn ephemeris(&self) -> Option<Ephemeris>;
	fn iono(&self) -> Option<IonoModel>;
	fn utc_model(&self) -> Option<UtcModel>;

	/// Discards all partial state and starts collecting for another satellite
	fn set_satellite(&mut self, satellite:Satellite);
	fn reset(&mut self);

}

/// Everything that differs between signals from the point of view of the streaming decoder
pub trait Signal: Send + 'static {

	type Sync: FrameSync + Default;
	type Decoder: NavigationDecoder;

	const NAME:&'static str;
	const SYMBOL_PERIOD_MS:u32;
	const SYMBOLS_PER_BIT:usize;
	const PAGE_BITS:usize;
	const TRANSITORY_SYMBOLS:u32;
	const DUMP_PREFIX:&'static str;

	/// Hard decision on the prompt correlator output
	fn symbol(record:&SynchroRecord) -> bool;

	fn new_decoder(satellite:Satellite, blocks:Arc<SatelliteBlockTable>) -> Self::Decoder;

}

/// Per-channel streaming telemetry decoder interface
pub trait TelemetryDecode: Send {

	/// Consumes one record and returns it stamped with the time of week when a valid word is available
	fn process(&mut self, record:&SynchroRecord) -> Option<SynchroRecord>;
	fn reset(&mut self);
	fn set_channel(&mut self, channel:i32);
	fn set_satellite(&mut self, satellite:Satellite);

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderState {
	pub sample_counter:u64,
	pub last_valid_preamble:u64,
	pub tow_at_current_symbol_ms:u32,
	pub tow_at_preamble_ms:u32,
	pub flag_valid_word:bool,
	pub sent_tlm_failed_msg:bool,
	pub flag_pll_180_deg_phase_locked:bool,
}

/// Absolute TOW difference [ms] accounting for week rollover
pub fn tow_difference_ms(a:u32, b:u32) -> u32 {
	let d:i64 = ((a as i64) - (b as i64)).rem_euclid(WEEK_MS as i64);
	d.min((WEEK_MS as i64) - d) as u32
}

pub struct TelemetryDecoder<S: Signal> {
	satellite:Satellite,
	channel:i32,
	sync:S::Sync,
	nav:S::Decoder,
	state:DecoderState,
	ports:MessagePorts,
	tow_tolerance_ms:u32,
	max_symbols_without_valid_frame:u64,
	dump_enabled:bool,
	dump_prefix:String,
	dump_path:Option<PathBuf>,
	dump:Option<TelemetryDump<Box<dyn Write + Send>>>,
	signal:PhantomData<S>,
}

impl<S: Signal> TelemetryDecoder<S> {

	pub fn new(config:&TelemetryDecoderConfig, ports:MessagePorts, blocks:Arc<SatelliteBlockTable>) -> Self {
		let nav = S::new_decoder(config.satellite, blocks);
		Self::with_parts(config, ports, S::Sync::default(), nav)
	}

	pub fn with_parts(config:&TelemetryDecoderConfig, ports:MessagePorts, sync:S::Sync, nav:S::Decoder) -> Self {
		debug!("{} telemetry processing: satellite {}", S::NAME, config.satellite);
		let dump_prefix = if config.dump_filename.is_empty() { S::DUMP_PREFIX.to_string() } else { config.dump_filename.clone() };
		Self {
			satellite: config.satellite,
			channel: 0,
			sync,
			nav,
			state: DecoderState::default(),
			ports,
			tow_tolerance_ms: config.tow_tolerance_ms.unwrap_or(S::SYMBOL_PERIOD_MS),
			max_symbols_without_valid_frame: (S::PAGE_BITS * S::SYMBOLS_PER_BIT * PAGES_BEFORE_TELEMETRY_FAILED) as u64,
			dump_enabled: config.dump,
			dump_prefix,
			dump_path: None,
			dump: None,
			signal: PhantomData,
		}
	}

	pub fn state(&self) -> &DecoderState { &self.state }
	pub fn satellite(&self) -> Satellite { self.satellite }
	pub fn channel(&self) -> i32 { self.channel }
	pub fn max_symbols_without_valid_frame(&self) -> u64 { self.max_symbols_without_valid_frame }
	pub fn dump_path(&self) -> Option<&PathBuf> { self.dump_path.as_ref() }
	pub fn navigation_decoder(&self) -> &S::Decoder { &self.nav }

	/// Sends dump records to `dst` in place of the per-channel dump file
	pub fn set_dump_writer(&mut self, dst:Box<dyn Write + Send>) {
		self.dump = Some(TelemetryDump::new(dst));
		self.dump_path = None;
	}

	fn publish_new_messages(&mut self) {
		if self.nav.have_new_ephemeris() {
			if let Some(eph) = self.nav.ephemeris() {
				info!("New {} message received in channel {}: ephemeris from satellite {}", S::NAME, self.channel, self.satellite);
				self.ports.publish(NavMessage::Ephemeris(eph));
			}
		}
		if self.nav.have_new_iono() {
			if let Some(iono) = self.nav.iono() {
				info!("New {} message received in channel {}: iono model parameters from satellite {}", S::NAME, self.channel, self.satellite);
				self.ports.publish(NavMessage::Iono(iono));
			}
		}
		if self.nav.have_new_utc_model() {
			if let Some(utc) = self.nav.utc_model() {
				info!("New {} message received in channel {}: UTC model parameters from satellite {}", S::NAME, self.channel, self.satellite);
				self.ports.publish(NavMessage::UtcModel(utc));
			}
		}
	}

	fn handle_page(&mut self, page:SyncedPage) {
		self.state.flag_pll_180_deg_phase_locked = page.inverted;

		self.nav.decode_page(&BitPage::from_transmission_order(&page.bits));
		self.publish_new_messages();

		self.state.tow_at_preamble_ms = page.tow * TOW_COUNT_MS;

		// Time of the last symbol received: the page TOW plus everything that came in after
		// the page, including the encoder transitory
		let last_tow_ms = self.state.tow_at_current_symbol_ms;
		let tow_ms:u64 = (page.tow as u64)*(TOW_COUNT_MS as u64) + ((page.delay + S::TRANSITORY_SYMBOLS) as u64)*(S::SYMBOL_PERIOD_MS as u64);
		self.state.tow_at_current_symbol_ms = (tow_ms % (WEEK_MS as u64)) as u32;

		let jump_ms = tow_difference_ms(self.state.tow_at_current_symbol_ms, last_tow_ms);
		if last_tow_ms != 0 && jump_ms > self.tow_tolerance_ms {
			debug!("{} TOW update in ch {} does not match the TLM TOW counter by {} ms with delay {} and msg tow {} ms",
				S::NAME, self.channel, jump_ms, page.delay, self.state.tow_at_preamble_ms);
			self.state.tow_at_current_symbol_ms = 0;
			self.state.flag_valid_word = false;
		} else {
			self.state.last_valid_preamble = self.state.sample_counter;
			self.state.flag_valid_word = true;
		}
	}

	fn write_dump(&mut self, record:&SynchroRecord) {
		if let Some(dump) = &mut self.dump {
			let rec = DumpRecord {
				tow_at_current_symbol_s: (self.state.tow_at_current_symbol_ms as f64) / 1000.0,
				tracking_sample_counter: record.tracking_sample_counter,
				tow_at_preamble_s: (self.state.tow_at_preamble_ms as f64) / 1000.0,
			};
			if let Err(e) = dump.write(&rec) {
				warn!("Exception writing {} telemetry dump file: {}", S::NAME, e);
			}
		}
	}

}

impl<S: Signal> TelemetryDecode for TelemetryDecoder<S> {

	fn process(&mut self, record:&SynchroRecord) -> Option<SynchroRecord> {
		let mut current = *record;

		// Check whether this satellite's telemetry has gone bad
		self.state.sample_counter += 1;
		if !self.state.sent_tlm_failed_msg && self.state.sample_counter.saturating_sub(self.state.last_valid_preamble) > self.max_symbols_without_valid_frame {
			debug!("No valid {} frame in ch {} for {} symbols", S::NAME, self.channel, self.max_symbols_without_valid_frame);
			self.ports.signal_tracking(TrackingControl::TelemetryFailed);
			self.state.sent_tlm_failed_msg = true;
		}

		match self.sync.add_symbol(S::symbol(&current)) {
			Some(page) => self.handle_page(page),
			None => {
				if self.state.flag_valid_word {
					self.state.tow_at_current_symbol_ms = (self.state.tow_at_current_symbol_ms + S::SYMBOL_PERIOD_MS) % WEEK_MS;
					if !current.flag_valid_symbol_output { self.state.flag_valid_word = false; }
				}
			}
		}

		if self.state.flag_valid_word {
			// Correct the accumulated phase for the Costas loop phase shift
			if self.state.flag_pll_180_deg_phase_locked { current.carrier_phase_rads += consts::PI; }
			current.tow_at_current_symbol_ms = self.state.tow_at_current_symbol_ms;
			current.flag_valid_word = true;
			self.write_dump(&current);
			Some(current)
		} else {
			None
		}
	}

	fn reset(&mut self) {
		self.state.last_valid_preamble = self.state.sample_counter;
		self.state.tow_at_current_symbol_ms = 0;
		self.state.sent_tlm_failed_msg = false;
		self.state.flag_valid_word = false;
		debug!("Telemetry decoder reset for satellite {}", self.satellite);
	}

	fn set_channel(&mut self, channel:i32) {
		self.channel = channel;
		self.nav.reset();
		debug!("{} channel set to {}", S::NAME, channel);

		if self.dump_enabled && self.dump.is_none() {
			let path = PathBuf::from(format!("{}{}.dat", self.dump_prefix, channel));
			match TelemetryDump::create(&path) {
				Ok(dump) => {
					info!("Telemetry decoder dump enabled on channel {} Log file: {}", channel, path.display());
					self.dump = Some(dump);
					self.dump_path = Some(path);
				},
				Err(e) => warn!("channel {} Exception opening {} telemetry dump file {}: {}", channel, S::NAME, path.display(), e),
			}
		}
	}

	fn set_satellite(&mut self, satellite:Satellite) {
		self.satellite = satellite;
		self.nav.set_satellite(satellite);
		self.sync.reset();
		self.state = DecoderState {
			sample_counter: self.state.sample_counter,
			last_valid_preamble: self.state.sample_counter,
			..DecoderState::default()
		};
		debug!("{} telemetry decoder in channel {} set to satellite {}", S::NAME, self.channel, satellite);
	}

}

impl<S: Signal> Drop for TelemetryDecoder<S> {
	fn drop(&mut self) {
		if let Some(dump) = &mut self.dump {
			if let Err(e) = dump.flush() { warn!("Exception closing the {} dump file: {}", S::NAME, e); }
		}
	}
}

/// Control messages for a telemetry decoder running inside a Block
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecoderControl {
	Reset,
	SetChannel(i32),
	SetSatellite(Satellite),
}

impl<S: Signal> BlockFunctionality<DecoderControl, (), SynchroRecord, SynchroRecord> for TelemetryDecoder<S> {

	fn control(&mut self, control:&DecoderControl) -> Result<(), DigSigProcErr> {
		match control {
			DecoderControl::Reset             => self.reset(),
			DecoderControl::SetChannel(ch)    => self.set_channel(*ch),
			DecoderControl::SetSatellite(sat) => self.set_satellite(*sat),
		}
		Ok(())
	}

	fn apply(&mut self, input:&SynchroRecord) -> BlockResult<SynchroRecord> {
		match self.process(input) {
			Some(rec) => BlockResult::Ready(rec),
			None      => BlockResult::NotReady,
		}
	}

}
