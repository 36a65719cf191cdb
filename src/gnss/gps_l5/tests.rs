
use std::f64::consts;
use std::sync::Arc;

use num_complex::Complex;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use super::*;
use crate::utils::bools_to_int::from_i64;
use crate::gnss::common::{Satellite, SatelliteBlockTable, SvBlock, SynchroRecord};
use crate::gnss::nav_message::{MessagePorts, NavMessage};
use crate::gnss::telemetry_decode::{BitPage, NavigationDecoder, TelemetryDecode, TelemetryDecoderConfig};
use super::tlm_decode::error_correction::ConvolutionalEncoder;
use super::tlm_decode::error_detection::crc24q;
use super::tlm_decode::message_decode::{A_REF, CnavDecoder, MessageBody, Message};
use super::tlm_decode::preamble_and_crc::PREAMBLE;

const PRN:u32 = 7;
const FIRST_TOW:u32 = 64800;

fn fields(f:&[(i64, usize)]) -> Vec<bool> { f.iter().flat_map(|(v, n)| from_i64(*v, *n)).collect() }

fn page(type_id:i64, tow:u32, body:Vec<bool>) -> Vec<bool> {
	assert_eq!(body.len(), 238);
	let mut bits:Vec<bool> = PREAMBLE.to_vec();
	bits.extend(fields(&[(PRN as i64, 6), (type_id, 6), (tow as i64, 17), (0, 1)]));
	bits.extend(body);
	let crc = crc24q(&bits);
	bits.extend(crc);
	bits
}

fn clock_fields() -> Vec<(i64, usize)> {
	vec![(0, 11), (0, 5), (0, 3), (0, 3), (1296, 11), (-123456, 26), (1000, 20), (0, 10)]
}

fn type10_body() -> Vec<bool> {
	fields(&[(2200, 13), (0, 3), (0, 11), (0, 5), (1296, 11), (1000, 26), (0, 25), (4000, 17), (0, 23),
		(-1_000_000_000, 33), (171_798_692, 33), (2_000_000_000, 33), (0, 2), (0, 3)])
}

fn type11_body() -> Vec<bool> {
	fields(&[(1296, 11), (-1_500_000_000, 33), (1_320_000_000, 33), (-500, 17), (-100, 15), (-50, 16), (60, 16),
		(5000, 24), (60000, 24), (9000, 21), (-3000, 21), (0, 7)])
}

fn type30_body() -> Vec<bool> {
	let mut f = clock_fields();
	f.extend(vec![(-10, 13), (0, 13), (0, 13), (0, 13), (0, 13),
		(10, 8), (5, 8), (-3, 8), (-2, 8), (40, 8), (2, 8), (-3, 8), (1, 8), (0, 8), (0, 12)]);
	fields(&f)
}

fn type33_body() -> Vec<bool> {
	let mut f = clock_fields();
	f.extend(vec![(100, 16), (-20, 13), (-5, 7), (18, 8), (25344, 16), (2200, 13), (2205, 13), (3, 4), (19, 8), (0, 51)]);
	fields(&f)
}

fn message_sequence() -> Vec<Vec<bool>> {
	vec![
		page(10, FIRST_TOW,     type10_body()),
		page(11, FIRST_TOW + 1, type11_body()),
		page(30, FIRST_TOW + 2, type30_body()),
		page(33, FIRST_TOW + 3, type33_body()),
	]
}

// Encoded symbol stream with some leading bits and enough trailing bits to flush the decoder
fn symbol_stream(rng:&mut StdRng) -> Vec<bool> {
	let mut bits:Vec<bool> = (0..20).map(|_| rng.gen()).collect();
	for p in message_sequence() { bits.extend(p); }
	bits.extend((0..80).map(|_| rng.gen::<bool>()));
	ConvolutionalEncoder::new().encode(&bits)
}

fn new_decoder(ports:MessagePorts) -> GpsL5TelemetryDecoder {
	let config = TelemetryDecoderConfig::for_satellite(Satellite::gps(PRN));
	GpsL5TelemetryDecoder::new(&config, ports, Arc::new(SatelliteBlockTable::with_defaults()))
}

fn run(dec:&mut GpsL5TelemetryDecoder, prompts:&[f64]) -> Vec<SynchroRecord> {
	prompts.iter().enumerate().filter_map(|(idx, q)| {
		let rec = SynchroRecord{ prompt: Complex::new(0.0, *q), tracking_sample_counter: idx as u64,
			flag_valid_symbol_output: true, ..SynchroRecord::default() };
		dec.process(&rec)
	}).collect()
}

fn assert_tow_sequence(outputs:&[SynchroRecord]) {
	assert!(!outputs.is_empty());
	assert_eq!(outputs[0].tow_at_current_symbol_ms, FIRST_TOW*6000 + 1260);
	for pair in outputs.windows(2) {
		assert_eq!(pair[1].tow_at_current_symbol_ms, pair[0].tow_at_current_symbol_ms + 10);
	}
}

fn collect_messages(rx:&mut tokio::sync::mpsc::UnboundedReceiver<NavMessage>) -> Vec<NavMessage> {
	let mut ans = vec![];
	while let Ok(msg) = rx.try_recv() { ans.push(msg); }
	ans
}

#[test]
fn decodes_ephemeris_iono_and_utc_from_symbols() {
	let mut rng = StdRng::seed_from_u64(5);
	let symbols = symbol_stream(&mut rng);
	let prompts:Vec<f64> = symbols.iter().map(|s| if *s { 1.0 } else { -1.0 }).collect();

	let (ports, mut tlm_rx, mut trk_rx) = MessagePorts::connected();
	let mut dec = new_decoder(ports);
	let outputs = run(&mut dec, &prompts);

	// 20 leading bits, then the first page ends 126 symbols before it is reported
	assert_eq!(outputs[0].tracking_sample_counter, (2*(20 + 300) - 1 + 126) as u64);
	assert_eq!(outputs.len(), prompts.len() - (2*(20 + 300) - 1 + 126));
	assert_tow_sequence(&outputs);
	assert!(outputs.iter().all(|r| r.carrier_phase_rads == 0.0));
	assert!(trk_rx.try_recv().is_err());

	let msgs = collect_messages(&mut tlm_rx);
	assert_eq!(msgs.len(), 3);

	match msgs[0] {
		NavMessage::Ephemeris(eph) => {
			assert_eq!(eph.satellite, Satellite::gps(PRN));
			assert_eq!(eph.sv_block, SvBlock::GPS_IIR_M);
			assert_eq!(eph.week_number, 2200);
			assert_eq!(eph.t_oe, 388800.0);
			assert_eq!(eph.t_oc, 388800.0);
			assert!((eph.sqrt_a - (A_REF + 1000.0*2.0_f64.powi(-9)).sqrt()).abs() < 1.0e-9);
			assert!((eph.e - 171_798_692.0*2.0_f64.powi(-34)).abs() < 1.0e-15);
			assert!((eph.m0 - (-1.0e9)*2.0_f64.powi(-32)*consts::PI).abs() < 1.0e-12);
			assert!((eph.delta_n - 4000.0*2.0_f64.powi(-44)*consts::PI).abs() < 1.0e-20);
			assert!((eph.omega_dot - (-2.6e-9 - 500.0*2.0_f64.powi(-44))*consts::PI).abs() < 1.0e-20);
			assert!((eph.i0 - 1.32e9*2.0_f64.powi(-32)*consts::PI).abs() < 1.0e-12);
			assert!((eph.crc - 60000.0/256.0).abs() < 1.0e-12);
			assert!((eph.cuc + 3000.0*2.0_f64.powi(-30)).abs() < 1.0e-18);
			assert!((eph.a_f0 + 123456.0*2.0_f64.powi(-35)).abs() < 1.0e-18);
			assert_eq!(eph.idot, -100.0*2.0_f64.powi(-44)*consts::PI);
			assert!((eph.t_gd + 10.0*2.0_f64.powi(-35)).abs() < 1.0e-18);

			// A sane orbit comes out of it
			let r = eph.satellite_position(388800.0).position.norm();
			assert!(r > 2.6e7 && r < 2.7e7);
		},
		other => panic!("Expected an ephemeris first, got {:?}", other),
	}
	match msgs[1] {
		NavMessage::Iono(iono) => {
			assert_eq!(iono.alpha0, 10.0*2.0_f64.powi(-30));
			assert_eq!(iono.beta2, -3.0*65536.0);
		},
		other => panic!("Expected an iono model, got {:?}", other),
	}
	match msgs[2] {
		NavMessage::UtcModel(utc) => {
			assert_eq!(utc.delta_t_ls, 18);
			assert_eq!(utc.delta_t_lsf, 19);
			assert_eq!(utc.t_ot, 405504);
			assert_eq!(utc.wn_lsf, 2205);
			assert_eq!(utc.week_bits, 13);
			assert!((utc.a1 + 20.0*2.0_f64.powi(-51)).abs() < 1.0e-25);
			assert_eq!(utc.a2, -5.0*2.0_f64.powi(-68));
		},
		other => panic!("Expected a UTC model, got {:?}", other),
	}
}

#[test]
fn inverted_and_odd_aligned_streams_still_lock() {
	let mut rng = StdRng::seed_from_u64(17);
	let mut symbols:Vec<bool> = vec![true];
	symbols.extend(symbol_stream(&mut rng));
	let prompts:Vec<f64> = symbols.iter().map(|s| if *s { -1.0 } else { 1.0 }).collect();

	let (ports, mut tlm_rx, _trk_rx) = MessagePorts::connected();
	let mut dec = new_decoder(ports);
	let outputs = run(&mut dec, &prompts);

	assert_eq!(outputs[0].tracking_sample_counter, (2*(20 + 300) + 126) as u64);
	assert_tow_sequence(&outputs);
	assert!(outputs.iter().all(|r| (r.carrier_phase_rads - consts::PI).abs() < 1.0e-12));
	assert_eq!(collect_messages(&mut tlm_rx).len(), 3);
}

#[test]
fn noisy_symbols_decode() {
	let mut rng = StdRng::seed_from_u64(1234);
	let symbols = symbol_stream(&mut rng);
	let noise = Normal::new(0.0, 0.35).unwrap();
	let prompts:Vec<f64> = symbols.iter().map(|s| (if *s { 1.0 } else { -1.0 }) + noise.sample(&mut rng)).collect();

	let (ports, mut tlm_rx, _trk_rx) = MessagePorts::connected();
	let mut dec = new_decoder(ports);
	let outputs = run(&mut dec, &prompts);
	assert_tow_sequence(&outputs);
	assert_eq!(collect_messages(&mut tlm_rx).len(), 3);
}

#[test]
fn corrupted_pages_set_no_flags() {
	let mut nav = CnavDecoder::new(Satellite::gps(PRN), Arc::new(SatelliteBlockTable::with_defaults()));
	for mut p in message_sequence() {
		p[150] = !p[150];
		nav.decode_page(&BitPage::from_transmission_order(&p));
		assert!(!nav.have_new_ephemeris());
		assert!(!nav.have_new_iono());
		assert!(!nav.have_new_utc_model());
	}
	assert!(nav.ephemeris().is_none());

	// Pages for another PRN are dropped too
	nav.set_satellite(Satellite::gps(PRN + 1));
	for p in message_sequence() { nav.decode_page(&BitPage::from_transmission_order(&p)); }
	assert!(!nav.have_new_iono());
	assert!(nav.iono().is_none());
}

#[test]
fn flags_clear_once_read_and_reset_discards_partial_state() {
	let mut nav = CnavDecoder::new(Satellite::gps(PRN), Arc::new(SatelliteBlockTable::with_defaults()));
	let pages = message_sequence();

	nav.decode_page(&BitPage::from_transmission_order(&pages[0]));
	nav.reset();
	nav.decode_page(&BitPage::from_transmission_order(&pages[1]));
	nav.decode_page(&BitPage::from_transmission_order(&pages[2]));
	// Type 10 was discarded, so no ephemeris yet
	assert!(!nav.have_new_ephemeris());
	assert!(nav.have_new_iono());
	assert!(!nav.have_new_iono());

	nav.decode_page(&BitPage::from_transmission_order(&pages[0]));
	assert!(nav.have_new_ephemeris());
	assert!(!nav.have_new_ephemeris());
}

#[test]
fn header_fields() {
	let msg = Message::new(&message_sequence()[3]).unwrap();
	assert_eq!(msg.prn, PRN as u8);
	assert_eq!(msg.type_id, 33);
	assert_eq!(msg.time_of_week_truncated, FIRST_TOW + 3);
	assert!(!msg.alert_flag);
	match msg.body {
		MessageBody::Type33(body) => {
			assert_eq!(body.clock.t_oc, 388800);
			assert_eq!(body.dn, 3);
		},
		other => panic!("Expected type 33, got {:?}", other),
	}

	let mut body = fields(&clock_fields());
	body.resize(238, false);
	let clock_only = page(31, FIRST_TOW, body);
	assert!(matches!(Message::new(&clock_only).map(|m| m.body), Ok(MessageBody::Clock(_))));
}
