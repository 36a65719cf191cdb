
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;

use clap::{Arg, App};
use colored::*;
use gnss_tlm::DigSigProcErr;
use gnss_tlm::io::SynchroSource;
use gnss_tlm::gnss::common::{Satellite, SatelliteBlockTable};
use gnss_tlm::gnss::ephemeris::store::EphemerisStore;
use gnss_tlm::gnss::gps_l1_ca::GpsL1Ca;
use gnss_tlm::gnss::gps_l5::GpsL5;
use gnss_tlm::gnss::nav_message::{MessagePorts, NavMessage};
use gnss_tlm::gnss::telemetry_decode::{Signal, TelemetryDecode, TelemetryDecoder, TelemetryDecoderConfig};

struct Summary {
	records_in:usize,
	records_out:usize,
	new_ephemerides:usize,
	first_tow_ms:Option<u32>,
	last_tow_ms:Option<u32>,
}

fn decode<S: Signal, R: BufRead>(src:SynchroSource<R>, config:&TelemetryDecoderConfig, channel:i32,
	mut store:Option<&mut EphemerisStore>) -> Summary {

	let (ports, mut tlm_rx, mut trk_rx) = MessagePorts::connected();
	let mut dec:TelemetryDecoder<S> = TelemetryDecoder::new(config, ports, Arc::new(SatelliteBlockTable::with_defaults()));
	dec.set_channel(channel);

	let mut summary = Summary{ records_in: 0, records_out: 0, new_ephemerides: 0, first_tow_ms: None, last_tow_ms: None };

	for rec in src {
		summary.records_in += 1;
		if let Some(out) = dec.process(&rec) {
			summary.records_out += 1;
			summary.first_tow_ms.get_or_insert(out.tow_at_current_symbol_ms);
			summary.last_tow_ms = Some(out.tow_at_current_symbol_ms);
		}

		while let Ok(msg) = tlm_rx.try_recv() {
			match msg {
				NavMessage::Ephemeris(eph) => {
					eprintln!("{}", format!("{} ephemeris: week {}, IODE {}, t_oe {:.0} [sec]", eph.satellite, eph.week_number, eph.iode, eph.t_oe).green());
					if let Some(s) = store.as_mut() {
						if s.insert(eph) { summary.new_ephemerides += 1; }
					}
				},
				NavMessage::Iono(iono)   => eprintln!("{}", format!("Ionosphere: {:?}", iono).blue()),
				NavMessage::UtcModel(utc) => eprintln!("{}", format!("UTC model: {:?}", utc).blue()),
			}
			println!("{}", serde_json::to_string(&msg).unwrap_or_default());
		}

		while let Ok(ctrl) = trk_rx.try_recv() {
			eprintln!("{}", format!("Tracking notified: {:?} (code {}) after {} records", ctrl, ctrl.code(), summary.records_in).yellow());
		}
	}

	summary
}

fn run() -> Result<(), DigSigProcErr> {

	let matches = App::new("GNSS Telemetry Decoder")
		.version("0.1.0")
		.about("Decodes navigation messages from tracking output stored as JSON lines of synchro records")
		.arg(Arg::with_name("input")
			.short("i").long("input")
			.help("Input file, or - for stdin")
			.takes_value(true).required(true))
		.arg(Arg::with_name("signal")
			.short("s").long("signal")
			.takes_value(true)
			.possible_values(&["l1ca", "l5"])
			.default_value("l1ca"))
		.arg(Arg::with_name("prn")
			.short("p").long("prn")
			.takes_value(true))
		.arg(Arg::with_name("channel")
			.short("c").long("channel")
			.takes_value(true)
			.default_value("0"))
		.arg(Arg::with_name("config")
			.long("config")
			.help("JSON telemetry decoder configuration")
			.takes_value(true))
		.arg(Arg::with_name("dump")
			.long("dump")
			.help("Write the binary telemetry dump file"))
		.arg(Arg::with_name("ephemeris_store")
			.long("ephemeris_store")
			.help("JSON ephemeris store to update with decoded ephemerides")
			.takes_value(true))
		.get_matches();

	let mut config = match matches.value_of("config") {
		Some(path) => TelemetryDecoderConfig::from_file(path)?,
		None => TelemetryDecoderConfig::default(),
	};
	if let Some(prn) = matches.value_of("prn") {
		let prn:u32 = prn.parse().map_err(|_| DigSigProcErr::Config(format!("Invalid PRN {}", prn)))?;
		config.satellite = Satellite::gps(prn);
	}
	if matches.is_present("dump") { config.dump = true; }

	let channel_str = matches.value_of("channel").unwrap_or("0");
	let channel:i32 = channel_str.parse().map_err(|_| DigSigProcErr::Config(format!("Invalid channel {}", channel_str)))?;

	let store_path = matches.value_of("ephemeris_store");
	let mut store = match store_path {
		Some(path) => Some(EphemerisStore::load(path)?),
		None => None,
	};

	let input = matches.value_of("input").unwrap_or("-");
	let reader:Box<dyn BufRead> = if input == "-" {
		Box::new(BufReader::new(io::stdin()))
	} else {
		Box::new(BufReader::new(File::open(input)?))
	};
	let src = SynchroSource::new(reader);

	eprintln!("Decoding {} from {} on channel {}", config.satellite, input, channel);
	let summary = match matches.value_of("signal") {
		Some("l5") => decode::<GpsL5, _>(src, &config, channel, store.as_mut()),
		_          => decode::<GpsL1Ca, _>(src, &config, channel, store.as_mut()),
	};

	eprintln!("{} records in, {} records with a valid TOW out", summary.records_in, summary.records_out);
	if let (Some(first), Some(last)) = (summary.first_tow_ms, summary.last_tow_ms) {
		eprintln!("TOW from {:.3} to {:.3} [sec]", (first as f64)/1000.0, (last as f64)/1000.0);
	}

	if let (Some(path), Some(s)) = (store_path, store.as_ref()) {
		s.save(path)?;
		eprintln!("{} new ephemerides, {} total in {}", summary.new_ephemerides, s.len(), path);
	}

	Ok(())
}

fn main() {
	env_logger::init();

	if let Err(e) = run() {
		eprintln!("{}", format!("Error: {}", e).red());
		std::process::exit(1);
	}
}
