
use clap::{Arg, App};
use colored::*;
use regex::Regex;

use gnss_tlm::DigSigProcErr;
use gnss_tlm::gnss::common::Satellite;
use gnss_tlm::gnss::ephemeris::store::EphemerisStore;

fn run() -> Result<(), DigSigProcErr> {

	let matches = App::new("GPS Ephemerides")
		.version("0.1.0")
		.about("Loads GPS ephemerides stored in JSON format and evaluates satellite position, velocity, and clock")
		.arg(Arg::with_name("json_file")
			.long("json_file")
			.help("JSON file used to store ephemerides data")
			.takes_value(true).required(true))
		.arg(Arg::with_name("ecef")
			.long("ecef")
			.help("Query of the form prn=22,week=2205,tow=324906.741")
			.takes_value(true))
		.get_matches();

	let json_filename:&str = matches.value_of("json_file").unwrap_or_default();
	let store = EphemerisStore::load(json_filename)?;
	eprintln!("Loaded {} ephemerides from {}", store.len(), json_filename);

	if let Some(ecef_request) = matches.value_of("ecef") {
		let re = Regex::new(r"prn=(\d+),week=(\d+),tow=(\d+(?:\.\d+)?)").map_err(|_| DigSigProcErr::Other("Invalid query pattern"))?;
		let capts = re.captures(ecef_request).ok_or_else(|| DigSigProcErr::Config(format!("Unable to parse query {}", ecef_request)))?;

		let bad_query = |_| DigSigProcErr::Config(format!("Unable to parse query {}", ecef_request));
		let prn:u32 = capts[1].parse().map_err(bad_query)?;
		let week:u32 = capts[2].parse().map_err(bad_query)?;
		let tow:f64 = capts[3].parse().map_err(|_| DigSigProcErr::Config(format!("Unable to parse query {}", ecef_request)))?;
		let sat = Satellite::gps(prn);
		println!("Finding ECEF for {} at {} [sec] of week {}", sat, tow, week);

		let ephs = store.find(&sat, week, tow);
		if ephs.is_empty() {
			println!("{}", format!("No ephemeris data within two hours for {} during week {}", sat, week).yellow());
		}
		for eph in ephs {
			let soln = eph.satellite_position(tow);
			println!("{}", format!("IODE {} (t_oe {:.0} [sec])", eph.iode, eph.t_oe).green());
			println!("  position [m]:   {:.3} {:.3} {:.3}", soln.position[0], soln.position[1], soln.position[2]);
			println!("  velocity [m/s]: {:.4} {:.4} {:.4}", soln.velocity[0], soln.velocity[1], soln.velocity[2]);
			println!("  clock bias [s]: {:.12e} (relativistic {:.3e})", soln.clock_bias, soln.relativistic);
		}
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
