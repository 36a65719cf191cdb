
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::DigSigProcErr;
use crate::gnss::common::Satellite;
use super::{Ephemeris, normalize_time};

// Records further than this from t_oe are considered outside their fit interval
pub const MAX_EPHEMERIS_AGE_SEC:f64 = 7200.0;

/// Decoded ephemerides indexed by satellite, week, and IODE
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EphemerisStore {
	//                  SV              week         iode
	records:HashMap<String, HashMap<u32, HashMap<u32, Ephemeris>>>,
}

fn sv_key(sat:&Satellite) -> String { format!("{}{:02}", sat.system.letter(), sat.prn) }

impl EphemerisStore {

	pub fn new() -> Self { Self::default() }

	/// Loads a JSON store, or starts an empty one if the file doesn't exist yet
	pub fn load<P: AsRef<Path>>(path:P) -> Result<Self, DigSigProcErr> {
		match File::open(path) {
			Ok(file) => serde_json::from_reader(BufReader::new(file)).map_err(|e| DigSigProcErr::Config(e.to_string())),
			Err(_)   => Ok(Self::new()),
		}
	}

	pub fn save<P: AsRef<Path>>(&self, path:P) -> Result<(), DigSigProcErr> {
		let file = File::create(path)?;
		serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| DigSigProcErr::Io(e.to_string()))
	}

	/// Returns true if the record wasn't already in the store
	pub fn insert(&mut self, eph:Ephemeris) -> bool {
		let this_week = self.records.entry(sv_key(&eph.satellite)).or_insert_with(HashMap::new)
			.entry(eph.week_number).or_insert_with(HashMap::new);
		match this_week.insert(eph.iode, eph) {
			Some(prev) => prev != eph,
			None       => true,
		}
	}

	pub fn len(&self) -> usize { self.records.values().flat_map(|w| w.values()).map(|i| i.len()).sum() }
	pub fn is_empty(&self) -> bool { self.len() == 0 }

	/// Every record for this satellite and week whose t_oe is within two hours of tow
	pub fn find(&self, sat:&Satellite, week:u32, tow:f64) -> Vec<&Ephemeris> {
		self.records.get(&sv_key(sat)).and_then(|w| w.get(&week))
			.map(|this_week| this_week.values().filter(|eph| normalize_time(tow - eph.t_oe).abs() <= MAX_EPHEMERIS_AGE_SEC).collect())
			.unwrap_or_default()
	}

	/// The record closest in time to tow, if any is within two hours
	pub fn best(&self, sat:&Satellite, week:u32, tow:f64) -> Option<&Ephemeris> {
		self.find(sat, week, tow).into_iter()
			.min_by(|a, b| normalize_time(tow - a.t_oe).abs().total_cmp(&normalize_time(tow - b.t_oe).abs()))
	}

}

#[cfg(test)]
mod tests {

	use super::*;

	fn eph(prn:u32, iode:u32, t_oe:f64) -> Ephemeris {
		Ephemeris{ satellite: Satellite::gps(prn), week_number: 2100, iode, t_oe, sqrt_a: 5153.6, ..Ephemeris::default() }
	}

	#[test]
	fn insert_replaces_and_finds_within_fit() {
		let mut store = EphemerisStore::new();
		assert!(store.insert(eph(5, 10, 7200.0)));
		assert!(!store.insert(eph(5, 10, 7200.0)));
		assert!(store.insert(eph(5, 11, 14400.0)));
		assert_eq!(store.len(), 2);

		assert_eq!(store.find(&Satellite::gps(5), 2100, 10000.0).len(), 2);
		assert_eq!(store.find(&Satellite::gps(5), 2100, 20000.0).len(), 1);
		assert!(store.find(&Satellite::gps(6), 2100, 10000.0).is_empty());
		assert_eq!(store.best(&Satellite::gps(5), 2100, 13000.0).map(|e| e.iode), Some(11));
	}

	#[test]
	fn json_round_trip() {
		let path = std::env::temp_dir().join(format!("gnss_tlm_store_{}.json", std::process::id()));
		let mut store = EphemerisStore::new();
		store.insert(eph(12, 3, 0.0));
		store.save(&path).unwrap();

		let reloaded = EphemerisStore::load(&path).unwrap();
		assert_eq!(reloaded.find(&Satellite::gps(12), 2100, 100.0)[0], &eph(12, 3, 0.0));
		std::fs::remove_file(&path).unwrap();
	}

}
