
use std::fmt;

use serde::{Serialize, Deserialize};

pub mod sv_block;
pub mod synchro;

pub use sv_block::{SatelliteBlockTable, SvBlock};
pub use synchro::SynchroRecord;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GnssSystem {
	Gps,
	Galileo,
	Beidou,
	Glonass,
}

impl GnssSystem {

	pub fn letter(&self) -> char {
		match self {
			GnssSystem::Gps     => 'G',
			GnssSystem::Galileo => 'E',
			GnssSystem::Beidou  => 'C',
			GnssSystem::Glonass => 'R',
		}
	}

}

impl Default for GnssSystem {
	fn default() -> Self { GnssSystem::Gps }
}

impl fmt::Display for GnssSystem {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			GnssSystem::Gps     => "GPS",
			GnssSystem::Galileo => "Galileo",
			GnssSystem::Beidou  => "Beidou",
			GnssSystem::Glonass => "Glonass",
		};
		write!(f, "{}", name)
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Satellite {
	pub system:GnssSystem,
	pub prn:u32,
}

impl Satellite {

	pub fn new(system:GnssSystem, prn:u32) -> Self { Self{ system, prn } }
	pub fn gps(prn:u32) -> Self { Self::new(GnssSystem::Gps, prn) }

}

impl fmt::Display for Satellite {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} PRN {:02}", self.system, self.prn)
	}
}
