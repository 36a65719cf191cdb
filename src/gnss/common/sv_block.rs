
use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use super::{GnssSystem, Satellite};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum SvBlock {
	GPS_IIR,
	GPS_IIR_M,
	GPS_IIF,
	GPS_III,
	BDS_GEO,
	BDS_IGSO,
	BDS_MEO,
	Unknown,
}

impl Default for SvBlock {
	fn default() -> Self { SvBlock::Unknown }
}

/// Immutable PRN to satellite block lookup, built once and shared between channels
#[derive(Debug, Clone, Default)]
pub struct SatelliteBlockTable {
	blocks:HashMap<Satellite, SvBlock>,
}

// GPS constellation status as of early 2020
const GPS_BLOCKS:[SvBlock; 32] = [
	SvBlock::GPS_IIF,   SvBlock::GPS_IIR,   SvBlock::GPS_IIF,   SvBlock::GPS_III,
	SvBlock::GPS_IIR_M, SvBlock::GPS_IIF,   SvBlock::GPS_IIR_M, SvBlock::GPS_IIF,
	SvBlock::GPS_IIF,   SvBlock::GPS_IIF,   SvBlock::GPS_IIR,   SvBlock::GPS_IIR_M,
	SvBlock::GPS_IIR,   SvBlock::GPS_IIR,   SvBlock::GPS_IIR_M, SvBlock::GPS_IIR,
	SvBlock::GPS_IIR_M, SvBlock::GPS_III,   SvBlock::GPS_IIR,   SvBlock::GPS_IIR,
	SvBlock::GPS_IIR,   SvBlock::GPS_IIR,   SvBlock::GPS_III,   SvBlock::GPS_IIF,
	SvBlock::GPS_IIF,   SvBlock::GPS_IIF,   SvBlock::GPS_IIF,   SvBlock::GPS_IIR,
	SvBlock::GPS_IIR_M, SvBlock::GPS_IIF,   SvBlock::GPS_IIR_M, SvBlock::GPS_IIF,
];

impl SatelliteBlockTable {

	pub fn new() -> Self { Self{ blocks: HashMap::new() } }

	/// GPS PRN 1 through 32 and BeiDou PRN 1 through 35
	pub fn with_defaults() -> Self {
		let mut table = Self::new();
		for (i, block) in GPS_BLOCKS.iter().enumerate() {
			table.insert(Satellite::gps((i+1) as u32), *block);
		}
		for prn in 1..=35 {
			let block = match prn {
				1..=5 => SvBlock::BDS_GEO,
				6..=10 | 13 | 16 | 31 => SvBlock::BDS_IGSO,
				_ => SvBlock::BDS_MEO,
			};
			table.insert(Satellite::new(GnssSystem::Beidou, prn), block);
		}
		table
	}

	pub fn insert(&mut self, sat:Satellite, block:SvBlock) { self.blocks.insert(sat, block); }

	pub fn block(&self, sat:&Satellite) -> SvBlock {
		self.blocks.get(sat).copied().unwrap_or(SvBlock::Unknown)
	}

}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn default_lookups() {
		let table = SatelliteBlockTable::with_defaults();
		assert_eq!(table.block(&Satellite::gps(1)),  SvBlock::GPS_IIF);
		assert_eq!(table.block(&Satellite::gps(4)),  SvBlock::GPS_III);
		assert_eq!(table.block(&Satellite::gps(33)), SvBlock::Unknown);
		assert_eq!(table.block(&Satellite::new(GnssSystem::Beidou, 3)),  SvBlock::BDS_GEO);
		assert_eq!(table.block(&Satellite::new(GnssSystem::Beidou, 8)),  SvBlock::BDS_IGSO);
		assert_eq!(table.block(&Satellite::new(GnssSystem::Beidou, 22)), SvBlock::BDS_MEO);
	}

}
