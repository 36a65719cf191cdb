
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Serialize, Deserialize};

use crate::gnss::common::SynchroRecord;

/// Latest navigation solution summary.  An rx_time of -1 means no solution is available yet.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PvtStatus {
	pub rx_time:f64,						// [sec]
	pub week:u32,
	pub tow_at_current_symbol_ms:u32,
	pub position_ecef:[f64; 3],				// [m]
	pub velocity_ecef:[f64; 3],				// [m/s]
	pub clock_bias_s:f64,
	pub valid_satellites:u32,
}

impl Default for PvtStatus {
	fn default() -> Self {
		Self{ rx_time: -1.0, week: 0, tow_at_current_symbol_ms: 0, position_ecef: [0.0; 3], velocity_ecef: [0.0; 3],
			clock_bias_s: 0.0, valid_satellites: 0 }
	}
}

impl PvtStatus {

	pub fn is_available(&self) -> bool { self.rx_time >= 0.0 }

}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum StatusMessage {
	Synchro(SynchroRecord),
	Pvt(PvtStatus),
}

#[derive(Debug, Default)]
struct Status {
	channels:BTreeMap<i32, SynchroRecord>,
	pvt:PvtStatus,
}

/// Keeps the latest record of every channel with a valid pseudorange, plus the latest PVT
/// status.  Every access takes the same lock, so one monitor can be shared through an Arc.
#[derive(Debug, Default)]
pub struct ChannelStatusMonitor {
	status:Mutex<Status>,
}

impl ChannelStatusMonitor {

	pub fn new() -> Self { Self::default() }

	// A panic while holding the lock leaves the maps themselves consistent
	fn lock(&self) -> MutexGuard<Status> {
		match self.status.lock() {
			Ok(guard) => guard,
			Err(poisoned) => poisoned.into_inner(),
		}
	}

	pub fn handle(&self, msg:StatusMessage) {
		let mut status = self.lock();
		match msg {
			StatusMessage::Synchro(rec) => {
				if rec.flag_valid_pseudorange {
					status.channels.insert(rec.channel_id, rec);
				} else {
					status.channels.remove(&rec.channel_id);
				}
			},
			StatusMessage::Pvt(pvt) => status.pvt = pvt,
		}
	}

	/// Handles a JSON-encoded status message, ignoring anything that is not one
	pub fn handle_json(&self, text:&str) {
		match serde_json::from_str::<StatusMessage>(text) {
			Ok(msg) => self.handle(msg),
			Err(e)  => log::warn!("Channel status monitor received an unknown object type: {}", e),
		}
	}

	pub fn current_status_map(&self) -> BTreeMap<i32, SynchroRecord> { self.lock().channels.clone() }

	pub fn current_status_pvt(&self) -> PvtStatus { self.lock().pvt }

}

#[cfg(test)]
mod tests {

	use std::sync::Arc;
	use std::thread;

	use super::*;

	fn record(channel_id:i32, valid:bool, doppler:f64) -> SynchroRecord {
		SynchroRecord{ channel_id, flag_valid_pseudorange: valid, carrier_doppler_hz: doppler, ..SynchroRecord::default() }
	}

	#[test]
	fn valid_records_inserted_and_invalid_erased() {
		let monitor = ChannelStatusMonitor::new();
		monitor.handle(StatusMessage::Synchro(record(3, true, 1200.0)));
		monitor.handle(StatusMessage::Synchro(record(5, true, -800.0)));
		monitor.handle(StatusMessage::Synchro(record(3, true, 1210.0)));

		let map = monitor.current_status_map();
		assert_eq!(map.len(), 2);
		assert_eq!(map[&3].carrier_doppler_hz, 1210.0);

		monitor.handle(StatusMessage::Synchro(record(3, false, 0.0)));
		monitor.handle(StatusMessage::Synchro(record(9, false, 0.0)));
		assert_eq!(monitor.current_status_map().keys().cloned().collect::<Vec<i32>>(), vec![5]);
	}

	#[test]
	fn pvt_unavailable_until_received() {
		let monitor = ChannelStatusMonitor::new();
		assert!(!monitor.current_status_pvt().is_available());

		let pvt = PvtStatus{ rx_time: 388800.07, week: 2205, valid_satellites: 7, ..PvtStatus::default() };
		monitor.handle(StatusMessage::Pvt(pvt));
		assert_eq!(monitor.current_status_pvt(), pvt);
		assert!(monitor.current_status_pvt().is_available());
	}

	#[test]
	fn json_messages_and_garbage() {
		let monitor = ChannelStatusMonitor::new();
		let text = serde_json::to_string(&StatusMessage::Synchro(record(1, true, 10.0))).unwrap();
		monitor.handle_json(&text);
		monitor.handle_json("{\"Almanac\": 4}");
		assert_eq!(monitor.current_status_map().len(), 1);
	}

	#[test]
	fn shared_between_threads() {
		let monitor = Arc::new(ChannelStatusMonitor::new());
		let handles:Vec<thread::JoinHandle<()>> = (0..4).map(|t| {
			let m = monitor.clone();
			thread::spawn(move || {
				for ch in 0..25 { m.handle(StatusMessage::Synchro(record(t*25 + ch, true, 0.0))); }
			})
		}).collect();
		for h in handles { h.join().unwrap(); }
		assert_eq!(monitor.current_status_map().len(), 100);
	}

}
