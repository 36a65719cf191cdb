
use serde::{Serialize, Deserialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::gnss::ephemeris::Ephemeris;

pub mod iono;
pub mod utc;

pub use iono::IonoModel;
pub use utc::UtcModel;

/// Everything a frame decoder can publish on the telemetry port
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum NavMessage {
	Ephemeris(Ephemeris),
	Iono(IonoModel),
	UtcModel(UtcModel),
}

/// Signals sent back to the tracking stage on the telemetry_to_trk port
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TrackingControl {
	TelemetryFailed,
}

impl TrackingControl {

	pub fn code(&self) -> i32 {
		match self {
			TrackingControl::TelemetryFailed => 1,
		}
	}

}

/// Outbound ports of one telemetry decoder.  Either port may be left unconnected, in which case
/// messages sent to it are dropped.
#[derive(Debug, Clone, Default)]
pub struct MessagePorts {
	pub telemetry:Option<UnboundedSender<NavMessage>>,
	pub telemetry_to_trk:Option<UnboundedSender<TrackingControl>>,
}

impl MessagePorts {

	pub fn unconnected() -> Self { Self::default() }

	/// Ports along with the receiving ends of both channels
	pub fn connected() -> (Self, UnboundedReceiver<NavMessage>, UnboundedReceiver<TrackingControl>) {
		let (tlm_tx, tlm_rx) = mpsc::unbounded_channel();
		let (trk_tx, trk_rx) = mpsc::unbounded_channel();
		(Self{ telemetry: Some(tlm_tx), telemetry_to_trk: Some(trk_tx) }, tlm_rx, trk_rx)
	}

	pub fn publish(&self, msg:NavMessage) {
		if let Some(tx) = &self.telemetry {
			if tx.send(msg).is_err() { log::debug!("telemetry port closed, dropping {:?}", msg); }
		}
	}

	pub fn signal_tracking(&self, ctrl:TrackingControl) {
		if let Some(tx) = &self.telemetry_to_trk {
			if tx.send(ctrl).is_err() { log::debug!("telemetry_to_trk port closed, dropping {:?}", ctrl); }
		}
	}

}
