
use thiserror::Error;

pub mod block;

pub mod io;
pub mod gnss;

pub mod utils;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum DigSigProcErr {
	#[error("invalid telemetry data: {0}")]
	InvalidTelemetryData(&'static str),
	#[error("configuration error: {0}")]
	Config(String),
	#[error("i/o error: {0}")]
	Io(String),
	#[error("{0}")]
	Other(&'static str),
}

impl From<std::io::Error> for DigSigProcErr {
	fn from(e:std::io::Error) -> Self { DigSigProcErr::Io(e.to_string()) }
}
