
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Serialize, Deserialize};

use crate::DigSigProcErr;
use crate::gnss::common::SynchroRecord;

pub const DUMP_RECORD_BYTES:usize = 24;

/// One record of the telemetry dump file, written for every valid output symbol
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct DumpRecord {
	pub tow_at_current_symbol_s:f64,
	pub tracking_sample_counter:u64,
	pub tow_at_preamble_s:f64,
}

/// Appends little-endian (f64, u64, f64) records in processing order
pub struct TelemetryDump<W: Write> {
	dst:W,
	records:usize,
}

impl TelemetryDump<Box<dyn Write + Send>> {

	pub fn create<P: AsRef<Path>>(path:P) -> Result<Self, DigSigProcErr> {
		Ok(Self::new(Box::new(BufWriter::new(File::create(path)?))))
	}

}

impl<W: Write> TelemetryDump<W> {

	pub fn new(dst:W) -> Self { Self{ dst, records: 0 } }

	pub fn write(&mut self, rec:&DumpRecord) -> Result<(), DigSigProcErr> {
		self.dst.write_f64::<LittleEndian>(rec.tow_at_current_symbol_s)?;
		self.dst.write_u64::<LittleEndian>(rec.tracking_sample_counter)?;
		self.dst.write_f64::<LittleEndian>(rec.tow_at_preamble_s)?;
		self.records += 1;
		Ok(())
	}

	pub fn flush(&mut self) -> Result<(), DigSigProcErr> { Ok(self.dst.flush()?) }
	pub fn records_written(&self) -> usize { self.records }
	pub fn into_inner(self) -> W { self.dst }

}

/// Reads a telemetry dump back; a trailing partial record ends the iteration
pub struct DumpReader<R: Read> {
	src:R,
	idx:usize,
}

impl DumpReader<BufReader<File>> {

	pub fn open<P: AsRef<Path>>(path:P) -> Result<Self, DigSigProcErr> {
		Ok(Self::new(BufReader::new(File::open(path)?)))
	}

}

impl<R: Read> DumpReader<R> {

	pub fn new(src:R) -> Self { Self{ src, idx: 0 } }

	fn read_record(&mut self) -> std::io::Result<DumpRecord> {
		let tow_at_current_symbol_s = self.src.read_f64::<LittleEndian>()?;
		let tracking_sample_counter = self.src.read_u64::<LittleEndian>()?;
		let tow_at_preamble_s = self.src.read_f64::<LittleEndian>()?;
		Ok(DumpRecord{ tow_at_current_symbol_s, tracking_sample_counter, tow_at_preamble_s })
	}

}

impl<R: Read> Iterator for DumpReader<R> {
	type Item = (DumpRecord, usize);

	fn next(&mut self) -> Option<(DumpRecord, usize)> {
		let rec = self.read_record().ok()?;
		let ans = (rec, self.idx);
		self.idx += 1;
		Some(ans)
	}
}

/// SynchroRecords stored one JSON object per line, as produced by a tracking stage.  Lines that
/// don't parse are logged and skipped.
pub struct SynchroSource<R: BufRead> {
	lines:std::io::Lines<R>,
	line_no:usize,
}

impl<R: BufRead> SynchroSource<R> {

	pub fn new(src:R) -> Self { Self{ lines: src.lines(), line_no: 0 } }

}

impl<R: BufRead> Iterator for SynchroSource<R> {
	type Item = SynchroRecord;

	fn next(&mut self) -> Option<SynchroRecord> {
		loop {
			let line = match self.lines.next()? {
				Ok(line) => line,
				Err(e) => {
					log::warn!("Unable to read synchro record: {}", e);
					return None;
				}
			};
			self.line_no += 1;
			if line.trim().is_empty() { continue; }
			match serde_json::from_str(&line) {
				Ok(rec) => return Some(rec),
				Err(e)  => log::warn!("Skipping line {}: {}", self.line_no, e),
			}
		}
	}
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn dump_records_read_back_in_order() {
		let mut dump = TelemetryDump::new(Vec::new());
		for i in 0..3_u64 {
			dump.write(&DumpRecord{ tow_at_current_symbol_s: 100.0 + (i as f64)*0.01, tracking_sample_counter: 1000 + i, tow_at_preamble_s: 96.0 }).unwrap();
		}
		assert_eq!(dump.records_written(), 3);
		let mut bytes = dump.into_inner();
		assert_eq!(bytes.len(), 3*DUMP_RECORD_BYTES);

		// A truncated trailing record is ignored
		bytes.extend_from_slice(&[0u8; 5]);
		let recs:Vec<(DumpRecord, usize)> = DumpReader::new(&bytes[..]).collect();
		assert_eq!(recs.len(), 3);
		assert_eq!(recs[2].1, 2);
		assert_eq!(recs[2].0.tracking_sample_counter, 1002);
		assert_eq!(recs[1].0.tow_at_current_symbol_s, 100.01);
	}

	#[test]
	fn synchro_source_skips_garbage() {
		let rec = SynchroRecord{ channel_id: 3, prn: 24, tracking_sample_counter: 77, ..SynchroRecord::default() };
		let text = format!("{}\nnot json\n\n{}\n", serde_json::to_string(&rec).unwrap(), serde_json::to_string(&rec).unwrap());
		let parsed:Vec<SynchroRecord> = SynchroSource::new(text.as_bytes()).collect();
		assert_eq!(parsed, vec![rec, rec]);
	}

}
