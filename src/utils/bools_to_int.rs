
use num_traits::{PrimInt, Signed, Unsigned};

use crate::DigSigProcErr;

// Bit slices are MSB first, the order in which navigation message fields are broadcast
fn to_unsigned<T: PrimInt + Unsigned>(bools:&[bool], err:&'static str) -> Result<T, DigSigProcErr> {
	if bools.len() <= T::zero().count_zeros() as usize {
		Ok(bools.iter().fold(T::zero(), |acc, b| (acc << 1) | if *b { T::one() } else { T::zero() }))
	} else {
		Err(DigSigProcErr::InvalidTelemetryData(err))
	}
}

// Two's complement over exactly bools.len() bits
fn to_signed<T: PrimInt + Signed>(bools:&[bool], err:&'static str) -> Result<T, DigSigProcErr> {
	let n = bools.len();
	let width = T::zero().count_zeros() as usize;
	if n == 0 || n > width { return Err(DigSigProcErr::InvalidTelemetryData(err)); }

	// Field sits in the top n bits, then an arithmetic shift brings the sign down with it
	let raw:T = bools.iter().fold(T::zero(), |acc, b| (acc << 1) | if *b { T::one() } else { T::zero() });
	let shift = width - n;
	Ok((raw << shift) >> shift)
}

pub fn to_u8(bools:&[bool])  -> Result<u8,  DigSigProcErr> { to_unsigned(bools, "x.len() > 8 in bools_to_int::to_u8") }
pub fn to_u16(bools:&[bool]) -> Result<u16, DigSigProcErr> { to_unsigned(bools, "x.len() > 16 in bools_to_int::to_u16") }
pub fn to_u32(bools:&[bool]) -> Result<u32, DigSigProcErr> { to_unsigned(bools, "x.len() > 32 in bools_to_int::to_u32") }
pub fn to_u64(bools:&[bool]) -> Result<u64, DigSigProcErr> { to_unsigned(bools, "x.len() > 64 in bools_to_int::to_u64") }

pub fn to_i8(bools:&[bool])  -> Result<i8,  DigSigProcErr> { to_signed(bools, "x.len() not in 1..=8 in bools_to_int::to_i8") }
pub fn to_i16(bools:&[bool]) -> Result<i16, DigSigProcErr> { to_signed(bools, "x.len() not in 1..=16 in bools_to_int::to_i16") }
pub fn to_i32(bools:&[bool]) -> Result<i32, DigSigProcErr> { to_signed(bools, "x.len() not in 1..=32 in bools_to_int::to_i32") }
pub fn to_i64(bools:&[bool]) -> Result<i64, DigSigProcErr> { to_signed(bools, "x.len() not in 1..=64 in bools_to_int::to_i64") }

/// MSB-first expansion of the lowest `n` bits of `x`
pub fn from_u64(x:u64, n:usize) -> Vec<bool> {
	(0..n).map(|i| (x >> (n-i-1)) & 1 == 1).collect()
}

/// Two's complement expansion of `x` truncated to `n` bits
pub fn from_i64(x:i64, n:usize) -> Vec<bool> { from_u64(x as u64, n) }

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn unsigned_fields() {
		assert_eq!(to_u8(&[true, false, false, false, true, false, true, true]), Ok(0x8B));
		assert_eq!(to_u32(&from_u64(100799, 17)), Ok(100799));
		assert!(to_u8(&[false; 9]).is_err());
	}

	#[test]
	fn signed_fields_sign_extend() {
		assert_eq!(to_i8(&[true; 8]), Ok(-1));
		assert_eq!(to_i32(&[true; 22]), Ok(-1));
		assert_eq!(to_i16(&[true, false, false, false, false, false, false, false, false, false, false, false, false, false]), Ok(-8192));
		assert_eq!(to_i64(&from_i64(-3, 33)), Ok(-3));
		assert_eq!(to_i32(&from_i64(i32::MIN as i64, 32)), Ok(i32::MIN));
		assert_eq!(to_i16(&[false, true, true]), Ok(3));
	}

	#[test]
	fn fields_one_bit_narrower_than_the_target() {
		assert_eq!(to_i8(&[true; 7]), Ok(-1));
		assert_eq!(to_i16(&[true; 15]), Ok(-1));
		assert_eq!(to_i8(&from_i64(-64, 7)), Ok(-64));
		assert_eq!(to_i8(&from_i64(63, 7)), Ok(63));
		assert_eq!(to_i16(&from_i64(-100, 15)), Ok(-100));
		assert_eq!(to_i16(&from_i64(-16384, 15)), Ok(-16384));
		assert_eq!(to_i32(&from_i64(-123_456_789, 31)), Ok(-123_456_789));
		assert_eq!(to_i32(&from_i64(-(1 << 30), 31)), Ok(-(1 << 30)));
		assert_eq!(to_i64(&from_i64(-5, 63)), Ok(-5));
		assert_eq!(to_i64(&from_i64(-(1 << 62), 63)), Ok(-(1 << 62)));
		assert_eq!(to_i64(&from_i64(i64::MIN, 64)), Ok(i64::MIN));
	}

}
