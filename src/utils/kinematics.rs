
use nalgebra::{Matrix3, Vector3};

pub const WGS84_SEMI_MAJOR_AXIS_METERS:f64 = 6378137.0;
pub const WGS84_SEMI_MINOR_AXIS_METERS:f64 = 6356752.314245;

#[derive(Debug, Clone, Copy)]
pub struct PositionWGS84 {
	pub latitude:f64,
	pub longitude:f64,
	pub height_above_ellipsoid:f64,
}

impl PositionWGS84 {

	// Rows are the north, east, and down axes expressed in ECEF
	pub fn dcm_ned_from_ecef(&self) -> Matrix3<f64> {
		let (phi, lam) = (self.latitude, self.longitude);
		Matrix3::new(-phi.sin()*lam.cos(), -phi.sin()*lam.sin(),  phi.cos(),
		             -lam.sin(),            lam.cos(),            0.0,
		             -phi.cos()*lam.cos(), -phi.cos()*lam.sin(), -phi.sin())
	}

}

/// Bowring's closed-form approximation; sub-millimeter for terrestrial heights
pub fn ecef_to_wgs84(p_e:&Vector3<f64>) -> PositionWGS84 {
	let (e1, e2, e3) = (p_e[0], p_e[1], p_e[2]);
	let a_sq:f64 = WGS84_SEMI_MAJOR_AXIS_METERS.powi(2);
	let b_sq:f64 = WGS84_SEMI_MINOR_AXIS_METERS.powi(2);

	let e_sq:f64  = (a_sq - b_sq) / a_sq;
	let ep_sq:f64 = (a_sq - b_sq) / b_sq;

	let p:f64 = (e1*e1 + e2*e2).sqrt();
	let r:f64 = (p*p   + e3*e3).sqrt();

	let beta:f64 = (((WGS84_SEMI_MINOR_AXIS_METERS*e3)/(WGS84_SEMI_MAJOR_AXIS_METERS*p)) * (1.0 + ep_sq*(WGS84_SEMI_MINOR_AXIS_METERS/r))).atan();

	let latitude:f64 = {
		let num:f64 = e3 + (ep_sq * WGS84_SEMI_MINOR_AXIS_METERS * beta.sin().powi(3));
		let denom:f64 = p - (e_sq * WGS84_SEMI_MAJOR_AXIS_METERS * beta.cos().powi(3));
		num.atan2(denom)
	};
	let longitude:f64 = e2.atan2(e1);

	let v = WGS84_SEMI_MAJOR_AXIS_METERS / (1.0 - (e_sq*latitude.sin().powi(2))).sqrt();
	let height_above_ellipsoid = p*latitude.cos() + e3*latitude.sin() - (WGS84_SEMI_MAJOR_AXIS_METERS.powi(2) / v);

	PositionWGS84{ latitude, longitude, height_above_ellipsoid }
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn equator_and_pole() {
		let eq = ecef_to_wgs84(&Vector3::new(WGS84_SEMI_MAJOR_AXIS_METERS + 100.0, 0.0, 0.0));
		assert!(eq.latitude.abs() < 1.0e-12);
		assert!(eq.longitude.abs() < 1.0e-12);
		assert!((eq.height_above_ellipsoid - 100.0).abs() < 1.0e-6);

		let pole = ecef_to_wgs84(&Vector3::new(1.0e-3, 0.0, WGS84_SEMI_MINOR_AXIS_METERS + 50.0));
		assert!((pole.latitude - std::f64::consts::FRAC_PI_2).abs() < 1.0e-9);
		assert!((pole.height_above_ellipsoid - 50.0).abs() < 1.0e-3);
	}

}
