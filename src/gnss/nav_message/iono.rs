
use std::f64::consts;

use nalgebra::Vector3;
use serde::{Serialize, Deserialize};

use crate::utils::kinematics;

const SECONDS_PER_DAY:f64 = 86400.0;

/// Klobuchar single-frequency ionosphere model.  Coefficients are in the units broadcast by
/// the ICD, i.e. powers of semicircles, not radians.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct IonoModel {
	pub alpha0:f64, pub alpha1:f64, pub alpha2:f64, pub alpha3:f64,
	pub beta0:f64,  pub beta1:f64,  pub beta2:f64,  pub beta3:f64,
}

impl IonoModel {

	/// L1 ionospheric delay [sec] for a signal from sv_ecef to obs_ecef at GPS time t [sec]
	pub fn delay(&self, obs_ecef:&Vector3<f64>, sv_ecef:&Vector3<f64>, t:f64) -> f64 {
		let obs_wgs84 = kinematics::ecef_to_wgs84(obs_ecef);

		// Line of sight in north-east-down
		let r_l = obs_wgs84.dcm_ned_from_ecef() * (sv_ecef - obs_ecef);
		let r_horizontal:f64 = (r_l[0]*r_l[0] + r_l[1]*r_l[1]).sqrt();
		let az:f64 = r_l[1].atan2(r_l[0]);							// [rad]
		let el:f64 = (-r_l[2]).atan2(r_horizontal) / consts::PI;	// [semicircles]

		// IS-GPS-200K, Figure 20-4
		let phi_u:f64 = obs_wgs84.latitude  / consts::PI;			// [semicircles]
		let lam_u:f64 = obs_wgs84.longitude / consts::PI;			// [semicircles]

		let psi:f64 = (0.0137 / (el + 0.11)) - 0.022;				// [semicircles]
		let phi_i:f64 = (phi_u + psi*az.cos()).max(-0.416).min(0.416);
		let lam_i:f64 = lam_u + (psi*az.sin()) / (phi_i*consts::PI).cos();
		let phi_m:f64 = phi_i + 0.064*(consts::PI*(lam_i - 1.617)).cos();

		let t_lcl:f64 = (4.32e4*lam_i + t).rem_euclid(SECONDS_PER_DAY);
		let f_iono:f64 = 1.0 + 16.0*(0.53 - el).powi(3);

		let per:f64 = (self.beta0 + self.beta1*phi_m + self.beta2*phi_m.powi(2) + self.beta3*phi_m.powi(3)).max(72000.0);
		let amp:f64 = (self.alpha0 + self.alpha1*phi_m + self.alpha2*phi_m.powi(2) + self.alpha3*phi_m.powi(3)).max(0.0);
		let x:f64 = 2.0*consts::PI*(t_lcl - 50400.0) / per;			// [rad]

		if x.abs() < 1.57 { f_iono * (5.0e-9 + amp*(1.0 - x.powi(2)/2.0 + x.powi(4)/24.0)) }
		else              { f_iono * 5.0e-9 }
	}

}

#[cfg(test)]
mod tests {

	use super::*;
	use crate::utils::kinematics::WGS84_SEMI_MAJOR_AXIS_METERS;

	#[test]
	fn night_time_zenith_floor() {
		let obs = Vector3::new(WGS84_SEMI_MAJOR_AXIS_METERS, 0.0, 0.0);
		let sv  = Vector3::new(26.0e6, 0.0, 0.0);
		let model = IonoModel::default();
		let expected:f64 = (1.0 + 16.0*0.03_f64.powi(3)) * 5.0e-9;
		assert!((model.delay(&obs, &sv, 0.0) - expected).abs() < 1.0e-15);
	}

	#[test]
	fn afternoon_peak_exceeds_floor() {
		let obs = Vector3::new(WGS84_SEMI_MAJOR_AXIS_METERS, 0.0, 0.0);
		let sv  = Vector3::new(20.0e6, 10.0e6, 5.0e6);
		let model = IonoModel{
			alpha0: 1.118e-8, alpha1: 7.451e-9, alpha2: -5.960e-8, alpha3: -5.960e-8,
			beta0: 90112.0, beta1: 0.0, beta2: -196608.0, beta3: -65536.0,
		};
		let peak  = model.delay(&obs, &sv, 50400.0);
		let night = model.delay(&obs, &sv, 0.0);
		assert!(peak > night);
		// Tens of nanoseconds at most for L1
		assert!(peak > 5.0e-9 && peak < 1.0e-7);
	}

}
