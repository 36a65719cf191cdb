
use std::f64::consts;

use nalgebra::Vector3;
use serde::{Serialize, Deserialize};

use crate::gnss::common::{GnssSystem, Satellite, SvBlock};

pub mod store;


pub const HALF_WEEK:f64 = 302400.0;			// [sec]
pub const TWO_PI:f64 = 2.0 * consts::PI;

pub const MAX_KEPLER_ITERATIONS:usize = 20;
pub const KEPLER_TOLERANCE:f64 = 1.0e-12;	// [rad]

// Fixed-point refinements of the clock polynomial argument in clock_drift
const CLOCK_DRIFT_ITERATIONS:usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConstants {
	pub gm:f64,			// [m^3/s^2] earth's gravitational constant
	pub omega_e:f64,	// [rad/s] earth's rotation rate
	pub f:f64,			// [sec/root-meter] relativistic correction constant
	pub c:f64,			// [m/s] speed of light
}

// IS-GPS-200K, 20.3.3.4.3
pub const GPS_ORBIT:OrbitConstants = OrbitConstants{ gm: 3.986005e14, omega_e: 7.2921151467e-5, f: -4.442807633e-10, c: 2.99792458e8 };

// Galileo OS SIS ICD, 5.1.1
pub const GALILEO_ORBIT:OrbitConstants = OrbitConstants{ gm: 3.986004418e14, omega_e: 7.2921151467e-5, f: -4.442807309e-10, c: 2.99792458e8 };

// BDS-SIS-ICD-B3I, 5.2.4.9
pub const BEIDOU_ORBIT:OrbitConstants = OrbitConstants{ gm: 3.986004418e14, omega_e: 7.2921150e-5, f: -4.442807309e-10, c: 2.99792458e8 };

/// Broadcast orbit and clock parameters for one satellite.  Angles are radians and times are
/// seconds of the system week; records are replaced when a new set arrives, never patched.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Ephemeris {
	pub satellite:Satellite, pub sv_block:SvBlock,
	pub week_number:u32, pub iode:u32,    pub iodc:u32,    pub sv_health:u8,
	pub t_gd:f64,        pub t_oc:f64,    pub a_f0:f64,    pub a_f1:f64,    pub a_f2:f64,
	pub t_oe:f64,        pub sqrt_a:f64,  pub delta_n:f64, pub m0:f64,
	pub e:f64,           pub omega:f64,   pub omega0:f64,  pub omega_dot:f64,
	pub cus:f64,         pub cuc:f64,     pub crs:f64,     pub crc:f64,
	pub cis:f64,         pub cic:f64,     pub i0:f64,      pub idot:f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
	pub eccentric_anomaly:f64,
	pub iterations:usize,
	pub converged:bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
	pub position:Vector3<f64>,		// [m] ECEF
	pub velocity:Vector3<f64>,		// [m/s] ECEF
	pub clock_bias:f64,				// [sec] including the relativistic term
	pub relativistic:f64,			// [sec]
	pub eccentric_anomaly:f64,		// [rad]
	pub true_anomaly:f64,			// [rad]
}

/// Wraps a time difference into [-HALF_WEEK, HALF_WEEK] to account for week rollover
pub fn normalize_time(t:f64) -> f64 {
	if      t >  HALF_WEEK { t - 2.0*HALF_WEEK }
	else if t < -HALF_WEEK { t + 2.0*HALF_WEEK }
	else                   { t }
}

/// Reduces an angle to [0, 2*pi) regardless of its sign
pub fn reduce_angle(x:f64) -> f64 { (x + TWO_PI).rem_euclid(TWO_PI) }

/// Solves E = M + e*sin(E) by fixed-point iteration.  Failing to converge within
/// MAX_KEPLER_ITERATIONS is not an error; the last iterate is returned.
pub fn solve_kepler(m:f64, e:f64) -> KeplerSolution {
	let mut ek:f64 = m;
	for iterations in 1..=MAX_KEPLER_ITERATIONS {
		let ek_prev = ek;
		ek = m + e*ek.sin();
		if ((ek - ek_prev) % TWO_PI).abs() < KEPLER_TOLERANCE {
			return KeplerSolution{ eccentric_anomaly: ek, iterations, converged: true };
		}
	}
	KeplerSolution{ eccentric_anomaly: ek, iterations: MAX_KEPLER_ITERATIONS, converged: false }
}

impl Ephemeris {

	pub fn orbit_constants(&self) -> OrbitConstants {
		match self.satellite.system {
			GnssSystem::Galileo => GALILEO_ORBIT,
			GnssSystem::Beidou  => BEIDOU_ORBIT,
			_                   => GPS_ORBIT,
		}
	}

	// Semi-major axis, corrected mean motion, and mean anomaly in [0, 2*pi) at tk seconds from t_oe
	fn mean_anomaly(&self, tk:f64) -> (f64, f64, f64) {
		let a:f64 = self.sqrt_a * self.sqrt_a;
		let n0:f64 = (self.orbit_constants().gm / (a * a * a)).sqrt();
		let n:f64 = n0 + self.delta_n;
		(a, n, reduce_angle(self.m0 + n*tk))
	}

	/// SV clock correction polynomial evaluated at the transmit time
	pub fn clock_drift(&self, transmit_time:f64) -> f64 {
		let mut dt:f64 = normalize_time(transmit_time - self.t_oc);
		for _ in 0..CLOCK_DRIFT_ITERATIONS {
			dt -= self.a_f0 + self.a_f1*dt + self.a_f2*dt*dt;
		}
		self.a_f0 + self.a_f1*dt + self.a_f2*dt*dt
	}

	pub fn relativistic_correction(&self, transmit_time:f64) -> f64 {
		let tk:f64 = normalize_time(transmit_time - self.t_oe);
		let (_, _, mk) = self.mean_anomaly(tk);
		let ek:f64 = solve_kepler(mk, self.e).eccentric_anomaly;
		self.orbit_constants().f * self.e * self.sqrt_a * ek.sin()
	}

	/// ECEF position and velocity at the transmit time along with the SV clock bias,
	/// following IS-GPS-200K Table 20-IV and the velocity terms of Table 30-II
	pub fn satellite_position(&self, transmit_time:f64) -> SolverResult {
		let k = self.orbit_constants();

		let tk:f64 = normalize_time(transmit_time - self.t_oe);
		let (a, n, mk) = self.mean_anomaly(tk);
		let ek:f64 = solve_kepler(mk, self.e).eccentric_anomaly;

		let (sin_e, cos_e) = ek.sin_cos();
		let one_minus_ecos:f64 = 1.0 - self.e*cos_e;
		let sqrt_one_minus_esq:f64 = (1.0 - self.e*self.e).sqrt();

		// True anomaly and argument of latitude
		let nu_k:f64 = (sqrt_one_minus_esq * sin_e).atan2(cos_e - self.e);
		let phi_k:f64 = reduce_angle(nu_k + self.omega);
		let (sin_2phi, cos_2phi) = (2.0*phi_k).sin_cos();

		// Second harmonic perturbations
		let du_k:f64 = self.cus*sin_2phi + self.cuc*cos_2phi;
		let dr_k:f64 = self.crs*sin_2phi + self.crc*cos_2phi;
		let di_k:f64 = self.cis*sin_2phi + self.cic*cos_2phi;

		let u_k:f64 = phi_k + du_k;
		let r_k:f64 = a*one_minus_ecos + dr_k;
		let i_k:f64 = self.i0 + di_k + self.idot*tk;

		// Position in the orbital plane
		let (sin_u, cos_u) = u_k.sin_cos();
		let x_kp:f64 = r_k * cos_u;
		let y_kp:f64 = r_k * sin_u;

		// Longitude of the ascending node, corrected for earth rotation
		let omega_dot_k:f64 = self.omega_dot - k.omega_e;
		let omega_k:f64 = reduce_angle(self.omega0 + omega_dot_k*tk - k.omega_e*self.t_oe);
		let (sin_o, cos_o) = omega_k.sin_cos();
		let (sin_i, cos_i) = i_k.sin_cos();

		let position = Vector3::new(
			x_kp*cos_o - y_kp*cos_i*sin_o,
			x_kp*sin_o + y_kp*cos_i*cos_o,
			y_kp*sin_i);

		// Rates
		let ek_dot:f64 = n / one_minus_ecos;
		let nu_dot:f64 = ek_dot * sqrt_one_minus_esq / one_minus_ecos;
		let u_dot:f64 = nu_dot * (1.0 + 2.0*(self.cus*cos_2phi - self.cuc*sin_2phi));
		let r_dot:f64 = a*self.e*sin_e*ek_dot + 2.0*nu_dot*(self.crs*cos_2phi - self.crc*sin_2phi);
		let i_dot:f64 = self.idot + 2.0*nu_dot*(self.cis*cos_2phi - self.cic*sin_2phi);

		let x_kp_dot:f64 = r_dot*cos_u - y_kp*u_dot;
		let y_kp_dot:f64 = r_dot*sin_u + x_kp*u_dot;

		let velocity = Vector3::new(
			-x_kp*omega_dot_k*sin_o + x_kp_dot*cos_o - y_kp_dot*sin_o*cos_i - y_kp*(omega_dot_k*cos_o*cos_i - i_dot*sin_o*sin_i),
			 x_kp*omega_dot_k*cos_o + x_kp_dot*sin_o + y_kp_dot*cos_o*cos_i - y_kp*(omega_dot_k*sin_o*cos_i + i_dot*cos_o*sin_i),
			 y_kp_dot*sin_i + y_kp*i_dot*cos_i);

		// Clock bias relative to t_oc, including the relativistic term
		let tc:f64 = normalize_time(transmit_time - self.t_oc);
		let relativistic:f64 = -2.0 * (k.gm * a).sqrt() * self.e * sin_e / (k.c * k.c);
		let clock_bias:f64 = self.a_f0 + self.a_f1*tc + self.a_f2*tc*tc + relativistic;

		SolverResult{ position, velocity, clock_bias, relativistic, eccentric_anomaly: ek, true_anomaly: nu_k }
	}

}
