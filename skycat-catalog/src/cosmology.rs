//! Cosmological distance collaborator.
//!
//! The catalog core only needs two pure functions of redshift from a
//! cosmology: the comoving line-of-sight distance and the dimensionless
//! Hubble ratio `E(z) = H(z)/H0`. Anything implementing [`Cosmology`] can
//! drive the sky-coordinate transforms.

use skycat_result::{Error, Result};

/// Hubble distance `c / H0` in Mpc/h.
const HUBBLE_DISTANCE: f64 = 2997.92458;

/// Pure scalar cosmology functions the coordinate transforms require.
pub trait Cosmology: Send + Sync {
    /// Comoving line-of-sight distance to redshift `z`, in Mpc/h.
    fn comoving_distance(&self, z: f64) -> f64;

    /// Dimensionless Hubble ratio `E(z) = H(z)/H0`.
    fn efunc(&self, z: f64) -> f64;
}

/// A flat ΛCDM cosmology: matter plus a cosmological constant, zero
/// curvature.
#[derive(Clone, Copy, Debug)]
pub struct FlatLambdaCdm {
    omega_m: f64,
}

impl FlatLambdaCdm {
    /// `omega_m` is the present-day matter density fraction; the dark
    /// energy fraction is `1 - omega_m`.
    pub fn new(omega_m: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&omega_m) || !omega_m.is_finite() {
            return Err(Error::InvalidArgumentError(format!(
                "omega_m must be in [0, 1], got {omega_m}"
            )));
        }
        Ok(Self { omega_m })
    }

    pub fn omega_m(&self) -> f64 {
        self.omega_m
    }
}

impl Cosmology for FlatLambdaCdm {
    fn comoving_distance(&self, z: f64) -> f64 {
        if z <= 0.0 {
            return 0.0;
        }
        // Composite Simpson quadrature of 1/E over [0, z]. The integrand
        // is smooth, so a fixed even step count is plenty for catalog
        // positioning.
        let steps = 256usize;
        let h = z / steps as f64;
        let f = |z: f64| 1.0 / self.efunc(z);
        let mut acc = f(0.0) + f(z);
        for i in 1..steps {
            let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
            acc += weight * f(i as f64 * h);
        }
        HUBBLE_DISTANCE * acc * h / 3.0
    }

    fn efunc(&self, z: f64) -> f64 {
        let a = 1.0 + z;
        (self.omega_m * a * a * a + (1.0 - self.omega_m)).sqrt()
    }
}
