//! Mock catalog constructors for testing and examples.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skycat_lazy::LazyValue;
use skycat_result::{Error, Result};

use crate::source::CatalogSource;

/// A catalog of particles at uniform random positions in a periodic box.
///
/// Columns: `Position` uniform in `[0, box_size)^3`, `Velocity` uniform in
/// `[0, box_size/100)^3`, `Mass` log-uniform in `[1e12, 1e15]`. Attrs:
/// `BoxSize` (per-side vector) and `Seed`. Deterministic for a fixed seed.
pub struct UniformCatalog;

impl UniformCatalog {
    pub fn new(size: usize, box_size: f64, seed: u64) -> Result<CatalogSource> {
        if box_size <= 0.0 || !box_size.is_finite() {
            return Err(Error::InvalidArgumentError(format!(
                "box size must be positive and finite, got {box_size}"
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);

        let positions: Vec<f64> = (0..size * 3)
            .map(|_| rng.random_range(0.0..box_size))
            .collect();
        let velocities: Vec<f64> = (0..size * 3)
            .map(|_| rng.random_range(0.0..box_size / 100.0))
            .collect();
        let masses: Vec<f64> = (0..size)
            .map(|_| 10f64.powf(rng.random_range(12.0..15.0)))
            .collect();

        let mut source = CatalogSource::new(size);
        source.set("Position", LazyValue::from_vector_rows(positions, 3)?)?;
        source.set("Velocity", LazyValue::from_vector_rows(velocities, 3)?)?;
        source.set("Mass", masses)?;
        source
            .attrs_mut()
            .insert("BoxSize".into(), [box_size, box_size, box_size].into());
        source.attrs_mut().insert("Seed".into(), (seed as i64).into());
        Ok(source)
    }
}
