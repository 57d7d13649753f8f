//! Pure transform functions over lazy columns.
//!
//! Each function builds a new graph node from its inputs without touching
//! catalog internals; the result can be assigned back to a catalog or
//! materialized directly via `CatalogSource::compute`.

use std::f64::consts::PI;
use std::sync::Arc;

use skycat_lazy::LazyValue;
use skycat_result::{Error, Result};

use crate::cosmology::Cosmology;

/// Stack N rank-1 columns of equal length into a single `(size, N)` vector
/// column: row i, component j is element i of the j-th input.
pub fn stack_columns(columns: &[LazyValue]) -> Result<LazyValue> {
    LazyValue::stack(columns)
}

/// Dot product of each row of a `(size, k)` vector column with `axis`,
/// normalized to a unit vector, yielding a rank-1 column of length `size`.
/// Used to project a 3-vector field onto a line of sight.
pub fn vector_projection(vector: &LazyValue, axis: &[f64]) -> Result<LazyValue> {
    let width = vector.width().ok_or_else(|| {
        Error::ShapeMismatch("vector_projection requires a vector column".into())
    })?;
    if axis.len() != width {
        return Err(Error::ShapeMismatch(format!(
            "axis has {} components but the vector column has width {width}",
            axis.len()
        )));
    }
    let norm = axis.iter().map(|a| a * a).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return Err(Error::InvalidArgumentError(
            "projection axis must be a finite non-zero vector".into(),
        ));
    }

    let mut acc = vector.component(0)?.mul_scalar(axis[0] / norm)?;
    for (j, a) in axis.iter().enumerate().skip(1) {
        acc = acc.add(&vector.component(j)?.mul_scalar(a / norm)?)?;
    }
    Ok(acc)
}

fn angles_to_radians(ra: &LazyValue, dec: &LazyValue, degrees: bool) -> Result<(LazyValue, LazyValue)> {
    if ra.is_vector() || dec.is_vector() {
        return Err(Error::ShapeMismatch(
            "sky coordinates must be rank-1 columns".into(),
        ));
    }
    if ra.len() != dec.len() {
        return Err(Error::ShapeMismatch(format!(
            "ra has {} rows but dec has {}",
            ra.len(),
            dec.len()
        )));
    }
    if degrees {
        Ok((ra.mul_scalar(PI / 180.0)?, dec.mul_scalar(PI / 180.0)?))
    } else {
        Ok((ra.clone(), dec.clone()))
    }
}

/// Unit vectors on the sphere from right ascension and declination,
/// as a `(size, 3)` column.
pub fn sky_to_unit_sphere(ra: &LazyValue, dec: &LazyValue, degrees: bool) -> Result<LazyValue> {
    let (ra, dec) = angles_to_radians(ra, dec, degrees)?;
    let cos_dec = dec.cos()?;
    let x = cos_dec.mul(&ra.cos()?)?;
    let y = cos_dec.mul(&ra.sin()?)?;
    let z = dec.sin()?;
    LazyValue::stack(&[x, y, z])
}

/// Comoving Cartesian positions (Mpc/h) from sky coordinates and redshift,
/// as a `(size, 3)` column.
///
/// `degrees` controls whether `ra`/`dec` are interpreted in degrees
/// (converted to radians internally) or radians directly. The cosmology's
/// comoving-distance function enters the graph as an opaque element-wise
/// map over the redshift column, so the transform stays fully lazy.
pub fn sky_to_cartesian(
    ra: &LazyValue,
    dec: &LazyValue,
    redshift: &LazyValue,
    cosmology: Arc<dyn Cosmology>,
    degrees: bool,
) -> Result<LazyValue> {
    if redshift.is_vector() {
        return Err(Error::ShapeMismatch("redshift must be a rank-1 column".into()));
    }
    if redshift.len() != ra.len() {
        return Err(Error::ShapeMismatch(format!(
            "ra has {} rows but redshift has {}",
            ra.len(),
            redshift.len()
        )));
    }
    let unit = sky_to_unit_sphere(ra, dec, degrees)?;
    let r = redshift.map(move |z| cosmology.comoving_distance(z))?;
    unit.mul(&r)
}
