use crate::error::{IsobandError, Result};

/// Conventional fill value marking dry or missing vertices in model output.
pub const DEFAULT_FILL_VALUE: f64 = -99999.0;

/// Unstructured triangular mesh with 0-based connectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    pub fn new(x: Vec<f64>, y: Vec<f64>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(IsobandError::InvalidMesh(format!(
                "{} x coordinates but {} y coordinates",
                x.len(),
                y.len()
            )));
        }
        if let Some(tri) = triangles.iter().find(|t| t.iter().any(|&i| i >= x.len())) {
            return Err(IsobandError::InvalidMesh(format!(
                "triangle {:?} references a vertex outside 0..{}",
                tri,
                x.len()
            )));
        }
        Ok(Self { x, y, triangles })
    }

    /// Build a mesh from 1-based element connectivity as stored in model
    /// output files.
    pub fn from_one_based(x: Vec<f64>, y: Vec<f64>, elements: &[[usize; 3]]) -> Result<Self> {
        let triangles = elements
            .iter()
            .map(|element| -> Result<[usize; 3]> {
                let mut tri = [0usize; 3];
                for (slot, &index) in tri.iter_mut().zip(element) {
                    *slot = index.checked_sub(1).ok_or_else(|| {
                        IsobandError::InvalidMesh(format!(
                            "element {:?} contains index 0 in 1-based connectivity",
                            element
                        ))
                    })?;
                }
                Ok(tri)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(x, y, triangles)
    }

    pub fn vertex_count(&self) -> usize {
        self.x.len()
    }

    /// Copy of the mesh without the triangles that touch an invalid vertex
    /// of `field`.
    pub fn masked(&self, field: &ScalarField) -> Result<TriangleMesh> {
        field.check_size(self.vertex_count())?;

        let triangles: Vec<[usize; 3]> = self
            .triangles
            .iter()
            .filter(|tri| tri.iter().all(|&i| field.is_valid(i)))
            .copied()
            .collect();

        let dropped = self.triangles.len() - triangles.len();
        if dropped > 0 {
            tracing::debug!(dropped, kept = triangles.len(), "Masked triangles with invalid vertices");
        }

        Ok(TriangleMesh {
            x: self.x.clone(),
            y: self.y.clone(),
            triangles,
        })
    }
}

/// One scalar value per mesh vertex, from a single time step.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub values: Vec<f64>,
    pub fill_value: Option<f64>,
}

impl ScalarField {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            fill_value: None,
        }
    }

    pub fn with_fill_value(values: Vec<f64>, fill_value: f64) -> Self {
        Self {
            values,
            fill_value: Some(fill_value),
        }
    }

    /// A vertex is invalid when its value is non-finite or the fill value.
    pub fn is_valid(&self, index: usize) -> bool {
        match self.values.get(index) {
            Some(&v) => v.is_finite() && self.fill_value != Some(v),
            None => false,
        }
    }

    pub fn has_invalid(&self) -> bool {
        (0..self.values.len()).any(|i| !self.is_valid(i))
    }

    /// Minimum and maximum over valid vertices.
    pub fn range(&self) -> Option<(f64, f64)> {
        (0..self.values.len())
            .filter(|&i| self.is_valid(i))
            .map(|i| self.values[i])
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub(crate) fn check_size(&self, vertices: usize) -> Result<()> {
        if self.values.len() != vertices {
            return Err(IsobandError::FieldSizeMismatch {
                expected: vertices,
                found: self.values.len(),
            });
        }
        Ok(())
    }
}

/// `intervals + 1` evenly spaced levels from `min` to `max` inclusive.
pub fn linspace_levels(min: f64, max: f64, intervals: usize) -> Vec<f64> {
    if intervals == 0 {
        return vec![min];
    }
    let step = (max - min) / intervals as f64;
    (0..=intervals)
        .map(|i| if i == intervals { max } else { min + step * i as f64 })
        .collect()
}
