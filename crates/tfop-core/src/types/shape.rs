//! Partially known tensor shapes.
//!
//! A shape either has an unknown rank, or a known rank with dimensions that are each
//! known (`>= 0`) or unknown (`-1`). Scalar (rank 0) and unknown rank are distinct.

use std::fmt;

use thiserror::Error as ThisError;

use crate::constants::{UNKNOWN_DIM, UNKNOWN_RANK};
use crate::error::{BridgeError, Result};

/// Tensor shape with optional rank and per-dimension knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: Option<Vec<i64>>,
}

/// Two shapes that cannot describe the same tensor.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("shapes {left} and {right} are incompatible: {reason}")]
pub struct ShapeConflict {
    pub left: Shape,
    pub right: Shape,
    pub reason: String,
}

impl Shape {
    /// Shape with unknown rank.
    pub fn unknown() -> Self {
        Self { dims: None }
    }

    /// Rank-0 shape.
    pub fn scalar() -> Self {
        Self {
            dims: Some(Vec::new()),
        }
    }

    /// Known-rank shape. Negative entries are treated as unknown dimensions.
    pub fn known(dims: impl Into<Vec<i64>>) -> Self {
        let dims = dims
            .into()
            .into_iter()
            .map(|dim| if dim < 0 { UNKNOWN_DIM } else { dim })
            .collect();
        Self { dims: Some(dims) }
    }

    /// Decodes the `dims[] + rank` wire encoding.
    ///
    /// `rank == -1` requires empty `dims` and yields an unknown-rank shape; otherwise
    /// `dims.len()` must equal `rank` and every dimension must be `>= -1`.
    pub fn from_wire(dims: &[i64], rank: i32) -> Result<Self> {
        if rank == UNKNOWN_RANK {
            if !dims.is_empty() {
                return Err(BridgeError::invalid_argument(format!(
                    "unknown rank (-1) given together with {} dimensions",
                    dims.len()
                )));
            }
            return Ok(Self::unknown());
        }
        if rank < 0 {
            return Err(BridgeError::invalid_argument(format!(
                "rank must be -1 or non-negative, got {rank}"
            )));
        }
        if dims.len() != rank as usize {
            return Err(BridgeError::invalid_argument(format!(
                "rank {rank} does not match {} dimensions",
                dims.len()
            )));
        }
        if let Some(bad) = dims.iter().find(|dim| **dim < UNKNOWN_DIM) {
            return Err(BridgeError::invalid_argument(format!(
                "dimension {bad} is invalid; expected -1 or a non-negative size"
            )));
        }
        Ok(Self {
            dims: Some(dims.to_vec()),
        })
    }

    /// Wire encoding for reads: `None` means unknown rank.
    pub fn to_wire(&self) -> Option<Vec<i64>> {
        self.dims.clone()
    }

    pub fn rank(&self) -> Option<usize> {
        self.dims.as_ref().map(Vec::len)
    }

    pub fn dims(&self) -> Option<&[i64]> {
        self.dims.as_deref()
    }

    pub fn is_unknown(&self) -> bool {
        self.dims.is_none()
    }

    /// Combines the knowledge of two shapes describing the same tensor.
    ///
    /// Unknown rank or dimension on either side takes the other side's value; two
    /// known values must agree.
    pub fn merge(&self, other: &Shape) -> std::result::Result<Shape, ShapeConflict> {
        let (left, right) = match (&self.dims, &other.dims) {
            (None, _) => return Ok(other.clone()),
            (_, None) => return Ok(self.clone()),
            (Some(left), Some(right)) => (left, right),
        };
        if left.len() != right.len() {
            return Err(self.conflict(
                other,
                format!("rank {} differs from rank {}", left.len(), right.len()),
            ));
        }
        let mut merged = Vec::with_capacity(left.len());
        for (axis, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            let dim = match (*l, *r) {
                (UNKNOWN_DIM, r) => r,
                (l, UNKNOWN_DIM) => l,
                (l, r) if l == r => l,
                (l, r) => {
                    return Err(self.conflict(
                        other,
                        format!("dimension {axis} is {l} in one shape and {r} in the other"),
                    ));
                }
            };
            merged.push(dim);
        }
        Ok(Shape { dims: Some(merged) })
    }

    /// Numpy-style broadcast of two operand shapes.
    pub fn broadcast(&self, other: &Shape) -> std::result::Result<Shape, ShapeConflict> {
        let (left, right) = match (&self.dims, &other.dims) {
            (Some(left), Some(right)) => (left, right),
            _ => return Ok(Shape::unknown()),
        };
        let rank = left.len().max(right.len());
        let mut dims = vec![UNKNOWN_DIM; rank];
        for (offset, slot) in dims.iter_mut().rev().enumerate() {
            let l = dim_from_end(left, offset);
            let r = dim_from_end(right, offset);
            *slot = match (l, r) {
                (None, Some(d)) | (Some(d), None) => d,
                (Some(l), Some(r)) => broadcast_dim(l, r).ok_or_else(|| {
                    self.conflict(
                        other,
                        format!("dimensions {l} and {r} cannot be broadcast together"),
                    )
                })?,
                (None, None) => UNKNOWN_DIM,
            };
        }
        Ok(Shape { dims: Some(dims) })
    }

    fn conflict(&self, other: &Shape, reason: String) -> ShapeConflict {
        ShapeConflict {
            left: self.clone(),
            right: other.clone(),
            reason,
        }
    }
}

fn dim_from_end(dims: &[i64], offset: usize) -> Option<i64> {
    dims.len()
        .checked_sub(offset + 1)
        .and_then(|index| dims.get(index).copied())
}

fn broadcast_dim(l: i64, r: i64) -> Option<i64> {
    match (l, r) {
        (l, r) if l == r => Some(l),
        (1, r) => Some(r),
        (l, 1) => Some(l),
        // an unknown paired with a known size > 1 must be that size (or 1)
        (UNKNOWN_DIM, r) => Some(r),
        (l, UNKNOWN_DIM) => Some(l),
        _ => None,
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dims {
            None => f.write_str("<unknown>"),
            Some(dims) => {
                f.write_str("[")?;
                for (i, dim) in dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if *dim < 0 {
                        f.write_str("?")?;
                    } else {
                        write!(f, "{dim}")?;
                    }
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_decoding_distinguishes_scalar_and_unknown() {
        let scalar = Shape::from_wire(&[], 0).expect("scalar");
        assert_eq!(scalar, Shape::scalar());
        assert_eq!(scalar.to_wire(), Some(vec![]));

        let unknown = Shape::from_wire(&[], -1).expect("unknown");
        assert!(unknown.is_unknown());
        assert_eq!(unknown.to_wire(), None);
    }

    #[test]
    fn wire_decoding_rejects_inconsistent_rank() {
        assert!(Shape::from_wire(&[3], -1).is_err());
        assert!(Shape::from_wire(&[3, 4], 3).is_err());
        assert!(Shape::from_wire(&[], -2).is_err());
        assert!(Shape::from_wire(&[3, -4], 2).is_err());
        assert!(Shape::from_wire(&[-1, 4], 2).is_ok());
    }

    #[test]
    fn merge_fills_unknowns_and_rejects_conflicts() {
        let inferred = Shape::known([3, 4]);
        assert_eq!(
            inferred.merge(&Shape::known([-1, 4])).expect("compatible"),
            Shape::known([3, 4])
        );
        assert_eq!(
            Shape::known([-1, 4]).merge(&Shape::known([3, -1])).expect("compatible"),
            Shape::known([3, 4])
        );
        assert_eq!(inferred.merge(&Shape::unknown()).expect("unknown"), inferred);

        let err = inferred.merge(&Shape::known([3, 5])).expect_err("conflict");
        assert!(err.reason.contains("dimension 1"));
        assert!(inferred.merge(&Shape::known([3])).is_err());
    }

    #[test]
    fn broadcast_follows_numpy_rules() {
        let a = Shape::known([2, 1, 3]);
        let b = Shape::known([4, 1]);
        assert_eq!(a.broadcast(&b).expect("broadcast"), Shape::known([2, 4, 3]));

        let x = Shape::known([-1]);
        assert_eq!(x.broadcast(&x).expect("broadcast"), Shape::known([-1]));
        assert_eq!(
            Shape::known([-1]).broadcast(&Shape::known([5])).expect("broadcast"),
            Shape::known([5])
        );
        assert!(Shape::known([2]).broadcast(&Shape::known([3])).is_err());
        assert!(Shape::unknown().broadcast(&a).expect("unknown").is_unknown());
        assert_eq!(
            Shape::scalar().broadcast(&Shape::known([2, 2])).expect("scalar"),
            Shape::known([2, 2])
        );
    }

    #[test]
    fn display_marks_unknown_dims() {
        assert_eq!(Shape::known([-1, 4]).to_string(), "[?,4]");
        assert_eq!(Shape::scalar().to_string(), "[]");
        assert_eq!(Shape::unknown().to_string(), "<unknown>");
    }
}
