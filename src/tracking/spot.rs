//! Spot and link payloads

use serde::{Deserialize, Serialize};

/// A detected cell at one timepoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub timepoint: i32,
    pub position: [f64; 3],
    /// Shape of the cell as a 3x3 covariance matrix
    pub covariance: [[f64; 3]; 3],
    pub label: String,
}

impl Spot {
    /// Spherical spot of the given radius
    pub fn new(timepoint: i32, position: [f64; 3], radius: f64) -> Self {
        let r2 = radius * radius;
        Spot {
            timepoint,
            position,
            covariance: [[r2, 0.0, 0.0], [0.0, r2, 0.0], [0.0, 0.0, r2]],
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Radius of the sphere with the same volume as the covariance ellipsoid
    pub fn bounding_radius(&self) -> f64 {
        let c = &self.covariance;
        let det = c[0][0] * (c[1][1] * c[2][2] - c[1][2] * c[2][1])
            - c[0][1] * (c[1][0] * c[2][2] - c[1][2] * c[2][0])
            + c[0][2] * (c[1][0] * c[2][1] - c[1][1] * c[2][0]);
        det.abs().powf(1.0 / 6.0)
    }
}

/// Link between a spot and its successor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spherical_spot() {
        let spot = Spot::new(3, [1.0, 2.0, 3.0], 2.0).with_label("A1");
        assert_eq!(spot.covariance[1][1], 4.0);
        assert_eq!(spot.covariance[0][1], 0.0);
        assert_eq!(spot.label, "A1");
        assert!((spot.bounding_radius() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_payload_encoding() {
        let spot = Spot::new(0, [0.5, 0.0, -1.0], 1.0);
        let bytes = bincode::serialize(&spot).unwrap();
        let back: Spot = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, spot);
        assert!(bincode::serialize(&Link).unwrap().is_empty());
    }
}
