//! Radial discretization, column density, and visual extinction.

use uom::si::length::centimeter;

use crate::{config::CloudConfig, constants::COLUMN_PER_AV};

/// The 1-D spatial discretization of the cloud.
///
/// Positions are 0-based and ordered from the cloud center (position 0) to
/// the edge (position `points − 1`). Column density at a position is the
/// integrated gas column from that position out to the cloud edge, so it is
/// non-decreasing when moving from the edge toward the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudGeometry {
    points: usize,
    cell_thickness: f64,
    depth_fraction: f64,
    base_av: f64,
}

impl CloudGeometry {
    /// Builds the discretization from the run configuration.
    ///
    /// Assumes the configuration has been validated (`rout > rin`,
    /// `points >= 1`).
    #[must_use]
    pub fn new(config: &CloudConfig) -> Self {
        let rin = config.rin.get::<centimeter>();
        let rout = config.rout.get::<centimeter>();
        Self {
            points: config.points,
            cell_thickness: (rout - rin) / config.points as f64,
            depth_fraction: (rout - rin) / rout,
            base_av: config.base_av,
        }
    }

    /// Number of radial positions.
    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }

    /// Radial extent of a single cell [cm].
    #[must_use]
    pub fn cell_thickness(&self) -> f64 {
        self.cell_thickness
    }

    /// Column density [cm⁻²] at a position for a uniform initial density.
    ///
    /// Position 0 (center) sees the full cloud depth; the outermost position
    /// sees a single cell.
    #[must_use]
    pub fn initial_column_density(&self, position: usize, initial_density: f64) -> f64 {
        (self.points - position) as f64 * self.cell_thickness * initial_density
    }

    /// Column density [cm⁻²] at a position as the suffix sum of local cell
    /// contributions.
    ///
    /// `suffix_densities` must yield the densities [cm⁻³] at this position
    /// and every position further from the center, in order.
    #[must_use]
    pub fn column_density<I>(&self, suffix_densities: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        suffix_densities
            .into_iter()
            .map(|density| self.cell_thickness * density)
            .sum()
    }

    /// Visual extinction [mag] for a column density [cm⁻²].
    #[must_use]
    pub fn visual_extinction(&self, column_density: f64) -> f64 {
        self.base_av + column_density / COLUMN_PER_AV
    }

    /// Geometric falloff factor of the hot-core temperature profile,
    /// `((rout − rin)/rout × (position + 1)/points)^(−1/2)`.
    ///
    /// Largest at the center, unity-scale at the edge.
    #[must_use]
    pub fn radial_falloff(&self, position: usize) -> f64 {
        (self.depth_fraction * (position + 1) as f64 / self.points as f64).powf(-0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Length, length::parsec};

    const PARSEC_CM: f64 = 3.085_677_581_491_367e18;

    fn five_point_geometry() -> CloudGeometry {
        CloudGeometry::new(&CloudConfig {
            points: 5,
            rin: Length::new::<parsec>(0.0),
            rout: Length::new::<parsec>(0.05),
            base_av: 2.0,
            ..CloudConfig::default()
        })
    }

    #[test]
    fn cell_thickness_is_parsec_converted() {
        let geometry = five_point_geometry();
        assert_relative_eq!(
            geometry.cell_thickness(),
            0.01 * PARSEC_CM,
            max_relative = 1.0e-6
        );
    }

    #[test]
    fn initial_column_matches_suffix_sum_for_uniform_density() {
        let geometry = five_point_geometry();
        let density = 1.0e4;
        for position in 0..5 {
            let suffix = vec![density; 5 - position];
            assert_relative_eq!(
                geometry.initial_column_density(position, density),
                geometry.column_density(suffix),
                max_relative = 1.0e-12
            );
        }
    }

    #[test]
    fn column_density_is_monotone_from_edge_to_center() {
        let geometry = five_point_geometry();
        let densities = [5.0e4, 3.0e4, 2.0e4, 1.5e4, 1.0e4];
        let columns: Vec<f64> = (0..5)
            .map(|p| geometry.column_density(densities[p..].iter().copied()))
            .collect();
        for pair in columns.windows(2) {
            assert!(pair[0] >= pair[1], "column must not increase outward");
        }
    }

    #[test]
    fn extinction_adds_baseline() {
        let geometry = five_point_geometry();
        assert_relative_eq!(geometry.visual_extinction(0.0), 2.0);
        assert_relative_eq!(geometry.visual_extinction(1.6e21), 3.0);
    }

    #[test]
    fn radial_falloff_peaks_at_center() {
        let geometry = five_point_geometry();
        let center = geometry.radial_falloff(0);
        let edge = geometry.radial_falloff(4);
        assert!(center > edge);
        // rin = 0 so the edge factor is exactly 1.
        assert_relative_eq!(edge, 1.0, max_relative = 1.0e-12);
        assert_relative_eq!(center, 5.0_f64.sqrt(), max_relative = 1.0e-12);
    }
}
