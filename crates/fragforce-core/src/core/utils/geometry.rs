use crate::core::models::system::{AtomicSystem, Cell};
use nalgebra::{Point3, Vector3};

/// Tolerance subtracted from the wrapping window so that atoms sitting exactly on the
/// lower window edge stay where they are.
const WRAP_EPS: f64 = 1e-7;

/// Applies the minimum-image convention to a displacement vector.
///
/// Only periodic axes of the (orthorhombic) cell are folded.
pub fn minimum_image(delta: Vector3<f64>, cell: &Cell) -> Vector3<f64> {
    let lengths = cell.lengths();
    Vector3::from_fn(|axis, _| {
        let d = delta[axis];
        if cell.is_periodic_along(axis) {
            d - lengths[axis] * (d / lengths[axis]).round()
        } else {
            d
        }
    })
}

/// Distance between two points under the minimum-image convention.
pub fn periodic_distance(a: &Point3<f64>, b: &Point3<f64>, cell: &Cell) -> f64 {
    minimum_image(b - a, cell).norm()
}

/// Smallest atom-atom distance between two groups of atoms, honoring periodicity.
///
/// Returns `None` if either group is empty.
pub fn min_distance_between(system: &AtomicSystem, group_a: &[usize], group_b: &[usize]) -> Option<f64> {
    let atoms = system.atoms();
    let cell = system.cell();
    group_a
        .iter()
        .flat_map(|&i| {
            group_b
                .iter()
                .map(move |&j| periodic_distance(&atoms[i].position, &atoms[j].position, cell))
        })
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Re-images every position into the unit-cell window centered on `reference`.
///
/// Along each periodic axis the positions are folded into the half-open fractional
/// window `[c - 0.5, c + 0.5)`, where `c` is the fractional coordinate of `reference`.
/// Atoms of a molecule that straddles the cell boundary therefore end up adjacent to
/// each other. Non-periodic axes are untouched.
pub fn wrap_around(positions: &[Point3<f64>], reference: &Point3<f64>, cell: &Cell) -> Vec<Point3<f64>> {
    let center = cell.fractional(reference);
    let lengths = cell.lengths();
    positions
        .iter()
        .map(|p| {
            let mut wrapped = *p;
            for axis in 0..3 {
                if !cell.is_periodic_along(axis) {
                    continue;
                }
                let shift = center[axis] - 0.5 - WRAP_EPS;
                let frac = p[axis] / lengths[axis] - shift;
                wrapped[axis] = (frac.rem_euclid(1.0) + shift) * lengths[axis];
            }
            wrapped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    const EPS: f64 = 1e-9;

    fn approx_point(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < EPS
    }

    #[test]
    fn minimum_image_folds_periodic_axes_only() {
        let cell = Cell::orthorhombic([10.0, 10.0, 0.0], true);
        let folded = minimum_image(Vector3::new(9.0, -6.0, 25.0), &cell);
        assert!((folded - Vector3::new(-1.0, 4.0, 25.0)).norm() < EPS);
    }

    #[test]
    fn periodic_distance_matches_plain_distance_without_pbc() {
        let cell = Cell::non_periodic();
        let d = periodic_distance(&Point3::origin(), &Point3::new(3.0, 4.0, 0.0), &cell);
        assert!((d - 5.0).abs() < EPS);
    }

    #[test]
    fn periodic_distance_uses_nearest_image() {
        let cell = Cell::orthorhombic([10.0; 3], true);
        let d = periodic_distance(&Point3::new(0.5, 0.0, 0.0), &Point3::new(9.5, 0.0, 0.0), &cell);
        assert!((d - 1.0).abs() < EPS);
    }

    #[test]
    fn min_distance_between_scans_all_pairs() {
        let system = AtomicSystem::new(
            vec![
                Atom::new("H", Point3::new(0.0, 0.0, 0.0)),
                Atom::new("H", Point3::new(5.0, 0.0, 0.0)),
                Atom::new("H", Point3::new(2.0, 0.0, 0.0)),
                Atom::new("H", Point3::new(8.0, 0.0, 0.0)),
            ],
            Cell::non_periodic(),
        );
        let d = min_distance_between(&system, &[0, 1], &[2, 3]).unwrap();
        assert!((d - 2.0).abs() < EPS);
        assert!(min_distance_between(&system, &[], &[2]).is_none());
    }

    #[test]
    fn wrap_around_keeps_boundary_straddling_molecule_together() {
        let cell = Cell::orthorhombic([10.0; 3], true);
        let positions = [Point3::new(9.8, 5.0, 5.0), Point3::new(0.3, 5.0, 5.0)];
        let wrapped = wrap_around(&positions, &positions[0], &cell);
        assert!(approx_point(&wrapped[0], &Point3::new(9.8, 5.0, 5.0)));
        assert!(approx_point(&wrapped[1], &Point3::new(10.3, 5.0, 5.0)));
        assert!((wrapped[1] - wrapped[0]).norm() < 1.0);
    }

    #[test]
    fn wrap_around_leaves_non_periodic_axes_untouched() {
        let cell = Cell::orthorhombic([10.0, 0.0, 0.0], true);
        let positions = [Point3::new(1.0, 1.0, 1.0), Point3::new(9.5, 42.0, -17.0)];
        let wrapped = wrap_around(&positions, &positions[0], &cell);
        assert!(approx_point(&wrapped[1], &Point3::new(-0.5, 42.0, -17.0)));
    }

    #[test]
    fn wrap_around_keeps_reference_atom_in_place() {
        let cell = Cell::orthorhombic([4.0; 3], true);
        let reference = Point3::new(-7.0, 13.0, 2.0);
        let wrapped = wrap_around(&[reference], &reference, &cell);
        assert!(approx_point(&wrapped[0], &reference));
    }
}
