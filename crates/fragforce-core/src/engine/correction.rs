use nalgebra::Vector3;

/// Vector sum of all per-atom forces.
pub fn net_force(forces: &[Vector3<f64>]) -> Vector3<f64> {
    forces.iter().sum()
}

/// Removes the net force from `forces` in place and returns the residual that was removed.
///
/// Each axis is treated independently. The residual along an axis is distributed over
/// the atoms in proportion to the magnitude of their own force component:
///
/// `f[a] -= |f[a]| / Σ|f| * Σf`
///
/// so atoms with (near) zero force on that axis are barely touched. Axes whose total is
/// exactly zero are left unchanged.
pub fn remove_net_force(forces: &mut [Vector3<f64>]) -> Vector3<f64> {
    let residual = net_force(forces);
    for axis in 0..3 {
        let total = residual[axis];
        if total == 0.0 {
            continue;
        }
        let magnitude: f64 = forces.iter().map(|f| f[axis].abs()).sum();
        if magnitude == 0.0 {
            continue;
        }
        for f in forces.iter_mut() {
            f[axis] -= f[axis].abs() / magnitude * total;
        }
    }
    residual
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn zero_sum_forces_are_left_bitwise_unchanged() {
        let original = vec![
            Vector3::new(1.0, -2.0, 0.0),
            Vector3::new(-1.0, 2.0, 0.0),
        ];
        let mut forces = original.clone();
        let residual = remove_net_force(&mut forces);
        assert_eq!(residual, Vector3::zeros());
        assert_eq!(forces, original);
    }

    #[test]
    fn corrected_forces_sum_to_zero_on_every_axis() {
        let mut forces = vec![
            Vector3::new(1.0, 0.3, -2.0),
            Vector3::new(0.5, -0.1, 0.7),
            Vector3::new(-0.2, 0.4, 0.9),
        ];
        let residual = remove_net_force(&mut forces);
        assert!((residual - Vector3::new(1.3, 0.6, -0.4)).norm() < EPS);
        assert!(net_force(&forces).norm() < EPS);
    }

    #[test]
    fn correction_is_proportional_to_component_magnitude() {
        let mut forces = vec![Vector3::new(3.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)];
        remove_net_force(&mut forces);
        // total 2, magnitudes 3 and 1
        assert!((forces[0].x - 1.5).abs() < EPS);
        assert!((forces[1].x + 1.5).abs() < EPS);
    }

    #[test]
    fn atoms_without_force_on_an_axis_are_not_corrected() {
        let mut forces = vec![Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)];
        remove_net_force(&mut forces);
        assert_eq!(forces[1].x, 0.0);
        assert_eq!(forces[0].y, 0.0);
        assert!(net_force(&forces).norm() < EPS);
    }

    #[test]
    fn second_application_is_a_numerical_no_op() {
        let mut forces = vec![
            Vector3::new(0.013, -0.2, 0.05),
            Vector3::new(-0.004, 0.11, 0.02),
            Vector3::new(0.007, 0.03, -0.01),
        ];
        remove_net_force(&mut forces);
        let once = forces.clone();
        remove_net_force(&mut forces);
        for (a, b) in forces.iter().zip(&once) {
            assert!((a - b).norm() < EPS);
        }
    }

    #[test]
    fn empty_input_is_handled() {
        let mut forces: Vec<Vector3<f64>> = Vec::new();
        assert_eq!(remove_net_force(&mut forces), Vector3::zeros());
    }
}
