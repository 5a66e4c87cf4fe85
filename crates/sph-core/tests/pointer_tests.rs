use glam::Vec3;
use sph_core::forces::{external_acceleration, pointer_acceleration};
use sph_core::{PointerMode, PointerParams, SimulationParams};

fn active_pointer(mode: PointerMode) -> PointerParams {
    PointerParams {
        active: true,
        mode,
        position: Vec3::ZERO,
        radius: 2.0,
        strength: 10.0,
    }
}

#[test]
fn test_inactive_pointer_has_no_effect() {
    let pointer = PointerParams {
        active: false,
        ..active_pointer(PointerMode::Attract)
    };
    let acc = pointer_acceleration(Vec3::new(0.5, 0.0, 0.0), Vec3::ONE, &pointer);
    assert_eq!(acc, Vec3::ZERO);
}

#[test]
fn test_attract_pulls_towards_pointer() {
    let pointer = active_pointer(PointerMode::Attract);
    let pos = Vec3::new(1.0, 0.0, 0.0);
    let acc = pointer_acceleration(pos, Vec3::ZERO, &pointer);

    // Halfway to the edge: strength scaled by 1 - 1/2.
    assert!((acc - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-5, "got {acc}");
}

#[test]
fn test_repel_pushes_away_from_pointer() {
    let pointer = active_pointer(PointerMode::Repel);
    let pos = Vec3::new(0.0, -0.5, 0.0);
    let acc = pointer_acceleration(pos, Vec3::ZERO, &pointer);
    assert!(acc.y < 0.0, "repel should push further down, got {acc}");
    assert!(acc.x.abs() < 1e-6 && acc.z.abs() < 1e-6);
}

#[test]
fn test_pointer_damps_existing_velocity() {
    let pointer = PointerParams {
        strength: 0.0,
        ..active_pointer(PointerMode::Attract)
    };
    let vel = Vec3::new(0.0, 3.0, 0.0);
    let acc = pointer_acceleration(Vec3::new(0.0, 0.0, 1.0), vel, &pointer);
    assert!((acc - (-vel * 0.5)).length() < 1e-5, "got {acc}");
}

#[test]
fn test_outside_radius_is_ignored() {
    let pointer = active_pointer(PointerMode::Attract);
    for pos in [Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0), Vec3::splat(5.0)] {
        assert_eq!(pointer_acceleration(pos, Vec3::ONE, &pointer), Vec3::ZERO, "at {pos}");
    }
}

#[test]
fn test_pointer_at_particle_position_is_finite() {
    let pointer = active_pointer(PointerMode::Repel);
    let vel = Vec3::new(1.0, 2.0, 3.0);
    let acc = pointer_acceleration(Vec3::ZERO, vel, &pointer);
    assert!(acc.is_finite());
    assert!((acc + vel).length() < 1e-5, "only velocity damping remains at the centre");
}

#[test]
fn test_zero_radius_pointer_is_ignored() {
    let pointer = PointerParams {
        radius: 0.0,
        ..active_pointer(PointerMode::Attract)
    };
    assert_eq!(pointer_acceleration(Vec3::ZERO, Vec3::ONE, &pointer), Vec3::ZERO);
}

#[test]
fn test_external_acceleration_adds_gravity() {
    let params = SimulationParams {
        gravity_enabled: true,
        ..Default::default()
    };
    let pointer = active_pointer(PointerMode::Attract);
    let pos = Vec3::new(1.0, 0.0, 0.0);

    let total = external_acceleration(pos, Vec3::ZERO, &params, &pointer);
    let expected = Vec3::new(-5.0, -params.gravity_scale, 0.0);
    assert!((total - expected).length() < 1e-5, "got {total}");

    let no_pointer = external_acceleration(pos, Vec3::ZERO, &params, &PointerParams::default());
    assert_eq!(no_pointer, params.gravity());
}
