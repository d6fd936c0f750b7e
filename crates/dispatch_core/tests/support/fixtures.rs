use dispatch_core::model::Snapshot;
use dispatch_core::seed::{generate_snapshot, SeedParams};
use dispatch_core::test_helpers::{driver_at, point_north, restaurant_at, test_point};

/// Seeded demo-city snapshot; the same seed always yields the same records.
pub fn seeded_snapshot(seed: u64, num_drivers: usize) -> Snapshot {
    let params = SeedParams::default()
        .with_seed(seed)
        .with_num_drivers(num_drivers);
    generate_snapshot(&params).expect("seeded snapshot")
}

/// One driver on the test point choosing between a small restaurant on the
/// same point and a busy one 0.02 degrees north.
pub fn near_small_far_busy(capacity: u32) -> Snapshot {
    Snapshot::new(
        vec![driver_at(1, test_point(), capacity)],
        vec![
            restaurant_at(1, test_point(), 2),
            restaurant_at(2, point_north(0.02), 20),
        ],
    )
}
