use dispatch_core::model::{Assignment, Snapshot};

/// Assert the post-solve guarantees every solve must hold.
pub fn assert_solved_consistently(
    snapshot: &Snapshot,
    assignments: &[Assignment],
    max_orders_per_driver: u32,
) {
    for driver in &snapshot.drivers {
        assert!(
            driver.orders_assigned <= driver.capacity,
            "driver {:?} carries {} over capacity {}",
            driver.id,
            driver.orders_assigned,
            driver.capacity
        );
        assert!(driver.orders_assigned <= max_orders_per_driver);
        match driver.assigned_restaurant {
            Some(id) => {
                assert!(driver.orders_assigned > 0, "driver {:?} assigned with no orders", driver.id);
                assert!(snapshot.restaurant(id).is_some(), "unknown restaurant {id:?}");
            }
            None => assert_eq!(driver.orders_assigned, 0),
        }
    }

    let assigned: Vec<_> = snapshot.drivers.iter().filter(|d| d.is_assigned()).collect();
    assert_eq!(assigned.len(), assignments.len());
    for (driver, assignment) in assigned.iter().zip(assignments) {
        assert_eq!(driver.id, assignment.driver_id);
        assert_eq!(driver.assigned_restaurant, Some(assignment.restaurant_id));
        assert_eq!(driver.orders_assigned, assignment.quantity);
        assert!(assignment.distance_km >= 0.0);
    }
}
