use super::*;

#[test]
fn test_no_tracking_before_first_transition() {
    let (manager, _) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    let err = manager.track(&pickup.id).unwrap_err();
    assert!(matches!(err, ManagerError::TrackingNotFound(_)));

    // the record itself is still readable
    assert_eq!(
        manager.get_by_queue_number(&pickup.queue_number).unwrap().status,
        PickupStatus::Pending
    );
}

#[test]
fn test_first_transition_creates_entry_with_one_row() {
    let (manager, _) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    manager
        .advance_status(&pickup.id, PickupStatus::Dijemput)
        .unwrap();

    let view = manager.track(&pickup.id).unwrap();
    assert_eq!(view.pickup_id, pickup.id);
    assert_eq!(view.queue_number, "ANTRIAN-001");
    assert_eq!(view.current_status, PickupStatus::Dijemput);
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history[0].status, PickupStatus::Dijemput);
}

#[test]
fn test_history_grows_by_one_per_transition() {
    let (manager, _) = create_test_manager();
    let pickup = submit_and_advance(&manager, 3);

    let view = manager.track(&pickup.id).unwrap();
    assert_eq!(view.history.len(), 3);
    assert!(view
        .history
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(view.current_status, PickupStatus::Selesai);

    let by_queue = manager.track_by_queue_number(&pickup.queue_number).unwrap();
    assert_eq!(by_queue, view);
}

#[test]
fn test_unknown_pickup_and_missing_tracking_are_distinct() {
    let (manager, _) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    let unknown: AppError = manager.track("missing").unwrap_err().into();
    let untracked: AppError = manager.track(&pickup.id).unwrap_err().into();

    assert_eq!(unknown.code, ErrorCode::PickupNotFound);
    assert_eq!(untracked.code, ErrorCode::TrackingNotFound);
    assert_eq!(unknown.message, "pickup not found");
    assert_eq!(untracked.message, "tracking data not found");
}

#[test]
fn test_missing_entry_aborts_transition() {
    let (manager, _) = create_test_manager();
    let mut pickup = submit(&manager, "user-1");

    // Simulate a record that left Pending without its tracking entry
    let txn = manager.storage().begin_write().unwrap();
    pickup.status = PickupStatus::Dijemput;
    manager.storage().store_pickup(&txn, &pickup).unwrap();
    txn.commit().unwrap();

    let err = manager
        .advance_status(&pickup.id, PickupStatus::Ditimbang)
        .unwrap_err();
    assert!(matches!(err, ManagerError::TrackingOutOfSync { .. }));

    assert_eq!(
        manager.get_pickup(&pickup.id).unwrap().status,
        PickupStatus::Dijemput
    );
    let app: AppError = err.into();
    assert_eq!(app.code, ErrorCode::ConcurrencyConflict);
}
