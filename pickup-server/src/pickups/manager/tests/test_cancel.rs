use super::*;

#[test]
fn test_cancel_from_pending_creates_no_tracking() {
    let (manager, sink) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    let cancelled = manager.cancel(&pickup.id, "  Tidak ada di rumah ").unwrap();

    assert_eq!(cancelled.status, PickupStatus::Dibatalkan);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("Tidak ada di rumah"));
    assert!(matches!(
        manager.track(&pickup.id),
        Err(ManagerError::TrackingNotFound(_))
    ));
    assert_eq!(manager.storage().count_tracking().unwrap(), 0);

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].user_id, "user-1");
    assert_eq!(sent[0].pickup_id, pickup.id);
    assert!(sent[0].message.contains("Tidak ada di rumah"));
}

#[test]
fn test_cancel_after_pickup_appends_to_tracking() {
    let (manager, _) = create_test_manager();
    let pickup = submit_and_advance(&manager, 2);

    manager.cancel(&pickup.id, "Barang tidak sesuai").unwrap();

    let tracking = manager.track(&pickup.id).unwrap();
    let statuses: Vec<_> = tracking.history.iter().map(|h| h.status).collect();
    assert_eq!(
        statuses,
        vec![
            PickupStatus::Dijemput,
            PickupStatus::Ditimbang,
            PickupStatus::Dibatalkan
        ]
    );
    assert_eq!(tracking.current_status, PickupStatus::Dibatalkan);
}

#[test]
fn test_cancel_terminal_pickup_fails_deterministically() {
    let (manager, sink) = create_test_manager();
    let done = submit_and_advance(&manager, 3);
    let cancelled = submit(&manager, "user-1");
    manager.cancel(&cancelled.id, "Pertama").unwrap();

    for _ in 0..2 {
        assert!(matches!(
            manager.cancel(&done.id, "Terlambat"),
            Err(ManagerError::InvalidTransition {
                from: PickupStatus::Selesai,
                to: PickupStatus::Dibatalkan,
                ..
            })
        ));
        assert!(matches!(
            manager.cancel(&cancelled.id, "Lagi"),
            Err(ManagerError::InvalidTransition {
                from: PickupStatus::Dibatalkan,
                ..
            })
        ));
    }

    // the first reason is kept
    assert_eq!(
        manager.get_pickup(&cancelled.id).unwrap().cancel_reason.as_deref(),
        Some("Pertama")
    );
    assert_eq!(sink.sent().len(), 1);
}

#[test]
fn test_cancel_requires_reason() {
    let (manager, sink) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    assert!(matches!(
        manager.cancel(&pickup.id, "   "),
        Err(ManagerError::MissingField("reason"))
    ));
    assert_eq!(
        manager.get_pickup(&pickup.id).unwrap().status,
        PickupStatus::Pending
    );
    assert!(sink.sent().is_empty());
}

#[test]
fn test_cancel_unknown_pickup() {
    let (manager, _) = create_test_manager();

    assert!(matches!(
        manager.cancel("missing", "Batal"),
        Err(ManagerError::PickupNotFound(_))
    ));
}

#[test]
fn test_notification_failure_does_not_fail_cancel() {
    let manager = create_manager_with_sink(Arc::new(ClosedSink));
    let pickup = submit(&manager, "user-1");

    let cancelled = manager.cancel(&pickup.id, "Hujan deras").unwrap();

    assert_eq!(cancelled.status, PickupStatus::Dibatalkan);
    assert_eq!(
        manager.get_pickup(&pickup.id).unwrap().status,
        PickupStatus::Dibatalkan
    );
}
