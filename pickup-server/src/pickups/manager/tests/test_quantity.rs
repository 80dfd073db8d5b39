use super::*;

#[test]
fn test_update_existing_item() {
    let (manager, _) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    assert!(manager.update_item_quantity(&pickup.id, "item-2", 7.25).unwrap());

    let stored = manager.get_pickup(&pickup.id).unwrap();
    assert_eq!(stored.items[0].quantity, 3.5);
    assert_eq!(stored.items[1].quantity, 7.25);
}

#[test]
fn test_unknown_item_is_a_silent_no_op() {
    let (manager, _) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    assert!(!manager.update_item_quantity(&pickup.id, "item-404", 5.0).unwrap());

    let stored = manager.get_pickup(&pickup.id).unwrap();
    assert_eq!(stored.items, pickup.items);
    assert_eq!(stored.updated_at, pickup.updated_at);
}

#[test]
fn test_invalid_quantity_is_rejected() {
    let (manager, _) = create_test_manager();
    let pickup = submit(&manager, "user-1");

    for bad in [-0.5, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            manager.update_item_quantity(&pickup.id, "item-1", bad),
            Err(ManagerError::InvalidField { field: "quantity", .. })
        ));
    }
    assert!(manager.update_item_quantity(&pickup.id, "item-1", 0.0).unwrap());
}

#[test]
fn test_unknown_pickup() {
    let (manager, _) = create_test_manager();

    assert!(matches!(
        manager.update_item_quantity("missing", "item-1", 1.0),
        Err(ManagerError::PickupNotFound(_))
    ));
    // Missing pickup takes precedence over a bad quantity
    assert!(matches!(
        manager.update_item_quantity("missing", "item-1", f64::NAN),
        Err(ManagerError::PickupNotFound(_))
    ));
}

#[test]
fn test_default_policy_allows_terminal_edits() {
    let (manager, _) = create_test_manager();
    let pickup = submit_and_advance(&manager, 3);

    assert!(manager.update_item_quantity(&pickup.id, "item-1", 4.0).unwrap());
}

#[test]
fn test_reject_terminal_policy() {
    let (manager, _) = create_test_manager();
    let manager = manager.with_quantity_policy(QuantityEditPolicy::RejectTerminal);

    let weighing = submit_and_advance(&manager, 2);
    assert!(manager.update_item_quantity(&weighing.id, "item-1", 4.0).unwrap());

    let done = submit_and_advance(&manager, 3);
    let err = manager
        .update_item_quantity(&done.id, "item-1", 4.0)
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::NotEditable {
            status: PickupStatus::Selesai,
            ..
        }
    ));
    let app: AppError = err.into();
    assert_eq!(app.code, ErrorCode::PickupNotEditable);
}

#[test]
fn test_policy_parsing() {
    assert_eq!(
        "allow_any".parse::<QuantityEditPolicy>(),
        Ok(QuantityEditPolicy::AllowAny)
    );
    assert_eq!(
        " Reject_Terminal ".parse::<QuantityEditPolicy>(),
        Ok(QuantityEditPolicy::RejectTerminal)
    );
    assert!("sometimes".parse::<QuantityEditPolicy>().is_err());
}
