use std::{str::FromStr, sync::Arc};

use crate::session::{error::Error, models::Role, FileTokenStore, MockTokenStore, Session, TokenStore};

#[test]
fn test_known_login_ids_map_to_roles() {
    assert_eq!(Role::AtmOperationsStaff, Role::from_login_id("atm_ops"));
    assert_eq!(Role::BranchOperationsManager, Role::from_login_id("branch_mgr"));
    assert_eq!(Role::VaultManager, Role::from_login_id("vault_mgr"));
    assert_eq!(Role::HeadOfficeAuthorizationOfficer, Role::from_login_id("hoao"));

    assert_eq!("ATM Operations Staff", Role::from_login_id("atm_ops").label());
    assert_eq!("Head Office Authorization Officer", Role::from_login_id("hoao").to_string());
}

#[test]
fn test_unknown_login_id_maps_to_unknown() {
    assert_eq!(Role::Unknown, Role::from_login_id("someone_else"));
    assert_eq!("Unknown", Role::from_login_id("").label());
}

#[test]
fn test_role_parses_from_login_id_or_label() -> anyhow::Result<()> {
    assert_eq!(Role::VaultManager, Role::from_str("vault_mgr")?);
    assert_eq!(Role::BranchOperationsManager, Role::from_str("Branch Operations Manager")?);
    assert!(matches!(Role::from_str("Janitor"), Err(Error::CouldNotParseRole(_))));
    Ok(())
}

#[test]
fn test_role_permissions() {
    assert!(Role::AtmOperationsStaff.can_create_refill_requests());
    assert!(!Role::AtmOperationsStaff.can_approve_refill_requests());
    assert!(Role::BranchOperationsManager.can_create_refill_requests());
    assert!(Role::BranchOperationsManager.can_approve_refill_requests());
    assert!(!Role::BranchOperationsManager.can_train_model());
    assert!(Role::VaultManager.can_train_model());
    assert!(!Role::Unknown.can_approve_refill_requests());
    assert!(!Role::Unknown.can_create_refill_requests());
}

#[test]
fn test_restore_reads_persisted_token() -> anyhow::Result<()> {
    let mut store = MockTokenStore::new();
    store.expect_load().times(1).returning(|| Ok(Some(String::from("branch_mgr"))));

    let session = Session::restore(Arc::new(store))?;
    let user = session.current_user();

    assert!(user.is_some());
    let user = user.unwrap();
    assert_eq!("branch_mgr", user.username);
    assert_eq!("branch_mgr", user.token);
    assert_eq!(Role::BranchOperationsManager, user.role);
    Ok(())
}

#[test]
fn test_clear_removes_both_copies() -> anyhow::Result<()> {
    let mut store = MockTokenStore::new();
    store.expect_load().returning(|| Ok(Some(String::from("tok"))));
    store.expect_clear().times(1).returning(|| Ok(()));

    let session = Session::restore(Arc::new(store))?;
    assert!(session.is_authenticated());

    session.clear()?;
    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    Ok(())
}

#[test]
fn test_file_token_store_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileTokenStore::new_dyn(dir.path().join("token"));

    assert_eq!(None, store.load()?);
    store.save("abc.def.ghi")?;
    assert_eq!(Some(String::from("abc.def.ghi")), store.load()?);

    let session = Session::restore(store.clone())?;
    assert_eq!(Some(String::from("abc.def.ghi")), session.token());

    session.clear()?;
    assert_eq!(None, store.load()?);
    // Clearing twice is fine
    store.clear()?;
    Ok(())
}
