//! Integration tests for dialog sequences and the session property store
//!
//! These tests verify:
//! - Round-trip from delimited properties into the dialog sequence store
//! - Flow selection between install and repair runs
//! - Graceful handling of missing and malformed properties
//! - Property staging from the UI configuration

use embedui::config::UiConfig;
use embedui::dialogs::{DialogSequence, DialogSet};
use embedui::models::RunKind;
use embedui::session::{PropertySession, Session, properties};

#[test]
fn test_three_entry_property_round_trip() {
    let session = PropertySession::new();
    session.set(properties::INSTALL_SEQUENCE, "Dlg1,Dlg2,Dlg3");

    let set = DialogSet::from_session(&session);
    let ids: Vec<_> = set.install.iter().collect();
    assert_eq!(ids, vec!["Dlg1", "Dlg2", "Dlg3"]);
}

#[test]
fn test_missing_property_yields_empty_sequence() {
    let session = PropertySession::new();
    let set = DialogSet::from_session(&session);

    assert_eq!(set.install.len(), 0);
    assert_eq!(set.repair.len(), 0);
}

#[test]
fn test_empty_property_yields_empty_sequence() {
    let session = PropertySession::new();
    session.set(properties::INSTALL_SEQUENCE, "");

    let set = DialogSet::from_session(&session);
    assert!(set.install.is_empty());
}

#[test]
fn test_malformed_property_degrades_not_fails() {
    let session = PropertySession::new();
    session.set(properties::INSTALL_SEQUENCE, ",, ,WelcomeDlg,, ,");

    let set = DialogSet::from_session(&session);
    let ids: Vec<_> = set.install.iter().collect();
    assert_eq!(ids, vec!["WelcomeDlg"]);
}

#[test]
fn test_duplicate_dialogs_are_preserved_in_order() {
    let session = PropertySession::new();
    session.set(
        properties::REPAIR_SEQUENCE,
        "ProgressDlg,ErrorDlg,ProgressDlg",
    );

    let set = DialogSet::from_session(&session);
    let ids: Vec<_> = set.repair.iter().collect();
    assert_eq!(ids, vec!["ProgressDlg", "ErrorDlg", "ProgressDlg"]);
}

#[test]
fn test_flow_selection_follows_installed_property() {
    let session = PropertySession::new();
    session.set(properties::INSTALL_SEQUENCE, "WelcomeDlg");
    session.set(properties::REPAIR_SEQUENCE, "MaintenanceTypeDlg");

    let set = DialogSet::from_session(&session);

    assert_eq!(RunKind::resolve(&session), RunKind::Install);
    assert_eq!(
        set.sequence_for(RunKind::resolve(&session))
            .iter()
            .collect::<Vec<_>>(),
        vec!["WelcomeDlg"]
    );

    session.set(properties::INSTALLED, "2024-06-01");
    assert_eq!(RunKind::resolve(&session), RunKind::Repair);
    assert_eq!(
        set.sequence_for(RunKind::resolve(&session))
            .iter()
            .collect::<Vec<_>>(),
        vec!["MaintenanceTypeDlg"]
    );
}

#[test]
fn test_config_staging_round_trips_through_session() {
    let mut config = UiConfig::default();
    config.ui_settings.install_dialogs =
        vec!["WelcomeDlg".to_string(), "InstallDirDlg".to_string()];
    config.ui_settings.repair_dialogs = vec!["MaintenanceTypeDlg".to_string()];

    let session = PropertySession::new();
    config.apply_to_session(&session);

    let set = DialogSet::from_session(&session);
    assert_eq!(
        set.install,
        DialogSequence::from_ids(["WelcomeDlg", "InstallDirDlg"])
    );
    assert_eq!(
        set.repair,
        DialogSequence::from_ids(["MaintenanceTypeDlg"])
    );
}

#[test]
fn test_install_location_flows_back_through_session() {
    let session = PropertySession::new();

    // The UI resolves the location; the engine reads it back out.
    session.set(properties::INSTALL_DIR, "D:\\Apps\\DemoProduct");
    assert_eq!(
        session.get(properties::INSTALL_DIR).as_deref(),
        Some("D:\\Apps\\DemoProduct")
    );
}
