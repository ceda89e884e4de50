//! Offline session integration tests
//!
//! Sessions built through the bridge, driven by hand with inbound lines and
//! ticks. Each test covers a behavior that differs between console families.

use crate::helpers::*;
use approx::assert_relative_eq;
use mixlink::core::Error as CoreError;
use mixlink::prelude::*;
use mixlink::Direction;

/// Fader values are exposed in dB and written back in hundredths.
#[test]
fn test_fader_units() {
    let mut session = test_session("CL/QL");

    feed(&mut session, "NOTIFY set MIXER:Current/InCh/Fader/Level 4 0 -1050");
    match session.ui_value(FADER, 4, 0) {
        Some(UiValue::Number(db)) => assert_relative_eq!(db, -10.5),
        other => panic!("unexpected value: {other:?}"),
    }

    session.set(FADER, 4, 0, "-3.5").unwrap();
    assert_eq!(
        drain(&mut session),
        vec!["set MIXER:Current/InCh/Fader/Level 4 0 -350"]
    );
    assert_eq!(session.value(FADER, 4, 0), Some(&RawValue::Int(-350)));
}

/// The fader floor reads back as `-Inf`.
#[test]
fn test_fader_floor_reads_neg_inf() {
    let mut session = test_session("DM7");
    feed(&mut session, "NOTIFY set MIXER:Current/InCh/Fader/Level 0 0 -32768");
    assert_eq!(session.ui_value(FADER, 0, 0), Some(UiValue::NegInf));
}

/// Channel names are quoted on the way out and unquoted on the way in.
#[test]
fn test_channel_name() {
    let mut session = test_session("TF");

    session.set(NAME, 2, 0, "Kick In").unwrap();
    assert_eq!(
        drain(&mut session),
        vec![r#"set MIXER:Current/InCh/Label/Name 2 0 "Kick In""#]
    );

    feed(&mut session, r#"NOTIFY set MIXER:Current/InCh/Label/Name 2 0 "Snare Top""#);
    assert_eq!(
        session.ui_value(NAME, 2, 0),
        Some(UiValue::Text("Snare Top".to_string()))
    );
}

/// Requests are checked against the catalog before anything is queued.
#[test]
fn test_request_validation() {
    let mut session = test_session("DM3");

    assert!(matches!(
        session.set("MIXER:Current/Nope", 0, 0, "1"),
        Err(CoreError::UnrecognizedCommand(_))
    ));
    assert!(matches!(
        session.get(FADER, 16, 0),
        Err(CoreError::InvalidCoordinate { x: 16, .. })
    ));
    assert!(matches!(
        session.set("MIXER:Current/Meter/InCh", 0, 0, "1"),
        Err(CoreError::AccessDenied {
            direction: Direction::Set,
            ..
        })
    ));
    assert!(matches!(
        session.set(FADER, 0, 0, "loud"),
        Err(CoreError::InvalidValue { .. })
    ));
    assert!(session.queue().is_empty());
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// CL/QL recall scenes from one numeric library.
#[test]
fn test_library_scene_recall() {
    let mut session = test_session("CL/QL");
    session.set("MIXER:Lib/Scene/Recall", 0, 0, "12").unwrap();
    assert_eq!(drain(&mut session), vec!["ssrecall_ex MIXER:Lib/Scene 12"]);
}

/// TF picks the bank from the Y coordinate.
#[test]
fn test_banked_scene_recall() {
    let mut session = test_session("TF");
    session.set("MIXER:Lib/Bank/Scene/Recall", 0, 1, "5").unwrap();
    assert_eq!(drain(&mut session), vec!["ssrecall_ex scene_b 5"]);

    session.set("MIXER:Lib/Bank/Scene/Store", 0, 0, "9").unwrap();
    assert_eq!(drain(&mut session), vec!["ssupdate_ex scene_a 9"]);
}

/// PM scene numbers are text and keep their decimals.
#[test]
fn test_text_scene_recall() {
    let mut session = test_session("PM");
    session.set("MIXER:Lib/Scene/Recall", 0, 0, "12.50").unwrap();
    assert_eq!(
        drain(&mut session),
        vec!["ssrecallt_ex MIXER:Lib/Scene 12.50"]
    );

    feed(&mut session, "NOTIFY ssrecallt_ex MIXER:Lib/Scene 14.00");
    assert_eq!(session.scene().number.as_deref(), Some("14.00"));
    assert!(drain(&mut session).contains(&"ssinfot_ex MIXER:Lib/Scene 14.00".to_string()));
}

/// Scene step buttons are sent as events.
#[test]
fn test_scene_step_event() {
    let mut session = test_session("DM3");
    session.set("MIXER:Lib/Scene/RecallInc", 0, 0, "0").unwrap();
    assert_eq!(
        drain(&mut session),
        vec!["event MIXER:Lib/Scene/RecallInc 0"]
    );
    assert!(session.queue().is_empty());
}

// ---------------------------------------------------------------------------
// Device identity
// ---------------------------------------------------------------------------

/// `devinfo` answers fill in the device record.
#[test]
fn test_device_info() {
    let mut session = test_session("TF");
    feed(&mut session, r#"OK devinfo productname "TF-RACK""#);
    feed(&mut session, "OK devinfo inputch 40");
    feed(&mut session, "OK devinfo mixbus 20");

    let info = session.device_info();
    assert_eq!(info.product_name.as_deref(), Some("TF-RACK"));
    assert_eq!(info.detected_model, Some(ConsoleModel::Tf));
    assert_eq!(info.input_channels, Some(40));
    assert_eq!(info.mix_buses, Some(20));
    assert_eq!(info.matrix_buses, None);
}

/// A console of another family is reported but does not stop the session.
#[test]
fn test_model_mismatch_keeps_session() {
    let mut session = test_session("CL/QL");
    feed(&mut session, r#"OK devinfo productname "DM7""#);
    assert_eq!(
        session.device_info().detected_model,
        Some(ConsoleModel::Dm7)
    );

    session.set(ON, 0, 0, "0").unwrap();
    assert_eq!(
        drain(&mut session),
        vec!["set MIXER:Current/InCh/Fader/On 0 0 0"]
    );
}
