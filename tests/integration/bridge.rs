//! Bridge builder integration tests
//!
//! Configuration validation, catalog selection and dump file loading.

use crate::helpers::*;
use mixlink::core::Error as CoreError;
use mixlink::prelude::*;
use std::io::Write;
use std::sync::Arc;

/// The default bridge targets CL/QL with the built-in catalog.
#[test]
fn test_default_bridge() {
    let bridge = MixlinkBridge::builder().build().unwrap();

    assert_eq!(bridge.model(), ConsoleModel::ClQl);
    assert!(!bridge.catalog().is_empty());
    assert!(bridge.catalog().get(FADER).is_some());
    assert_eq!(bridge.session_config(), &SessionConfig::default());
}

/// Every model identifier builds a bridge with a scene recall entry.
#[test]
fn test_every_model_builds() {
    for model in ConsoleModel::ALL {
        let bridge = test_bridge(model.identifier());
        assert_eq!(bridge.model(), model);
        assert!(
            bridge.catalog().scene_recall().is_some(),
            "{model} catalog has no scene recall"
        );
    }
}

/// Short aliases resolve to their family.
#[test]
fn test_model_aliases() {
    assert_eq!(test_bridge("ql").model(), ConsoleModel::ClQl);
    assert_eq!(test_bridge("Rivage").model(), ConsoleModel::Pm);
}

/// Unknown models are rejected at build time.
#[test]
fn test_unknown_model_rejected() {
    let err = MixlinkBridge::builder().model("X32").build().unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::InvalidConfig(_))));
}

/// Out-of-range session limits are rejected at build time.
#[test]
fn test_invalid_session_limits_rejected() {
    let err = MixlinkBridge::builder()
        .meter_interval_ms(1)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::InvalidConfig(_))));

    let err = MixlinkBridge::builder()
        .get_timeout_ticks(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::InvalidConfig(_))));
}

/// A whole session config replaces earlier setters.
#[test]
fn test_session_config_replaces_setters() {
    let config = SessionConfig {
        meter_interval_ms: 250,
        ..SessionConfig::with_model("DM7")
    };
    let bridge = MixlinkBridge::builder()
        .model("TF")
        .session_config(config.clone())
        .build()
        .unwrap();

    assert_eq!(bridge.model(), ConsoleModel::Dm7);
    assert_eq!(bridge.session_config(), &config);
}

/// Sessions made by one bridge share its catalog.
#[test]
fn test_sessions_share_catalog() {
    let bridge = test_bridge("PM");
    let a = bridge.session().unwrap();
    let b = bridge.session().unwrap();

    assert!(Arc::ptr_eq(a.catalog(), b.catalog()));
    assert!(Arc::ptr_eq(a.catalog(), bridge.catalog()));
}

// ---------------------------------------------------------------------------
// Dump files
// ---------------------------------------------------------------------------

/// A captured parameter dump replaces the built-in catalog.
#[test]
fn test_catalog_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"OK prminfo 0 "MIXER:Current/InCh/Fader/Level" 4 1 -32768 1000 -32768 "dB" integer fader rw 100"#
    )
    .unwrap();
    writeln!(
        file,
        r#"OK prminfo 1 "MIXER:Current/InCh/Fader/On" 4 1 0 1 1 "" bool any rw 1"#
    )
    .unwrap();

    let bridge = MixlinkBridge::builder()
        .model("QL")
        .catalog_file(file.path())
        .build()
        .unwrap();

    assert_eq!(bridge.catalog().len(), 2);
    assert_eq!(bridge.catalog().get(FADER).unwrap().x_count, 4);

    let mut session = bridge.session().unwrap();
    assert!(matches!(
        session.set(FADER, 4, 0, "0"),
        Err(CoreError::InvalidCoordinate { .. })
    ));
}

/// A missing dump file is reported as an unavailable catalog.
#[test]
fn test_missing_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = MixlinkBridge::builder()
        .catalog_file(dir.path().join("missing.txt"))
        .build()
        .unwrap_err();

    match err {
        Error::Core(CoreError::CatalogUnavailable(reason)) => {
            assert!(reason.contains("missing.txt"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A dump with no parameter lines is rejected.
#[test]
fn test_empty_catalog_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "ERROR prminfo InvalidArgument").unwrap();

    let err = MixlinkBridge::builder()
        .catalog_file(file.path())
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::InvalidCatalog(_))));
}

// ---------------------------------------------------------------------------
// Connection settings
// ---------------------------------------------------------------------------

#[cfg(feature = "net")]
#[test]
fn test_connection_settings() {
    let bridge = MixlinkBridge::builder()
        .host("10.0.0.2")
        .pacing_ms(20)
        .build()
        .unwrap();

    assert_eq!(bridge.connection_config().address(), "10.0.0.2:49280");
    assert_eq!(bridge.connection_config().pacing_ms, 20);
}

#[cfg(feature = "net")]
#[test]
fn test_invalid_connection_rejected() {
    let err = MixlinkBridge::builder().host("  ").build().unwrap_err();
    assert!(matches!(
        err,
        Error::Net(mixlink::net::Error::Core(CoreError::InvalidConfig(_)))
    ));

    let err = MixlinkBridge::builder().port(0).build().unwrap_err();
    assert!(matches!(err, Error::Net(_)));
}
