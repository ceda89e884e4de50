//! Connection integration tests
//!
//! The whole stack, bridge to socket, against a scripted console.

use crate::helpers::*;
use mixlink::prelude::*;
use std::time::Duration;

fn bridge_for(console: &ScriptedConsole, model: &str) -> MixlinkBridge {
    MixlinkBridge::builder()
        .host("127.0.0.1")
        .port(console.port())
        .model(model)
        .pacing_ms(2)
        .connect_timeout_ms(1000)
        .build()
        .unwrap()
}

/// Connecting runs the device and scene poll.
#[tokio::test]
async fn test_bridge_connects_and_polls() {
    let mut console = ScriptedConsole::start("QL5").await;
    let bridge = bridge_for(&console, "CL/QL");
    let (handle, _task) = bridge.connect().await.unwrap();

    console.expect("devinfo productname").await;
    console.expect("sscurrent_ex MIXER:Lib/Scene").await;
    console.expect("ssinfo_ex MIXER:Lib/Scene 1").await;

    let h = &handle;
    assert!(
        eventually(|| async move {
            let scene = h.scene().await.unwrap();
            scene.name.as_deref() == Some("Soundcheck")
        })
        .await
    );
    assert_eq!(
        handle.device_info().await.unwrap().detected_model,
        Some(ConsoleModel::ClQl)
    );
}

/// Surface moves pushed by the console reach the store and its subscribers.
#[tokio::test]
async fn test_console_notifications_reach_store() {
    let mut console = ScriptedConsole::start("TF5").await;
    let bridge = bridge_for(&console, "TF");
    let (handle, _task) = bridge.connect().await.unwrap();
    console.expect("sscurrent_ex scene_a").await;

    handle.subscribe_value(FADER, 7, 0).await.unwrap();
    console.expect("get MIXER:Current/InCh/Fader/Level 7 0").await;
    let events = handle.store_events().await.unwrap();

    console.push("NOTIFY set MIXER:Current/InCh/Fader/Level 7 0 -600");

    let h = &handle;
    assert!(
        eventually(|| async move {
            h.ui_value(FADER, 7, 0).await.unwrap() == Some(UiValue::Number(-6.0))
        })
        .await
    );
    assert!(events.try_iter().any(|e| matches!(
        e,
        StoreEvent::Changed { x: 7, value: RawValue::Int(-600), .. }
    )));
}

/// A nudge from the fader floor lands on the secondary floor.
#[tokio::test]
async fn test_nudge_from_floor() {
    let mut console = ScriptedConsole::start("DM7").await;
    let bridge = bridge_for(&console, "DM7");
    let (handle, _task) = bridge.connect().await.unwrap();
    console.expect("sscurrentt_ex MIXER:Lib/Scene").await;

    console.push("NOTIFY set MIXER:Current/InCh/Fader/Level 0 0 -32768");
    let h = &handle;
    assert!(
        eventually(|| async move {
            h.ui_value(FADER, 0, 0).await.unwrap() == Some(UiValue::NegInf)
        })
        .await
    );

    handle.nudge(FADER, 0, 0, "1").await.unwrap();
    console
        .expect("set MIXER:Current/InCh/Fader/Level 0 0 -13800")
        .await;
}

/// A recall pushed from the surface clears cached values.
#[tokio::test]
async fn test_surface_recall_clears_store() {
    let mut console = ScriptedConsole::start("CL5").await;
    let bridge = bridge_for(&console, "CL/QL");
    let (handle, _task) = bridge.connect().await.unwrap();
    console.expect("ssinfo_ex MIXER:Lib/Scene 1").await;

    handle.set(ON, 3, 0, "0").await.unwrap();
    console.expect("set MIXER:Current/InCh/Fader/On 3 0 0").await;
    assert_eq!(
        handle.value(ON, 3, 0).await.unwrap(),
        Some(RawValue::Int(0))
    );

    let events = handle.store_events().await.unwrap();
    console.push("NOTIFY ssrecall_ex MIXER:Lib/Scene 4");
    console.expect("ssinfo_ex MIXER:Lib/Scene 4").await;

    assert_eq!(handle.value(ON, 3, 0).await.unwrap(), None);
    assert!(events.try_iter().any(|e| e == StoreEvent::Cleared));
    assert_eq!(handle.scene().await.unwrap().number.as_deref(), Some("4"));
}

/// Dropping the task handle stops the session.
#[tokio::test]
async fn test_dropping_task_stops_session() {
    let mut console = ScriptedConsole::start("CL5").await;
    let bridge = bridge_for(&console, "CL/QL");
    let (handle, task) = bridge.connect().await.unwrap();
    console.expect("devinfo productname").await;

    drop(task);
    let h = &handle;
    assert!(
        eventually(|| async move {
            matches!(h.get(FADER, 0, 0).await, Err(mixlink::net::Error::ChannelClosed))
        })
        .await
    );
}

/// Nothing listening means the bridge reports a connection error.
#[tokio::test]
async fn test_connect_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let bridge = MixlinkBridge::builder()
        .host("127.0.0.1")
        .port(port)
        .connect_timeout_ms(1000)
        .build()
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), bridge.connect())
        .await
        .unwrap();
    assert!(matches!(result, Err(Error::Net(_))));
}
