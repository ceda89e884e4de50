//! Test helpers and fixtures for mixlink integration tests
//!
//! The scripted console stands in for a real desk: it answers the initial
//! poll, echoes `set` lines the way a console confirms them, and lets a test
//! push unsolicited `NOTIFY` lines as if someone moved a fader on the surface.

#![allow(dead_code)]

use mixlink::prelude::*;

/// Input fader level, present on every model.
pub const FADER: &str = "MIXER:Current/InCh/Fader/Level";

/// Input channel on/off switch.
pub const ON: &str = "MIXER:Current/InCh/Fader/On";

/// Input channel name.
pub const NAME: &str = "MIXER:Current/InCh/Label/Name";

/// Offline bridge for a console model.
pub fn test_bridge(model: &str) -> MixlinkBridge {
    MixlinkBridge::builder()
        .model(model)
        .build()
        .expect("Failed to build test bridge")
}

/// Offline session for a console model.
pub fn test_session(model: &str) -> Session {
    test_bridge(model)
        .session()
        .expect("Failed to create test session")
}

/// Drain every line the session wants to send right now.
pub fn drain(session: &mut Session) -> Vec<String> {
    std::iter::from_fn(|| session.on_tick()).collect()
}

/// Feed one inbound line, terminator included.
pub fn feed(session: &mut Session, line: &str) -> usize {
    session.on_transport_data(format!("{line}\n").as_bytes())
}

#[cfg(feature = "net")]
pub use scripted::ScriptedConsole;

#[cfg(feature = "net")]
mod scripted {
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// A one-connection console on 127.0.0.1.
    pub struct ScriptedConsole {
        pub addr: SocketAddr,
        received: mpsc::UnboundedReceiver<String>,
        notify: mpsc::UnboundedSender<String>,
    }

    impl ScriptedConsole {
        pub async fn start(product_name: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (line_tx, received) = mpsc::unbounded_channel();
            let (notify, mut notify_rx) = mpsc::unbounded_channel::<String>();

            tokio::spawn(async move {
                let (stream, _) = listener.accept().await.unwrap();
                let (reader, mut writer) = stream.into_split();
                let mut lines = BufReader::new(reader).lines();
                loop {
                    let outgoing = tokio::select! {
                        line = lines.next_line() => {
                            let Ok(Some(line)) = line else { break };
                            let reply = reply_to(&line, product_name);
                            let _ = line_tx.send(line);
                            reply
                        }
                        pushed = notify_rx.recv() => match pushed {
                            Some(line) => line,
                            None => break,
                        },
                    };
                    if writer
                        .write_all(format!("{outgoing}\r\n").as_bytes())
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            });

            Self {
                addr,
                received,
                notify,
            }
        }

        pub fn port(&self) -> u16 {
            self.addr.port()
        }

        /// Send an unsolicited line to the connected session.
        pub fn push(&self, line: &str) {
            let _ = self.notify.send(line.to_string());
        }

        /// Wait for a line from the session equal to `expected`.
        pub async fn expect(&mut self, expected: &str) {
            let found = tokio::time::timeout(Duration::from_secs(5), async {
                while let Some(line) = self.received.recv().await {
                    if line == expected {
                        return true;
                    }
                }
                false
            })
            .await
            .unwrap_or(false);
            assert!(found, "console never received '{expected}'");
        }
    }

    fn reply_to(line: &str, product_name: &str) -> String {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["devinfo", "productname"] => format!(r#"OK devinfo productname "{product_name}""#),
            ["devinfo", field] => format!("OK devinfo {field} 16"),
            ["sscurrent_ex", target] => format!("OK sscurrent_ex {target} 1"),
            ["ssinfo_ex", target, n] => format!(r#"OK ssinfo_ex {target} {n} "Soundcheck" """#),
            ["set", ..] => format!("OK {line}"),
            ["get", address, x, y] => format!("OK get {address} {x} {y} 0"),
            [verb, ..] => format!("ERROR {verb} UnknownCommand"),
            [] => "ERROR".to_string(),
        }
    }
}

/// Poll an async condition until it holds or about five seconds pass.
#[cfg(feature = "net")]
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..500 {
        if check().await {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}
