//! Lobby behaviour with a camera the user refuses, then allows.
//!
//! Run with `cargo run -p huddle --example lobby_preview`.

use huddle::{DeviceKind, GlobalConfig, Huddle, LobbyView, Permission, VirtualDevices};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let devices = VirtualDevices::new();
    devices.set_permission(DeviceKind::Camera, Permission::Denied);
    let huddle = Huddle::with_devices(GlobalConfig::default(), Arc::new(devices.clone()))?;

    let mut lobby = huddle.lobby();
    let mut events = lobby.subscribe();

    lobby.start_preview().await;
    println!("Denied: {:?}", LobbyView::from_lobby(&lobby));
    for event in events.drain() {
        println!("  event: {:?}", event);
    }

    devices.set_permission(DeviceKind::Camera, Permission::Granted);
    lobby.toggle_camera().await;
    lobby.toggle_mic();
    println!("Allowed: {:?}", LobbyView::from_lobby(&lobby));

    if let Err(e) = lobby.join() {
        println!("Join refused: {} ({})", e, e.error_code());
    }
    lobby.set_name("  Bob  ");
    let request = lobby.join()?;
    println!("Joining as {:?}", request);
    Ok(())
}
