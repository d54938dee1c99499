//! Walk through a call against virtual devices: join, mute, share, let the
//! platform stop the share, leave.
//!
//! Run with `cargo run -p huddle --example call_walkthrough`.

use huddle::{ControlAction, ControlBar, GlobalConfig, GridLayout, Huddle, TileContent, VirtualDevices};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn print_grid(app: &mut huddle::App) -> anyhow::Result<()> {
    let session = app.call_mut()?;
    let grid = GridLayout::build(&session.participants());
    println!("Grid: {} x {}", grid.columns, grid.rows);
    for tile in &grid.tiles {
        let content = match &tile.content {
            TileContent::Video { stream, .. } => format!("video {}", stream.id()),
            TileContent::CameraOff { initial } => format!("camera off [{}]", initial),
            TileContent::SharingPlaceholder { caption } => caption.clone(),
            TileContent::Avatar { initial } => format!("avatar [{}]", initial),
        };
        println!("  {:<20} {:<45} mic {:?}", tile.label, content, tile.mic);
    }
    let bar = ControlBar::from_flags(session.flags());
    println!("Status: {:?}", bar.status);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("HUDDLE_LOG")
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let devices = VirtualDevices::new();
    let huddle = Huddle::with_devices(GlobalConfig::default(), Arc::new(devices.clone()))?;
    let mut app = huddle.app();

    app.open_lobby().await?;
    app.lobby_mut()?.set_name("Alice");
    app.join().await?;
    print_grid(&mut app)?;

    app.dispatch(ControlAction::ToggleMute).await?;
    app.dispatch(ControlAction::ToggleCamera).await?;
    app.dispatch(ControlAction::ToggleScreenShare).await?;
    print_grid(&mut app)?;

    info!("Simulating the browser's \"Stop sharing\" button");
    devices.end_display_capture();
    let session = app.call_mut()?;
    if let Some(event) = tokio::time::timeout(Duration::from_secs(1), session.next_event()).await? {
        println!("Event: {}", event.event_type());
    }
    print_grid(&mut app)?;

    #[cfg(feature = "diagnostics")]
    println!("{}", app.call_mut()?.report().to_json()?);

    app.dispatch(ControlAction::LeaveCall).await?;
    println!("Live streams after leaving: {}", devices.live_streams().len());
    Ok(())
}
