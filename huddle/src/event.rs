//! Event system for lobby and call events

use huddle_media::{DeviceKind, StreamId, UnavailableReason};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::debug;

/// Events emitted by the lobby and the call session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The lobby camera preview is showing
    PreviewStarted {
        /// Preview stream
        stream_id: StreamId,
    },
    /// The lobby camera preview was released
    PreviewStopped,
    /// Local camera/microphone capture for the call started
    LocalMediaStarted {
        /// Captured stream
        stream_id: StreamId,
    },
    /// A device could not be acquired; the matching toggle is off
    MediaUnavailable {
        /// Device that failed
        device: DeviceKind,
        /// Why it failed
        reason: UnavailableReason,
    },
    /// The microphone toggle changed
    MuteChanged {
        /// Whether the local user is now muted
        muted: bool,
    },
    /// The camera toggle changed
    CameraChanged {
        /// Whether the camera is now off
        camera_off: bool,
    },
    /// Screen sharing started
    ScreenShareStarted {
        /// Display stream
        stream_id: StreamId,
    },
    /// Screen sharing stopped and its stream was released
    ScreenShareStopped {
        /// Display stream
        stream_id: StreamId,
        /// What stopped it
        reason: StopReason,
    },
    /// The local user left the call
    CallLeft,
}

/// What ended a screen share
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum StopReason {
    /// The in-app control
    InApp,
    /// The platform's own "stop sharing" control
    Platform,
    /// The call ended while sharing
    CallEnded,
}

impl Event {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PreviewStarted { .. } => "preview_started",
            Event::PreviewStopped => "preview_stopped",
            Event::LocalMediaStarted { .. } => "local_media_started",
            Event::MediaUnavailable { .. } => "media_unavailable",
            Event::MuteChanged { .. } => "mute_changed",
            Event::CameraChanged { .. } => "camera_changed",
            Event::ScreenShareStarted { .. } => "screen_share_started",
            Event::ScreenShareStopped { .. } => "screen_share_stopped",
            Event::CallLeft => "call_left",
        }
    }

    /// Check if this is a screen-share event
    pub fn is_screen_share_event(&self) -> bool {
        matches!(
            self,
            Event::ScreenShareStarted { .. } | Event::ScreenShareStopped { .. }
        )
    }

    /// Check if this is a device failure
    pub fn is_error_event(&self) -> bool {
        matches!(self, Event::MediaUnavailable { .. })
    }
}

/// Stream of events for async iteration
#[derive(Debug)]
pub struct EventStream {
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Create a new event stream with a receiver
    pub fn new(receiver: mpsc::UnboundedReceiver<Event>) -> Self {
        Self { receiver }
    }

    /// Get the next event from the stream
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Try to get the next event without blocking
    pub fn try_next(&mut self) -> Result<Option<Event>, mpsc::error::TryRecvError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(mpsc::error::TryRecvError::Disconnected)
            }
        }
    }

    /// Drain every event already queued
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Close the event stream
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

impl futures::Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.receiver.poll_recv(cx)
    }
}

/// Fan-out of events to every live [`EventStream`]
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    senders: Vec<mpsc::UnboundedSender<Event>>,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        EventStream::new(rx)
    }

    pub(crate) fn emit(&mut self, event: Event) {
        debug!("📣 {}", event.event_type());
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
