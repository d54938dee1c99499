//! Device backends

#[cfg(feature = "native")]
pub mod native;
pub mod virtual_devices;

#[cfg(feature = "native")]
pub use native::NativeDevices;
pub use virtual_devices::{Permission, PickerOutcome, VirtualDevices, VirtualSettings};

use crate::devices::MediaDevices;
use std::sync::Arc;

/// Get the appropriate device backend for this build
pub fn default_devices() -> Arc<dyn MediaDevices> {
    #[cfg(feature = "native")]
    {
        Arc::new(NativeDevices::new())
    }
    #[cfg(not(feature = "native"))]
    {
        Arc::new(VirtualDevices::new())
    }
}
