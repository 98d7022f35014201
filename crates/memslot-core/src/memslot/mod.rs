//! Memory-slot command layer
//!
//! Command sequences for a detected device, expressed over the
//! [`Transport`](crate::transport::Transport) phases. Every operation takes
//! the transport and the [`DeviceProfile`](crate::profile::DeviceProfile)
//! produced by detection.

mod ops;

pub use ops::*;
