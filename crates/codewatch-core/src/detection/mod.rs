//! Detector registry: runs detectors against artifacts and enforces the
//! `Detector` contract around each call.

pub mod registry;

pub use registry::{DetectorRegistry, REGISTRY_ID};

use std::any::Any;

/// Render a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
