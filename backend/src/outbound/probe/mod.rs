//! Preflight probe outbound adapters.

mod http_image_probe;

pub use http_image_probe::{DEFAULT_PROBE_TIMEOUT, HttpImageProbe};
