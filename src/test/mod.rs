mod loopback;

pub use loopback::{loopback_device, loopback_opener, passthrough_reporter};
