// Domain models: the snapshot handed to the transport layer

mod metrics;
mod platform;

pub use metrics::{ByteRange, MetricsSnapshot};
pub use platform::{CpuMetric, PlatformKind};
