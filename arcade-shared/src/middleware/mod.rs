mod tracing_layer;
mod metrics_layer;
mod process_metrics;

pub use tracing_layer::*;
pub use metrics_layer::*;
pub use process_metrics::*;
