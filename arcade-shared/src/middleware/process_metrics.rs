use metrics::gauge;
use std::sync::Mutex;
use sysinfo::{Pid, System};

pub const PROCESS_RESIDENT_MEMORY_BYTES: &str = "process_resident_memory_bytes";
pub const PROCESS_VIRTUAL_MEMORY_BYTES: &str = "process_virtual_memory_bytes";
pub const PROCESS_START_TIME_SECONDS: &str = "process_start_time_seconds";
pub const PROCESS_CPU_USAGE_PERCENT: &str = "process_cpu_usage_percent";

/// Samples this process's resource usage into gauges. Meant to be called
/// right before each scrape renders.
pub struct ProcessCollector {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl ProcessCollector {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "process metrics unavailable on this platform");
                None
            }
        };

        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }

    pub fn collect(&self) {
        let Some(pid) = self.pid else {
            return;
        };

        let mut system = match self.system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if !system.refresh_process(pid) {
            return;
        }

        if let Some(process) = system.process(pid) {
            gauge!(PROCESS_RESIDENT_MEMORY_BYTES).set(process.memory() as f64);
            gauge!(PROCESS_VIRTUAL_MEMORY_BYTES).set(process.virtual_memory() as f64);
            gauge!(PROCESS_START_TIME_SECONDS).set(process.start_time() as f64);
            gauge!(PROCESS_CPU_USAGE_PERCENT).set(process.cpu_usage() as f64);
        }
    }
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}
