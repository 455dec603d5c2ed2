use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

#[derive(Debug, Clone)]
pub struct ResourceSnapshot {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
}

/// Per-stage timing for training runs, with optional process stats.
pub struct ResourceMonitor {
    started: Instant,
    #[cfg(feature = "cli")]
    probe: Option<Mutex<ProcessProbe>>,
}

#[cfg(feature = "cli")]
struct ProcessProbe {
    system: System,
    pid: Pid,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl ProcessProbe {
    fn new() -> Option<Self> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                tracing::warn!("Resource monitoring disabled: {}", e);
                return None;
            }
        };
        let mut system = System::new_all();
        system.refresh_all();
        Some(Self {
            system,
            pid,
            peak_memory_mb: 0,
        })
    }

    fn snapshot(&mut self) -> Option<ResourceSnapshot> {
        self.system.refresh_all();
        let process = self.system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);
        Some(ResourceSnapshot {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: self.peak_memory_mb,
        })
    }
}

impl ResourceMonitor {
    #[cfg(feature = "cli")]
    pub fn new(enabled: bool) -> Self {
        Self {
            started: Instant::now(),
            probe: if enabled {
                ProcessProbe::new().map(Mutex::new)
            } else {
                None
            },
        }
    }

    // 非 CLI 建置只記錄時間
    #[cfg(not(feature = "cli"))]
    pub fn new(_enabled: bool) -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "cli")]
        {
            self.probe.is_some()
        }
        #[cfg(not(feature = "cli"))]
        {
            false
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self) -> Option<ResourceSnapshot> {
        #[cfg(feature = "cli")]
        {
            let probe = self.probe.as_ref()?;
            let mut probe = probe.lock().ok()?;
            probe.snapshot()
        }
        #[cfg(not(feature = "cli"))]
        {
            None
        }
    }

    pub fn log_stage(&self, stage: &str, stage_elapsed: Duration) {
        match self.snapshot() {
            Some(stats) => tracing::info!(
                stage,
                elapsed_ms = stage_elapsed.as_millis() as u64,
                cpu_usage = stats.cpu_usage,
                memory_mb = stats.memory_mb,
                peak_memory_mb = stats.peak_memory_mb,
                "📊 stage finished"
            ),
            None => tracing::debug!(
                stage,
                elapsed_ms = stage_elapsed.as_millis() as u64,
                "stage finished"
            ),
        }
    }

    pub fn log_final(&self) {
        let peak = self.snapshot().map(|s| s.peak_memory_mb);
        tracing::info!(
            total_ms = self.elapsed().as_millis() as u64,
            peak_memory_mb = ?peak,
            "📊 training run finished"
        );
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
