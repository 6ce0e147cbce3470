use crate::models::status::SystemStatus;
use log::{error, warn};
use std::{ffi::CString, fs, sync::Mutex};
use sysinfo::System;

#[derive(Debug)]
pub enum SampleError {
    MemoryInfoUnavailable,
    DiskInfoUnavailable,
}

impl SampleError {
    pub fn message(&self) -> &str {
        match self {
            Self::MemoryInfoUnavailable => "Failed to retrieve memory information.",
            Self::DiskInfoUnavailable => "Failed to retrieve disk information.",
        }
    }
}

/// Reads host utilisation on demand. Only the CPU baseline is kept between calls,
/// because a CPU percentage is a delta between two refreshes.
pub struct Sampler {
    system: Mutex<System>,
    disk_path: String,
}

impl Sampler {
    pub fn new(disk_path: impl Into<String>) -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        Self {
            system: Mutex::new(system),
            disk_path: disk_path.into(),
        }
    }

    pub fn sample(&self) -> SystemStatus {
        let cpu = self.cpu_percent();

        let memory = get_memory_info()
            .map(|(used, total)| percent(used, total))
            .unwrap_or_else(|e| {
                error!("{}", e.message());
                0.0
            });

        let disk = get_disk_info(&self.disk_path)
            .map(|(available, total)| percent(total.saturating_sub(available), total))
            .unwrap_or_else(|e| {
                error!("{}", e.message());
                0.0
            });

        SystemStatus {
            cpu,
            memory,
            disk,
            hostname: get_hostname(),
            uptime_seconds: System::uptime(),
        }
    }

    fn cpu_percent(&self) -> f32 {
        match self.system.lock() {
            Ok(mut system) => {
                system.refresh_cpu_usage();
                system.global_cpu_usage().clamp(0.0, 100.0)
            }
            Err(_) => {
                warn!("CPU sampler lock poisoned");
                0.0
            }
        }
    }
}

fn get_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "Unknown".to_string())
}

fn percent(part: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as f32
}

pub fn get_memory_info() -> Result<(u64, u64), SampleError> {
    let meminfo = fs::read_to_string("/proc/meminfo")
        .map_err(|_| SampleError::MemoryInfoUnavailable)?;
    parse_meminfo(&meminfo)
}

fn parse_meminfo(meminfo: &str) -> Result<(u64, u64), SampleError> {
    let total_memory = extract_memory_value(meminfo, "MemTotal")?;
    let free_memory = extract_memory_value(meminfo, "MemAvailable")?;
    Ok((total_memory.saturating_sub(free_memory), total_memory))
}

fn extract_memory_value(meminfo: &str, key: &str) -> Result<u64, SampleError> {
    meminfo
        .lines()
        .find(|line| line.split(':').next() == Some(key))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse::<u64>().ok())
        .map(|kb| kb * 1024)
        .ok_or_else(|| {
            warn!("Key {} not found in /proc/meminfo", key);
            SampleError::MemoryInfoUnavailable
        })
}

/// `(available, total)` bytes of the filesystem holding `path`.
pub fn get_disk_info(path: &str) -> Result<(u64, u64), SampleError> {
    let c_path = CString::new(path).map_err(|_| SampleError::DiskInfoUnavailable)?;
    let mut statvfs: libc::statvfs = unsafe { std::mem::zeroed() };

    (unsafe { libc::statvfs(c_path.as_ptr(), &mut statvfs) } == 0)
        .then(|| {
            (
                statvfs.f_bavail as u64 * statvfs.f_frsize as u64,
                statvfs.f_blocks as u64 * statvfs.f_frsize as u64,
            )
        })
        .ok_or(SampleError::DiskInfoUnavailable)
}
