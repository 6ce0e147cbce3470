use serde::Serialize;

/// Host utilisation, sampled fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub cpu: f32,
    pub memory: f32,
    pub disk: f32,
    pub hostname: String,
    pub uptime_seconds: u64,
}
