use crate::models::errors::PanelError;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

fn default_container_port() -> u16 {
    80
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectCreateRequest {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub host_port: Option<u16>,
    #[serde(default = "default_container_port")]
    pub container_port: u16,
    #[serde(default)]
    pub volume_host: Option<String>,
    #[serde(default)]
    pub volume_container: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManageRequest {
    pub container_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManageAction {
    Start,
    Stop,
    Restart,
    Remove,
}

impl FromStr for ManageAction {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" => Ok(Self::Restart),
            "remove" => Ok(Self::Remove),
            other => Err(PanelError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for ManageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Remove => "remove",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host: String,
    pub container: String,
    pub read_only: bool,
}

impl VolumeMount {
    /// Docker `binds` notation.
    pub fn to_bind(&self) -> String {
        let mode = if self.read_only { "ro" } else { "rw" };
        format!("{}:{}:{}", self.host, self.container, mode)
    }
}

/// Everything the engine needs to create and start one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub image: String,
    pub name: String,
    pub command: Option<Vec<String>>,
    /// `("80/tcp", 8080)` publishes container port 80 on host port 8080.
    pub ports: Vec<(String, u16)>,
    pub volumes: Vec<VolumeMount>,
    pub working_dir: Option<String>,
    pub labels: HashMap<String, String>,
    pub restart_policy: RestartPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOutcome {
    pub status: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManageOutcome {
    pub status: &'static str,
    pub action: ManageAction,
}
