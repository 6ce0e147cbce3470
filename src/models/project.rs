use serde::Serialize;
use std::collections::HashMap;

/// Label under which the user-supplied remark is persisted on the container.
pub const REMARK_LABEL: &str = "panel.port_remark";

const UNKNOWN_IMAGE: &str = "unknown";
const NONE: &str = "none";

/// Container state as reported by the engine, reduced to what the panel needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDescriptor {
    pub id: String,
    pub name: String,
    pub status: String,
    pub image_tags: Vec<String>,
    pub port_bindings: Vec<PortBinding>,
    pub bind_mounts: Vec<String>,
    pub labels: HashMap<String, String>,
}

/// One internal `port/protocol` key and the host ports published for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortBinding {
    pub container_port: String,
    pub host_ports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    pub image: String,
    pub ports: String,
    pub mounts: String,
    pub remark: String,
    pub url: String,
}

impl From<&ContainerDescriptor> for ContainerRecord {
    fn from(descriptor: &ContainerDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            status: descriptor.status.clone(),
            image: image_summary(&descriptor.image_tags),
            ports: port_summary(&descriptor.port_bindings),
            mounts: mount_summary(&descriptor.bind_mounts),
            remark: remark_of(&descriptor.labels),
            url: inferred_url(&descriptor.port_bindings),
        }
    }
}

pub fn image_summary(tags: &[String]) -> String {
    tags.first()
        .cloned()
        .unwrap_or_else(|| UNKNOWN_IMAGE.to_string())
}

/// `8080->80, 8443->443`, or `none` when nothing is published.
pub fn port_summary(bindings: &[PortBinding]) -> String {
    let pairs: Vec<String> = bindings
        .iter()
        .flat_map(|binding| {
            let internal = container_port_number(&binding.container_port);
            binding
                .host_ports
                .iter()
                .map(move |host| format!("{}->{}", host, internal))
        })
        .collect();

    if pairs.is_empty() {
        NONE.to_string()
    } else {
        pairs.join(", ")
    }
}

/// Host path of the first bind mount.
pub fn mount_summary(binds: &[String]) -> String {
    binds
        .first()
        .and_then(|bind| bind.split(':').next())
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NONE.to_string())
}

pub fn remark_of(labels: &HashMap<String, String>) -> String {
    labels.get(REMARK_LABEL).cloned().unwrap_or_default()
}

/// Derived from the first host port in iteration order; never stored.
pub fn inferred_url(bindings: &[PortBinding]) -> String {
    bindings
        .iter()
        .flat_map(|binding| binding.host_ports.iter())
        .next()
        .map(|port| format!("http://localhost:{}", port))
        .unwrap_or_default()
}

fn container_port_number(key: &str) -> &str {
    key.split('/').next().unwrap_or(key)
}
