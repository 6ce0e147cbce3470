use crate::models::{
    errors::PanelError,
    project::{ContainerDescriptor, PortBinding},
    requests::{RestartPolicy, RunSpec},
};
use async_trait::async_trait;
use bollard::{
    container::{
        Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions,
        LogOutput, LogsOptions, RemoveContainerOptions, RestartContainerOptions,
        StartContainerOptions, StopContainerOptions,
    },
    image::CreateImageOptions,
    models::{
        ContainerInspectResponse, ContainerSummary, HostConfig, MountPointTypeEnum,
        PortBinding as DockerPortBinding, PortMap, PortTypeEnum,
        RestartPolicy as DockerRestartPolicy, RestartPolicyNameEnum,
    },
    Docker, API_DEFAULT_VERSION,
};
use futures_util::{stream::BoxStream, StreamExt, TryStreamExt};
use log::{debug, info, warn};
use std::{collections::HashMap, sync::Arc};

/// Seconds the daemon waits for a graceful stop before killing.
const STOP_GRACE_SECS: i64 = 10;
const SOCKET_TIMEOUT_SECS: u64 = 120;

/// Decoded log chunks, in the order the daemon emits them.
pub type LogStream = BoxStream<'static, Result<String, PanelError>>;

/// Narrow view of the container engine used by the rest of the panel.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    async fn list_containers(
        &self,
        include_stopped: bool,
    ) -> Result<Vec<ContainerDescriptor>, PanelError>;

    async fn inspect(&self, id: &str) -> Result<ContainerDescriptor, PanelError>;

    async fn image_exists(&self, reference: &str) -> Result<bool, PanelError>;

    /// Blocks until the pull completes; no timeout is applied.
    async fn pull_image(&self, reference: &str) -> Result<(), PanelError>;

    /// Creates and starts a container, returning its short id.
    async fn run(&self, spec: RunSpec) -> Result<String, PanelError>;

    async fn start(&self, id: &str) -> Result<(), PanelError>;

    async fn stop(&self, id: &str) -> Result<(), PanelError>;

    async fn restart(&self, id: &str) -> Result<(), PanelError>;

    /// Forced: a running container is killed first.
    async fn remove(&self, id: &str) -> Result<(), PanelError>;

    async fn tail_logs(&self, id: &str, lines: usize) -> Result<String, PanelError>;

    /// Follows the log stream from `since` (unix seconds) until the container goes away.
    fn follow_logs(&self, id: &str, since: i64) -> LogStream;
}

/// Daemon handle, fixed at startup.
#[derive(Clone)]
pub enum Engine {
    Connected(Arc<dyn ContainerEngine>),
    Disconnected,
}

impl Engine {
    /// Connects to the daemon and pings it; any failure leaves the panel in disconnected mode.
    pub async fn connect(socket: Option<&str>) -> Self {
        let docker = match socket {
            Some(path) => Docker::connect_with_unix(path, SOCKET_TIMEOUT_SECS, API_DEFAULT_VERSION),
            None => Docker::connect_with_local_defaults(),
        };

        let docker = match docker {
            Ok(docker) => docker,
            Err(e) => {
                warn!("{}: {}", PanelError::EngineUnavailable, e);
                return Self::Disconnected;
            }
        };

        match docker.ping().await {
            Ok(_) => {
                info!("Connected to Docker daemon");
                Self::Connected(Arc::new(DockerEngine::new(docker)))
            }
            Err(e) => {
                warn!(
                    "Docker daemon did not answer ({}); running in disconnected mode",
                    e
                );
                Self::Disconnected
            }
        }
    }

    pub fn connected(&self) -> Result<&dyn ContainerEngine, PanelError> {
        match self {
            Self::Connected(engine) => Ok(engine.as_ref()),
            Self::Disconnected => Err(PanelError::EngineUnavailable),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

#[derive(Clone)]
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// `None` when the image can't be inspected (e.g. removed after the container was created).
    async fn repo_tags(&self, image_id: &str) -> Option<Vec<String>> {
        match self.docker.inspect_image(image_id).await {
            Ok(image) => Some(image.repo_tags.unwrap_or_default()),
            Err(e) => {
                debug!("Could not inspect image {}: {}", image_id, e);
                None
            }
        }
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn list_containers(
        &self,
        include_stopped: bool,
    ) -> Result<Vec<ContainerDescriptor>, PanelError> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all: include_stopped,
                ..Default::default()
            }))
            .await?;

        let mut tags: HashMap<String, Option<Vec<String>>> = HashMap::new();
        for image_id in containers.iter().filter_map(|c| c.image_id.as_deref()) {
            if !tags.contains_key(image_id) {
                tags.insert(image_id.to_string(), self.repo_tags(image_id).await);
            }
        }

        Ok(containers
            .into_iter()
            .map(|summary| {
                let repo_tags = summary
                    .image_id
                    .as_ref()
                    .and_then(|id| tags.get(id).cloned().flatten());
                with_repo_tags(descriptor_from_summary(summary), repo_tags)
            })
            .collect())
    }

    async fn inspect(&self, id: &str) -> Result<ContainerDescriptor, PanelError> {
        let response = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        let repo_tags = match response.image.as_deref() {
            Some(image_id) => self.repo_tags(image_id).await,
            None => None,
        };
        Ok(with_repo_tags(descriptor_from_inspect(response), repo_tags))
    }

    async fn image_exists(&self, reference: &str) -> Result<bool, PanelError> {
        match self.docker.inspect_image(reference).await {
            Ok(_) => Ok(true),
            Err(e) => match PanelError::from(e) {
                PanelError::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn pull_image(&self, reference: &str) -> Result<(), PanelError> {
        let (repository, tag) = split_image_reference(reference);
        info!("Pulling image {}:{}", repository, tag);

        let options = CreateImageOptions {
            from_image: repository,
            tag,
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(progress) = stream.next().await {
            match progress {
                Ok(info) => {
                    if let Some(status) = info.status {
                        debug!("Pull progress: {}", status);
                    }
                }
                Err(e) => return Err(PanelError::ImagePullFailed(e.to_string())),
            }
        }

        info!("Image {} pulled", reference);
        Ok(())
    }

    async fn run(&self, spec: RunSpec) -> Result<String, PanelError> {
        let options = CreateContainerOptions {
            name: spec.name.clone(),
            platform: None,
        };
        let created = self
            .docker
            .create_container(Some(options), container_config(spec))
            .await?;

        self.docker
            .start_container(&created.id, None::<StartContainerOptions<String>>)
            .await?;

        Ok(short_id(&created.id))
    }

    async fn start(&self, id: &str) -> Result<(), PanelError> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop(&self, id: &str) -> Result<(), PanelError> {
        self.docker
            .stop_container(id, Some(StopContainerOptions { t: STOP_GRACE_SECS }))
            .await?;
        Ok(())
    }

    async fn restart(&self, id: &str) -> Result<(), PanelError> {
        self.docker
            .restart_container(
                id,
                Some(RestartContainerOptions {
                    t: STOP_GRACE_SECS as isize,
                }),
            )
            .await?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), PanelError> {
        self.docker
            .remove_container(
                id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await?;
        Ok(())
    }

    async fn tail_logs(&self, id: &str, lines: usize) -> Result<String, PanelError> {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            tail: lines.to_string(),
            ..Default::default()
        };

        let chunks: Vec<LogOutput> = self.docker.logs(id, Some(options)).try_collect().await?;
        Ok(chunks.into_iter().map(decode_log_output).collect())
    }

    fn follow_logs(&self, id: &str, since: i64) -> LogStream {
        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            since,
            tail: "all".to_string(),
            ..Default::default()
        };

        self.docker
            .logs(id, Some(options))
            .map(|chunk| chunk.map(decode_log_output).map_err(PanelError::from))
            .boxed()
    }
}

/// Invalid UTF-8 is replaced, never reported.
fn decode_log_output(output: LogOutput) -> String {
    String::from_utf8_lossy(&output.into_bytes()).into_owned()
}

fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

/// Splits `registry:5000/team/app:1.2` into repository and tag; the tag defaults to `latest`.
/// Digest references keep the digest in the repository part and pull with an empty tag.
pub fn split_image_reference(reference: &str) -> (String, String) {
    if reference.contains('@') {
        return (reference.to_string(), String::new());
    }

    let name_start = reference.rfind('/').map_or(0, |slash| slash + 1);
    match reference[name_start..].rfind(':') {
        Some(colon) => {
            let split = name_start + colon;
            (
                reference[..split].to_string(),
                reference[split + 1..].to_string(),
            )
        }
        None => (reference.to_string(), "latest".to_string()),
    }
}

fn container_config(spec: RunSpec) -> Config<String> {
    let exposed_ports: HashMap<String, HashMap<(), ()>> = spec
        .ports
        .iter()
        .map(|(container_port, _)| (container_port.clone(), HashMap::new()))
        .collect();

    let port_bindings: PortMap = spec
        .ports
        .iter()
        .map(|(container_port, host_port)| {
            (
                container_port.clone(),
                Some(vec![DockerPortBinding {
                    host_ip: None,
                    host_port: Some(host_port.to_string()),
                }]),
            )
        })
        .collect();

    let binds: Vec<String> = spec.volumes.iter().map(|volume| volume.to_bind()).collect();

    let restart_policy = match spec.restart_policy {
        RestartPolicy::Always => RestartPolicyNameEnum::ALWAYS,
    };

    Config {
        image: Some(spec.image),
        cmd: spec.command,
        labels: Some(spec.labels),
        working_dir: spec.working_dir,
        exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
        host_config: Some(HostConfig {
            port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
            binds: (!binds.is_empty()).then_some(binds),
            restart_policy: Some(DockerRestartPolicy {
                name: Some(restart_policy),
                maximum_retry_count: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn image_tags(image: Option<String>) -> Vec<String> {
    image
        .filter(|image| !image.is_empty() && !image.starts_with("sha256:"))
        .into_iter()
        .collect()
}

fn with_repo_tags(
    mut descriptor: ContainerDescriptor,
    repo_tags: Option<Vec<String>>,
) -> ContainerDescriptor {
    if let Some(tags) = repo_tags {
        descriptor.image_tags = tags;
    }
    descriptor
}

/// `"80/tcp"` -> `(80, "tcp")`, so `80/tcp` comes before `1000/tcp`.
fn port_order(key: &str) -> (u32, &str) {
    let (port, protocol) = key.split_once('/').unwrap_or((key, ""));
    (port.parse().unwrap_or(u32::MAX), protocol)
}

fn trim_name(name: &str) -> String {
    name.trim_start_matches('/').to_string()
}

fn descriptor_from_summary(summary: ContainerSummary) -> ContainerDescriptor {
    let mut port_bindings: Vec<PortBinding> = Vec::new();
    for port in summary.ports.unwrap_or_default() {
        let protocol = match port.typ {
            Some(PortTypeEnum::UDP) => "udp",
            Some(PortTypeEnum::SCTP) => "sctp",
            _ => "tcp",
        };
        let key = format!("{}/{}", port.private_port, protocol);

        let index = match port_bindings.iter().position(|b| b.container_port == key) {
            Some(index) => index,
            None => {
                port_bindings.push(PortBinding {
                    container_port: key,
                    host_ports: Vec::new(),
                });
                port_bindings.len() - 1
            }
        };

        // the daemon lists the same binding once per address family
        if let Some(public) = port.public_port.map(|p| p.to_string()) {
            let host_ports = &mut port_bindings[index].host_ports;
            if !host_ports.contains(&public) {
                host_ports.push(public);
            }
        }
    }

    port_bindings.sort_by(|a, b| {
        port_order(&a.container_port).cmp(&port_order(&b.container_port))
    });

    let bind_mounts = summary
        .mounts
        .unwrap_or_default()
        .into_iter()
        .filter(|mount| mount.typ == Some(MountPointTypeEnum::BIND))
        .filter_map(|mount| {
            let source = mount.source?;
            let destination = mount.destination?;
            Some(match mount.mode.filter(|mode| !mode.is_empty()) {
                Some(mode) => format!("{}:{}:{}", source, destination, mode),
                None => format!("{}:{}", source, destination),
            })
        })
        .collect();

    ContainerDescriptor {
        id: short_id(&summary.id.unwrap_or_default()),
        name: summary
            .names
            .and_then(|names| names.into_iter().next())
            .map(|name| trim_name(&name))
            .unwrap_or_default(),
        status: summary.state.unwrap_or_default(),
        image_tags: image_tags(summary.image),
        port_bindings,
        bind_mounts,
        labels: summary.labels.unwrap_or_default(),
    }
}

fn descriptor_from_inspect(response: ContainerInspectResponse) -> ContainerDescriptor {
    let mut ports: Vec<(String, Option<Vec<DockerPortBinding>>)> = response
        .network_settings
        .and_then(|settings| settings.ports)
        .unwrap_or_default()
        .into_iter()
        .collect();
    // PortMap is a hash map
    ports.sort_by(|a, b| port_order(&a.0).cmp(&port_order(&b.0)));

    let port_bindings = ports
        .into_iter()
        .map(|(container_port, bindings)| {
            let mut host_ports: Vec<String> = Vec::new();
            for host_port in bindings
                .unwrap_or_default()
                .into_iter()
                .filter_map(|binding| binding.host_port)
            {
                if !host_ports.contains(&host_port) {
                    host_ports.push(host_port);
                }
            }
            PortBinding {
                container_port,
                host_ports,
            }
        })
        .collect();

    let (image, labels) = response
        .config
        .map(|config| (config.image, config.labels.unwrap_or_default()))
        .unwrap_or_default();

    ContainerDescriptor {
        id: short_id(&response.id.unwrap_or_default()),
        name: response.name.as_deref().map(trim_name).unwrap_or_default(),
        status: response
            .state
            .and_then(|state| state.status)
            .map(|status| status.to_string())
            .unwrap_or_default(),
        image_tags: image_tags(image),
        port_bindings,
        bind_mounts: response
            .host_config
            .and_then(|host| host.binds)
            .unwrap_or_default(),
        labels,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Bytes;
    use bollard::models::{
        ContainerConfig, ContainerState, ContainerStateStatusEnum, MountPoint, NetworkSettings,
        Port,
    };

    #[test]
    fn test_split_image_reference() {
        assert_eq!(
            split_image_reference("nginx"),
            ("nginx".to_string(), "latest".to_string())
        );
        assert_eq!(
            split_image_reference("python:3.9-slim"),
            ("python".to_string(), "3.9-slim".to_string())
        );
        assert_eq!(
            split_image_reference("localhost:5000/team/app"),
            ("localhost:5000/team/app".to_string(), "latest".to_string())
        );
        assert_eq!(
            split_image_reference("localhost:5000/team/app:2"),
            ("localhost:5000/team/app".to_string(), "2".to_string())
        );
        assert_eq!(
            split_image_reference("alpine@sha256:abcd"),
            ("alpine@sha256:abcd".to_string(), String::new())
        );
    }

    #[test]
    fn test_descriptor_from_summary() {
        let summary = ContainerSummary {
            id: Some("0123456789abcdef0123".to_string()),
            names: Some(vec!["/demo".to_string()]),
            image: Some("nginx".to_string()),
            state: Some("running".to_string()),
            ports: Some(vec![
                Port {
                    ip: Some("0.0.0.0".to_string()),
                    private_port: 80,
                    public_port: Some(8080),
                    typ: Some(PortTypeEnum::TCP),
                },
                Port {
                    ip: Some("::".to_string()),
                    private_port: 80,
                    public_port: Some(8080),
                    typ: Some(PortTypeEnum::TCP),
                },
                Port {
                    ip: None,
                    private_port: 443,
                    public_port: None,
                    typ: Some(PortTypeEnum::TCP),
                },
            ]),
            mounts: Some(vec![
                MountPoint {
                    typ: Some(MountPointTypeEnum::VOLUME),
                    source: Some("/var/lib/docker/volumes/x".to_string()),
                    destination: Some("/x".to_string()),
                    ..Default::default()
                },
                MountPoint {
                    typ: Some(MountPointTypeEnum::BIND),
                    source: Some("/srv/site".to_string()),
                    destination: Some("/usr/share/nginx/html".to_string()),
                    mode: Some("ro".to_string()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };

        let descriptor = descriptor_from_summary(summary);
        assert_eq!(descriptor.id, "0123456789ab");
        assert_eq!(descriptor.name, "demo");
        assert_eq!(descriptor.image_tags, vec!["nginx".to_string()]);
        assert_eq!(
            descriptor.port_bindings,
            vec![
                PortBinding {
                    container_port: "80/tcp".to_string(),
                    host_ports: vec!["8080".to_string()],
                },
                PortBinding {
                    container_port: "443/tcp".to_string(),
                    host_ports: vec![],
                },
            ]
        );
        assert_eq!(
            descriptor.bind_mounts,
            vec!["/srv/site:/usr/share/nginx/html:ro".to_string()]
        );
    }

    #[test]
    fn test_descriptor_from_inspect() {
        let mut ports: PortMap = HashMap::new();
        ports.insert(
            "1000/tcp".to_string(),
            Some(vec![DockerPortBinding {
                host_ip: Some("0.0.0.0".to_string()),
                host_port: Some("9000".to_string()),
            }]),
        );
        ports.insert(
            "80/tcp".to_string(),
            Some(vec![
                DockerPortBinding {
                    host_ip: Some("0.0.0.0".to_string()),
                    host_port: Some("8080".to_string()),
                },
                DockerPortBinding {
                    host_ip: Some("::".to_string()),
                    host_port: Some("8080".to_string()),
                },
            ]),
        );
        ports.insert("443/tcp".to_string(), None);

        let response = ContainerInspectResponse {
            id: Some("fedcba9876543210fedc".to_string()),
            name: Some("/web".to_string()),
            state: Some(ContainerState {
                status: Some(ContainerStateStatusEnum::EXITED),
                ..Default::default()
            }),
            config: Some(ContainerConfig {
                image: Some("nginx".to_string()),
                labels: Some(HashMap::from([(
                    "panel.port_remark".to_string(),
                    "site".to_string(),
                )])),
                ..Default::default()
            }),
            network_settings: Some(NetworkSettings {
                ports: Some(ports),
                ..Default::default()
            }),
            host_config: Some(HostConfig {
                binds: Some(vec!["/srv/site:/usr/share/nginx/html:rw".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let descriptor = descriptor_from_inspect(response);
        assert_eq!(descriptor.id, "fedcba987654");
        assert_eq!(descriptor.name, "web");
        assert_eq!(descriptor.status, "exited");
        assert_eq!(descriptor.image_tags, vec!["nginx".to_string()]);
        assert_eq!(
            descriptor.port_bindings,
            vec![
                PortBinding {
                    container_port: "80/tcp".to_string(),
                    host_ports: vec!["8080".to_string()],
                },
                PortBinding {
                    container_port: "443/tcp".to_string(),
                    host_ports: vec![],
                },
                PortBinding {
                    container_port: "1000/tcp".to_string(),
                    host_ports: vec!["9000".to_string()],
                },
            ]
        );
        assert_eq!(
            descriptor.bind_mounts,
            vec!["/srv/site:/usr/share/nginx/html:rw".to_string()]
        );
        assert_eq!(descriptor.labels["panel.port_remark"], "site");
    }

    #[test]
    fn test_listing_and_inspection_agree_on_port_order() {
        let summary = ContainerSummary {
            ports: Some(vec![
                Port {
                    ip: Some("0.0.0.0".to_string()),
                    private_port: 1000,
                    public_port: Some(9000),
                    typ: Some(PortTypeEnum::TCP),
                },
                Port {
                    ip: Some("0.0.0.0".to_string()),
                    private_port: 80,
                    public_port: Some(8080),
                    typ: Some(PortTypeEnum::TCP),
                },
            ]),
            ..Default::default()
        };
        let listed = descriptor_from_summary(summary);
        assert_eq!(listed.port_bindings[0].container_port, "80/tcp");

        let mut ports: PortMap = HashMap::new();
        for (container_port, host_port) in [("1000/tcp", "9000"), ("80/tcp", "8080")] {
            ports.insert(
                container_port.to_string(),
                Some(vec![DockerPortBinding {
                    host_ip: None,
                    host_port: Some(host_port.to_string()),
                }]),
            );
        }
        let inspected = descriptor_from_inspect(ContainerInspectResponse {
            network_settings: Some(NetworkSettings {
                ports: Some(ports),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(inspected.port_bindings, listed.port_bindings);
    }

    #[test]
    fn test_port_order() {
        assert!(port_order("80/tcp") < port_order("1000/tcp"));
        assert!(port_order("53/tcp") < port_order("53/udp"));
        assert!(port_order("1000/tcp") < port_order("bogus"));
    }

    #[test]
    fn test_repo_tags_replace_the_reference() {
        let descriptor = ContainerDescriptor {
            image_tags: vec!["nginx".to_string()],
            ..Default::default()
        };
        let resolved = with_repo_tags(descriptor.clone(), Some(vec!["nginx:latest".to_string()]));
        assert_eq!(resolved.image_tags, vec!["nginx:latest".to_string()]);

        // dangling image: no tags left
        let dangling = with_repo_tags(descriptor.clone(), Some(vec![]));
        assert!(dangling.image_tags.is_empty());

        let unresolved = with_repo_tags(descriptor, None);
        assert_eq!(unresolved.image_tags, vec!["nginx".to_string()]);
    }

    #[test]
    fn test_log_output_with_invalid_utf8_is_replaced() {
        let text = decode_log_output(LogOutput::StdOut {
            message: Bytes::from_static(b"ok \xff\xfe\n"),
        });
        assert!(text.starts_with("ok "));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with('\n'));

        let text = decode_log_output(LogOutput::StdErr {
            message: Bytes::from_static(b"plain\n"),
        });
        assert_eq!(text, "plain\n");
    }

    #[test]
    fn test_untagged_image_has_no_tags() {
        let summary = ContainerSummary {
            image: Some("sha256:deadbeef".to_string()),
            ..Default::default()
        };
        assert!(descriptor_from_summary(summary).image_tags.is_empty());
    }

    #[test]
    fn test_container_config_from_run_spec() {
        let spec = RunSpec {
            image: "nginx".to_string(),
            name: "demo".to_string(),
            command: None,
            ports: vec![("80/tcp".to_string(), 8080)],
            volumes: vec![],
            working_dir: None,
            labels: HashMap::new(),
            restart_policy: RestartPolicy::Always,
        };
        let config = container_config(spec);
        let host_config = config.host_config.unwrap();
        let bindings = host_config.port_bindings.unwrap();
        assert_eq!(
            bindings["80/tcp"].as_ref().unwrap()[0].host_port.as_deref(),
            Some("8080")
        );
        assert_eq!(
            host_config.restart_policy.unwrap().name,
            Some(RestartPolicyNameEnum::ALWAYS)
        );
        assert!(host_config.binds.is_none());
        assert!(config.exposed_ports.unwrap().contains_key("80/tcp"));
    }

    #[test]
    fn test_disconnected_engine_reports_unavailable() {
        let engine = Engine::Disconnected;
        assert!(!engine.is_connected());
        assert!(matches!(
            engine.connected(),
            Err(PanelError::EngineUnavailable)
        ));
    }
}
