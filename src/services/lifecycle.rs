use crate::{
    models::{
        errors::PanelError,
        project::REMARK_LABEL,
        requests::{
            CreateOutcome, ManageAction, ManageOutcome, ProjectCreateRequest, RestartPolicy,
            RunSpec, VolumeMount,
        },
    },
    services::docker::Engine,
};
use log::{info, warn};
use std::{collections::HashMap, path::Path};

/// Keeps a bare interpreter image alive; without it the container exits at once and
/// the `always` restart policy loops it.
const KEEP_ALIVE_SCRIPT: &str =
    "import time\nprint('Container started', flush=True)\nwhile True:\n    time.sleep(3600)";

pub fn keep_alive_command() -> Vec<String> {
    vec![
        "python".to_string(),
        "-u".to_string(),
        "-c".to_string(),
        KEEP_ALIVE_SCRIPT.to_string(),
    ]
}

pub async fn create(
    engine: &Engine,
    request: ProjectCreateRequest,
) -> Result<CreateOutcome, PanelError> {
    let spec = build_run_spec(request)?;
    let docker = engine.connected()?;

    if !docker.image_exists(&spec.image).await? {
        info!("Image {} not present locally, pulling", spec.image);
        docker.pull_image(&spec.image).await?;
    }

    let name = spec.name.clone();
    let id = docker.run(spec).await.map_err(|e| {
        warn!("Failed to run container {}: {}", name, e);
        e
    })?;
    info!("Container {} created with id {}", name, id);

    Ok(CreateOutcome {
        status: "success",
        id,
    })
}

pub async fn manage(
    engine: &Engine,
    action: &str,
    container_id: &str,
) -> Result<ManageOutcome, PanelError> {
    let action: ManageAction = action.parse()?;
    if container_id.trim().is_empty() {
        return Err(PanelError::MalformedRequest(
            "container_id must not be empty".to_string(),
        ));
    }
    let docker = engine.connected()?;

    let result = match action {
        ManageAction::Start => docker.start(container_id).await,
        ManageAction::Stop => docker.stop(container_id).await,
        ManageAction::Restart => docker.restart(container_id).await,
        ManageAction::Remove => docker.remove(container_id).await,
    };

    match result {
        Ok(()) => {
            info!("{} {}: ok", action, container_id);
            Ok(ManageOutcome {
                status: "success",
                action,
            })
        }
        Err(e) => {
            warn!("{} {} failed: {}", action, container_id, e);
            Err(e)
        }
    }
}

pub fn build_run_spec(request: ProjectCreateRequest) -> Result<RunSpec, PanelError> {
    let name = request.name.trim().to_string();
    let image = request.image.trim().to_string();
    if name.is_empty() {
        return Err(PanelError::MalformedRequest("name is required".to_string()));
    }
    if image.is_empty() {
        return Err(PanelError::MalformedRequest("image is required".to_string()));
    }

    let volume = match (request.volume_host, request.volume_container) {
        (Some(host), Some(container)) => {
            for path in [&host, &container] {
                if !Path::new(path).is_absolute() {
                    return Err(PanelError::MalformedRequest(format!(
                        "volume path must be absolute: {}",
                        path
                    )));
                }
            }
            Some(VolumeMount {
                host,
                container,
                read_only: false,
            })
        }
        (None, None) => None,
        _ => {
            return Err(PanelError::MalformedRequest(
                "volume_host and volume_container must be given together".to_string(),
            ))
        }
    };

    let command = match request.command.filter(|c| !c.trim().is_empty()) {
        Some(command) => Some(shlex::split(&command).ok_or_else(|| {
            PanelError::MalformedRequest(format!("cannot parse command: {}", command))
        })?),
        None if image.to_lowercase().contains("python") => Some(keep_alive_command()),
        None => None,
    };

    let ports = request
        .host_port
        .map(|host_port| vec![(format!("{}/tcp", request.container_port), host_port)])
        .unwrap_or_default();

    let labels = HashMap::from([(
        REMARK_LABEL.to_string(),
        request.remark.unwrap_or_default(),
    )]);

    Ok(RunSpec {
        image,
        name,
        command,
        ports,
        working_dir: volume.as_ref().map(|v| v.container.clone()),
        volumes: volume.into_iter().collect(),
        labels,
        restart_policy: RestartPolicy::Always,
    })
}
