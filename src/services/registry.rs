use crate::{
    models::{errors::PanelError, project::ContainerRecord},
    services::docker::Engine,
};
use log::{debug, error};

/// All containers, stopped ones included, in engine order.
///
/// Never fails: a disconnected engine or a failed listing yields an empty list
/// and the failure is logged.
pub async fn list_projects(engine: &Engine) -> Vec<ContainerRecord> {
    let docker = match engine.connected() {
        Ok(docker) => docker,
        Err(e) => {
            debug!("Listing projects skipped: {}", e);
            return vec![];
        }
    };

    match docker.list_containers(true).await {
        Ok(descriptors) => descriptors.iter().map(ContainerRecord::from).collect(),
        Err(e) => {
            error!("Failed to list Docker containers: {}", e);
            vec![]
        }
    }
}

pub async fn get_project(engine: &Engine, id: &str) -> Result<ContainerRecord, PanelError> {
    let descriptor = engine.connected()?.inspect(id).await?;
    Ok(ContainerRecord::from(&descriptor))
}
