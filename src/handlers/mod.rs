pub mod logs;
pub mod projects;
pub mod status;

use crate::models::errors::PanelError;
use actix_web::web;

/// JSON API and log socket. Static assets are mounted separately, after these.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        PanelError::MalformedRequest(err.to_string()).into()
    }))
    .route(
        "/api/system/status",
        web::get().to(status::get_system_status),
    )
    .route("/api/projects", web::get().to(projects::list_projects))
    .route("/api/projects/{id}", web::get().to(projects::get_project))
    // registered before the `{action}` catch-all
    .route(
        "/api/project/create",
        web::post().to(projects::create_project),
    )
    .route(
        "/api/project/{action}",
        web::post().to(projects::manage_project),
    )
    .route(
        "/api/ws/logs/{container_id}",
        web::get().to(logs::stream_logs),
    );
}
