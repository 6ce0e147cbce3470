use crate::{
    models::{
        errors::PanelError,
        requests::{ManageRequest, ProjectCreateRequest},
    },
    services::{docker::Engine, lifecycle, registry},
};
use actix_web::{web, HttpResponse};
use log::info;

pub async fn list_projects(engine: web::Data<Engine>) -> HttpResponse {
    let projects = registry::list_projects(&engine).await;
    info!("Docker containers retrieved: {}", projects.len());
    HttpResponse::Ok().json(projects)
}

pub async fn get_project(
    engine: web::Data<Engine>,
    path: web::Path<String>,
) -> Result<HttpResponse, PanelError> {
    let project = registry::get_project(&engine, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

pub async fn create_project(
    engine: web::Data<Engine>,
    request: web::Json<ProjectCreateRequest>,
) -> Result<HttpResponse, PanelError> {
    let request = request.into_inner();
    info!("Creating project {} from image {}", request.name, request.image);
    let outcome = lifecycle::create(&engine, request).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub async fn manage_project(
    engine: web::Data<Engine>,
    path: web::Path<String>,
    request: web::Json<ManageRequest>,
) -> Result<HttpResponse, PanelError> {
    let outcome = lifecycle::manage(&engine, &path.into_inner(), &request.container_id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
