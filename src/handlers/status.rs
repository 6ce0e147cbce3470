use crate::services::hardware::Sampler;
use actix_web::{web, HttpResponse, Responder};
use log::debug;

pub async fn get_system_status(sampler: web::Data<Sampler>) -> impl Responder {
    let status = sampler.sample();
    debug!(
        "System status: cpu {:.1}%, memory {:.1}%, disk {:.1}%",
        status.cpu, status.memory, status.disk
    );
    HttpResponse::Ok().json(status)
}
