use crate::services::{
    docker::Engine,
    log_session::{FrameSink, LogSession, LogSettings, PeerEvent, PeerGone},
};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_ws::{Message, Session};
use async_trait::async_trait;
use futures_util::StreamExt;
use log::info;

/// WebSocket upgrade for `/api/ws/logs/{container_id}`.
pub async fn stream_logs(
    req: HttpRequest,
    body: web::Payload,
    path: web::Path<String>,
    engine: web::Data<Engine>,
    settings: web::Data<LogSettings>,
) -> Result<HttpResponse, Error> {
    let container_id = path.into_inner();
    let (response, session, messages) = actix_ws::handle(&req, body)?;

    let engine = engine.get_ref().clone();
    let settings = settings.get_ref().clone();

    actix_web::rt::spawn(async move {
        info!("Log session opened for {}", container_id);
        let peer = Box::pin(messages.map(peer_event));
        let mut session = LogSession::new(session);
        session.run(&engine, &container_id, &settings, peer).await;
        info!("Log session for {} is {:?}", container_id, session.state());
    });

    Ok(response)
}

fn peer_event<E>(message: Result<Message, E>) -> PeerEvent {
    match message {
        Ok(Message::Ping(payload)) => PeerEvent::Ping(payload.to_vec()),
        Ok(Message::Close(_)) | Err(_) => PeerEvent::Closed,
        Ok(_) => PeerEvent::Message,
    }
}

#[async_trait(?Send)]
impl FrameSink for Session {
    async fn text(&mut self, text: String) -> Result<(), PeerGone> {
        Session::text(self, text).await.map_err(|_| PeerGone)
    }

    async fn ping(&mut self) -> Result<(), PeerGone> {
        Session::ping(self, b"").await.map_err(|_| PeerGone)
    }

    async fn pong(&mut self, payload: &[u8]) -> Result<(), PeerGone> {
        Session::pong(self, payload).await.map_err(|_| PeerGone)
    }

    async fn close(&mut self) {
        // already-closed sessions report an error; nothing left to release
        let _ = Session::close(self.clone(), None).await;
    }
}
