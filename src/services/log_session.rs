//! One log viewer connection: send the recent tail, then follow the container's
//! output until the peer goes away.

use crate::{
    config::Config,
    models::errors::PanelError,
    services::docker::{Engine, LogStream},
};
use async_trait::async_trait;
use chrono::Utc;
use futures_util::{stream, Stream, StreamExt};
use log::{debug, info, warn};
use serde_json::json;
use std::time::Duration;
use tokio::time::{interval_at, sleep_until, Instant};

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub tail_lines: usize,
    pub follow: bool,
    pub ping_interval: Duration,
}

impl From<&Config> for LogSettings {
    fn from(config: &Config) -> Self {
        Self {
            tail_lines: config.log_tail_lines,
            follow: config.log_follow,
            ping_interval: Duration::from_secs(config.log_ping_interval_secs.max(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Streaming,
    Closed,
}

/// What the peer sent us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    Ping(Vec<u8>),
    Message,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerGone;

/// Outgoing half of the connection.
#[async_trait(?Send)]
pub trait FrameSink {
    async fn text(&mut self, text: String) -> Result<(), PeerGone>;
    async fn ping(&mut self) -> Result<(), PeerGone>;
    async fn pong(&mut self, payload: &[u8]) -> Result<(), PeerGone>;
    async fn close(&mut self);
}

fn error_frame(err: &PanelError) -> String {
    json!({
        "type": "error",
        "kind": err.kind(),
        "detail": err.to_string(),
    })
    .to_string()
}

pub struct LogSession<S: FrameSink> {
    sink: S,
    state: SessionState,
}

impl<S: FrameSink> LogSession<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn run<P>(
        &mut self,
        engine: &Engine,
        container_id: &str,
        settings: &LogSettings,
        mut peer: P,
    ) where
        P: Stream<Item = PeerEvent> + Unpin,
    {
        let mut since = match self.open(engine, container_id, settings).await {
            Ok(since) => since,
            Err(e) => {
                warn!("Log session for {} ended: {}", container_id, e);
                self.fail(&e).await;
                return;
            }
        };
        let mut follow = self.follow_from(engine, container_id, settings, since);

        let period = settings.ping_interval;
        let mut liveness = interval_at(Instant::now() + period, period);
        // set while the container is not running and the follow stream has ended
        let mut resume_at: Option<Instant> = None;

        while self.state == SessionState::Streaming {
            tokio::select! {
                event = peer.next() => match event {
                    Some(PeerEvent::Ping(payload)) => {
                        if self.sink.pong(&payload).await.is_err() {
                            break;
                        }
                    }
                    Some(PeerEvent::Message) => {}
                    Some(PeerEvent::Closed) | None => {
                        debug!("Peer left log session for {}", container_id);
                        break;
                    }
                },
                chunk = follow.next() => match chunk {
                    Some(Ok(text)) => {
                        if self.sink.text(text).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("Log stream for {} failed: {}", container_id, e);
                        self.fail(&e).await;
                        return;
                    }
                    None => {
                        info!("Log stream for {} ended, waiting for the container to run", container_id);
                        since = Utc::now().timestamp();
                        follow = stream::pending().boxed();
                        resume_at = Some(Instant::now() + period);
                    }
                },
                _ = sleep_until(resume_at.unwrap_or_else(Instant::now)), if resume_at.is_some() => {
                    resume_at = None;
                    if self.is_running(engine, container_id).await {
                        debug!("Container {} is running again, following its logs", container_id);
                        follow = self.follow_from(engine, container_id, settings, since);
                    } else {
                        resume_at = Some(Instant::now() + period);
                    }
                }
                _ = liveness.tick() => {
                    if self.sink.ping().await.is_err() {
                        debug!("Peer of log session for {} stopped answering", container_id);
                        break;
                    }
                }
            }
        }

        self.close().await;
    }

    /// Connecting -> Streaming: checks the container and sends the tail.
    /// Returns the unix second the follow stream should start from.
    async fn open(
        &mut self,
        engine: &Engine,
        container_id: &str,
        settings: &LogSettings,
    ) -> Result<i64, PanelError> {
        let docker = engine.connected()?;
        docker.inspect(container_id).await?;

        // follow picks up from here so nothing written during the tail fetch is lost
        let since = Utc::now().timestamp();
        let tail = docker.tail_logs(container_id, settings.tail_lines).await?;

        self.state = SessionState::Streaming;
        if self.sink.text(tail).await.is_err() {
            self.close().await;
        }
        Ok(since)
    }

    fn follow_from(
        &self,
        engine: &Engine,
        container_id: &str,
        settings: &LogSettings,
        since: i64,
    ) -> LogStream {
        match engine.connected() {
            Ok(docker) if settings.follow && self.state == SessionState::Streaming => {
                docker.follow_logs(container_id, since)
            }
            _ => stream::pending().boxed(),
        }
    }

    async fn is_running(&self, engine: &Engine, container_id: &str) -> bool {
        let Ok(docker) = engine.connected() else {
            return false;
        };
        match docker.inspect(container_id).await {
            Ok(container) => container.status == "running",
            Err(e) => {
                debug!("Waiting on {}: {}", container_id, e);
                false
            }
        }
    }

    async fn fail(&mut self, err: &PanelError) {
        if self.state != SessionState::Closed {
            let _ = self.sink.text(error_frame(err)).await;
        }
        self.close().await;
    }

    pub async fn close(&mut self) {
        if self.state != SessionState::Closed {
            self.state = SessionState::Closed;
            self.sink.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ContainerDescriptor;
    use crate::services::docker::testing::RecordingEngine;

    #[derive(Default)]
    struct RecordingSink {
        texts: Vec<String>,
        pongs: usize,
        closes: usize,
        fail_ping: bool,
        fail_text: bool,
    }

    #[async_trait(?Send)]
    impl<'a> FrameSink for &'a mut RecordingSink {
        async fn text(&mut self, text: String) -> Result<(), PeerGone> {
            if self.fail_text {
                return Err(PeerGone);
            }
            self.texts.push(text);
            Ok(())
        }

        async fn ping(&mut self) -> Result<(), PeerGone> {
            if self.fail_ping {
                Err(PeerGone)
            } else {
                Ok(())
            }
        }

        async fn pong(&mut self, _payload: &[u8]) -> Result<(), PeerGone> {
            self.pongs += 1;
            Ok(())
        }

        async fn close(&mut self) {
            self.closes += 1;
        }
    }

    fn settings(follow: bool) -> LogSettings {
        LogSettings {
            tail_lines: 2,
            follow,
            ping_interval: Duration::from_secs(60),
        }
    }

    fn container(id: &str, status: &str) -> ContainerDescriptor {
        ContainerDescriptor {
            id: id.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    fn running(id: &str) -> ContainerDescriptor {
        container(id, "running")
    }

    #[actix_web::test]
    async fn test_unknown_container_sends_error_frame_and_closes() {
        let (engine, _) = RecordingEngine::new().into_engine();
        let mut sink = RecordingSink::default();
        let mut session = LogSession::new(&mut sink);

        session
            .run(&engine, "ghost", &settings(true), stream::pending())
            .await;
        assert_eq!(session.state(), SessionState::Closed);

        assert_eq!(sink.closes, 1);
        assert_eq!(sink.texts.len(), 1);
        let frame: serde_json::Value = serde_json::from_str(&sink.texts[0]).unwrap();
        assert_eq!(frame["type"], "error");
        assert_eq!(frame["kind"], "not_found");
    }

    #[actix_web::test]
    async fn test_disconnected_engine_closes_immediately() {
        let mut sink = RecordingSink::default();
        let mut session = LogSession::new(&mut sink);
        session
            .run(&Engine::Disconnected, "abc", &settings(true), stream::pending())
            .await;
        assert_eq!(session.state(), SessionState::Closed);

        let frame: serde_json::Value = serde_json::from_str(&sink.texts[0]).unwrap();
        assert_eq!(frame["kind"], "engine_unavailable");
        assert_eq!(sink.closes, 1);
    }

    #[actix_web::test]
    async fn test_tail_then_follow_chunks() {
        let (engine, recording) = RecordingEngine::new()
            .with_container(running("abc"))
            .with_logs("abc", "one\ntwo\nthree\n")
            .with_follow_chunks("abc", &["four\n", "five\n"])
            .into_engine();
        let mut sink = RecordingSink::default();
        let mut session = LogSession::new(&mut sink);

        let outcome = tokio::time::timeout(
            Duration::from_millis(200),
            session.run(&engine, "abc", &settings(true), stream::pending()),
        )
        .await;
        assert!(outcome.is_err(), "session must wait for the peer");
        assert_eq!(session.state(), SessionState::Streaming);
        session.close().await;
        drop(session);

        assert_eq!(sink.texts, vec!["two\nthree\n", "four\n", "five\n"]);
        assert_eq!(sink.closes, 1);
        assert!(recording.calls().contains(&"tail abc 2".to_string()));
    }

    #[actix_web::test]
    async fn test_exited_container_keeps_session_open() {
        let (engine, recording) = RecordingEngine::new()
            .with_container(container("abc", "exited"))
            .with_logs("abc", "last words\n")
            .into_engine();
        let mut sink = RecordingSink::default();
        let mut session = LogSession::new(&mut sink);

        let outcome = tokio::time::timeout(
            Duration::from_millis(200),
            session.run(&engine, "abc", &settings(true), stream::pending()),
        )
        .await;
        assert!(outcome.is_err());
        assert_eq!(session.state(), SessionState::Streaming);
        drop(session);

        assert_eq!(sink.texts, vec!["last words\n"]);
        assert_eq!(sink.closes, 0);
        let follows = recording.calls().iter().filter(|c| *c == "follow abc").count();
        assert_eq!(follows, 1);
    }

    #[actix_web::test]
    async fn test_running_container_is_followed_again() {
        let (engine, recording) = RecordingEngine::new()
            .with_container(running("abc"))
            .with_follow_chunks("abc", &["again\n"])
            .into_engine();
        let mut sink = RecordingSink::default();
        let mut session = LogSession::new(&mut sink);
        let fast = LogSettings {
            ping_interval: Duration::from_millis(10),
            ..settings(true)
        };

        let outcome = tokio::time::timeout(
            Duration::from_millis(200),
            session.run(&engine, "abc", &fast, stream::pending()),
        )
        .await;
        assert!(outcome.is_err());
        drop(session);

        let follows = recording.calls().iter().filter(|c| *c == "follow abc").count();
        assert!(follows >= 2, "expected a new subscription, got {}", follows);
        assert!(sink.texts.iter().filter(|t| *t == "again\n").count() >= 2);
        assert_eq!(sink.closes, 0);
    }

    #[actix_web::test]
    async fn test_failed_tail_send_closes_without_following() {
        let (engine, recording) = RecordingEngine::new()
            .with_container(running("abc"))
            .with_logs("abc", "hello\n")
            .into_engine();
        let mut sink = RecordingSink {
            fail_text: true,
            ..Default::default()
        };
        let mut session = LogSession::new(&mut sink);

        session
            .run(&engine, "abc", &settings(true), stream::pending())
            .await;
        assert_eq!(session.state(), SessionState::Closed);
        drop(session);

        assert_eq!(sink.closes, 1);
        assert!(!recording.calls().iter().any(|c| c.starts_with("follow")));
    }

    #[actix_web::test]
    async fn test_tail_only_waits_for_peer_close() {
        let (engine, recording) = RecordingEngine::new()
            .with_container(running("abc"))
            .with_logs("abc", "hello\n")
            .into_engine();
        let mut sink = RecordingSink::default();
        let mut session = LogSession::new(&mut sink);

        let peer = stream::iter(vec![
            PeerEvent::Ping(b"hi".to_vec()),
            PeerEvent::Message,
            PeerEvent::Closed,
        ]);
        session.run(&engine, "abc", &settings(false), peer).await;

        assert_eq!(sink.texts, vec!["hello\n"]);
        assert_eq!(sink.pongs, 1);
        assert_eq!(sink.closes, 1);
        assert!(!recording.calls().iter().any(|c| c.starts_with("follow")));
    }

    #[actix_web::test]
    async fn test_failed_liveness_ping_closes() {
        let (engine, _) = RecordingEngine::new()
            .with_container(running("abc"))
            .into_engine();
        let mut sink = RecordingSink {
            fail_ping: true,
            ..Default::default()
        };
        let mut session = LogSession::new(&mut sink);
        let fast = LogSettings {
            ping_interval: Duration::from_millis(10),
            ..settings(false)
        };

        session.run(&engine, "abc", &fast, stream::pending()).await;
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(sink.closes, 1);
    }

    #[actix_web::test]
    async fn test_close_is_idempotent() {
        let mut sink = RecordingSink::default();
        let mut session = LogSession::new(&mut sink);
        session.close().await;
        session.close().await;
        drop(session);
        assert_eq!(sink.closes, 1);
    }
}
