pub mod docker;
pub mod hardware;
pub mod lifecycle;
pub mod log_session;
pub mod registry;
