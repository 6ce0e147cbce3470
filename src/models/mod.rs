pub mod errors;
pub mod project;
pub mod requests;
pub mod status;
