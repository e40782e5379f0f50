pub mod environment;
pub mod response;
