pub mod context;
pub mod http;
pub mod subsystems;
