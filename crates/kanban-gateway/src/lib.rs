pub mod http;
pub mod memory;
pub mod traits;

pub use http::HttpGateway;
pub use memory::{GatewayCall, MemoryGateway};
pub use traits::*;
