mod error;
mod pool;
mod server;

pub use error::ToolServerError;
pub use pool::ServerPool;
pub use server::{RemoteTool, ServerTransport, ToolServerHandle, find_tool};
