mod message;
pub mod api;
pub mod request;
pub mod response;

pub use message::EngineMessage;
pub use api::ApiReply;
pub use request::{EngineRequest, VoteDirection};
pub use response::{EngineReply, EngineResponse};
