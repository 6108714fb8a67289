pub mod types;
pub mod engine;
pub mod utils;

pub use engine::{Engine, EngineError, EngineHandle, EngineNode, ErrorKind};
pub use types::EngineState;
