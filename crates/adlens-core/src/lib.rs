pub mod error;
pub mod message;
pub mod model;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{AdlensError, Result};
    pub use crate::message::{ContentPart, ContentSource, Message, MessageContent};
    pub use crate::model::{CallOptions, ChatModel, ChatResult, ResponseFormat};
}
