pub mod openai;

pub use openai::{MockUpstream, OpenAIMock, ReceivedRequest};
