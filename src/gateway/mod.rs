mod client;
mod endpoint;

pub use client::{BackendClient, BackendReply, Toggled};
pub use endpoint::{Command, DeleteFileRequest, PostAction, ReadEndpoint};
