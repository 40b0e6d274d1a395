pub mod middleware;
pub mod protocol;

pub use middleware::RequestLogger;
pub use protocol::{
    GetSwaggerInput, GetSwaggerOutput, ListSwaggerInput, ListSwaggersOutput, SpecView, ToolName,
};
