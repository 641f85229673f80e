pub(crate) mod request;
pub(crate) mod response;

pub use request::{RequestContext, DEFAULT_METHOD, DEFAULT_PATH};
pub use response::Response;
