//! Resource model
//!
//! Entities produced by parsing annotations and consumed by generators and
//! the mock server.

pub mod document;
pub mod example;
pub mod headers;
pub mod param;
pub mod resource;
pub mod root;

pub use document::Document;
pub use example::{
    parse_urlencoded, BodyFormat, ExampleRequest, ExampleResponse, ParamMap, QueryValue,
    ResourceExample,
};
pub use headers::CaseInsensitiveMap;
pub use param::{Param, ParamKind, ParamType};
pub use resource::{Resource, ResourceRegistry, ResourceTree, Security};
pub use root::DocumentationRoot;
