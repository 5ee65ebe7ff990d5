//! Operation Catalog - static descriptors of every upstream capability
//!
//! The table in `operations` is the single source of truth for request shape:
//! the tool surface derives its schemas from it and the envelope client builds
//! requests from it.

mod descriptor;
mod operations;
mod path;
mod request;

pub use descriptor::{BodyShape, HttpMethod, OperationDescriptor, OperationKind, ParamKind, ParamSpec, Placement};
pub use operations::OPERATIONS;
pub use request::OperationRequest;

/// All descriptors in table order
pub fn operations() -> &'static [OperationDescriptor] {
    OPERATIONS
}

/// Look up a descriptor by operation name
pub fn find(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|op| op.name == name)
}
