//! The Objective-C → Swift type mapper.

mod mapper;
mod nullability;
mod objc_type;
mod swift_type;

pub use mapper::TypeMapper;
pub use nullability::{MappingContext, Nullability, Optionality};
pub use objc_type::{AnnotatedType, ObjcType, Primitive};
pub use swift_type::SwiftType;
