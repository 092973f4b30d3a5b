//! The Objective-C side of the type mapper: a tagged type descriptor
//! produced by the structural reader from a [`crate::cst::nodes::TypeRef`].

use swiftgen_core::Symbol;

use super::nullability::Nullability;

/// Objective-C type descriptor. This is deliberately not the CST node
/// itself — readers translate a `TypeRef` into one of these once, and the
/// mapper consumes the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjcType {
    /// `id` or `id<P1,P2>`. Empty `protocols` means bare `id`.
    Id { protocols: Vec<Symbol> },
    /// A named class or C type, with any generic arguments it carries
    /// (e.g. `NSArray<NSString *>`).
    Named {
        name: Symbol,
        generic_args: Vec<ObjcType>,
        is_pointer: bool,
    },
    Block {
        return_type: Box<ObjcType>,
        params: Vec<ObjcType>,
    },
    /// A C primitive scalar (`BOOL`, `NSInteger`, `CGFloat`, ...).
    Primitive(Primitive),
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    NsInteger,
    NsUInteger,
    CgFloat,
    Float,
    Double,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Short,
    UShort,
    Char,
    UChar,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        use Primitive::*;
        Some(match name {
            "BOOL" => Bool,
            "NSInteger" => NsInteger,
            "NSUInteger" => NsUInteger,
            "CGFloat" => CgFloat,
            "float" => Float,
            "double" => Double,
            "int" => Int,
            "unsigned int" | "unsigned" => UInt,
            "long" => Long,
            "unsigned long" => ULong,
            "long long" => LongLong,
            "unsigned long long" => ULongLong,
            "short" => Short,
            "unsigned short" => UShort,
            "char" => Char,
            "unsigned char" => UChar,
            _ => return None,
        })
    }

    /// The Swift value type this primitive maps to. Primitives are always
    /// non-optional regardless of nullability context.
    pub fn swift_name(self) -> &'static str {
        use Primitive::*;
        match self {
            Bool => "Bool",
            NsInteger => "Int",
            NsUInteger => "UInt",
            CgFloat => "CGFloat",
            Float => "Float",
            Double => "Double",
            Int => "Int32",
            UInt => "UInt32",
            Long => "Int",
            ULong => "UInt",
            LongLong => "Int64",
            ULongLong => "UInt64",
            Short => "Int16",
            UShort => "UInt16",
            Char => "Int8",
            UChar => "UInt8",
        }
    }
}

/// The parsed form of a single `(nullable)`/`nonnull` annotation site, as
/// attached to one [`ObjcType`] occurrence (a parameter, a return, an ivar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatedType<'a> {
    pub ty: &'a ObjcType,
    pub nullability: Nullability,
}
