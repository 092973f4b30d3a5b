//! *map(ObjcType, MappingContext) → SwiftType*.

use swiftgen_core::{Interner, Symbol};

use super::nullability::MappingContext;
use super::objc_type::{ObjcType, Primitive};
use super::swift_type::SwiftType;

pub struct TypeMapper<'a> {
    interner: &'a mut Interner,
}

impl<'a> TypeMapper<'a> {
    pub fn new(interner: &'a mut Interner) -> Self {
        Self { interner }
    }

    pub fn map(&mut self, ty: &ObjcType, ctx: MappingContext) -> SwiftType {
        match ty {
            ObjcType::Primitive(p) => {
                // Primitives are always non-optional; still intern the
                // name so callers uniformly go through the interner.
                let name = self.interner.intern(p.swift_name());
                SwiftType::Nominal {
                    name,
                    generic_args: vec![],
                }
            }
            ObjcType::Void => SwiftType::Void,
            ObjcType::Id { protocols } => {
                let bare = if protocols.is_empty() {
                    SwiftType::AnyObject
                } else {
                    SwiftType::ProtocolComposition(protocols.clone())
                };
                bare.with_optionality(ctx.resolve())
            }
            ObjcType::Block { return_type, params } => {
                let returns = Box::new(self.map(return_type, ctx));
                let params = params.iter().map(|p| self.map(p, ctx)).collect();
                SwiftType::Function { params, returns }.with_optionality(ctx.resolve())
            }
            ObjcType::Named {
                name,
                generic_args,
                is_pointer,
            } => self.map_named(*name, generic_args, *is_pointer, ctx),
        }
    }

    fn map_named(
        &mut self,
        name: Symbol,
        generic_args: &[ObjcType],
        is_pointer: bool,
        ctx: MappingContext,
    ) -> SwiftType {
        let resolved_name = self.interner.resolve(name).to_string();

        if resolved_name == "NSArray" {
            if let Some(elem) = generic_args.first() {
                let mapped_elem = self.map(elem, ctx);
                return SwiftType::Array(Box::new(mapped_elem)).with_optionality(ctx.resolve());
            }
            return SwiftType::Nominal {
                name,
                generic_args: vec![],
            }
            .with_optionality(ctx.resolve());
        }

        if resolved_name == "NSString" || resolved_name == "NSMutableString" {
            let bridged = self.interner.intern("String");
            return SwiftType::Nominal {
                name: bridged,
                generic_args: vec![],
            }
            .with_optionality(ctx.resolve());
        }

        if resolved_name == "NSDictionary" {
            if generic_args.len() == 2 {
                let key = self.map(&generic_args[0], ctx);
                let value = self.map(&generic_args[1], ctx);
                return SwiftType::Dictionary {
                    key: Box::new(key),
                    value: Box::new(value),
                }
                .with_optionality(ctx.resolve());
            }
            return SwiftType::Nominal {
                name,
                generic_args: vec![],
            }
            .with_optionality(ctx.resolve());
        }

        // Bare value types (non-pointer, not a recognized primitive keyword)
        // are passed through nominally and never wrapped in optionality.
        if !is_pointer && Primitive::from_name(&resolved_name).is_none() {
            let mapped_args = generic_args.iter().map(|a| self.map(a, ctx)).collect();
            return SwiftType::Nominal {
                name,
                generic_args: mapped_args,
            };
        }

        let mapped_args = generic_args.iter().map(|a| self.map(a, ctx)).collect();
        SwiftType::Nominal {
            name,
            generic_args: mapped_args,
        }
        .with_optionality(ctx.resolve())
    }
}

#[cfg(test)]
mod mapper_tests {
    use super::*;
    use crate::types::nullability::{Nullability, Optionality};

    fn ctx(region: bool, explicit: Nullability) -> MappingContext {
        MappingContext::new(region, explicit)
    }

    #[test]
    fn bare_id_maps_to_anyobject() {
        let mut interner = Interner::new();
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Id { protocols: vec![] };
        let mapped = mapper.map(&ty, ctx(true, Nullability::Unspecified));
        assert_eq!(mapped, SwiftType::AnyObject);
    }

    #[test]
    fn id_with_protocols_is_a_composition() {
        let mut interner = Interner::new();
        let p1 = interner.intern("P1");
        let p2 = interner.intern("P2");
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Id {
            protocols: vec![p1, p2],
        };
        let mapped = mapper.map(&ty, ctx(true, Nullability::Unspecified));
        assert_eq!(mapped, SwiftType::ProtocolComposition(vec![p1, p2]));
    }

    #[test]
    fn nsarray_generic_maps_to_swift_array() {
        let mut interner = Interner::new();
        let nsarray = interner.intern("NSArray");
        let nsstring = interner.intern("NSString");
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Named {
            name: nsarray,
            generic_args: vec![ObjcType::Named {
                name: nsstring,
                generic_args: vec![],
                is_pointer: true,
            }],
            is_pointer: true,
        };
        let mapped = mapper.map(&ty, ctx(true, Nullability::Unspecified));
        assert!(matches!(mapped, SwiftType::Array(_)));
    }

    #[test]
    fn bare_nsarray_passes_through_nominally() {
        let mut interner = Interner::new();
        let nsarray = interner.intern("NSArray");
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Named {
            name: nsarray,
            generic_args: vec![],
            is_pointer: true,
        };
        let mapped = mapper.map(&ty, ctx(true, Nullability::Unspecified));
        assert_eq!(
            mapped,
            SwiftType::Nominal {
                name: nsarray,
                generic_args: vec![]
            }
        );
    }

    #[test]
    fn primitive_is_always_nonoptional_even_outside_region() {
        let mut interner = Interner::new();
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Primitive(Primitive::NsInteger);
        let mapped = mapper.map(&ty, ctx(false, Nullability::Nullable));
        assert!(!mapped.is_optional_like());
    }

    #[test]
    fn unspecified_outside_region_is_implicitly_unwrapped_optional() {
        let mut interner = Interner::new();
        let widget = interner.intern("Widget");
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Named {
            name: widget,
            generic_args: vec![],
            is_pointer: true,
        };
        let mapped = mapper.map(&ty, ctx(false, Nullability::Unspecified));
        match mapped {
            SwiftType::ImplicitlyUnwrapped(inner) => {
                assert_eq!(*inner, SwiftType::Nominal { name: widget, generic_args: vec![] })
            }
            other => panic!("expected implicitly unwrapped optional, got {other:?}"),
        }
        let _ = Optionality::Optional;
    }

    #[test]
    fn nsstring_bridges_to_swift_string() {
        let mut interner = Interner::new();
        let nsstring = interner.intern("NSString");
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Named {
            name: nsstring,
            generic_args: vec![],
            is_pointer: true,
        };
        let mapped = mapper.map(&ty, ctx(false, Nullability::Nullable));
        match mapped {
            SwiftType::Optional(inner) => assert_eq!(inner.render(&interner), "String"),
            other => panic!("expected an optional String, got {other:?}"),
        }
    }

    #[test]
    fn nsmutablestring_bridges_to_swift_string() {
        let mut interner = Interner::new();
        let nsmutable = interner.intern("NSMutableString");
        let mut mapper = TypeMapper::new(&mut interner);
        let ty = ObjcType::Named {
            name: nsmutable,
            generic_args: vec![],
            is_pointer: true,
        };
        let mapped = mapper.map(&ty, ctx(true, Nullability::Unspecified));
        assert_eq!(mapped.render(&interner), "String");
    }
}
