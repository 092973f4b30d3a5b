//! The Swift side of the type mapper's output.

use swiftgen_core::Symbol;

use super::nullability::Optionality;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwiftType {
    Nominal {
        name: Symbol,
        generic_args: Vec<SwiftType>,
    },
    Array(Box<SwiftType>),
    Dictionary {
        key: Box<SwiftType>,
        value: Box<SwiftType>,
    },
    Function {
        params: Vec<SwiftType>,
        returns: Box<SwiftType>,
    },
    ProtocolComposition(Vec<Symbol>),
    AnyObject,
    Void,
    Optional(Box<SwiftType>),
    ImplicitlyUnwrapped(Box<SwiftType>),
}

impl SwiftType {
    /// Applies `Optionality` to a bare (non-optional) type, producing the
    /// final wrapped or unwrapped result. Every mapper exit point funnels
    /// through here so optionality handling lives in one place.
    pub fn with_optionality(self, optionality: Optionality) -> SwiftType {
        match optionality {
            Optionality::NonOptional => self,
            Optionality::Optional => SwiftType::Optional(Box::new(self)),
            Optionality::ImplicitlyUnwrapped => SwiftType::ImplicitlyUnwrapped(Box::new(self)),
        }
    }

    pub fn is_optional_like(&self) -> bool {
        matches!(self, SwiftType::Optional(_) | SwiftType::ImplicitlyUnwrapped(_))
    }

    /// The type stripped of one level of optionality wrapping, if any.
    pub fn unwrapped(&self) -> &SwiftType {
        match self {
            SwiftType::Optional(inner) | SwiftType::ImplicitlyUnwrapped(inner) => inner,
            other => other,
        }
    }

    pub fn render(&self, interner: &swiftgen_core::Interner) -> String {
        match self {
            SwiftType::Nominal { name, generic_args } => {
                let base = interner.resolve(*name);
                if generic_args.is_empty() {
                    base.to_string()
                } else {
                    let args: Vec<String> = generic_args.iter().map(|t| t.render(interner)).collect();
                    format!("{base}<{}>", args.join(", "))
                }
            }
            SwiftType::Array(elem) => format!("[{}]", elem.render(interner)),
            SwiftType::Dictionary { key, value } => {
                format!("[{}: {}]", key.render(interner), value.render(interner))
            }
            SwiftType::Function { params, returns } => {
                let params: Vec<String> = params.iter().map(|t| t.render(interner)).collect();
                format!("({}) -> {}", params.join(", "), returns.render(interner))
            }
            SwiftType::ProtocolComposition(names) => names
                .iter()
                .map(|s| interner.resolve(*s))
                .collect::<Vec<_>>()
                .join(" & "),
            SwiftType::AnyObject => "AnyObject".to_string(),
            SwiftType::Void => "Void".to_string(),
            SwiftType::Optional(inner) => format!("{}?", inner.render(interner)),
            SwiftType::ImplicitlyUnwrapped(inner) => format!("{}!", inner.render(interner)),
        }
    }
}
