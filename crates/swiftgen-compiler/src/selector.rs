//! Selector identity: an ordered list of keyword labels plus parameter
//! count. Two method signatures merge iff their selectors are equal;
//! parameter names and types are ignored for matching.

use swiftgen_core::{Interner, Symbol};

/// `keywords.len()` alone can't tell a zero-argument selector from a
/// one-argument single-keyword selector (`run` vs `run:`) since both carry
/// exactly one label; `has_colon` carries that bit explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    keywords: Vec<Symbol>,
    has_colon: bool,
}

impl Selector {
    /// A zero-argument selector like `name`: no colon, one label.
    pub fn unary(name: Symbol) -> Self {
        Self {
            keywords: vec![name],
            has_colon: false,
        }
    }

    /// A selector with one or more `label:` segments.
    pub fn keyword(keywords: Vec<Symbol>) -> Self {
        debug_assert!(!keywords.is_empty(), "a keyword selector needs at least one label");
        Self {
            keywords,
            has_colon: true,
        }
    }

    pub fn keywords(&self) -> &[Symbol] {
        &self.keywords
    }

    pub fn param_count(&self) -> usize {
        if self.has_colon {
            self.keywords.len()
        } else {
            0
        }
    }

    pub fn is_unary(&self) -> bool {
        !self.has_colon
    }

    /// The Swift method name: the selector's first keyword label.
    pub fn swift_name(&self) -> Symbol {
        self.keywords[0]
    }

    /// Subsequent keywords become Swift argument labels.
    pub fn swift_argument_labels(&self) -> &[Symbol] {
        &self.keywords[1.min(self.keywords.len())..]
    }

    /// The property getter selector synthesized for a property named `name`
    ///: the getter has the same selector as the property name.
    pub fn property_getter(name: Symbol) -> Self {
        Self::unary(name)
    }

    /// The property setter selector synthesized for a property named `name`
    ///: `setName:`, built by capitalizing the property name's first
    /// letter and prefixing `set`.
    pub fn property_setter(name: Symbol, interner: &mut Interner) -> Self {
        let text = interner.resolve(name).to_string();
        let label = interner.intern(&format!("set{}", capitalize(&text)));
        Self::keyword(vec![label])
    }

    pub fn render(&self, interner: &Interner) -> String {
        if self.is_unary() {
            return interner.resolve(self.keywords[0]).to_string();
        }
        self.keywords
            .iter()
            .map(|k| format!("{}:", interner.resolve(*k)))
            .collect()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod selector_tests {
    use super::*;
    use swiftgen_core::Interner;

    #[test]
    fn unary_selector_renders_without_colon() {
        let mut interner = Interner::new();
        let name = interner.intern("run");
        let sel = Selector::unary(name);
        assert_eq!(sel.render(&interner), "run");
        assert!(sel.is_unary());
    }

    #[test]
    fn keyword_selector_renders_with_colons() {
        let mut interner = Interner::new();
        let a = interner.intern("insertObject");
        let b = interner.intern("atIndex");
        let sel = Selector::keyword(vec![a, b]);
        assert_eq!(sel.render(&interner), "insertObject:atIndex:");
        assert_eq!(sel.param_count(), 2);
    }

    #[test]
    fn equal_selectors_ignore_nothing_but_keywords() {
        let mut interner = Interner::new();
        let a1 = interner.intern("run");
        let a2 = interner.intern("run");
        assert_eq!(a1, a2);
        assert_eq!(Selector::unary(a1), Selector::unary(a2));
    }

    #[test]
    fn unary_and_single_keyword_selectors_with_the_same_label_are_distinct() {
        let mut interner = Interner::new();
        let label = interner.intern("run");
        let getter = Selector::unary(label);
        let setter = Selector::keyword(vec![label]);
        assert_ne!(getter, setter);
        assert_eq!(getter.param_count(), 0);
        assert_eq!(setter.param_count(), 1);
    }

    #[test]
    fn property_setter_capitalizes_and_adds_colon() {
        let mut interner = Interner::new();
        let name = interner.intern("name");
        let setter = Selector::property_setter(name, &mut interner);
        assert_eq!(setter.render(&interner), "setName:");
    }
}
