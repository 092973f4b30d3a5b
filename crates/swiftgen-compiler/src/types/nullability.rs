//! Nullability annotations and assume-nonnull region tracking.

/// Per parameter/return nullability annotation as written in source, or its
/// absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullability {
    #[default]
    Unspecified,
    Nonnull,
    Nullable,
    NullResettable,
}

impl Nullability {
    pub fn is_specified(self) -> bool {
        !matches!(self, Nullability::Unspecified)
    }

    /// Method-merge rule: copy the incoming side's annotation onto
    /// an unspecified target; otherwise keep the target's.
    pub fn merge_into(self, incoming: Nullability) -> Nullability {
        if matches!(self, Nullability::Unspecified) && incoming.is_specified() {
            incoming
        } else {
            self
        }
    }
}

/// The resolved optionality of a mapped Swift type, after applying
/// `MappingContext` policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optionality {
    NonOptional,
    Optional,
    ImplicitlyUnwrapped,
}

/// Mapping context threaded through the type mapper: the reader's current
/// assume-nonnull state plus any explicit annotation found at this type's
/// occurrence site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingContext {
    pub in_nonnull_region: bool,
    pub explicit: Nullability,
    /// Forces non-optional regardless of any other signal (e.g. a synthesized
    /// accessor parameter that can never carry nil).
    pub always_nonnull: bool,
}

impl MappingContext {
    pub fn new(in_nonnull_region: bool, explicit: Nullability) -> Self {
        Self {
            in_nonnull_region,
            explicit,
            always_nonnull: false,
        }
    }

    pub fn always_nonnull(mut self) -> Self {
        self.always_nonnull = true;
        self
    }

    /// Resolution policy: explicit modifier wins; else assume-nonnull
    /// region forces non-optional; else implicitly-unwrapped; `always_nonnull`
    /// overrides everything.
    pub fn resolve(self) -> Optionality {
        if self.always_nonnull {
            return Optionality::NonOptional;
        }
        match self.explicit {
            Nullability::Nonnull => Optionality::NonOptional,
            Nullability::Nullable | Nullability::NullResettable => Optionality::Optional,
            Nullability::Unspecified => {
                if self.in_nonnull_region {
                    Optionality::NonOptional
                } else {
                    Optionality::ImplicitlyUnwrapped
                }
            }
        }
    }
}

#[cfg(test)]
mod nullability_tests {
    use super::*;

    #[test]
    fn merge_copies_into_unspecified_target_only() {
        assert_eq!(
            Nullability::Unspecified.merge_into(Nullability::Nonnull),
            Nullability::Nonnull
        );
        assert_eq!(
            Nullability::Nullable.merge_into(Nullability::Nonnull),
            Nullability::Nullable
        );
    }

    #[test]
    fn explicit_modifier_wins_over_region() {
        let ctx = MappingContext::new(true, Nullability::Nullable);
        assert_eq!(ctx.resolve(), Optionality::Optional);
    }

    #[test]
    fn unspecified_in_region_is_nonoptional() {
        let ctx = MappingContext::new(true, Nullability::Unspecified);
        assert_eq!(ctx.resolve(), Optionality::NonOptional);
    }

    #[test]
    fn unspecified_outside_region_is_implicitly_unwrapped() {
        let ctx = MappingContext::new(false, Nullability::Unspecified);
        assert_eq!(ctx.resolve(), Optionality::ImplicitlyUnwrapped);
    }

    #[test]
    fn always_nonnull_overrides_explicit_nullable() {
        let ctx = MappingContext::new(false, Nullability::Nullable).always_nonnull();
        assert_eq!(ctx.resolve(), Optionality::NonOptional);
    }
}
