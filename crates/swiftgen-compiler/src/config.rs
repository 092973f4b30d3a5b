//! Translation-wide configuration. Threaded explicitly through
//! [`crate::translator::Translator`] construction rather than read from a
//! process-wide singleton.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOptions {
    /// Suppress `@objc`, the implicit `NSObject` base, `NSObjectProtocol`
    /// refinement and related Objective-C-compatibility attributes.
    #[serde(default)]
    pub omit_objc_compatibility: bool,
    /// Emit each intention's history as a comment block preceding its
    /// declaration.
    #[serde(default)]
    pub print_intention_history: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            omit_objc_compatibility: false,
            print_intention_history: false,
        }
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn defaults_keep_objc_compatibility_and_omit_history() {
        let opts = TranslationOptions::default();
        assert!(!opts.omit_objc_compatibility);
        assert!(!opts.print_intention_history);
    }

    #[test]
    fn round_trips_through_json() {
        let opts = TranslationOptions { omit_objc_compatibility: true, print_intention_history: true };
        let text = serde_json::to_string(&opts).unwrap();
        let back: TranslationOptions = serde_json::from_str(&text).unwrap();
        assert_eq!(opts, back);
    }
}
