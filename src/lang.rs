//! Language codes: normalization and the registry of known ISO 639-1 codes.
//!
//! Codes are compared and stored in lowercase everywhere (cache keys, request
//! de-duplication, result maps). The registry is informational: translation
//! itself accepts any non-blank code.

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

/// Reduce a language code to its canonical form (trimmed, lowercase).
pub fn normalize_lang_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Normalize and de-duplicate a collection of language codes.
///
/// Blank codes are dropped. The result is ordered, so iteration over it is
/// deterministic.
pub fn normalize_lang_set<I, S>(codes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|code| normalize_lang_code(code.as_ref()))
        .filter(|code| !code.is_empty())
        .collect()
}

/// Registry of ISO 639-1 two-letter language codes.
pub struct LanguageRegistry {
    codes: HashSet<&'static str>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            codes: ISO_639_1_CODES.iter().copied().collect(),
        })
    }

    /// Check whether `code` is a known ISO 639-1 code (case-insensitive).
    pub fn is_known(&self, code: &str) -> bool {
        self.codes.contains(normalize_lang_code(code).as_str())
    }
}

#[rustfmt::skip]
const ISO_639_1_CODES: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az",
    "ba", "be", "bg", "bh", "bi", "bm", "bn", "bo", "br", "bs",
    "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv", "cy",
    "da", "de", "dv", "dz",
    "ee", "el", "en", "eo", "es", "et", "eu",
    "fa", "ff", "fi", "fj", "fo", "fr", "fy",
    "ga", "gd", "gl", "gn", "gu", "gv",
    "ha", "he", "hi", "ho", "hr", "ht", "hu", "hy", "hz",
    "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu",
    "ja", "jv",
    "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw", "ky",
    "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv",
    "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my",
    "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny",
    "oc", "oj", "om", "or", "os",
    "pa", "pi", "pl", "ps", "pt",
    "qu",
    "rm", "rn", "ro", "ru", "rw",
    "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw",
    "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty",
    "ug", "uk", "ur", "uz",
    "ve", "vi", "vo",
    "wa", "wo",
    "xh",
    "yi", "yo",
    "za", "zh", "zu",
];
