//! Answer normalization and comparison.
//!
//! Both user input and expected answers are normalized before comparison:
//! surrounding whitespace is trimmed, the text is lowercased, and accented
//! characters are decomposed so their combining marks can be dropped. That
//! makes `"Volo "` match `"voló"`.

use unicode_normalization::UnicodeNormalization;

/// Normalize an answer for comparison.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// True when the normalized input equals any normalized accepted answer.
#[must_use]
pub fn matches_any<S: AsRef<str>>(raw: &str, accepted: &[S]) -> bool {
    let given = normalize(raw);
    accepted.iter().any(|a| normalize(a.as_ref()) == given)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_case_and_whitespace() {
        assert_eq!(normalize("Volo "), "volo");
        assert_eq!(normalize("voló"), "volo");
        assert_eq!(normalize("  ÁRBOL"), "arbol");
    }

    #[test]
    fn matches_across_accent_and_case_differences() {
        assert!(matches_any("Volo ", &["voló"]));
        assert!(matches_any("VOLO", &["Volo"]));
        assert!(!matches_any("vole", &["voló"]));
    }

    #[test]
    fn any_accepted_variant_matches() {
        let accepted = ["got", "gotten"];
        assert!(matches_any("gotten", &accepted));
        assert!(matches_any(" GOT ", &accepted));
        assert!(!matches_any("get", &accepted));
    }

    #[test]
    fn empty_input_only_matches_empty() {
        assert!(!matches_any("", &["went"]));
        assert!(!matches_any("   ", &["went"]));
    }
}
