//! Name normalization and keyword extraction.
//!
//! Display names coming out of a DCC scene carry namespaces, asset-class
//! prefixes, shape suffixes and copy numbers ("chr:body_geo_01"). Matching
//! works on the normalized remainder plus a set of semantic keywords drawn
//! from a fixed body-part/clothing vocabulary. Everything in this module is a
//! pure function of its input.

use hashbrown::HashSet;
use meshlink_api_core::strip_namespace;
use serde::{Deserialize, Serialize};

/// Semantic vocabulary recognised during keyword extraction.
pub const VOCABULARY: &[&str] = &[
    "body", "head", "eye", "eyel", "eyer", "eyebrow", "eyelash", "hair", "face", "hand", "leg",
    "arm", "foot", "teeth", "lowteeth", "upteeth", "tongue", "tail", "fur", "skirt", "gauntlets",
    "necklace", "rope", "belt", "vitreous", "ball", "grow", "blend", "cloth",
];

/// Term pairs treated as semantically equivalent. A pair matches when one
/// name contains the left term and the other contains the right term, in
/// either direction.
pub const SPECIAL_PAIRS: &[(&str, &str)] = &[
    ("body", "body"),
    ("face", "face"),
    ("hair", "hair"),
    ("cloth", "cloth"),
    ("eye", "eye"),
    ("teeth", "teeth"),
    ("tongue", "tongue"),
    ("eye", "vitreous"),
    ("hair", "fur"),
    ("cloth", "skirt"),
    ("lowteeth", "teeth"),
    ("upteeth", "teeth"),
];

const PREFIXES: &[&str] = &["chr_", "prop_", "env_", "set_"];
const SUFFIXES: &[&str] = &["_shape", "_mesh", "_geo", "shape"];

/// Result of normalizing one display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalized {
    pub name: String,
    pub keywords: HashSet<String>,
}

/// Normalize a raw display name and extract its keywords.
pub fn normalize(display_name: &str) -> Normalized {
    let stripped = strip_namespace(display_name).to_ascii_lowercase();
    let mut name = stripped.clone();

    for prefix in PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest.to_string();
            break;
        }
    }

    // Peel copy numbers and shape suffixes until the name stops shrinking,
    // so "body_geo_01" reduces all the way to "body".
    loop {
        let before = name.len();
        name = strip_trailing_digits(&name);
        for suffix in SUFFIXES {
            if name.len() > suffix.len() {
                if let Some(rest) = name.strip_suffix(suffix) {
                    name = rest.trim_end_matches('_').to_string();
                    break;
                }
            }
        }
        if name.len() == before {
            break;
        }
    }

    let tokens: Vec<String> = name
        .split(['_', '-', ' '])
        .filter(|t| t.len() > 1 && !t.chars().all(|c| c.is_ascii_digit()))
        .map(singularize)
        .collect();

    let joined = if tokens.is_empty() {
        // Nothing survived tokenization (e.g. a bare copy number); fall back
        // to the namespace-stripped name so the node stays matchable.
        stripped
    } else {
        tokens.join("_")
    };

    let keywords = extract_keywords(&joined);
    Normalized {
        name: joined,
        keywords,
    }
}

/// True when `a` and `b` contain a known synonym pair (either direction).
pub fn is_special_pair(a: &str, b: &str) -> bool {
    SPECIAL_PAIRS
        .iter()
        .any(|(l, r)| (a.contains(l) && b.contains(r)) || (a.contains(r) && b.contains(l)))
}

/// Vocabulary terms contained in `name`. "vitreous", or "ball" together with
/// "eye", additionally implies the "eye" keyword.
pub fn extract_keywords(name: &str) -> HashSet<String> {
    let mut keywords: HashSet<String> = VOCABULARY
        .iter()
        .filter(|kw| name.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();
    if name.contains("vitreous") || (name.contains("ball") && name.contains("eye")) {
        keywords.insert("eye".to_string());
    }
    keywords
}

fn strip_trailing_digits(name: &str) -> String {
    let trimmed = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() == name.len() || trimmed.is_empty() {
        return name.to_string();
    }
    trimmed.trim_end_matches('_').to_string()
}

/// Reduce a plural token to its singular form, but only when the singular is
/// a known vocabulary term ("clothes" -> "cloth"; "vitreous" stays as is).
fn singularize(token: &str) -> String {
    if VOCABULARY.contains(&token) {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("es") {
        if VOCABULARY.contains(&stem) {
            return stem.to_string();
        }
    }
    if let Some(stem) = token.strip_suffix('s') {
        if VOCABULARY.contains(&stem) {
            return stem.to_string();
        }
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_namespace_prefix_and_suffixes() {
        assert_eq!(normalize("chr:chr_body_geo_01").name, "body");
        assert_eq!(normalize("prop_lantern_mesh").name, "lantern");
        assert_eq!(normalize("headShape").name, "head");
    }

    #[test]
    fn drops_short_and_numeric_tokens() {
        let n = normalize("L_eyeBall");
        assert_eq!(n.name, "eyeball");
        assert!(n.keywords.contains("eye"));
        assert!(n.keywords.contains("ball"));
    }

    #[test]
    fn singularizes_only_vocabulary_terms() {
        assert_eq!(normalize("clothes_skirt").name, "cloth_skirt");
        assert_eq!(normalize("eyeL_vitreous").name, "eyel_vitreous");
    }

    #[test]
    fn vitreous_implies_eye_keyword() {
        assert!(normalize("eyeL_vitreous").keywords.contains("eye"));
    }

    #[test]
    fn bare_copy_number_falls_back_to_stripped_name() {
        assert_eq!(normalize("ns:01").name, "01");
    }

    #[test]
    fn special_pairs_match_in_both_directions() {
        assert!(is_special_pair("eyeball", "eyel_vitreous"));
        assert!(is_special_pair("eyel_vitreous", "eyeball"));
        assert!(is_special_pair("upteeth", "teeth_lower"));
        assert!(!is_special_pair("hand", "foot"));
    }
}
