//! Common scalar types shared across the data model.

use serde::{Deserialize, Serialize};

/// Language tag used for file classification and analyzer dispatch.
///
/// Discovery and the parser harness use this to partition the repository;
/// analyzers that only understand one language match on it and return
/// `unavailable` for the rest (see `TargetPayload`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
}

impl Language {
    /// File extensions associated with this language, for discovery classification.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["rs"],
            Language::Python => &["py", "pyi"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Go => &["go"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Go => "Go",
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::Rust,
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Go,
        ]
    }

    /// Classify an extension, preferring the most specific match (e.g. `.tsx` over `.ts`).
    pub fn from_extension(ext: &str) -> Option<Language> {
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&ext))
    }

    /// Look up a language by its display name, case-insensitively. Used to
    /// validate the `languages:` allowlist in `.arsrc.yml`.
    pub fn from_name(name: &str) -> Option<Language> {
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.display_name().eq_ignore_ascii_case(name))
    }
}

/// The seven analysis categories. Stable identifiers used as map keys
/// throughout scoring config, metrics and rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryId {
    /// Structure & complexity
    C1,
    /// Duplication
    C2,
    /// Testing
    C3,
    /// Architecture & coupling
    C4,
    /// Documentation
    C5,
    /// Conventions & idioms
    C6,
    /// Agent-evaluation (the hard core)
    C7,
}

impl CategoryId {
    pub const ALL: [CategoryId; 7] = [
        CategoryId::C1,
        CategoryId::C2,
        CategoryId::C3,
        CategoryId::C4,
        CategoryId::C5,
        CategoryId::C6,
        CategoryId::C7,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryId::C1 => "Structure & Complexity",
            CategoryId::C2 => "Duplication",
            CategoryId::C3 => "Testing",
            CategoryId::C4 => "Architecture & Coupling",
            CategoryId::C5 => "Documentation",
            CategoryId::C6 => "Conventions & Idioms",
            CategoryId::C7 => "Agent Evaluation",
        }
    }

    pub fn config_key(&self) -> &'static str {
        match self {
            CategoryId::C1 => "c1_structure",
            CategoryId::C2 => "c2_duplication",
            CategoryId::C3 => "c3_testing",
            CategoryId::C4 => "c4_architecture",
            CategoryId::C5 => "c5_documentation",
            CategoryId::C6 => "c6_conventions",
            CategoryId::C7 => "c7_agent_eval",
        }
    }
}

/// Which direction of raw value is "good" for a metric.
///
/// Governs clamp direction at the ends of a breakpoint table: for
/// `HigherIsBetter` a raw value above the top breakpoint clamps to the top
/// breakpoint's score (not necessarily 10); the same logic applies in
/// reverse for `LowerIsBetter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Coarse agent-readiness classification derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Hostile,
    Limited,
    Assisted,
    Ready,
    Unavailable,
}

impl Tier {
    /// Classify a composite score (already expected to be in `[1.0, 10.0]`).
    ///
    /// Boundaries are half-open on the low end: `[1.0, 4.0)` Hostile,
    /// `[4.0, 6.0)` Limited, `[6.0, 8.0)` Assisted, `[8.0, 10.0]` Ready.
    pub fn classify(composite: f64) -> Tier {
        if composite < 4.0 {
            Tier::Hostile
        } else if composite < 6.0 {
            Tier::Limited
        } else if composite < 8.0 {
            Tier::Assisted
        } else {
            Tier::Ready
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Hostile => "Hostile",
            Tier::Limited => "Limited",
            Tier::Assisted => "Assisted",
            Tier::Ready => "Ready",
            Tier::Unavailable => "unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_half_open_on_the_low_end() {
        assert_eq!(Tier::classify(1.0).label(), "Hostile");
        assert_eq!(Tier::classify(3.999).label(), "Hostile");
        assert_eq!(Tier::classify(4.0).label(), "Limited");
        assert_eq!(Tier::classify(5.999).label(), "Limited");
        assert_eq!(Tier::classify(6.0).label(), "Assisted");
        assert_eq!(Tier::classify(7.999).label(), "Assisted");
        assert_eq!(Tier::classify(8.0).label(), "Ready");
        assert_eq!(Tier::classify(10.0).label(), "Ready");
    }

    #[test]
    fn language_from_extension_disambiguates_ts_and_tsx() {
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("exe"), None);
    }

    #[test]
    fn language_from_name_is_case_insensitive() {
        assert_eq!(Language::from_name("rust"), Some(Language::Rust));
        assert_eq!(Language::from_name("Python"), Some(Language::Python));
        assert_eq!(Language::from_name("Cobol"), None);
    }
}
