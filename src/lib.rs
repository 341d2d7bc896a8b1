use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Certainty,
    Evidence,
    Claim,
}

impl PatternCategory {
    pub const ALL: [PatternCategory; 3] = [
        PatternCategory::Certainty,
        PatternCategory::Evidence,
        PatternCategory::Claim,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Weights and thresholds for the scoring formula. Passed explicitly to
/// `analyze`; never ambient state. All fields are percentages in 0-100 and
/// `high_threshold` must be strictly greater than `medium_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub certainty_weight: u32,
    pub evidence_weight: u32,
    pub claim_weight: u32,
    pub high_threshold: u32,
    pub medium_threshold: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            certainty_weight: 50,
            evidence_weight: 30,
            claim_weight: 20,
            high_threshold: 70,
            medium_threshold: 40,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("certainty_weight", self.certainty_weight),
            ("evidence_weight", self.evidence_weight),
            ("claim_weight", self.claim_weight),
        ];
        for (field, value) in weights {
            if value > 100 {
                return Err(ConfigError::WeightOutOfRange { field, value });
            }
        }
        let thresholds = [
            ("high_threshold", self.high_threshold),
            ("medium_threshold", self.medium_threshold),
        ];
        for (field, value) in thresholds {
            if value > 100 {
                return Err(ConfigError::ThresholdOutOfRange { field, value });
            }
        }
        if self.high_threshold <= self.medium_threshold {
            return Err(ConfigError::ThresholdOrder {
                high: self.high_threshold,
                medium: self.medium_threshold,
            });
        }
        Ok(())
    }
}

/// Distinct lower-cased matched substrings, one sorted list per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet {
    pub certainty: Vec<String>,
    pub evidence: Vec<String>,
    pub claims: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub phrase: String,
    #[serde(rename = "type")]
    pub category: PatternCategory,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub certainty: f64,
    pub evidence: f64,
    pub claim: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32,
    pub risk_level: RiskLevel,
    pub certainty_indicators: usize,
    pub evidence_indicators: usize,
    pub claim_indicators: usize,
    pub ratio: String,
    pub word_count: usize,
    pub sentence_count: usize,
    pub matches: MatchSet,
    pub scores: ComponentScores,
    pub interpretation: String,
    pub flags: Vec<String>,
    pub suggestions: Vec<String>,
    pub highlighted_phrases: Vec<Highlight>,
    pub analysis_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be between 0 and 100, got {value}")]
    WeightOutOfRange { field: &'static str, value: u32 },
    #[error("{field} must be between 0 and 100, got {value}")]
    ThresholdOutOfRange { field: &'static str, value: u32 },
    #[error("high_threshold ({high}) must be greater than medium_threshold ({medium})")]
    ThresholdOrder { high: u32, medium: u32 },
}

// ---------------------------------------------------------------------------
// Calibration constants
// ---------------------------------------------------------------------------

// Per-category saturation multipliers are hand-tuned; they are not
// user-configurable.
struct Calibration {
    certainty_scale: f64,
    evidence_scale: f64,
    claim_scale: f64,
    absolute_terms_min: usize,
    score_min: f64,
    score_max: f64,
}

static CAL: Calibration = Calibration {
    certainty_scale: 30.0,
    evidence_scale: 20.0,
    claim_scale: 15.0,
    absolute_terms_min: 3,
    score_min: 0.0,
    score_max: 100.0,
};

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static CERTAINTY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Absolute adverbs
        r"(?i)\b(?:definitely|certainly|absolutely|undoubtedly|unquestionably)\b",
        // Universal quantifiers
        r"(?i)\b(?:always|never|all|none|every|everyone|nobody|nothing|everywhere)\b",
        // Emphatic adverbs
        r"(?i)\b(?:clearly|obviously|evidently|manifestly|plainly|undeniably)\b",
        // Authority / fact claims
        r"(?i)\b(?:proven|established|known|fact|indisputable|irrefutable)\b",
        // Strong modals
        r"(?i)\b(?:will|must|cannot|impossible|guaranteed|assured)\b",
        // Totality markers
        r"(?i)\b(?:universally|completely|entirely|totally|wholly|perfectly)\b",
        // Inevitability
        r"(?i)\b(?:inevitable|unavoidable|inescapable|certain to)\b",
        r"(?i)\bwithout (?:question|doubt)\b",
        // Consensus assertions ("scientists agree", "everyone knows")
        r"(?i)\b(?:scientists|experts|researchers|everyone|everybody)\s+(?:\w+ly\s+)?(?:agrees?|knows?|accepts?|acknowledges?)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static EVIDENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // URLs
        r"https?://\S+",
        // Numbered citations: [1]
        r"\[\d+\]",
        // Parenthetical year citations: (Author, 2020)
        r"\([^)]*\d{4}[^)]*\)",
        // Attribution phrases
        r"(?i)(?:\b(?:according to|based on|per|research shows|studies? show|data suggests?)\b|\bsource:)",
        // Hedging modals
        r"(?i)\b(?:might|could|may|possibly|likely|probably|perhaps|potentially)\b",
        // Hedging verbs
        r"(?i)\b(?:appears?|seems?|suggests?|indicates?|implies?)\b",
        // Approximation qualifiers
        r"(?i)\b(?:approximately|roughly|around|about|estimates?|estimated|potential)\b",
        // Quantified attribution ("many researchers")
        r"(?i)\b(?:some|many|several|various|numerous|multiple)\s+(?:researchers?|studies|experts?)\b",
        // DOI references
        r"(?i)\bdoi:\s*\d+\.\d+",
        // Et al. citations
        r"\b[A-Z][a-z]+ et al\.\s*\(\d{4}\)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static CLAIM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Numeric assertion with a unit
        r"(?i)\b\d+(?:\.\d+)?\s*(?:%|percent\b|degrees?\b|times\b|years?\b|people\b|users\b|millions?\b|billions?\b)",
        // Bare years
        r"\b\d{4}\b",
        // Causal connectors
        r"(?i)\b(?:causes?|caused by|leads? to|results? in|due to|because of|triggered by)\b",
        // Directional change with magnitude, bounded to one sentence
        r"(?i)\b(?:increas(?:e|es|ed|ing)|decreas(?:e|es|ed|ing)|ris(?:e|es|ing)|rose|risen|falls?|fell|fallen|grows?|grew|grown|declin(?:e|es|ed|ing))\b[^.!?]*?\b(?:by|to)\b[^.!?]*?\d+",
        // Correlation/causation statements, bounded to one sentence
        r"(?i)\b(?:correlation|causation|effect|impact|influence)\b[^.!?]*?\b(?:between|of)\b",
        // Comparative magnitude ("3 times more")
        r"(?i)\b\d+(?:\.\d+)?\s*times (?:more|less|higher|lower)\b",
        // Proof assertions
        r"(?i)\bprove[sd]?\s+that\b",
        r"(?i)\bdemonstrate[sd]?\s+that\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// The compiled pattern list for one category, in application order.
pub fn patterns(category: PatternCategory) -> &'static [Regex] {
    match category {
        PatternCategory::Certainty => &CERTAINTY_PATTERNS,
        PatternCategory::Evidence => &EVIDENCE_PATTERNS,
        PatternCategory::Claim => &CLAIM_PATTERNS,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// Floor of 1 so density normalization never divides by zero.
fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
        .max(1)
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

struct Scan {
    matches: MatchSet,
    highlights: Vec<Highlight>,
}

fn collect_category(
    text: &str,
    category: PatternCategory,
    highlights: &mut Vec<Highlight>,
) -> Vec<String> {
    let mut set = BTreeSet::new();
    for re in patterns(category) {
        for m in re.find_iter(text) {
            let phrase = m.as_str().trim().to_lowercase();
            if phrase.is_empty() {
                continue;
            }
            highlights.push(Highlight {
                phrase: phrase.clone(),
                category,
                position: m.start(),
            });
            set.insert(phrase);
        }
    }
    set.into_iter().collect()
}

fn scan_text(text: &str) -> Scan {
    let mut highlights = Vec::new();
    let certainty = collect_category(text, PatternCategory::Certainty, &mut highlights);
    let evidence = collect_category(text, PatternCategory::Evidence, &mut highlights);
    let claims = collect_category(text, PatternCategory::Claim, &mut highlights);

    highlights.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.phrase.cmp(&b.phrase))
    });
    highlights.dedup();

    Scan {
        matches: MatchSet {
            certainty,
            evidence,
            claims,
        },
        highlights,
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

fn sub_score(count: usize, sentences: usize, scale: f64) -> f64 {
    (count as f64 / sentences as f64 * scale).min(CAL.score_max)
}

fn combine(certainty: f64, evidence: f64, claim: f64, weights: &ScoringWeights) -> u32 {
    let raw = certainty * weights.certainty_weight as f64 / 100.0
        + (CAL.score_max - evidence) * weights.evidence_weight as f64 / 100.0
        + claim * weights.claim_weight as f64 / 100.0;
    raw.round().clamp(CAL.score_min, CAL.score_max) as u32
}

impl RiskLevel {
    fn classify(score: u32, weights: &ScoringWeights) -> RiskLevel {
        if score >= weights.high_threshold {
            RiskLevel::High
        } else if score >= weights.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

fn interpretation(
    score: u32,
    risk: RiskLevel,
    certainty: usize,
    evidence: usize,
    claims: usize,
) -> String {
    match risk {
        RiskLevel::High => format!(
            "This text exhibits strong confidence without adequate evidence (score: {score}/100). \
             It contains {certainty} certainty markers but only {evidence} evidence markers, \
             a {certainty}:{evidence} ratio of assertive language to supporting citations, \
             alongside {claims} verifiable claims. Assertions should be independently verified \
             before this content is trusted."
        ),
        RiskLevel::Medium => format!(
            "This text shows moderate confidence levels (score: {score}/100). \
             It contains {certainty} certainty markers against {evidence} evidence markers, \
             with {claims} verifiable claims. Critical assertions should still be checked, \
             especially those framed with certainty language."
        ),
        RiskLevel::Low => format!(
            "This text demonstrates good epistemic humility (score: {score}/100). \
             With {certainty} certainty markers and {evidence} evidence markers, claims are \
             hedged and qualified appropriately; {claims} verifiable claims were detected \
             with supporting context."
        ),
    }
}

fn flags_and_suggestions(
    certainty: usize,
    evidence: usize,
    claims: usize,
) -> (Vec<String>, Vec<String>) {
    let mut flags = Vec::new();
    let mut suggestions = Vec::new();
    let mut trigger = |flag: &str, suggestion: &str| {
        flags.push(flag.to_string());
        suggestions.push(suggestion.to_string());
    };

    if certainty > 0 {
        trigger("overconfident language", "Use more qualified language");
    }
    if certainty >= CAL.absolute_terms_min {
        trigger(
            "uses absolute terms",
            "Soften absolute statements with qualifiers",
        );
    }
    if evidence == 0 && (certainty > 0 || claims > 0) {
        trigger(
            "lacks sufficient citations",
            "Add credible sources and citations",
        );
    }
    if claims > evidence {
        trigger("unsupported claims", "Provide evidence for claims");
    }

    (flags, suggestions)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze `text` for confidence-without-evidence markers under the given
/// weights. Empty input is valid and yields a zero-marker, low-risk result;
/// the only failure mode is an invalid `ScoringWeights` configuration.
pub fn analyze(text: &str, weights: &ScoringWeights) -> Result<AnalysisResult, ConfigError> {
    weights.validate()?;

    let words = word_count(text);
    let sentences = sentence_count(text);
    let scan = scan_text(text);

    let certainty = scan.matches.certainty.len();
    let evidence = scan.matches.evidence.len();
    let claims = scan.matches.claims.len();

    let certainty_sub = sub_score(certainty, sentences, CAL.certainty_scale);
    let evidence_sub = sub_score(evidence, sentences, CAL.evidence_scale);
    let claim_sub = sub_score(claims, sentences, CAL.claim_scale);

    let score = combine(certainty_sub, evidence_sub, claim_sub, weights);
    let risk_level = RiskLevel::classify(score, weights);
    let (flags, suggestions) = flags_and_suggestions(certainty, evidence, claims);

    Ok(AnalysisResult {
        score,
        risk_level,
        certainty_indicators: certainty,
        evidence_indicators: evidence,
        claim_indicators: claims,
        ratio: format!("{certainty}:{evidence}"),
        word_count: words,
        sentence_count: sentences,
        interpretation: interpretation(score, risk_level, certainty, evidence, claims),
        flags,
        suggestions,
        matches: scan.matches,
        scores: ComponentScores {
            certainty: round2(certainty_sub),
            evidence: round2(evidence_sub),
            claim: round2(claim_sub),
        },
        highlighted_phrases: scan.highlights,
        analysis_time: Utc::now(),
    })
}
