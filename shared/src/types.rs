//! Common types used across the dashboard

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quality score columns of the dataset.
///
/// The ten sub-scores live on a 0-10 scale, `TotalCupPoints` on 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    FragranceAroma,
    Flavor,
    Aftertaste,
    SaltAcid,
    BitterSweet,
    Mouthfeel,
    UniformCup,
    CleanCup,
    Balance,
    CupperPoints,
    TotalCupPoints,
}

impl ScoreField {
    /// The ten cupping sub-scores
    pub const SUB_SCORES: [ScoreField; 10] = [
        ScoreField::FragranceAroma,
        ScoreField::Flavor,
        ScoreField::Aftertaste,
        ScoreField::SaltAcid,
        ScoreField::BitterSweet,
        ScoreField::Mouthfeel,
        ScoreField::UniformCup,
        ScoreField::CleanCup,
        ScoreField::Balance,
        ScoreField::CupperPoints,
    ];

    /// Every field carried by the quality filter group
    pub const ALL: [ScoreField; 11] = [
        ScoreField::FragranceAroma,
        ScoreField::Flavor,
        ScoreField::Aftertaste,
        ScoreField::SaltAcid,
        ScoreField::BitterSweet,
        ScoreField::Mouthfeel,
        ScoreField::UniformCup,
        ScoreField::CleanCup,
        ScoreField::Balance,
        ScoreField::CupperPoints,
        ScoreField::TotalCupPoints,
    ];

    /// Column header in the source CSV
    pub fn column(&self) -> &'static str {
        match self {
            ScoreField::FragranceAroma => "Fragrance...Aroma",
            ScoreField::Flavor => "Flavor",
            ScoreField::Aftertaste => "Aftertaste",
            ScoreField::SaltAcid => "Salt...Acid",
            ScoreField::BitterSweet => "Bitter...Sweet",
            ScoreField::Mouthfeel => "Mouthfeel",
            ScoreField::UniformCup => "Uniform.Cup",
            ScoreField::CleanCup => "Clean.Cup",
            ScoreField::Balance => "Balance",
            ScoreField::CupperPoints => "Cupper.Points",
            ScoreField::TotalCupPoints => "Total.Cup.Points",
        }
    }

    /// Id of the range slider bound to this field on the page
    pub fn element_id(&self) -> &'static str {
        match self {
            ScoreField::FragranceAroma => "fragrance-aroma",
            ScoreField::Flavor => "flavor",
            ScoreField::Aftertaste => "aftertaste",
            ScoreField::SaltAcid => "salt-acid",
            ScoreField::BitterSweet => "bitter-sweet",
            ScoreField::Mouthfeel => "mouthfeel",
            ScoreField::UniformCup => "uniform-cup",
            ScoreField::CleanCup => "clean-cup",
            ScoreField::Balance => "balance",
            ScoreField::CupperPoints => "cupper-points",
            ScoreField::TotalCupPoints => "total-cup-points-big",
        }
    }

    pub fn domain(&self) -> ScoreDomain {
        match self {
            ScoreField::TotalCupPoints => ScoreDomain::total(),
            _ => ScoreDomain::sub_score(),
        }
    }

    /// Resolve a field from either its CSV column or its slider element id
    pub fn lookup(name: &str) -> Option<ScoreField> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.column() == name || field.element_id() == name)
    }
}

impl std::fmt::Display for ScoreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Closed numeric domain a score may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDomain {
    pub min: Decimal,
    pub max: Decimal,
}

impl ScoreDomain {
    /// 0-10, the scale of every cupping sub-score
    pub fn sub_score() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::TEN,
        }
    }

    /// 0-100, the scale of total cup points
    pub fn total() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
        }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    fn clamp(&self, value: Decimal) -> Decimal {
        value.max(self.min).min(self.max)
    }

    /// Clamp a raw widget number into the domain before it becomes a
    /// `Decimal`. `None` for non-finite input.
    fn clamp_f64(&self, value: f64) -> Option<Decimal> {
        if !value.is_finite() {
            return None;
        }
        let min = self.min.to_f64()?;
        let max = self.max.to_f64()?;
        Decimal::try_from(value.clamp(min, max)).ok()
    }
}

/// Inclusive `[lo, hi]` interval used by every range slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub lo: Decimal,
    pub hi: Decimal,
}

impl ScoreRange {
    /// Build a range already corrected against `domain`
    pub fn new(lo: Decimal, hi: Decimal, domain: ScoreDomain) -> Self {
        Self { lo, hi }.corrected(domain)
    }

    /// The whole domain, i.e. a slider with both handles at the ends
    pub fn full(domain: ScoreDomain) -> Self {
        Self {
            lo: domain.min,
            hi: domain.max,
        }
    }

    /// Build a range from raw widget numbers.
    ///
    /// Non-finite handles fall back to the matching domain bound.
    pub fn from_f64(lo: f64, hi: f64, domain: ScoreDomain) -> Self {
        let lo = domain.clamp_f64(lo).unwrap_or(domain.min);
        let hi = domain.clamp_f64(hi).unwrap_or(domain.max);
        Self::new(lo, hi, domain)
    }

    /// Clamp both bounds into `domain` and reorder them if they crossed
    pub fn corrected(self, domain: ScoreDomain) -> Self {
        let lo = domain.clamp(self.lo);
        let hi = domain.clamp(self.hi);
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// A missing value never lies inside a range
    pub fn contains_opt(&self, value: Option<Decimal>) -> bool {
        value.is_some_and(|v| self.contains(v))
    }
}
