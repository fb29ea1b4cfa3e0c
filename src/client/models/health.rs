use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest score the analysis backend may report.
pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("score {0} is outside 0..=100")]
pub struct ScoreOutOfRange(pub u32);

/// A health score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Score(u8);

impl Score {
    pub fn new(value: u32) -> Result<Self, ScoreOutOfRange> {
        if value > MAX_SCORE as u32 {
            return Err(ScoreOutOfRange(value));
        }
        Ok(Score(value as u8))
    }

    /// Values above 100 become 100.
    pub const fn clamped(value: u8) -> Self {
        if value > MAX_SCORE {
            Score(MAX_SCORE)
        } else {
            Score(value)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn band(self) -> ScoreBand {
        ScoreBand::classify(self)
    }
}

impl TryFrom<u32> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl From<Score> for u32 {
    fn from(score: Score) -> Self {
        score.0 as u32
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Negative,
    Caution,
    Positive,
}

/// Three-way classification of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    Poor,
    Moderate,
    Excellent,
}

impl ScoreBand {
    pub fn classify(score: Score) -> Self {
        match score.value() {
            0..=30 => ScoreBand::Poor,
            31..=70 => ScoreBand::Moderate,
            _ => ScoreBand::Excellent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Poor => "Poor",
            ScoreBand::Moderate => "Moderate",
            ScoreBand::Excellent => "Excellent",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ScoreBand::Poor => Severity::Negative,
            ScoreBand::Moderate => Severity::Caution,
            ScoreBand::Excellent => Severity::Positive,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What the analysis backend reports for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResult {
    pub score: Score,
    pub ingredients: Vec<String>,
}

impl HealthResult {
    pub fn new(score: Score, ingredients: Vec<String>) -> Self {
        Self { score, ingredients }
    }

    pub fn card(&self) -> ScoreCard<'_> {
        ScoreCard::new(self)
    }
}

/// Display model for the score panel. Borrowing keeps the result immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard<'a> {
    pub score: Score,
    pub band: ScoreBand,
    pub ingredients: &'a [String],
}

impl<'a> ScoreCard<'a> {
    pub fn new(result: &'a HealthResult) -> Self {
        Self {
            score: result.score,
            band: result.score.band(),
            ingredients: &result.ingredients,
        }
    }

    pub fn label(&self) -> &'static str {
        self.band.label()
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}%", self.score)
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn ingredients_heading(&self) -> String {
        format!("Ingredients ({}):", self.ingredient_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(value: u32) -> ScoreBand {
        Score::new(value).unwrap().band()
    }

    #[test]
    fn boundaries_are_classified_explicitly() {
        assert_eq!(band(30), ScoreBand::Poor);
        assert_eq!(band(31), ScoreBand::Moderate);
        assert_eq!(band(70), ScoreBand::Moderate);
        assert_eq!(band(71), ScoreBand::Excellent);
    }

    #[test]
    fn classification_is_total_over_range() {
        for value in 0..=100u32 {
            let expected = if value <= 30 {
                "Poor"
            } else if value <= 70 {
                "Moderate"
            } else {
                "Excellent"
            };
            assert_eq!(band(value).label(), expected, "score {}", value);
            assert_eq!(band(value), band(value));
        }
    }

    #[test]
    fn severity_follows_band() {
        assert_eq!(band(0).severity(), Severity::Negative);
        assert_eq!(band(50).severity(), Severity::Caution);
        assert_eq!(band(100).severity(), Severity::Positive);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        assert_eq!(Score::new(101), Err(ScoreOutOfRange(101)));
        let parsed: Result<HealthResult, _> =
            serde_json::from_str(r#"{"score": 140, "ingredients": []}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn card_keeps_ingredient_order() {
        let result = HealthResult::new(
            Score::new(12).unwrap(),
            vec!["Sugar".to_string(), "Palm Oil".to_string(), "Salt".to_string()],
        );
        let card = result.card();
        assert_eq!(card.label(), "Poor");
        assert_eq!(card.score_text(), "Score: 12%");
        assert_eq!(card.ingredients_heading(), "Ingredients (3):");
        assert_eq!(card.ingredients, ["Sugar", "Palm Oil", "Salt"]);
    }
}
