use serde::{Deserialize, Serialize};

/// Four-stage narrative attached to every reference player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyStory {
    pub spark: String,
    pub breakthrough: String,
    pub peak: String,
    pub legacy: String,
}

/// Reference player the visitor is matched against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub role: String,
    pub archetype: String,
    #[serde(rename = "primeAge")]
    pub prime_age: u8,
    #[serde(rename = "heightCm")]
    pub height_cm: u16,
    #[serde(rename = "weightKg")]
    pub weight_kg: u16,
    pub story: LegacyStory,
}

/// Visitor-submitted physique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysiqueQuery {
    pub age: u8,
    #[serde(rename = "heightCm")]
    pub height_cm: u16,
    #[serde(rename = "weightKg")]
    pub weight_kg: u16,
}

impl PhysiqueQuery {
    pub fn new(age: u8, height_cm: u16, weight_kg: u16) -> Self {
        Self { age, height_cm, weight_kg }
    }

    /// Clamp and bucket the query into the matcher's internal domain
    pub fn normalized(&self) -> Self {
        crate::core::buckets::normalize(self)
    }
}

/// How a legacy match was decided
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Nearest { score: f64 },
}

/// Outcome of a single legacy match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyMatch {
    pub candidate: Candidate,
    pub query: PhysiqueQuery,
    #[serde(rename = "normalizedQuery")]
    pub normalized_query: PhysiqueQuery,
    #[serde(rename = "match")]
    pub kind: MatchKind,
}

/// Candidate with its weighted distance, used for ranked lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    #[serde(rename = "isExact")]
    pub is_exact: bool,
}

/// Per-axis weights of the distance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceWeights {
    pub height: f64,
    pub weight: f64,
    pub age: f64,
}

impl Default for DistanceWeights {
    fn default() -> Self {
        Self {
            height: 1.2,
            weight: 1.0,
            age: 0.6,
        }
    }
}

/// Contact details captured alongside a match request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: u8,
    #[serde(rename = "heightCm")]
    pub height_cm: u16,
    #[serde(rename = "weightKg")]
    pub weight_kg: u16,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
}

/// Stored lead record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: u8,
    #[serde(rename = "heightCm")]
    pub height_cm: u16,
    #[serde(rename = "weightKg")]
    pub weight_kg: u16,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}
