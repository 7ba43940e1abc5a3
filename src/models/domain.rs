use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Supplier eligible for team membership, as stored by the candidate repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub capacity_numeric: u32,
    #[serde(default)]
    pub reputation_score: f64,
    #[serde(default)]
    pub projects_completed: u32,
    #[serde(default)]
    pub specialization: Specialization,
    #[serde(default)]
    pub total_earnings: f64,
}

impl Candidate {
    /// Case-insensitive check against the candidate's skill list
    pub fn has_skill_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(&needle))
    }
}

/// Skills arrive either as a JSON array or as a JSON-encoded string holding one
fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.starts_with('[') {
                serde_json::from_str(trimmed).map_err(serde::de::Error::custom)
            } else if trimmed.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(trimmed
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect())
            }
        }
        other => Err(serde::de::Error::custom(format!(
            "expected skills array, got {}",
            other
        ))),
    }
}

/// Supplier specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Specialization {
    EggSupply,
    Logistics,
    QualityControl,
    #[default]
    Other,
}

impl Specialization {
    /// Lenient parse of free-text specialization values ("Egg Supply", "logistics", ...)
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("egg") {
            Specialization::EggSupply
        } else if lower.contains("logistic") {
            Specialization::Logistics
        } else if lower.contains("quality") {
            Specialization::QualityControl
        } else {
            Specialization::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::EggSupply => "egg_supply",
            Specialization::Logistics => "logistics",
            Specialization::QualityControl => "quality_control",
            Specialization::Other => "other",
        }
    }
}

impl From<String> for Specialization {
    fn from(value: String) -> Self {
        Specialization::parse(&value)
    }
}

/// A project's stated needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequirement {
    pub location: String,
    pub capacity_needed: i64,
    pub budget: f64,
    #[serde(default = "default_skills")]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub project_type: Option<Specialization>,
}

pub fn default_skills() -> Vec<String> {
    vec!["Egg Supply".to_string()]
}

impl ProjectRequirement {
    /// Specialization the first supplier pass looks for: the explicit project type,
    /// else the first required skill naming a known specialization
    pub fn primary_specialization(&self) -> Specialization {
        if let Some(kind) = self.project_type {
            return kind;
        }

        self.skills_required
            .iter()
            .map(|skill| Specialization::parse(skill))
            .find(|kind| *kind != Specialization::Other)
            .unwrap_or(Specialization::Other)
    }
}

/// Candidate with its match score against one requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub match_score: f64,
}

/// Role a member plays inside a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    PrimarySupplier,
    SecondarySupplier,
    LogisticsCoordinator,
    QualityAssurance,
    TransportationSpecialist,
}

impl Role {
    pub fn is_supplier(&self) -> bool {
        matches!(self, Role::PrimarySupplier | Role::SecondarySupplier)
    }
}

/// Selected, role-assigned, capacity-allocated candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(flatten)]
    pub scored: ScoredCandidate,
    pub role: Role,
    pub allocated_capacity: u32,
}

impl TeamMember {
    pub fn id(&self) -> &str {
        &self.scored.candidate.id
    }

    pub fn candidate(&self) -> &Candidate {
        &self.scored.candidate
    }
}

/// Ordered team; no candidate id appears twice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team {
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn new(members: Vec<TeamMember>) -> Self {
        Self { members }
    }

    pub fn total_capacity(&self) -> u32 {
        self.members.iter().map(|m| m.allocated_capacity).sum()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.id()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id() == id)
    }

    pub fn supplier_count(&self) -> usize {
        self.members.iter().filter(|m| m.role.is_supplier()).count()
    }

    pub fn average_reputation(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.members
            .iter()
            .map(|m| m.candidate().reputation_score)
            .sum::<f64>()
            / self.members.len() as f64
    }
}

/// Pairwise mutual-exclusion set between candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    pairs: HashSet<(String, String)>,
}

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (a, b) in pairs {
            set.insert(a, b);
        }
        set
    }

    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let (a, b) = (a.into(), b.into());
        if a == b {
            return;
        }
        self.pairs.insert(ordered(a, b));
    }

    pub fn conflicts(&self, a: &str, b: &str) -> bool {
        if self.pairs.is_empty() || a == b {
            return false;
        }
        self.pairs.contains(&ordered(a.to_string(), b.to_string()))
    }

    /// True if `id` conflicts with any of `others`
    pub fn conflicts_with_any<'a, I>(&self, id: &str, others: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.pairs.is_empty() {
            return false;
        }
        others.into_iter().any(|other| self.conflicts(id, other))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn ordered(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One member's slice of the project budget, in whole currency units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostShare {
    pub member_id: String,
    pub share: i64,
}

/// Which path produced the recommended team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    Optimizer,
    GreedyFallback,
}

/// Engine output handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecommendation {
    pub recommended_team: Team,
    pub explanation: String,
    pub total_capacity: u32,
    pub capacity_needed: u32,
    pub partial_fulfillment: bool,
    pub estimated_cost: Vec<CostShare>,
    pub confidence_score: u8,
    pub average_reputation: f64,
    pub local_members: usize,
    pub strategy: SelectionStrategy,
}

/// Evolutionary search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    pub elitism_count: usize,
    pub mutation_rate: f64,
    pub min_score: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 10,
            elitism_count: 5,
            mutation_rate: 0.1,
            min_score: 30.0,
        }
    }
}
