use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Configuration faults in a facet schema or weight table.
///
/// These are raised while the schema is being built at startup and are never
/// produced on the request path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Facet schema has no facets")]
    Empty,

    #[error("Facet at position {0} has an empty name")]
    BlankName(usize),

    #[error("Duplicate facet: {0}")]
    DuplicateFacet(String),

    #[error("Invalid weight for facet {facet}: {weight} (must be finite and positive)")]
    InvalidWeight { facet: String, weight: f64 },

    #[error("Weight table is missing facet: {0}")]
    MissingWeight(String),

    #[error("Weight table names unknown facet: {0}")]
    UnknownFacet(String),

    #[error("Vector has {actual} values but the schema has {expected} facets")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Broad character (primary) versus situational attributes (secondary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetTier {
    Primary,
    Secondary,
}

fn default_tier() -> FacetTier {
    FacetTier::Secondary
}

/// A single named [0, 1] dimension of a place's character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub weight: f64,
    #[serde(default = "default_tier")]
    pub tier: FacetTier,
    /// Short display label, used for derived tags
    #[serde(default)]
    pub label: String,
    /// One-line explanation handed to the oracle prompt
    #[serde(default)]
    pub description: String,
}

impl Facet {
    fn builtin(name: &str, weight: f64, tier: FacetTier, label: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            weight,
            tier,
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// The ordered facet list with its importance weights.
///
/// Built once at startup and shared read-only (usually behind an `Arc`) by
/// the normalizer, the scorer and the ranker. There is no way to mutate a
/// schema in place; `reweighted` produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetSchema {
    facets: Vec<Facet>,
}

impl FacetSchema {
    /// Validate and build a schema from an ordered facet list
    pub fn new(facets: Vec<Facet>) -> Result<Self, SchemaError> {
        if facets.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(facets.len());
        let mut facets = facets;

        for (position, facet) in facets.iter_mut().enumerate() {
            facet.name = facet.name.trim().to_string();
            if facet.name.is_empty() {
                return Err(SchemaError::BlankName(position));
            }
            if !seen.insert(facet.name.clone()) {
                return Err(SchemaError::DuplicateFacet(facet.name.clone()));
            }
            if !facet.weight.is_finite() || facet.weight <= 0.0 {
                return Err(SchemaError::InvalidWeight {
                    facet: facet.name.clone(),
                    weight: facet.weight,
                });
            }
            if facet.label.trim().is_empty() {
                facet.label = facet.name.replace('_', " ");
            }
        }

        Ok(Self { facets })
    }

    /// Replace every weight from a name → weight table.
    ///
    /// The table must name exactly the facets of this schema.
    pub fn reweighted(&self, table: &HashMap<String, f64>) -> Result<Self, SchemaError> {
        let mut unknown: Vec<&String> = table
            .keys()
            .filter(|name| self.index_of(name).is_none())
            .collect();
        unknown.sort();
        if let Some(name) = unknown.first() {
            return Err(SchemaError::UnknownFacet((*name).clone()));
        }

        let facets = self
            .facets
            .iter()
            .map(|facet| {
                table
                    .get(&facet.name)
                    .map(|&weight| Facet {
                        weight,
                        ..facet.clone()
                    })
                    .ok_or_else(|| SchemaError::MissingWeight(facet.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(facets)
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.facets.iter().map(|facet| facet.name.as_str())
    }

    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.facets.iter().map(|facet| facet.weight)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.facets.iter().position(|facet| facet.name == name)
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|index| self.facets[index].weight)
    }
}

impl Default for FacetSchema {
    /// The ten hand-tuned facets. Primary facets carry weights >= 0.85,
    /// secondary ones <= 0.60.
    fn default() -> Self {
        Self {
            facets: default_facets(),
        }
    }
}

/// Built-in facet table, also used as the configuration default
pub fn default_facets() -> Vec<Facet> {
    use FacetTier::{Primary, Secondary};

    vec![
        Facet::builtin(
            "artsy_creative",
            1.00,
            Primary,
            "artsy",
            "0 = no creative scene, 1 = galleries, studios and street art everywhere",
        ),
        Facet::builtin(
            "people_progressive_fancy",
            0.95,
            Primary,
            "progressive",
            "0 = traditional and conservative, 1 = progressive and trend-setting",
        ),
        Facet::builtin(
            "wealth_level",
            0.90,
            Primary,
            "wealthy",
            "0 = low-income, 1 = very affluent",
        ),
        Facet::builtin(
            "store_indie_vs_luxury",
            0.90,
            Primary,
            "indie shops",
            "0 = luxury and chain retail, 1 = independent and vintage shops",
        ),
        Facet::builtin(
            "population_scale",
            0.85,
            Primary,
            "big city",
            "0 = village or small town, 1 = dense global metropolis",
        ),
        Facet::builtin(
            "density_energy",
            0.60,
            Secondary,
            "high energy",
            "0 = sleepy and spread out, 1 = packed streets and constant bustle",
        ),
        Facet::builtin(
            "nightlife",
            0.55,
            Secondary,
            "nightlife",
            "0 = quiet after dark, 1 = bars and clubs until morning",
        ),
        Facet::builtin(
            "lgbtq_presence",
            0.50,
            Secondary,
            "queer-friendly",
            "0 = little visible LGBTQ+ community, 1 = a well-known LGBTQ+ hub",
        ),
        Facet::builtin(
            "student_presence",
            0.40,
            Secondary,
            "student crowd",
            "0 = few students, 1 = dominated by a university population",
        ),
        Facet::builtin(
            "green_space",
            0.35,
            Secondary,
            "green",
            "0 = concrete only, 1 = parks, trees and water everywhere",
        ),
    ]
}
