use crate::core::normalize::FacetVector;
use crate::core::schema::{Facet, FacetSchema};

/// A vector from another schema is a configuration fault, not bad data
#[inline]
fn assert_fits(schema: &FacetSchema, vector: &FacetVector) {
    if let Err(e) = vector.check_schema(schema) {
        panic!("Facet vector does not match the scoring schema: {}", e);
    }
}

/// Weighted cosine similarity (0-1) between two facet vectors
///
/// # Panics
/// If either vector was built against a schema with a different facet count.
///
/// Scoring formula:
/// dot   = Σ weight · a · b
/// normA = √(Σ weight · a²)
/// normB = √(Σ weight · b²)
/// score = dot / (normA · normB), or 0 when either norm is zero
///
/// Products are formed as `weight · (a · b)` so that swapping the arguments
/// gives a bit-identical result.
pub fn weighted_cosine(schema: &FacetSchema, a: &FacetVector, b: &FacetVector) -> f64 {
    assert_fits(schema, a);
    assert_fits(schema, b);

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for ((weight, &x), &y) in schema.weights().zip(a.values()).zip(b.values()) {
        dot += weight * (x * y);
        norm_a += weight * (x * x);
        norm_b += weight * (y * y);
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator > 0.0 {
        (dot / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// The `n` facets contributing most to the weighted dot product of `a` and `b`.
///
/// Ties keep schema order.
pub fn top_contributions<'a>(
    schema: &'a FacetSchema,
    a: &FacetVector,
    b: &FacetVector,
    n: usize,
) -> Vec<&'a Facet> {
    assert_fits(schema, a);
    assert_fits(schema, b);

    let mut contributions: Vec<(usize, f64)> = schema
        .weights()
        .zip(a.values())
        .zip(b.values())
        .map(|((weight, &x), &y)| weight * (x * y))
        .enumerate()
        .collect();

    contributions.sort_by(|left, right| right.1.total_cmp(&left.1));

    contributions
        .into_iter()
        .take(n)
        .filter(|&(_, contribution)| contribution > 0.0)
        .map(|(index, _)| &schema.facets()[index])
        .collect()
}
