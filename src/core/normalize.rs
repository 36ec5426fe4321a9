use crate::core::schema::{FacetSchema, SchemaError};
use serde_json::{Map, Value};

/// Value substituted for any missing or unusable facet
pub const NEUTRAL_FACET_VALUE: f64 = 0.5;

/// A complete assignment of a [0, 1] value to every facet of a schema.
///
/// Values are stored in schema order. The only ways to build one are
/// `normalize`, `normalize_with`, `neutral` and `from_values`, all of which
/// keep the vector total and clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetVector {
    values: Vec<f64>,
}

impl FacetVector {
    /// Every facet at the neutral midpoint
    pub fn neutral(schema: &FacetSchema) -> Self {
        Self {
            values: vec![NEUTRAL_FACET_VALUE; schema.len()],
        }
    }

    /// Build from values in schema order. Values are sanitized the same way
    /// `normalize` sanitizes them; only the length is checked.
    pub fn from_values(schema: &FacetSchema, values: Vec<f64>) -> Result<Self, SchemaError> {
        if values.len() != schema.len() {
            return Err(SchemaError::LengthMismatch {
                expected: schema.len(),
                actual: values.len(),
            });
        }

        Ok(Self {
            values: values.into_iter().map(clamp_unit).collect(),
        })
    }

    /// Whether this vector was built against a schema of this shape
    pub fn check_schema(&self, schema: &FacetSchema) -> Result<(), SchemaError> {
        if self.values.len() == schema.len() {
            Ok(())
        } else {
            Err(SchemaError::LengthMismatch {
                expected: schema.len(),
                actual: self.values.len(),
            })
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, schema: &FacetSchema, facet: &str) -> Option<f64> {
        schema.index_of(facet).and_then(|index| self.values.get(index).copied())
    }

    /// Facet name → value, in schema order
    pub fn to_map(&self, schema: &FacetSchema) -> Map<String, Value> {
        schema
            .names()
            .zip(&self.values)
            .map(|(name, &value)| (name.to_string(), Value::from(value)))
            .collect()
    }
}

/// Clamp a finite value into [0, 1]; anything else becomes the neutral value
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        NEUTRAL_FACET_VALUE
    }
}

/// Coerce the oracle's raw facet mapping into a complete FacetVector.
///
/// Never fails. Only JSON numbers count as values: strings, booleans, nulls,
/// nested objects and absent keys all become 0.5. A `raw` that is not an
/// object at all yields the neutral vector. Keys outside the schema are
/// ignored.
pub fn normalize(schema: &FacetSchema, raw: &Value) -> FacetVector {
    match raw.as_object() {
        Some(map) => normalize_with(schema, |facet| map.get(facet).and_then(Value::as_f64)),
        None => FacetVector::neutral(schema),
    }
}

/// Normalize from an arbitrary lookup; `None` means missing
pub fn normalize_with<F>(schema: &FacetSchema, lookup: F) -> FacetVector
where
    F: Fn(&str) -> Option<f64>,
{
    let values = schema
        .names()
        .map(|facet| lookup(facet).map_or(NEUTRAL_FACET_VALUE, clamp_unit))
        .collect();

    FacetVector { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_total(schema: &FacetSchema, vector: &FacetVector) {
        assert_eq!(vector.values().len(), schema.len());
        for value in vector.values() {
            assert!((0.0..=1.0).contains(value), "value {} out of range", value);
        }
    }

    #[test]
    fn test_empty_mapping_is_neutral() {
        let schema = FacetSchema::default();
        let vector = normalize(&schema, &json!({}));
        assert_total(&schema, &vector);
        assert_eq!(vector, FacetVector::neutral(&schema));
    }

    #[test]
    fn test_clamps_out_of_range() {
        let schema = FacetSchema::default();
        let vector = normalize(&schema, &json!({ "nightlife": 7.5, "green_space": -2 }));
        assert_eq!(vector.get(&schema, "nightlife"), Some(1.0));
        assert_eq!(vector.get(&schema, "green_space"), Some(0.0));
    }

    #[test]
    fn test_malformed_values_default_to_neutral() {
        let schema = FacetSchema::default();
        let vector = normalize(
            &schema,
            &json!({
                "artsy_creative": "0.9",
                "nightlife": null,
                "wealth_level": true,
                "green_space": [0.2],
                "student_presence": 0.25,
                "not_a_facet": 0.0,
            }),
        );
        assert_total(&schema, &vector);
        assert_eq!(vector.get(&schema, "artsy_creative"), Some(0.5));
        assert_eq!(vector.get(&schema, "nightlife"), Some(0.5));
        assert_eq!(vector.get(&schema, "wealth_level"), Some(0.5));
        assert_eq!(vector.get(&schema, "green_space"), Some(0.5));
        assert_eq!(vector.get(&schema, "student_presence"), Some(0.25));
    }

    #[test]
    fn test_non_object_input_is_neutral() {
        let schema = FacetSchema::default();
        for raw in [json!(null), json!("garbled"), json!([0.1, 0.2]), json!(3)] {
            assert_eq!(normalize(&schema, &raw), FacetVector::neutral(&schema));
        }
    }

    #[test]
    fn test_non_finite_lookup_values() {
        let schema = FacetSchema::default();
        let vector = normalize_with(&schema, |facet| match facet {
            "nightlife" => Some(f64::NAN),
            "green_space" => Some(f64::INFINITY),
            "wealth_level" => Some(f64::NEG_INFINITY),
            _ => Some(0.8),
        });
        assert_total(&schema, &vector);
        assert_eq!(vector.get(&schema, "nightlife"), Some(0.5));
        assert_eq!(vector.get(&schema, "green_space"), Some(0.5));
        assert_eq!(vector.get(&schema, "wealth_level"), Some(0.5));
        assert_eq!(vector.get(&schema, "artsy_creative"), Some(0.8));
    }

    #[test]
    fn test_from_values_checks_length() {
        let schema = FacetSchema::default();
        assert_eq!(
            FacetVector::from_values(&schema, vec![0.1; 3]),
            Err(SchemaError::LengthMismatch { expected: 10, actual: 3 })
        );
        let vector = FacetVector::from_values(&schema, vec![1.5; 10]).unwrap();
        assert!(vector.values().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_check_schema() {
        let schema = FacetSchema::default();
        assert_eq!(FacetVector::neutral(&schema).check_schema(&schema), Ok(()));

        let other = FacetSchema::new(schema.facets()[..2].to_vec()).unwrap();
        assert_eq!(
            FacetVector::neutral(&other).check_schema(&schema),
            Err(SchemaError::LengthMismatch { expected: 10, actual: 2 })
        );
    }

    #[test]
    fn test_to_map_keeps_schema_order() {
        let schema = FacetSchema::default();
        let map = FacetVector::neutral(&schema).to_map(&schema);
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(keys, names);
    }
}
