//! Attribute access for parcel features.

use geojson::feature::Id;
use geojson::Feature;
use serde_json::Value;

use crate::siting::error::SitingError;

/// Identifier of a parcel feature.
///
/// Cadastral exports carry the identifier either at the feature level or as
/// an `id` property; both shapes occur in the wild and are accepted here.
pub fn parcel_id(feature: &Feature) -> Option<String> {
    match &feature.id {
        Some(Id::String(s)) => return Some(s.clone()),
        Some(Id::Number(n)) => return Some(n.to_string()),
        None => {}
    }
    match feature.properties.as_ref().and_then(|props| props.get("id")) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric value of a parcel attribute, accepting numbers and numeric
/// strings.
///
/// Returns `Ok(None)` when the field is absent or JSON null: such a parcel
/// cannot pass an area threshold, but it is not malformed. Any other
/// non-coercible value is a [`SitingError::DataFormat`]; callers decide
/// whether that is batch-fatal (strict filtering) or a per-feature skip
/// (merging, enrichment).
pub fn coerce_area(feature: &Feature, field: &str) -> Result<Option<f64>, SitingError> {
    let value = match feature.properties.as_ref().and_then(|props| props.get(field)) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(area) => Ok(Some(area)),
        None => Err(SitingError::DataFormat {
            field: field.to_string(),
            parcel: parcel_id(feature).unwrap_or_else(|| "<unknown>".to_string()),
            value: value.to_string(),
        }),
    }
}


#[cfg(test)]
mod tests {
    use geojson::feature::Id;
    use serde_json::json;

    use super::test_support::parcel;
    use super::*;

    #[test]
    fn test_parcel_id_prefers_feature_level_id() {
        let feature = parcel("59350000AB0001", json!(5000), 0.0);
        assert_eq!(parcel_id(&feature).as_deref(), Some("59350000AB0001"));
    }

    #[test]
    fn test_parcel_id_falls_back_to_property() {
        let mut feature = parcel("x", json!(5000), 0.0);
        feature.id = None;
        feature.set_property("id", "59350000AB0002");
        assert_eq!(parcel_id(&feature).as_deref(), Some("59350000AB0002"));
    }

    #[test]
    fn test_parcel_id_numeric_feature_id() {
        let mut feature = parcel("x", json!(5000), 0.0);
        feature.id = Some(Id::Number(42.into()));
        assert_eq!(parcel_id(&feature).as_deref(), Some("42"));
    }

    #[test]
    fn test_coerce_area_number_and_string() {
        let feature = parcel("a", json!(4500), 0.0);
        assert_eq!(coerce_area(&feature, "contenance").unwrap(), Some(4500.0));

        let feature = parcel("b", json!("4500.5"), 0.0);
        assert_eq!(coerce_area(&feature, "contenance").unwrap(), Some(4500.5));
    }

    #[test]
    fn test_coerce_area_absent_or_null() {
        let feature = parcel("a", json!(null), 0.0);
        assert_eq!(coerce_area(&feature, "contenance").unwrap(), None);
        assert_eq!(coerce_area(&feature, "surface").unwrap(), None);
    }

    #[test]
    fn test_coerce_area_garbage_is_data_format_error() {
        let feature = parcel("59350000AB0003", json!("n/a"), 0.0);
        let error = coerce_area(&feature, "contenance").unwrap_err();
        match error {
            SitingError::DataFormat { field, parcel, .. } => {
                assert_eq!(field, "contenance");
                assert_eq!(parcel, "59350000AB0003");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
