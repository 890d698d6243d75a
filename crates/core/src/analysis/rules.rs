//! Validation rule extraction.

use crate::keywords::{ExclusiveBound, SchemaKeywords};

use super::model::ValidationRule;

/// Validation rules of one property schema, in a fixed order.
///
/// OAS 3.0 `exclusiveMinimum: true` turns `minimum` into an exclusive bound, so
/// no `min` rule is emitted for it (likewise for the maximum).
pub fn extract_validation_rules(keywords: &SchemaKeywords, required: bool) -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    let exclusive_min = exclusive_bound(keywords.exclusive_minimum, keywords.minimum);
    let exclusive_max = exclusive_bound(keywords.exclusive_maximum, keywords.maximum);
    let min_is_exclusive = keywords.exclusive_minimum == Some(ExclusiveBound::Flag(true));
    let max_is_exclusive = keywords.exclusive_maximum == Some(ExclusiveBound::Flag(true));

    if required {
        rules.push(ValidationRule::Required);
    }
    if let Some(value) = keywords.min_length {
        rules.push(ValidationRule::MinLength { value });
    }
    if let Some(value) = keywords.max_length {
        rules.push(ValidationRule::MaxLength { value });
    }
    if let Some(value) = keywords.minimum
        && !min_is_exclusive
    {
        rules.push(ValidationRule::Min { value });
    }
    if let Some(value) = keywords.maximum
        && !max_is_exclusive
    {
        rules.push(ValidationRule::Max { value });
    }
    if let Some(pattern) = &keywords.pattern {
        rules.push(ValidationRule::Pattern {
            value: pattern.clone(),
        });
    }
    if keywords.format.as_deref() == Some("email") {
        rules.push(ValidationRule::Email);
    }
    if let Some(value) = exclusive_min {
        rules.push(ValidationRule::ExclusiveMinimum { value });
    }
    if let Some(value) = exclusive_max {
        rules.push(ValidationRule::ExclusiveMaximum { value });
    }
    if let Some(value) = keywords.multiple_of {
        rules.push(ValidationRule::MultipleOf { value });
    }
    if keywords.unique_items == Some(true) {
        rules.push(ValidationRule::UniqueItems);
    }
    if let Some(value) = keywords.min_items {
        rules.push(ValidationRule::MinItems { value });
    }
    if let Some(value) = keywords.max_items {
        rules.push(ValidationRule::MaxItems { value });
    }
    if let Some(value) = keywords.min_properties {
        rules.push(ValidationRule::MinProperties { value });
    }
    if let Some(value) = keywords.max_properties {
        rules.push(ValidationRule::MaxProperties { value });
    }
    if let Some(schema) = &keywords.contains {
        rules.push(ValidationRule::Contains {
            schema: schema.clone(),
            min_contains: keywords.min_contains,
            max_contains: keywords.max_contains,
        });
    }
    if let Some(value) = &keywords.const_value {
        rules.push(ValidationRule::Const {
            value: value.clone(),
        });
    }
    if let Some(schema) = &keywords.not {
        rules.push(ValidationRule::Not {
            schema: schema.clone(),
        });
    }

    rules
}

/// The effective exclusive bound from either the 3.1 numeric or the 3.0 flag form.
fn exclusive_bound(bound: Option<ExclusiveBound>, inclusive: Option<f64>) -> Option<f64> {
    match bound? {
        ExclusiveBound::Value(value) => Some(value),
        ExclusiveBound::Flag(true) => inclusive,
        ExclusiveBound::Flag(false) => None,
    }
}
