//! `oneOf` + `discriminator` sub-forms.

use serde_json::Value;
use tracing::debug;

use super::model::{FormInterface, FormProperty, PolymorphicOption, PolymorphicPropertyConfig};
use super::resource::merged_properties;
use super::{FormAnalyzer, Walk};
use crate::keywords::{Discriminator, SchemaKeywords};
use crate::utils::{camel_case, pascal_case, ref_tail};

impl FormAnalyzer<'_> {
    /// Build the polymorphic config of a top-level property, if it is a
    /// discriminated `oneOf`. Returns the config and the nested interfaces of
    /// its sub-forms (the temporary per-branch interface is dropped).
    pub(super) fn analyze_polymorphism(
        &self,
        property: &FormProperty,
        walk: &mut Walk,
        depth: usize,
    ) -> Option<(PolymorphicPropertyConfig, Vec<FormInterface>)> {
        let schema = self.resolver.resolve(&property.schema)?;
        let discriminator = SchemaKeywords::of(&schema).discriminator?;
        let one_of = schema.get("oneOf")?;
        let field = discriminator.property_name.as_str();

        let mut discriminator_options: Vec<String> = Vec::new();
        let mut options = Vec::new();
        let mut references: Vec<Option<String>> = Vec::new();
        let mut kept = Vec::new();

        for (index, branch) in one_of.items().into_iter().enumerate() {
            let Some(resolved) = self.resolver.resolve(&branch) else {
                debug!(property = %property.name, index, "Skipping unresolvable oneOf branch.");
                continue;
            };
            let reference = branch.str_field("$ref").map(str::to_string);
            let properties = merged_properties(&self.resolver, &resolved);
            let Some(tag) = properties.iter().find(|p| p.name == field) else {
                debug!(property = %property.name, index, field, "Branch lacks the discriminator property.");
                continue;
            };

            let tag_keywords = self
                .resolver
                .resolve(&tag.schema)
                .map(|node| SchemaKeywords::of(&node))
                .unwrap_or_default();
            let enum_values: Vec<String> = tag_keywords
                .enum_values
                .iter()
                .flatten()
                .filter_map(value_text)
                .collect();
            for value in &enum_values {
                push_unique(&mut discriminator_options, value);
            }

            let Some(value) =
                discriminator_value(&enum_values, &tag_keywords, &discriminator, reference.as_deref())
            else {
                debug!(property = %property.name, index, "No discriminator value for inline branch.");
                continue;
            };
            push_unique(&mut discriminator_options, &value);

            let model_name = reference
                .as_deref()
                .map_or_else(|| format!("Option{}", index + 1), |r| pascal_case(&ref_tail(r)));
            let temp_interface = format!("Temp{model_name}Form");
            let remaining: Vec<FormProperty> =
                properties.into_iter().filter(|p| p.name != field).collect();
            let (controls, interfaces) =
                self.analyze_controls(&remaining, &temp_interface, false, walk, depth + 1);
            kept.extend(interfaces.into_iter().filter(|i| i.name != temp_interface));

            options.push(PolymorphicOption {
                discriminator_value: value,
                sub_form_name: format!("{}Form", camel_case(&model_name)),
                model_name,
                controls,
            });
            references.push(reference);
        }

        let default_option = discriminator
            .default_mapping
            .as_deref()
            .and_then(|default| default_option(&options, &references, &discriminator, default));

        debug!(
            property = %property.name,
            options = options.len(),
            "Analyzed polymorphic property."
        );
        let config = PolymorphicPropertyConfig {
            property_name: discriminator.property_name,
            form_property: property.name.clone(),
            discriminator_options,
            options,
            default_option,
        };
        Some((config, kept))
    }
}

/// Single enum value, then single `const`, then a mapping entry targeting the
/// branch, then the reference's last segment.
fn discriminator_value(
    enum_values: &[String],
    tag: &SchemaKeywords,
    discriminator: &Discriminator,
    reference: Option<&str>,
) -> Option<String> {
    if let [only] = enum_values {
        return Some(only.clone());
    }
    if let Some(value) = tag.const_value.as_ref().and_then(value_text) {
        return Some(value);
    }
    let reference = reference?;
    discriminator
        .mapping_entries()
        .find(|(_, target)| targets(target, reference))
        .map(|(key, _)| key.to_string())
        .or_else(|| Some(ref_tail(reference)))
}

/// Whether a mapping target (a reference or a bare schema name) names `reference`.
fn targets(target: &str, reference: &str) -> bool {
    target == reference || (!target.contains(['/', '#']) && ref_tail(reference) == target)
}

fn default_option(
    options: &[PolymorphicOption],
    references: &[Option<String>],
    discriminator: &Discriminator,
    default: &str,
) -> Option<String> {
    let target = discriminator
        .mapping_entries()
        .find(|(key, _)| *key == default)
        .map_or(default, |(_, target)| target);
    options
        .iter()
        .zip(references)
        .find(|(option, reference)| {
            option.discriminator_value == default
                || reference.as_deref().is_some_and(|r| targets(target, r))
                || option.model_name == pascal_case(&ref_tail(target))
        })
        .map(|(option, _)| option.discriminator_value.clone())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}
