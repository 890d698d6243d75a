//! Form/type model produced by the analyzer.
//!
//! Everything here serializes to camelCase JSON so the model can be handed to
//! template-driven emitters as-is.

use serde::Serialize;
use serde_json::Value;

use crate::document::NodeRef;

/// One UI-bindable field, group, array or map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormControlModel {
    /// Sanitized TypeScript identifier of the property.
    pub name: String,
    /// Property name as written in the schema.
    pub property_name: String,
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub validation_rules: Vec<ValidationRule>,
    #[serde(flatten)]
    pub kind: ControlKind,
}

/// Shape of a control. The variant decides which nested fields exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "controlType", rename_all = "camelCase")]
pub enum ControlKind {
    Control,
    Group(NestedForm),
    Array {
        /// Present for arrays of objects.
        #[serde(flatten, skip_serializing_if = "Option::is_none")]
        item_form: Option<NestedForm>,
    },
    Map(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedForm {
    pub nested_form_interface: String,
    pub nested_controls: Vec<FormControlModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapValue {
    pub map_value_control: Box<FormControlModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_max_length: Option<u64>,
}

impl FormControlModel {
    /// Serialized `controlType` tag.
    pub fn control_type(&self) -> &'static str {
        match self.kind {
            ControlKind::Control => "control",
            ControlKind::Group(_) => "group",
            ControlKind::Array { .. } => "array",
            ControlKind::Map(_) => "map",
        }
    }

    /// Nested form of a group or an array of objects.
    pub fn nested(&self) -> Option<&NestedForm> {
        match &self.kind {
            ControlKind::Group(nested) => Some(nested),
            ControlKind::Array { item_form } => item_form.as_ref(),
            ControlKind::Control | ControlKind::Map(_) => None,
        }
    }

    /// Value control and key constraints of a `map` control.
    pub fn map_value(&self) -> Option<&MapValue> {
        match &self.kind {
            ControlKind::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// A validation constraint on a single control, in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationRule {
    Required,
    MinLength { value: u64 },
    MaxLength { value: u64 },
    Min { value: f64 },
    Max { value: f64 },
    Pattern { value: String },
    Email,
    ExclusiveMinimum { value: f64 },
    ExclusiveMaximum { value: f64 },
    MultipleOf { value: f64 },
    UniqueItems,
    MinItems { value: u64 },
    MaxItems { value: u64 },
    MinProperties { value: u64 },
    MaxProperties { value: u64 },
    Contains {
        schema: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_contains: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_contains: Option<u64>,
    },
    Const { value: Value },
    Not { schema: Value },
}

impl ValidationRule {
    /// Rules without a built-in validator in the target form framework.
    pub fn needs_custom_validator(&self) -> bool {
        matches!(
            self,
            ValidationRule::ExclusiveMinimum { .. }
                | ValidationRule::ExclusiveMaximum { .. }
                | ValidationRule::MultipleOf { .. }
                | ValidationRule::UniqueItems
                | ValidationRule::Not { .. }
        )
    }
}

/// A named form interface. Registered after its nested interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInterface {
    pub name: String,
    pub properties: Vec<InterfaceProperty>,
    pub is_top_level: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceProperty {
    pub name: String,
}

/// Variants of a `oneOf` + `discriminator` property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolymorphicPropertyConfig {
    /// The discriminator field name.
    pub property_name: String,
    /// The form property holding the `oneOf`.
    pub form_property: String,
    /// Every discriminator value observed, deduplicated, in discovery order.
    pub discriminator_options: Vec<String>,
    pub options: Vec<PolymorphicOption>,
    /// Discriminator value of the `defaultMapping` branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_option: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolymorphicOption {
    pub discriminator_value: String,
    pub model_name: String,
    pub sub_form_name: String,
    pub controls: Vec<FormControlModel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    Required,
}

/// Presence of `trigger_field` makes `target_field` required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRule {
    pub trigger_field: String,
    pub target_field: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
}

/// Flags for downstream imports and helpers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFeatures {
    pub uses_custom_validators: bool,
    pub has_form_arrays: bool,
    pub has_file_uploads: bool,
    pub has_maps: bool,
    pub is_polymorphic: bool,
}

/// One property of a form resource.
#[derive(Debug, Clone)]
pub struct FormProperty {
    pub name: String,
    /// Property schema as written, possibly a reference.
    pub schema: NodeRef,
    pub required: bool,
}

/// A model to build a form for.
#[derive(Debug, Clone)]
pub struct FormResource {
    pub model_name: String,
    pub properties: Vec<FormProperty>,
    /// The resolved model schema, for model-level keywords such as `dependentSchemas`.
    pub schema: Option<NodeRef>,
}

/// Everything the analyzer produced for one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAnalysisResult {
    pub model_name: String,
    pub form_interface: String,
    pub controls: Vec<FormControlModel>,
    pub interfaces: Vec<FormInterface>,
    #[serde(flatten)]
    pub features: FormFeatures,
    pub polymorphic_properties: Vec<PolymorphicPropertyConfig>,
    pub dependency_rules: Vec<DependencyRule>,
}

impl FormAnalysisResult {
    /// Interface named `name`.
    pub fn interface(&self, name: &str) -> Option<&FormInterface> {
        self.interfaces.iter().find(|interface| interface.name == name)
    }

    /// Top-level control for `property_name`.
    pub fn control(&self, property_name: &str) -> Option<&FormControlModel> {
        self.controls
            .iter()
            .find(|control| control.property_name == property_name)
    }
}
