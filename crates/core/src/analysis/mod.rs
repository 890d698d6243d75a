//! Schema analysis: builds the form/type model for a resource.
//!
//! The walk is a pure function of the resolver and the resource: every
//! recursive call returns the controls it built together with the interfaces
//! it discovered, and the caller decides which interfaces to keep. Interfaces
//! are registered after their nested interfaces (post-order per subtree,
//! document order across siblings).

pub mod model;
mod polymorphism;
mod resource;
pub mod rules;

pub use model::*;
pub use resource::merged_properties;
pub use rules::extract_validation_rules;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::document::{NodeKey, NodeRef};
use crate::keywords::SchemaKeywords;
use crate::resolver::Resolver;
use crate::types::schema_type_string;
use crate::utils::{pascal_case, sanitize_ts_identifier, singularize};

/// Builds [`FormAnalysisResult`]s.
#[derive(Debug, Clone)]
pub struct FormAnalyzer<'c> {
    resolver: Resolver<'c>,
    config: AnalyzerConfig,
}

/// Mutable state of one `build` call.
#[derive(Debug, Default)]
struct Walk {
    features: FormFeatures,
    polymorphic: Vec<PolymorphicPropertyConfig>,
    /// Schemas currently being expanded, with the interface they expand into.
    active: Vec<(NodeKey, String)>,
}

impl Walk {
    fn cyclic_interface(&self, schema: &NodeRef) -> Option<String> {
        let key = schema.key()?;
        self.active
            .iter()
            .find(|(active, _)| *active == key)
            .map(|(_, name)| name.clone())
    }

    fn enter(&mut self, schema: &NodeRef, interface_name: &str) -> bool {
        match schema.key() {
            Some(key) => {
                self.active.push((key, interface_name.to_string()));
                true
            }
            None => false,
        }
    }

    fn leave(&mut self) {
        self.active.pop();
    }
}

/// Classification of a resolved property schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Group,
    Map,
    Array,
    Leaf,
}

impl<'c> FormAnalyzer<'c> {
    /// Analyzer over the documents reachable from `resolver`.
    pub fn new(resolver: &Resolver<'c>, config: AnalyzerConfig) -> Self {
        Self {
            resolver: resolver.clone(),
            config,
        }
    }

    /// Analyze a resource into controls, interfaces and feature flags.
    pub fn build(&self, resource: &FormResource) -> FormAnalysisResult {
        let form_interface = format!("{}Form", pascal_case(&resource.model_name));
        let mut walk = Walk::default();
        if let Some(schema) = &resource.schema {
            walk.enter(schema, &form_interface);
        }

        let (controls, interfaces) =
            self.analyze_controls(&resource.properties, &form_interface, true, &mut walk, 0);
        let dependency_rules = resource
            .schema
            .as_ref()
            .map(|schema| self.dependency_rules(schema))
            .unwrap_or_default();

        debug!(
            model = %resource.model_name,
            controls = controls.len(),
            interfaces = interfaces.len(),
            polymorphic = walk.polymorphic.len(),
            "Analyzed form resource."
        );

        FormAnalysisResult {
            model_name: resource.model_name.clone(),
            form_interface,
            controls,
            interfaces,
            features: walk.features,
            polymorphic_properties: walk.polymorphic,
            dependency_rules,
        }
    }

    /// Build one control per property and register `interface_name` last.
    fn analyze_controls(
        &self,
        properties: &[FormProperty],
        interface_name: &str,
        is_top_level: bool,
        walk: &mut Walk,
        depth: usize,
    ) -> (Vec<FormControlModel>, Vec<FormInterface>) {
        let mut controls = Vec::with_capacity(properties.len());
        let mut interfaces = Vec::new();

        for property in properties {
            if is_top_level
                && let Some((config, kept)) = self.analyze_polymorphism(property, walk, depth)
            {
                walk.features.is_polymorphic = true;
                walk.polymorphic.push(config);
                interfaces.extend(kept);
            }
            if let Some((control, nested)) = self.build_control(property, None, walk, depth) {
                interfaces.extend(nested);
                controls.push(control);
            }
        }

        interfaces.push(FormInterface {
            name: interface_name.to_string(),
            properties: controls
                .iter()
                .map(|control| InterfaceProperty {
                    name: control.property_name.clone(),
                })
                .collect(),
            is_top_level,
        });
        (controls, interfaces)
    }

    /// Classify and build a single control. `None` when the schema cannot be resolved.
    fn build_control(
        &self,
        property: &FormProperty,
        group_name: Option<String>,
        walk: &mut Walk,
        depth: usize,
    ) -> Option<(FormControlModel, Vec<FormInterface>)> {
        let Some(schema) = self.resolver.resolve(&property.schema) else {
            warn!(property = %property.name, "Property schema could not be resolved, omitting it.");
            return None;
        };
        let keywords = SchemaKeywords::of(&schema);
        let validation_rules = extract_validation_rules(&keywords, property.required);
        if validation_rules
            .iter()
            .any(ValidationRule::needs_custom_validator)
        {
            walk.features.uses_custom_validators = true;
        }

        let mut interfaces = Vec::new();
        let shape = match classify(&schema, &keywords) {
            Shape::Map if self.map_expansion_ends(&schema, walk, depth) => Shape::Leaf,
            shape => shape,
        };
        let (data_type, kind) = match shape {
            Shape::Group => {
                let name =
                    group_name.unwrap_or_else(|| format!("{}Form", pascal_case(&property.name)));
                let nested = self.nested_form(&schema, name, walk, depth, &mut interfaces);
                (nested.nested_form_interface.clone(), ControlKind::Group(nested))
            }
            Shape::Map => self.map_control(property, &schema, walk, depth, &mut interfaces),
            Shape::Array => self.array_control(property, &schema, walk, depth, &mut interfaces),
            Shape::Leaf => (
                schema_type_string(&self.resolver, &property.schema),
                ControlKind::Control,
            ),
        };
        if data_type == "File" || data_type == "File[]" {
            walk.features.has_file_uploads = true;
        }

        let control = FormControlModel {
            name: sanitize_ts_identifier(&property.name),
            property_name: property.name.clone(),
            data_type,
            default_value: keywords.default,
            validation_rules,
            kind,
        };
        Some((control, interfaces))
    }

    /// Expand an object schema into a nested form named `interface_name`.
    ///
    /// A schema already being expanded higher up yields an empty form that
    /// points at the interface it is expanding into.
    fn nested_form(
        &self,
        schema: &NodeRef,
        interface_name: String,
        walk: &mut Walk,
        depth: usize,
        interfaces: &mut Vec<FormInterface>,
    ) -> NestedForm {
        if let Some(cyclic) = walk.cyclic_interface(schema) {
            debug!(interface = %cyclic, pointer = schema.pointer(), "Cyclic schema, referencing enclosing interface.");
            return NestedForm {
                nested_form_interface: cyclic,
                nested_controls: Vec::new(),
            };
        }
        if depth >= self.config.max_depth {
            warn!(
                interface = %interface_name,
                max_depth = self.config.max_depth,
                "Form nesting too deep, leaving interface empty."
            );
            interfaces.push(FormInterface {
                name: interface_name.clone(),
                properties: Vec::new(),
                is_top_level: false,
            });
            return NestedForm {
                nested_form_interface: interface_name,
                nested_controls: Vec::new(),
            };
        }

        let entered = walk.enter(schema, &interface_name);
        let properties = merged_properties(&self.resolver, schema);
        let (controls, nested) =
            self.analyze_controls(&properties, &interface_name, false, walk, depth + 1);
        if entered {
            walk.leave();
        }
        interfaces.extend(nested);

        NestedForm {
            nested_form_interface: interface_name,
            nested_controls: controls,
        }
    }

    fn array_control(
        &self,
        property: &FormProperty,
        schema: &NodeRef,
        walk: &mut Walk,
        depth: usize,
        interfaces: &mut Vec<FormInterface>,
    ) -> (String, ControlKind) {
        let items = schema
            .get("items")
            .and_then(|items| self.resolver.resolve(&items));
        match items {
            Some(items) if has_properties(&items) => {
                walk.features.has_form_arrays = true;
                let item_name = format!("{}Form", pascal_case(&singularize(&property.name)));
                let nested = self.nested_form(&items, item_name, walk, depth, interfaces);
                (
                    format!("{}[]", nested.nested_form_interface),
                    ControlKind::Array {
                        item_form: Some(nested),
                    },
                )
            }
            _ => (
                schema_type_string(&self.resolver, schema),
                ControlKind::Array { item_form: None },
            ),
        }
    }

    fn map_control(
        &self,
        property: &FormProperty,
        schema: &NodeRef,
        walk: &mut Walk,
        depth: usize,
        interfaces: &mut Vec<FormInterface>,
    ) -> (String, ControlKind) {
        walk.features.has_maps = true;

        let key_schema = schema
            .get("propertyNames")
            .and_then(|names| self.resolver.resolve(&names))
            .map(|names| SchemaKeywords::of(&names))
            .unwrap_or_default();
        let first_pattern = schema
            .get("patternProperties")
            .and_then(|patterns| patterns.entries().into_iter().next());
        let (key_pattern, value_schema) = match first_pattern {
            Some((pattern, value)) => (Some(pattern), Some(value)),
            None => (
                key_schema.pattern.clone(),
                ["additionalProperties", "unevaluatedProperties"]
                    .into_iter()
                    .find_map(|keyword| schema.get(keyword).filter(NodeRef::is_object)),
            ),
        };

        let value_property = FormProperty {
            name: "value".to_string(),
            schema: value_schema.unwrap_or_else(|| NodeRef::detached(Value::Object(Map::new()))),
            required: false,
        };
        let value_interface = format!("{}ValueForm", pascal_case(&property.name));
        let entered = walk.enter(schema, &value_interface);
        let built = self.build_control(&value_property, Some(value_interface), walk, depth + 1);
        if entered {
            walk.leave();
        }
        let value_control = match built {
            Some((control, nested)) => {
                interfaces.extend(nested);
                control
            }
            None => FormControlModel {
                name: "value".to_string(),
                property_name: "value".to_string(),
                data_type: "unknown".to_string(),
                default_value: None,
                validation_rules: Vec::new(),
                kind: ControlKind::Control,
            },
        };

        (
            format!("Record<string, {}>", value_control.data_type),
            ControlKind::Map(MapValue {
                map_value_control: Box::new(value_control),
                key_pattern,
                key_min_length: key_schema.min_length,
                key_max_length: key_schema.max_length,
            }),
        )
    }

    /// Whether a map schema must be rendered as a plain type instead of being
    /// expanded again: it is already being expanded higher up, or the walk
    /// reached `max_depth`.
    fn map_expansion_ends(&self, schema: &NodeRef, walk: &Walk, depth: usize) -> bool {
        if walk.cyclic_interface(schema).is_some() {
            debug!(pointer = schema.pointer(), "Cyclic map schema, rendering its type.");
            return true;
        }
        if depth >= self.config.max_depth {
            warn!(
                pointer = schema.pointer(),
                max_depth = self.config.max_depth,
                "Map nesting too deep, rendering its type."
            );
            return true;
        }
        false
    }

    /// `required` entries of each `dependentSchemas` member, in document order.
    fn dependency_rules(&self, schema: &NodeRef) -> Vec<DependencyRule> {
        let Some(dependent) = schema.get("dependentSchemas") else {
            return Vec::new();
        };
        let mut rules = Vec::new();
        for (trigger, dependent_schema) in dependent.entries() {
            let Some(resolved) = self.resolver.resolve(&dependent_schema) else {
                warn!(trigger = %trigger, "Dependent schema could not be resolved, skipping.");
                continue;
            };
            let Some(required) = resolved.value().get("required").and_then(Value::as_array) else {
                continue;
            };
            rules.extend(
                required
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|target| DependencyRule {
                        trigger_field: trigger.clone(),
                        target_field: target.to_string(),
                        kind: DependencyKind::Required,
                    }),
            );
        }
        rules
    }
}

fn classify(schema: &NodeRef, keywords: &SchemaKeywords) -> Shape {
    let declared = keywords.non_null_types();
    let object_typed = declared.is_empty() || declared.contains(&"object");
    if object_typed && has_properties(schema) {
        Shape::Group
    } else if object_typed && has_dynamic_members(schema) {
        Shape::Map
    } else if declared.contains(&"array") || (declared.is_empty() && schema.has("items")) {
        Shape::Array
    } else {
        Shape::Leaf
    }
}

fn has_properties(schema: &NodeRef) -> bool {
    schema.get("properties").is_some_and(|p| p.is_object())
}

/// `patternProperties`, or `additionalProperties`/`unevaluatedProperties` other than `false`.
fn has_dynamic_members(schema: &NodeRef) -> bool {
    if schema
        .get("patternProperties")
        .is_some_and(|patterns| !patterns.entries().is_empty())
    {
        return true;
    }
    ["additionalProperties", "unevaluatedProperties"]
        .iter()
        .any(|keyword| {
            schema
                .get(keyword)
                .is_some_and(|node| node.value().as_bool() != Some(false))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cache::DocumentCache;
    use crate::dialect::Dialect;
    use serde_json::json;

    const URI: &str = "file:///api.yaml";

    fn spec(schemas: Value) -> DocumentCache {
        let mut cache = DocumentCache::new();
        cache.register_document(
            URI,
            json!({ "openapi": "3.1.0", "components": { "schemas": schemas } }),
        );
        cache
    }

    fn analyze(cache: &DocumentCache, name: &str) -> FormAnalysisResult {
        let resolver = Resolver::new(cache, URI);
        let resource = FormResource::from_component(&resolver, Dialect::OpenApi31, name).unwrap();
        FormAnalyzer::new(&resolver, AnalyzerConfig::default()).build(&resource)
    }

    fn interface_names(result: &FormAnalysisResult) -> Vec<&str> {
        result.interfaces.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_leaf_controls() {
        let cache = spec(json!({
            "User": {
                "type": "object",
                "required": ["email"],
                "properties": {
                    "email": { "type": "string", "format": "email" },
                    "first-name": { "type": "string", "default": "Ann" },
                    "status": { "$ref": "#/components/schemas/Status" }
                }
            },
            "Status": { "type": "string", "enum": ["active", "disabled"] }
        }));
        let result = analyze(&cache, "User");
        assert_eq!(result.form_interface, "UserForm");
        assert_eq!(interface_names(&result), vec!["UserForm"]);
        assert!(result.interfaces[0].is_top_level);

        let email = result.control("email").unwrap();
        assert_eq!(email.control_type(), "control");
        assert_eq!(email.validation_rules, vec![ValidationRule::Required, ValidationRule::Email]);

        let first_name = result.control("first-name").unwrap();
        assert_eq!(first_name.name, "firstName");
        assert_eq!(first_name.default_value, Some(json!("Ann")));

        assert_eq!(result.control("status").unwrap().data_type, "Status");
        assert_eq!(result.features, FormFeatures::default());
    }

    #[test]
    fn test_groups_register_nested_interfaces_first() {
        let cache = spec(json!({
            "Order": {
                "type": "object",
                "properties": {
                    "shipping": { "$ref": "#/components/schemas/Address" },
                    "note": { "type": "string" },
                    "billing": {
                        "type": "object",
                        "properties": {
                            "address": { "$ref": "#/components/schemas/Address" }
                        }
                    }
                }
            },
            "Address": {
                "type": "object",
                "properties": { "street": { "type": "string" }, "zip": { "type": "string" } }
            }
        }));
        let result = analyze(&cache, "Order");
        assert_eq!(
            interface_names(&result),
            vec!["ShippingForm", "AddressForm", "BillingForm", "OrderForm"]
        );

        let shipping = result.control("shipping").unwrap();
        assert_eq!(shipping.control_type(), "group");
        let nested = shipping.nested().unwrap();
        assert_eq!(nested.nested_form_interface, "ShippingForm");
        assert_eq!(nested.nested_controls.len(), 2);
        assert_eq!(shipping.data_type, "ShippingForm");
    }

    #[test]
    fn test_arrays() {
        let cache = spec(json!({
            "Post": {
                "type": "object",
                "properties": {
                    "tags": { "type": "array", "items": { "type": "string" }, "uniqueItems": true },
                    "categories": {
                        "type": "array",
                        "items": { "type": "object", "properties": { "label": { "type": "string" } } }
                    },
                    "attachments": {
                        "type": "array",
                        "items": { "type": "string", "format": "binary" }
                    }
                }
            }
        }));
        let result = analyze(&cache, "Post");

        let tags = result.control("tags").unwrap();
        assert_eq!(tags.control_type(), "array");
        assert_eq!(tags.data_type, "string[]");
        assert!(tags.nested().is_none());

        let categories = result.control("categories").unwrap();
        assert_eq!(categories.data_type, "CategoryForm[]");
        assert_eq!(categories.nested().unwrap().nested_controls[0].name, "label");

        assert_eq!(result.control("attachments").unwrap().data_type, "File[]");
        assert!(result.features.has_form_arrays);
        assert!(result.features.has_file_uploads);
        assert!(result.features.uses_custom_validators);
        assert_eq!(interface_names(&result), vec!["CategoryForm", "PostForm"]);
    }

    #[test]
    fn test_map_with_pattern_key() {
        let cache = spec(json!({
            "Extensions": {
                "type": "object",
                "properties": {
                    "vendor": {
                        "type": "object",
                        "patternProperties": { "^x-": { "type": "string" } }
                    }
                }
            }
        }));
        let result = analyze(&cache, "Extensions");
        let vendor = result.control("vendor").unwrap();
        assert_eq!(vendor.control_type(), "map");
        assert_eq!(vendor.data_type, "Record<string, string>");
        let map = vendor.map_value().unwrap();
        assert_eq!(map.key_pattern.as_deref(), Some("^x-"));
        assert_eq!(map.map_value_control.data_type, "string");
        assert!(result.features.has_maps);
    }

    #[test]
    fn test_map_of_objects_with_property_names() {
        let cache = spec(json!({
            "Inventory": {
                "type": "object",
                "properties": {
                    "stock": {
                        "type": "object",
                        "propertyNames": { "pattern": "^[A-Z]{3}$", "minLength": 3, "maxLength": 3 },
                        "additionalProperties": {
                            "type": "object",
                            "properties": { "count": { "type": "integer", "minimum": 0 } }
                        }
                    },
                    "labels": { "type": "object", "additionalProperties": true }
                }
            }
        }));
        let result = analyze(&cache, "Inventory");
        let stock = result.control("stock").unwrap();
        let map = stock.map_value().unwrap();
        assert_eq!(map.key_pattern.as_deref(), Some("^[A-Z]{3}$"));
        assert_eq!(map.key_min_length, Some(3));
        assert_eq!(map.key_max_length, Some(3));
        assert_eq!(map.map_value_control.control_type(), "group");
        assert_eq!(stock.data_type, "Record<string, StockValueForm>");

        let labels = result.control("labels").unwrap();
        assert_eq!(labels.data_type, "Record<string, unknown>");
        assert_eq!(
            interface_names(&result),
            vec!["StockValueForm", "InventoryForm"]
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let cache = spec(json!({
            "Node": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "parent": { "$ref": "#/components/schemas/Node" },
                    "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
                }
            }
        }));
        let result = analyze(&cache, "Node");

        let parent = result.control("parent").unwrap();
        let nested = parent.nested().unwrap();
        assert_eq!(nested.nested_form_interface, "NodeForm");
        assert!(nested.nested_controls.is_empty());

        let children = result.control("children").unwrap();
        assert_eq!(children.data_type, "NodeForm[]");
        assert_eq!(interface_names(&result), vec!["NodeForm"]);
    }

    #[test]
    fn test_indirect_cycle_terminates() {
        let cache = spec(json!({
            "Person": {
                "type": "object",
                "properties": { "employer": { "$ref": "#/components/schemas/Company" } }
            },
            "Company": {
                "type": "object",
                "properties": {
                    "ceo": { "$ref": "#/components/schemas/Person" },
                    "name": { "type": "string" }
                }
            }
        }));
        let result = analyze(&cache, "Person");
        let employer = result.control("employer").unwrap().nested().unwrap();
        assert_eq!(employer.nested_form_interface, "EmployerForm");
        let ceo = employer.nested_controls[0].nested().unwrap();
        assert_eq!(ceo.nested_form_interface, "PersonForm");
        assert!(ceo.nested_controls.is_empty());
    }

    #[test]
    fn test_recursive_map_terminates() {
        let cache = spec(json!({
            "Holder": {
                "type": "object",
                "properties": { "tree": { "$ref": "#/components/schemas/Tree" } }
            },
            "Tree": {
                "type": "object",
                "additionalProperties": { "$ref": "#/components/schemas/Tree" }
            }
        }));
        let result = analyze(&cache, "Holder");

        let tree = result.control("tree").unwrap();
        assert_eq!(tree.control_type(), "map");
        assert_eq!(tree.data_type, "Record<string, Tree>");
        let value = &tree.map_value().unwrap().map_value_control;
        assert_eq!(value.control_type(), "control");
        assert_eq!(value.data_type, "Tree");
        assert_eq!(interface_names(&result), vec!["HolderForm"]);
        assert!(result.features.has_maps);
    }

    #[test]
    fn test_recursive_pattern_map_terminates() {
        let cache = spec(json!({
            "Holder": {
                "type": "object",
                "properties": { "branches": { "$ref": "#/components/schemas/Branches" } }
            },
            "Branches": {
                "type": "object",
                "patternProperties": {
                    "^n": {
                        "type": "object",
                        "additionalProperties": { "$ref": "#/components/schemas/Branches" }
                    }
                }
            }
        }));
        let result = analyze(&cache, "Holder");

        let branches = result.control("branches").unwrap();
        let map = branches.map_value().unwrap();
        assert_eq!(map.key_pattern.as_deref(), Some("^n"));
        let inner = &map.map_value_control;
        assert_eq!(inner.control_type(), "map");
        assert_eq!(inner.data_type, "Record<string, Branches>");
        let leaf = &inner.map_value().unwrap().map_value_control;
        assert_eq!(leaf.control_type(), "control");
        assert_eq!(branches.data_type, "Record<string, Record<string, Branches>>");
    }

    #[test]
    fn test_max_depth_ends_map_nesting() {
        let mut schema = json!({ "type": "string" });
        for _ in 0..4 {
            schema = json!({ "type": "object", "additionalProperties": schema });
        }
        let cache = spec(json!({
            "Nested": { "type": "object", "properties": { "grid": schema } }
        }));
        let resolver = Resolver::new(&cache, URI);
        let resource = FormResource::from_component(&resolver, Dialect::OpenApi31, "Nested").unwrap();
        let result = FormAnalyzer::new(&resolver, AnalyzerConfig { max_depth: 2 }).build(&resource);

        let grid = result.control("grid").unwrap();
        let level1 = &grid.map_value().unwrap().map_value_control;
        let level2 = &level1.map_value().unwrap().map_value_control;
        assert_eq!(level2.control_type(), "control");
        assert_eq!(level2.data_type, "Record<string, Record<string, string>>");
        assert_eq!(
            grid.data_type,
            "Record<string, Record<string, Record<string, Record<string, string>>>>"
        );
    }

    #[test]
    fn test_max_depth_backstop() {
        let mut cache = DocumentCache::new();
        let mut schema = json!({ "type": "string" });
        for _ in 0..5 {
            schema = json!({ "type": "object", "properties": { "inner": schema } });
        }
        cache.register_document(URI, json!({ "openapi": "3.1.0", "components": { "schemas": { "Deep": schema } } }));
        let resolver = Resolver::new(&cache, URI);
        let resource = FormResource::from_component(&resolver, Dialect::OpenApi31, "Deep").unwrap();
        let result = FormAnalyzer::new(&resolver, AnalyzerConfig { max_depth: 2 }).build(&resource);

        let level1 = result.control("inner").unwrap().nested().unwrap();
        let level2 = level1.nested_controls[0].nested().unwrap();
        let level3 = level2.nested_controls[0].nested().unwrap();
        assert_eq!(level3.nested_form_interface, "InnerForm");
        assert!(level3.nested_controls.is_empty());
    }

    #[test]
    fn test_unresolvable_property_is_omitted() {
        let cache = spec(json!({
            "Broken": {
                "type": "object",
                "properties": {
                    "ok": { "type": "string" },
                    "gone": { "$ref": "#/components/schemas/Missing" }
                }
            }
        }));
        let result = analyze(&cache, "Broken");
        assert_eq!(result.controls.len(), 1);
        assert_eq!(result.interfaces[0].properties, vec![InterfaceProperty { name: "ok".to_string() }]);
    }

    #[test]
    fn test_dependency_rules() {
        let cache = spec(json!({
            "Payment": {
                "type": "object",
                "properties": {
                    "creditCard": { "type": "string" },
                    "billingAddress": { "type": "string" },
                    "cvc": { "type": "string" }
                },
                "dependentSchemas": {
                    "creditCard": { "required": ["billingAddress", "cvc"] },
                    "cvc": { "properties": { "extra": { "type": "string" } } }
                }
            }
        }));
        let result = analyze(&cache, "Payment");
        assert_eq!(
            result.dependency_rules,
            vec![
                DependencyRule {
                    trigger_field: "creditCard".to_string(),
                    target_field: "billingAddress".to_string(),
                    kind: DependencyKind::Required,
                },
                DependencyRule {
                    trigger_field: "creditCard".to_string(),
                    target_field: "cvc".to_string(),
                    kind: DependencyKind::Required,
                },
            ]
        );
    }
}
