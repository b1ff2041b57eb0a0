//! JSON Patch documents applied to flat DTOs.
//!
//! Operations run in order against the serialized form of the target. A
//! failing operation records an error in the [`ModelState`] under its path
//! and leaves the target untouched; the remaining operations still run.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::shared::validation::ModelState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OperationKind {
    fn parse(op: &str) -> Option<Self> {
        match op.to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            "replace" => Some(Self::Replace),
            "move" => Some(Self::Move),
            "copy" => Some(Self::Copy),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

/// One entry of a JSON Patch document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatchOperation {
    /// One of `add`, `remove`, `replace`, `move`, `copy`, `test`
    #[schema(example = "replace")]
    pub op: String,

    /// Target field, either `/occupancy` or `occupancy`
    #[schema(example = "/occupancy")]
    pub path: String,

    /// Source field for `move` and `copy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

/// Keeps an explicit `null` distinct from an absent `value`
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
impl PatchOperation {
    pub fn new(op: &str, path: &str, value: Option<Value>) -> Self {
        Self {
            op: op.to_string(),
            path: path.to_string(),
            from: None,
            value,
        }
    }

    pub fn with_from(op: &str, from: &str, path: &str) -> Self {
        Self {
            op: op.to_string(),
            path: path.to_string(),
            from: Some(from.to_string()),
            value: None,
        }
    }
}

/// Ordered patch operations targeting the shape of `T`
#[derive(Debug, Clone)]
pub struct JsonPatchDocument<T> {
    operations: Vec<PatchOperation>,
    _target: PhantomData<fn() -> T>,
}

impl<T> JsonPatchDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            operations,
            _target: PhantomData,
        }
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// Apply every operation to `target`, accumulating failures in `state`
    pub fn apply_to(&self, target: &mut T, state: &mut ModelState) {
        let (defaults, mut current) = match (as_object(&T::default()), as_object(&*target)) {
            (Some(defaults), Some(current)) => (defaults, current),
            _ => {
                state.add_model_error("", "Patch target must serialize to a JSON object.");
                return;
            }
        };

        for operation in &self.operations {
            let mut candidate = current.clone();
            if let Err(message) = apply_operation(operation, &mut candidate, &defaults) {
                state.add_model_error(operation.path.clone(), message);
                continue;
            }

            match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
                Ok(_) => current = candidate,
                Err(_) => {
                    let shown = operation
                        .value
                        .as_ref()
                        .map(display_value)
                        .unwrap_or_default();
                    state.add_model_error(
                        operation.path.clone(),
                        format!("The value '{}' is invalid for target location.", shown),
                    );
                }
            }
        }

        // Every accepted candidate deserialized above, so this cannot fail
        if let Ok(patched) = serde_json::from_value(Value::Object(current)) {
            *target = patched;
        }
    }
}

fn as_object<T: Serialize>(value: &T) -> Option<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn apply_operation(
    operation: &PatchOperation,
    doc: &mut Map<String, Value>,
    defaults: &Map<String, Value>,
) -> Result<(), String> {
    let kind = OperationKind::parse(&operation.op)
        .ok_or_else(|| format!("Invalid JsonPatch operation '{}'.", operation.op))?;
    let key = resolve_field(&operation.path, doc)?;

    match kind {
        OperationKind::Add | OperationKind::Replace => {
            let value = required_value(operation)?;
            doc.insert(key, value.clone());
        }
        OperationKind::Remove => {
            let reset = defaults.get(&key).cloned().unwrap_or(Value::Null);
            doc.insert(key, reset);
        }
        OperationKind::Move | OperationKind::Copy => {
            let from = operation.from.as_deref().ok_or_else(|| {
                format!(
                    "The 'from' path is required for operation '{}'.",
                    operation.op
                )
            })?;
            let source = resolve_field(from, doc)?;
            let value = doc.get(&source).cloned().unwrap_or(Value::Null);
            doc.insert(key.clone(), value);

            if kind == OperationKind::Move && source != key {
                let reset = defaults.get(&source).cloned().unwrap_or(Value::Null);
                doc.insert(source, reset);
            }
        }
        OperationKind::Test => {
            let expected = required_value(operation)?;
            let actual = doc.get(&key).cloned().unwrap_or(Value::Null);
            if !values_equal(&actual, expected) {
                return Err(format!(
                    "The current value '{}' at path '{}' is not equal to the test value '{}'.",
                    display_value(&actual),
                    key,
                    display_value(expected)
                ));
            }
        }
    }

    Ok(())
}

fn required_value(operation: &PatchOperation) -> Result<&Value, String> {
    operation
        .value
        .as_ref()
        .ok_or_else(|| format!("The value for operation '{}' is required.", operation.op))
}

/// Map `/occupancy` or `occupancy` onto the document's own key, ignoring case
fn resolve_field(path: &str, doc: &Map<String, Value>) -> Result<String, String> {
    let segment = path.strip_prefix('/').unwrap_or(path);
    if segment.is_empty() || segment.contains('/') {
        return Err(format!(
            "The target location specified by path '{}' was not found.",
            path
        ));
    }

    doc.keys()
        .find(|k| k.eq_ignore_ascii_case(segment))
        .cloned()
        .ok_or_else(|| {
            format!(
                "The target location specified by path segment '{}' was not found.",
                segment
            )
        })
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::features::villas::dtos::UpdateVillaDto;

    fn villa() -> UpdateVillaDto {
        UpdateVillaDto {
            id: 1,
            name: "Pool View".into(),
            details: Some("Quiet".into()),
            rate: 200.0,
            occupancy: 4,
            square_footage: 550,
            image_url: "https://img.test/1.png".into(),
            amenity: "Pool".into(),
        }
    }

    fn apply(ops: Vec<PatchOperation>, target: &mut UpdateVillaDto) -> ModelState {
        let mut state = ModelState::default();
        JsonPatchDocument::<UpdateVillaDto>::new(ops).apply_to(target, &mut state);
        state
    }

    #[test]
    fn test_replace_sets_field() {
        let mut dto = villa();
        let state = apply(
            vec![PatchOperation::new("replace", "/occupancy", Some(json!(6)))],
            &mut dto,
        );
        assert!(state.is_valid());
        assert_eq!(dto.occupancy, 6);
    }

    #[test]
    fn test_bare_and_differently_cased_paths_resolve() {
        let mut dto = villa();
        let state = apply(
            vec![
                PatchOperation::new("replace", "occupancy", Some(json!(5))),
                PatchOperation::new("replace", "/SquareFootage", Some(json!(600))),
            ],
            &mut dto,
        );
        assert!(state.is_valid());
        assert_eq!(dto.occupancy, 5);
        assert_eq!(dto.square_footage, 600);
    }

    #[test]
    fn test_add_on_scalar_behaves_like_replace() {
        let mut dto = villa();
        let state = apply(
            vec![PatchOperation::new("add", "/amenity", Some(json!("Sauna")))],
            &mut dto,
        );
        assert!(state.is_valid());
        assert_eq!(dto.amenity, "Sauna");
    }

    #[test]
    fn test_remove_resets_to_default() {
        let mut dto = villa();
        let state = apply(
            vec![
                PatchOperation::new("remove", "/details", None),
                PatchOperation::new("remove", "/rate", None),
                PatchOperation::new("remove", "/amenity", None),
            ],
            &mut dto,
        );
        assert!(state.is_valid());
        assert_eq!(dto.details, None);
        assert_eq!(dto.rate, 0.0);
        assert!(dto.amenity.is_empty());
    }

    #[test]
    fn test_copy_and_move() {
        let mut dto = villa();
        let state = apply(
            vec![
                PatchOperation::with_from("copy", "/name", "/amenity"),
                PatchOperation::with_from("move", "/imageUrl", "/details"),
            ],
            &mut dto,
        );
        assert!(state.is_valid());
        assert_eq!(dto.amenity, "Pool View");
        assert_eq!(dto.name, "Pool View");
        assert_eq!(dto.details.as_deref(), Some("https://img.test/1.png"));
        assert!(dto.image_url.is_empty());
    }

    #[test]
    fn test_move_onto_itself_keeps_value() {
        let mut dto = villa();
        let state = apply(
            vec![PatchOperation::with_from("move", "/amenity", "/amenity")],
            &mut dto,
        );
        assert!(state.is_valid());
        assert_eq!(dto.amenity, "Pool");
    }

    #[test]
    fn test_failed_test_records_error_and_later_ops_still_apply() {
        let mut dto = villa();
        let state = apply(
            vec![
                PatchOperation::new("test", "/occupancy", Some(json!(99))),
                PatchOperation::new("replace", "/occupancy", Some(json!(8))),
            ],
            &mut dto,
        );
        assert!(!state.is_valid());
        assert_eq!(state.errors().len(), 1);
        assert_eq!(state.errors()[0].key, "/occupancy");
        assert_eq!(dto.occupancy, 8);
    }

    #[test]
    fn test_passing_test_compares_numbers_numerically() {
        let mut dto = villa();
        let state = apply(
            vec![
                PatchOperation::new("test", "/rate", Some(json!(200))),
                PatchOperation::new("test", "/name", Some(json!("Pool View"))),
            ],
            &mut dto,
        );
        assert!(state.is_valid());
    }

    #[test]
    fn test_unknown_path_is_recorded_not_fatal() {
        let mut dto = villa();
        let state = apply(
            vec![
                PatchOperation::new("replace", "/swimmingPool", Some(json!(true))),
                PatchOperation::new("replace", "/occupancy", Some(json!(3))),
            ],
            &mut dto,
        );
        assert_eq!(state.errors().len(), 1);
        assert_eq!(state.errors()[0].key, "/swimmingPool");
        assert_eq!(dto.occupancy, 3);
    }

    #[test]
    fn test_type_mismatch_leaves_field_unchanged() {
        let mut dto = villa();
        let state = apply(
            vec![PatchOperation::new(
                "replace",
                "/occupancy",
                Some(json!("lots")),
            )],
            &mut dto,
        );
        assert_eq!(
            state.clone().into_messages(),
            vec!["/occupancy: The value 'lots' is invalid for target location."]
        );
        assert_eq!(dto.occupancy, 4);
    }

    #[test]
    fn test_unknown_op_and_missing_operands_are_recorded() {
        let mut dto = villa();
        let state = apply(
            vec![
                PatchOperation::new("increment", "/occupancy", Some(json!(1))),
                PatchOperation::new("replace", "/occupancy", None),
                PatchOperation::new("copy", "/occupancy", None),
            ],
            &mut dto,
        );
        assert_eq!(state.errors().len(), 3);
        assert_eq!(dto, villa());
    }

    #[test]
    fn test_explicit_null_is_a_value() {
        let op: PatchOperation =
            serde_json::from_value(json!({ "op": "replace", "path": "/details", "value": null }))
                .unwrap();
        assert_eq!(op.value, Some(Value::Null));

        let mut dto = villa();
        let state = apply(vec![op], &mut dto);
        assert!(state.is_valid());
        assert_eq!(dto.details, None);
    }

    #[test]
    fn test_nested_paths_are_rejected() {
        let mut dto = villa();
        let state = apply(
            vec![PatchOperation::new("replace", "/name/first", Some(json!("x")))],
            &mut dto,
        );
        assert!(!state.is_valid());
        assert_eq!(dto.name, "Pool View");
    }
}
