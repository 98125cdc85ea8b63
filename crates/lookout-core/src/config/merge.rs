use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ConfigError;

/// Apply a runtime config patch.
///
/// Every top-level key present in `patch` replaces the whole corresponding
/// value in `current`; nested tables are not merged. Keys the target type
/// does not know are ignored. On any error `current` is left as it was and
/// the caller keeps running on the old snapshot.
pub fn merge_shallow<T>(current: &T, patch: &Value) -> Result<T, ConfigError>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(changes) = patch else {
        return Err(ConfigError::PatchNotAnObject {
            found: json_type_name(patch).to_string(),
        });
    };

    let mut merged = serde_json::to_value(current).map_err(|e| ConfigError::PatchRejected {
        reason: e.to_string(),
    })?;
    let Value::Object(fields) = &mut merged else {
        return Err(ConfigError::PatchRejected {
            reason: "current config is not an object".to_string(),
        });
    };

    for (key, value) in changes {
        fields.insert(key.clone(), value.clone());
    }

    serde_json::from_value(merged).map_err(|e| ConfigError::PatchRejected {
        reason: e.to_string(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
