//! IAM policy model and the `policy_data` JSON helpers.
//!
//! `policy_data` only ever carries bindings. Everything else the remote
//! side returns (`etag`, `version`) is dropped on the way in; that means
//! concurrent edits by other actors are silently overwritten by the next
//! write. This is a known consistency gap.

use std::collections::{BTreeMap, BTreeSet};

use derive_new::new;
use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OrgPolicyError;

/// A role and the principals it is granted to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(default)]
pub struct Binding {
    /// e.g. `roles/viewer`
    pub role: String,
    /// e.g. `user:a@example.com`. Order is not significant.
    pub members: Vec<String>,
}

/// An IAM policy as the remote API returns it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Policy {
    /// Policy format version
    #[serde(skip_serializing_if = "is_zero")]
    pub version: i32,
    /// All role bindings
    pub bindings: Vec<Binding>,
    /// Concurrency token. Read, never written back into `policy_data`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub etag: String,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

impl Policy {
    /// A policy holding only the given bindings.
    pub fn with_bindings(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }
}

/// Body of a `setIamPolicy` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct SetIamPolicyRequest {
    /// The policy to write
    pub policy: Policy,
    /// Restricts which policy fields are written, e.g. `bindings`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<String>,
}

/// The local projection of a policy: bindings and nothing else.
#[derive(Serialize)]
struct PolicyDocument<'a> {
    bindings: &'a [Binding],
}

/// Serialize only the bindings of `policy`.
pub fn marshal_iam_policy(policy: &Policy) -> String {
    // a slice of plain strings always serializes
    serde_json::to_string(&PolicyDocument {
        bindings: &policy.bindings,
    })
    .unwrap_or_else(|_| r#"{"bindings":[]}"#.to_owned())
}

/// Parse `policy_data` into a policy.
pub fn unmarshal_iam_policy(policy_data: &str) -> Result<Policy, OrgPolicyError> {
    decode_policy(policy_data).map_err(|source| OrgPolicyError::InvalidPolicyData {
        policy_data: policy_data.to_owned(),
        source,
    })
}

/// The policy and each of its bindings must be JSON objects. Derived
/// struct decoding would otherwise accept arrays in their place.
fn decode_policy(policy_data: &str) -> serde_json::Result<Policy> {
    let value: Value = serde_json::from_str(policy_data)?;
    let document = expect_object(&value, "a policy object")?;
    if let Some(Value::Array(bindings)) = document.get("bindings") {
        for binding in bindings {
            expect_object(binding, "a binding object")?;
        }
    }
    serde_json::from_value(value)
}

fn expect_object<'a>(
    value: &'a Value,
    expected: &str,
) -> serde_json::Result<&'a serde_json::Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        let unexpected = match value {
            Value::Null => Unexpected::Unit,
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Number(_) => Unexpected::Other("number"),
            Value::String(s) => Unexpected::Str(s),
            Value::Array(_) => Unexpected::Seq,
            Value::Object(_) => Unexpected::Map,
        };
        serde_json::Error::invalid_type(unexpected, &expected)
    })
}

/// Validation hook for the `policy_data` field.
pub fn validate_iam_policy(value: &str, _key: &str) -> (Vec<String>, Vec<String>) {
    match unmarshal_iam_policy(value) {
        Ok(_) => (vec![], vec![]),
        Err(e) => (vec![], vec![e.to_string()]),
    }
}

/// Decode `policy_data` and re-encode it in a canonical form: one binding
/// per role, roles sorted, members sorted and deduplicated, bindings with
/// no members dropped.
pub fn canonical_policy_data(policy_data: &str) -> Result<String, OrgPolicyError> {
    let policy = unmarshal_iam_policy(policy_data)?;
    let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for binding in policy.bindings {
        merged
            .entry(binding.role)
            .or_default()
            .extend(binding.members);
    }
    let bindings = merged
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(role, members)| Binding::new(role, members.into_iter().collect()))
        .collect();
    Ok(marshal_iam_policy(&Policy::with_bindings(bindings)))
}

/// Diff suppression hook for the `policy_data` field. Values that fail to
/// decode are never equivalent.
pub fn policy_data_equivalent(_key: &str, old: &str, new: &str) -> bool {
    match (canonical_policy_data(old), canonical_policy_data(new)) {
        (Ok(o), Ok(n)) => o == n,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWER: &str =
        r#"{"bindings":[{"role":"roles/viewer","members":["user:a@example.com"]}]}"#;

    #[test]
    fn marshal_keeps_only_bindings() {
        let policy = Policy {
            version: 3,
            bindings: vec![Binding::new(
                "roles/viewer".to_owned(),
                vec!["user:a@example.com".to_owned()],
            )],
            etag: "BwWWja0YfJA=".to_owned(),
        };
        let data = marshal_iam_policy(&policy);
        assert_eq!(data, VIEWER);

        let back = unmarshal_iam_policy(&data).unwrap();
        assert_eq!(back.bindings, policy.bindings);
        // etag and version do not survive
        assert_eq!(back.etag, "");
        assert_eq!(back.version, 0);
    }

    #[test]
    fn marshal_empty_policy() {
        assert_eq!(marshal_iam_policy(&Policy::default()), r#"{"bindings":[]}"#);
    }

    #[test]
    fn unmarshal_ignores_unknown_fields() {
        let policy =
            unmarshal_iam_policy(r#"{"bindings":[],"auditConfigs":[{"service":"x"}]}"#).unwrap();
        assert!(policy.bindings.is_empty());
    }

    #[test]
    fn unmarshal_rejects_bad_json() {
        for bad in ["", "{", "not json", r#"{"bindings": {}}"#, r#"{"bindings":[{"role":1}]}"#] {
            match unmarshal_iam_policy(bad) {
                Err(OrgPolicyError::InvalidPolicyData { policy_data, .. }) => {
                    assert_eq!(policy_data, bad)
                }
                other => panic!("expected InvalidPolicyData for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn unmarshal_rejects_arrays_and_scalars_in_place_of_objects() {
        let owner_as_array = r#"[0,[["roles/owner",["user:evil@example.com"]]]]"#;
        let binding_as_array = r#"{"bindings":[["roles/owner",["user:evil@example.com"]]]}"#;
        for bad in ["[]", "1", "null", r#""bindings""#, owner_as_array, binding_as_array] {
            match unmarshal_iam_policy(bad) {
                Err(OrgPolicyError::InvalidPolicyData { policy_data, .. }) => {
                    assert_eq!(policy_data, bad)
                }
                other => panic!("expected InvalidPolicyData for {bad:?}, got {other:?}"),
            }
        }

        let (_, errors) = validate_iam_policy("[]", "policy_data");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("expected a policy object"), "{}", errors[0]);
        assert!(!policy_data_equivalent("policy_data", "[]", r#"{"bindings":[]}"#));
    }

    #[test]
    fn validate_lists_text_and_parse_error() {
        let (warnings, errors) = validate_iam_policy("{nope", "policy_data");
        assert!(warnings.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("{nope"), "{}", errors[0]);
        assert!(errors[0].contains("key must be a string"), "{}", errors[0]);

        assert_eq!(validate_iam_policy(VIEWER, "policy_data"), (vec![], vec![]));
    }

    #[test]
    fn reordered_keys_and_whitespace_are_equivalent() {
        let reordered = r#"{
            "bindings": [
                { "members": [ "user:a@example.com" ], "role": "roles/viewer" }
            ]
        }"#;
        assert!(policy_data_equivalent("policy_data", VIEWER, reordered));
    }

    #[test]
    fn member_and_binding_order_do_not_matter() {
        let a = r#"{"bindings":[
            {"role":"roles/viewer","members":["user:b@example.com","user:a@example.com"]},
            {"role":"roles/editor","members":["user:c@example.com"]}]}"#;
        let b = r#"{"bindings":[
            {"role":"roles/editor","members":["user:c@example.com"]},
            {"role":"roles/viewer","members":["user:a@example.com","user:b@example.com"]}]}"#;
        assert!(policy_data_equivalent("policy_data", a, b));
    }

    #[test]
    fn split_bindings_for_one_role_merge() {
        let split = r#"{"bindings":[
            {"role":"roles/viewer","members":["user:a@example.com"]},
            {"role":"roles/viewer","members":["user:b@example.com"]}]}"#;
        assert_eq!(
            canonical_policy_data(split).unwrap(),
            r#"{"bindings":[{"role":"roles/viewer","members":["user:a@example.com","user:b@example.com"]}]}"#
        );
    }

    #[test]
    fn different_roles_are_not_equivalent() {
        let editor = VIEWER.replace("roles/viewer", "roles/editor");
        assert!(!policy_data_equivalent("policy_data", VIEWER, &editor));
    }

    #[test]
    fn undecodable_values_are_never_equivalent() {
        assert!(!policy_data_equivalent("policy_data", "{", "{"));
        assert!(!policy_data_equivalent("policy_data", VIEWER, "{"));
    }

    #[test]
    fn delete_request_carries_update_mask() {
        let req = SetIamPolicyRequest::new(Policy::default(), Some("bindings".to_owned()));
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"policy":{"bindings":[]},"updateMask":"bindings"}"#
        );
        let req = SetIamPolicyRequest::new(Policy::default(), None);
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"policy":{"bindings":[]}}"#
        );
    }
}
