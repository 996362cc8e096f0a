//! Declarative field contract for a resource.
//!
//! A resource lists its fields (all string valued), which of them are
//! required, how a value is validated and when two values should be
//! treated as the same. The orchestrator consults it before calling a verb.

use thiserror::Error;

use crate::resource::Fields;

/// Validation hook. Takes the value and the field key, returns
/// `(warnings, errors)`.
pub type ValidateFn = fn(&str, &str) -> (Vec<String>, Vec<String>);

/// Diff suppression hook. Takes the field key, the old and new values,
/// returns true when the difference should be ignored.
pub type DiffSuppressFn = fn(&str, &str, &str) -> bool;

/// One field of a resource schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Field key, e.g. `org_id`
    pub name: &'static str,
    /// Whether the user must set this field
    pub required: bool,
    /// Optional validation hook
    pub validate: Option<ValidateFn>,
    /// Optional diff suppression hook
    pub diff_suppress: Option<DiffSuppressFn>,
}

impl FieldSchema {
    /// A required string field with no hooks.
    pub fn required_string(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            validate: None,
            diff_suppress: None,
        }
    }

    /// Attach a validation hook.
    pub fn with_validate(mut self, f: ValidateFn) -> Self {
        self.validate = Some(f);
        self
    }

    /// Attach a diff suppression hook.
    pub fn with_diff_suppress(mut self, f: DiffSuppressFn) -> Self {
        self.diff_suppress = Some(f);
        self
    }
}

/// A schema violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A required field was not set
    #[error("{resource}: missing required field `{field}`")]
    MissingField {
        /// resource type name
        resource: String,
        /// field key
        field: String,
    },
    /// A field's validation hook reported errors
    #[error("{resource}: invalid value for `{field}`:\n{}", .errors.join("\n"))]
    InvalidField {
        /// resource type name
        resource: String,
        /// field key
        field: String,
        /// errors from the hook
        errors: Vec<String>,
    },
}

/// Outcome of validating a set of fields against a schema.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Non-fatal findings
    pub warnings: Vec<String>,
    /// Violations
    pub errors: Vec<SchemaError>,
}

impl ValidationReport {
    /// True when no violations were found.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The full field contract for a resource type.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    /// Resource type name, e.g. `google_organization_iam_policy`
    pub name: &'static str,
    /// Declared fields
    pub fields: Vec<FieldSchema>,
}

impl ResourceSchema {
    /// Basic constructor
    pub fn new(name: &'static str, fields: Vec<FieldSchema>) -> Self {
        Self { name, fields }
    }

    /// Look up a field by key.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check required fields and run every validation hook.
    pub fn validate(&self, fields: &Fields) -> ValidationReport {
        let mut report = ValidationReport::default();
        for field in &self.fields {
            let value = match fields.get(field.name) {
                Some(v) => v,
                None => {
                    if field.required {
                        report.errors.push(SchemaError::MissingField {
                            resource: self.name.to_owned(),
                            field: field.name.to_owned(),
                        });
                    }
                    continue;
                }
            };
            if field.required && value.is_empty() {
                report.errors.push(SchemaError::MissingField {
                    resource: self.name.to_owned(),
                    field: field.name.to_owned(),
                });
                continue;
            }
            if let Some(validate) = field.validate {
                let (warnings, errors) = validate(value, field.name);
                report.warnings.extend(warnings);
                if !errors.is_empty() {
                    report.errors.push(SchemaError::InvalidField {
                        resource: self.name.to_owned(),
                        field: field.name.to_owned(),
                        errors,
                    });
                }
            }
        }
        report
    }

    /// Whether the field differs between `old` and `new`, after diff
    /// suppression. Unknown fields compare as plain strings.
    pub fn has_change(&self, field: &str, old: Option<&str>, new: Option<&str>) -> bool {
        match (old, new) {
            (None, None) => false,
            (Some(o), Some(n)) if o == n => false,
            (Some(o), Some(n)) => match self.field(field).and_then(|f| f.diff_suppress) {
                Some(suppress) => !suppress(field, o, n),
                None => true,
            },
            _ => true,
        }
    }

    /// All declared fields that changed between `old` and `new`, in schema
    /// order.
    pub fn changed_fields(&self, old: &Fields, new: &Fields) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| {
                self.has_change(
                    f.name,
                    old.get(f.name).map(String::as_str),
                    new.get(f.name).map(String::as_str),
                )
            })
            .map(|f| f.name.to_owned())
            .collect()
    }
}
