// ── Entity schemas ──
//
// Field metadata per collection: which fields are searchable, which are
// numeric, which are required. Drives filtering, sorting, validation,
// and normalization of records coming from the server or from a form.

use serde_json::{Number, Value};
use strum::{Display, EnumString};

use super::Record;
use crate::error::FieldErrors;
use crate::query::SortSpec;

/// Value type of a field, used for sorting and normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
}

/// One field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Message shown when the field is missing or blank.
    pub required_message: Option<String>,
    /// Whether the text filter looks at this field.
    pub searchable: bool,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Text,
            required_message: None,
            searchable: false,
        }
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(name, label)
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required_message = Some(message.into());
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required_message.is_some()
    }
}

/// Description of one managed collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    /// REST path segment (`users`, `products`).
    pub resource: String,
    /// Human-readable singular (`user`, `product`).
    pub singular: String,
    pub fields: Vec<FieldSpec>,
    /// Sort applied when a screen first mounts. `None` keeps server order.
    pub default_sort: Option<SortSpec>,
}

impl EntitySchema {
    pub fn new(resource: impl Into<String>, singular: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            singular: singular.into(),
            fields: Vec::new(),
            default_sort: None,
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn sorted_by(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// The users screen: four required, searchable text columns.
    pub fn users() -> Self {
        Self::new("users", "user")
            .field(
                FieldSpec::text("firstName", "First Name")
                    .required("Please input the user's first name!")
                    .searchable(),
            )
            .field(
                FieldSpec::text("lastName", "Last Name")
                    .required("Please input the user's last name!")
                    .searchable(),
            )
            .field(
                FieldSpec::text("email", "Email")
                    .required("Please input the user's email!")
                    .searchable(),
            )
            .field(
                FieldSpec::text("phone", "Phone")
                    .required("Please input the user's phone number!")
                    .searchable(),
            )
    }

    /// The products screen: searchable by title, sorted by price.
    pub fn products() -> Self {
        Self::new("products", "product")
            .field(
                FieldSpec::text("title", "Title")
                    .required("Please input the title!")
                    .searchable(),
            )
            .field(FieldSpec::text("description", "Description").required("Please input the description!"))
            .field(FieldSpec::number("price", "Price").required("Please input the price!"))
            .field(FieldSpec::text("images", "Image URL").required("Please input the image URL!"))
            .sorted_by(SortSpec::ascending("price"))
    }

    /// Look up a field by name.
    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.spec(name).map(|f| f.kind)
    }

    /// Names of the fields the text filter matches against.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.searchable)
            .map(|f| f.name.as_str())
    }

    /// Coerce numeric fields given as strings (`"12.5"`) into JSON numbers.
    ///
    /// Values that do not parse are left alone; `validate` reports them.
    pub fn normalize(&self, mut record: Record) -> Record {
        for spec in self.fields.iter().filter(|f| f.kind == FieldKind::Number) {
            let Some(Value::String(raw)) = record.fields.get(&spec.name) else {
                continue;
            };
            if let Some(number) = parse_number(raw) {
                record.fields.insert(spec.name.clone(), Value::Number(number));
            }
        }
        record
    }

    /// Run the required-field and type checks against a draft.
    ///
    /// Returns an empty map when the draft is acceptable.
    pub fn validate(&self, draft: &Record) -> FieldErrors {
        let mut errors = FieldErrors::new();

        for spec in &self.fields {
            let value = draft.get(&spec.name);
            let blank = match value {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };

            if blank {
                if let Some(ref message) = spec.required_message {
                    errors.insert(spec.name.clone(), message.clone());
                }
                continue;
            }

            if spec.kind == FieldKind::Number && value.and_then(numeric_value).is_none() {
                errors.insert(spec.name.clone(), format!("{} must be a number", spec.label));
            }
        }

        errors
    }
}

/// Numeric reading of a JSON value: numbers, or strings that parse.
pub(crate) fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}
