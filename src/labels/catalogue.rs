//! The repository's catalogue of prefixed labels.
//!
//! `.github/labels.yaml` lists, per category, the names `/kind`, `/area`, and
//! `/priority` accept:
//!
//! ```yaml
//! kind:
//!   - bug
//!   - feature
//! priority: [urgent]
//! ```
//!
//! Keys other than the three categories are ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde_yaml::Value;

use crate::error::BotError;

/// Label families applied with a `category/name` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelCategory {
    /// `kind/...`
    Kind,
    /// `area/...`
    Area,
    /// `priority/...`
    Priority,
}

impl LabelCategory {
    /// Catalogue key and label prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kind => "kind",
            Self::Area => "area",
            Self::Priority => "priority",
        }
    }

    const ALL: [Self; 3] = [Self::Kind, Self::Area, Self::Priority];
}

impl fmt::Display for LabelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed names per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCatalogue {
    allowed: BTreeMap<&'static str, Vec<String>>,
}

impl LabelCatalogue {
    /// Parses raw catalogue content; empty content allows nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MalformedLabelCatalogue`] when the content is not a
    /// YAML mapping or a category is not a list of strings.
    pub fn parse(raw: &str) -> Result<Self, BotError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_yaml::from_str(raw).map_err(|error| BotError::MalformedLabelCatalogue {
                message: error.to_string(),
            })?;
        let mapping = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(BotError::MalformedLabelCatalogue {
                    message: "expected a mapping of label categories".to_owned(),
                });
            }
        };

        let mut allowed = BTreeMap::new();
        for category in LabelCategory::ALL {
            let names = match mapping.get(category.as_str()) {
                None | Some(Value::Null) => continue,
                Some(Value::Sequence(entries)) => entries
                    .iter()
                    .map(|entry| entry_name(category, entry))
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => {
                    return Err(BotError::MalformedLabelCatalogue {
                        message: format!("`{category}` must be a list of label names"),
                    });
                }
            };
            allowed.insert(category.as_str(), names);
        }
        Ok(Self { allowed })
    }

    /// Names the catalogue allows in `category`.
    #[must_use]
    pub fn allowed(&self, category: LabelCategory) -> &[String] {
        self.allowed
            .get(category.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The `category/name` labels for the requested names the catalogue
    /// allows, in request order without repeats.
    #[must_use]
    pub fn prefixed<S: AsRef<str>>(&self, category: LabelCategory, requested: &[S]) -> Vec<String> {
        let allowed = self.allowed(category);
        let mut labels: Vec<String> = Vec::new();
        for candidate in requested {
            let name: &str = candidate.as_ref();
            let label = format!("{category}/{name}");
            if allowed.iter().any(|known| known.as_str() == name) && !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

fn entry_name(category: LabelCategory, entry: &Value) -> Result<String, BotError> {
    match entry {
        Value::String(name) => Ok(name.clone()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(BotError::MalformedLabelCatalogue {
            message: format!("`{category}` entries must be label names"),
        }),
    }
}
