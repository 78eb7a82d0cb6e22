//! Closed enumerations and their display metadata.
//!
//! Every `Category` and `VariableType` must have exactly one metadata entry.
//! The catalog checks this once at construction so that a gap surfaces as a
//! `ConfigurationError` at load time instead of an empty field at render time.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

static HEX_COLOR: OnceLock<Option<regex::Regex>> = OnceLock::new();

fn is_hex_color(token: &str) -> bool {
    HEX_COLOR
        .get_or_init(|| regex::Regex::new(r"^#[0-9A-Fa-f]{6}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(token))
}

/// Health domain an insight or action belongs to.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sleep,
    Metabolic,
    Cardio,
    Recovery,
    Mood,
    Nutrition,
    Cognitive,
    Activity,
    Stress,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Sleep,
        Self::Metabolic,
        Self::Cardio,
        Self::Recovery,
        Self::Mood,
        Self::Nutrition,
        Self::Cognitive,
        Self::Activity,
        Self::Stress,
    ];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Metabolic => "metabolic",
            Self::Cardio => "cardio",
            Self::Recovery => "recovery",
            Self::Mood => "mood",
            Self::Nutrition => "nutrition",
            Self::Cognitive => "cognitive",
            Self::Activity => "activity",
            Self::Stress => "stress",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownCategory {
                value: s.to_string(),
            })
    }
}

/// Kind of variable an insight identifies as the cause.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    Behavior,
    Biomarker,
    Outcome,
    Environment,
}

impl VariableType {
    /// Every variable type, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Behavior,
        Self::Biomarker,
        Self::Outcome,
        Self::Environment,
    ];

    /// Wire name of the variable type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Behavior => "behavior",
            Self::Biomarker => "biomarker",
            Self::Outcome => "outcome",
            Self::Environment => "environment",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownVariableType {
                value: s.to_string(),
            })
    }
}

/// Display metadata for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMeta {
    /// Human-readable name.
    pub label: String,
    /// `#RRGGBB` accent color.
    pub color: String,
    /// Gradient token pair, e.g. `"from-indigo-500 to-purple-600"`.
    pub gradient: String,
    /// Icon name.
    pub icon: String,
}

impl CategoryMeta {
    /// Creates category metadata.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        color: impl Into<String>,
        gradient: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            gradient: gradient.into(),
            icon: icon.into(),
        }
    }

    fn validate(&self, key: &str) -> Result<(), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidMetadata {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        if self.label.trim().is_empty() {
            return Err(invalid("label is empty"));
        }
        if !is_hex_color(&self.color) {
            return Err(invalid("color must be a #RRGGBB hex token"));
        }
        if self.gradient.split_whitespace().count() < 2 {
            return Err(invalid("gradient must name a start and an end token"));
        }
        Ok(())
    }
}

/// Display metadata for a variable type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableTypeMeta {
    /// Human-readable name.
    pub label: String,
    /// One-line explanation shown beside the label.
    pub description: String,
}

impl VariableTypeMeta {
    /// Creates variable-type metadata.
    #[must_use]
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

const STANDARD_CATEGORIES: [(Category, &str, &str, &str, &str); 9] = [
    (Category::Sleep, "Sleep", "#6366F1", "from-indigo-500 to-purple-600", "moon"),
    (Category::Metabolic, "Metabolic", "#F59E0B", "from-amber-500 to-orange-600", "flame"),
    (Category::Cardio, "Cardiovascular", "#EF4444", "from-red-500 to-rose-600", "heart"),
    (Category::Recovery, "Recovery", "#10B981", "from-emerald-500 to-teal-600", "battery"),
    (Category::Mood, "Mood", "#EC4899", "from-pink-500 to-fuchsia-600", "smile"),
    (Category::Nutrition, "Nutrition", "#84CC16", "from-lime-500 to-green-600", "apple"),
    (Category::Cognitive, "Cognitive", "#8B5CF6", "from-violet-500 to-purple-700", "brain"),
    (Category::Activity, "Activity", "#06B6D4", "from-cyan-500 to-sky-600", "activity"),
    (Category::Stress, "Stress", "#F97316", "from-orange-500 to-red-600", "zap"),
];

const STANDARD_VARIABLE_TYPES: [(VariableType, &str, &str); 4] = [
    (VariableType::Behavior, "Behavior", "Something you do"),
    (VariableType::Biomarker, "Biomarker", "Something your body reports"),
    (VariableType::Outcome, "Outcome", "A result you are trying to move"),
    (VariableType::Environment, "Environment", "Something around you"),
];

/// Complete enumeration → metadata mapping.
///
/// # Examples
///
/// ```
/// use vitalsim::{Category, CategoryCatalog};
///
/// let catalog = CategoryCatalog::standard();
/// assert_eq!(catalog.category(Category::Sleep).unwrap().label, "Sleep");
/// assert!(catalog.category_by_name("hydration").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: BTreeMap<Category, CategoryMeta>,
    variable_types: BTreeMap<VariableType, VariableTypeMeta>,
}

impl CategoryCatalog {
    /// Builds a catalog, checking that both tables are complete and well-formed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if an enumeration member is missing or
    /// duplicated, or if any metadata token is malformed.
    pub fn from_entries(
        categories: Vec<(Category, CategoryMeta)>,
        variable_types: Vec<(VariableType, VariableTypeMeta)>,
    ) -> Result<Self, ConfigurationError> {
        let mut category_map = BTreeMap::new();
        for (category, meta) in categories {
            meta.validate(category.as_str())?;
            if category_map.insert(category, meta).is_some() {
                return Err(ConfigurationError::DuplicateMetadata {
                    key: category.to_string(),
                });
            }
        }
        if let Some(missing) = Category::ALL.iter().find(|c| !category_map.contains_key(*c)) {
            return Err(ConfigurationError::MissingCategoryMetadata {
                category: missing.to_string(),
            });
        }

        let mut variable_map = BTreeMap::new();
        for (variable_type, meta) in variable_types {
            if meta.label.trim().is_empty() {
                return Err(ConfigurationError::InvalidMetadata {
                    key: variable_type.to_string(),
                    reason: "label is empty".to_string(),
                });
            }
            if variable_map.insert(variable_type, meta).is_some() {
                return Err(ConfigurationError::DuplicateMetadata {
                    key: variable_type.to_string(),
                });
            }
        }
        if let Some(missing) = VariableType::ALL
            .iter()
            .find(|v| !variable_map.contains_key(*v))
        {
            return Err(ConfigurationError::MissingVariableTypeMetadata {
                variable_type: missing.to_string(),
            });
        }

        Ok(Self {
            categories: category_map,
            variable_types: variable_map,
        })
    }

    /// The built-in dashboard palette.
    ///
    /// Built straight from the `const` tables below; their completeness and
    /// token format are checked through `from_entries` in the unit tests.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            categories: STANDARD_CATEGORIES
                .iter()
                .map(|&(category, label, color, gradient, icon)| {
                    (category, CategoryMeta::new(label, color, gradient, icon))
                })
                .collect(),
            variable_types: STANDARD_VARIABLE_TYPES
                .iter()
                .map(|&(variable_type, label, description)| {
                    (variable_type, VariableTypeMeta::new(label, description))
                })
                .collect(),
        }
    }

    /// Looks up category metadata.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingCategoryMetadata` if no entry exists.
    pub fn category(&self, category: Category) -> Result<&CategoryMeta, ConfigurationError> {
        self.categories
            .get(&category)
            .ok_or_else(|| ConfigurationError::MissingCategoryMetadata {
                category: category.to_string(),
            })
    }

    /// Looks up category metadata by wire name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownCategory` for names outside the
    /// enumeration.
    pub fn category_by_name(&self, name: &str) -> Result<&CategoryMeta, ConfigurationError> {
        self.category(name.parse()?)
    }

    /// Looks up variable-type metadata.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingVariableTypeMetadata` if no entry exists.
    pub fn variable_type(
        &self,
        variable_type: VariableType,
    ) -> Result<&VariableTypeMeta, ConfigurationError> {
        self.variable_types.get(&variable_type).ok_or_else(|| {
            ConfigurationError::MissingVariableTypeMetadata {
                variable_type: variable_type.to_string(),
            }
        })
    }

    /// Looks up variable-type metadata by wire name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownVariableType` for names outside the
    /// enumeration.
    pub fn variable_type_by_name(
        &self,
        name: &str,
    ) -> Result<&VariableTypeMeta, ConfigurationError> {
        self.variable_type(name.parse()?)
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
