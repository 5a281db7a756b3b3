//! Tags and ingredients.
//!
//! Both share one shape (an owned, named label attached to recipes) so they
//! are modelled once as [`Attribute`] and told apart by [`AttributeKind`].

use std::fmt;

use super::user::UserId;

/// Maximum length, in characters, of an attribute name.
pub const ATTRIBUTE_NAME_MAX: usize = 255;

/// Which collection an attribute belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Tag,
    Ingredient,
}

impl AttributeKind {
    /// Storage discriminator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Ingredient => "ingredient",
        }
    }

    /// Name of the recipe field holding this kind of reference.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Ingredient => "ingredients",
        }
    }

    /// Parse the storage discriminator.
    pub fn from_storage(raw: &str) -> Option<Self> {
        match raw {
            "tag" => Some(Self::Tag),
            "ingredient" => Some(Self::Ingredient),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a tag or ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeId(i64);

impl AttributeId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors for attribute names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

impl AttributeValidationError {
    /// Stable machine-readable code for error details.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
        }
    }
}

/// Trimmed, non-empty attribute name.
///
/// # Examples
/// ```
/// use recipe_backend::domain::AttributeName;
///
/// let name = AttributeName::new("  Vegan ").expect("valid name");
/// assert_eq!(name.as_ref(), "Vegan");
/// assert!(AttributeName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeName(String);

impl AttributeName {
    pub fn new(raw: &str) -> Result<Self, AttributeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AttributeValidationError::EmptyName);
        }
        if trimmed.chars().count() > ATTRIBUTE_NAME_MAX {
            return Err(AttributeValidationError::NameTooLong {
                max: ATTRIBUTE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A tag or ingredient owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    id: AttributeId,
    owner: UserId,
    kind: AttributeKind,
    name: AttributeName,
}

impl Attribute {
    pub fn new(id: AttributeId, owner: UserId, kind: AttributeKind, name: AttributeName) -> Self {
        Self {
            id,
            owner,
            kind,
            name,
        }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn name(&self) -> &AttributeName {
        &self.name
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_ref())
    }
}

/// Order attributes the way listings present them: name descending, with the
/// newest id first among equal names.
pub fn sort_for_listing(attributes: &mut [Attribute]) {
    attributes.sort_by(|a, b| {
        b.name
            .as_ref()
            .cmp(a.name.as_ref())
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn attribute(id: i64, kind: AttributeKind, name: &str) -> Attribute {
        Attribute::new(
            AttributeId::new(id),
            UserId::random(),
            kind,
            AttributeName::new(name).expect("valid name"),
        )
    }

    #[rstest]
    #[case(AttributeKind::Tag, "Vegan")]
    #[case(AttributeKind::Ingredient, "Cucumber")]
    fn display_is_name(#[case] kind: AttributeKind, #[case] name: &str) {
        assert_eq!(attribute(1, kind, name).to_string(), name);
    }

    #[rstest]
    #[case("", AttributeValidationError::EmptyName)]
    #[case(" \t", AttributeValidationError::EmptyName)]
    fn blank_names_are_rejected(#[case] raw: &str, #[case] expected: AttributeValidationError) {
        assert_eq!(AttributeName::new(raw), Err(expected));
    }

    #[rstest]
    fn names_longer_than_limit_are_rejected() {
        let raw = "x".repeat(ATTRIBUTE_NAME_MAX + 1);
        assert_eq!(
            AttributeName::new(&raw),
            Err(AttributeValidationError::NameTooLong {
                max: ATTRIBUTE_NAME_MAX
            })
        );
        assert!(AttributeName::new(&"x".repeat(ATTRIBUTE_NAME_MAX)).is_ok());
    }

    #[rstest]
    #[case(AttributeKind::Tag)]
    #[case(AttributeKind::Ingredient)]
    fn storage_discriminator_round_trips(#[case] kind: AttributeKind) {
        assert_eq!(AttributeKind::from_storage(kind.as_str()), Some(kind));
    }

    #[rstest]
    fn listing_order_is_name_descending() {
        let mut items = vec![
            attribute(1, AttributeKind::Ingredient, "Kale"),
            attribute(2, AttributeKind::Ingredient, "Salt"),
            attribute(3, AttributeKind::Ingredient, "Apple"),
        ];
        sort_for_listing(&mut items);
        let names: Vec<String> = items.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Salt", "Kale", "Apple"]);
    }
}
