//! Recipes and the rules for creating and changing them.
//!
//! Handlers collect whatever the client sent into [`RecipeFields`]. A full
//! write (create or replace) goes through [`RecipeDraft::try_from_fields`],
//! which insists on the required fields and resets omitted optional ones. A
//! partial write goes through [`RecipePatch`], which only validates the
//! fields present and later merges them onto the stored recipe.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;

use super::attribute::{Attribute, AttributeId, AttributeKind};
use super::user::UserId;

/// Maximum length, in characters, of titles and links.
pub const RECIPE_TEXT_MAX: usize = 255;
/// Decimal places kept for prices.
pub const PRICE_SCALE: u32 = 2;
/// Total significant digits allowed for prices.
pub const PRICE_MAX_DIGITS: u32 = 5;

/// Recipe identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecipeId(i64);

impl RecipeId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for recipe input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("time_minutes must be zero or greater")]
    NegativeTime,
    #[error("time_minutes is too large")]
    TimeOutOfRange,
    #[error("price must be zero or greater")]
    NegativePrice,
    #[error("price must have no more than {max} decimal places")]
    PriceTooPrecise { max: u32 },
    #[error("price must have no more than {max} digits in total")]
    PriceTooLarge { max: u32 },
    #[error("link must be at most {max} characters")]
    LinkTooLong { max: usize },
}

impl RecipeValidationError {
    /// Request field the failure refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::NegativeTime | Self::TimeOutOfRange => "time_minutes",
            Self::NegativePrice | Self::PriceTooPrecise { .. } | Self::PriceTooLarge { .. } => {
                "price"
            }
            Self::LinkTooLong { .. } => "link",
        }
    }

    /// Stable machine-readable code for error details.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::NegativeTime => "negative_time",
            Self::TimeOutOfRange => "time_out_of_range",
            Self::NegativePrice => "negative_price",
            Self::PriceTooPrecise { .. } => "price_too_precise",
            Self::PriceTooLarge { .. } => "price_too_large",
            Self::LinkTooLong { .. } => "link_too_long",
        }
    }
}

/// Trimmed, non-empty recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    pub fn new(raw: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > RECIPE_TEXT_MAX {
            return Err(RecipeValidationError::TitleTooLong {
                max: RECIPE_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Preparation time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeMinutes(i32);

impl TimeMinutes {
    pub fn new(raw: i64) -> Result<Self, RecipeValidationError> {
        if raw < 0 {
            return Err(RecipeValidationError::NegativeTime);
        }
        i32::try_from(raw)
            .map(Self)
            .map_err(|_| RecipeValidationError::TimeOutOfRange)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Non-negative price with at most five digits, two of them decimal.
///
/// The value is always held at scale 2, so it prints as `"5.00"`.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(45, 1)).expect("valid price");
/// assert_eq!(price.to_string(), "4.50");
/// assert!(Price::new(Decimal::new(1000, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, RecipeValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RecipeValidationError::NegativePrice);
        }
        if value.normalize().scale() > PRICE_SCALE {
            return Err(RecipeValidationError::PriceTooPrecise { max: PRICE_SCALE });
        }
        let limit = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_SCALE));
        if value >= limit {
            return Err(RecipeValidationError::PriceTooLarge {
                max: PRICE_MAX_DIGITS,
            });
        }
        let mut scaled = value.abs();
        scaled.rescale(PRICE_SCALE);
        Ok(Self(scaled))
    }

    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Optional external link; empty when unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeLink(String);

impl RecipeLink {
    pub fn new(raw: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > RECIPE_TEXT_MAX {
            return Err(RecipeValidationError::LinkTooLong {
                max: RECIPE_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored recipe together with its resolved tags and ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    id: RecipeId,
    owner: UserId,
    title: RecipeTitle,
    time_minutes: TimeMinutes,
    price: Price,
    link: RecipeLink,
    tags: Vec<Attribute>,
    ingredients: Vec<Attribute>,
}

/// Constructor parameters for [`Recipe`].
#[derive(Debug, Clone)]
pub struct RecipeParts {
    pub id: RecipeId,
    pub owner: UserId,
    pub title: RecipeTitle,
    pub time_minutes: TimeMinutes,
    pub price: Price,
    pub link: RecipeLink,
    pub tags: Vec<Attribute>,
    pub ingredients: Vec<Attribute>,
}

impl Recipe {
    pub fn new(parts: RecipeParts) -> Self {
        let RecipeParts {
            id,
            owner,
            title,
            time_minutes,
            price,
            link,
            mut tags,
            mut ingredients,
        } = parts;
        tags.sort_by_key(Attribute::id);
        ingredients.sort_by_key(Attribute::id);
        Self {
            id,
            owner,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        }
    }

    /// Build a recipe from a draft and the attributes its ids resolved to.
    pub fn from_draft(
        id: RecipeId,
        owner: UserId,
        draft: RecipeDraft,
        tags: Vec<Attribute>,
        ingredients: Vec<Attribute>,
    ) -> Self {
        Self::new(RecipeParts {
            id,
            owner,
            title: draft.title,
            time_minutes: draft.time_minutes,
            price: draft.price,
            link: draft.link,
            tags,
            ingredients,
        })
    }

    pub fn id(&self) -> RecipeId {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn title(&self) -> &RecipeTitle {
        &self.title
    }

    pub fn time_minutes(&self) -> TimeMinutes {
        self.time_minutes
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn link(&self) -> &RecipeLink {
        &self.link
    }

    /// Tags ordered by id.
    pub fn tags(&self) -> &[Attribute] {
        &self.tags
    }

    /// Ingredients ordered by id.
    pub fn ingredients(&self) -> &[Attribute] {
        &self.ingredients
    }

    /// Attributes of the given kind.
    pub fn attributes(&self, kind: AttributeKind) -> &[Attribute] {
        match kind {
            AttributeKind::Tag => &self.tags,
            AttributeKind::Ingredient => &self.ingredients,
        }
    }

    /// Ids of the attributes of the given kind.
    pub fn attribute_ids(&self, kind: AttributeKind) -> Vec<AttributeId> {
        self.attributes(kind).iter().map(Attribute::id).collect()
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title.as_ref())
    }
}

/// Unvalidated recipe input. `None` means the client omitted the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFields {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<AttributeId>>,
    pub ingredients: Option<Vec<AttributeId>>,
}

/// Complete, validated recipe state ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: RecipeTitle,
    pub time_minutes: TimeMinutes,
    pub price: Price,
    pub link: RecipeLink,
    pub tags: Vec<AttributeId>,
    pub ingredients: Vec<AttributeId>,
}

impl RecipeDraft {
    /// Validate a full write.
    ///
    /// `title`, `time_minutes` and `price` are required. An omitted link
    /// becomes empty and omitted relation lists become empty sets.
    pub fn try_from_fields(fields: RecipeFields) -> Result<Self, RecipeValidationError> {
        let RecipeFields {
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        } = fields;
        let title = title.ok_or(RecipeValidationError::MissingField { field: "title" })?;
        let time_minutes = time_minutes.ok_or(RecipeValidationError::MissingField {
            field: "time_minutes",
        })?;
        let price = price.ok_or(RecipeValidationError::MissingField { field: "price" })?;

        Ok(Self {
            title: RecipeTitle::new(&title)?,
            time_minutes: TimeMinutes::new(time_minutes)?,
            price: Price::new(price)?,
            link: link
                .as_deref()
                .map(RecipeLink::new)
                .transpose()?
                .unwrap_or_default(),
            tags: dedup_ids(tags.unwrap_or_default()),
            ingredients: dedup_ids(ingredients.unwrap_or_default()),
        })
    }

    /// Attribute ids of the given kind.
    pub fn attribute_ids(&self, kind: AttributeKind) -> &[AttributeId] {
        match kind {
            AttributeKind::Tag => &self.tags,
            AttributeKind::Ingredient => &self.ingredients,
        }
    }
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<RecipeTitle>,
    pub time_minutes: Option<TimeMinutes>,
    pub price: Option<Price>,
    pub link: Option<RecipeLink>,
    pub tags: Option<Vec<AttributeId>>,
    pub ingredients: Option<Vec<AttributeId>>,
}

impl RecipePatch {
    /// Validate only the fields the client supplied.
    pub fn try_from_fields(fields: RecipeFields) -> Result<Self, RecipeValidationError> {
        Ok(Self {
            title: fields.title.as_deref().map(RecipeTitle::new).transpose()?,
            time_minutes: fields.time_minutes.map(TimeMinutes::new).transpose()?,
            price: fields.price.map(Price::new).transpose()?,
            link: fields.link.as_deref().map(RecipeLink::new).transpose()?,
            tags: fields.tags.map(dedup_ids),
            ingredients: fields.ingredients.map(dedup_ids),
        })
    }

    /// Relation ids of the given kind, when the patch replaces that set.
    pub fn attribute_ids(&self, kind: AttributeKind) -> Option<&[AttributeId]> {
        match kind {
            AttributeKind::Tag => self.tags.as_deref(),
            AttributeKind::Ingredient => self.ingredients.as_deref(),
        }
    }

    /// Merge onto `current`, keeping every field the patch leaves out.
    pub fn apply_to(self, current: &Recipe) -> RecipeDraft {
        RecipeDraft {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            time_minutes: self.time_minutes.unwrap_or(current.time_minutes),
            price: self.price.unwrap_or(current.price),
            link: self.link.unwrap_or_else(|| current.link.clone()),
            tags: self
                .tags
                .unwrap_or_else(|| current.attribute_ids(AttributeKind::Tag)),
            ingredients: self
                .ingredients
                .unwrap_or_else(|| current.attribute_ids(AttributeKind::Ingredient)),
        }
    }
}

/// Restricts recipe listings to those linked to any of the given attributes.
///
/// An empty list means no restriction on that kind. When both lists are
/// given a recipe must match each of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<AttributeId>,
    pub ingredients: Vec<AttributeId>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let links_any = |wanted: &[AttributeId], kind: AttributeKind| {
            wanted.is_empty()
                || recipe
                    .attributes(kind)
                    .iter()
                    .any(|attribute| wanted.contains(&attribute.id()))
        };
        links_any(&self.tags, AttributeKind::Tag)
            && links_any(&self.ingredients, AttributeKind::Ingredient)
    }
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_ids(ids: Vec<AttributeId>) -> Vec<AttributeId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests;
