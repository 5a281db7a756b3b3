//! Tests for recipe validation, patch merging and filtering.

use std::str::FromStr;

use super::*;
use crate::domain::AttributeName;
use rstest::{fixture, rstest};

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("valid decimal literal")
}

fn ids(raw: &[i64]) -> Vec<AttributeId> {
    raw.iter().copied().map(AttributeId::new).collect()
}

fn attribute(id: i64, kind: AttributeKind) -> Attribute {
    Attribute::new(
        AttributeId::new(id),
        UserId::random(),
        kind,
        AttributeName::new(&format!("{kind} {id}")).expect("valid name"),
    )
}

#[fixture]
fn full_fields() -> RecipeFields {
    RecipeFields {
        title: Some("Chocolate cheesecake".to_owned()),
        time_minutes: Some(30),
        price: Some(dec("5.00")),
        link: Some("https://example.com/cheesecake".to_owned()),
        tags: Some(ids(&[1, 2])),
        ingredients: Some(ids(&[3])),
    }
}

#[fixture]
fn stored_recipe() -> Recipe {
    Recipe::new(RecipeParts {
        id: RecipeId::new(7),
        owner: UserId::random(),
        title: RecipeTitle::new("Sample recipe").expect("valid title"),
        time_minutes: TimeMinutes::new(22).expect("valid time"),
        price: Price::new(dec("5.25")).expect("valid price"),
        link: RecipeLink::new("https://example.com/recipe.pdf").expect("valid link"),
        tags: vec![attribute(2, AttributeKind::Tag), attribute(1, AttributeKind::Tag)],
        ingredients: vec![attribute(5, AttributeKind::Ingredient)],
    })
}

#[rstest]
fn display_is_title(stored_recipe: Recipe) {
    assert_eq!(stored_recipe.to_string(), "Sample recipe");
}

#[rstest]
fn attributes_are_ordered_by_id(stored_recipe: Recipe) {
    assert_eq!(stored_recipe.attribute_ids(AttributeKind::Tag), ids(&[1, 2]));
}

#[rstest]
#[case("5", "5.00")]
#[case("4.5", "4.50")]
#[case("0", "0.00")]
#[case("999.99", "999.99")]
#[case("12.300", "12.30")]
fn prices_are_held_at_two_places(#[case] raw: &str, #[case] expected: &str) {
    let price = Price::new(dec(raw)).expect("valid price");
    assert_eq!(price.to_string(), expected);
}

#[rstest]
#[case("-0.01", RecipeValidationError::NegativePrice)]
#[case("1.005", RecipeValidationError::PriceTooPrecise { max: PRICE_SCALE })]
#[case("1000", RecipeValidationError::PriceTooLarge { max: PRICE_MAX_DIGITS })]
fn invalid_prices_are_rejected(#[case] raw: &str, #[case] expected: RecipeValidationError) {
    assert_eq!(Price::new(dec(raw)), Err(expected));
}

#[rstest]
#[case(-1, RecipeValidationError::NegativeTime)]
#[case(i64::from(i32::MAX) + 1, RecipeValidationError::TimeOutOfRange)]
fn invalid_times_are_rejected(#[case] raw: i64, #[case] expected: RecipeValidationError) {
    assert_eq!(TimeMinutes::new(raw), Err(expected));
}

#[rstest]
fn draft_accepts_full_fields(full_fields: RecipeFields) {
    let draft = RecipeDraft::try_from_fields(full_fields).expect("valid draft");
    assert_eq!(draft.title.as_ref(), "Chocolate cheesecake");
    assert_eq!(draft.time_minutes.get(), 30);
    assert_eq!(draft.price.to_string(), "5.00");
    assert_eq!(draft.tags, ids(&[1, 2]));
    assert_eq!(draft.ingredients, ids(&[3]));
}

#[rstest]
#[case::title("title")]
#[case::time("time_minutes")]
#[case::price("price")]
fn draft_requires_core_fields(mut full_fields: RecipeFields, #[case] field: &'static str) {
    match field {
        "title" => full_fields.title = None,
        "time_minutes" => full_fields.time_minutes = None,
        _ => full_fields.price = None,
    }
    let err = RecipeDraft::try_from_fields(full_fields).expect_err("missing field");
    assert_eq!(err, RecipeValidationError::MissingField { field });
    assert_eq!(err.field(), field);
    assert_eq!(err.code(), "missing_field");
}

#[rstest]
fn draft_resets_omitted_optional_fields(mut full_fields: RecipeFields) {
    full_fields.link = None;
    full_fields.tags = None;
    full_fields.ingredients = None;

    let draft = RecipeDraft::try_from_fields(full_fields).expect("valid draft");

    assert_eq!(draft.link.as_ref(), "");
    assert!(draft.tags.is_empty());
    assert!(draft.ingredients.is_empty());
}

#[rstest]
fn draft_collapses_duplicate_ids(mut full_fields: RecipeFields) {
    full_fields.tags = Some(ids(&[4, 2, 4, 2, 9]));
    let draft = RecipeDraft::try_from_fields(full_fields).expect("valid draft");
    assert_eq!(draft.tags, ids(&[4, 2, 9]));
}

#[rstest]
fn draft_rejects_blank_title(mut full_fields: RecipeFields) {
    full_fields.title = Some("   ".to_owned());
    let err = RecipeDraft::try_from_fields(full_fields).expect_err("blank title");
    assert_eq!(err, RecipeValidationError::EmptyTitle);
    assert_eq!(err.field(), "title");
}

#[rstest]
fn patch_changes_only_given_fields(stored_recipe: Recipe) {
    let patch = RecipePatch::try_from_fields(RecipeFields {
        title: Some("Chicken tikka".to_owned()),
        ..RecipeFields::default()
    })
    .expect("valid patch");

    let draft = patch.apply_to(&stored_recipe);

    assert_eq!(draft.title.as_ref(), "Chicken tikka");
    assert_eq!(draft.time_minutes, stored_recipe.time_minutes());
    assert_eq!(draft.price, stored_recipe.price());
    assert_eq!(&draft.link, stored_recipe.link());
    assert_eq!(draft.tags, ids(&[1, 2]));
    assert_eq!(draft.ingredients, ids(&[5]));
}

#[rstest]
fn patch_replaces_relation_sets_when_given(stored_recipe: Recipe) {
    let patch = RecipePatch::try_from_fields(RecipeFields {
        tags: Some(ids(&[8])),
        ingredients: Some(Vec::new()),
        ..RecipeFields::default()
    })
    .expect("valid patch");

    assert_eq!(patch.attribute_ids(AttributeKind::Tag), Some(&ids(&[8])[..]));
    let draft = patch.apply_to(&stored_recipe);
    assert_eq!(draft.tags, ids(&[8]));
    assert!(draft.ingredients.is_empty());
}

#[rstest]
fn patch_validates_present_fields() {
    let err = RecipePatch::try_from_fields(RecipeFields {
        price: Some(dec("-3")),
        ..RecipeFields::default()
    })
    .expect_err("negative price");
    assert_eq!(err.field(), "price");
}

#[rstest]
#[case(&[], &[], true)]
#[case(&[1], &[], true)]
#[case(&[3], &[], false)]
#[case(&[2, 3], &[5], true)]
#[case(&[2], &[6], false)]
fn filter_matches_any_listed_attribute(
    stored_recipe: Recipe,
    #[case] tags: &[i64],
    #[case] ingredients: &[i64],
    #[case] expected: bool,
) {
    let filter = RecipeFilter {
        tags: ids(tags),
        ingredients: ids(ingredients),
    };
    assert_eq!(filter.matches(&stored_recipe), expected);
}
