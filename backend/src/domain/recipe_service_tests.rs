//! Tests for the recipe service.

use std::str::FromStr;
use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockAttributeRepository, MockRecipeRepository};
use crate::domain::{
    Attribute, AttributeName, ErrorCode, Price, RecipeLink, RecipeParts, RecipeTitle, TimeMinutes,
};
use rust_decimal::Decimal;
use serde_json::json;

type Service = RecipeService<MockRecipeRepository, MockAttributeRepository>;

fn make_service(recipes: MockRecipeRepository, attributes: MockAttributeRepository) -> Service {
    RecipeService::new(Arc::new(recipes), Arc::new(attributes))
}

fn ids(raw: &[i64]) -> Vec<AttributeId> {
    raw.iter().copied().map(AttributeId::new).collect()
}

fn attributes_for(owner: &UserId, kind: AttributeKind, found: &[AttributeId]) -> Vec<Attribute> {
    found
        .iter()
        .map(|id| {
            Attribute::new(
                *id,
                *owner,
                kind,
                AttributeName::new(&format!("{kind} {id}")).expect("valid name"),
            )
        })
        .collect()
}

fn fields(title: &str) -> RecipeFields {
    RecipeFields {
        title: Some(title.to_owned()),
        time_minutes: Some(10),
        price: Some(Decimal::from_str("5.00").expect("decimal")),
        ..RecipeFields::default()
    }
}

fn stored(owner: &UserId, id: i64, tags: &[i64]) -> Recipe {
    Recipe::new(RecipeParts {
        id: RecipeId::new(id),
        owner: *owner,
        title: RecipeTitle::new("Sample recipe").expect("title"),
        time_minutes: TimeMinutes::new(22).expect("time"),
        price: Price::new(Decimal::from_str("5.25").expect("decimal")).expect("price"),
        link: RecipeLink::new("http://example.com/recipe.pdf").expect("link"),
        tags: attributes_for(owner, AttributeKind::Tag, &ids(tags)),
        ingredients: Vec::new(),
    })
}

/// Attribute repository that knows exactly `known` ids of every kind.
fn attribute_repo_knowing(known: &'static [i64]) -> MockAttributeRepository {
    let mut repo = MockAttributeRepository::new();
    repo.expect_find_many().returning(move |owner, kind, wanted| {
        let hits: Vec<AttributeId> = wanted
            .iter()
            .copied()
            .filter(|id| known.contains(&id.get()))
            .collect();
        Ok(attributes_for(owner, kind, &hits))
    });
    repo
}

fn echo_create(recipes: &mut MockRecipeRepository) {
    recipes
        .expect_create()
        .times(1)
        .returning(|owner, draft| {
            Ok(Recipe::from_draft(
                RecipeId::new(1),
                *owner,
                draft.clone(),
                attributes_for(owner, AttributeKind::Tag, &draft.tags),
                attributes_for(owner, AttributeKind::Ingredient, &draft.ingredients),
            ))
        });
}

fn echo_update(recipes: &mut MockRecipeRepository) {
    recipes
        .expect_update()
        .times(1)
        .returning(|owner, id, draft| {
            Ok(Some(Recipe::from_draft(
                id,
                *owner,
                draft.clone(),
                attributes_for(owner, AttributeKind::Tag, &draft.tags),
                attributes_for(owner, AttributeKind::Ingredient, &draft.ingredients),
            )))
        });
}

#[tokio::test]
async fn create_links_requested_tags() {
    let owner = UserId::random();
    let mut recipes = MockRecipeRepository::new();
    echo_create(&mut recipes);
    let service = make_service(recipes, attribute_repo_knowing(&[1, 2]));

    let mut input = fields("Thai prawn curry");
    input.tags = Some(ids(&[1, 2]));
    let recipe = service.create(&owner, input).await.expect("recipe created");

    assert_eq!(recipe.attribute_ids(AttributeKind::Tag), ids(&[1, 2]));
    assert_eq!(recipe.to_string(), "Thai prawn curry");
}

#[tokio::test]
async fn create_rejects_foreign_or_unknown_ids() {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_create().times(0);
    let service = make_service(recipes, attribute_repo_knowing(&[1]));

    let mut input = fields("Avocado lime cheesecake");
    input.ingredients = Some(ids(&[1, 9, 4]));
    let error = service
        .create(&UserId::random(), input)
        .await
        .expect_err("unknown ids rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({"field": "ingredients", "code": "unknown_ids", "ids": [9, 4]}))
    );
}

#[tokio::test]
async fn create_reports_missing_required_field() {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_create().times(0);
    let service = make_service(recipes, MockAttributeRepository::new());

    let mut input = fields("No price");
    input.price = None;
    let error = service
        .create(&UserId::random(), input)
        .await
        .expect_err("missing price");

    assert_eq!(
        error.details(),
        Some(&json!({"field": "price", "code": "missing_field"}))
    );
}

#[tokio::test]
async fn partial_update_keeps_unspecified_fields() {
    let owner = UserId::random();
    let current = stored(&owner, 3, &[1]);
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(current)));
    echo_update(&mut recipes);
    let service = make_service(recipes, attribute_repo_knowing(&[1, 2]));

    let patch = RecipeFields {
        title: Some("Chicken tikka".to_owned()),
        tags: Some(ids(&[2])),
        ..RecipeFields::default()
    };
    let updated = service
        .update(&owner, RecipeId::new(3), RecipeUpdate::Partial(patch))
        .await
        .expect("patched");

    assert_eq!(updated.title().as_ref(), "Chicken tikka");
    assert_eq!(updated.time_minutes().get(), 22);
    assert_eq!(updated.price().to_string(), "5.25");
    assert_eq!(updated.link().as_ref(), "http://example.com/recipe.pdf");
    assert_eq!(updated.attribute_ids(AttributeKind::Tag), ids(&[2]));
}

#[tokio::test]
async fn full_update_resets_optional_fields() {
    let owner = UserId::random();
    let current = stored(&owner, 3, &[1]);
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(current)));
    echo_update(&mut recipes);
    let service = make_service(recipes, MockAttributeRepository::new());

    let updated = service
        .update(
            &owner,
            RecipeId::new(3),
            RecipeUpdate::Full(fields("Spaghetti carbonara")),
        )
        .await
        .expect("replaced");

    assert_eq!(updated.title().as_ref(), "Spaghetti carbonara");
    assert_eq!(updated.time_minutes().get(), 10);
    assert_eq!(updated.link().as_ref(), "");
    assert!(updated.tags().is_empty());
}

#[tokio::test]
async fn full_update_requires_core_fields() {
    let owner = UserId::random();
    let current = stored(&owner, 3, &[]);
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(current)));
    recipes.expect_update().times(0);
    let service = make_service(recipes, MockAttributeRepository::new());

    let error = service
        .update(
            &owner,
            RecipeId::new(3),
            RecipeUpdate::Full(RecipeFields {
                title: Some("Only a title".to_owned()),
                ..RecipeFields::default()
            }),
        )
        .await
        .expect_err("missing fields");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn update_of_missing_recipe_is_not_found() {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_find().times(1).return_once(|_, _| Ok(None));
    let service = make_service(recipes, MockAttributeRepository::new());

    let error = service
        .update(
            &UserId::random(),
            RecipeId::new(42),
            RecipeUpdate::Partial(RecipeFields::default()),
        )
        .await
        .expect_err("missing recipe");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_reports_missing_recipe() {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_delete()
        .times(1)
        .return_once(|_, _| Ok(false));
    let service = make_service(recipes, MockAttributeRepository::new());

    let error = service
        .delete(&UserId::random(), RecipeId::new(1))
        .await
        .expect_err("nothing deleted");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn get_maps_connection_failures() {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(|_, _| Err(RecipeRepositoryError::connection("refused")));
    let service = make_service(recipes, MockAttributeRepository::new());

    let error = service
        .get(&UserId::random(), RecipeId::new(1))
        .await
        .expect_err("connection failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
