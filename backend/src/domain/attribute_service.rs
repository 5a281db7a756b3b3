//! Tag and ingredient services.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    AttributeCommand, AttributeQuery, AttributeRepository, AttributeRepositoryError,
};
use crate::domain::{Attribute, AttributeKind, AttributeName, Error, UserId};

/// Implements the attribute driving ports over an [`AttributeRepository`].
#[derive(Clone)]
pub struct AttributeService<R> {
    attributes: Arc<R>,
}

impl<R> AttributeService<R> {
    pub fn new(attributes: Arc<R>) -> Self {
        Self { attributes }
    }
}

/// Map attribute repository failures onto domain errors.
pub(crate) fn map_attribute_error(error: AttributeRepositoryError) -> Error {
    match error {
        AttributeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("attribute repository unavailable: {message}"))
        }
        AttributeRepositoryError::Query { message } => {
            Error::internal(format!("attribute repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> AttributeCommand for AttributeService<R>
where
    R: AttributeRepository,
{
    async fn create(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        name: &str,
    ) -> Result<Attribute, Error> {
        let name = AttributeName::new(name).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "name", "code": err.code() }))
        })?;
        self.attributes
            .create(owner, kind, &name)
            .await
            .map_err(map_attribute_error)
    }
}

#[async_trait]
impl<R> AttributeQuery for AttributeService<R>
where
    R: AttributeRepository,
{
    async fn list(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, Error> {
        self.attributes
            .list(owner, kind, assigned_only)
            .await
            .map_err(map_attribute_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAttributeRepository;
    use crate::domain::{AttributeId, ErrorCode};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn make_service(repo: MockAttributeRepository) -> AttributeService<MockAttributeRepository> {
        AttributeService::new(Arc::new(repo))
    }

    #[rstest]
    #[case(AttributeKind::Tag)]
    #[case(AttributeKind::Ingredient)]
    #[tokio::test]
    async fn create_trims_name_and_stores(#[case] kind: AttributeKind) {
        let owner = UserId::random();
        let mut repo = MockAttributeRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|owner, kind, name| {
                Ok(Attribute::new(AttributeId::new(1), *owner, kind, name.clone()))
            });
        let service = make_service(repo);

        let created = AttributeCommand::create(&service, &owner, kind, "  Cabbage ")
            .await
            .expect("attribute created");

        assert_eq!(created.to_string(), "Cabbage");
        assert_eq!(created.kind(), kind);
        assert_eq!(created.owner(), &owner);
    }

    #[tokio::test]
    async fn create_rejects_blank_names() {
        let mut repo = MockAttributeRepository::new();
        repo.expect_create().times(0);
        let service = make_service(repo);

        let error = AttributeCommand::create(&service, &UserId::random(), AttributeKind::Tag, "")
            .await
            .expect_err("blank name");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "name");
        assert_eq!(details["code"], "empty_name");
    }

    #[tokio::test]
    async fn list_forwards_assigned_only() {
        let owner = UserId::random();
        let mut repo = MockAttributeRepository::new();
        repo.expect_list()
            .with(eq(owner), eq(AttributeKind::Ingredient), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        let service = make_service(repo);

        let listed = AttributeQuery::list(&service, &owner, AttributeKind::Ingredient, true)
            .await
            .expect("listing succeeds");

        assert!(listed.is_empty());
    }

    #[rstest]
    #[case(AttributeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(AttributeRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn list_maps_repository_failures(
        #[case] failure: AttributeRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockAttributeRepository::new();
        repo.expect_list()
            .times(1)
            .return_once(move |_, _, _| Err(failure));
        let service = make_service(repo);

        let error = AttributeQuery::list(&service, &UserId::random(), AttributeKind::Tag, false)
            .await
            .expect_err("failure surfaces");

        assert_eq!(error.code(), expected);
    }
}
