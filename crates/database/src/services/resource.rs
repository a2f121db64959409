use super::{cohort::CohortService, now, required_text};
use crate::{
    entities::{cohort, resource},
    error::ServiceError,
};
use log::info;
use models::{
    access::ResourceSnapshot,
    resource_kind::{ALLOWED_EXTENSIONS, ResourceKind, is_allowed_file},
    visibility::Gated,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// Optional filters for resource listings
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub cohort: Option<Uuid>,
    pub kind: Option<ResourceKind>,
    pub access_previous: Option<bool>,
    pub draft: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ResourceInput {
    pub cohort_id: Uuid,
    pub kind: ResourceKind,
    pub access_previous: bool,
    pub draft: bool,
    pub name: String,
    pub description: String,
    pub file: Option<String>,
    pub url: Option<String>,
    pub order: i32,
}

impl ResourceInput {
    /// Normalizes the file reference; blank means no file
    fn file(&self) -> Result<Option<String>, ServiceError> {
        match self.file.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(path) if is_allowed_file(path) => Ok(Some(path.to_owned())),
            Some(path) => Err(ServiceError::Validation(format!(
                "file {path:?} must be a relative path ending in one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))),
        }
    }
}

pub struct ResourceService;

impl ResourceService {
    /// Resources matching `filter`, in display order
    pub async fn list(
        db: &DatabaseConnection,
        filter: ResourceFilter,
    ) -> Result<Vec<resource::Model>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(cohort_id) = filter.cohort {
            condition = condition.add(resource::Column::CohortId.eq(cohort_id));
        }
        if let Some(kind) = filter.kind {
            condition = condition.add(resource::Column::Kind.eq(kind));
        }
        if let Some(access_previous) = filter.access_previous {
            condition = condition.add(resource::Column::AccessPrevious.eq(access_previous));
        }
        if let Some(draft) = filter.draft {
            condition = condition.add(resource::Column::Draft.eq(draft));
        }

        let resources = resource::Entity::find()
            .filter(condition)
            .order_by_asc(resource::Column::Order)
            .order_by_desc(resource::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(resources)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<resource::Model, ServiceError> {
        resource::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::ResourceNotFound)
    }

    /// A resource together with the cohort it belongs to
    pub async fn get_with_cohort(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<(resource::Model, cohort::Model), ServiceError> {
        let (resource, cohort) = resource::Entity::find_by_id(id)
            .find_also_related(cohort::Entity)
            .one(db)
            .await?
            .ok_or(ServiceError::ResourceNotFound)?;

        let cohort = cohort.ok_or(ServiceError::CohortNotFound)?;
        Ok((resource, cohort))
    }

    /// What the download guard needs to judge a resource
    pub fn snapshot(resource: &resource::Model, cohort: &cohort::Model) -> ResourceSnapshot {
        ResourceSnapshot {
            cohort_id: cohort.id,
            cohort_start: cohort.start_date,
            gate: resource.gate(),
            file: resource.file.clone(),
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: ResourceInput,
    ) -> Result<resource::Model, ServiceError> {
        let name = required_text("name", &input.name, 200)?;
        let file = input.file()?;
        CohortService::get(db, input.cohort_id).await?;

        let timestamp = now();
        let resource = resource::ActiveModel {
            id: Set(Uuid::new_v4()),
            cohort_id: Set(input.cohort_id),
            kind: Set(input.kind),
            access_previous: Set(input.access_previous),
            draft: Set(input.draft),
            name: Set(name),
            description: Set(input.description),
            file: Set(file),
            url: Set(input.url),
            order: Set(input.order),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        info!(
            "Created {} resource {} in cohort {}",
            resource.kind, resource.id, resource.cohort_id
        );
        Ok(resource)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: ResourceInput,
    ) -> Result<resource::Model, ServiceError> {
        let name = required_text("name", &input.name, 200)?;
        let file = input.file()?;
        let existing = Self::get(db, id).await?;

        if existing.cohort_id != input.cohort_id {
            CohortService::get(db, input.cohort_id).await?;
        }

        let mut resource: resource::ActiveModel = existing.into();
        resource.cohort_id = Set(input.cohort_id);
        resource.kind = Set(input.kind);
        resource.access_previous = Set(input.access_previous);
        resource.draft = Set(input.draft);
        resource.name = Set(name);
        resource.description = Set(input.description);
        resource.file = Set(file);
        resource.url = Set(input.url);
        resource.order = Set(input.order);
        resource.updated_at = Set(now());

        Ok(resource.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let resource = Self::get(db, id).await?;
        resource.delete(db).await?;

        info!("Deleted resource {id}");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::*;

    fn input(cohort_id: Uuid, file: Option<&str>) -> ResourceInput {
        ResourceInput {
            cohort_id,
            kind: ResourceKind::Video,
            access_previous: true,
            draft: false,
            name: "Welcome".to_owned(),
            description: "Kick-off recording".to_owned(),
            file: file.map(str::to_owned),
            url: None,
            order: 1,
        }
    }

    #[tokio::test]
    async fn test_create_and_snapshot() {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;
        let cohort = seed_cohort(&db, program.id, "March", date(2025, 3, 1)).await;

        let resource = ResourceService::create(&db, input(cohort.id, Some("resources/welcome.mp4")))
            .await
            .unwrap();
        assert_eq!(resource.kind, ResourceKind::Video);

        let (found, parent) = ResourceService::get_with_cohort(&db, resource.id).await.unwrap();
        assert_eq!(found, resource);
        let snapshot = ResourceService::snapshot(&found, &parent);
        assert_eq!(snapshot.cohort_start, date(2025, 3, 1));
        assert!(snapshot.gate.access_previous);
        assert_eq!(snapshot.file.as_deref(), Some("resources/welcome.mp4"));
    }

    #[tokio::test]
    async fn test_file_validation() {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;
        let cohort = seed_cohort(&db, program.id, "March", date(2025, 3, 1)).await;

        for bad in ["notes.docx", "../secret.pdf", "a\"b.pdf", "week\n1.mp4"] {
            assert!(matches!(
                ResourceService::create(&db, input(cohort.id, Some(bad))).await,
                Err(ServiceError::Validation(_))
            ));
        }

        let blank = ResourceService::create(&db, input(cohort.id, Some("  ")))
            .await
            .unwrap();
        assert_eq!(blank.file, None);
    }

    #[tokio::test]
    async fn test_unknown_cohort_and_resource() {
        let db = test_db().await;

        assert!(matches!(
            ResourceService::create(&db, input(Uuid::new_v4(), None)).await,
            Err(ServiceError::CohortNotFound)
        ));
        assert!(matches!(
            ResourceService::get_with_cohort(&db, Uuid::new_v4()).await,
            Err(ServiceError::ResourceNotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;
        let march = seed_cohort(&db, program.id, "March", date(2025, 3, 1)).await;
        let june = seed_cohort(&db, program.id, "June", date(2025, 6, 1)).await;
        let draft = seed_resource(&db, march.id, "draft", 0, true, false).await;
        let early = seed_resource(&db, march.id, "early", 1, false, true).await;
        seed_resource(&db, june.id, "other", 0, false, false).await;

        let in_march = ResourceService::list(
            &db,
            ResourceFilter {
                cohort: Some(march.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(in_march.len(), 2);

        let drafts = ResourceService::list(
            &db,
            ResourceFilter {
                draft: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(drafts.iter().map(|r| r.id).collect::<Vec<_>>(), vec![draft.id]);

        let early_access = ResourceService::list(
            &db,
            ResourceFilter {
                access_previous: Some(true),
                kind: Some(ResourceKind::Pdf),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            early_access.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![early.id]
        );

        let videos = ResourceService::list(
            &db,
            ResourceFilter {
                kind: Some(ResourceKind::Video),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let program = seed_program(&db, "Rust").await;
        let cohort = seed_cohort(&db, program.id, "March", date(2025, 3, 1)).await;
        let resource = seed_resource(&db, cohort.id, "slides", 0, true, false).await;

        let mut published = input(cohort.id, Some("resources/slides.pdf"));
        published.kind = ResourceKind::Pdf;
        let updated = ResourceService::update(&db, resource.id, published)
            .await
            .unwrap();
        assert!(!updated.draft);
        assert_eq!(updated.name, "Welcome");

        ResourceService::delete(&db, resource.id).await.unwrap();
        assert!(matches!(
            ResourceService::get(&db, resource.id).await,
            Err(ServiceError::ResourceNotFound)
        ));
    }
}
