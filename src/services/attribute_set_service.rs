use std::{collections::HashMap, sync::Arc};

use serde_json::json;

use crate::{
    audit,
    dto::attributes::{
        AssignAttributeQuery, AttributeSetList, CreateAttributeSetRequest,
        UpdateAttributeSetRequest,
    },
    error::{AppError, AppResult},
    models::{Attribute, AttributeSet, AttributeSetAssignment},
    repository::{
        AttributeRepository, AttributeSetAssignmentRepository, AttributeSetRepository,
        AuditRepository, Repositories,
    },
    response::{ApiResponse, Meta},
};

#[derive(Clone)]
pub struct AttributeSetsService {
    sets: Arc<dyn AttributeSetRepository>,
    assignments: Arc<dyn AttributeSetAssignmentRepository>,
    attributes: Arc<dyn AttributeRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl AttributeSetsService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            sets: repos.attribute_sets.clone(),
            assignments: repos.assignments.clone(),
            attributes: repos.attributes.clone(),
            audit: repos.audit.clone(),
        }
    }

    pub async fn find_all(&self) -> AppResult<ApiResponse<AttributeSetList>> {
        let sets = self.sets.find_all().await?;
        let set_ids: Vec<i64> = sets.iter().map(|s| s.id).collect();
        let assignments = if set_ids.is_empty() {
            Vec::new()
        } else {
            self.assignments.find_by_attribute_set_ids(&set_ids).await?
        };
        let attributes = self.load_attributes(&assignments).await?;

        let mut by_set: HashMap<i64, Vec<AttributeSetAssignment>> = HashMap::new();
        for assignment in assignments {
            by_set
                .entry(assignment.attribute_set_id)
                .or_default()
                .push(assignment);
        }

        let items: Vec<AttributeSet> = sets
            .into_iter()
            .map(|set| {
                let assigned = by_set.remove(&set.id).unwrap_or_default();
                let resolved = ordered_attributes(assigned, &attributes);
                set.with_attributes(resolved)
            })
            .collect();
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success(
            "Attribute sets",
            AttributeSetList { items },
            Some(meta),
        ))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<ApiResponse<AttributeSet>> {
        let set = self.get(id).await?;
        let set = self.resolve(set).await?;
        Ok(ApiResponse::success("Attribute set", set, None))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<ApiResponse<AttributeSet>> {
        let set = self
            .sets
            .find_by_name(name.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attribute set {name} not found")))?;
        let set = self.resolve(set).await?;
        Ok(ApiResponse::success("Attribute set", set, None))
    }

    pub async fn create(
        &self,
        payload: CreateAttributeSetRequest,
    ) -> AppResult<ApiResponse<AttributeSet>> {
        let name = payload.name.trim().to_string();
        if self.sets.find_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Attribute set with name {name} already exists"
            )));
        }

        let set = AttributeSet::create(name, payload.description, false, 0);
        let set = self.sets.create(set).await?;
        tracing::info!(attribute_set_id = set.id, name = %set.name, "attribute set created");

        audit::record(
            self.audit.as_ref(),
            "attribute_set_create",
            "attribute_sets",
            json!({ "attribute_set_id": set.id, "name": set.name }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute set created",
            set,
            Some(Meta::empty()),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateAttributeSetRequest,
    ) -> AppResult<ApiResponse<AttributeSet>> {
        let existing = self.get(id).await?;

        let name = payload.name.map(|n| n.trim().to_string());
        if let Some(name) = name.as_deref().filter(|n| *n != existing.name) {
            if let Some(other) = self.sets.find_by_name(name).await? {
                if other.id != id {
                    return Err(AppError::Conflict(format!(
                        "Attribute set with name {name} already exists"
                    )));
                }
            }
        }

        let description = payload
            .description
            .map(|d| d.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()));
        let set = self.sets.update(existing.update(name, description)).await?;
        let set = self.resolve(set).await?;
        tracing::info!(attribute_set_id = id, "attribute set updated");

        audit::record(
            self.audit.as_ref(),
            "attribute_set_update",
            "attribute_sets",
            json!({ "attribute_set_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute set updated",
            set,
            Some(Meta::empty()),
        ))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<AttributeSet>> {
        let existing = self.get(id).await?;
        if existing.is_system {
            return Err(AppError::Conflict(
                "Cannot delete system attribute set".to_string(),
            ));
        }

        let removed = self.assignments.delete_by_attribute_set_id(id).await?;
        self.sets.delete(id).await?;
        tracing::info!(attribute_set_id = id, assignments = removed, "attribute set deleted");

        audit::record(
            self.audit.as_ref(),
            "attribute_set_delete",
            "attribute_sets",
            json!({ "attribute_set_id": id, "assignments_removed": removed }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute set deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    pub async fn add_attribute_to_set(
        &self,
        set_id: i64,
        attribute_id: i64,
        options: AssignAttributeQuery,
    ) -> AppResult<ApiResponse<AttributeSetAssignment>> {
        self.get(set_id).await?;
        if self.attributes.find_by_id(attribute_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Attribute with ID {attribute_id} not found"
            )));
        }
        if self
            .assignments
            .find_by_set_and_attribute(set_id, attribute_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Attribute is already assigned to this set".to_string(),
            ));
        }

        let assignment = AttributeSetAssignment::create(
            set_id,
            attribute_id,
            options.sort_order.unwrap_or(0),
            options.is_required.unwrap_or(false),
        );
        let assignment = self.assignments.create(assignment).await?;
        tracing::info!(attribute_set_id = set_id, attribute_id, "attribute assigned to set");

        audit::record(
            self.audit.as_ref(),
            "attribute_set_assign",
            "attribute_sets",
            json!({ "attribute_set_id": set_id, "attribute_id": attribute_id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute added to set",
            assignment,
            Some(Meta::empty()),
        ))
    }

    pub async fn remove_attribute_from_set(
        &self,
        set_id: i64,
        attribute_id: i64,
    ) -> AppResult<ApiResponse<AttributeSetAssignment>> {
        let assignment = self
            .assignments
            .find_by_set_and_attribute(set_id, attribute_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Attribute is not assigned to this set".to_string())
            })?;
        self.assignments
            .delete_by_set_and_attribute(set_id, attribute_id)
            .await?;
        tracing::info!(attribute_set_id = set_id, attribute_id, "attribute removed from set");

        audit::record(
            self.audit.as_ref(),
            "attribute_set_unassign",
            "attribute_sets",
            json!({ "attribute_set_id": set_id, "attribute_id": attribute_id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute removed from set",
            assignment,
            Some(Meta::empty()),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<AttributeSet> {
        self.sets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attribute set with ID {id} not found")))
    }

    async fn resolve(&self, set: AttributeSet) -> AppResult<AttributeSet> {
        let assignments = self.assignments.find_by_attribute_set_id(set.id).await?;
        let attributes = self.load_attributes(&assignments).await?;
        Ok(set.with_attributes(ordered_attributes(assignments, &attributes)))
    }

    /// One lookup for every attribute referenced by `assignments`.
    async fn load_attributes(
        &self,
        assignments: &[AttributeSetAssignment],
    ) -> AppResult<HashMap<i64, Attribute>> {
        let mut ids: Vec<i64> = assignments.iter().map(|a| a.attribute_id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let attributes = self.attributes.find_by_ids(&ids).await?;
        Ok(attributes.into_iter().map(|a| (a.id, a)).collect())
    }
}

/// Attributes in assignment order; dangling assignments are skipped.
fn ordered_attributes(
    mut assignments: Vec<AttributeSetAssignment>,
    attributes: &HashMap<i64, Attribute>,
) -> Vec<Attribute> {
    assignments.sort_by_key(|a| (a.sort_order, a.id));
    assignments
        .iter()
        .filter_map(|a| attributes.get(&a.attribute_id).cloned())
        .collect()
}
