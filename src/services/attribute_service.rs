use std::sync::Arc;

use serde_json::json;

use crate::{
    audit,
    dto::attributes::{AttributeList, CreateAttributeRequest, UpdateAttributeRequest},
    error::{AppError, AppResult},
    models::{Attribute, AttributePatch},
    repository::{AttributeRepository, AuditRepository, Repositories},
    response::{ApiResponse, Meta},
};

#[derive(Clone)]
pub struct AttributesService {
    attributes: Arc<dyn AttributeRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl AttributesService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            attributes: repos.attributes.clone(),
            audit: repos.audit.clone(),
        }
    }

    pub async fn find_all(&self) -> AppResult<ApiResponse<AttributeList>> {
        let items = self.attributes.find_all().await?;
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success("Attributes", AttributeList { items }, Some(meta)))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<ApiResponse<Attribute>> {
        let attribute = self.get(id).await?;
        Ok(ApiResponse::success("Attribute", attribute, None))
    }

    pub async fn find_by_code(&self, code: &str) -> AppResult<ApiResponse<Attribute>> {
        let attribute = self
            .attributes
            .find_by_code(code.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attribute with code {code} not found")))?;
        Ok(ApiResponse::success("Attribute", attribute, None))
    }

    pub async fn create(&self, payload: CreateAttributeRequest) -> AppResult<ApiResponse<Attribute>> {
        let code = payload.code.trim().to_string();
        if self.attributes.find_by_code(&code).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Attribute with code {code} already exists"
            )));
        }

        let attribute = Attribute::create(
            code,
            payload.name.trim().to_string(),
            payload.input_type,
            payload.data_type,
            payload.unit.map(|u| u.trim().to_string()),
        );
        let attribute = self.attributes.create(attribute).await?;
        tracing::info!(attribute_id = attribute.id, code = %attribute.code, "attribute created");

        audit::record(
            self.audit.as_ref(),
            "attribute_create",
            "attributes",
            json!({ "attribute_id": attribute.id, "code": attribute.code }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute created",
            attribute,
            Some(Meta::empty()),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateAttributeRequest,
    ) -> AppResult<ApiResponse<Attribute>> {
        let existing = self.get(id).await?;

        let code = payload.code.map(|c| c.trim().to_string());
        if let Some(code) = code.as_deref().filter(|c| *c != existing.code) {
            if self.attributes.find_by_code(code).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Attribute with code {code} already exists"
                )));
            }
        }

        let updated = existing.update(AttributePatch {
            code,
            name: payload.name.map(|n| n.trim().to_string()),
            input_type: payload.input_type,
            data_type: payload.data_type,
            unit: payload
                .unit
                .map(|unit| unit.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())),
        });
        let attribute = self.attributes.update(updated).await?;
        tracing::info!(attribute_id = id, "attribute updated");

        audit::record(
            self.audit.as_ref(),
            "attribute_update",
            "attributes",
            json!({ "attribute_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute updated",
            attribute,
            Some(Meta::empty()),
        ))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<Attribute>> {
        let existing = self.get(id).await?;
        self.attributes.delete(id).await?;
        tracing::info!(attribute_id = id, "attribute deleted");

        audit::record(
            self.audit.as_ref(),
            "attribute_delete",
            "attributes",
            json!({ "attribute_id": id, "code": existing.code }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<Attribute> {
        self.attributes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attribute with ID {id} not found")))
    }
}
