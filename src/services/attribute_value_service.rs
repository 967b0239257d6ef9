use std::sync::Arc;

use serde_json::json;

use crate::{
    audit,
    dto::attributes::{
        AttributeValueList, CreateAttributeValueRequest, UpdateAttributeValueRequest,
    },
    error::{AppError, AppResult},
    models::AttributeValue,
    repository::{AttributeRepository, AttributeValueRepository, AuditRepository, Repositories},
    response::{ApiResponse, Meta},
};

#[derive(Clone)]
pub struct AttributeValuesService {
    values: Arc<dyn AttributeValueRepository>,
    attributes: Arc<dyn AttributeRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl AttributeValuesService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            values: repos.attribute_values.clone(),
            attributes: repos.attributes.clone(),
            audit: repos.audit.clone(),
        }
    }

    pub async fn find_all(&self) -> AppResult<ApiResponse<AttributeValueList>> {
        let items = self.values.find_all().await?;
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success(
            "Attribute values",
            AttributeValueList { items },
            Some(meta),
        ))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<ApiResponse<AttributeValue>> {
        let value = self.get(id).await?;
        Ok(ApiResponse::success("Attribute value", value, None))
    }

    pub async fn find_by_attribute_id(
        &self,
        attribute_id: i64,
    ) -> AppResult<ApiResponse<AttributeValueList>> {
        self.ensure_attribute(attribute_id).await?;
        let items = self.values.find_by_attribute_id(attribute_id).await?;
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success(
            "Attribute values",
            AttributeValueList { items },
            Some(meta),
        ))
    }

    pub async fn create(
        &self,
        payload: CreateAttributeValueRequest,
    ) -> AppResult<ApiResponse<AttributeValue>> {
        self.ensure_attribute(payload.attribute_id).await?;

        let value_code = payload.value_code.trim().to_string();
        if self
            .values
            .find_by_attribute_and_code(payload.attribute_id, &value_code)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Value code {value_code} already exists for this attribute"
            )));
        }

        let value = AttributeValue::create(
            payload.attribute_id,
            value_code,
            payload.label.trim().to_string(),
            payload.sort_order.unwrap_or(0),
        );
        let value = self.values.create(value).await?;
        tracing::info!(
            attribute_value_id = value.id,
            attribute_id = value.attribute_id,
            "attribute value created"
        );

        audit::record(
            self.audit.as_ref(),
            "attribute_value_create",
            "attribute_values",
            json!({ "attribute_value_id": value.id, "attribute_id": value.attribute_id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute value created",
            value,
            Some(Meta::empty()),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateAttributeValueRequest,
    ) -> AppResult<ApiResponse<AttributeValue>> {
        let existing = self.get(id).await?;

        let value_code = payload.value_code.map(|c| c.trim().to_string());
        if let Some(code) = value_code.as_deref().filter(|c| *c != existing.value_code) {
            if self
                .values
                .find_by_attribute_and_code(existing.attribute_id, code)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(format!(
                    "Value code {code} already exists for this attribute"
                )));
            }
        }

        let updated = existing.update(
            value_code,
            payload.label.map(|l| l.trim().to_string()),
            payload.sort_order,
        );
        let value = self.values.update(updated).await?;
        tracing::info!(attribute_value_id = id, "attribute value updated");

        audit::record(
            self.audit.as_ref(),
            "attribute_value_update",
            "attribute_values",
            json!({ "attribute_value_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute value updated",
            value,
            Some(Meta::empty()),
        ))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<AttributeValue>> {
        let existing = self.get(id).await?;
        self.values.delete(id).await?;
        tracing::info!(attribute_value_id = id, "attribute value deleted");

        audit::record(
            self.audit.as_ref(),
            "attribute_value_delete",
            "attribute_values",
            json!({ "attribute_value_id": id, "attribute_id": existing.attribute_id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Attribute value deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<AttributeValue> {
        self.values
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attribute value with ID {id} not found")))
    }

    async fn ensure_attribute(&self, attribute_id: i64) -> AppResult<()> {
        match self.attributes.find_by_id(attribute_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "Attribute with ID {attribute_id} not found"
            ))),
        }
    }
}
