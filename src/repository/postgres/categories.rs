use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func, extension::postgres::PgExpr},
};

use super::{PgStore, to_db_time, to_utc, update_error};
use crate::{
    entity::{Categories, categories},
    error::AppResult,
    models::Category,
    repository::CategoryRepository,
};

fn category_from_entity(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        parent_id: model.parent_id,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    }
}

fn category_active(category: Category) -> categories::ActiveModel {
    categories::ActiveModel {
        id: if category.id == 0 { NotSet } else { Set(category.id) },
        name: Set(category.name),
        parent_id: Set(category.parent_id),
        created_at: Set(to_db_time(category.created_at)),
        updated_at: Set(to_db_time(category.updated_at)),
    }
}

/// Parent links are `ON DELETE SET NULL` and product links cascade, so
/// deletion needs no extra statements here.
#[async_trait]
impl CategoryRepository for PgStore {
    async fn find_all(&self, search: Option<&str>) -> AppResult<Vec<Category>> {
        let mut finder = Categories::find()
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id);
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            finder = finder.filter(Expr::col(categories::Column::Name).ilike(format!("%{search}%")));
        }
        let models = finder.all(&self.orm).await?;
        Ok(models.into_iter().map(category_from_entity).collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        let model = Categories::find_by_id(id).one(&self.orm).await?;
        Ok(model.map(category_from_entity))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = Categories::find()
            .filter(categories::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(categories::Column::Id)
            .all(&self.orm)
            .await?;
        Ok(models.into_iter().map(category_from_entity).collect())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let model = Categories::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(categories::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.orm)
            .await?;
        Ok(model.map(category_from_entity))
    }

    async fn create(&self, category: Category) -> AppResult<Category> {
        let model = category_active(category).insert(&self.orm).await?;
        Ok(category_from_entity(model))
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let id = category.id;
        let model = category_active(category)
            .update(&self.orm)
            .await
            .map_err(|err| update_error(err, "Category", id))?;
        Ok(category_from_entity(model))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = Categories::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}
