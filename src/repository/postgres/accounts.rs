use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use super::{PgStore, parse_column, to_db_time, to_utc, update_error};
use crate::{
    entity::{Roles, Stores, UserRoles, Users, roles, stores, user_roles, users},
    error::{AppError, AppResult},
    models::{Role, Store, StoreStatus, User, UserProfile},
    repository::{AuditEntry, AuditRepository, RoleRepository, StoreRepository, UserRepository},
};

fn store_from_entity(model: stores::Model) -> AppResult<Store> {
    Ok(Store {
        id: model.id,
        status: parse_column(&model.status, "status")?,
        user_id: model.user_id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        logo_url: model.logo_url,
        banner_url: model.banner_url,
        commission_rate: model.commission_rate,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}

fn store_active(store: Store) -> stores::ActiveModel {
    stores::ActiveModel {
        id: if store.id == 0 { NotSet } else { Set(store.id) },
        user_id: Set(store.user_id),
        name: Set(store.name),
        slug: Set(store.slug),
        description: Set(store.description),
        logo_url: Set(store.logo_url),
        banner_url: Set(store.banner_url),
        status: Set(store.status.to_string()),
        commission_rate: Set(store.commission_rate),
        created_at: Set(to_db_time(store.created_at)),
        updated_at: Set(to_db_time(store.updated_at)),
    }
}

fn stores_from_entities(models: Vec<stores::Model>) -> AppResult<Vec<Store>> {
    models.into_iter().map(store_from_entity).collect()
}

#[async_trait]
impl StoreRepository for PgStore {
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Store>> {
        let models = Stores::find()
            .order_by_desc(stores::Column::CreatedAt)
            .order_by_desc(stores::Column::Id)
            .limit(limit.max(0) as u64)
            .offset(offset.max(0) as u64)
            .all(&self.orm)
            .await?;
        stores_from_entities(models)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Store>> {
        Stores::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(store_from_entity)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Store>> {
        Stores::find()
            .filter(stores::Column::Slug.eq(slug))
            .one(&self.orm)
            .await?
            .map(store_from_entity)
            .transpose()
    }

    async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<Store>> {
        let models = Stores::find()
            .filter(stores::Column::UserId.eq(user_id))
            .all(&self.orm)
            .await?;
        stores_from_entities(models)
    }

    async fn find_by_status(&self, status: StoreStatus) -> AppResult<Vec<Store>> {
        let models = Stores::find()
            .filter(stores::Column::Status.eq(status.to_string()))
            .order_by_asc(stores::Column::CreatedAt)
            .all(&self.orm)
            .await?;
        stores_from_entities(models)
    }

    async fn count_by_status(&self) -> AppResult<Vec<(StoreStatus, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM stores GROUP BY status")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter()
            .map(|(status, count)| Ok((parse_column(&status, "status")?, count)))
            .collect()
    }

    async fn create(&self, store: Store) -> AppResult<Store> {
        let model = store_active(store).insert(&self.orm).await?;
        store_from_entity(model)
    }

    async fn update(&self, store: Store) -> AppResult<Store> {
        let id = store.id;
        let model = store_active(store)
            .update(&self.orm)
            .await
            .map_err(|err| update_error(err, "Store", id))?;
        store_from_entity(model)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = Stores::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_entity(model: users::Model, roles: Vec<i64>) -> User {
    User {
        id: model.id,
        email: model.email,
        roles,
        password_hash: model.password_hash,
        must_change_password: model.must_change_password,
        profile: UserProfile {
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            picture_url: model.picture_url,
        },
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    }
}

fn user_active(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: if user.id == 0 { NotSet } else { Set(user.id) },
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        must_change_password: Set(user.must_change_password),
        first_name: Set(user.profile.first_name.clone()),
        last_name: Set(user.profile.last_name.clone()),
        date_of_birth: Set(user.profile.date_of_birth),
        picture_url: Set(user.profile.picture_url.clone()),
        created_at: Set(to_db_time(user.created_at)),
        updated_at: Set(to_db_time(user.updated_at)),
    }
}

async fn replace_user_roles<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    role_ids: &[i64],
) -> AppResult<()> {
    UserRoles::delete_many()
        .filter(user_roles::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    if role_ids.is_empty() {
        return Ok(());
    }
    let rows = role_ids.iter().map(|role_id| user_roles::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(*role_id),
    });
    UserRoles::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

impl PgStore {
    async fn with_roles(&self, models: Vec<users::Model>) -> AppResult<Vec<User>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut roles: HashMap<i64, Vec<i64>> = HashMap::new();
        if !ids.is_empty() {
            let rows = UserRoles::find()
                .filter(user_roles::Column::UserId.is_in(ids))
                .order_by_asc(user_roles::Column::RoleId)
                .all(&self.orm)
                .await?;
            for row in rows {
                roles.entry(row.user_id).or_default().push(row.role_id);
            }
        }
        Ok(models
            .into_iter()
            .map(|model| {
                let user_roles = roles.remove(&model.id).unwrap_or_default();
                user_from_entity(model, user_roles)
            })
            .collect())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<User>> {
        let mut finder = Users::find().order_by_asc(users::Column::Id);
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            finder = finder.filter(
                Condition::any()
                    .add(Expr::col(users::Column::Email).ilike(pattern.clone()))
                    .add(Expr::col(users::Column::FirstName).ilike(pattern.clone()))
                    .add(Expr::col(users::Column::LastName).ilike(pattern)),
            );
        }
        let models = finder.all(&self.orm).await?;
        self.with_roles(models).await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let Some(model) = Users::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };
        Ok(self.with_roles(vec![model]).await?.pop())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(model) = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.orm)
            .await?
        else {
            return Ok(None);
        };
        Ok(self.with_roles(vec![model]).await?.pop())
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let txn = self.orm.begin().await?;
        let model = user_active(&user).insert(&txn).await?;
        replace_user_roles(&txn, model.id, &user.roles).await?;
        txn.commit().await?;
        Ok(user_from_entity(model, user.roles))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let txn = self.orm.begin().await?;
        let model = user_active(&user)
            .update(&txn)
            .await
            .map_err(|err| update_error(err, "User", user.id))?;
        replace_user_roles(&txn, model.id, &user.roles).await?;
        txn.commit().await?;
        Ok(user_from_entity(model, user.roles))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = Users::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn role_from_entity(model: roles::Model) -> AppResult<Role> {
    let permissions: Vec<String> = serde_json::from_value(model.permissions)
        .map_err(|err| AppError::Internal(anyhow::anyhow!("invalid role permissions: {err}")))?;
    Ok(Role {
        id: model.id,
        name: model.name,
        permissions,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}

fn role_active(role: Role) -> roles::ActiveModel {
    roles::ActiveModel {
        id: if role.id == 0 { NotSet } else { Set(role.id) },
        name: Set(role.name),
        permissions: Set(serde_json::json!(role.permissions)),
        created_at: Set(to_db_time(role.created_at)),
        updated_at: Set(to_db_time(role.updated_at)),
    }
}

#[async_trait]
impl RoleRepository for PgStore {
    async fn list(&self) -> AppResult<Vec<Role>> {
        Roles::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(role_from_entity)
            .collect()
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Roles::find()
            .filter(roles::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(roles::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(role_from_entity)
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        Roles::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(role_from_entity)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Roles::find()
            .filter(roles::Column::Name.eq(name))
            .one(&self.orm)
            .await?
            .map(role_from_entity)
            .transpose()
    }

    async fn create(&self, role: Role) -> AppResult<Role> {
        let model = role_active(role).insert(&self.orm).await?;
        role_from_entity(model)
    }

    async fn update(&self, role: Role) -> AppResult<Role> {
        let id = role.id;
        let model = role_active(role)
            .update(&self.orm)
            .await
            .map_err(|err| update_error(err, "Role", id))?;
        role_from_entity(model)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = Roles::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl AuditRepository for PgStore {
    async fn record(&self, entry: AuditEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, action, resource, metadata)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.action)
        .bind(entry.resource)
        .bind(entry.metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
