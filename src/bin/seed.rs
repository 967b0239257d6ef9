use catalog_admin_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    models::account::{ADMINISTRATOR_ROLE, USER_ROLE},
    password::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(config.database_url()?).await?;
    run_migrations(&pool).await?;

    let admin_role = ensure_role(&pool, ADMINISTRATOR_ROLE, &["*"]).await?;
    ensure_role(&pool, USER_ROLE, &[]).await?;
    let admin_id = ensure_admin(&pool, "admin@example.com", admin_role).await?;
    let set_id = ensure_default_set(&pool).await?;
    seed_attributes(&pool, set_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, default attribute set ID: {set_id}");
    Ok(())
}

async fn ensure_role(pool: &DbPool, name: &str, permissions: &[&str]) -> anyhow::Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO roles (name, permissions)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(serde_json::json!(permissions))
    .fetch_one(pool)
    .await?;

    println!("Ensured role {name} (id={id})");
    Ok(id)
}

async fn ensure_admin(pool: &DbPool, email: &str, role_id: i64) -> anyhow::Result<i64> {
    let password_hash = hash_password("admin123")?;

    let (user_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash, must_change_password, first_name)
        VALUES ($1, $2, FALSE, 'Admin')
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .bind(role_id)
        .execute(pool)
        .await?;

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn ensure_default_set(pool: &DbPool) -> anyhow::Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO attribute_sets (name, description, is_system)
        VALUES ('Default', 'Attributes every product carries', TRUE)
        ON CONFLICT (name) DO UPDATE SET is_system = TRUE
        RETURNING id
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_attributes(pool: &DbPool, set_id: i64) -> anyhow::Result<()> {
    let attributes = [
        ("color", "Color", "select", "string", None, &["red", "green", "blue"][..]),
        ("size", "Size", "select", "string", None, &["s", "m", "l", "xl"][..]),
        ("weight", "Weight", "number", "number", Some("kg"), &[][..]),
        ("organic", "Organic", "boolean", "boolean", None, &[][..]),
    ];

    for (position, (code, name, input_type, data_type, unit, values)) in
        attributes.into_iter().enumerate()
    {
        let (attribute_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO attributes (code, name, input_type, data_type, unit)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(input_type)
        .bind(data_type)
        .bind(unit)
        .fetch_one(pool)
        .await?;

        for (sort_order, value_code) in values.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO attribute_values (attribute_id, value_code, label, sort_order)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (attribute_id, value_code) DO NOTHING
                "#,
            )
            .bind(attribute_id)
            .bind(*value_code)
            .bind(value_code.to_uppercase())
            .bind(sort_order as i32)
            .execute(pool)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO attribute_set_assignments (attribute_set_id, attribute_id, sort_order)
            VALUES ($1, $2, $3)
            ON CONFLICT (attribute_set_id, attribute_id) DO NOTHING
            "#,
        )
        .bind(set_id)
        .bind(attribute_id)
        .bind(position as i32)
        .execute(pool)
        .await?;
    }

    println!("Seeded attributes");
    Ok(())
}
