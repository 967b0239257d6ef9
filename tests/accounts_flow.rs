use catalog_admin_api::{
    config::AppConfig,
    dto::{
        stores::{CreateStoreRequest, StoreStatusRequest, UpdateStoreRequest},
        users::{CreateRoleRequest, CreateUserRequest, UpdateRoleRequest, UpdateUserRequest},
    },
    error::AppError,
    models::{StoreStatus, account::ADMINISTRATOR_ROLE},
    password::verify_password,
    repository::{InMemoryStore, Repositories, UserRepository},
    response::ApiResponse,
    routes::params::Pagination,
    state::AppState,
};

fn setup() -> (Repositories, InMemoryStore, AppState) {
    let store = InMemoryStore::new();
    let repos = Repositories::new(store.clone());
    let state = AppState::new(repos.clone(), &AppConfig::default());
    (repos, store, state)
}

fn data<T: serde::Serialize>(resp: ApiResponse<T>) -> T {
    resp.into_data().expect("response data")
}

fn store_request(user_id: i64, name: &str) -> CreateStoreRequest {
    CreateStoreRequest {
        user_id,
        name: name.into(),
        slug: None,
        description: None,
        logo_url: None,
        banner_url: None,
        commission_rate: None,
    }
}

fn ada() -> CreateUserRequest {
    CreateUserRequest {
        email: Some("Ada@Example.com".into()),
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        date_of_birth: Some("1815-12-10".into()),
        picture_url: None,
        roles: None,
    }
}

#[tokio::test]
async fn store_slugs_are_probed_until_free() {
    let (_, _, state) = setup();
    let first = data(state.stores.create_store(store_request(1, "My Shop")).await.unwrap());
    let second = data(state.stores.create_store(store_request(2, "My Shop!")).await.unwrap());
    assert_eq!(first.slug, "my-shop");
    assert_eq!(second.slug, "my-shop-1");
    assert_eq!(first.status, StoreStatus::Pending);
    assert_eq!(first.commission_rate, 10.0);

    let next = data(state.stores.generate_store_slug("my shop").await.unwrap());
    assert_eq!(next.slug, "my-shop-2");
    let fallback = data(state.stores.generate_store_slug("!!!").await.unwrap());
    assert_eq!(fallback.slug, "store");
}

#[tokio::test]
async fn store_creation_rejects_taken_slug_and_second_store_per_user() {
    let (_, _, state) = setup();
    state.stores.create_store(store_request(1, "Corner")).await.unwrap();

    let err = state
        .stores
        .create_store(store_request(1, "Another"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "User already has a store"));

    let mut explicit = store_request(2, "Other");
    explicit.slug = Some("corner".into());
    let err = state.stores.create_store(explicit).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn store_status_follows_transition_table() {
    let (_, store, state) = setup();
    let shop = data(state.stores.create_store(store_request(1, "Shop")).await.unwrap());
    let status = |status| StoreStatusRequest {
        status,
        reason: None,
    };

    let err = state
        .stores
        .approve_store(shop.id, status(StoreStatus::Suspended))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Cannot change store status from pending to suspended"));

    let approved = data(
        state
            .stores
            .approve_store(shop.id, status(StoreStatus::Approved))
            .await
            .unwrap(),
    );
    assert!(approved.can_sell());

    let unchanged = state
        .stores
        .approve_store(shop.id, status(StoreStatus::Approved))
        .await
        .unwrap();
    assert_eq!(unchanged.message, "Store status unchanged");

    let suspended = data(
        state
            .stores
            .approve_store(
                shop.id,
                StoreStatusRequest {
                    status: StoreStatus::Suspended,
                    reason: Some("chargebacks".into()),
                },
            )
            .await
            .unwrap(),
    );
    assert!(suspended.is_suspended());

    let err = state
        .stores
        .approve_store(shop.id, status(StoreStatus::Rejected))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let actions: Vec<_> = store
        .audit_entries()
        .await
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(
        actions,
        ["store_create", "store_status_change", "store_status_change"]
    );
}

#[tokio::test]
async fn store_listings_and_stats_track_status() {
    let (_, _, state) = setup();
    let a = data(state.stores.create_store(store_request(1, "Alpha")).await.unwrap());
    state.stores.create_store(store_request(2, "Beta")).await.unwrap();
    state
        .stores
        .approve_store(
            a.id,
            StoreStatusRequest {
                status: StoreStatus::Approved,
                reason: None,
            },
        )
        .await
        .unwrap();

    let stats = data(state.stores.get_store_stats().await.unwrap());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.approved, 1);

    let page = state
        .stores
        .find_all_stores(Pagination {
            page: Some(1),
            per_page: Some(1),
        })
        .await
        .unwrap();
    let meta = page.meta.clone().expect("meta");
    assert_eq!(meta.total, Some(2));
    assert_eq!(meta.total_pages, Some(2));
    assert_eq!(data(page).items.len(), 1);

    let approved = data(state.stores.find_approved_stores().await.unwrap());
    assert_eq!(approved.items.len(), 1);
    assert_eq!(approved.items[0].id, a.id);
    let pending = data(state.stores.find_pending_stores().await.unwrap());
    assert_eq!(pending.items.len(), 1);
}

#[tokio::test]
async fn store_update_clears_optional_fields() {
    let (_, _, state) = setup();
    let mut request = store_request(1, "Shop");
    request.description = Some("Handmade goods".into());
    let shop = data(state.stores.create_store(request).await.unwrap());

    let updated = data(
        state
            .stores
            .update_store(
                shop.id,
                UpdateStoreRequest {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap(),
    );
    assert_eq!(updated.description, None);
    assert_eq!(updated.slug, "shop");
}

#[tokio::test]
async fn created_user_gets_hashed_default_password() {
    let (repos, _, state) = setup();
    let user = data(state.users.create(ada()).await.unwrap());
    assert_eq!(user.email, "ada@example.com");
    assert!(user.must_change_password);

    let stored = repos.users.find_by_id(user.id).await.unwrap().expect("stored user");
    assert_ne!(stored.password_hash, AppConfig::default().default_user_password);
    assert!(verify_password(
        &AppConfig::default().default_user_password,
        &stored.password_hash
    ));

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password").is_none());
}

#[tokio::test]
async fn user_creation_reports_every_failing_field() {
    let (_, _, state) = setup();
    state.users.create(ada()).await.unwrap();

    let err = state
        .users
        .create(CreateUserRequest {
            email: Some("ADA@example.com".into()),
            first_name: Some("A".into()),
            last_name: None,
            date_of_birth: Some("not-a-date".into()),
            picture_url: None,
            roles: Some(vec![42]),
        })
        .await
        .unwrap_err();
    let AppError::Validation(fields) = err else {
        panic!("expected validation error");
    };
    assert_eq!(fields["email"].code, "EMAIL_EXISTS");
    assert_eq!(fields["roles"].code, "ROLES_INVALID");
    assert!(fields.contains_key("firstName"));
    assert!(fields.contains_key("lastName"));
    assert!(fields.contains_key("dateOfBirth"));
}

#[tokio::test]
async fn partial_user_update_touches_only_given_fields() {
    let (_, _, state) = setup();
    let user = data(state.users.create(ada()).await.unwrap());

    let updated = data(
        state
            .users
            .update(
                user.id,
                UpdateUserRequest {
                    last_name: Some("Byron".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap(),
    );
    assert_eq!(updated.profile.last_name.as_deref(), Some("Byron"));
    assert_eq!(updated.profile.first_name, "Ada");
    assert_eq!(updated.email, user.email);
    assert_eq!(updated.profile.date_of_birth, user.profile.date_of_birth);
    assert!(updated.must_change_password);

    let err = state
        .users
        .update(
            user.id,
            UpdateUserRequest {
                password: Some("123".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f["password"].code == "PASSWORD_MIN"));

    let changed = data(
        state
            .users
            .update(
                user.id,
                UpdateUserRequest {
                    password: Some("s3cret-enough".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap(),
    );
    assert!(!changed.must_change_password);
}

#[tokio::test]
async fn user_may_keep_own_email_on_update() {
    let (_, _, state) = setup();
    let user = data(state.users.create(ada()).await.unwrap());
    let mut other = ada();
    other.email = Some("grace@example.com".into());
    let other = data(state.users.create(other).await.unwrap());

    state
        .users
        .update(
            user.id,
            UpdateUserRequest {
                email: Some("ada@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = state
        .users
        .update(
            other.id,
            UpdateUserRequest {
                email: Some("ada@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f["email"].code == "EMAIL_EXISTS"));
}

#[tokio::test]
async fn system_roles_cannot_be_deleted() {
    let (_, _, state) = setup();
    let admin = data(
        state
            .roles
            .create(CreateRoleRequest {
                name: Some(ADMINISTRATOR_ROLE.into()),
                permissions: vec!["*".into()],
            })
            .await
            .unwrap(),
    );
    let editor = data(
        state
            .roles
            .create(CreateRoleRequest {
                name: Some("Editor".into()),
                permissions: vec![],
            })
            .await
            .unwrap(),
    );

    let err = state.roles.remove(admin.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "System role Administrator cannot be deleted"));
    assert!(state.roles.find_by_id(admin.id).await.is_ok());

    let err = state
        .roles
        .update(
            editor.id,
            UpdateRoleRequest {
                name: Some(ADMINISTRATOR_ROLE.into()),
                permissions: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f["name"].code == "NAME_EXISTS"));

    state.roles.remove(editor.id).await.unwrap();
    let roles = data(state.roles.list().await.unwrap());
    assert_eq!(roles.items.len(), 1);

    let mut request = ada();
    request.roles = Some(vec![admin.id, admin.id]);
    let user = data(state.users.create(request).await.unwrap());
    assert_eq!(user.roles, vec![admin.id]);
}

#[tokio::test]
async fn system_roles_cannot_be_renamed_out_of_protection() {
    let (_, _, state) = setup();
    let admin = data(
        state
            .roles
            .create(CreateRoleRequest {
                name: Some(ADMINISTRATOR_ROLE.into()),
                permissions: vec!["*".into()],
            })
            .await
            .unwrap(),
    );

    let err = state
        .roles
        .update(
            admin.id,
            UpdateRoleRequest {
                name: Some("Admins".into()),
                permissions: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "System role Administrator cannot be renamed"));

    let kept = data(
        state
            .roles
            .update(
                admin.id,
                UpdateRoleRequest {
                    name: Some(ADMINISTRATOR_ROLE.into()),
                    permissions: Some(vec!["catalog:read".into()]),
                },
            )
            .await
            .unwrap(),
    );
    assert_eq!(kept.name, ADMINISTRATOR_ROLE);
    assert_eq!(kept.permissions, vec!["catalog:read".to_string()]);

    assert!(state.roles.remove(admin.id).await.is_err());
    assert!(state.roles.find_by_id(admin.id).await.is_ok());
}
