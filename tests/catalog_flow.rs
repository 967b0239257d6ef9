use std::collections::BTreeMap;

use catalog_admin_api::{
    config::AppConfig,
    dto::{
        attributes::{
            AssignAttributeQuery, CreateAttributeRequest, CreateAttributeSetRequest,
            CreateAttributeValueRequest, CreateProductAttributeValueRequest,
            FilterProductsRequest, MultiFacetRequest, ProductsByValuesRequest,
            UpdateAttributeRequest, UpdateAttributeSetRequest,
        },
        categories::{CreateCategoryRequest, UpdateCategoryRequest},
        products::{
            CreateProductRequest, CreateVariantRequest, ProductAttributeInput,
            UpdateProductRequest, VariantAttributeInput,
        },
    },
    error::AppError,
    models::{
        Attribute, AttributeFilter, AttributeSet, AttributeValue, Category, DataType, InputType,
        Product,
    },
    repository::{
        AttributeSetAssignmentRepository, AttributeSetRepository, InMemoryStore, Repositories,
    },
    response::ApiResponse,
    state::AppState,
};

fn setup() -> (Repositories, AppState) {
    let repos = Repositories::new(InMemoryStore::new());
    let state = AppState::new(repos.clone(), &AppConfig::default());
    (repos, state)
}

fn data<T: serde::Serialize>(resp: ApiResponse<T>) -> T {
    resp.into_data().expect("response data")
}

async fn attribute(state: &AppState, code: &str, input_type: InputType) -> Attribute {
    let req = CreateAttributeRequest {
        code: code.into(),
        name: code.to_uppercase(),
        input_type,
        data_type: DataType::String,
        unit: None,
    };
    data(state.attributes.create(req).await.unwrap())
}

async fn value(state: &AppState, attribute_id: i64, code: &str) -> AttributeValue {
    let req = CreateAttributeValueRequest {
        attribute_id,
        value_code: code.into(),
        label: code.to_uppercase(),
        sort_order: None,
    };
    data(state.attribute_values.create(req).await.unwrap())
}

async fn category(state: &AppState, name: &str, parent_id: Option<i64>) -> Category {
    let req = CreateCategoryRequest {
        name: Some(name.into()),
        parent_id,
    };
    data(state.categories.create(req).await.unwrap())
}

fn field_code(err: &AppError, field: &str) -> Option<String> {
    match err {
        AppError::Validation(fields) => fields.get(field).map(|f| f.code.clone()),
        _ => None,
    }
}

fn product_request(sku: &str) -> CreateProductRequest {
    CreateProductRequest {
        sku: sku.into(),
        name: format!("Product {sku}"),
        description: None,
        price: 19.99,
        currency: "usd".into(),
        status: None,
        product_type: None,
        metadata: None,
        categories: vec![],
        attribute_values: None,
    }
}

async fn product(state: &AppState, sku: &str) -> Product {
    data(state.products.create(product_request(sku)).await.unwrap())
}

async fn tag(state: &AppState, product_id: i64, attribute_id: i64, value_id: i64) {
    let req = CreateProductAttributeValueRequest {
        product_id,
        attribute_id,
        attribute_value_id: Some(value_id),
        value_text: None,
        value_number: None,
        value_boolean: None,
    };
    state.product_attribute_values.create(req).await.unwrap();
}

#[tokio::test]
async fn duplicate_attribute_code_conflicts_and_keeps_original() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;

    let err = state
        .attributes
        .create(CreateAttributeRequest {
            code: "color".into(),
            name: "Colour".into(),
            input_type: InputType::Text,
            data_type: DataType::String,
            unit: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("color")));

    let stored = data(state.attributes.find_by_code("color").await.unwrap());
    assert_eq!(stored.id, color.id);
    assert_eq!(stored.name, "COLOR");
    assert_eq!(data(state.attributes.find_all().await.unwrap()).items.len(), 1);
}

#[tokio::test]
async fn attribute_update_rechecks_code_only_when_it_changes() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;
    attribute(&state, "size", InputType::Select).await;

    let same = UpdateAttributeRequest {
        code: Some("color".into()),
        unit: Some(Some("cm".into())),
        ..Default::default()
    };
    let updated = data(state.attributes.update(color.id, same).await.unwrap());
    assert_eq!(updated.unit.as_deref(), Some("cm"));

    let clash = UpdateAttributeRequest {
        code: Some("size".into()),
        ..Default::default()
    };
    let err = state.attributes.update(color.id, clash).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = state.attributes.delete(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Attribute with ID 9999 not found"));
}

#[tokio::test]
async fn attribute_set_can_keep_its_name_but_not_take_another() {
    let (_, state) = setup();
    let basic = data(
        state
            .attribute_sets
            .create(CreateAttributeSetRequest {
                name: "Basic".into(),
                description: Some("Starter".into()),
            })
            .await
            .unwrap(),
    );
    state
        .attribute_sets
        .create(CreateAttributeSetRequest {
            name: "Apparel".into(),
            description: None,
        })
        .await
        .unwrap();

    let renamed = state
        .attribute_sets
        .update(
            basic.id,
            UpdateAttributeSetRequest {
                name: Some("Basic".into()),
                description: Some(None),
            },
        )
        .await
        .unwrap();
    let renamed = data(renamed);
    assert_eq!(renamed.name, "Basic");
    assert_eq!(renamed.description, None);

    let err = state
        .attribute_sets
        .update(
            basic.id,
            UpdateAttributeSetRequest {
                name: Some("Apparel".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn assignments_reject_duplicates_and_unknown_removals() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;
    let size = attribute(&state, "size", InputType::Select).await;
    let set = data(
        state
            .attribute_sets
            .create(CreateAttributeSetRequest {
                name: "Apparel".into(),
                description: None,
            })
            .await
            .unwrap(),
    );

    let options = |sort_order| AssignAttributeQuery {
        sort_order: Some(sort_order),
        is_required: Some(true),
    };
    state
        .attribute_sets
        .add_attribute_to_set(set.id, size.id, options(2))
        .await
        .unwrap();
    let first = data(
        state
            .attribute_sets
            .add_attribute_to_set(set.id, color.id, options(1))
            .await
            .unwrap(),
    );
    assert!(first.is_required);

    let err = state
        .attribute_sets
        .add_attribute_to_set(set.id, color.id, options(3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = state
        .attribute_sets
        .add_attribute_to_set(set.id, 9999, options(0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let resolved = data(state.attribute_sets.find_by_id(set.id).await.unwrap());
    let codes: Vec<_> = resolved.attributes.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, ["color", "size"]);

    state
        .attribute_sets
        .remove_attribute_from_set(set.id, color.id)
        .await
        .unwrap();
    let err = state
        .attribute_sets
        .remove_attribute_from_set(set.id, color.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn system_set_survives_delete_and_custom_set_takes_assignments_along() {
    let (repos, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;
    let system = repos
        .attribute_sets
        .create(AttributeSet::create("Default".into(), None, true, 0))
        .await
        .unwrap();
    state
        .attribute_sets
        .add_attribute_to_set(system.id, color.id, AssignAttributeQuery::default())
        .await
        .unwrap();

    let err = state.attribute_sets.delete(system.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Cannot delete system attribute set"));
    let kept = data(state.attribute_sets.find_by_id(system.id).await.unwrap());
    assert_eq!(kept.attribute_count(), 1);

    let custom = data(
        state
            .attribute_sets
            .create(CreateAttributeSetRequest {
                name: "Custom".into(),
                description: None,
            })
            .await
            .unwrap(),
    );
    state
        .attribute_sets
        .add_attribute_to_set(custom.id, color.id, AssignAttributeQuery::default())
        .await
        .unwrap();
    state.attribute_sets.delete(custom.id).await.unwrap();

    let remaining = repos
        .assignments
        .find_by_attribute_set_id(custom.id)
        .await
        .unwrap();
    assert!(remaining.is_empty());
    let sets = data(state.attribute_sets.find_all().await.unwrap());
    assert_eq!(sets.items.len(), 1);
    assert!(sets.items[0].has_attribute(color.id));
}

#[tokio::test]
async fn value_codes_are_unique_per_attribute() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;
    let size = attribute(&state, "size", InputType::Select).await;
    value(&state, color.id, "red").await;
    value(&state, size.id, "red").await;

    let err = state
        .attribute_values
        .create(CreateAttributeValueRequest {
            attribute_id: color.id,
            value_code: "red".into(),
            label: "Red again".into(),
            sort_order: Some(4),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = state.attribute_values.find_by_attribute_id(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn facets_count_distinct_products_per_value() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Multiselect).await;
    let red = value(&state, color.id, "red").await;
    let blue = value(&state, color.id, "blue").await;
    value(&state, color.id, "green").await;
    let p1 = product(&state, "SKU-1").await;
    let p2 = product(&state, "SKU-2").await;

    tag(&state, p1.id, color.id, red.id).await;
    tag(&state, p1.id, color.id, red.id).await;
    tag(&state, p2.id, color.id, red.id).await;
    tag(&state, p2.id, color.id, blue.id).await;

    let facets = data(
        state
            .product_attribute_values
            .get_faceted_search_data(color.id)
            .await
            .unwrap(),
    );
    let counts: Vec<_> = facets
        .items
        .iter()
        .map(|f| (f.label.as_str(), f.product_count))
        .collect();
    assert_eq!(counts, [("RED", 2), ("BLUE", 1)]);

    let multi = data(
        state
            .product_attribute_values
            .get_multi_attribute_faceted_search_data(MultiFacetRequest {
                attribute_ids: vec![color.id, 9999],
            })
            .await
            .unwrap(),
    );
    assert_eq!(multi.items[&color.id].len(), 2);
    assert!(multi.items[&9999].is_empty());

    let empty = data(
        state
            .product_attribute_values
            .get_multi_attribute_faceted_search_data(MultiFacetRequest {
                attribute_ids: vec![],
            })
            .await
            .unwrap(),
    );
    assert!(empty.items.is_empty());
}

#[tokio::test]
async fn filters_intersect_across_attributes() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;
    let size = attribute(&state, "size", InputType::Select).await;
    let red = value(&state, color.id, "red").await;
    let blue = value(&state, color.id, "blue").await;
    let large = value(&state, size.id, "l").await;

    let p1 = product(&state, "SKU-1").await;
    let p2 = product(&state, "SKU-2").await;
    let p3 = product(&state, "SKU-3").await;
    tag(&state, p1.id, color.id, red.id).await;
    tag(&state, p1.id, size.id, large.id).await;
    tag(&state, p2.id, color.id, blue.id).await;
    tag(&state, p2.id, size.id, large.id).await;
    tag(&state, p3.id, color.id, red.id).await;

    let filter = |filters| FilterProductsRequest { filters };
    let matched = data(
        state
            .product_attribute_values
            .filter_products_by_attributes(filter(vec![
                AttributeFilter {
                    attribute_id: color.id,
                    attribute_value_ids: vec![red.id, blue.id],
                },
                AttributeFilter {
                    attribute_id: size.id,
                    attribute_value_ids: vec![large.id],
                },
            ]))
            .await
            .unwrap(),
    );
    assert_eq!(matched.product_ids, vec![p1.id, p2.id]);

    let matched = data(
        state
            .product_attribute_values
            .filter_products_by_attributes(filter(vec![AttributeFilter {
                attribute_id: size.id,
                attribute_value_ids: vec![],
            }]))
            .await
            .unwrap(),
    );
    assert!(matched.product_ids.is_empty());

    let by_values = data(
        state
            .product_attribute_values
            .find_products_by_attribute_values(ProductsByValuesRequest {
                attribute_value_ids: vec![red.id],
            })
            .await
            .unwrap(),
    );
    assert_eq!(by_values.product_ids, vec![p1.id, p3.id]);
}

#[tokio::test]
async fn product_attribute_value_rejects_foreign_value_and_several_typed_values() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;
    let size = attribute(&state, "size", InputType::Select).await;
    let large = value(&state, size.id, "l").await;
    let p1 = product(&state, "SKU-1").await;

    let err = state
        .product_attribute_values
        .create(CreateProductAttributeValueRequest {
            product_id: p1.id,
            attribute_id: color.id,
            attribute_value_id: Some(large.id),
            value_text: None,
            value_number: None,
            value_boolean: None,
        })
        .await
        .unwrap_err();
    match err {
        AppError::Validation(fields) => {
            assert_eq!(fields["attributeValueId"].code, "ATTRIBUTEVALUEID_MISMATCH")
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = state
        .product_attribute_values
        .create(CreateProductAttributeValueRequest {
            product_id: p1.id,
            attribute_id: color.id,
            attribute_value_id: None,
            value_text: Some("red".into()),
            value_number: Some(1.0),
            value_boolean: Some(false),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f.contains_key("value")));

    let err = state
        .product_attribute_values
        .create(CreateProductAttributeValueRequest {
            product_id: 9999,
            attribute_id: color.id,
            attribute_value_id: None,
            value_text: None,
            value_number: None,
            value_boolean: Some(false),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn product_attribute_values_are_replaced_on_update() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Multiselect).await;
    let size = attribute(&state, "size", InputType::Select).await;
    let red = value(&state, color.id, "red").await;
    let blue = value(&state, color.id, "blue").await;
    let small = value(&state, size.id, "s").await;
    let large = value(&state, size.id, "l").await;

    let mut request = product_request("SKU-1");
    request.attribute_values = Some(BTreeMap::from([
        (
            color.id,
            ProductAttributeInput {
                attribute_value_ids: Some(vec![red.id, blue.id]),
                ..Default::default()
            },
        ),
        (
            size.id,
            ProductAttributeInput {
                attribute_value_ids: Some(vec![small.id]),
                ..Default::default()
            },
        ),
    ]));
    let created = data(state.products.create(request).await.unwrap());
    assert_eq!(created.price_cents, 1999);
    assert_eq!(created.currency, "USD");

    let details = data(state.products.find_by_id(created.id).await.unwrap());
    assert_eq!(details.attributes.len(), 3);

    let err = state
        .products
        .update(
            created.id,
            UpdateProductRequest {
                attribute_values: Some(BTreeMap::from([(
                    size.id,
                    ProductAttributeInput {
                        attribute_value_ids: Some(vec![small.id, large.id]),
                        ..Default::default()
                    },
                )])),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f["attributeValues"].code == "ATTRIBUTEVALUES_MULTIPLE"));

    state
        .products
        .update(
            created.id,
            UpdateProductRequest {
                attribute_values: Some(BTreeMap::from([(
                    size.id,
                    ProductAttributeInput {
                        attribute_value_ids: Some(vec![large.id]),
                        ..Default::default()
                    },
                )])),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let details = data(state.products.find_by_id(created.id).await.unwrap());
    let values: Vec<_> = details
        .attributes
        .iter()
        .map(|v| v.attribute_value_id)
        .collect();
    assert_eq!(values, vec![Some(large.id)]);

    state.products.delete(created.id).await.unwrap();
    let left = data(
        state
            .product_attribute_values
            .find_by_product_id(created.id)
            .await
            .unwrap(),
    );
    assert!(left.items.is_empty());
}

#[tokio::test]
async fn variants_link_one_value_per_attribute() {
    let (_, state) = setup();
    let color = attribute(&state, "color", InputType::Select).await;
    let size = attribute(&state, "size", InputType::Select).await;
    let red = value(&state, color.id, "red").await;
    let large = value(&state, size.id, "l").await;
    let parent = product(&state, "SKU-1").await;

    let request = |sku: &str, attributes| CreateVariantRequest {
        product_id: parent.id,
        sku: sku.into(),
        name: "Red large".into(),
        price_cents: 2500,
        currency: None,
        status: None,
        attributes,
    };

    let variant = data(
        state
            .variants
            .create(request(
                "SKU-1-RL",
                vec![
                    VariantAttributeInput {
                        attribute_id: color.id,
                        attribute_value_id: red.id,
                    },
                    VariantAttributeInput {
                        attribute_id: size.id,
                        attribute_value_id: large.id,
                    },
                ],
            ))
            .await
            .unwrap(),
    );
    assert_eq!(variant.currency, "USD");
    assert_eq!(variant.attributes.len(), 2);

    let err = state
        .variants
        .create(request(
            "SKU-1-X",
            vec![VariantAttributeInput {
                attribute_id: color.id,
                attribute_value_id: large.id,
            }],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f["attributes"].code == "ATTRIBUTES_MISMATCH"));

    let err = state
        .variants
        .create(request("SKU-1-RL", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let found = data(state.variants.find_by_sku("SKU-1-RL").await.unwrap());
    assert_eq!(found.id, variant.id);
    let removed = data(state.variants.remove_by_product_id(parent.id).await.unwrap());
    assert_eq!(removed.deleted, 1);
}

#[tokio::test]
async fn category_names_are_required_and_unique_ignoring_case() {
    let (_, state) = setup();
    let shoes = category(&state, "Shoes", None).await;

    let err = state
        .categories
        .create(CreateCategoryRequest {
            name: Some("   ".into()),
            parent_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(field_code(&err, "name").as_deref(), Some("NAME_REQUIRED"));

    let err = state
        .categories
        .create(CreateCategoryRequest {
            name: Some(" shoes ".into()),
            parent_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(field_code(&err, "name").as_deref(), Some("NAME_EXISTS"));

    let boots = category(&state, "Boots", None).await;
    let err = state
        .categories
        .update(
            boots.id,
            UpdateCategoryRequest {
                name: Some("SHOES".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(field_code(&err, "name").as_deref(), Some("NAME_EXISTS"));

    let renamed = data(
        state
            .categories
            .update(
                shoes.id,
                UpdateCategoryRequest {
                    name: Some("shoes".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap(),
    );
    assert_eq!(renamed.name, "shoes");
}

#[tokio::test]
async fn category_parents_must_exist_and_never_form_a_cycle() {
    let (_, state) = setup();
    let err = state
        .categories
        .create(CreateCategoryRequest {
            name: Some("Orphan".into()),
            parent_id: Some(404),
        })
        .await
        .unwrap_err();
    assert_eq!(field_code(&err, "parentId").as_deref(), Some("PARENT_NOT_FOUND"));

    let clothing = category(&state, "Clothing", None).await;
    let shoes = category(&state, "Shoes", Some(clothing.id)).await;
    let boots = category(&state, "Boots", Some(shoes.id)).await;

    let reparent = |parent: Option<i64>| UpdateCategoryRequest {
        name: None,
        parent_id: Some(parent),
    };

    let err = state
        .categories
        .update(clothing.id, reparent(Some(clothing.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f["parentId"].message == "Category cannot be its own parent"));

    let err = state
        .categories
        .update(clothing.id, reparent(Some(boots.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref f) if f["parentId"].message == "Cannot set a descendant as parent"));
    assert_eq!(
        data(state.categories.find_by_id(clothing.id).await.unwrap()).parent_id,
        None
    );

    let moved = data(
        state
            .categories
            .update(boots.id, reparent(Some(clothing.id)))
            .await
            .unwrap(),
    );
    assert_eq!(moved.parent_id, Some(clothing.id));

    let detached = data(state.categories.update(shoes.id, reparent(None)).await.unwrap());
    assert_eq!(detached.parent_id, None);

    let err = state
        .categories
        .update(999, reparent(None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn category_listing_carries_tree_and_hierarchy() {
    let (_, state) = setup();
    let clothing = category(&state, "Clothing", None).await;
    let shoes = category(&state, "Shoes", Some(clothing.id)).await;
    category(&state, "Hats", Some(clothing.id)).await;
    category(&state, "Boots", Some(shoes.id)).await;

    let listing = data(state.categories.list(None).await.unwrap());
    assert_eq!(listing.categories.len(), 4);
    let boots = listing
        .categories
        .iter()
        .find(|c| c.name == "Boots")
        .unwrap();
    assert_eq!(boots.parent_name.as_deref(), Some("Shoes"));
    assert_eq!(listing.tree.len(), 1);
    let labels: Vec<&str> = listing.hierarchy.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Clothing", "-- Hats", "-- Shoes", "---- Boots"]);

    let found = data(state.categories.list(Some("boo")).await.unwrap());
    assert_eq!(found.categories.len(), 1);
    assert_eq!(found.categories[0].parent_name.as_deref(), Some("Shoes"));
    assert_eq!(found.tree[0].depth, 0);
}

#[tokio::test]
async fn products_only_link_known_categories() {
    let (_, state) = setup();
    let shoes = category(&state, "Shoes", None).await;
    let hats = category(&state, "Hats", None).await;

    let mut request = product_request("SKU-CAT");
    request.categories = vec![hats.id, 9999];
    let err = state.products.create(request).await.unwrap_err();
    assert_eq!(field_code(&err, "categories").as_deref(), Some("CATEGORIES_INVALID"));

    let mut request = product_request("SKU-CAT");
    request.categories = vec![hats.id, shoes.id];
    let created = data(state.products.create(request).await.unwrap());
    let mut expected = vec![shoes.id, hats.id];
    expected.sort_unstable();
    assert_eq!(created.categories, expected);

    let err = state
        .products
        .update(
            created.id,
            UpdateProductRequest {
                categories: Some(vec![4242]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(field_code(&err, "categories").as_deref(), Some("CATEGORIES_INVALID"));

    state.categories.remove(hats.id).await.unwrap();
    let details = data(state.products.find_by_id(created.id).await.unwrap());
    assert_eq!(details.product.categories, vec![shoes.id]);
}
