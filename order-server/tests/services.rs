//! Menu, table and service request services

mod common;

use common::*;
use order_server::ErrorCode;
use shared::models::{
    CategoryCreate, CategoryUpdate, DiningTableCreate, DiningTableUpdate, MenuItemCreate,
    MenuItemUpdate, ServiceRequestCreate, ServiceRequestKind, ServiceRequestStatus,
};

fn item(name: &str, price: f64, category_id: Option<String>) -> MenuItemCreate {
    MenuItemCreate {
        category_id,
        name: name.to_string(),
        description: None,
        price,
        image_path: None,
        is_available: None,
        sort_order: None,
    }
}

#[tokio::test]
async fn test_menu_items_and_categories() {
    let env = setup().await;
    let menu = &env.state.menu;

    let drinks = menu
        .create_category(&admin(), CategoryCreate { name: " Drinks ".into(), sort_order: Some(2) })
        .await
        .unwrap();
    assert_eq!(drinks.name, "Drinks");

    let mut create = item("Filter Coffee", 40.0, Some(drinks.id.clone()));
    create.image_path = Some("/coffee.jpg".into());
    let coffee = menu.create_item(&admin(), create).await.unwrap();
    assert!(coffee.is_available);
    assert_eq!(coffee.image_url.as_deref(), Some("memory://menu-images/coffee.jpg"));

    let updated = menu
        .update_item(
            &admin(),
            &coffee.id,
            MenuItemUpdate {
                price: Some(45.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 45.0);
    assert_eq!(updated.name, "Filter Coffee");

    let err = menu
        .create_item(&admin(), item("Ghost", 10.0, Some("c-missing".into())))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CategoryNotFound);

    let err = menu.create_item(&admin(), item("", 10.0, None)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    let err = menu.create_item(&kitchen(), item("Vada", 35.0, None)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AdminRequired);

    // Hiding the category hides its items from customers only
    menu.update_category(
        &admin(),
        &drinks.id,
        CategoryUpdate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let customer_view = menu.menu(WS, false).await.unwrap();
    assert!(customer_view.categories.is_empty());
    assert!(customer_view.items.iter().all(|i| i.id != coffee.id));
    let staff_view = menu.menu(WS, true).await.unwrap();
    assert!(staff_view.items.iter().any(|i| i.id == coffee.id));
}

#[tokio::test]
async fn test_tables_are_unique_per_workspace() {
    let env = setup().await;
    let tables = &env.state.tables;

    let err = tables
        .create(
            &admin(),
            DiningTableCreate {
                table_number: 1,
                label: None,
                capacity: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNumberExists);

    let patio = tables
        .create(
            &admin(),
            DiningTableCreate {
                table_number: 7,
                label: Some("Patio".into()),
                capacity: Some(4),
            },
        )
        .await
        .unwrap();
    assert!(patio.is_active);

    let closed = tables
        .update(
            &admin(),
            &patio.id,
            DiningTableUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!closed.is_active);
    assert_eq!(closed.label.as_deref(), Some("Patio"));

    assert_eq!(tables.list(&admin()).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_service_requests_dedupe_and_resolve() {
    let env = setup().await;
    let requests = &env.state.service_requests;
    let session = customer(1, PHONE);

    let water = |note: &str| ServiceRequestCreate {
        kind: ServiceRequestKind::Water,
        note: Some(note.to_string()),
    };

    let first = requests.raise(&session, water("Two glasses")).await.unwrap();
    assert_eq!(first.status, ServiceRequestStatus::Open);
    assert_eq!(first.note.as_deref(), Some("Two glasses"));

    let again = requests.raise(&session, water("Still waiting")).await.unwrap();
    assert_eq!(again.id, first.id);

    let bill = requests
        .raise(
            &session,
            ServiceRequestCreate {
                kind: ServiceRequestKind::RequestBill,
                note: None,
            },
        )
        .await
        .unwrap();
    assert_ne!(bill.id, first.id);
    assert_eq!(requests.list_open(&admin()).await.unwrap().len(), 2);

    let resolved = requests.resolve(&admin(), &first.id).await.unwrap();
    assert_eq!(resolved.status, ServiceRequestStatus::Resolved);
    let resolved_at = resolved.resolved_at;
    assert!(resolved_at.is_some());

    let twice = requests.resolve(&admin(), &first.id).await.unwrap();
    assert_eq!(twice.resolved_at, resolved_at);
    assert_eq!(requests.list_open(&admin()).await.unwrap().len(), 1);

    // A resolved request no longer blocks a new one
    let next = requests.raise(&session, water("More please")).await.unwrap();
    assert_ne!(next.id, first.id);

    let err = requests
        .raise(&customer(42, PHONE), water("Hello"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNotFound);
}
