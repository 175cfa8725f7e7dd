//! Final bills and bulk payment

mod common;

use common::*;
use order_server::core::Config;
use order_server::db::{BackendSchema, SchemaContract};
use order_server::orders::{OrderStatus, PaymentStatus};
use order_server::utils::AppError;
use order_server::ErrorCode;
use shared::message::Resource;
use shared::order::PaymentMethod;

fn code<T: std::fmt::Debug, E: Into<AppError>>(result: Result<T, E>) -> ErrorCode {
    let err: AppError = result.unwrap_err().into();
    err.code
}

#[tokio::test]
async fn test_generate_bill_aggregates_session_orders() {
    let env = setup().await;
    let session = customer(1, PHONE);

    let first = place(&env, &session, &[("m-dosa", 2), ("m-chai", 1)]).await;
    let second = place(&env, &session, &[("m-chai", 2)]).await;
    let cancelled = place(&env, &session, &[("m-paneer", 1)]).await;
    env.state
        .orders
        .cancel_order(&session, &cancelled.id)
        .await
        .unwrap();
    // Same table, different guest
    place(&env, &customer(1, "9000000000"), &[("m-lassi", 1)]).await;

    let bill = env
        .state
        .billing
        .generate_final_bill(&admin(), 1, "98765 43210")
        .await
        .unwrap();

    assert_eq!(bill.customer_phone, PHONE);
    assert_eq!(bill.customer_name, "Kavya");
    assert_eq!(bill.order_ids, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(bill.items.len(), 2);
    assert_eq!(bill.items[0].name, "Masala Dosa");
    assert_eq!(bill.items[0].quantity, 2);
    assert_eq!(bill.items[0].line_total, 240.0);
    assert_eq!(bill.items[1].name, "Masala Chai");
    assert_eq!(bill.items[1].quantity, 3);
    assert_eq!(bill.items[1].line_total, 90.0);
    assert_eq!(bill.total_amount, 330.0);
    assert!(!bill.is_paid);

    // Regenerating picks up the new order and keeps the bill id
    place(&env, &session, &[("m-lassi", 1)]).await;
    let again = env
        .state
        .billing
        .generate_final_bill(&admin(), 1, PHONE)
        .await
        .unwrap();
    assert_eq!(again.id, bill.id);
    assert_eq!(again.order_ids.len(), 3);
    assert_eq!(again.total_amount, 410.0);

    let unpaid = env.state.billing.list(&admin(), Some(false)).await.unwrap();
    assert_eq!(unpaid.len(), 1);
}

#[tokio::test]
async fn test_pay_bill_closes_the_session() {
    let env = setup().await;
    let session = customer(2, PHONE);

    let order = place(&env, &session, &[("m-paneer", 2)]).await;
    let bill = env
        .state
        .billing
        .generate_final_bill(&admin(), 2, PHONE)
        .await
        .unwrap();
    assert_eq!(bill.total_amount, 501.0);

    let paid = env
        .state
        .billing
        .pay_final_bill(&admin(), &bill.id, "Credit Card")
        .await
        .unwrap();
    assert!(paid.bill.is_paid);
    assert!(paid.bill.paid_at.is_some());
    assert_eq!(paid.bill.payment_method, Some(PaymentMethod::Card));
    assert_eq!(paid.payment.order_ids, vec![order.id.clone()]);
    assert!(paid.payment.method_recorded);

    let order = env.state.orders.get(&admin(), &order.id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.payment_method, Some(PaymentMethod::Card));
    assert_eq!(order.status, OrderStatus::Pending);

    assert_eq!(
        code(env.state.billing.pay_final_bill(&admin(), &bill.id, "cash").await),
        ErrorCode::BillAlreadyPaid
    );
    assert_eq!(
        code(env.state.billing.generate_final_bill(&admin(), 2, PHONE).await),
        ErrorCode::BillEmpty
    );

    // The next visit starts a fresh bill
    let next = place(&env, &session, &[("m-chai", 1)]).await;
    let draft = env
        .state
        .billing
        .preview(&admin(), 2, PHONE)
        .await
        .unwrap();
    assert_eq!(draft.order_ids, vec![next.id]);
    assert_eq!(draft.total_amount, 30.0);
}

#[tokio::test]
async fn test_rejected_order_makes_bill_stale() {
    let env = setup().await;
    let session = customer(1, PHONE);

    let kept = place(&env, &session, &[("m-dosa", 1)]).await;
    let rejected = place(&env, &session, &[("m-paneer", 1)]).await;
    let bill = env
        .state
        .billing
        .generate_final_bill(&admin(), 1, PHONE)
        .await
        .unwrap();
    assert_eq!(bill.total_amount, 370.5);

    env.state
        .orders
        .reject_order(&admin(), &rejected.id, None)
        .await
        .unwrap();
    assert_eq!(
        code(env.state.billing.pay_final_bill(&admin(), &bill.id, "cash").await),
        ErrorCode::BillStale
    );
    let unpaid = env.state.billing.get(&admin(), &bill.id).await.unwrap();
    assert!(!unpaid.is_paid);
    let order = env.state.orders.get(&admin(), &kept.id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);

    let fresh = env
        .state
        .billing
        .generate_final_bill(&admin(), 1, PHONE)
        .await
        .unwrap();
    assert_eq!(fresh.id, bill.id);
    assert_eq!(fresh.order_ids, vec![kept.id.clone()]);
    assert_eq!(fresh.total_amount, 120.0);

    let paid = env
        .state
        .billing
        .pay_final_bill(&admin(), &fresh.id, "cash")
        .await
        .unwrap();
    assert_eq!(paid.payment.order_ids, vec![kept.id.clone()]);

    let rejected = env.state.orders.get(&admin(), &rejected.id).await.unwrap();
    assert_eq!(rejected.status, OrderStatus::Cancelled);
    assert_eq!(rejected.payment_status, PaymentStatus::Unpaid);
}

#[tokio::test]
async fn test_item_removed_after_generation_makes_bill_stale() {
    let env = setup().await;
    let session = customer(2, PHONE);

    place(&env, &session, &[("m-dosa", 1)]).await;
    let mixed = place(&env, &session, &[("m-paneer", 1), ("m-chai", 1)]).await;
    let bill = env
        .state
        .billing
        .generate_final_bill(&admin(), 2, PHONE)
        .await
        .unwrap();
    assert_eq!(bill.total_amount, 400.5);

    env.state
        .menu
        .set_availability(&admin(), "m-paneer", false)
        .await
        .unwrap();
    assert_eq!(
        code(env.state.billing.pay_final_bill(&admin(), &bill.id, "upi").await),
        ErrorCode::BillStale
    );

    let fresh = env
        .state
        .billing
        .generate_final_bill(&admin(), 2, PHONE)
        .await
        .unwrap();
    assert_eq!(fresh.total_amount, 150.0);
    assert!(fresh.items.iter().all(|l| l.name != "Paneer Tikka"));

    env.state
        .billing
        .pay_final_bill(&admin(), &fresh.id, "upi")
        .await
        .unwrap();
    let mixed = env.state.orders.get(&admin(), &mixed.id).await.unwrap();
    assert_eq!(mixed.payment_status, PaymentStatus::Paid);
    assert_eq!(mixed.total_amount, 30.0);
}

#[tokio::test]
async fn test_bill_with_every_order_cancelled_is_stale() {
    let env = setup().await;
    let session = customer(1, PHONE);

    let order = place(&env, &session, &[("m-lassi", 1)]).await;
    let bill = env
        .state
        .billing
        .generate_final_bill(&admin(), 1, PHONE)
        .await
        .unwrap();
    env.state
        .orders
        .cancel_order(&session, &order.id)
        .await
        .unwrap();

    assert_eq!(
        code(env.state.billing.pay_final_bill(&admin(), &bill.id, "cash").await),
        ErrorCode::BillStale
    );
    let order = env.state.orders.get(&admin(), &order.id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
}

#[tokio::test]
async fn test_billing_requires_admin() {
    let env = setup().await;
    place(&env, &customer(1, PHONE), &[("m-dosa", 1)]).await;

    assert_eq!(
        code(env.state.billing.generate_final_bill(&kitchen(), 1, PHONE).await),
        ErrorCode::AdminRequired
    );
    assert_eq!(
        code(env.state.billing.preview(&kitchen(), 1, PHONE).await),
        ErrorCode::AdminRequired
    );
}

#[tokio::test]
async fn test_mark_orders_paid_skips_already_paid() {
    let env = setup().await;
    let session = customer(1, PHONE);
    let a = place(&env, &session, &[("m-dosa", 1)]).await;
    let b = place(&env, &session, &[("m-chai", 1)]).await;

    let first = env
        .state
        .billing
        .mark_orders_paid(&admin(), &[a.id.clone()], "UPI")
        .await
        .unwrap();
    assert_eq!(first.order_ids, vec![a.id.clone()]);
    assert_eq!(first.method, PaymentMethod::Upi);

    let second = env
        .state
        .billing
        .mark_orders_paid(&admin(), &[a.id.clone(), b.id.clone(), a.id.clone()], "cash")
        .await
        .unwrap();
    assert_eq!(second.order_ids, vec![b.id.clone()]);
    assert_eq!(second.already_paid, vec![a.id.clone()]);

    // The earlier payment method is kept
    let a = env.state.orders.get(&admin(), &a.id).await.unwrap();
    assert_eq!(a.payment_method, Some(PaymentMethod::Upi));
}

#[tokio::test]
async fn test_mark_orders_paid_rejects_bad_input_before_writing() {
    let env = setup().await;
    let order = place(&env, &customer(1, PHONE), &[("m-dosa", 1)]).await;
    let billing = &env.state.billing;

    assert_eq!(
        code(billing.mark_orders_paid(&admin(), &[], "cash").await),
        ErrorCode::ValidationFailed
    );
    assert_eq!(
        code(billing.mark_orders_paid(&admin(), &[order.id.clone()], "barter").await),
        ErrorCode::PaymentInvalidMethod
    );
    assert_eq!(
        code(
            billing
                .mark_orders_paid(&admin(), &[order.id.clone(), "o-missing".into()], "cash")
                .await
        ),
        ErrorCode::OrderNotFound
    );

    let order = env.state.orders.get(&admin(), &order.id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
}

#[tokio::test]
async fn test_mark_orders_paid_refuses_cancelled_orders() {
    let env = setup().await;
    let session = customer(1, PHONE);
    let open = place(&env, &session, &[("m-dosa", 1)]).await;
    let cancelled = place(&env, &session, &[("m-chai", 1)]).await;
    env.state
        .orders
        .cancel_order(&session, &cancelled.id)
        .await
        .unwrap();

    let err: AppError = env
        .state
        .billing
        .mark_orders_paid(&admin(), &[open.id.clone(), cancelled.id.clone()], "cash")
        .await
        .unwrap_err()
        .into();
    assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

    for id in [&open.id, &cancelled.id] {
        let order = env.state.orders.get(&admin(), id).await.unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    }
}

#[tokio::test]
async fn test_unsupported_method_downgrades_to_default() {
    let schema = BackendSchema::from_contract(&SchemaContract::current()).with_enum(
        Resource::Order,
        "payment_method",
        &["cash", "card"],
    );
    let mut config = Config::with_overrides("/tmp/order-server-test", 0);
    config.default_payment_method = PaymentMethod::Cash;
    let env = setup_with_schema(schema, config).await;

    let order = place(&env, &customer(1, PHONE), &[("m-dosa", 1)]).await;
    let outcome = env
        .state
        .billing
        .mark_orders_paid(&admin(), &[order.id.clone()], "gpay")
        .await
        .unwrap();

    assert_eq!(outcome.method, PaymentMethod::Cash);
    assert_eq!(outcome.downgraded_from, Some(PaymentMethod::Upi));
    assert!(outcome.method_recorded);

    let order = env.state.orders.get(&admin(), &order.id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.payment_method, Some(PaymentMethod::Cash));
}
