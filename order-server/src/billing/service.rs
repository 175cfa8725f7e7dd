//! BillingService - final bills and payments
//!
//! # Flow
//!
//! ```text
//! preview(table, phone)          ──▶ BillDraft (nothing persisted)
//! generate_final_bill(table, phone) ──▶ FinalBill (replaces an open bill of the pair)
//! pay_final_bill(bill_id, method)   ──▶ orders PAID in bulk ──▶ bill PAID
//! ```
//!
//! A bill is a snapshot. Before paying, the draft is rebuilt from the current
//! orders; if an order was cancelled or lost items since generation the bill
//! is refused as stale and must be regenerated.

use serde::{Deserialize, Serialize};
use shared::models::FinalBill;
use std::collections::HashSet;
use shared::order::PaymentMethod;
use shared::session::StaffSession;
use shared::util::{new_id, normalize_phone, now_millis};

use super::aggregate::{BillDraft, build_draft};
use super::error::{BillingError, BillingResult};
use super::payment::{PaymentOutcome, mark_orders_paid};
use crate::db::DbService;
use crate::db::repository::{FinalBillRepository, OrderRepository};
use crate::orders::money::money_eq;

/// A paid bill together with what happened to its orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidBill {
    pub bill: FinalBill,
    pub payment: PaymentOutcome,
}

#[derive(Debug, Clone)]
pub struct BillingService {
    db: DbService,
    orders: OrderRepository,
    bills: FinalBillRepository,
    default_method: PaymentMethod,
}

impl BillingService {
    pub fn new(db: DbService, default_method: PaymentMethod) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            bills: FinalBillRepository::new(db.clone()),
            db,
            default_method,
        }
    }

    /// Aggregate the open orders of a table+phone pair without persisting
    pub async fn preview(
        &self,
        staff: &StaffSession,
        table_number: i32,
        phone: &str,
    ) -> BillingResult<BillDraft> {
        staff.require_admin()?;
        self.draft(&staff.workspace_id, table_number, phone).await
    }

    /// Persist the current bill of a table+phone pair
    ///
    /// An existing unpaid bill for the pair is overwritten in place.
    pub async fn generate_final_bill(
        &self,
        staff: &StaffSession,
        table_number: i32,
        phone: &str,
    ) -> BillingResult<FinalBill> {
        staff.require_admin()?;
        let draft = self.draft(&staff.workspace_id, table_number, phone).await?;
        let existing = self
            .bills
            .find_unpaid_for(&staff.workspace_id, table_number, &draft.customer_phone)
            .await?;

        let bill = FinalBill {
            id: existing.as_ref().map(|b| b.id.clone()).unwrap_or_else(new_id),
            workspace_id: staff.workspace_id.clone(),
            table_number: draft.table_number,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            order_ids: draft.order_ids,
            items: draft.items,
            total_amount: draft.total_amount,
            is_paid: false,
            paid_at: None,
            payment_method: None,
            created_at: now_millis(),
        };

        let saved = match existing {
            Some(_) => self.bills.replace(&bill).await?,
            None => self.bills.create(&bill).await?,
        };
        tracing::info!(
            workspace_id = %saved.workspace_id,
            bill_id = %saved.id,
            table_number = saved.table_number,
            orders = saved.order_ids.len(),
            total = saved.total_amount,
            "Final bill generated"
        );
        Ok(saved)
    }

    /// Mark a bill and all of its orders paid
    pub async fn pay_final_bill(
        &self,
        staff: &StaffSession,
        bill_id: &str,
        method: &str,
    ) -> BillingResult<PaidBill> {
        staff.require_admin()?;
        let bill = self.load(&staff.workspace_id, bill_id).await?;
        if bill.is_paid {
            return Err(BillingError::BillAlreadyPaid(bill.id));
        }
        self.ensure_current(&bill).await?;

        let payment = mark_orders_paid(
            &self.orders,
            self.db.caps(),
            self.default_method,
            &staff.workspace_id,
            &bill.order_ids,
            method,
        )
        .await?;

        let bill = self
            .bills
            .mark_paid(
                &staff.workspace_id,
                &bill.id,
                payment.method_recorded.then_some(payment.method),
                now_millis(),
            )
            .await?;
        tracing::info!(
            bill_id = %bill.id,
            total = bill.total_amount,
            method = %payment.method,
            downgraded_from = ?payment.downgraded_from,
            "Final bill paid"
        );
        Ok(PaidBill { bill, payment })
    }

    /// Bulk payment of arbitrary orders
    pub async fn mark_orders_paid(
        &self,
        staff: &StaffSession,
        order_ids: &[String],
        method: &str,
    ) -> BillingResult<PaymentOutcome> {
        staff.require_admin()?;
        mark_orders_paid(
            &self.orders,
            self.db.caps(),
            self.default_method,
            &staff.workspace_id,
            order_ids,
            method,
        )
        .await
    }

    pub async fn get(&self, staff: &StaffSession, bill_id: &str) -> BillingResult<FinalBill> {
        staff.require_admin()?;
        self.load(&staff.workspace_id, bill_id).await
    }

    /// Bills of the workspace, newest first
    pub async fn list(&self, staff: &StaffSession, is_paid: Option<bool>) -> BillingResult<Vec<FinalBill>> {
        staff.require_admin()?;
        Ok(self.bills.list(&staff.workspace_id, is_paid).await?)
    }

    async fn draft(&self, workspace_id: &str, table_number: i32, phone: &str) -> BillingResult<BillDraft> {
        let phone = normalize_phone(phone);
        let orders = self
            .orders
            .find_for_customer(workspace_id, table_number, &phone)
            .await?;
        build_draft(table_number, &phone, &orders).ok_or(BillingError::BillEmpty { table_number })
    }

    /// Refuse a bill whose orders or total drifted since it was generated
    async fn ensure_current(&self, bill: &FinalBill) -> BillingResult<()> {
        let current = match self
            .draft(&bill.workspace_id, bill.table_number, &bill.customer_phone)
            .await
        {
            Ok(draft) => Some(draft),
            Err(BillingError::BillEmpty { .. }) => None,
            Err(e) => return Err(e),
        };

        let matches = current.as_ref().is_some_and(|draft| {
            same_ids(&draft.order_ids, &bill.order_ids)
                && money_eq(draft.total_amount, bill.total_amount)
        });
        if !matches {
            tracing::warn!(
                bill_id = %bill.id,
                table_number = bill.table_number,
                bill_total = bill.total_amount,
                current_total = ?current.as_ref().map(|d| d.total_amount),
                "Final bill is stale, refusing payment"
            );
            return Err(BillingError::BillStale {
                bill_id: bill.id.clone(),
            });
        }
        Ok(())
    }

    async fn load(&self, workspace_id: &str, bill_id: &str) -> BillingResult<FinalBill> {
        self.bills
            .find_by_id(workspace_id, bill_id)
            .await?
            .ok_or_else(|| BillingError::BillNotFound(bill_id.to_string()))
    }
}

fn same_ids(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
}
