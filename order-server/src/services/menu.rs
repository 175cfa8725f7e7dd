//! Menu Service - menu items and categories
//!
//! Turning an item unavailable reconciles every open order of the workspace,
//! so kitchens and bills never show a dish that can no longer be served.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};
use shared::session::StaffSession;
use shared::util::new_id;

use crate::db::DbService;
use crate::db::repository::{CategoryRepository, MenuItemRepository};
use crate::orders::{OrdersManager, ReconcileSummary};
use crate::utils::validation::{MAX_PATH_LEN, validate_optional_text, validate_payload};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Storage bucket holding menu photos
pub const IMAGE_BUCKET: &str = "menu-images";

/// Menu as shown to a table or to staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuView {
    pub categories: Vec<Category>,
    pub items: Vec<MenuItem>,
}

/// Availability toggle result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityChange {
    pub item: MenuItem,
    pub reconciliation: ReconcileSummary,
}

#[derive(Debug, Clone)]
pub struct MenuService {
    db: DbService,
    items: MenuItemRepository,
    categories: CategoryRepository,
    orders: OrdersManager,
}

impl MenuService {
    pub fn new(db: DbService, orders: OrdersManager) -> Self {
        Self {
            items: MenuItemRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            db,
            orders,
        }
    }

    /// Menu of a workspace
    ///
    /// Customers only see available items in active categories.
    pub async fn menu(&self, workspace_id: &str, include_hidden: bool) -> AppResult<MenuView> {
        let mut categories = self.categories.find_all(workspace_id).await?;
        let mut items = self.items.find_all(workspace_id).await?;
        if !include_hidden {
            categories.retain(|c| c.is_active);
            items.retain(|item| {
                item.is_available
                    && item
                        .category_id
                        .as_ref()
                        .is_none_or(|id| categories.iter().any(|c| &c.id == id))
            });
        }
        Ok(MenuView { categories, items })
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub async fn create_item(&self, staff: &StaffSession, payload: MenuItemCreate) -> AppResult<MenuItem> {
        staff.require_admin()?;
        validate_payload(&payload)?;
        validate_optional_text(&payload.image_path, "image_path", MAX_PATH_LEN)?;
        if let Some(category_id) = &payload.category_id {
            self.require_category(&staff.workspace_id, category_id).await?;
        }

        let item = MenuItem {
            id: new_id(),
            workspace_id: staff.workspace_id.clone(),
            category_id: payload.category_id,
            name: payload.name.trim().to_string(),
            description: payload.description,
            price: payload.price,
            image_url: payload.image_path.as_deref().map(|p| self.image_url(p)),
            is_available: payload.is_available.unwrap_or(true),
            sort_order: payload.sort_order.unwrap_or(0),
        };
        let item = self.items.create(&item).await?;
        tracing::info!(item_id = %item.id, name = %item.name, price = item.price, "Menu item created");
        Ok(item)
    }

    pub async fn update_item(
        &self,
        staff: &StaffSession,
        id: &str,
        payload: MenuItemUpdate,
    ) -> AppResult<MenuItem> {
        staff.require_admin()?;
        validate_payload(&payload)?;
        validate_optional_text(&payload.image_path, "image_path", MAX_PATH_LEN)?;
        self.require_item(&staff.workspace_id, id).await?;
        if let Some(category_id) = &payload.category_id {
            self.require_category(&staff.workspace_id, category_id).await?;
        }

        let mut patch = Map::new();
        if let Some(category_id) = payload.category_id {
            patch.insert("category_id".into(), Value::from(category_id));
        }
        if let Some(name) = payload.name {
            patch.insert("name".into(), Value::from(name.trim()));
        }
        if let Some(description) = payload.description {
            patch.insert("description".into(), Value::from(description));
        }
        if let Some(price) = payload.price {
            patch.insert("price".into(), Value::from(price));
        }
        if let Some(path) = payload.image_path {
            patch.insert("image_url".into(), Value::from(self.image_url(&path)));
        }
        if let Some(sort_order) = payload.sort_order {
            patch.insert("sort_order".into(), Value::from(sort_order));
        }

        Ok(self
            .items
            .update(&staff.workspace_id, id, Value::Object(patch))
            .await?)
    }

    /// Toggle availability; turning an item off reconciles open orders
    pub async fn set_availability(
        &self,
        staff: &StaffSession,
        id: &str,
        is_available: bool,
    ) -> AppResult<AvailabilityChange> {
        staff.require_admin()?;
        self.require_item(&staff.workspace_id, id).await?;
        let item = self
            .items
            .set_availability(&staff.workspace_id, id, is_available)
            .await?;
        tracing::info!(item_id = %item.id, name = %item.name, is_available, "Menu item availability changed");

        let reconciliation = if is_available {
            ReconcileSummary::default()
        } else {
            self.orders.reconcile_workspace(&staff.workspace_id).await?
        };
        Ok(AvailabilityChange {
            item,
            reconciliation,
        })
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn create_category(
        &self,
        staff: &StaffSession,
        payload: CategoryCreate,
    ) -> AppResult<Category> {
        staff.require_admin()?;
        validate_payload(&payload)?;
        let category = Category {
            id: new_id(),
            workspace_id: staff.workspace_id.clone(),
            name: payload.name.trim().to_string(),
            sort_order: payload.sort_order.unwrap_or(0),
            is_active: true,
        };
        Ok(self.categories.create(&category).await?)
    }

    pub async fn update_category(
        &self,
        staff: &StaffSession,
        id: &str,
        payload: CategoryUpdate,
    ) -> AppResult<Category> {
        staff.require_admin()?;
        validate_payload(&payload)?;
        self.require_category(&staff.workspace_id, id).await?;

        let mut patch = Map::new();
        if let Some(name) = payload.name {
            patch.insert("name".into(), Value::from(name.trim()));
        }
        if let Some(sort_order) = payload.sort_order {
            patch.insert("sort_order".into(), Value::from(sort_order));
        }
        if let Some(is_active) = payload.is_active {
            patch.insert("is_active".into(), Value::from(is_active));
        }
        Ok(self
            .categories
            .update(&staff.workspace_id, id, Value::Object(patch))
            .await?)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn image_url(&self, path: &str) -> String {
        self.db
            .store()
            .public_url(IMAGE_BUCKET, path.trim_start_matches('/'))
    }

    async fn require_item(&self, workspace_id: &str, id: &str) -> AppResult<MenuItem> {
        self.items
            .find_by_id(workspace_id, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu_item_id", id))
    }

    async fn require_category(&self, workspace_id: &str, id: &str) -> AppResult<Category> {
        self.categories
            .find_by_id(workspace_id, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id))
    }
}
