//! Resource endpoints; every route here requires an access token

pub mod foods;
pub mod invoices;
pub mod menus;
pub mod notes;
pub mod order_items;
pub mod orders;
pub mod tables;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Create the resource router
pub fn create_resource_router() -> Router<AppState> {
    Router::new()
        // Foods
        .route("/foods", get(foods::list_foods))
        .route("/food", post(foods::create_food))
        .route(
            "/food/{food_id}",
            get(foods::get_food)
                .put(foods::update_food)
                .delete(foods::delete_food),
        )
        // Menus
        .route("/menus", get(menus::list_menus))
        .route("/menu", post(menus::create_menu))
        .route("/menu/{menu_id}", get(menus::get_menu).patch(menus::update_menu))
        // Tables
        .route("/tables", get(tables::list_tables))
        .route("/table", post(tables::create_table))
        .route(
            "/table/{table_id}",
            get(tables::get_table).patch(tables::update_table),
        )
        // Orders
        .route("/orders", get(orders::list_orders))
        .route("/order", post(orders::create_order))
        .route(
            "/order/{order_id}",
            get(orders::get_order).patch(orders::update_order),
        )
        // Order items
        .route("/orderitems", get(order_items::list_order_items))
        .route(
            "/orderitems-order/{order_id}",
            get(order_items::list_order_items_by_order),
        )
        .route("/orderitem", post(order_items::create_order_items))
        .route(
            "/orderitem/{order_item_id}",
            get(order_items::get_order_item).patch(order_items::update_order_item),
        )
        // Invoices
        .route("/invoices", get(invoices::list_invoices))
        .route("/invoice", post(invoices::create_invoice))
        .route(
            "/invoice/{invoice_id}",
            get(invoices::get_invoice).patch(invoices::update_invoice),
        )
        // Notes
        .route("/getNotes", get(notes::list_notes))
        .route("/createNote", post(notes::create_note))
        .route("/getNote/{note_id}", get(notes::get_note))
        // Users
        .route("/users", get(users::list_users))
        .route("/user/{user_id}", get(users::get_user))
}
