//! Infrastructure services - resource operations over the document store

mod food_service;
mod invoice_service;
mod menu_service;
mod note_service;
mod order_item_service;
mod order_service;
mod table_service;
mod updates;

pub use food_service::{CreateFoodRequest, FoodService, UpdateFoodRequest};
pub use invoice_service::{CreateInvoiceRequest, InvoiceService, UpdateInvoiceRequest};
pub use menu_service::{CreateMenuRequest, MenuService, UpdateMenuRequest};
pub use note_service::{CreateNoteRequest, NoteService};
pub use order_item_service::{
    CreateOrderItemsRequest, OrderItemInput, OrderItemService, OrderItemsCreated,
    UpdateOrderItemRequest,
};
pub use order_service::{CreateOrderRequest, OrderService, UpdateOrderRequest};
pub use table_service::{CreateTableRequest, TableService, UpdateTableRequest};
