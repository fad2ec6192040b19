pub mod address_handlers;
pub mod auth_handlers;
pub mod cart_handlers;
pub mod category_handlers;
pub mod checkout_handlers;
pub mod notification_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod review_handlers;
pub mod user_handlers;
