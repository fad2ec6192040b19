//! Business logic. Handlers stay thin; everything that touches the database
//! or enforces an invariant lives here, with the pool passed in explicitly.

pub mod address_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod email;
pub mod notification_service;
pub mod order_service;
pub mod paging;
pub mod review_service;
pub mod user_service;
