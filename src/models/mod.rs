//! Data structures representing database entities.

pub mod address;
pub mod cart;
pub mod category;
pub mod notification;
pub mod order;
pub mod order_item;
pub mod product;
pub mod review;
pub mod user;

// Re-export the model structs for convenient access
pub use address::Address;
pub use cart::{Cart, CartItem};
pub use category::Category;
pub use notification::{Notification, NotificationKind};
pub use order::{Order, OrderStatus, OrderWithItems};
pub use order_item::OrderItem;
pub use product::{Product, ProductVariant};
pub use review::Review;
pub use user::{User, UserRole};
