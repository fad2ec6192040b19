use actix_web::web;

use crate::web::handlers::{
  address_handlers, auth_handlers, cart_handlers, category_handlers, checkout_handlers, notification_handlers,
  order_handlers, product_handlers, review_handlers, user_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/logout", web::post().to(auth_handlers::logout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler))
          .route("/change-password", web::post().to(auth_handlers::change_password_handler)),
      )
      .service(
        web::scope("/cart")
          .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/update/{cart_item_id}", web::put().to(cart_handlers::update_cart_item_handler))
          .route("/remove", web::delete().to(cart_handlers::remove_from_cart_handler))
          .route("/summary", web::get().to(cart_handlers::cart_summary_handler)),
      )
      .service(web::scope("/checkout").route("", web::post().to(checkout_handlers::checkout_handler)))
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::user_orders_handler))
          .route("/all", web::get().to(order_handlers::all_orders_handler))
          .route("/status", web::put().to(order_handlers::update_order_status_handler)),
      )
      .service(
        web::scope("/addresses")
          .route("", web::post().to(address_handlers::create_address_handler))
          .route("", web::get().to(address_handlers::list_addresses_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
      )
      .service(
        web::scope("/categories")
          .route("", web::get().to(category_handlers::list_categories_handler))
          .route("", web::post().to(category_handlers::create_category_handler))
          .route("/{category_id}", web::put().to(category_handlers::update_category_handler))
          .route("/{category_id}", web::delete().to(category_handlers::delete_category_handler)),
      )
      .service(
        web::scope("/reviews")
          .route("", web::post().to(review_handlers::create_review_handler))
          .route("/product/{product_id}", web::get().to(review_handlers::list_reviews_handler))
          .route(
            "/product/{product_id}/rating",
            web::get().to(review_handlers::product_rating_handler),
          )
          .route("/{review_id}", web::delete().to(review_handlers::delete_review_handler)),
      )
      .service(
        web::scope("/notifications")
          .route("/{user_id}", web::get().to(notification_handlers::list_notifications_handler))
          .route(
            "/{user_id}/mark-read",
            web::put().to(notification_handlers::mark_notifications_read_handler),
          )
          .route("/{notification_id}", web::delete().to(notification_handlers::delete_notification_handler)),
      )
      .service(
        web::scope("/admin")
          .route("/users", web::get().to(user_handlers::list_users_handler))
          .route("/users/{user_id}", web::put().to(user_handlers::update_user_handler))
          .route("/users/{user_id}", web::delete().to(user_handlers::delete_user_handler))
          .route("/dashboard", web::get().to(user_handlers::dashboard_stats_handler)),
      ),
  );
}
