mod health;
mod product;

pub use health::health_handler;
pub use product::{
    create_product_handler, delete_product_handler, get_product_handler, list_products_handler,
    not_found_handler, update_product_handler,
};
