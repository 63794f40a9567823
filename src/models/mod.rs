mod account;
mod cart;
mod category;
mod favorite;
mod import_bill;
mod order;
mod order_detail;
mod product;
mod stats;
mod variant;

pub use account::*;
pub use cart::*;
pub use category::*;
pub use favorite::*;
pub use import_bill::*;
pub use order::*;
pub use order_detail::*;
pub use product::*;
pub use stats::*;
pub use variant::*;
