//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to
/// rusqlite errors rather than panicking on unexpected stored values.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Trait for constructing a model from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT constants ============

pub const ACCOUNT_COLS: &str =
    "id, username, name, email, phone, address, password_hash, image, role, acc_status, created_at";

pub const CATEGORY_COLS: &str = "id, cat_name";

pub const PRODUCT_COLS: &str =
    "id, pro_name, cat_id, pro_price, image_url, description, status_product, created_at";

pub const PRODUCT_WITH_CATEGORY_COLS: &str = "p.id, p.pro_name, p.cat_id, p.pro_price, p.image_url, p.description, p.status_product, p.created_at, c.cat_name";

pub const COLOR_COLS: &str = "id, color_name";
pub const SIZE_COLS: &str = "id, size_name";
pub const IMAGE_COLS: &str = "id, pro_id, image_url";

pub const VARIANT_COLS: &str = "id, pro_id, color_id, size_id, image_id";

pub const VARIANT_EXPANDED_COLS: &str = "v.id, v.pro_id, v.color_id, v.size_id, v.image_id, p.pro_name, c.color_name, s.size_name, i.image_url";

pub const CART_COLS: &str = "id, acc_id, variant_id, pro_quantity, pro_price, total_price";

pub const ORDER_COLS: &str = "id, acc_id, order_date, address_receive, phone, total_price, order_status, pay_status, shipping_status, feedback_order";

pub const ORDER_DETAIL_COLS: &str =
    "id, order_id, variant_id, unit_price, quantity, feedback_details";

pub const FAVORITE_COLS: &str = "id, acc_id, pro_id";

pub const IMPORT_BILL_COLS: &str = "id, create_date, total_amount, image_bill";

pub const IMPORT_BILL_DETAIL_COLS: &str = "id, bill_id, variant_id, quantity, import_price";

pub const WAREHOUSE_COLS: &str = "id, variant_id, bill_id, import_date, inventory_number";

// ============ FromRow implementations ============

impl FromRow for Account {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Account {
            id: row.get(0)?,
            username: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            address: row.get(5)?,
            password_hash: row.get(6)?,
            image: row.get(7)?,
            role: parse_enum(row, 8, "role")?,
            acc_status: parse_enum(row, 9, "acc_status")?,
            created_at: row.get(10)?,
        })
    }
}

impl FromRow for Category {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Category {
            id: row.get(0)?,
            cat_name: row.get(1)?,
        })
    }
}

impl FromRow for Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get(0)?,
            pro_name: row.get(1)?,
            cat_id: row.get(2)?,
            pro_price: row.get(3)?,
            image_url: row.get(4)?,
            description: row.get(5)?,
            status_product: parse_enum(row, 6, "status_product")?,
            created_at: row.get(7)?,
        })
    }
}

impl FromRow for ProductWithCategory {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProductWithCategory {
            product: Product::from_row(row)?,
            cat_name: row.get(8)?,
        })
    }
}

impl FromRow for ProductColor {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProductColor {
            id: row.get(0)?,
            color_name: row.get(1)?,
        })
    }
}

impl FromRow for ProductSize {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProductSize {
            id: row.get(0)?,
            size_name: row.get(1)?,
        })
    }
}

impl FromRow for ProductImage {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProductImage {
            id: row.get(0)?,
            pro_id: row.get(1)?,
            image_url: row.get(2)?,
        })
    }
}

impl FromRow for ProductVariant {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProductVariant {
            id: row.get(0)?,
            pro_id: row.get(1)?,
            color_id: row.get(2)?,
            size_id: row.get(3)?,
            image_id: row.get(4)?,
        })
    }
}

impl FromRow for VariantExpanded {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(VariantExpanded {
            variant: ProductVariant::from_row(row)?,
            pro_name: row.get(5)?,
            color_name: row.get(6)?,
            size_name: row.get(7)?,
            image_url: row.get(8)?,
        })
    }
}

impl FromRow for CartItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(CartItem {
            id: row.get(0)?,
            acc_id: row.get(1)?,
            variant_id: row.get(2)?,
            pro_quantity: row.get(3)?,
            pro_price: row.get(4)?,
            total_price: row.get(5)?,
        })
    }
}

impl FromRow for Order {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Order {
            id: row.get(0)?,
            acc_id: row.get(1)?,
            order_date: row.get(2)?,
            address_receive: row.get(3)?,
            phone: row.get(4)?,
            total_price: row.get(5)?,
            order_status: parse_enum(row, 6, "order_status")?,
            pay_status: parse_enum(row, 7, "pay_status")?,
            shipping_status: parse_enum(row, 8, "shipping_status")?,
            feedback_order: row.get(9)?,
        })
    }
}

impl FromRow for OrderDetail {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(OrderDetail {
            id: row.get(0)?,
            order_id: row.get(1)?,
            variant_id: row.get(2)?,
            unit_price: row.get(3)?,
            quantity: row.get(4)?,
            feedback_details: row.get(5)?,
        })
    }
}

impl FromRow for Favorite {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Favorite {
            id: row.get(0)?,
            acc_id: row.get(1)?,
            pro_id: row.get(2)?,
        })
    }
}

impl FromRow for ImportBill {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ImportBill {
            id: row.get(0)?,
            create_date: row.get(1)?,
            total_amount: row.get(2)?,
            image_bill: row.get(3)?,
        })
    }
}

impl FromRow for ImportBillDetail {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ImportBillDetail {
            id: row.get(0)?,
            bill_id: row.get(1)?,
            variant_id: row.get(2)?,
            quantity: row.get(3)?,
            import_price: row.get(4)?,
        })
    }
}

impl FromRow for WarehouseEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(WarehouseEntry {
            id: row.get(0)?,
            variant_id: row.get(1)?,
            bill_id: row.get(2)?,
            import_date: row.get(3)?,
            inventory_number: row.get(4)?,
        })
    }
}

impl FromRow for StatusCount {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(StatusCount {
            status: row.get(0)?,
            count: row.get(1)?,
        })
    }
}

impl FromRow for PeriodRevenue {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(PeriodRevenue {
            period: row.get(0)?,
            total_revenue: row.get(1)?,
        })
    }
}
