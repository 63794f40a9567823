use chrono::Utc;
use rusqlite::{params, types::Value, Connection};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::util::{parse_day_end, parse_day_start};

use super::from_row::{
    query_all, query_one, FromRow, ACCOUNT_COLS, CART_COLS, CATEGORY_COLS, COLOR_COLS,
    FAVORITE_COLS, IMAGE_COLS, IMPORT_BILL_COLS, IMPORT_BILL_DETAIL_COLS, ORDER_COLS,
    ORDER_DETAIL_COLS, PRODUCT_COLS, PRODUCT_WITH_CATEGORY_COLS, SIZE_COLS, VARIANT_COLS,
    VARIANT_EXPANDED_COLS, WAREHOUSE_COLS,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Query returning many rows with a runtime-built parameter list.
fn query_all_dyn<T: FromRow>(conn: &Connection, sql: &str, values: Vec<Value>) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(values), T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Builder for dynamic UPDATE statements with optional fields.
struct UpdateBuilder {
    table: &'static str,
    id: String,
    fields: Vec<(&'static str, Value)>,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: &str) -> Self {
        Self {
            table,
            id: id.to_string(),
            fields: Vec::new(),
        }
    }

    fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Execute the update and return the updated row, or None when the id
    /// does not exist or there was nothing to set.
    fn execute_returning<T: FromRow>(
        self,
        conn: &Connection,
        returning_cols: &str,
    ) -> Result<Option<T>> {
        if self.fields.is_empty() {
            return query_one(
                conn,
                &format!("SELECT {} FROM {} WHERE id = ?1", returning_cols, self.table),
                &[&self.id],
            );
        }
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            self.table,
            sets.join(", "),
            returning_cols
        );
        use rusqlite::OptionalExtension;
        conn.query_row(&sql, rusqlite::params_from_iter(values), T::from_row)
            .optional()
            .map_err(Into::into)
    }
}

fn enum_value(value: impl AsRef<str>) -> Value {
    value.as_ref().to_string().into()
}

// ============ Accounts ============

pub fn create_account(
    conn: &Connection,
    input: &CreateAccount,
    password_hash: &str,
) -> Result<Account> {
    let id = gen_id();
    let role = input.role.unwrap_or(Role::User);
    let status = input.acc_status.unwrap_or(AccountStatus::Active);
    let image = input
        .image
        .clone()
        .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string());
    let created_at = now();
    conn.execute(
        "INSERT INTO accounts (id, username, name, email, phone, address, password_hash, image, role, acc_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            id,
            input.username,
            input.name,
            input.email,
            input.phone,
            input.address,
            password_hash,
            image,
            role.as_ref(),
            status.as_ref(),
            created_at
        ],
    )?;
    Ok(Account {
        id,
        username: input.username.clone(),
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        address: input.address.clone(),
        password_hash: password_hash.to_string(),
        image,
        role,
        acc_status: status,
        created_at,
    })
}

pub fn get_account_by_id(conn: &Connection, id: &str) -> Result<Option<Account>> {
    query_one(
        conn,
        &format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLS),
        &[&id],
    )
}

pub fn get_account_by_username(conn: &Connection, username: &str) -> Result<Option<Account>> {
    query_one(
        conn,
        &format!("SELECT {} FROM accounts WHERE username = ?1", ACCOUNT_COLS),
        &[&username],
    )
}

pub fn get_account_by_email(conn: &Connection, email: &str) -> Result<Option<Account>> {
    query_one(
        conn,
        &format!("SELECT {} FROM accounts WHERE email = ?1", ACCOUNT_COLS),
        &[&email],
    )
}

pub fn username_or_email_taken(conn: &Connection, username: &str, email: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE username = ?1 OR email = ?2",
        params![username, email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    query_all(
        conn,
        &format!("SELECT {} FROM accounts ORDER BY created_at DESC", ACCOUNT_COLS),
        &[],
    )
}

pub fn update_account(
    conn: &Connection,
    id: &str,
    input: &UpdateAccount,
) -> Result<Option<Account>> {
    UpdateBuilder::new("accounts", id)
        .set_opt("name", input.name.clone())
        .set_opt("email", input.email.clone())
        .set_opt("phone", input.phone.clone())
        .set_opt("address", input.address.clone())
        .set_opt("image", input.image.clone())
        .set_opt("role", input.role.map(enum_value))
        .set_opt("acc_status", input.acc_status.map(enum_value))
        .execute_returning(conn, ACCOUNT_COLS)
}

pub fn update_account_password(conn: &Connection, email: &str, password_hash: &str) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE accounts SET password_hash = ?1 WHERE email = ?2",
        params![password_hash, email],
    )?;
    Ok(affected > 0)
}

pub fn delete_account(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM accounts WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Categories ============

pub fn create_category(conn: &Connection, input: &CreateCategory) -> Result<Category> {
    let id = gen_id();
    conn.execute(
        "INSERT INTO categories (id, cat_name) VALUES (?1, ?2)",
        params![id, input.cat_name],
    )?;
    Ok(Category {
        id,
        cat_name: input.cat_name.clone(),
    })
}

pub fn get_category_by_id(conn: &Connection, id: &str) -> Result<Option<Category>> {
    query_one(
        conn,
        &format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLS),
        &[&id],
    )
}

pub fn get_category_by_name(conn: &Connection, name: &str) -> Result<Option<Category>> {
    query_one(
        conn,
        &format!("SELECT {} FROM categories WHERE cat_name = ?1", CATEGORY_COLS),
        &[&name],
    )
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    query_all(
        conn,
        &format!("SELECT {} FROM categories ORDER BY cat_name", CATEGORY_COLS),
        &[],
    )
}

pub fn update_category(conn: &Connection, id: &str, cat_name: &str) -> Result<Option<Category>> {
    UpdateBuilder::new("categories", id)
        .set("cat_name", cat_name.to_string())
        .execute_returning(conn, CATEGORY_COLS)
}

pub fn delete_category(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Products ============

pub fn create_product(conn: &Connection, input: &CreateProduct) -> Result<Product> {
    let id = gen_id();
    let status = input.status_product.unwrap_or(ProductStatus::Active);
    let image = input
        .image_url
        .clone()
        .or_else(|| Some(DEFAULT_PRODUCT_IMAGE.to_string()));
    let created_at = now();
    conn.execute(
        "INSERT INTO products (id, pro_name, cat_id, pro_price, image_url, description, status_product, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            input.pro_name,
            input.cat_id,
            input.pro_price,
            image,
            input.description,
            status.as_ref(),
            created_at
        ],
    )?;
    Ok(Product {
        id,
        pro_name: input.pro_name.clone(),
        cat_id: input.cat_id.clone(),
        pro_price: input.pro_price,
        image_url: image,
        description: input.description.clone(),
        status_product: status,
        created_at,
    })
}

pub fn get_product_by_id(conn: &Connection, id: &str) -> Result<Option<Product>> {
    query_one(
        conn,
        &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLS),
        &[&id],
    )
}

pub fn get_product_with_category(
    conn: &Connection,
    id: &str,
) -> Result<Option<ProductWithCategory>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM products p JOIN categories c ON p.cat_id = c.id WHERE p.id = ?1",
            PRODUCT_WITH_CATEGORY_COLS
        ),
        &[&id],
    )
}

pub fn list_products(conn: &Connection) -> Result<Vec<ProductWithCategory>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM products p JOIN categories c ON p.cat_id = c.id ORDER BY p.pro_name",
            PRODUCT_WITH_CATEGORY_COLS
        ),
        &[],
    )
}

pub fn search_products(
    conn: &Connection,
    query: &ProductSearchQuery,
) -> Result<Vec<ProductWithCategory>> {
    let mut sql = format!(
        "SELECT {} FROM products p JOIN categories c ON p.cat_id = c.id WHERE 1=1",
        PRODUCT_WITH_CATEGORY_COLS
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(cat_id) = &query.cat_id {
        sql.push_str(" AND p.cat_id = ?");
        values.push(cat_id.clone().into());
    }
    if let Some(status) = query.status_product {
        sql.push_str(" AND p.status_product = ?");
        values.push(enum_value(status));
    }
    if let Some(min) = query.min_price {
        sql.push_str(" AND p.pro_price >= ?");
        values.push(min.into());
    }
    if let Some(max) = query.max_price {
        sql.push_str(" AND p.pro_price <= ?");
        values.push(max.into());
    }
    match query.has_image {
        Some(true) => sql.push_str(" AND p.image_url IS NOT NULL AND p.image_url != ''"),
        Some(false) => sql.push_str(" AND (p.image_url IS NULL OR p.image_url = '')"),
        None => {}
    }
    if let Some(from) = query.date_from.as_deref().and_then(parse_day_start) {
        sql.push_str(" AND p.created_at >= ?");
        values.push(from.into());
    }
    if let Some(to) = query.date_to.as_deref().and_then(parse_day_end) {
        sql.push_str(" AND p.created_at <= ?");
        values.push(to.into());
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let like = format!("%{}%", q);
        let mut terms = vec![
            "p.pro_name LIKE ?",
            "p.description LIKE ?",
            "p.status_product LIKE ?",
            "p.id = ?",
        ];
        values.push(like.clone().into());
        values.push(like.clone().into());
        values.push(like.into());
        values.push(q.to_string().into());
        if let Ok(price) = q.parse::<f64>() {
            terms.push("p.pro_price = ?");
            values.push(price.into());
        }
        sql.push_str(&format!(" AND ({})", terms.join(" OR ")));
    }
    sql.push_str(" ORDER BY p.pro_name");
    query_all_dyn(conn, &sql, values)
}

pub fn update_product(
    conn: &Connection,
    id: &str,
    input: &UpdateProduct,
) -> Result<Option<Product>> {
    UpdateBuilder::new("products", id)
        .set_opt("pro_name", input.pro_name.clone())
        .set_opt("cat_id", input.cat_id.clone())
        .set_opt("pro_price", input.pro_price)
        .set_opt("image_url", input.image_url.clone())
        .set_opt("description", input.description.clone())
        .set_opt("status_product", input.status_product.map(enum_value))
        .execute_returning(conn, PRODUCT_COLS)
}

pub fn delete_product(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Colors, sizes, images ============

pub fn create_color(conn: &Connection, input: &CreateProductColor) -> Result<ProductColor> {
    let id = gen_id();
    conn.execute(
        "INSERT INTO product_colors (id, color_name) VALUES (?1, ?2)",
        params![id, input.color_name],
    )?;
    Ok(ProductColor {
        id,
        color_name: input.color_name.clone(),
    })
}

pub fn get_color_by_id(conn: &Connection, id: &str) -> Result<Option<ProductColor>> {
    query_one(
        conn,
        &format!("SELECT {} FROM product_colors WHERE id = ?1", COLOR_COLS),
        &[&id],
    )
}

pub fn list_colors(conn: &Connection) -> Result<Vec<ProductColor>> {
    query_all(
        conn,
        &format!("SELECT {} FROM product_colors ORDER BY color_name", COLOR_COLS),
        &[],
    )
}

pub fn update_color(conn: &Connection, id: &str, color_name: &str) -> Result<Option<ProductColor>> {
    UpdateBuilder::new("product_colors", id)
        .set("color_name", color_name.to_string())
        .execute_returning(conn, COLOR_COLS)
}

pub fn delete_color(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM product_colors WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

pub fn create_size(conn: &Connection, input: &CreateProductSize) -> Result<ProductSize> {
    let id = gen_id();
    conn.execute(
        "INSERT INTO product_sizes (id, size_name) VALUES (?1, ?2)",
        params![id, input.size_name],
    )?;
    Ok(ProductSize {
        id,
        size_name: input.size_name.clone(),
    })
}

pub fn get_size_by_id(conn: &Connection, id: &str) -> Result<Option<ProductSize>> {
    query_one(
        conn,
        &format!("SELECT {} FROM product_sizes WHERE id = ?1", SIZE_COLS),
        &[&id],
    )
}

pub fn list_sizes(conn: &Connection) -> Result<Vec<ProductSize>> {
    query_all(
        conn,
        &format!("SELECT {} FROM product_sizes ORDER BY size_name", SIZE_COLS),
        &[],
    )
}

pub fn update_size(conn: &Connection, id: &str, size_name: &str) -> Result<Option<ProductSize>> {
    UpdateBuilder::new("product_sizes", id)
        .set("size_name", size_name.to_string())
        .execute_returning(conn, SIZE_COLS)
}

pub fn delete_size(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM product_sizes WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

pub fn create_image(conn: &Connection, input: &CreateProductImage) -> Result<ProductImage> {
    let id = gen_id();
    conn.execute(
        "INSERT INTO product_images (id, pro_id, image_url) VALUES (?1, ?2, ?3)",
        params![id, input.pro_id, input.image_url],
    )?;
    Ok(ProductImage {
        id,
        pro_id: input.pro_id.clone(),
        image_url: input.image_url.clone(),
    })
}

pub fn get_image_by_id(conn: &Connection, id: &str) -> Result<Option<ProductImage>> {
    query_one(
        conn,
        &format!("SELECT {} FROM product_images WHERE id = ?1", IMAGE_COLS),
        &[&id],
    )
}

pub fn list_images(conn: &Connection) -> Result<Vec<ProductImage>> {
    query_all(
        conn,
        &format!("SELECT {} FROM product_images", IMAGE_COLS),
        &[],
    )
}

pub fn list_images_for_product(conn: &Connection, pro_id: &str) -> Result<Vec<ProductImage>> {
    query_all(
        conn,
        &format!("SELECT {} FROM product_images WHERE pro_id = ?1", IMAGE_COLS),
        &[&pro_id],
    )
}

pub fn update_image(conn: &Connection, id: &str, image_url: &str) -> Result<Option<ProductImage>> {
    UpdateBuilder::new("product_images", id)
        .set("image_url", image_url.to_string())
        .execute_returning(conn, IMAGE_COLS)
}

pub fn delete_image(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM product_images WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Variants ============

pub fn create_variant(conn: &Connection, input: &CreateVariant) -> Result<ProductVariant> {
    let id = gen_id();
    conn.execute(
        "INSERT INTO product_variants (id, pro_id, color_id, size_id, image_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, input.pro_id, input.color_id, input.size_id, input.image_id],
    )?;
    Ok(ProductVariant {
        id,
        pro_id: input.pro_id.clone(),
        color_id: input.color_id.clone(),
        size_id: input.size_id.clone(),
        image_id: input.image_id.clone(),
    })
}

pub fn get_variant_by_id(conn: &Connection, id: &str) -> Result<Option<ProductVariant>> {
    query_one(
        conn,
        &format!("SELECT {} FROM product_variants WHERE id = ?1", VARIANT_COLS),
        &[&id],
    )
}

const VARIANT_EXPANDED_FROM: &str = "FROM product_variants v \
     JOIN products p ON v.pro_id = p.id \
     JOIN product_colors c ON v.color_id = c.id \
     JOIN product_sizes s ON v.size_id = s.id \
     JOIN product_images i ON v.image_id = i.id";

pub fn get_variant_expanded(conn: &Connection, id: &str) -> Result<Option<VariantExpanded>> {
    query_one(
        conn,
        &format!(
            "SELECT {} {} WHERE v.id = ?1",
            VARIANT_EXPANDED_COLS, VARIANT_EXPANDED_FROM
        ),
        &[&id],
    )
}

pub fn list_variants(conn: &Connection, filter: &VariantFilter) -> Result<Vec<VariantExpanded>> {
    let mut sql = format!(
        "SELECT {} {} WHERE 1=1",
        VARIANT_EXPANDED_COLS, VARIANT_EXPANDED_FROM
    );
    let mut values: Vec<Value> = Vec::new();
    if let Some(pro_id) = &filter.pro_id {
        sql.push_str(" AND v.pro_id = ?");
        values.push(pro_id.clone().into());
    }
    if let Some(color_id) = &filter.color_id {
        sql.push_str(" AND v.color_id = ?");
        values.push(color_id.clone().into());
    }
    if let Some(size_id) = &filter.size_id {
        sql.push_str(" AND v.size_id = ?");
        values.push(size_id.clone().into());
    }
    query_all_dyn(conn, &sql, values)
}

pub fn update_variant(
    conn: &Connection,
    id: &str,
    input: &UpdateVariant,
) -> Result<Option<ProductVariant>> {
    UpdateBuilder::new("product_variants", id)
        .set_opt("pro_id", input.pro_id.clone())
        .set_opt("color_id", input.color_id.clone())
        .set_opt("size_id", input.size_id.clone())
        .set_opt("image_id", input.image_id.clone())
        .execute_returning(conn, VARIANT_COLS)
}

pub fn delete_variant(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM product_variants WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Carts ============

pub fn create_cart_item(conn: &Connection, input: &CreateCartItem) -> Result<CartItem> {
    let id = gen_id();
    let total_price = input.pro_quantity as f64 * input.pro_price;
    conn.execute(
        "INSERT INTO carts (id, acc_id, variant_id, pro_quantity, pro_price, total_price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            input.acc_id,
            input.variant_id,
            input.pro_quantity,
            input.pro_price,
            total_price
        ],
    )?;
    Ok(CartItem {
        id,
        acc_id: input.acc_id.clone(),
        variant_id: input.variant_id.clone(),
        pro_quantity: input.pro_quantity,
        pro_price: input.pro_price,
        total_price,
    })
}

pub fn get_cart_item_by_id(conn: &Connection, id: &str) -> Result<Option<CartItem>> {
    query_one(
        conn,
        &format!("SELECT {} FROM carts WHERE id = ?1", CART_COLS),
        &[&id],
    )
}

/// List cart items; `scope_acc` narrows to one account for non-elevated
/// callers.
pub fn list_cart_items(conn: &Connection, scope_acc: Option<&str>) -> Result<Vec<CartItem>> {
    match scope_acc {
        Some(acc_id) => query_all(
            conn,
            &format!("SELECT {} FROM carts WHERE acc_id = ?1", CART_COLS),
            &[&acc_id],
        ),
        None => query_all(conn, &format!("SELECT {} FROM carts", CART_COLS), &[]),
    }
}

/// Update quantity/price and recompute the line total in one statement.
pub fn update_cart_item(
    conn: &Connection,
    item: &CartItem,
    input: &UpdateCartItem,
) -> Result<Option<CartItem>> {
    let quantity = input.pro_quantity.unwrap_or(item.pro_quantity);
    let price = input.pro_price.unwrap_or(item.pro_price);
    UpdateBuilder::new("carts", &item.id)
        .set("pro_quantity", quantity)
        .set("pro_price", price)
        .set("total_price", quantity as f64 * price)
        .execute_returning(conn, CART_COLS)
}

pub fn delete_cart_item(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM carts WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Orders ============

pub fn create_order(conn: &Connection, input: &CreateOrder) -> Result<Order> {
    let id = gen_id();
    let order_status = input.order_status.unwrap_or(OrderStatus::Pending);
    let pay_status = input.pay_status.unwrap_or(PayStatus::Unpaid);
    let shipping_status = input.shipping_status.unwrap_or(ShippingStatus::NotShipped);
    let feedback = input.feedback_order.clone().unwrap_or_else(|| "None".to_string());
    let order_date = now();
    conn.execute(
        "INSERT INTO orders (id, acc_id, order_date, address_receive, phone, total_price, order_status, pay_status, shipping_status, feedback_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            id,
            input.acc_id,
            order_date,
            input.address_receive,
            input.phone,
            input.total_price,
            order_status.as_ref(),
            pay_status.as_ref(),
            shipping_status.as_ref(),
            feedback
        ],
    )?;
    Ok(Order {
        id,
        acc_id: input.acc_id.clone(),
        order_date,
        address_receive: input.address_receive.clone(),
        phone: input.phone.clone(),
        total_price: input.total_price,
        order_status,
        pay_status,
        shipping_status,
        feedback_order: feedback,
    })
}

pub fn get_order_by_id(conn: &Connection, id: &str) -> Result<Option<Order>> {
    query_one(
        conn,
        &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLS),
        &[&id],
    )
}

/// List orders; `scope_acc` narrows to one account for non-elevated callers.
pub fn list_orders(conn: &Connection, scope_acc: Option<&str>) -> Result<Vec<Order>> {
    match scope_acc {
        Some(acc_id) => query_all(
            conn,
            &format!(
                "SELECT {} FROM orders WHERE acc_id = ?1 ORDER BY order_date DESC",
                ORDER_COLS
            ),
            &[&acc_id],
        ),
        None => query_all(
            conn,
            &format!("SELECT {} FROM orders ORDER BY order_date DESC", ORDER_COLS),
            &[],
        ),
    }
}

/// Best-effort order search. Unparseable date or price tokens are ignored;
/// the free-text token is OR-matched against status fields, address, phone,
/// the literal id, and (when shaped like `YYYY-MM-DD`) that day's range.
pub fn search_orders(
    conn: &Connection,
    query: &OrderSearchQuery,
    scope_acc: Option<&str>,
) -> Result<Vec<Order>> {
    let mut sql = format!("SELECT {} FROM orders WHERE 1=1", ORDER_COLS);
    let mut values: Vec<Value> = Vec::new();

    if let Some(acc_id) = scope_acc {
        sql.push_str(" AND acc_id = ?");
        values.push(acc_id.to_string().into());
    } else if let Some(acc_id) = &query.acc_id {
        sql.push_str(" AND acc_id = ?");
        values.push(acc_id.clone().into());
    }
    if let Some(status) = query.order_status {
        sql.push_str(" AND order_status = ?");
        values.push(enum_value(status));
    }
    if let Some(status) = query.pay_status {
        sql.push_str(" AND pay_status = ?");
        values.push(enum_value(status));
    }
    if let Some(status) = query.shipping_status {
        sql.push_str(" AND shipping_status = ?");
        values.push(enum_value(status));
    }
    if let Some(from) = query.date_from.as_deref().and_then(parse_day_start) {
        sql.push_str(" AND order_date >= ?");
        values.push(from.into());
    }
    if let Some(to) = query.date_to.as_deref().and_then(parse_day_end) {
        sql.push_str(" AND order_date <= ?");
        values.push(to.into());
    }
    if let Some(min) = query.min_price {
        sql.push_str(" AND total_price >= ?");
        values.push(min.into());
    }
    if let Some(max) = query.max_price {
        sql.push_str(" AND total_price <= ?");
        values.push(max.into());
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let like = format!("%{}%", q);
        let mut terms = vec![
            "order_status LIKE ?",
            "pay_status LIKE ?",
            "shipping_status LIKE ?",
            "address_receive LIKE ?",
            "phone LIKE ?",
            "id = ?",
        ];
        for _ in 0..5 {
            values.push(like.clone().into());
        }
        values.push(q.to_string().into());
        if let (Some(start), Some(end)) = (parse_day_start(q), parse_day_end(q)) {
            terms.push("(order_date >= ? AND order_date <= ?)");
            values.push(start.into());
            values.push(end.into());
        }
        sql.push_str(&format!(" AND ({})", terms.join(" OR ")));
    }
    sql.push_str(" ORDER BY order_date DESC");
    query_all_dyn(conn, &sql, values)
}

pub fn update_order(conn: &Connection, id: &str, input: &UpdateOrder) -> Result<Option<Order>> {
    UpdateBuilder::new("orders", id)
        .set_opt("acc_id", input.acc_id.clone())
        .set_opt("address_receive", input.address_receive.clone())
        .set_opt("phone", input.phone.clone())
        .set_opt("total_price", input.total_price)
        .set_opt("order_status", input.order_status.map(enum_value))
        .set_opt("pay_status", input.pay_status.map(enum_value))
        .set_opt("shipping_status", input.shipping_status.map(enum_value))
        .set_opt("feedback_order", input.feedback_order.clone())
        .execute_returning(conn, ORDER_COLS)
}

pub fn delete_order(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

/// Settle an order as paid. The check and the write are one conditional
/// statement so two racing callbacks cannot both observe `unpaid`; returns
/// whether this call performed the transition.
pub fn mark_order_paid(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE orders SET pay_status = 'paid' WHERE id = ?1 AND pay_status != 'paid'",
        params![id],
    )?;
    Ok(affected > 0)
}

/// Record a declined/cancelled payment. Never regresses a paid order.
pub fn mark_order_pay_failed(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE orders SET pay_status = 'failed' WHERE id = ?1 AND pay_status != 'paid'",
        params![id],
    )?;
    Ok(affected > 0)
}

// ============ Order details ============

pub fn create_order_detail(conn: &Connection, input: &CreateOrderDetail) -> Result<OrderDetail> {
    let id = gen_id();
    let feedback = input
        .feedback_details
        .clone()
        .unwrap_or_else(|| "None".to_string());
    conn.execute(
        "INSERT INTO order_details (id, order_id, variant_id, unit_price, quantity, feedback_details)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            input.order_id,
            input.variant_id,
            input.unit_price,
            input.quantity,
            feedback
        ],
    )?;
    Ok(OrderDetail {
        id,
        order_id: input.order_id.clone(),
        variant_id: input.variant_id.clone(),
        unit_price: input.unit_price,
        quantity: input.quantity,
        feedback_details: feedback,
    })
}

pub fn get_order_detail_by_id(conn: &Connection, id: &str) -> Result<Option<OrderDetail>> {
    query_one(
        conn,
        &format!("SELECT {} FROM order_details WHERE id = ?1", ORDER_DETAIL_COLS),
        &[&id],
    )
}

pub fn list_order_details(
    conn: &Connection,
    scope_acc: Option<&str>,
    order_id: Option<&str>,
) -> Result<Vec<OrderDetail>> {
    let mut sql = format!(
        "SELECT {} FROM order_details d WHERE 1=1",
        qualified_detail_cols()
    );
    let mut values: Vec<Value> = Vec::new();
    if let Some(acc_id) = scope_acc {
        sql.push_str(" AND d.order_id IN (SELECT id FROM orders WHERE acc_id = ?)");
        values.push(acc_id.to_string().into());
    }
    if let Some(order_id) = order_id {
        sql.push_str(" AND d.order_id = ?");
        values.push(order_id.to_string().into());
    }
    query_all_dyn(conn, &sql, values)
}

fn qualified_detail_cols() -> String {
    ORDER_DETAIL_COLS
        .split(", ")
        .map(|c| format!("d.{}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Feedback search: only rows with real feedback text, filterable by order,
/// variant, product, and substrings.
pub fn search_order_details(
    conn: &Connection,
    query: &OrderDetailSearchQuery,
    scope_acc: Option<&str>,
) -> Result<Vec<OrderDetail>> {
    let mut sql = format!(
        "SELECT {} FROM order_details d WHERE d.feedback_details NOT IN ('None', '')",
        qualified_detail_cols()
    );
    let mut values: Vec<Value> = Vec::new();
    if let Some(acc_id) = scope_acc {
        sql.push_str(" AND d.order_id IN (SELECT id FROM orders WHERE acc_id = ?)");
        values.push(acc_id.to_string().into());
    }
    if let Some(order_id) = &query.order_id {
        sql.push_str(" AND d.order_id = ?");
        values.push(order_id.clone().into());
    }
    if let Some(variant_id) = &query.variant_id {
        sql.push_str(" AND d.variant_id = ?");
        values.push(variant_id.clone().into());
    }
    if let Some(pro_id) = &query.pro_id {
        sql.push_str(" AND d.variant_id IN (SELECT id FROM product_variants WHERE pro_id = ?)");
        values.push(pro_id.clone().into());
    }
    if let Some(feedback) = &query.feedback {
        sql.push_str(" AND d.feedback_details LIKE ?");
        values.push(format!("%{}%", feedback).into());
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        sql.push_str(" AND d.feedback_details LIKE ?");
        values.push(format!("%{}%", q).into());
    }
    query_all_dyn(conn, &sql, values)
}

pub fn update_order_detail(
    conn: &Connection,
    id: &str,
    input: &UpdateOrderDetail,
) -> Result<Option<OrderDetail>> {
    UpdateBuilder::new("order_details", id)
        .set_opt("order_id", input.order_id.clone())
        .set_opt("variant_id", input.variant_id.clone())
        .set_opt("unit_price", input.unit_price)
        .set_opt("quantity", input.quantity)
        .set_opt("feedback_details", input.feedback_details.clone())
        .execute_returning(conn, ORDER_DETAIL_COLS)
}

pub fn delete_order_detail(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM order_details WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Favorites ============

pub fn add_favorite(conn: &Connection, acc_id: &str, pro_id: &str) -> Result<Favorite> {
    let id = gen_id();
    conn.execute(
        "INSERT INTO favorites (id, acc_id, pro_id) VALUES (?1, ?2, ?3)",
        params![id, acc_id, pro_id],
    )?;
    Ok(Favorite {
        id,
        acc_id: acc_id.to_string(),
        pro_id: pro_id.to_string(),
    })
}

pub fn favorite_exists(conn: &Connection, acc_id: &str, pro_id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM favorites WHERE acc_id = ?1 AND pro_id = ?2",
        params![acc_id, pro_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_favorite_by_id(conn: &Connection, id: &str) -> Result<Option<Favorite>> {
    query_one(
        conn,
        &format!("SELECT {} FROM favorites WHERE id = ?1", FAVORITE_COLS),
        &[&id],
    )
}

pub fn list_favorites_for_account(conn: &Connection, acc_id: &str) -> Result<Vec<Favorite>> {
    query_all(
        conn,
        &format!("SELECT {} FROM favorites WHERE acc_id = ?1", FAVORITE_COLS),
        &[&acc_id],
    )
}

pub fn delete_favorite(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("DELETE FROM favorites WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// ============ Import bills & warehouse ============

/// Create an import bill with its detail lines and the matching warehouse
/// inventory entries, atomically.
pub fn create_import_bill(
    conn: &Connection,
    create_date: i64,
    input: &CreateImportBill,
) -> Result<ImportBill> {
    let tx = conn.unchecked_transaction()?;
    let bill_id = gen_id();
    tx.execute(
        "INSERT INTO import_bills (id, create_date, total_amount, image_bill) VALUES (?1, ?2, ?3, ?4)",
        params![bill_id, create_date, input.total_amount, input.image_bill],
    )?;
    for detail in &input.details {
        tx.execute(
            "INSERT INTO import_bill_details (id, bill_id, variant_id, quantity, import_price)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![gen_id(), bill_id, detail.variant_id, detail.quantity, detail.import_price],
        )?;
        tx.execute(
            "INSERT INTO warehouses (id, variant_id, bill_id, import_date, inventory_number)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![gen_id(), detail.variant_id, bill_id, create_date, detail.quantity],
        )?;
    }
    tx.commit()?;
    Ok(ImportBill {
        id: bill_id,
        create_date,
        total_amount: input.total_amount,
        image_bill: input.image_bill.clone(),
    })
}

pub fn get_import_bill_by_id(conn: &Connection, id: &str) -> Result<Option<ImportBill>> {
    query_one(
        conn,
        &format!("SELECT {} FROM import_bills WHERE id = ?1", IMPORT_BILL_COLS),
        &[&id],
    )
}

pub fn list_import_bills(conn: &Connection) -> Result<Vec<ImportBill>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM import_bills ORDER BY create_date DESC",
            IMPORT_BILL_COLS
        ),
        &[],
    )
}

pub fn search_import_bills(
    conn: &Connection,
    start_date: Option<i64>,
    end_date: Option<i64>,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
) -> Result<Vec<ImportBill>> {
    let mut sql = format!("SELECT {} FROM import_bills WHERE 1=1", IMPORT_BILL_COLS);
    let mut values: Vec<Value> = Vec::new();
    if let Some(start) = start_date {
        sql.push_str(" AND create_date >= ?");
        values.push(start.into());
    }
    if let Some(end) = end_date {
        sql.push_str(" AND create_date <= ?");
        values.push(end.into());
    }
    if let Some(min) = min_amount {
        sql.push_str(" AND total_amount >= ?");
        values.push(min.into());
    }
    if let Some(max) = max_amount {
        sql.push_str(" AND total_amount <= ?");
        values.push(max.into());
    }
    sql.push_str(" ORDER BY create_date DESC");
    query_all_dyn(conn, &sql, values)
}

pub fn update_import_bill(
    conn: &Connection,
    id: &str,
    create_date: i64,
    total_amount: f64,
    image_bill: Option<&str>,
) -> Result<Option<ImportBill>> {
    UpdateBuilder::new("import_bills", id)
        .set("create_date", create_date)
        .set("total_amount", total_amount)
        .set_opt("image_bill", image_bill.map(str::to_string))
        .execute_returning(conn, IMPORT_BILL_COLS)
}

pub fn delete_import_bill(conn: &Connection, id: &str) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM warehouses WHERE bill_id = ?1", params![id])?;
    tx.execute(
        "DELETE FROM import_bill_details WHERE bill_id = ?1",
        params![id],
    )?;
    let affected = tx.execute("DELETE FROM import_bills WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(affected > 0)
}

pub fn list_details_for_bill(conn: &Connection, bill_id: &str) -> Result<Vec<ImportBillDetail>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM import_bill_details WHERE bill_id = ?1",
            IMPORT_BILL_DETAIL_COLS
        ),
        &[&bill_id],
    )
}

pub fn list_warehouse_entries(
    conn: &Connection,
    variant_id: Option<&str>,
) -> Result<Vec<WarehouseEntry>> {
    match variant_id {
        Some(variant_id) => query_all(
            conn,
            &format!(
                "SELECT {} FROM warehouses WHERE variant_id = ?1 ORDER BY import_date DESC",
                WAREHOUSE_COLS
            ),
            &[&variant_id],
        ),
        None => query_all(
            conn,
            &format!("SELECT {} FROM warehouses ORDER BY import_date DESC", WAREHOUSE_COLS),
            &[],
        ),
    }
}

// ============ Statistics ============

fn count_where(conn: &Connection, sql: &str) -> Result<i64> {
    Ok(conn.query_row(sql, [], |row| row.get(0))?)
}

pub fn customer_stats(conn: &Connection) -> Result<CustomerStats> {
    Ok(CustomerStats {
        total_customers: count_where(conn, "SELECT COUNT(*) FROM accounts")?,
        active_customers: count_where(
            conn,
            "SELECT COUNT(*) FROM accounts WHERE acc_status = 'active'",
        )?,
        inactive_customers: count_where(
            conn,
            "SELECT COUNT(*) FROM accounts WHERE acc_status = 'inactive'",
        )?,
        suspended_customers: count_where(
            conn,
            "SELECT COUNT(*) FROM accounts WHERE acc_status = 'suspended'",
        )?,
        role_counts: query_all(
            conn,
            "SELECT role, COUNT(*) FROM accounts GROUP BY role ORDER BY role",
            &[],
        )?,
    })
}

pub fn revenue_stats(conn: &Connection) -> Result<RevenueStats> {
    let (total_revenue, average_order_value) = conn.query_row(
        "SELECT COALESCE(SUM(total_price), 0), COALESCE(AVG(total_price), 0)
         FROM orders WHERE pay_status = 'paid'",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(RevenueStats {
        total_revenue,
        average_order_value,
    })
}

pub fn order_stats(conn: &Connection) -> Result<OrderStats> {
    Ok(OrderStats {
        total_orders: count_where(conn, "SELECT COUNT(*) FROM orders")?,
        status_counts: query_all(
            conn,
            "SELECT order_status, COUNT(*) FROM orders GROUP BY order_status ORDER BY order_status",
            &[],
        )?,
        pay_status_counts: query_all(
            conn,
            "SELECT pay_status, COUNT(*) FROM orders GROUP BY pay_status ORDER BY pay_status",
            &[],
        )?,
        shipping_status_counts: query_all(
            conn,
            "SELECT shipping_status, COUNT(*) FROM orders GROUP BY shipping_status ORDER BY shipping_status",
            &[],
        )?,
    })
}

/// Paid revenue grouped by a strftime period format, e.g. `%Y-%W` for
/// weekly, `%Y-%m` for monthly, `%Y` for yearly.
pub fn revenue_by_period(conn: &Connection, period_fmt: &str) -> Result<Vec<PeriodRevenue>> {
    query_all(
        conn,
        "SELECT strftime(?1, order_date, 'unixepoch') AS period, SUM(total_price)
         FROM orders WHERE pay_status = 'paid'
         GROUP BY period ORDER BY period",
        &[&period_fmt],
    )
}
