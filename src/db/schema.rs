use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Accounts (buyers plus the admin/manager staff roles)
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            address TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            image TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('user', 'admin', 'manager')),
            acc_status TEXT NOT NULL CHECK (acc_status IN ('active', 'inactive', 'suspended')),
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_accounts_username ON accounts(username);
        CREATE INDEX IF NOT EXISTS idx_accounts_email ON accounts(email);

        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            cat_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            pro_name TEXT NOT NULL,
            cat_id TEXT NOT NULL REFERENCES categories(id),
            pro_price REAL NOT NULL CHECK (pro_price >= 0),
            image_url TEXT,
            description TEXT,
            status_product TEXT NOT NULL
                CHECK (status_product IN ('active', 'discontinued', 'out_of_stock')),
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_products_cat ON products(cat_id);

        -- Variant attribute tables
        CREATE TABLE IF NOT EXISTS product_colors (
            id TEXT PRIMARY KEY,
            color_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS product_sizes (
            id TEXT PRIMARY KEY,
            size_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS product_images (
            id TEXT PRIMARY KEY,
            pro_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            image_url TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_product_images_pro ON product_images(pro_id);

        CREATE TABLE IF NOT EXISTS product_variants (
            id TEXT PRIMARY KEY,
            pro_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            color_id TEXT NOT NULL REFERENCES product_colors(id),
            size_id TEXT NOT NULL REFERENCES product_sizes(id),
            image_id TEXT NOT NULL REFERENCES product_images(id)
        );
        CREATE INDEX IF NOT EXISTS idx_variants_pro ON product_variants(pro_id);

        CREATE TABLE IF NOT EXISTS carts (
            id TEXT PRIMARY KEY,
            acc_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            variant_id TEXT NOT NULL REFERENCES product_variants(id),
            pro_quantity INTEGER NOT NULL CHECK (pro_quantity >= 1),
            pro_price REAL NOT NULL CHECK (pro_price >= 0),
            total_price REAL NOT NULL CHECK (total_price >= 0)
        );
        CREATE INDEX IF NOT EXISTS idx_carts_acc ON carts(acc_id);

        -- Orders: pay_status transitions are conditional updates keyed on
        -- the current value, never read-modify-write.
        CREATE TABLE IF NOT EXISTS orders (
            id TEXT PRIMARY KEY,
            acc_id TEXT NOT NULL REFERENCES accounts(id),
            order_date INTEGER NOT NULL,
            address_receive TEXT NOT NULL,
            phone TEXT NOT NULL,
            total_price REAL NOT NULL CHECK (total_price >= 0),
            order_status TEXT NOT NULL
                CHECK (order_status IN ('pending', 'confirmed', 'shipped', 'delivered', 'cancelled')),
            pay_status TEXT NOT NULL
                CHECK (pay_status IN ('unpaid', 'paid', 'failed')),
            shipping_status TEXT NOT NULL
                CHECK (shipping_status IN ('not_shipped', 'in_transit', 'delivered')),
            feedback_order TEXT NOT NULL DEFAULT 'None'
        );
        CREATE INDEX IF NOT EXISTS idx_orders_acc ON orders(acc_id);
        CREATE INDEX IF NOT EXISTS idx_orders_date ON orders(order_date);

        CREATE TABLE IF NOT EXISTS order_details (
            id TEXT PRIMARY KEY,
            order_id TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            variant_id TEXT NOT NULL REFERENCES product_variants(id),
            unit_price REAL NOT NULL CHECK (unit_price >= 0),
            quantity INTEGER NOT NULL CHECK (quantity >= 1),
            feedback_details TEXT NOT NULL DEFAULT 'None'
        );
        CREATE INDEX IF NOT EXISTS idx_order_details_order ON order_details(order_id);
        CREATE INDEX IF NOT EXISTS idx_order_details_variant ON order_details(variant_id);

        CREATE TABLE IF NOT EXISTS favorites (
            id TEXT PRIMARY KEY,
            acc_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            pro_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            UNIQUE(acc_id, pro_id)
        );
        CREATE INDEX IF NOT EXISTS idx_favorites_acc ON favorites(acc_id);

        CREATE TABLE IF NOT EXISTS import_bills (
            id TEXT PRIMARY KEY,
            create_date INTEGER NOT NULL,
            total_amount REAL NOT NULL CHECK (total_amount >= 0),
            image_bill TEXT
        );

        CREATE TABLE IF NOT EXISTS import_bill_details (
            id TEXT PRIMARY KEY,
            bill_id TEXT NOT NULL REFERENCES import_bills(id) ON DELETE CASCADE,
            variant_id TEXT NOT NULL REFERENCES product_variants(id),
            quantity INTEGER NOT NULL CHECK (quantity >= 1),
            import_price REAL NOT NULL CHECK (import_price >= 0)
        );
        CREATE INDEX IF NOT EXISTS idx_import_bill_details_bill ON import_bill_details(bill_id);

        CREATE TABLE IF NOT EXISTS warehouses (
            id TEXT PRIMARY KEY,
            variant_id TEXT NOT NULL REFERENCES product_variants(id),
            bill_id TEXT NOT NULL REFERENCES import_bills(id),
            import_date INTEGER NOT NULL,
            inventory_number INTEGER NOT NULL CHECK (inventory_number >= 0)
        );
        CREATE INDEX IF NOT EXISTS idx_warehouses_variant ON warehouses(variant_id);
        "#,
    )
}
