use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::sync::Arc;
use std::time::Duration;

use storefront::auth::TokenSigner;
use storefront::config::Config;
use storefront::db::{create_pool, init_db, queries, AppState};
use storefront::handlers;
use storefront::models::{
    CreateAccount, CreateCategory, CreateProduct, CreateProductColor, CreateProductImage,
    CreateProductSize, CreateVariant, Role,
};
use storefront::otp::OtpStore;

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "E-commerce backend with VNPay payment reconciliation")]
struct Cli {
    /// Seed the database with dev data (staff account, buyer, one product
    /// with a sellable variant)
    #[arg(long)]
    seed: bool,

    /// Delete the database on exit (dev mode only, useful for fresh starts)
    #[arg(long)]
    ephemeral: bool,
}

/// Seeds the database with dev data for manual testing.
/// Only runs in dev mode and when the database is empty.
fn seed_dev_data(state: &AppState) {
    let conn = state.db.get().expect("Failed to get db connection for seeding");

    let existing = queries::list_accounts(&conn).expect("Failed to list accounts");
    if !existing.is_empty() {
        tracing::info!("Database already has data, skipping seed");
        return;
    }

    tracing::info!("============================================");
    tracing::info!("SEEDING DEV DATA");
    tracing::info!("============================================");

    let admin_password = "admin-dev-password";
    let admin = queries::create_account(
        &conn,
        &CreateAccount {
            username: "admin".to_string(),
            name: "Dev Admin".to_string(),
            email: "admin@storefront.local".to_string(),
            phone: "0900000001".to_string(),
            address: "1 Dev Street".to_string(),
            password: admin_password.to_string(),
            image: None,
            role: Some(Role::Admin),
            acc_status: None,
        },
        &handlers::auth::hash_password(admin_password).expect("Failed to hash password"),
    )
    .expect("Failed to create dev admin");
    tracing::info!("Admin: {} / {}", admin.username, admin_password);

    let buyer_password = "buyer-dev-password";
    let buyer = queries::create_account(
        &conn,
        &CreateAccount {
            username: "buyer".to_string(),
            name: "Dev Buyer".to_string(),
            email: "buyer@storefront.local".to_string(),
            phone: "0900000002".to_string(),
            address: "2 Dev Street".to_string(),
            password: buyer_password.to_string(),
            image: None,
            role: None,
            acc_status: None,
        },
        &handlers::auth::hash_password(buyer_password).expect("Failed to hash password"),
    )
    .expect("Failed to create dev buyer");
    tracing::info!("Buyer: {} / {}", buyer.username, buyer_password);

    let category = queries::create_category(
        &conn,
        &CreateCategory {
            cat_name: "T-Shirts".to_string(),
        },
    )
    .expect("Failed to create dev category");

    let product = queries::create_product(
        &conn,
        &CreateProduct {
            pro_name: "Basic Tee".to_string(),
            cat_id: category.id.clone(),
            pro_price: 150000.0,
            image_url: None,
            description: Some("Plain cotton tee".to_string()),
            status_product: None,
        },
    )
    .expect("Failed to create dev product");

    let color = queries::create_color(
        &conn,
        &CreateProductColor {
            color_name: "Black".to_string(),
        },
    )
    .expect("Failed to create dev color");
    let size = queries::create_size(
        &conn,
        &CreateProductSize {
            size_name: "M".to_string(),
        },
    )
    .expect("Failed to create dev size");
    let image = queries::create_image(
        &conn,
        &CreateProductImage {
            pro_id: product.id.clone(),
            image_url: "https://example.com/basic-tee-black.jpg".to_string(),
        },
    )
    .expect("Failed to create dev image");
    let variant = queries::create_variant(
        &conn,
        &CreateVariant {
            pro_id: product.id.clone(),
            color_id: color.id,
            size_id: size.id,
            image_id: image.id,
        },
    )
    .expect("Failed to create dev variant");

    tracing::info!("Product: {} (id: {})", product.pro_name, product.id);
    tracing::info!("Variant: {}", variant.id);
    tracing::info!("============================================");
    tracing::info!("DEV DATA SEEDED SUCCESSFULLY");
    tracing::info!("============================================");

    println!();
    println!("--- COPY FROM HERE ---");
    println!("  admin_login: admin / {}", admin_password);
    println!("  buyer_login: buyer / {}", buyer_password);
    println!("  product_id: {}", product.id);
    println!("  variant_id: {}", variant.id);
    println!("--- END COPY ---");
    println!();
}

/// Spawns a background task that periodically drops expired OTP codes.
fn spawn_otp_sweep(state: AppState) {
    tokio::spawn(async move {
        let interval = Duration::from_secs(5 * 60);
        loop {
            tokio::time::sleep(interval).await;
            let removed = state.otp.sweep();
            if removed > 0 {
                tracing::debug!("Swept {} expired OTP codes", removed);
            }
        }
    });
    tracing::info!("Background OTP sweep task started (runs every 5 minutes)");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let state = AppState {
        db: db_pool,
        vnpay: config.vnpay.clone(),
        tokens: TokenSigner::new(&config.jwt_secret),
        otp: Arc::new(OtpStore::new(10 * 60)),
    };

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set STOREFRONT_ENV=dev)");
        } else {
            seed_dev_data(&state);
        }
    }

    spawn_otp_sweep(state.clone());

    let app = handlers::api_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    let cleanup_on_exit = cli.ephemeral && config.dev_mode;
    let db_path = config.database_path.clone();
    if cleanup_on_exit {
        tracing::info!("EPHEMERAL MODE: database will be deleted on exit");
    }

    tracing::info!("Storefront server listening on {}", addr);

    // connect_info enables the raw-socket fallback for the payment URL's
    // client-IP parameter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    if cleanup_on_exit {
        tracing::info!("Cleaning up ephemeral database...");
        if let Err(e) = std::fs::remove_file(&db_path) {
            tracing::warn!("Failed to remove {}: {}", db_path, e);
        }
        let _ = std::fs::remove_file(format!("{}-wal", db_path));
        let _ = std::fs::remove_file(format!("{}-shm", db_path));
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
