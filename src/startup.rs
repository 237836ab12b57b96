use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use tracing_actix_web::TracingLogger;

use crate::{auth::jwt::Tokenizer, configuration::Settings, routes::{admin::{get_all_inventory_for_admin, get_all_orders_for_admin, patch_product, status::{patch_bean_order_status, patch_delivery_order_status}}, authentication::{login, register}, bean_order::post_bean_order, get_product_catalog, get_settings, health_check, order::{get_my_orders, post_delivery_order}, profile::{get_profile, update_profile}}, utils::DbPool};

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let manager = ConnectionManager::<PgConnection>::new(
            settings.database.get_database_table_url()
        );
        let pool: DbPool = Pool::builder().build(manager)?;

        let tokenizer = Tokenizer::new(&settings.jwt);

        let listener = TcpListener::bind((
            settings.application.host.as_str(),
            settings.application.port
        ))?;
        let port = listener.local_addr()?.port();

        let server = get_server(listener, pool, tokenizer)?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }
}

fn get_server(
    listener: TcpListener,
    pool: DbPool,
    tokenizer: Tokenizer
) -> Result<Server, anyhow::Error>{
    let pool = web::Data::new(pool);
    let tokenizer = web::Data::new(tokenizer);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .route("/users", web::post().to(register))
            .route("/token", web::post().to(login))
            .route("/users/me", web::get().to(get_profile))
            .route("/users/me", web::patch().to(update_profile))
            .route("/products", web::get().to(get_product_catalog))
            .route("/settings", web::get().to(get_settings))
            .route("/orders", web::post().to(post_delivery_order))
            .route("/orders/me", web::get().to(get_my_orders))
            .route("/bean_orders", web::post().to(post_bean_order))
            .route("/admin/all_inventory", web::get().to(get_all_inventory_for_admin))
            .route("/admin/all_orders", web::get().to(get_all_orders_for_admin))
            .route("/admin/orders/{order_id}/status", web::patch().to(patch_delivery_order_status))
            .route("/admin/bean_orders/{order_id}/status", web::patch().to(patch_bean_order_status))
            .route("/admin/products/{product_id}", web::patch().to(patch_product))
            .app_data(pool.clone())
            .app_data(tokenizer.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
