use std::error::Error;

use coffee_shop::{configuration::{DatabaseSettings, Settings}, models::{BeanStock, NewUser, Product}, password::compute_password_hash, routes::authentication::TokenResponse, schema::{bean_inventory, products, users}, startup::Application, telemetry::{get_subscriber, init_subscriber}, utils::DbPool};
use diesel::{pg::Pg, r2d2::ConnectionManager, Connection, PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use fake::{faker::internet::en::SafeEmail, Fake};
use once_cell::sync::Lazy;
use r2d2::Pool;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "coffee-shop-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }

    ()
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub api_client: reqwest::Client
}

// A registered user together with the bearer token of their session
pub struct TestUser{
    pub id: i32,
    pub email: String,
    pub token: String
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(&settings.get_database_url())
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = Pool::new(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
            .expect("Failed to build connection pool to test database");

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let mut settings = Settings::get();
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();

        let pool = TestApp::create_db(&settings.database);

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.server);

        let api_client = reqwest::Client::builder()
                            .build()
                            .unwrap();

        TestApp{
            host,
            port,
            pool,
            api_client
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> String{
        let response = self.api_client
            .post(format!("{}/token", self.get_app_url()))
            .form(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to send request to token endpoint");

        assert_eq!(response.status().as_u16(), 200);

        response.json::<TokenResponse>()
            .await
            .expect("Failed to deserialize token response")
            .access_token
    }

    pub async fn create_user_and_login(&self) -> TestUser{
        let email: String = SafeEmail().fake();

        let response = self.api_client
            .post(format!("{}/users", self.get_app_url()))
            .json(&serde_json::json!({
                "email": email,
                "name": "Taro Yamada",
                "password": "testpassword"
            }))
            .send()
            .await
            .expect("Failed to send request to users endpoint");

        assert_eq!(response.status().as_u16(), 201);

        let body = response.json::<serde_json::Value>().await.unwrap();
        let id = body["id"].as_i64().unwrap() as i32;

        let token = self.login(&email, "testpassword").await;

        TestUser{ id, email, token }
    }

    // Admins are provisioned out of band, so the row goes in directly
    pub async fn create_admin_and_login(&self) -> TestUser{
        let email: String = SafeEmail().fake();

        let password_hash = compute_password_hash(SecretString::from("adminpassword"))
            .expect("Failed to hash password");

        let admin = NewUser{
            name: "Shop Owner".to_string(),
            email: email.clone(),
            password: password_hash.expose_secret().to_string(),
            preferred_beans: None,
            is_admin: true
        };

        let mut conn = self.pool.get().unwrap();
        let id: i32 = diesel::insert_into(users::table)
            .values(&admin)
            .returning(users::id)
            .get_result(&mut conn)
            .expect("Failed to insert admin user");

        let token = self.login(&email, "adminpassword").await;

        TestUser{ id, email, token }
    }

    pub fn seed_bean_stock(&self, name: &str, stock: i32){
        let mut conn = self.pool.get().unwrap();

        diesel::insert_into(bean_inventory::table)
            .values(BeanStock{ name: name.to_string(), stock })
            .execute(&mut conn)
            .expect("Failed to seed bean inventory");
    }

    pub fn seed_product(&self, id: &str, name: &str, price: i32, stock: i32){
        let mut conn = self.pool.get().unwrap();

        let product = Product{
            id: id.to_string(),
            name: name.to_string(),
            description: "Single origin roasted beans".to_string(),
            price,
            stock,
            image_url: format!("/images/{}.jpg", id)
        };

        diesel::insert_into(products::table)
            .values(&product)
            .execute(&mut conn)
            .expect("Failed to seed product");
    }

    pub fn get_bean_stock(&self, name: &str) -> i32{
        use diesel::{ExpressionMethods, QueryDsl};

        let mut conn = self.pool.get().unwrap();
        bean_inventory::table
            .filter(bean_inventory::name.eq(name))
            .select(bean_inventory::stock)
            .get_result::<i32>(&mut conn)
            .expect("Failed to read bean stock")
    }

    pub fn get_product_stock(&self, id: &str) -> i32{
        use diesel::{ExpressionMethods, QueryDsl};

        let mut conn = self.pool.get().unwrap();
        products::table
            .filter(products::id.eq(id))
            .select(products::stock)
            .get_result::<i32>(&mut conn)
            .expect("Failed to read product stock")
    }
}
