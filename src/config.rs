// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CategoryRepository, ProductRepository, PurchaseInvoiceRepository, ReportRepository, SaleInvoiceRepository,
        StockRepository, SupplierRepository, UserRepository,
    },
    services::{auth::AuthService, invoice_service::InvoiceService, report_service::ReportService},
};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

// Configuração lida do ambiente (.env é opcional)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub max_connections: u32,
    pub token_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string());
        let max_connections = parse_or("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let token_ttl_days = parse_or("JWT_EXPIRATION_DAYS", DEFAULT_TOKEN_TTL_DAYS)?;

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr,
            max_connections,
            token_ttl_days,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} inválido: '{}'", key, raw)),
        _ => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub invoice_service: InvoiceService,
    pub report_service: ReportService,
    pub category_repo: CategoryRepository,
    pub product_repo: ProductRepository,
    pub supplier_repo: SupplierRepository,
    pub stock_repo: StockRepository,
    pub purchase_repo: PurchaseInvoiceRepository,
    pub sale_repo: SaleInvoiceRepository,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre uma pool existente.
    pub fn from_pool(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let purchase_repo = PurchaseInvoiceRepository::new(db_pool.clone());
        let sale_repo = SaleInvoiceRepository::new(db_pool.clone());
        let stock_repo = StockRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            config.jwt_secret.clone(),
            config.token_ttl_days,
            db_pool.clone(),
        );
        let invoice_service = InvoiceService::new(purchase_repo.clone(), sale_repo.clone(), db_pool.clone());
        let report_service = ReportService::new(ReportRepository::new(db_pool.clone()), stock_repo.clone());

        Self {
            auth_service,
            invoice_service,
            report_service,
            category_repo: CategoryRepository::new(db_pool.clone()),
            product_repo: ProductRepository::new(db_pool.clone()),
            supplier_repo: SupplierRepository::new(db_pool.clone()),
            stock_repo,
            purchase_repo,
            sale_repo,
            db_pool,
        }
    }
}
