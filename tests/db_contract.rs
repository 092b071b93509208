// Testes contra um Postgres real. Rodam só com DATABASE_URL definida:
//   cargo test -- --ignored

use chrono::{Days, NaiveDate, Utc};
use rust_decimal_macros::dec;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use gestao::{
    common::error::AppError,
    db::{
        CategoryRepository, ProductRepository, PurchaseInvoiceRepository, ReportRepository, SaleInvoiceRepository,
        StockRepository, SupplierRepository,
    },
    models::{
        category::{CategoryFilters, CategoryPayload},
        invoice::{LineItemPayload, PurchaseInvoicePayload, SaleInvoiceFilters, SaleInvoicePayload},
        product::{ProductPayload, ProductType},
        report::{Period, ReportQuery},
        stock::StockItemPayload,
        supplier::SupplierPayload,
    },
    services::{invoice_service::InvoiceService, report_service::ReportService},
};

async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to create pool");
    sqlx::migrate!().run(&pool).await.expect("Failed to run migrations");
    pool
}

fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn line(product_id: i32, quantity: rust_decimal::Decimal, unit_price: rust_decimal::Decimal) -> LineItemPayload {
    LineItemPayload { product_id, quantity, unit: "UN".into(), unit_price }
}

async fn new_product(pool: &PgPool, name: &str) -> i32 {
    ProductRepository::new(pool.clone())
        .create(
            pool,
            &ProductPayload {
                name: name.to_string(),
                description: None,
                image_url: None,
                active: true,
                product_type: ProductType::Insumo,
                category_id: None,
            },
        )
        .await
        .expect("Failed to create product")
        .id
}

#[tokio::test]
#[ignore]
async fn pages_cover_filtered_rows_without_overlap() {
    let pool = setup_test_db().await;
    let repo = CategoryRepository::new(pool.clone());
    let prefix = format!("pag-{}", tag());

    let mut ids = Vec::new();
    for i in 0..5 {
        let created = repo
            .create(&pool, &CategoryPayload { name: format!("{}-{}", prefix, i) })
            .await
            .unwrap();
        ids.push(created.id);
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let filters = CategoryFilters {
            search: Some(prefix.clone()),
            page: Some(page),
            limit: Some(2),
            ..Default::default()
        };
        let result = repo.find_per_page(&filters).await.unwrap();
        assert_eq!(result.total, 5);
        assert!(result.items.len() <= 2);
        seen.extend(result.items.iter().map(|c| c.id));
    }

    // Página além do fim: vazia, mas com o total real
    let beyond = repo
        .find_per_page(&CategoryFilters {
            search: Some(prefix.clone()),
            page: Some(4),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);

    seen.sort_unstable();
    let mut expected = ids.clone();
    expected.sort_unstable();
    assert_eq!(seen, expected);

    for id in ids {
        repo.delete(&pool, id).await.unwrap();
    }
}

#[tokio::test]
#[ignore]
async fn invoice_total_follows_items_on_create_and_update() {
    let pool = setup_test_db().await;
    let service = InvoiceService::new(
        PurchaseInvoiceRepository::new(pool.clone()),
        SaleInvoiceRepository::new(pool.clone()),
        pool.clone(),
    );
    let supplier = SupplierRepository::new(pool.clone())
        .create(
            &pool,
            &SupplierPayload { name: format!("Fornecedor {}", tag()), tax_id: None, phone: None, email: None },
        )
        .await
        .unwrap();
    let product = new_product(&pool, &format!("Farinha {}", tag())).await;

    let created = service
        .create_purchase(&PurchaseInvoicePayload {
            date: date(2026, 10, 1),
            supplier_id: supplier.id,
            items: vec![line(product, dec!(2), dec!(10.50)), line(product, dec!(1), dec!(4))],
        })
        .await
        .unwrap();
    assert_eq!(created.total, dec!(25));
    assert_eq!(created.items.len(), 2);

    let updated = service
        .update_purchase(
            created.id,
            &PurchaseInvoicePayload {
                date: date(2026, 10, 2),
                supplier_id: supplier.id,
                items: vec![line(product, dec!(3), dec!(1.25))],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total, dec!(3.75));
    assert_eq!(updated.items.len(), 1);

    PurchaseInvoiceRepository::new(pool.clone()).delete(&pool, created.id).await.unwrap();
    SupplierRepository::new(pool.clone()).delete(&pool, supplier.id).await.unwrap();
    ProductRepository::new(pool.clone()).delete(&pool, product).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn sale_filter_by_product_matches_invoice_lines() {
    let pool = setup_test_db().await;
    let sales = SaleInvoiceRepository::new(pool.clone());
    let service = InvoiceService::new(PurchaseInvoiceRepository::new(pool.clone()), sales.clone(), pool.clone());

    let product = new_product(&pool, &format!("Pastel {}", tag())).await;
    let other = new_product(&pool, &format!("Suco {}", tag())).await;

    let with_product = service
        .create_sale(&SaleInvoicePayload { date: date(2026, 10, 5), items: vec![line(product, dec!(1), dec!(8))] })
        .await
        .unwrap();
    let without = service
        .create_sale(&SaleInvoicePayload { date: date(2026, 10, 5), items: vec![line(other, dec!(1), dec!(6))] })
        .await
        .unwrap();

    let page = sales
        .find_per_page(&SaleInvoiceFilters { product_id: Some(product), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, with_product.id);

    sales.delete(&pool, with_product.id).await.unwrap();
    sales.delete(&pool, without.id).await.unwrap();
    let products = ProductRepository::new(pool.clone());
    products.delete(&pool, product).await.unwrap();
    products.delete(&pool, other).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn referenced_product_cannot_be_deleted() {
    let pool = setup_test_db().await;
    let product = new_product(&pool, &format!("Queijo {}", tag())).await;
    let stock = StockRepository::new(pool.clone());

    let item = stock
        .create(
            &pool,
            &StockItemPayload {
                product_id: product,
                unit_price: dec!(30),
                quantity: dec!(2),
                unit: "KG".into(),
                expiry_date: Some(date(2026, 12, 31)),
                stockable: true,
            },
        )
        .await
        .unwrap();

    let result = ProductRepository::new(pool.clone()).delete(&pool, product).await;
    assert!(matches!(result, Err(AppError::InUse(_))), "got {:?}", result);

    stock.delete(&pool, item.id).await.unwrap();
    ProductRepository::new(pool.clone()).delete(&pool, product).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn unknown_supplier_is_an_invalid_reference() {
    let pool = setup_test_db().await;
    let service = InvoiceService::new(
        PurchaseInvoiceRepository::new(pool.clone()),
        SaleInvoiceRepository::new(pool.clone()),
        pool.clone(),
    );
    let product = new_product(&pool, &format!("Óleo {}", tag())).await;

    let result = service
        .create_purchase(&PurchaseInvoicePayload {
            date: date(2026, 10, 1),
            supplier_id: i32::MAX,
            items: vec![line(product, dec!(1), dec!(1))],
        })
        .await;
    assert!(matches!(result, Err(AppError::InvalidReference(_))), "got {:?}", result);

    ProductRepository::new(pool.clone()).delete(&pool, product).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn missing_rows_are_not_found() {
    let pool = setup_test_db().await;
    let categories = CategoryRepository::new(pool.clone());

    assert!(categories.find_by_id(i32::MAX).await.unwrap().is_none());
    let result = categories
        .update(&pool, i32::MAX, &CategoryPayload { name: "Fantasma".into() })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(matches!(categories.delete(&pool, i32::MAX).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn created_row_is_found_until_deleted() {
    let pool = setup_test_db().await;
    let suppliers = SupplierRepository::new(pool.clone());

    let created = suppliers
        .create(
            &pool,
            &SupplierPayload {
                name: format!("Laticínios {}", tag()),
                tax_id: Some("12.345.678/0001-90".into()),
                phone: Some("(11) 99999-0000".into()),
                email: Some("contato@laticinios.com".into()),
            },
        )
        .await
        .unwrap();

    let found = suppliers.find_by_id(created.id).await.unwrap().expect("supplier");
    assert_eq!(found.name, created.name);
    assert_eq!(found.tax_id.as_deref(), Some("12.345.678/0001-90"));

    suppliers.delete(&pool, created.id).await.unwrap();
    assert!(suppliers.find_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn search_wildcards_match_literally() {
    let pool = setup_test_db().await;
    let repo = CategoryRepository::new(pool.clone());
    let prefix = tag();

    let literal = repo
        .create(&pool, &CategoryPayload { name: format!("{}_a", prefix) })
        .await
        .unwrap();
    let other = repo
        .create(&pool, &CategoryPayload { name: format!("{}xa", prefix) })
        .await
        .unwrap();

    let result = repo
        .find_per_page(&CategoryFilters { search: Some(format!("{}_", prefix)), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].id, literal.id);

    repo.delete(&pool, literal.id).await.unwrap();
    repo.delete(&pool, other.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn writes_return_joined_names() {
    let pool = setup_test_db().await;
    let category = CategoryRepository::new(pool.clone())
        .create(&pool, &CategoryPayload { name: format!("Laticínios {}", tag()) })
        .await
        .unwrap();
    let products = ProductRepository::new(pool.clone());
    let product = products
        .create(
            &pool,
            &ProductPayload {
                name: format!("Manteiga {}", tag()),
                description: None,
                image_url: None,
                active: true,
                product_type: ProductType::Insumo,
                category_id: Some(category.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(product.category_name.as_deref(), Some(category.name.as_str()));

    let stock = StockRepository::new(pool.clone());
    let item = stock
        .create(
            &pool,
            &StockItemPayload {
                product_id: product.id,
                unit_price: dec!(12),
                quantity: dec!(3),
                unit: "UN".into(),
                expiry_date: None,
                stockable: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(item.product_name.as_deref(), Some(product.name.as_str()));

    stock.delete(&pool, item.id).await.unwrap();
    products.delete(&pool, product.id).await.unwrap();
    CategoryRepository::new(pool.clone()).delete(&pool, category.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn future_dated_sales_stay_out_of_reports() {
    let pool = setup_test_db().await;
    let sales = SaleInvoiceRepository::new(pool.clone());
    let service = InvoiceService::new(PurchaseInvoiceRepository::new(pool.clone()), sales.clone(), pool.clone());
    let reports = ReportService::new(ReportRepository::new(pool.clone()), StockRepository::new(pool.clone()));

    let product = new_product(&pool, &format!("Coxinha {}", tag())).await;
    let today = Utc::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap();

    let current = service
        .create_sale(&SaleInvoicePayload { date: today, items: vec![line(product, dec!(1), dec!(8))] })
        .await
        .unwrap();
    let future = service
        .create_sale(&SaleInvoicePayload { date: tomorrow, items: vec![line(product, dec!(5), dec!(8))] })
        .await
        .unwrap();

    let turnover = reports
        .stock_turnover(&ReportQuery { periodo: Some(Period::Semana), ..Default::default() })
        .await
        .unwrap();
    let row = turnover.iter().find(|r| r.product_id == product).expect("product row");
    assert_eq!(row.quantity_sold, dec!(1));

    sales.delete(&pool, current.id).await.unwrap();
    sales.delete(&pool, future.id).await.unwrap();
    ProductRepository::new(pool.clone()).delete(&pool, product).await.unwrap();
}
