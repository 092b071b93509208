pub mod user_repo;
pub use user_repo::UserRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod purchase_repo;
pub use purchase_repo::PurchaseInvoiceRepository;
pub mod sale_repo;
pub use sale_repo::SaleInvoiceRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
