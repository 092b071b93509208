// src/services/invoice_service.rs

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;

use crate::{
    common::{
        decimal::{checked_sum, line_value},
        error::AppError,
    },
    db::{PurchaseInvoiceRepository, SaleInvoiceRepository},
    models::invoice::{LineItemPayload, PurchaseInvoice, PurchaseInvoicePayload, SaleInvoice, SaleInvoicePayload},
};

/// Total da nota: soma de quantidade x preço unitário, em centavos.
/// Único lugar onde o total é calculado; create e update sempre passam por aqui.
pub fn invoice_total(items: &[LineItemPayload]) -> Result<Decimal, AppError> {
    let total = checked_sum(items.iter().map(|i| line_value(i.quantity, i.unit_price)))?;
    Ok(total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[derive(Clone)]
pub struct InvoiceService {
    purchase_repo: PurchaseInvoiceRepository,
    sale_repo: SaleInvoiceRepository,
    pool: PgPool,
}

impl InvoiceService {
    pub fn new(purchase_repo: PurchaseInvoiceRepository, sale_repo: SaleInvoiceRepository, pool: PgPool) -> Self {
        Self { purchase_repo, sale_repo, pool }
    }

    // --- COMPRA ---

    pub async fn create_purchase(&self, payload: &PurchaseInvoicePayload) -> Result<PurchaseInvoice, AppError> {
        let total = invoice_total(&payload.items)?;
        let mut tx = self.pool.begin().await?;

        let invoice = self
            .purchase_repo
            .insert_header(&mut *tx, payload.date, payload.supplier_id, total)
            .await?;
        self.purchase_repo
            .insert_items(&mut *tx, invoice.id, &payload.items)
            .await?;

        tx.commit().await?;
        tracing::info!("🧾 Nota de compra {} criada (total {}).", invoice.id, total);

        self.purchase_repo
            .find_by_id(invoice.id)
            .await?
            .ok_or(AppError::NotFound("Nota fiscal de compra"))
    }

    /// Substitui cabeçalho e itens da nota.
    pub async fn update_purchase(
        &self,
        id: i32,
        payload: &PurchaseInvoicePayload,
    ) -> Result<PurchaseInvoice, AppError> {
        let total = invoice_total(&payload.items)?;
        let mut tx = self.pool.begin().await?;

        self.purchase_repo
            .update_header(&mut *tx, id, payload.date, payload.supplier_id, total)
            .await?;
        self.purchase_repo.delete_items(&mut *tx, id).await?;
        self.purchase_repo.insert_items(&mut *tx, id, &payload.items).await?;

        tx.commit().await?;
        tracing::info!("🧾 Nota de compra {} atualizada (total {}).", id, total);

        self.purchase_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Nota fiscal de compra"))
    }

    // --- VENDA ---

    pub async fn create_sale(&self, payload: &SaleInvoicePayload) -> Result<SaleInvoice, AppError> {
        let total = invoice_total(&payload.items)?;
        let mut tx = self.pool.begin().await?;

        let invoice = self.sale_repo.insert_header(&mut *tx, payload.date, total).await?;
        self.sale_repo.insert_items(&mut *tx, invoice.id, &payload.items).await?;

        tx.commit().await?;
        tracing::info!("🧾 Nota de venda {} criada (total {}).", invoice.id, total);

        self.sale_repo
            .find_by_id(invoice.id)
            .await?
            .ok_or(AppError::NotFound("Nota fiscal de venda"))
    }

    pub async fn update_sale(&self, id: i32, payload: &SaleInvoicePayload) -> Result<SaleInvoice, AppError> {
        let total = invoice_total(&payload.items)?;
        let mut tx = self.pool.begin().await?;

        self.sale_repo.update_header(&mut *tx, id, payload.date, total).await?;
        self.sale_repo.delete_items(&mut *tx, id).await?;
        self.sale_repo.insert_items(&mut *tx, id, &payload.items).await?;

        tx.commit().await?;
        tracing::info!("🧾 Nota de venda {} atualizada (total {}).", id, total);

        self.sale_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Nota fiscal de venda"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use validator::Validate;

    fn item(quantity: Decimal, unit_price: Decimal) -> LineItemPayload {
        LineItemPayload { product_id: 1, quantity, unit: "UN".into(), unit_price }
    }

    #[test]
    fn total_is_sum_of_quantity_times_price() {
        let items = vec![item(dec!(2), dec!(10.50)), item(dec!(0.5), dec!(3))];
        assert_eq!(invoice_total(&items).unwrap(), dec!(22.50));
    }

    #[test]
    fn total_rounds_to_cents() {
        // 0.333 kg a 10.00 = 3.33
        assert_eq!(invoice_total(&[item(dec!(0.333), dec!(10))]).unwrap(), dec!(3.33));
        assert_eq!(invoice_total(&[item(dec!(1), dec!(0.005))]).unwrap(), dec!(0.01));
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let items = vec![item(Decimal::MAX, dec!(2))];
        assert!(matches!(invoice_total(&items), Err(AppError::ArithmeticOverflow)));
    }

    #[test]
    fn huge_line_values_fail_validation() {
        let huge: Decimal = serde_json::from_str("1e20").unwrap();
        let payload = SaleInvoicePayload {
            date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            items: vec![item(huge, huge)],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn blank_unit_is_invalid() {
        let mut line = item(dec!(1), dec!(1));
        line.unit = "  ".into();
        let errors = line.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("unit"));
    }

    #[test]
    fn invoice_without_items_is_invalid() {
        let payload = SaleInvoicePayload {
            date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            items: vec![],
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn nested_item_errors_are_reported() {
        let payload = SaleInvoicePayload {
            date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            items: vec![item(dec!(0), dec!(5))],
        };
        assert!(payload.validate().is_err());
    }
}
