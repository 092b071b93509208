// src/services/report_service.rs
// Relatórios gerenciais. O repositório traz as linhas brutas; aqui só há
// agrupamento e razões em memória, sem estado entre chamadas.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::{
        decimal::{checked_add, checked_div, checked_sum, line_value},
        error::AppError,
    },
    db::{ReportRepository, StockRepository},
    models::{
        report::{
            AbcClass, AbcEntry, CategoryRevenue, LowStockAlert, Period, ProductRow, PurchaseLineRow,
            ReportQuery, ReportSummary, SaleLineRow, StockRow, StockTurnover, SupplierPurchases, TopProduct,
        },
        stock::StockItem,
    },
};

pub const DEFAULT_LOW_STOCK_THRESHOLD: Decimal = Decimal::TEN;
pub const DEFAULT_RANKING_SIZE: i64 = 10;
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;
pub const MAX_EXPIRY_WINDOW_DAYS: i64 = 3650;
const UNCATEGORIZED: &str = "Sem categoria";

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
    stock_repo: StockRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository, stock_repo: StockRepository) -> Self {
        Self { repo, stock_repo }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub async fn summary(&self, query: &ReportQuery) -> Result<ReportSummary, AppError> {
        let period = query.period();
        let today = Self::today();
        let since = period.start_date(today);

        let sales = self.repo.sale_lines(since, today).await?;
        // Custo médio usa todo o histórico de compras, não só o período
        let all_purchases = self.repo.purchase_lines(None, today).await?;
        let period_purchases: Vec<PurchaseLineRow> = match since {
            Some(start) => all_purchases.iter().filter(|p| p.date >= start).cloned().collect(),
            None => all_purchases.clone(),
        };
        let stock = self.repo.stock().await?;
        let products = self.repo.products().await?;

        summarize(
            period,
            &sales,
            &period_purchases,
            &all_purchases,
            &stock,
            &products,
            query.limite.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        )
    }

    pub async fn revenue_by_category(&self, query: &ReportQuery) -> Result<Vec<CategoryRevenue>, AppError> {
        let today = Self::today();
        let sales = self.repo.sale_lines(query.period().start_date(today), today).await?;
        revenue_by_category(&sales)
    }

    pub async fn abc_curve(&self) -> Result<Vec<AbcEntry>, AppError> {
        let stock = self.repo.stock().await?;
        abc_curve(&stock)
    }

    pub async fn low_stock(&self, query: &ReportQuery) -> Result<Vec<LowStockAlert>, AppError> {
        let stock = self.repo.stock().await?;
        let products = self.repo.products().await?;
        low_stock(
            &products,
            &stock,
            query.limite.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        )
    }

    pub async fn stock_turnover(&self, query: &ReportQuery) -> Result<Vec<StockTurnover>, AppError> {
        let period = query.period();
        let today = Self::today();
        let sales = self.repo.sale_lines(period.start_date(today), today).await?;
        let stock = self.repo.stock().await?;
        let products = self.repo.products().await?;

        let days = period_days(period, &sales, today);
        stock_turnover(&products, &sales, &stock, days)
    }

    pub async fn top_products(&self, query: &ReportQuery) -> Result<Vec<TopProduct>, AppError> {
        let today = Self::today();
        let sales = self.repo.sale_lines(query.period().start_date(today), today).await?;
        let limit = query.limit.unwrap_or(DEFAULT_RANKING_SIZE).clamp(1, 100) as usize;
        top_products(&sales, limit)
    }

    pub async fn purchases_by_supplier(&self, query: &ReportQuery) -> Result<Vec<SupplierPurchases>, AppError> {
        let today = Self::today();
        let purchases = self.repo.purchase_lines(query.period().start_date(today), today).await?;
        purchases_by_supplier(&purchases)
    }

    pub async fn expiring_stock(&self, query: &ReportQuery) -> Result<Vec<StockItem>, AppError> {
        let until = expiry_limit(Self::today(), query.dias)?;
        self.stock_repo.find_expiring(until).await
    }
}

// =============================================================================
//  AGREGAÇÃO PURA
// =============================================================================

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// part / total * 100, ou zero quando não há total.
fn percent(part: Decimal, total: Decimal) -> Result<Decimal, AppError> {
    if total.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let scaled = part
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(AppError::ArithmeticOverflow)?;
    checked_div(scaled, total)
}

/// Último dia da janela de vencimento. `dias` fica entre 0 e MAX_EXPIRY_WINDOW_DAYS.
pub fn expiry_limit(today: NaiveDate, dias: Option<i64>) -> Result<NaiveDate, AppError> {
    let days = dias
        .unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS)
        .clamp(0, MAX_EXPIRY_WINDOW_DAYS);
    today
        .checked_add_days(Days::new(days as u64))
        .ok_or(AppError::ArithmeticOverflow)
}

/// Quantidade em estoque por produto, somando só os itens estocáveis.
pub fn stock_by_product(stock: &[StockRow]) -> Result<HashMap<i32, Decimal>, AppError> {
    let mut totals: HashMap<i32, Decimal> = HashMap::new();
    for row in stock.iter().filter(|s| s.stockable) {
        let total = totals.entry(row.product_id).or_default();
        *total = checked_add(*total, row.quantity)?;
    }
    Ok(totals)
}

/// Acumula (quantidade, valor) por produto numa passada só.
fn accumulate<'a>(
    lines: impl Iterator<Item = (i32, &'a Decimal, &'a Decimal)>,
) -> Result<HashMap<i32, (Decimal, Decimal)>, AppError> {
    let mut acc: HashMap<i32, (Decimal, Decimal)> = HashMap::new();
    for (product_id, quantity, unit_price) in lines {
        let (qty, value) = acc.entry(product_id).or_default();
        *qty = checked_add(*qty, *quantity)?;
        *value = checked_add(*value, line_value(*quantity, *unit_price)?)?;
    }
    Ok(acc)
}

/// Custo unitário médio por produto: média ponderada das compras; produtos
/// nunca comprados usam o preço médio dos itens de estoque.
pub fn average_unit_costs(
    purchases: &[PurchaseLineRow],
    stock: &[StockRow],
) -> Result<HashMap<i32, Decimal>, AppError> {
    let bought = accumulate(purchases.iter().map(|p| (p.product_id, &p.quantity, &p.unit_price)))?;
    let stocked = accumulate(stock.iter().map(|s| (s.product_id, &s.quantity, &s.unit_price)))?;

    let mut costs = HashMap::new();
    for (product_id, (qty, value)) in stocked.into_iter().chain(bought) {
        // Compras entram por último e sobrescrevem o preço de estoque
        if !qty.is_zero() {
            costs.insert(product_id, checked_div(value, qty)?);
        }
    }
    Ok(costs)
}

pub fn summarize(
    period: Period,
    sales: &[SaleLineRow],
    period_purchases: &[PurchaseLineRow],
    all_purchases: &[PurchaseLineRow],
    stock: &[StockRow],
    products: &[ProductRow],
    low_stock_threshold: Decimal,
) -> Result<ReportSummary, AppError> {
    let costs = average_unit_costs(all_purchases, stock)?;

    let revenue = checked_sum(sales.iter().map(|s| line_value(s.quantity, s.unit_price)))?;
    let cost_of_goods_sold = checked_sum(
        sales
            .iter()
            .map(|s| line_value(s.quantity, costs.get(&s.product_id).copied().unwrap_or_default())),
    )?;
    let sales_count = sales.iter().map(|s| s.invoice_id).collect::<HashSet<_>>().len() as i64;

    let purchase_total = checked_sum(period_purchases.iter().map(|p| line_value(p.quantity, p.unit_price)))?;
    let stock_value = checked_sum(
        stock
            .iter()
            .filter(|s| s.stockable)
            .map(|s| line_value(s.quantity, s.unit_price)),
    )?;

    let gross_profit = revenue
        .checked_sub(cost_of_goods_sold)
        .ok_or(AppError::ArithmeticOverflow)?;
    let margin_percent = if revenue.is_zero() {
        None
    } else {
        Some(round2(percent(gross_profit, revenue)?))
    };
    let average_ticket = if sales_count == 0 {
        Decimal::ZERO
    } else {
        checked_div(revenue, Decimal::from(sales_count))?
    };

    Ok(ReportSummary {
        period,
        revenue: round2(revenue),
        sales_count,
        average_ticket: round2(average_ticket),
        purchase_total: round2(purchase_total),
        cost_of_goods_sold: round2(cost_of_goods_sold),
        gross_profit: round2(gross_profit),
        margin_percent,
        stock_value: round2(stock_value),
        low_stock_count: low_stock(products, stock, low_stock_threshold)?.len() as i64,
    })
}

pub fn revenue_by_category(sales: &[SaleLineRow]) -> Result<Vec<CategoryRevenue>, AppError> {
    let mut groups: HashMap<Option<i32>, (String, Decimal, Decimal)> = HashMap::new();
    for line in sales {
        let entry = groups.entry(line.category_id).or_insert_with(|| {
            let name = line.category_name.clone().unwrap_or_else(|| UNCATEGORIZED.to_string());
            (name, Decimal::ZERO, Decimal::ZERO)
        });
        entry.1 = checked_add(entry.1, line_value(line.quantity, line.unit_price)?)?;
        entry.2 = checked_add(entry.2, line.quantity)?;
    }

    let total = checked_sum(groups.values().map(|(_, revenue, _)| Ok(*revenue)))?;
    let mut rows = Vec::with_capacity(groups.len());
    for (category_id, (category_name, revenue, quantity)) in groups {
        rows.push(CategoryRevenue {
            category_id,
            category_name,
            revenue: round2(revenue),
            quantity: round2(quantity),
            share_percent: round2(percent(revenue, total)?),
        });
    }

    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.category_name.cmp(&b.category_name)));
    Ok(rows)
}

/// Curva ABC pelo valor em estoque (quantidade x preço unitário).
/// Participação acumulada <= 80% é A, <= 95% é B, o resto é C.
pub fn abc_curve(stock: &[StockRow]) -> Result<Vec<AbcEntry>, AppError> {
    let mut values: HashMap<i32, (String, Decimal)> = HashMap::new();
    for row in stock.iter().filter(|s| s.stockable) {
        let entry = values
            .entry(row.product_id)
            .or_insert_with(|| (row.product_name.clone(), Decimal::ZERO));
        entry.1 = checked_add(entry.1, line_value(row.quantity, row.unit_price)?)?;
    }

    let mut ranked: Vec<(i32, String, Decimal)> = values
        .into_iter()
        .filter(|(_, (_, value))| *value > Decimal::ZERO)
        .map(|(id, (name, value))| (id, name, value))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

    let total = checked_sum(ranked.iter().map(|(_, _, value)| Ok(*value)))?;
    if total.is_zero() {
        return Ok(Vec::new());
    }

    let a_limit = Decimal::from(80);
    let b_limit = Decimal::from(95);
    let mut cumulative = Decimal::ZERO;
    let mut curve = Vec::with_capacity(ranked.len());

    for (product_id, product_name, value) in ranked {
        cumulative = checked_add(cumulative, value)?;
        let cumulative_share = percent(cumulative, total)?;
        let class = if cumulative_share <= a_limit {
            AbcClass::A
        } else if cumulative_share <= b_limit {
            AbcClass::B
        } else {
            AbcClass::C
        };
        curve.push(AbcEntry {
            product_id,
            product_name,
            value: round2(value),
            share_percent: round2(percent(value, total)?),
            cumulative_percent: round2(cumulative_share),
            class,
        });
    }
    Ok(curve)
}

/// Produtos ativos com estoque abaixo do limite; sem estoque conta como zero.
pub fn low_stock(
    products: &[ProductRow],
    stock: &[StockRow],
    threshold: Decimal,
) -> Result<Vec<LowStockAlert>, AppError> {
    let quantities = stock_by_product(stock)?;

    let mut alerts: Vec<LowStockAlert> = products
        .iter()
        .filter(|p| p.active)
        .filter_map(|p| {
            let quantity = quantities.get(&p.id).copied().unwrap_or_default();
            (quantity < threshold).then(|| LowStockAlert {
                product_id: p.id,
                product_name: p.name.clone(),
                quantity: round2(quantity),
                threshold,
            })
        })
        .collect();

    alerts.sort_by(|a, b| a.quantity.cmp(&b.quantity).then_with(|| a.product_name.cmp(&b.product_name)));
    Ok(alerts)
}

/// Dias do período. Para TUDO, conta desde a primeira venda (mínimo 1).
pub fn period_days(period: Period, sales: &[SaleLineRow], today: NaiveDate) -> Decimal {
    let days = match period.days() {
        Some(days) => days,
        None => sales
            .iter()
            .map(|s| s.date)
            .min()
            .map(|first| (today - first).num_days() + 1)
            .unwrap_or(1),
    };
    Decimal::from(days.max(1))
}

pub fn stock_turnover(
    products: &[ProductRow],
    sales: &[SaleLineRow],
    stock: &[StockRow],
    period_days: Decimal,
) -> Result<Vec<StockTurnover>, AppError> {
    let quantities = stock_by_product(stock)?;
    let mut sold: HashMap<i32, Decimal> = HashMap::new();
    for line in sales {
        let total = sold.entry(line.product_id).or_default();
        *total = checked_add(*total, line.quantity)?;
    }

    let mut rows = Vec::new();
    for p in products {
        let quantity_sold = sold.get(&p.id).copied().unwrap_or_default();
        let current_stock = quantities.get(&p.id).copied().unwrap_or_default();
        if quantity_sold.is_zero() && current_stock.is_zero() {
            continue;
        }

        let average_daily_sales = checked_div(quantity_sold, period_days)?;
        let turnover = if current_stock.is_zero() {
            None
        } else {
            Some(round2(checked_div(quantity_sold, current_stock)?))
        };
        let coverage_days = if average_daily_sales.is_zero() {
            None
        } else {
            Some(round2(checked_div(current_stock, average_daily_sales)?))
        };

        rows.push(StockTurnover {
            product_id: p.id,
            product_name: p.name.clone(),
            quantity_sold: round2(quantity_sold),
            current_stock: round2(current_stock),
            average_daily_sales: round2(average_daily_sales),
            turnover,
            coverage_days,
        });
    }

    // Maior giro primeiro; sem giro calculável vai para o fim
    rows.sort_by(|a, b| {
        b.turnover
            .cmp(&a.turnover)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    Ok(rows)
}

pub fn top_products(sales: &[SaleLineRow], limit: usize) -> Result<Vec<TopProduct>, AppError> {
    let mut totals: HashMap<i32, TopProduct> = HashMap::new();
    for line in sales {
        let entry = totals.entry(line.product_id).or_insert_with(|| TopProduct {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity: Decimal::ZERO,
            revenue: Decimal::ZERO,
        });
        entry.quantity = checked_add(entry.quantity, line.quantity)?;
        entry.revenue = checked_add(entry.revenue, line_value(line.quantity, line.unit_price)?)?;
    }

    let mut ranked: Vec<TopProduct> = totals.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.product_id.cmp(&b.product_id)));
    ranked.truncate(limit);
    for row in &mut ranked {
        row.quantity = round2(row.quantity);
        row.revenue = round2(row.revenue);
    }
    Ok(ranked)
}

pub fn purchases_by_supplier(purchases: &[PurchaseLineRow]) -> Result<Vec<SupplierPurchases>, AppError> {
    let mut totals: HashMap<i32, (String, HashSet<i32>, Decimal)> = HashMap::new();
    for line in purchases {
        let entry = totals
            .entry(line.supplier_id)
            .or_insert_with(|| (line.supplier_name.clone(), HashSet::new(), Decimal::ZERO));
        entry.1.insert(line.invoice_id);
        entry.2 = checked_add(entry.2, line_value(line.quantity, line.unit_price)?)?;
    }

    let mut rows: Vec<SupplierPurchases> = totals
        .into_iter()
        .map(|(supplier_id, (supplier_name, invoices, total))| SupplierPurchases {
            supplier_id,
            supplier_name,
            invoice_count: invoices.len() as i64,
            total: round2(total),
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.supplier_name.cmp(&b.supplier_name)));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn sale(invoice_id: i32, product_id: i32, category: Option<(i32, &str)>, qty: Decimal, price: Decimal) -> SaleLineRow {
        SaleLineRow {
            invoice_id,
            date: date(10),
            product_id,
            product_name: format!("Produto {}", product_id),
            category_id: category.map(|(id, _)| id),
            category_name: category.map(|(_, name)| name.to_string()),
            quantity: qty,
            unit_price: price,
        }
    }

    fn purchase(invoice_id: i32, supplier_id: i32, product_id: i32, qty: Decimal, price: Decimal) -> PurchaseLineRow {
        PurchaseLineRow {
            invoice_id,
            date: date(1),
            supplier_id,
            supplier_name: format!("Fornecedor {}", supplier_id),
            product_id,
            quantity: qty,
            unit_price: price,
        }
    }

    fn stock(product_id: i32, qty: Decimal, price: Decimal) -> StockRow {
        StockRow {
            product_id,
            product_name: format!("Produto {}", product_id),
            quantity: qty,
            unit_price: price,
            stockable: true,
        }
    }

    fn product(id: i32, active: bool) -> ProductRow {
        ProductRow { id, name: format!("Produto {}", id), active }
    }

    #[test]
    fn abc_shares_sum_to_one_hundred() {
        let rows = vec![
            stock(1, dec!(10), dec!(70)), // 700
            stock(2, dec!(10), dec!(15)), // 150
            stock(3, dec!(10), dec!(10)), // 100
            stock(4, dec!(10), dec!(5)),  // 50
        ];
        let curve = abc_curve(&rows).unwrap();

        let total: Decimal = curve.iter().map(|e| e.share_percent).sum();
        assert_eq!(total, dec!(100));
        assert_eq!(curve.last().unwrap().cumulative_percent, dec!(100));
    }

    #[test]
    fn abc_classes_follow_thresholds() {
        let rows = vec![
            stock(1, dec!(1), dec!(500)), // 50%  -> acumulado 50
            stock(2, dec!(1), dec!(300)), // 30%  -> acumulado 80
            stock(3, dec!(1), dec!(100)), // 10%  -> acumulado 90
            stock(4, dec!(1), dec!(50)),  // 5%   -> acumulado 95
            stock(5, dec!(1), dec!(50)),  // 5%   -> acumulado 100
        ];
        let classes: Vec<(i32, AbcClass)> = abc_curve(&rows).unwrap().iter().map(|e| (e.product_id, e.class)).collect();

        assert_eq!(
            classes,
            vec![
                (1, AbcClass::A),
                (2, AbcClass::A),
                (3, AbcClass::B),
                (4, AbcClass::B),
                (5, AbcClass::C),
            ]
        );
    }

    #[test]
    fn abc_ignores_non_stockable_and_zero_value() {
        let mut hidden = stock(1, dec!(100), dec!(100));
        hidden.stockable = false;
        let rows = vec![hidden, stock(2, dec!(0), dec!(9)), stock(3, dec!(2), dec!(5))];

        let curve = abc_curve(&rows).unwrap();
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].product_id, 3);
        assert_eq!(curve[0].share_percent, dec!(100));
    }

    #[test]
    fn abc_of_empty_stock_is_empty() {
        assert!(abc_curve(&[]).unwrap().is_empty());
    }

    #[test]
    fn margin_is_revenue_minus_cost_over_revenue() {
        // Vende 10 a 5.00 = 50.00; custo médio 3.00 -> CMV 30.00
        let sales = vec![sale(1, 1, None, dec!(10), dec!(5))];
        let purchases = vec![purchase(1, 1, 1, dec!(20), dec!(3))];

        let summary = summarize(Period::Mes, &sales, &purchases, &purchases, &[], &[], dec!(10)).unwrap();

        assert_eq!(summary.revenue, dec!(50));
        assert_eq!(summary.cost_of_goods_sold, dec!(30));
        assert_eq!(summary.gross_profit, dec!(20));
        assert_eq!(summary.margin_percent, Some(dec!(40)));
        assert_eq!(summary.purchase_total, dec!(60));
    }

    #[test]
    fn summary_without_sales_has_no_margin() {
        let summary = summarize(Period::Tudo, &[], &[], &[], &[], &[], dec!(10)).unwrap();
        assert_eq!(summary.revenue, Decimal::ZERO);
        assert_eq!(summary.margin_percent, None);
        assert_eq!(summary.average_ticket, Decimal::ZERO);
        assert_eq!(summary.sales_count, 0);
    }

    #[test]
    fn summary_counts_distinct_invoices_for_ticket() {
        let sales = vec![
            sale(1, 1, None, dec!(1), dec!(10)),
            sale(1, 2, None, dec!(1), dec!(20)),
            sale(2, 1, None, dec!(3), dec!(10)),
        ];
        let summary = summarize(Period::Mes, &sales, &[], &[], &[], &[], dec!(10)).unwrap();
        assert_eq!(summary.sales_count, 2);
        assert_eq!(summary.revenue, dec!(60));
        assert_eq!(summary.average_ticket, dec!(30));
    }

    #[test]
    fn average_cost_falls_back_to_stock_price() {
        let purchases = vec![
            purchase(1, 1, 1, dec!(10), dec!(2)),
            purchase(2, 1, 1, dec!(30), dec!(4)),
        ];
        let rows = vec![stock(1, dec!(5), dec!(99)), stock(2, dec!(1), dec!(6)), stock(2, dec!(3), dec!(2))];

        let costs = average_unit_costs(&purchases, &rows).unwrap();
        // (10*2 + 30*4) / 40
        assert_eq!(costs[&1], dec!(3.5));
        // (1*6 + 3*2) / 4
        assert_eq!(costs[&2], dec!(3));
    }

    #[test]
    fn revenue_by_category_groups_uncategorized() {
        let sales = vec![
            sale(1, 1, Some((1, "Bebidas")), dec!(2), dec!(10)),
            sale(1, 2, None, dec!(1), dec!(30)),
            sale(2, 3, Some((1, "Bebidas")), dec!(1), dec!(10)),
        ];
        let rows = revenue_by_category(&sales).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category_name, "Bebidas");
        assert_eq!(rows[0].revenue, dec!(30));
        assert_eq!(rows[0].quantity, dec!(3));
        assert_eq!(rows[1].category_name, UNCATEGORIZED);
        assert_eq!(rows[0].share_percent + rows[1].share_percent, dec!(100));
    }

    #[test]
    fn low_stock_includes_active_products_without_stock() {
        let products = vec![product(1, true), product(2, true), product(3, false), product(4, true)];
        let rows = vec![stock(1, dec!(3), dec!(1)), stock(1, dec!(2), dec!(1)), stock(4, dec!(50), dec!(1))];

        let alerts = low_stock(&products, &rows, dec!(10)).unwrap();
        let ids: Vec<i32> = alerts.iter().map(|a| a.product_id).collect();

        // Produto 2 (sem estoque) primeiro, depois o 1 com 5 unidades
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(alerts[1].quantity, dec!(5));
    }

    #[test]
    fn turnover_and_coverage() {
        let products = vec![product(1, true), product(2, true), product(3, true)];
        let sales = vec![sale(1, 1, None, dec!(30), dec!(1)), sale(2, 2, None, dec!(6), dec!(1))];
        let rows = vec![stock(1, dec!(15), dec!(1)), stock(3, dec!(8), dec!(1))];

        let result = stock_turnover(&products, &sales, &rows, dec!(30)).unwrap();

        let p1 = result.iter().find(|r| r.product_id == 1).unwrap();
        assert_eq!(p1.average_daily_sales, dec!(1));
        assert_eq!(p1.turnover, Some(dec!(2)));
        assert_eq!(p1.coverage_days, Some(dec!(15)));

        // Vendeu sem estoque: giro indefinido, cobertura zero
        let p2 = result.iter().find(|r| r.product_id == 2).unwrap();
        assert_eq!(p2.turnover, None);
        assert_eq!(p2.coverage_days, Some(dec!(0)));

        // Estoque parado: sem vendas, sem cobertura calculável
        let p3 = result.iter().find(|r| r.product_id == 3).unwrap();
        assert_eq!(p3.turnover, Some(dec!(0)));
        assert_eq!(p3.coverage_days, None);

        assert_eq!(result[0].product_id, 1);
        assert_eq!(result.last().unwrap().product_id, 2);
    }

    #[test]
    fn whole_period_counts_days_since_first_sale() {
        let sales = vec![sale(1, 1, None, dec!(1), dec!(1))]; // dia 10
        assert_eq!(period_days(Period::Tudo, &sales, date(19)), dec!(10));
        assert_eq!(period_days(Period::Tudo, &[], date(19)), dec!(1));
        assert_eq!(period_days(Period::Semana, &sales, date(19)), dec!(7));
    }

    #[test]
    fn top_products_are_ranked_by_revenue() {
        let sales = vec![
            sale(1, 1, None, dec!(10), dec!(1)),
            sale(1, 2, None, dec!(1), dec!(50)),
            sale(2, 3, None, dec!(2), dec!(5)),
            sale(3, 1, None, dec!(5), dec!(1)),
        ];
        let top = top_products(&sales, 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_id, 2);
        assert_eq!(top[1].product_id, 1);
        assert_eq!(top[1].quantity, dec!(15));
    }

    #[test]
    fn purchases_grouped_by_supplier() {
        let purchases = vec![
            purchase(1, 1, 1, dec!(1), dec!(10)),
            purchase(1, 1, 2, dec!(1), dec!(5)),
            purchase(2, 2, 1, dec!(10), dec!(10)),
        ];
        let rows = purchases_by_supplier(&purchases).unwrap();
        assert_eq!(rows[0].supplier_id, 2);
        assert_eq!(rows[0].total, dec!(100));
        assert_eq!(rows[1].invoice_count, 1);
        assert_eq!(rows[1].total, dec!(15));
    }

    #[test]
    fn period_start_is_inclusive() {
        assert_eq!(Period::Semana.start_date(date(16)), Some(date(10)));
        assert_eq!(Period::Tudo.start_date(date(16)), None);
    }

    #[test]
    fn purchase_average_wins_over_stock_price_per_product() {
        let purchases = vec![purchase(1, 1, 2, dec!(4), dec!(5))];
        let rows = vec![stock(2, dec!(1), dec!(100)), stock(3, dec!(0), dec!(7))];

        let costs = average_unit_costs(&purchases, &rows).unwrap();
        assert_eq!(costs[&2], dec!(5));
        // Quantidade zero não gera custo
        assert!(!costs.contains_key(&3));
    }

    #[test]
    fn huge_stored_values_fail_instead_of_panicking() {
        let rows = vec![stock(1, Decimal::MAX, dec!(2)), stock(2, dec!(1), dec!(1))];

        assert!(matches!(abc_curve(&rows), Err(AppError::ArithmeticOverflow)));
        assert!(matches!(
            summarize(Period::Mes, &[], &[], &[], &rows, &[], dec!(10)),
            Err(AppError::ArithmeticOverflow)
        ));

        let sales = vec![sale(1, 1, None, Decimal::MAX, dec!(1)), sale(2, 1, None, Decimal::MAX, dec!(1))];
        assert!(matches!(top_products(&sales, 5), Err(AppError::ArithmeticOverflow)));
        assert!(matches!(revenue_by_category(&sales), Err(AppError::ArithmeticOverflow)));
    }

    #[test]
    fn expiry_window_is_clamped() {
        assert_eq!(expiry_limit(date(1), None).unwrap(), date(31));
        assert_eq!(expiry_limit(date(1), Some(-5)).unwrap(), date(1));
        assert_eq!(expiry_limit(date(1), Some(i64::MAX)).unwrap(), date(1) + Days::new(3650));
    }
}
