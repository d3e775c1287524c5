//! Scripted storefront session over the demo dataset.
//!
//! Browses the catalog, fills the persisted cart, checks out and prints the
//! back-office dashboard as JSON.

mod config;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

use stroymarket_cart::{CartStore, FileStore};
use stroymarket_catalog::{CatalogFilter, SortOrder, seed};
use stroymarket_core::{AggregateRoot, ProductId, VariantId};
use stroymarket_sales::{CheckoutForm, CheckoutSummary, DashboardStats, DeliveryType};

use crate::config::StorefrontConfig;

fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::from_env()?;
    stroymarket_observability::init_with(config.log_format);

    info!(
        data_dir = %config.data_dir.display(),
        cart_key = %config.cart_key,
        "starting storefront session"
    );

    let catalog = seed::catalog().context("failed to build demo catalog")?;
    let mut orders = stroymarket_sales::seed::orders().context("failed to build demo orders")?;

    let on_sale = catalog.query(&CatalogFilter::default().sale_only(), SortOrder::PriceAsc);
    for product in &on_sale {
        let quote = product.quote(None)?;
        info!(
            product = %product.id(),
            name = product.name(),
            list_price = quote.list_price.amount(),
            price = quote.unit_price.amount(),
            "on sale"
        );
    }

    let mut cart = CartStore::open_with_key(FileStore::new(&config.data_dir), config.cart_key.clone());
    cart.listen(|event| tracing::debug!(?event, "cart changed"));

    let picks = [("p003", Some("v1"), 4), ("p001", Some("v2"), 10), ("p004", None, 50), ("p003", Some("v1"), 2)];
    for (product_id, variant_id, quantity) in picks {
        let Some(product) = catalog.get(&ProductId::new(product_id)) else {
            warn!(product = product_id, "product not in catalog");
            continue;
        };
        let variant_id = variant_id.map(VariantId::new);
        match product.line_item(variant_id.as_ref(), quantity) {
            Ok(item) => cart.add_item(item)?,
            Err(err) => warn!(product = product_id, kind = err.kind(), "cannot add to cart: {err}"),
        }
    }

    let form = CheckoutForm {
        name: "Алексей Громов".to_string(),
        phone: "+7 (915) 000-11-22".to_string(),
        email: "gromov@example.ru".to_string(),
        address: Some("г. Москва, ул. Строителей, д. 3".to_string()),
        delivery: DeliveryType::Delivery,
        comment: None,
    };

    let summary = CheckoutSummary::new(cart.totals(), form.delivery);
    info!(
        lines = cart.items().len(),
        count = summary.count,
        goods = %summary.goods,
        delivery = %summary.delivery,
        total = %summary.total,
        "cart ready for checkout"
    );

    let order = orders.checkout(&mut cart, &form, Utc::now())?;
    info!(order = order.number(), total = %order.total_amount(), "checkout complete");

    let stats = DashboardStats::collect(&orders, &catalog);
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
