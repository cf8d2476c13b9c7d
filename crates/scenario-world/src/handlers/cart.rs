use super::contains_ignoring_case;
use page_objects::money;
use page_objects::PageFactory;
use storefront_core::{ensure, Result, ScenarioData, StorefrontError};
use tracing::info;

const PAGE_BODY: &str = "body";

pub(super) async fn add_first_result_to_cart(
    pages: &PageFactory,
    data: &mut ScenarioData,
) -> Result<()> {
    let results = pages.search_results()?;
    let names = results.product_names().await?;
    results.add_product_to_cart_by_index(0).await?;
    pages.actions().settle().await;
    data.last_added_product_name = names.into_iter().next();
    Ok(())
}

pub(super) async fn add_product_to_cart(
    pages: &PageFactory,
    data: &mut ScenarioData,
    product: String,
) -> Result<()> {
    pages.home()?.search_product(&product).await?;
    pages
        .search_results()?
        .add_product_to_cart_by_index(0)
        .await?;
    pages.actions().settle().await;
    data.last_search_term = Some(product.clone());
    data.product_added = Some(product);
    Ok(())
}

pub(super) async fn open_cart(pages: &PageFactory) -> Result<()> {
    pages.cart()?.navigate_to_cart().await
}

pub(super) async fn update_first_quantity(
    pages: &PageFactory,
    data: &mut ScenarioData,
    quantity: u32,
) -> Result<()> {
    pages.cart()?.update_quantity(0, quantity).await?;
    pages.actions().settle().await;
    data.updated_quantity = Some(quantity);
    Ok(())
}

/// Types the quantity only; a later "update the cart" submits it.
pub(super) async fn set_first_quantity(
    pages: &PageFactory,
    data: &mut ScenarioData,
    quantity: String,
) -> Result<()> {
    pages.cart()?.set_quantity(0, &quantity).await?;
    data.updated_quantity = quantity.trim().parse().ok();
    Ok(())
}

pub(super) async fn update_cart(pages: &PageFactory) -> Result<()> {
    pages.cart()?.update_cart().await?;
    pages.actions().settle().await;
    Ok(())
}

pub(super) async fn expect_updated_quantity(pages: &PageFactory, data: &ScenarioData) -> Result<()> {
    let expected = data
        .updated_quantity
        .ok_or_else(|| StorefrontError::assertion("a quantity set by an earlier step", "none"))?;
    let actual = pages.cart()?.quantity(0).await?;
    ensure(
        actual.trim().parse::<u32>().ok() == Some(expected),
        format!("a first-row quantity of {expected}"),
        format!("'{actual}'"),
    )
}

pub(super) async fn expect_total_recalculated(pages: &PageFactory) -> Result<()> {
    let total = pages.cart()?.cart_total().await?;
    ensure(
        !total.is_empty() && total.chars().any(|c| c.is_ascii_digit()),
        "a cart total containing a digit",
        format!("'{total}'"),
    )
}

pub(super) async fn expect_positive_total(pages: &PageFactory) -> Result<()> {
    let total = pages.cart()?.cart_total().await?;
    info!("Updated cart total: {}", total);
    ensure(
        money::parse_price(&total).is_some_and(|amount| amount > 0.0),
        "a positive cart total",
        format!("'{total}'"),
    )
}

pub(super) async fn remove_first_product(pages: &PageFactory) -> Result<()> {
    pages.cart()?.remove_product(0).await?;
    pages.actions().settle().await;
    Ok(())
}

pub(super) async fn expect_count(pages: &PageFactory, count: usize, open_cart: bool) -> Result<()> {
    let cart = pages.cart()?;
    if open_cart {
        cart.navigate_to_cart().await?;
    }
    let found = cart.item_count().await?;
    ensure(found == count, format!("{count} item(s) in the cart"), found)
}

pub(super) async fn expect_product_in_cart(pages: &PageFactory, data: &ScenarioData) -> Result<()> {
    let expected = data.expected_cart_product().ok_or_else(|| {
        StorefrontError::assertion("a product name stored by an earlier step", "none")
    })?;
    let names = pages.cart()?.product_names().await?;
    ensure(!names.is_empty(), "a cart with products", "an empty cart")?;
    ensure(
        names.iter().any(|name| contains_ignoring_case(name, expected)),
        format!("'{expected}' in the cart"),
        format!("[{}]", names.join(", ")),
    )
}

pub(super) async fn expect_empty(pages: &PageFactory) -> Result<()> {
    let cart = pages.cart()?;
    let empty = cart.is_cart_empty().await?;
    ensure(empty, "an empty cart", format!("{} item(s)", cart.item_count().await?))
}

pub(super) async fn expect_empty_message(pages: &PageFactory) -> Result<()> {
    let message = pages.cart()?.empty_cart_message().await?;
    ensure(
        message.contains("empty"),
        "a message saying the cart is empty",
        format!("'{message}'"),
    )
}

pub(super) async fn apply_coupon(pages: &PageFactory, data: &mut ScenarioData, code: String) -> Result<()> {
    pages.cart()?.apply_coupon(&code).await?;
    data.coupon_applied = Some(code);
    Ok(())
}

/// Unknown coupons are rejected by the store; the order summary must still
/// render its totals.
pub(super) async fn expect_discount_summary(pages: &PageFactory) -> Result<()> {
    let body = pages.actions().get_text(PAGE_BODY).await?;
    ensure(body.contains("Total"), "an order summary with a Total line", "none")
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use browser_driver::memory::MemoryElement;
    use page_objects::pages::cart::{
        CART_ROWS, CART_TOTAL, EMPTY_CART_MESSAGE, PRODUCT_NAMES, PRODUCT_QUANTITIES, UPDATE_BUTTONS,
    };

    fn cart_site() -> browser_driver::memory::MemorySite {
        site()
            .elements(CART_ROWS, [MemoryElement::text("iPhone row")])
            .elements(PRODUCT_NAMES, [MemoryElement::text("iPhone")])
            .elements(PRODUCT_QUANTITIES, [MemoryElement::input("1")])
            .elements(UPDATE_BUTTONS, [MemoryElement::text("")])
            .element(CART_TOTAL, MemoryElement::text("$123.20"))
    }

    #[tokio::test]
    async fn updated_quantity_is_read_back_from_the_row() {
        let (page, pages) = factory(cart_site());
        let mut data = ScenarioData::default();

        update_first_quantity(&pages, &mut data, 2).await.unwrap();
        assert_eq!(data.updated_quantity, Some(2));
        assert!(page
            .actions()
            .contains(&format!("fill {PRODUCT_QUANTITIES}[0]=2")));
        expect_updated_quantity(&pages, &data).await.unwrap();
    }

    #[tokio::test]
    async fn cart_product_falls_back_to_the_search_term() {
        let (_page, pages) = factory(cart_site());
        let data = ScenarioData {
            product_added: Some("iphone".to_string()),
            ..Default::default()
        };
        expect_product_in_cart(&pages, &data).await.unwrap();
        expect_count(&pages, 1, false).await.unwrap();

        let err = expect_product_in_cart(&pages, &ScenarioData::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Assertion { .. }));
    }

    #[tokio::test]
    async fn totals_must_carry_an_amount() {
        let (_page, pages) = factory(cart_site());
        expect_total_recalculated(&pages).await.unwrap();
        expect_positive_total(&pages).await.unwrap();

        let (_page, pages) = factory(site().element(CART_TOTAL, MemoryElement::text("-")));
        assert!(expect_total_recalculated(&pages).await.is_err());
    }

    #[tokio::test]
    async fn empty_cart_is_recognized_by_its_message() {
        let (_page, pages) = factory(site().element(
            EMPTY_CART_MESSAGE,
            MemoryElement::text("Your shopping cart is empty!"),
        ));
        expect_empty(&pages).await.unwrap();
        expect_empty_message(&pages).await.unwrap();
    }
}
