use super::contains_ignoring_case;
use page_objects::money;
use page_objects::{BasePage, PageFactory};
use storefront_core::{ensure, Result, ScenarioData};
use tracing::info;

const STORE_TITLE: &str = "Your Store";

pub(super) async fn open_homepage(pages: &PageFactory) -> Result<()> {
    let home = pages.home()?;
    home.navigate_to_home_page().await?;
    let title = home.title().await?;
    ensure(
        title.contains(STORE_TITLE),
        format!("a page title containing '{STORE_TITLE}'"),
        format!("'{title}'"),
    )
}

pub(super) async fn return_to_homepage(pages: &PageFactory) -> Result<()> {
    pages.home()?.navigate().await
}

pub(super) async fn search(pages: &PageFactory, data: &mut ScenarioData, term: String) -> Result<()> {
    pages.home()?.search_product(&term).await?;
    data.last_search_term = Some(term);
    Ok(())
}

pub(super) async fn search_with_criteria(
    pages: &PageFactory,
    data: &mut ScenarioData,
    keyword: String,
    in_description: bool,
) -> Result<()> {
    let results = pages.search_results()?;
    results.navigate_to_search().await?;
    results.search(&keyword, in_description, false).await?;
    data.last_search_term = Some(keyword);
    Ok(())
}

pub(super) async fn expect_search_results(pages: &PageFactory) -> Result<()> {
    let results = pages.search_results()?;
    ensure(
        !results.has_no_results().await?,
        "search results",
        "a 'no products' message",
    )?;
    let count = results.result_count().await?;
    ensure(count > 0, "at least one listed product", count)
}

pub(super) async fn expect_results_containing(pages: &PageFactory, keyword: &str) -> Result<()> {
    let names = pages.search_results()?.product_names().await?;
    ensure(
        names.iter().any(|name| contains_ignoring_case(name, keyword)),
        format!("a result containing '{keyword}'"),
        format!("[{}]", names.join(", ")),
    )
}

pub(super) async fn expect_at_least_results(pages: &PageFactory, count: usize) -> Result<()> {
    let found = pages.search_results()?.result_count().await?;
    ensure(found >= count, format!("at least {count} result(s)"), found)
}

pub(super) async fn expect_at_most_results(pages: &PageFactory, limit: usize) -> Result<()> {
    let found = pages.search_results()?.result_count().await?;
    ensure(found <= limit, format!("at most {limit} product(s) per page"), found)
}

pub(super) async fn sort_by(pages: &PageFactory, label: &str) -> Result<()> {
    pages.search_results()?.sort_by(label).await?;
    pages.actions().settle().await;
    Ok(())
}

pub(super) async fn expect_ascending_prices(pages: &PageFactory) -> Result<()> {
    let prices = pages.search_results()?.product_prices().await?;
    ensure(
        money::is_ascending(&prices),
        "prices in ascending order",
        format!("{prices:?}"),
    )
}

pub(super) async fn set_display_limit(pages: &PageFactory, limit: &str) -> Result<()> {
    pages.search_results()?.set_show_limit(limit).await?;
    pages.actions().settle().await;
    Ok(())
}

pub(super) async fn open_product(pages: &PageFactory, id: u32) -> Result<()> {
    pages.product()?.navigate_to_product(id).await
}

pub(super) async fn add_to_cart_from_product(
    pages: &PageFactory,
    data: &mut ScenarioData,
    quantity: u32,
) -> Result<()> {
    let product = pages.product()?;
    let title = product.product_title().await?;
    product.add_to_cart(quantity).await?;
    pages.actions().settle().await;
    info!("Added {} x '{}' from its product page", quantity, title);
    data.last_added_product_name = Some(title);
    data.updated_quantity = Some(quantity);
    Ok(())
}

pub(super) async fn expect_product_title(pages: &PageFactory, text: &str) -> Result<()> {
    let title = pages.product()?.product_title().await?;
    ensure(
        contains_ignoring_case(&title, text),
        format!("a product title containing '{text}'"),
        format!("'{title}'"),
    )
}

pub(super) async fn submit_review(
    pages: &PageFactory,
    author: &str,
    text: &str,
    rating: u8,
) -> Result<()> {
    pages.product()?.submit_review(author, text, rating).await?;
    pages.actions().settle().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use browser_driver::memory::MemoryElement;
    use page_objects::pages::search_result::{PRODUCT_CARDS, PRODUCT_NAMES, PRODUCT_PRICES};
    use storefront_core::StorefrontError;

    fn results_site() -> browser_driver::memory::MemorySite {
        site()
            .elements(
                PRODUCT_CARDS,
                [MemoryElement::text("iPhone"), MemoryElement::text("iPod Classic")],
            )
            .elements(
                PRODUCT_NAMES,
                [MemoryElement::text("iPhone"), MemoryElement::text("iPod Classic")],
            )
            .elements(
                PRODUCT_PRICES,
                [
                    MemoryElement::text("$123.20 Ex Tax: $101.00"),
                    MemoryElement::text("$122.00 Ex Tax: $100.00"),
                ],
            )
    }

    #[tokio::test]
    async fn homepage_checks_the_store_title() {
        let (page, pages) = factory(site());
        open_homepage(&pages).await.unwrap();
        assert_eq!(page.actions(), vec!["goto https://shop.test/".to_string()]);

        let (_page, pages) = factory(site().title("Maintenance"));
        let err = open_homepage(&pages).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Assertion { .. }));
    }

    #[tokio::test]
    async fn result_names_match_ignoring_case() {
        let (_page, pages) = factory(results_site());
        expect_results_containing(&pages, "IPHONE").await.unwrap();
        expect_at_least_results(&pages, 2).await.unwrap();
        expect_at_most_results(&pages, 25).await.unwrap();

        let err = expect_results_containing(&pages, "samsung")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("iPhone, iPod Classic"));
    }

    #[tokio::test]
    async fn descending_prices_are_not_ascending() {
        let (_page, pages) = factory(results_site());
        let err = expect_ascending_prices(&pages).await.unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }
}
