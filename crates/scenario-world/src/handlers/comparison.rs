use crate::action::ComparisonEntry;
use page_objects::pages::comparison::COMPARISON_TABLE;
use page_objects::PageFactory;
use storefront_core::{ensure, Result, ScenarioData, StorefrontError};
use tracing::debug;

pub(super) async fn add_first_result(pages: &PageFactory, data: &mut ScenarioData) -> Result<()> {
    let results = pages.search_results()?;
    results.add_product_to_compare_by_index(0).await?;
    pages.actions().settle().await;
    if let Some(name) = results.product_names().await?.into_iter().next() {
        data.comparison_products.push(name);
    }
    Ok(())
}

/// Searches for each entry and adds the result at its index.
pub(super) async fn add_products(
    pages: &PageFactory,
    data: &mut ScenarioData,
    entries: Vec<ComparisonEntry>,
) -> Result<()> {
    pages.comparison()?.navigate_to_comparison().await?;
    let home = pages.home()?;
    let results = pages.search_results()?;
    for entry in entries {
        home.navigate_to_home_page().await?;
        home.search_product(&entry.search_term).await?;
        results.add_product_to_compare_by_index(entry.index).await?;

        let names = results.product_names().await?;
        let len = names.len();
        let name = names
            .into_iter()
            .nth(entry.index)
            .ok_or_else(|| StorefrontError::IndexOutOfRange {
                what: format!("Result for '{}'", entry.search_term),
                index: entry.index,
                len,
            })?;
        debug!("Added '{}' to the comparison", name);
        data.comparison_products.push(name);
        pages.actions().settle().await;
    }
    Ok(())
}

pub(super) async fn open(pages: &PageFactory) -> Result<()> {
    pages.comparison()?.navigate_to_comparison().await
}

pub(super) async fn expect_count(pages: &PageFactory, count: usize) -> Result<()> {
    let found = pages.comparison()?.product_count().await?;
    ensure(found == count, format!("{count} compared product(s)"), found)
}

/// Every product added during the scenario must head a column.
pub(super) async fn expect_details(pages: &PageFactory, data: &ScenarioData) -> Result<()> {
    pages.actions().wait_for_visible(COMPARISON_TABLE).await?;
    let comparison = pages.comparison()?;
    ensure(
        comparison.is_table_visible().await?,
        "a visible comparison table",
        "hidden",
    )?;
    let names = comparison.product_names().await?;
    for stored in &data.comparison_products {
        ensure(
            names.iter().any(|name| name.contains(stored.as_str())),
            format!("'{stored}' in the comparison"),
            format!("[{}]", names.join(", ")),
        )?;
    }
    Ok(())
}

pub(super) async fn add_first_to_cart(pages: &PageFactory) -> Result<()> {
    pages.comparison()?.add_to_cart_by_index(0).await?;
    pages.actions().settle().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use browser_driver::memory::MemoryElement;
    use page_objects::pages::comparison::PRODUCT_NAMES;
    use page_objects::pages::home::{SEARCH_BUTTON, SEARCH_INPUT};
    use page_objects::pages::search_result::COMPARE_BUTTONS;

    #[tokio::test]
    async fn details_list_every_stored_product() {
        let (_page, pages) = factory(
            site()
                .element(COMPARISON_TABLE, MemoryElement::text(""))
                .elements(
                    PRODUCT_NAMES,
                    [MemoryElement::text("iPhone"), MemoryElement::text("MacBook Air")],
                ),
        );
        let mut data = ScenarioData {
            comparison_products: vec!["iPhone".into(), "MacBook Air".into()],
            ..Default::default()
        };
        expect_count(&pages, 2).await.unwrap();
        expect_details(&pages, &data).await.unwrap();

        data.comparison_products.push("Canon EOS 5D".into());
        let err = expect_details(&pages, &data).await.unwrap_err();
        assert!(err.to_string().contains("Canon EOS 5D"));
    }

    #[tokio::test]
    async fn out_of_range_entries_fail_before_storing() {
        let (_page, pages) = factory(
            site()
                .element(SEARCH_INPUT, MemoryElement::input(""))
                .element(SEARCH_BUTTON, MemoryElement::text(""))
                .elements(COMPARE_BUTTONS, [MemoryElement::text("")]),
        );
        let mut data = ScenarioData::default();
        let err = add_products(
            &pages,
            &mut data,
            vec![ComparisonEntry {
                search_term: "iphone".into(),
                index: 0,
            }],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorefrontError::IndexOutOfRange { index: 0, len: 0, .. }));
        assert!(data.comparison_products.is_empty());
    }
}
