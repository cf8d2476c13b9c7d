//! Storefront landing page: search box, account menu, featured products.

use crate::base::BasePage;
use crate::factory::PageObject;
use crate::web_actions::WebActions;
use storefront_core::{Result, StorefrontError};
use tracing::info;

pub const SEARCH_INPUT: &str = "#search input[name=\"search\"]";
pub const SEARCH_BUTTON: &str = "#search button";
pub const MY_ACCOUNT_DROPDOWN: &str = ".dropdown .dropdown-toggle[title=\"My Account\"]";
pub const LOGIN_OPTION: &str = ".dropdown-menu a[href$=\"account/login\"]";
pub const REGISTER_OPTION: &str = ".dropdown-menu a[href$=\"account/register\"]";
pub const CART_BUTTON: &str = "#cart button";
pub const FEATURED_PRODUCTS: &str = ".product-layout";
pub const ADD_TO_CART_BUTTONS: &str = "button[onclick*=\"cart.add\"]";
pub const CATEGORY_LINKS: &str = "#menu .dropdown > a.dropdown-toggle";
pub const SUBCATEGORY_LINKS: &str = "#menu .dropdown .dropdown-menu a";
pub const LOGO: &str = "#logo";

#[derive(Debug, Clone)]
pub struct HomePage {
    actions: WebActions,
}

impl PageObject for HomePage {
    fn create(actions: WebActions) -> Self {
        Self { actions }
    }
}

impl BasePage for HomePage {
    fn actions(&self) -> &WebActions {
        &self.actions
    }
}

impl HomePage {
    pub async fn navigate_to_home_page(&self) -> Result<()> {
        self.navigate().await
    }

    pub async fn search_product(&self, term: &str) -> Result<()> {
        info!("Searching for '{}'", term);
        self.type_text(SEARCH_INPUT, term).await?;
        self.click(SEARCH_BUTTON).await
    }

    pub async fn open_my_account_dropdown(&self) -> Result<()> {
        self.click(MY_ACCOUNT_DROPDOWN).await
    }

    pub async fn navigate_to_login(&self) -> Result<()> {
        self.open_my_account_dropdown().await?;
        self.click(LOGIN_OPTION).await
    }

    pub async fn navigate_to_register(&self) -> Result<()> {
        self.open_my_account_dropdown().await?;
        self.click(REGISTER_OPTION).await
    }

    pub async fn featured_products_count(&self) -> Result<usize> {
        self.wait_for_element(FEATURED_PRODUCTS).await?;
        self.actions.count(FEATURED_PRODUCTS).await
    }

    pub async fn add_product_to_cart_by_index(&self, index: usize) -> Result<()> {
        self.actions
            .click_nth(ADD_TO_CART_BUTTONS, index, "Product")
            .await
    }

    pub async fn open_cart(&self) -> Result<()> {
        self.click(CART_BUTTON).await
    }

    /// Opens a top-menu category, or one of its subcategories.
    pub async fn navigate_to_category(&self, category: &str, subcategory: Option<&str>) -> Result<()> {
        let categories = self.actions.texts(CATEGORY_LINKS).await?;
        let index = position_of(&categories, category).ok_or_else(|| {
            StorefrontError::assertion(
                format!("category '{category}' in the menu"),
                categories.join(", "),
            )
        })?;
        self.actions.click_nth(CATEGORY_LINKS, index, "Category").await?;

        let Some(subcategory) = subcategory else {
            return Ok(());
        };
        let links = self.actions.texts(SUBCATEGORY_LINKS).await?;
        let index = position_of(&links, subcategory).ok_or_else(|| {
            StorefrontError::assertion(
                format!("subcategory '{subcategory}' under '{category}'"),
                links.join(", "),
            )
        })?;
        self.actions
            .click_nth(SUBCATEGORY_LINKS, index, "Subcategory")
            .await
    }
}

fn position_of(texts: &[String], wanted: &str) -> Option<usize> {
    texts.iter().position(|text| text.trim() == wanted)
}
