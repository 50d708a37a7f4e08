//! Product listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use plantify_core::{CategoryGroup, Product};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

/// A category heading and its products.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub products: Vec<ProductView>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.display(),
            image_url: product.image_url.clone(),
        }
    }
}

impl From<&CategoryGroup<'_>> for CategoryView {
    fn from(group: &CategoryGroup<'_>) -> Self {
        Self {
            name: group.category.to_string(),
            products: group
                .products
                .iter()
                .map(|product| ProductView::from(*product))
                .collect(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub categories: Vec<CategoryView>,
    pub cart_count: u64,
}

/// Display the catalog grouped by category.
///
/// Every product starts with an enabled "Add to Cart" button, including
/// products already in the cart.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<ProductsIndexTemplate> {
    let cart = state.carts().snapshot(&session).await?;

    let categories = state
        .catalog()
        .by_category()
        .iter()
        .map(CategoryView::from)
        .collect();

    Ok(ProductsIndexTemplate {
        categories,
        cart_count: cart.total_item_count(),
    })
}
