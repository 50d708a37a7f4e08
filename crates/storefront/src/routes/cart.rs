//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Carts live server-side in [`crate::services::CartStore`], keyed by a cart
//! id kept in the session. Every mutation answers with an
//! `HX-Trigger: cart-updated` header so the header badge re-fetches the count.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use plantify_core::{Cart, CartLineItem, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// HTMX event fired after any cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub total_cost: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            id: line.id.as_i32(),
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
            price: line.price.display(),
            line_price: line.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            item_count: cart.total_item_count(),
            total_cost: cart.total_cost().display(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: i32,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: i32,
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Disabled "Added" button that replaces a product's add button (for HTMX).
///
/// This is the only record of "already added": it lives in the page, not in
/// the cart, and a reload of the product listing brings the add buttons back.
#[derive(Template, WebTemplate)]
#[template(path = "partials/added_button.html")]
pub struct AddedButtonTemplate {
    pub product_id: i32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let cart = state.carts().snapshot(&session).await?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        cart_count: cart.total_item_count(),
    })
}

/// Add one unit of a catalog product (HTMX).
///
/// Unknown product ids are rejected before the cart is touched.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.id);
    let product = state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    state.carts().add_item(&session, product).await?;

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        AddedButtonTemplate {
            product_id: form.id,
        },
    )
        .into_response())
}

/// Update cart line quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let update = state
        .carts()
        .update_quantity(&session, ProductId::new(form.id), form.delta)
        .await?;

    Ok(items_fragment(&update.cart))
}

/// Remove cart line (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let update = state
        .carts()
        .remove_item(&session, ProductId::new(form.id))
        .await?;

    Ok(items_fragment(&update.cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart = state.carts().snapshot(&session).await?;
    Ok(CartCountTemplate {
        count: cart.total_item_count(),
    })
}

fn items_fragment(cart: &Cart) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}
