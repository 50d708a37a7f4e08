//! Cart state manager.
//!
//! A [`Cart`] is an ordered list of [`CartLineItem`]s keyed by product id. It is
//! the only place cart contents change, and every change goes through
//! [`Cart::add_item`], [`Cart::update_quantity`] or [`Cart::remove_item`].
//!
//! # Invariants
//!
//! - At most one line per product id.
//! - Every line has `quantity >= 1`. A line that would reach zero is removed.
//! - Lines keep their insertion order across quantity updates.
//!
//! Operations on ids that are not in the cart are silent no-ops. Callers that
//! need to know about a missing line use [`Cart::try_update_quantity`] and
//! [`Cart::try_remove_item`], which report [`CartError::NotFound`] instead.
//!
//! # Example
//!
//! ```rust
//! use plantify_core::{Cart, Catalog, Price, ProductId};
//!
//! let catalog = Catalog::plants();
//! let snake = catalog.get(ProductId::new(1)).unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(snake);
//! cart.add_item(snake);
//! cart.update_quantity(ProductId::new(1), 1);
//!
//! assert_eq!(cart.total_item_count(), 3);
//! assert_eq!(cart.total_cost(), Price::whole(45));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// Errors from the strict cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("no cart line for product {0}")]
    NotFound(ProductId),
}

/// Outcome of a quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// The line is still in the cart with this quantity.
    Quantity(u32),
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
    /// No line with that id; nothing changed.
    Absent,
}

/// One row of the cart.
///
/// Display fields are copied from the product when the line is created, so
/// later catalog changes do not reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub quantity: u32,
}

impl CartLineItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Ordered, id-unique collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLineItem>,
    revision: u64,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Counter of state changes. Unchanged by no-op operations.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line in place, or appends a new line with
    /// quantity 1. Returns the line's quantity afterwards.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(product.id) {
            let before = line.quantity;
            line.quantity = before.saturating_add(1);
            let quantity = line.quantity;
            if quantity != before {
                self.bump();
            }
            return quantity;
        }

        self.lines.push(CartLineItem::from_product(product));
        self.bump();
        1
    }

    /// Adjust the quantity of the line for `id` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line. Missing ids are
    /// ignored.
    pub fn update_quantity(&mut self, id: ProductId, delta: i32) -> LineChange {
        let Some(line) = self.line_mut(id) else {
            return LineChange::Absent;
        };

        let current = line.quantity;
        let next = i64::from(current) + i64::from(delta);
        if next <= 0 {
            self.take(id);
            return LineChange::Removed;
        }

        let next = u32::try_from(next).unwrap_or(u32::MAX);
        if next != current {
            line.quantity = next;
            self.bump();
        }
        LineChange::Quantity(next)
    }

    /// Remove the line for `id` regardless of its quantity.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        self.take(id).is_some()
    }

    /// Like [`Cart::update_quantity`], but a missing line is an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if no line has `id`; the cart is unchanged.
    pub fn try_update_quantity(&mut self, id: ProductId, delta: i32) -> Result<LineChange, CartError> {
        match self.update_quantity(id, delta) {
            LineChange::Absent => Err(CartError::NotFound(id)),
            change => Ok(change),
        }
    }

    /// Like [`Cart::remove_item`], but a missing line is an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if no line has `id`; the cart is unchanged.
    pub fn try_remove_item(&mut self, id: ProductId) -> Result<CartLineItem, CartError> {
        self.take(id).ok_or(CartError::NotFound(id))
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `quantity * price` over all lines.
    #[must_use]
    pub fn total_cost(&self) -> Price {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    fn take(&mut self, id: ProductId) -> Option<CartLineItem> {
        let index = self.position(id)?;
        let line = self.lines.remove(index);
        self.bump();
        Some(line)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
