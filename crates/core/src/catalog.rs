//! The static product catalog.
//!
//! A [`Catalog`] is built once at startup and never mutated. Views read it to
//! list products, and the cart copies a product's display fields when a line
//! item is created.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// Placeholder artwork used by the default catalog.
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/100";

/// Errors building a [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: String,
    pub image_url: String,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        category: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
            image_url: image_url.into(),
        }
    }
}

/// Products sharing a category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub products: Vec<&'a Product>,
}

/// Immutable, id-unique list of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// The default houseplant catalog.
    #[must_use]
    pub fn plants() -> Self {
        let plant = |id: i32, name: &str, dollars: u32, category: &str| {
            Product::new(
                ProductId::new(id),
                name,
                Price::whole(dollars),
                category,
                PLACEHOLDER_IMAGE,
            )
        };

        Self {
            products: vec![
                plant(1, "Snake Plant", 15, "Low Light"),
                plant(2, "Fiddle Leaf Fig", 35, "Large Plants"),
                plant(3, "Peace Lily", 20, "Flowering"),
                plant(4, "ZZ Plant", 18, "Low Light"),
                plant(5, "Aloe Vera", 12, "Succulents"),
                plant(6, "Rubber Plant", 25, "Large Plants"),
            ],
        }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Group products by category.
    ///
    /// Categories appear in the order they are first seen in the catalog.
    #[must_use]
    pub fn by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        for product in &self.products {
            match groups
                .iter_mut()
                .find(|group| group.category == product.category)
            {
                Some(group) => group.products.push(product),
                None => groups.push(CategoryGroup {
                    category: &product.category,
                    products: vec![product],
                }),
            }
        }
        groups
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::plants()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_six_plants() {
        let catalog = Catalog::plants();
        assert_eq!(catalog.len(), 6);
        let snake = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(snake.name, "Snake Plant");
        assert_eq!(snake.price, Price::whole(15));
    }

    #[test]
    fn test_get_unknown_id() {
        assert!(Catalog::plants().get(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let a = Product::new(ProductId::new(1), "A", Price::whole(1), "X", "a.png");
        let b = Product::new(ProductId::new(1), "B", Price::whole(2), "Y", "b.png");
        assert_eq!(
            Catalog::new(vec![a, b]).unwrap_err(),
            CatalogError::DuplicateId(ProductId::new(1))
        );
    }

    #[test]
    fn test_by_category_keeps_first_seen_order() {
        let catalog = Catalog::plants();
        let groups = catalog.by_category();

        let categories: Vec<&str> = groups.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            ["Low Light", "Large Plants", "Flowering", "Succulents"]
        );

        let low_light: Vec<&str> = groups[0].products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low_light, ["Snake Plant", "ZZ Plant"]);

        let large: Vec<&str> = groups[1].products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(large, ["Fiddle Leaf Fig", "Rubber Plant"]);
    }

    #[test]
    fn test_empty_catalog_has_no_groups() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.by_category().is_empty());
    }
}
