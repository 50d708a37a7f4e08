//! Server-side carts, one per browser session.
//!
//! The session only holds a cart id. The carts themselves live in
//! [`CartStore`], a `moka` cache of `Arc<Mutex<Cart>>` shared through
//! [`crate::state::AppState`]. A mutation holds its cart's lock from read to
//! write, so overlapping requests of one session apply one after another and
//! none of them is lost.
//!
//! Carts that go untouched for the configured idle timeout are evicted.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use plantify_core::{Cart, LineChange, Product, ProductId};
use tokio::sync::Mutex;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{Result, add_breadcrumb};
use crate::models::session_keys;

/// Upper bound on carts held in memory.
const MAX_CARTS: u64 = 100_000;

type SharedCart = Arc<Mutex<Cart>>;

/// Result of a cart mutation: what happened plus the cart afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate<T> {
    pub outcome: T,
    pub cart: Cart,
}

/// All live carts, keyed by the cart id stored in each session.
#[derive(Clone)]
pub struct CartStore {
    carts: Cache<String, SharedCart>,
}

impl CartStore {
    /// Create an empty store that evicts carts idle for `idle_timeout`.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        let carts = Cache::builder()
            .max_capacity(MAX_CARTS)
            .time_to_idle(idle_timeout)
            .build();
        Self { carts }
    }

    /// Copy of the session's cart, empty if it has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn snapshot(&self, session: &Session) -> Result<Cart> {
        match self.existing(session).await? {
            Some(cart) => Ok(cart.lock().await.clone()),
            None => Ok(Cart::new()),
        }
    }

    /// Add one unit of `product`, creating the session's cart if needed.
    ///
    /// Returns the line's quantity afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn add_item(&self, session: &Session, product: &Product) -> Result<CartUpdate<u32>> {
        let (cart_id, shared) = self.open(session).await?;

        let update = {
            let mut cart = shared.lock().await;
            let quantity = cart.add_item(product);
            CartUpdate {
                outcome: quantity,
                cart: cart.clone(),
            }
        };

        tracing::info!(
            %cart_id,
            product_id = %product.id,
            quantity = update.outcome,
            revision = update.cart.revision(),
            "Added to cart"
        );
        let product_id = product.id.to_string();
        add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));
        Ok(update)
    }

    /// Adjust a line's quantity by `delta`.
    ///
    /// A session without a cart reports [`LineChange::Absent`] and no cart is
    /// created.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn update_quantity(
        &self,
        session: &Session,
        id: ProductId,
        delta: i32,
    ) -> Result<CartUpdate<LineChange>> {
        let Some(shared) = self.existing(session).await? else {
            tracing::debug!(product_id = %id, delta, "Quantity update without a cart ignored");
            return Ok(CartUpdate {
                outcome: LineChange::Absent,
                cart: Cart::new(),
            });
        };

        let update = {
            let mut cart = shared.lock().await;
            let change = cart.update_quantity(id, delta);
            CartUpdate {
                outcome: change,
                cart: cart.clone(),
            }
        };

        let revision = update.cart.revision();
        match update.outcome {
            LineChange::Absent => {
                tracing::debug!(product_id = %id, delta, "Quantity update for missing line ignored");
            }
            LineChange::Removed => {
                tracing::info!(product_id = %id, delta, revision, "Cart line removed");
            }
            LineChange::Quantity(quantity) => {
                tracing::info!(product_id = %id, delta, quantity, revision, "Cart quantity updated");
            }
        }
        Ok(update)
    }

    /// Remove a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn remove_item(&self, session: &Session, id: ProductId) -> Result<CartUpdate<bool>> {
        let Some(shared) = self.existing(session).await? else {
            tracing::debug!(product_id = %id, "Removal without a cart ignored");
            return Ok(CartUpdate {
                outcome: false,
                cart: Cart::new(),
            });
        };

        let update = {
            let mut cart = shared.lock().await;
            let removed = cart.remove_item(id);
            CartUpdate {
                outcome: removed,
                cart: cart.clone(),
            }
        };

        if update.outcome {
            tracing::info!(product_id = %id, revision = update.cart.revision(), "Cart line removed");
        } else {
            tracing::debug!(product_id = %id, "Removal of missing line ignored");
        }
        Ok(update)
    }

    /// The session's cart, if it has one that has not been evicted.
    async fn existing(&self, session: &Session) -> Result<Option<SharedCart>> {
        let Some(cart_id) = session.get::<String>(session_keys::CART_ID).await? else {
            return Ok(None);
        };
        Ok(self.carts.get(cart_id.as_str()).await)
    }

    /// The session's cart, assigning a cart id on first use.
    async fn open(&self, session: &Session) -> Result<(String, SharedCart)> {
        let cart_id = match session.get::<String>(session_keys::CART_ID).await? {
            Some(cart_id) => cart_id,
            None => {
                let cart_id = Uuid::new_v4().to_string();
                session.insert(session_keys::CART_ID, &cart_id).await?;
                cart_id
            }
        };

        let cart = self
            .carts
            .get_with(cart_id.clone(), async { Arc::new(Mutex::new(Cart::new())) })
            .await;
        Ok((cart_id, cart))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use plantify_core::{Catalog, Price};
    use tokio::task::JoinSet;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn store() -> CartStore {
        CartStore::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_new_session_has_empty_cart() {
        let carts = store();
        assert!(carts.snapshot(&session()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_are_visible_to_later_reads() {
        let catalog = Catalog::plants();
        let carts = store();
        let session = session();

        carts.add_item(&session, catalog.get(ProductId::new(1)).unwrap()).await.unwrap();
        carts.add_item(&session, catalog.get(ProductId::new(3)).unwrap()).await.unwrap();
        let update = carts.update_quantity(&session, ProductId::new(1), 1).await.unwrap();
        assert_eq!(update.outcome, LineChange::Quantity(2));

        let cart = carts.snapshot(&session).await.unwrap();
        assert_eq!(cart, update.cart);
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total_cost(), Price::whole(50));
    }

    #[tokio::test]
    async fn test_noop_without_cart_creates_nothing() {
        let carts = store();
        let session = session();

        let update = carts.update_quantity(&session, ProductId::new(5), 1).await.unwrap();
        assert_eq!(update.outcome, LineChange::Absent);
        assert!(!carts.remove_item(&session, ProductId::new(5)).await.unwrap().outcome);

        assert!(session.get::<String>(session_keys::CART_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_item_persists() {
        let catalog = Catalog::plants();
        let carts = store();
        let session = session();

        carts.add_item(&session, catalog.get(ProductId::new(2)).unwrap()).await.unwrap();
        assert!(carts.remove_item(&session, ProductId::new(2)).await.unwrap().outcome);

        assert!(carts.snapshot(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_get_separate_carts() {
        let catalog = Catalog::plants();
        let carts = store();
        let (alice, bob) = (session(), session());

        carts.add_item(&alice, catalog.get(ProductId::new(1)).unwrap()).await.unwrap();
        carts.add_item(&bob, catalog.get(ProductId::new(4)).unwrap()).await.unwrap();

        let alice_cart = carts.snapshot(&alice).await.unwrap();
        assert!(alice_cart.contains(ProductId::new(1)));
        assert!(!alice_cart.contains(ProductId::new(4)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_all_applied() {
        let catalog = Arc::new(Catalog::plants());
        let carts = store();
        let session = session();

        carts.add_item(&session, catalog.get(ProductId::new(1)).unwrap()).await.unwrap();

        let mut tasks = JoinSet::new();
        for i in 0..20 {
            let (catalog, carts, session) = (catalog.clone(), carts.clone(), session.clone());
            tasks.spawn(async move {
                let product = catalog.get(ProductId::new(1 + i % 6)).unwrap();
                carts.add_item(&session, product).await.unwrap();
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        let cart = carts.snapshot(&session).await.unwrap();
        assert_eq!(cart.total_item_count(), 21);
        assert_eq!(cart.revision(), 21);
    }
}
