//! Per-side partition of orders into active and hibernated sets.
//!
//! Active orders are eligible for best-price computation; hibernated
//! orders are set aside but retained for later amendment, removal or
//! re-add. Hibernation is an opaque capability of the source feed: the
//! book does not interpret why an order was set aside.
//!
//! Invariant: an order id occupies at most one of {active, hibernated}
//! at any time. Every operation below preserves it.

use ahash::AHashMap;

use crate::error::{ReplayError, Result};
use crate::types::{Order, Side};

/// One side's orders, partitioned into active and hibernated.
///
/// All four lifecycle operations are O(1) expected-time hash
/// operations keyed by order id.
#[derive(Debug, Clone)]
pub struct OrderSet {
    side: Side,

    /// Orders eligible for best-price computation: order id -> Order
    active: AHashMap<u64, Order>,

    /// Orders excluded from best-price computation: order id -> Order
    hibernated: AHashMap<u64, Order>,
}

impl OrderSet {
    /// Create an empty order set for one side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            active: AHashMap::new(),
            hibernated: AHashMap::new(),
        }
    }

    /// The side this set belongs to.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert a new order into the active set.
    ///
    /// Fails with [`ReplayError::DuplicateOrder`] if the id is already
    /// active. A hibernated copy of the same id is dropped as part of
    /// the same call: the source feed re-adds orders it previously set
    /// aside, and the fresh snapshot supersedes the parked one.
    pub fn insert(&mut self, order: Order) -> Result<()> {
        if self.active.contains_key(&order.id) {
            return Err(ReplayError::DuplicateOrder {
                order_id: order.id,
                side: self.side,
            });
        }

        self.hibernated.remove(&order.id);
        self.active.insert(order.id, order);

        Ok(())
    }

    /// Replace an existing order snapshot wholesale.
    ///
    /// The replacement lands wherever the id currently lives: an
    /// active order stays active, a hibernated order stays hibernated.
    /// Fails with [`ReplayError::OrderNotFound`] if the id is in
    /// neither collection.
    pub fn amend(&mut self, order: Order) -> Result<()> {
        if let Some(existing) = self.active.get_mut(&order.id) {
            *existing = order;
            return Ok(());
        }

        if let Some(existing) = self.hibernated.get_mut(&order.id) {
            *existing = order;
            return Ok(());
        }

        Err(ReplayError::OrderNotFound {
            order_id: order.id,
            side: self.side,
        })
    }

    /// Delete an order from wherever it lives.
    ///
    /// Fails with [`ReplayError::OrderNotFound`] if the id is in
    /// neither collection.
    pub fn remove(&mut self, order_id: u64) -> Result<Order> {
        if let Some(order) = self.active.remove(&order_id) {
            return Ok(order);
        }

        if let Some(order) = self.hibernated.remove(&order_id) {
            return Ok(order);
        }

        Err(ReplayError::OrderNotFound {
            order_id,
            side: self.side,
        })
    }

    /// Move an active order into the hibernated set.
    ///
    /// The event's snapshot is what gets parked, superseding the active
    /// copy. Fails with [`ReplayError::OrderNotFound`] if the id is not
    /// currently active (a hibernated id cannot hibernate again).
    pub fn hibernate(&mut self, order: Order) -> Result<()> {
        if self.active.remove(&order.id).is_none() {
            return Err(ReplayError::OrderNotFound {
                order_id: order.id,
                side: self.side,
            });
        }

        self.hibernated.insert(order.id, order);

        Ok(())
    }

    /// Best active price: highest for the buy side, lowest for sell.
    ///
    /// `None` when the active set is empty. Hibernated orders never
    /// influence this.
    pub fn best_active_price(&self) -> Option<i64> {
        let prices = self.active.values().map(|o| o.price);
        match self.side {
            Side::Buy => prices.max(),
            Side::Sell => prices.min(),
        }
    }

    /// Distinct active prices, best first.
    ///
    /// Buy side descending, sell side ascending. Used by the
    /// crossed-book resolver to walk successively worse price levels.
    pub fn active_prices_best_first(&self) -> Vec<i64> {
        let mut prices: Vec<i64> = self.active.values().map(|o| o.price).collect();
        match self.side {
            Side::Buy => prices.sort_unstable_by(|a, b| b.cmp(a)),
            Side::Sell => prices.sort_unstable(),
        }
        prices.dedup();
        prices
    }

    /// Number of active orders.
    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of hibernated orders.
    #[inline]
    pub fn hibernated_len(&self) -> usize {
        self.hibernated.len()
    }

    /// True if no order is currently active on this side.
    #[inline]
    pub fn is_active_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Look up an active order.
    pub fn get_active(&self, order_id: u64) -> Option<&Order> {
        self.active.get(&order_id)
    }

    /// Look up a hibernated order.
    pub fn get_hibernated(&self, order_id: u64) -> Option<&Order> {
        self.hibernated.get(&order_id)
    }

    /// Iterate over active orders (arbitrary order).
    pub fn active_orders(&self) -> impl Iterator<Item = &Order> {
        self.active.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: u64, price: i64) -> Order {
        Order::new(id, price, 1_000_000_000)
    }

    fn assert_disjoint(set: &OrderSet, id: u64) {
        assert!(
            !(set.get_active(id).is_some() && set.get_hibernated(id).is_some()),
            "order {id} present in both active and hibernated"
        );
    }

    #[test]
    fn test_insert_and_duplicate() {
        let mut set = OrderSet::new(Side::Buy);
        set.insert(order(1, 10)).unwrap();

        let err = set.insert(order(1, 11)).unwrap_err();
        assert_eq!(
            err,
            ReplayError::DuplicateOrder {
                order_id: 1,
                side: Side::Buy
            }
        );
        // Failed insert leaves the original untouched.
        assert_eq!(set.get_active(1).unwrap().price, 10);
    }

    #[test]
    fn test_insert_supersedes_hibernated_copy() {
        let mut set = OrderSet::new(Side::Buy);
        set.insert(order(1, 10)).unwrap();
        set.hibernate(order(1, 10)).unwrap();
        assert_eq!(set.hibernated_len(), 1);

        set.insert(order(1, 12)).unwrap();
        assert_eq!(set.get_active(1).unwrap().price, 12);
        assert_eq!(set.hibernated_len(), 0);
        assert_disjoint(&set, 1);
    }

    #[test]
    fn test_amend_active_in_place() {
        let mut set = OrderSet::new(Side::Sell);
        set.insert(order(5, 20)).unwrap();

        set.amend(order(5, 25)).unwrap();
        assert_eq!(set.get_active(5).unwrap().price, 25);
        assert_eq!(set.active_len(), 1);
    }

    #[test]
    fn test_amend_hibernated_stays_hibernated() {
        let mut set = OrderSet::new(Side::Sell);
        set.insert(order(5, 20)).unwrap();
        set.hibernate(order(5, 20)).unwrap();

        set.amend(order(5, 30)).unwrap();
        assert!(set.get_active(5).is_none());
        assert_eq!(set.get_hibernated(5).unwrap().price, 30);
        assert_disjoint(&set, 5);
    }

    #[test]
    fn test_amend_missing() {
        let mut set = OrderSet::new(Side::Buy);
        let err = set.amend(order(99, 10)).unwrap_err();
        assert_eq!(
            err,
            ReplayError::OrderNotFound {
                order_id: 99,
                side: Side::Buy
            }
        );
    }

    #[test]
    fn test_remove_from_active_then_hibernated() {
        let mut set = OrderSet::new(Side::Buy);
        set.insert(order(1, 10)).unwrap();
        set.insert(order(2, 11)).unwrap();
        set.hibernate(order(2, 11)).unwrap();

        assert_eq!(set.remove(1).unwrap().price, 10);
        assert_eq!(set.remove(2).unwrap().price, 11);
        assert!(set.remove(1).is_err());
        assert_eq!(set.active_len(), 0);
        assert_eq!(set.hibernated_len(), 0);
    }

    #[test]
    fn test_hibernate_requires_active() {
        let mut set = OrderSet::new(Side::Buy);
        set.insert(order(1, 10)).unwrap();
        set.hibernate(order(1, 10)).unwrap();

        // Already hibernated: not active, so a second hibernate fails.
        let err = set.hibernate(order(1, 10)).unwrap_err();
        assert!(matches!(err, ReplayError::OrderNotFound { order_id: 1, .. }));
    }

    #[test]
    fn test_best_active_price_by_side() {
        let mut buys = OrderSet::new(Side::Buy);
        buys.insert(order(1, 10)).unwrap();
        buys.insert(order(2, 12)).unwrap();
        buys.insert(order(3, 8)).unwrap();
        assert_eq!(buys.best_active_price(), Some(12));

        let mut sells = OrderSet::new(Side::Sell);
        sells.insert(order(1, 10)).unwrap();
        sells.insert(order(2, 12)).unwrap();
        sells.insert(order(3, 8)).unwrap();
        assert_eq!(sells.best_active_price(), Some(8));
    }

    #[test]
    fn test_best_price_ignores_hibernated() {
        let mut buys = OrderSet::new(Side::Buy);
        buys.insert(order(1, 10)).unwrap();
        buys.insert(order(2, 15)).unwrap();
        buys.hibernate(order(2, 15)).unwrap();

        assert_eq!(buys.best_active_price(), Some(10));

        buys.hibernate(order(1, 10)).unwrap();
        assert_eq!(buys.best_active_price(), None);
        assert!(buys.is_active_empty());
    }

    #[test]
    fn test_active_prices_best_first_dedups() {
        let mut sells = OrderSet::new(Side::Sell);
        sells.insert(order(1, 12)).unwrap();
        sells.insert(order(2, 12)).unwrap();
        sells.insert(order(3, 14)).unwrap();
        sells.insert(order(4, 11)).unwrap();

        assert_eq!(sells.active_prices_best_first(), vec![11, 12, 14]);

        let mut buys = OrderSet::new(Side::Buy);
        buys.insert(order(1, 12)).unwrap();
        buys.insert(order(2, 14)).unwrap();
        buys.insert(order(3, 14)).unwrap();
        assert_eq!(buys.active_prices_best_first(), vec![14, 12]);
    }
}
