//! The inventory ledger: product quantities plus the append-only movement log.
//!
//! All quantity changes go through [`Ledger::apply_movement`] (or its two halves,
//! [`Ledger::prepare_movement`] and [`Ledger::commit`]). Aggregates such as the
//! low-stock list and total valuation are recomputed from current state on every
//! call; there are no counters to drift out of sync.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use stockroom_core::{Clock, DomainError, ExpectedVersion, Money, MovementId, ProductId, SystemClock};

use crate::dashboard::DashboardSnapshot;
use crate::error::{LedgerError, LedgerResult};
use crate::movement::{MovementKind, MovementRequest, StockMovement};
use crate::product::{NewProduct, Product, ProductPatch};
use crate::validator::validate;

/// Serializable ledger state, used for seeding and persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub movements: Vec<StockMovement>,
    /// Next product id to hand out. Ids of deleted products are never reused,
    /// so this can be ahead of every id present in `products`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_product_id: Option<ProductId>,
}

/// A validated movement that has not been applied yet.
///
/// Produced by [`Ledger::prepare_movement`] without touching state. It remembers
/// the product version and movement id it was computed against; [`Ledger::commit`]
/// refuses it if either has moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMovement {
    base_version: u64,
    product: Product,
    movement: StockMovement,
}

impl PreparedMovement {
    /// The product as it will look once committed.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// The record that will be appended.
    pub fn movement(&self) -> &StockMovement {
        &self.movement
    }
}

/// Owned inventory state container.
///
/// Constructed explicitly by the host; there is no process-wide instance.
#[derive(Clone)]
pub struct Ledger {
    products: BTreeMap<ProductId, Product>,
    movements: Vec<StockMovement>,
    next_product_id: ProductId,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ledger")
            .field("products", &self.products.len())
            .field("movements", &self.movements.len())
            .field("next_product_id", &self.next_product_id)
            .finish_non_exhaustive()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            products: BTreeMap::new(),
            movements: Vec::new(),
            next_product_id: ProductId::FIRST,
            clock,
        }
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// Rejects duplicate or zero product ids, blank product names, movements with
    /// a zero id or zero quantity, and movement logs whose ids are not strictly
    /// increasing. Ids at the very end of the `u64` range are rejected too, since
    /// no successor could be handed out after them.
    pub fn from_snapshot(snapshot: LedgerSnapshot, clock: Arc<dyn Clock>) -> LedgerResult<Self> {
        let mut ledger = Self::with_clock(clock);

        for product in snapshot.products {
            let product = product.restored()?;
            let id = product.id_typed();
            if id.get() == 0 {
                return Err(DomainError::invariant("product id 0 is not a valid id").into());
            }
            if ledger.products.insert(id, product).is_some() {
                return Err(DomainError::invariant(format!("duplicate product id {id}")).into());
            }
        }

        let mut last: Option<MovementId> = None;
        for movement in &snapshot.movements {
            let id = movement.id_typed();
            if id.get() == 0 {
                return Err(DomainError::invariant("movement id 0 is not a valid id").into());
            }
            if movement.quantity() == 0 {
                return Err(DomainError::invariant(format!("movement {id} moves zero units")).into());
            }
            if last.is_some_and(|prev| id <= prev) {
                return Err(DomainError::invariant(format!(
                    "movement ids must be strictly increasing (found {id} after {})",
                    last.map(|p| p.get()).unwrap_or_default()
                ))
                .into());
            }
            last = Some(id);
        }
        ledger.movements = snapshot.movements;

        let highest_seen = ledger
            .products
            .keys()
            .copied()
            .chain(ledger.movements.iter().map(StockMovement::product_id))
            .max()
            .map(ProductId::next)
            .transpose()?
            .unwrap_or(ProductId::FIRST);
        if let Some(last) = last {
            last.next()?;
        }
        ledger.next_product_id = snapshot
            .next_product_id
            .map_or(highest_seen, |declared| declared.max(highest_seen));

        Ok(ledger)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            products: self.products.values().cloned().collect(),
            movements: self.movements.clone(),
            next_product_id: Some(self.next_product_id),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Stock movements
    // ─────────────────────────────────────────────────────────────────────

    /// Validate and apply a movement in one step.
    ///
    /// Either the quantity update and the log append both happen, or neither does.
    pub fn apply_movement(&mut self, request: MovementRequest) -> LedgerResult<StockMovement> {
        let prepared = self.prepare_movement(&request)?;
        self.commit(prepared)
    }

    /// Decide a movement against current state without changing anything.
    pub fn prepare_movement(&self, request: &MovementRequest) -> LedgerResult<PreparedMovement> {
        let product = self
            .products
            .get(&request.product_id)
            .ok_or(LedgerError::UnknownProduct(request.product_id))?;

        let current = product.quantity();
        let quantity = validate(current, request.kind, request.quantity)?;

        let new_quantity = match request.kind {
            MovementKind::Entry => current
                .checked_add(quantity)
                .ok_or_else(|| DomainError::invariant("stock quantity would overflow"))?,
            // validate() guarantees quantity <= current.
            MovementKind::Exit => current - quantity,
        };

        let now = self.clock.now();
        let movement = StockMovement::record(
            self.next_movement_id()?,
            product.id_typed(),
            product.name(),
            request.kind,
            quantity,
            now,
            &request.actor,
            request.reason.clone(),
        );

        Ok(PreparedMovement {
            base_version: product.version(),
            product: product.with_quantity(new_quantity, now),
            movement,
        })
    }

    /// Apply a prepared movement.
    ///
    /// Fails with `Conflict` if the product or the log changed since preparation,
    /// and with `UnknownProduct` if the product was deleted in between.
    pub fn commit(&mut self, prepared: PreparedMovement) -> LedgerResult<StockMovement> {
        let id = prepared.product.id_typed();
        let current = self.products.get(&id).ok_or(LedgerError::UnknownProduct(id))?;

        ExpectedVersion::Exact(prepared.base_version).check(current.version())?;
        let expected_id = self.next_movement_id()?;
        if prepared.movement.id_typed() != expected_id {
            return Err(DomainError::conflict(format!(
                "movement id {} is stale (next is {expected_id})",
                prepared.movement.id_typed()
            ))
            .into());
        }

        self.products.insert(id, prepared.product);
        self.movements.push(prepared.movement.clone());
        Ok(prepared.movement)
    }

    /// Highest recorded id + 1, or 1 for an empty log.
    ///
    /// The log is append-only and ids increase with insertion, so the last entry
    /// holds the maximum.
    pub fn next_movement_id(&self) -> LedgerResult<MovementId> {
        match self.movements.last() {
            Some(last) => Ok(last.id_typed().next()?),
            None => Ok(MovementId::FIRST),
        }
    }

    /// All movements in insertion (creation) order.
    pub fn movements(&self) -> &[StockMovement] {
        &self.movements
    }

    /// Up to `limit` movements, most recent first.
    ///
    /// Ordered by timestamp descending, ties broken by id descending.
    pub fn recent_movements(&self, limit: usize) -> Vec<StockMovement> {
        let mut ordered: Vec<&StockMovement> = self.movements.iter().collect();
        ordered.sort_by(|a, b| {
            b.timestamp()
                .cmp(&a.timestamp())
                .then_with(|| b.id_typed().cmp(&a.id_typed()))
        });
        ordered.into_iter().take(limit).cloned().collect()
    }

    /// Movements of one product, most recent first.
    ///
    /// Works for deleted products too; their history is retained.
    pub fn movements_for_product(&self, product_id: ProductId) -> Vec<StockMovement> {
        let mut matching: Vec<StockMovement> = self
            .movements
            .iter()
            .filter(|m| m.product_id() == product_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.timestamp()
                .cmp(&a.timestamp())
                .then_with(|| b.id_typed().cmp(&a.id_typed()))
        });
        matching
    }

    /// Number of movements whose timestamp falls on `date` in time zone `tz`.
    pub fn movements_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> usize {
        self.movements
            .iter()
            .filter(|m| m.timestamp().with_timezone(tz).date_naive() == date)
            .count()
    }

    /// Number of movements recorded on the current calendar day in `tz`.
    pub fn movements_today_in<Tz: TimeZone>(&self, tz: &Tz) -> usize {
        let today = self.clock.now().with_timezone(tz).date_naive();
        self.movements_on(today, tz)
    }

    /// Number of movements recorded today in the local time zone.
    pub fn movements_today(&self) -> usize {
        self.movements_today_in(&Local)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derived aggregates
    // ─────────────────────────────────────────────────────────────────────

    pub fn total_products(&self) -> usize {
        self.products.len()
    }

    /// Sum of `quantity × price` over all products.
    pub fn total_value(&self) -> Money {
        self.products.values().map(Product::stock_value).sum()
    }

    /// Products at or below their minimum stock, ordered by id.
    pub fn list_low_stock(&self) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect()
    }

    /// Everything the dashboard shows, computed in one pass over current state.
    pub fn dashboard<Tz: TimeZone>(&self, recent_limit: usize, tz: &Tz) -> DashboardSnapshot {
        DashboardSnapshot {
            total_products: self.total_products(),
            total_value: self.total_value(),
            low_stock: self.list_low_stock(),
            movements_today: self.movements_today_in(tz),
            recent_movements: self.recent_movements(recent_limit),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────

    pub fn create_product(&mut self, new: NewProduct) -> LedgerResult<Product> {
        let id = self.next_product_id;
        let following = id.next()?;
        let product = Product::create(id, new, self.clock.now())?;
        self.products.insert(id, product.clone());
        self.next_product_id = following;
        Ok(product)
    }

    /// Change catalog attributes. Quantity is not among them.
    pub fn update_product(&mut self, id: ProductId, patch: ProductPatch) -> LedgerResult<Product> {
        let now = self.clock.now();
        let product = self.products.get_mut(&id).ok_or(LedgerError::UnknownProduct(id))?;
        product.apply_patch(patch, now)?;
        Ok(product.clone())
    }

    /// Remove a product from the catalog.
    ///
    /// Its movement records stay in the log unchanged; they carry their own copy
    /// of the product name. The id is not handed out again.
    pub fn delete_product(&mut self, id: ProductId) -> LedgerResult<Product> {
        self.products.remove(&id).ok_or(LedgerError::UnknownProduct(id))
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// All products ordered by id.
    pub fn products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    /// Case-insensitive substring match on name or description.
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.products
            .values()
            .filter(|p| {
                p.name().to_lowercase().contains(&needle)
                    || p.description().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn products_in_category(&self, category: &str) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| p.category() == category)
            .cloned()
            .collect()
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.products
            .values()
            .map(|p| p.category())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, Utc};
    use stockroom_auth::{Actor, Role};
    use stockroom_core::{FixedClock, UserId};

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-09-10T14:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn admin() -> Actor {
        Actor::new(UserId::new(1), "admin", Role::Admin)
    }

    fn clerk() -> Actor {
        Actor::new(UserId::new(2), "user", Role::User)
    }

    fn setup() -> (Ledger, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(start()));
        (Ledger::with_clock(clock.clone()), clock)
    }

    fn add(ledger: &mut Ledger, name: &str, cents: u64, quantity: u64, min_stock: u64) -> ProductId {
        ledger
            .create_product(NewProduct::new(name, Money::from_cents(cents), quantity, min_stock))
            .unwrap()
            .id_typed()
    }

    #[test]
    fn entry_raises_quantity_and_clears_low_stock() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "Laptop Dell XPS 13", 129_999, 15, 5);

        let movement = ledger.apply_movement(MovementRequest::entry(p, 10, admin())).unwrap();

        assert_eq!(ledger.product(p).unwrap().quantity(), 25);
        assert_eq!(ledger.movements().len(), 1);
        assert_eq!(movement.id_typed(), MovementId::FIRST);
        assert_eq!(movement.product_name(), "Laptop Dell XPS 13");
        assert_eq!(movement.username(), "admin");
        assert_eq!(movement.timestamp(), start());
        assert!(ledger.list_low_stock().iter().all(|x| x.id_typed() != p));
    }

    #[test]
    fn entry_that_stays_under_threshold_keeps_product_low() {
        let (mut ledger, _) = setup();
        let q = add(&mut ledger, "Mouse Logitech MX Master", 9_999, 3, 10);
        assert_eq!(ledger.list_low_stock()[0].id_typed(), q);

        ledger.apply_movement(MovementRequest::entry(q, 7, clerk())).unwrap();

        assert_eq!(ledger.product(q).unwrap().quantity(), 10);
        let low: Vec<_> = ledger.list_low_stock().iter().map(Product::id_typed).collect();
        assert_eq!(low, vec![q]);
    }

    #[test]
    fn exit_may_empty_stock_but_not_overdraw() {
        let (mut ledger, _) = setup();
        let r = add(&mut ledger, "Monitor Samsung 27\"", 39_999, 7, 5);

        ledger.apply_movement(MovementRequest::exit(r, 7, clerk())).unwrap();
        assert_eq!(ledger.product(r).unwrap().quantity(), 0);

        let err = ledger.apply_movement(MovementRequest::exit(r, 1, clerk())).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                available: 0,
                requested: 1
            }
        );
        assert_eq!(ledger.product(r).unwrap().quantity(), 0);
        assert_eq!(ledger.movements().len(), 1);
    }

    #[test]
    fn negative_exit_is_invalid_regardless_of_stock() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "Teclado Mecánico", 14_999, 25, 15);

        let err = ledger.apply_movement(MovementRequest::exit(p, -5, clerk())).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidQuantity(_)));
        assert_eq!(ledger.product(p).unwrap().quantity(), 25);
        assert!(ledger.movements().is_empty());
    }

    #[test]
    fn unknown_product_creates_nothing() {
        let (mut ledger, _) = setup();
        add(&mut ledger, "Laptop", 100, 1, 0);

        let missing = ProductId::new(99);
        let err = ledger.apply_movement(MovementRequest::entry(missing, 1, admin())).unwrap_err();
        assert_eq!(err, LedgerError::UnknownProduct(missing));
        assert!(ledger.movements().is_empty());
    }

    #[test]
    fn reason_is_recorded() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "USB-C Hub", 4_000, 100, 15);
        let movement = ledger
            .apply_movement(MovementRequest::exit(p, 2, clerk()).with_reason("damaged in transit"))
            .unwrap();
        assert_eq!(movement.reason(), Some("damaged in transit"));
    }

    #[test]
    fn prepare_does_not_mutate_state() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "Laptop", 100, 10, 0);
        let before = ledger.snapshot();

        let prepared = ledger.prepare_movement(&MovementRequest::exit(p, 4, clerk())).unwrap();
        assert_eq!(prepared.product().quantity(), 6);
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn stale_prepared_movement_is_refused() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "Laptop", 100, 10, 0);

        let first = ledger.prepare_movement(&MovementRequest::exit(p, 6, clerk())).unwrap();
        let second = ledger.prepare_movement(&MovementRequest::exit(p, 6, admin())).unwrap();

        ledger.commit(first).unwrap();
        let err = ledger.commit(second).unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::Conflict(_))));
        assert_eq!(ledger.product(p).unwrap().quantity(), 4);
        assert_eq!(ledger.movements().len(), 1);
    }

    #[test]
    fn commit_after_delete_reports_unknown_product() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "Laptop", 100, 10, 0);
        let prepared = ledger.prepare_movement(&MovementRequest::entry(p, 1, admin())).unwrap();
        ledger.delete_product(p).unwrap();

        assert_eq!(ledger.commit(prepared).unwrap_err(), LedgerError::UnknownProduct(p));
        assert!(ledger.movements().is_empty());
    }

    #[test]
    fn recent_movements_are_newest_first_with_id_tie_break() {
        let (mut ledger, clock) = setup();
        let p = add(&mut ledger, "Laptop", 100, 100, 0);

        ledger.apply_movement(MovementRequest::entry(p, 1, admin())).unwrap();
        ledger.apply_movement(MovementRequest::entry(p, 2, admin())).unwrap();
        clock.advance(Duration::minutes(5));
        ledger.apply_movement(MovementRequest::exit(p, 3, clerk())).unwrap();

        let ids: Vec<u64> = ledger.recent_movements(10).iter().map(|m| m.id_typed().get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let ids: Vec<u64> = ledger.recent_movements(2).iter().map(|m| m.id_typed().get()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert!(ledger.recent_movements(0).is_empty());
    }

    #[test]
    fn movements_today_respects_time_zone_boundaries() {
        let (mut ledger, clock) = setup();
        let p = add(&mut ledger, "Laptop", 100, 100, 0);

        // 23:30 UTC on the 9th is already the 10th in UTC+02:00.
        clock.set(start() - Duration::hours(15));
        ledger.apply_movement(MovementRequest::entry(p, 1, admin())).unwrap();
        clock.set(start());
        ledger.apply_movement(MovementRequest::entry(p, 1, admin())).unwrap();

        assert_eq!(ledger.movements_today_in(&Utc), 1);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(ledger.movements_today_in(&plus_two), 2);

        let yesterday = NaiveDate::from_ymd_opt(2024, 9, 9).unwrap();
        assert_eq!(ledger.movements_on(yesterday, &Utc), 1);
    }

    #[test]
    fn total_value_sums_quantity_times_price() {
        let (mut ledger, _) = setup();
        let a = add(&mut ledger, "A", 129_999, 15, 5);
        add(&mut ledger, "B", 9_999, 3, 10);
        assert_eq!(ledger.total_value(), Money::from_cents(129_999 * 15 + 9_999 * 3));

        ledger.apply_movement(MovementRequest::exit(a, 5, clerk())).unwrap();
        assert_eq!(ledger.total_value(), Money::from_cents(129_999 * 10 + 9_999 * 3));
    }

    #[test]
    fn product_ids_are_never_reused() {
        let (mut ledger, _) = setup();
        let a = add(&mut ledger, "A", 1, 1, 0);
        let b = add(&mut ledger, "B", 1, 1, 0);
        ledger.delete_product(b).unwrap();
        let c = add(&mut ledger, "C", 1, 1, 0);

        assert_eq!(a, ProductId::new(1));
        assert_eq!(c, ProductId::new(3));
    }

    #[test]
    fn deleting_product_keeps_its_history() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "Legacy Cable", 500, 10, 0);
        ledger.apply_movement(MovementRequest::exit(p, 4, clerk())).unwrap();

        let removed = ledger.delete_product(p).unwrap();
        assert_eq!(removed.quantity(), 6);
        assert!(ledger.product(p).is_none());
        assert_eq!(ledger.delete_product(p).unwrap_err(), LedgerError::UnknownProduct(p));

        let history = ledger.movements_for_product(p);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].product_name(), "Legacy Cable");
        assert_eq!(ledger.total_value(), Money::ZERO);
    }

    #[test]
    fn rename_does_not_rewrite_history() {
        let (mut ledger, _) = setup();
        let p = add(&mut ledger, "Old Name", 500, 10, 0);
        ledger.apply_movement(MovementRequest::entry(p, 1, admin())).unwrap();

        let patch = ProductPatch {
            name: Some("New Name".to_string()),
            ..ProductPatch::default()
        };
        let updated = ledger.update_product(p, patch).unwrap();

        assert_eq!(updated.name(), "New Name");
        assert_eq!(updated.quantity(), 11);
        assert_eq!(ledger.movements()[0].product_name(), "Old Name");
    }

    #[test]
    fn update_unknown_product_fails() {
        let (mut ledger, _) = setup();
        let err = ledger.update_product(ProductId::new(5), ProductPatch::default()).unwrap_err();
        assert_eq!(err, LedgerError::UnknownProduct(ProductId::new(5)));
    }

    #[test]
    fn catalog_queries() {
        let (mut ledger, _) = setup();
        for (name, description, category) in [
            ("Laptop Pro X", "High-performance laptop", "Electronics"),
            ("Mechanical Keyboard", "Tactile switches", "Accessories"),
            ("Wireless Mouse", "Ergonomic, long battery life", "Accessories"),
            ("4K Monitor", "27-inch UHD", "Electronics"),
        ] {
            ledger
                .create_product(
                    NewProduct::new(name, Money::from_cents(100), 10, 1)
                        .with_description(description)
                        .with_category(category),
                )
                .unwrap();
        }

        let hits: Vec<String> = ledger
            .search_products("LAPTOP")
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(hits, vec!["Laptop Pro X"]);
        assert_eq!(ledger.search_products("battery").len(), 1);
        assert_eq!(ledger.products_in_category("Accessories").len(), 2);
        assert_eq!(ledger.categories(), vec!["Accessories", "Electronics"]);
        assert_eq!(ledger.total_products(), 4);
    }

    #[test]
    fn dashboard_collects_every_aggregate() {
        let (mut ledger, _) = setup();
        let laptop = add(&mut ledger, "Laptop", 100_000, 15, 5);
        add(&mut ledger, "Mouse", 10_000, 3, 10);
        ledger.apply_movement(MovementRequest::entry(laptop, 10, admin())).unwrap();

        let dashboard = ledger.dashboard(10, &Utc);
        assert_eq!(dashboard.total_products, 2);
        assert_eq!(dashboard.total_value, Money::from_cents(100_000 * 25 + 10_000 * 3));
        assert_eq!(dashboard.low_stock.len(), 1);
        assert_eq!(dashboard.movements_today, 1);
        assert_eq!(dashboard.recent_movements.len(), 1);
    }

    #[test]
    fn snapshot_round_trip_preserves_id_sequences() {
        let (mut ledger, clock) = setup();
        let a = add(&mut ledger, "A", 1, 5, 0);
        let b = add(&mut ledger, "B", 1, 5, 0);
        ledger.apply_movement(MovementRequest::exit(a, 2, clerk())).unwrap();
        ledger.delete_product(b).unwrap();

        let json = serde_json::to_string(&ledger.snapshot()).unwrap();
        let restored: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        let mut ledger = Ledger::from_snapshot(restored, clock).unwrap();

        assert_eq!(ledger.product(a).unwrap().quantity(), 3);
        assert_eq!(ledger.next_movement_id().unwrap(), MovementId::new(2));
        assert_eq!(add(&mut ledger, "C", 1, 1, 0), ProductId::new(3));
    }

    #[test]
    fn snapshot_ids_must_increase() {
        let (mut ledger, clock) = setup();
        let a = add(&mut ledger, "A", 1, 5, 0);
        ledger.apply_movement(MovementRequest::entry(a, 1, admin())).unwrap();
        ledger.apply_movement(MovementRequest::entry(a, 1, admin())).unwrap();

        let mut snapshot = ledger.snapshot();
        snapshot.movements.reverse();
        let err = Ledger::from_snapshot(snapshot, clock.clone()).unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::InvariantViolation(_))));

        let mut snapshot = ledger.snapshot();
        let duplicate = snapshot.products[0].clone();
        snapshot.products.push(duplicate);
        assert!(Ledger::from_snapshot(snapshot, clock).is_err());
    }

    /// Round-trips a snapshot through JSON so tests can plant records the
    /// ledger itself would never produce.
    fn edited_snapshot(ledger: &Ledger, edit: impl FnOnce(&mut serde_json::Value)) -> LedgerSnapshot {
        let mut value = serde_json::to_value(ledger.snapshot()).unwrap();
        edit(&mut value);
        serde_json::from_value(value).unwrap()
    }

    fn assert_invariant_violation(result: LedgerResult<Ledger>) {
        match result {
            Err(LedgerError::Domain(DomainError::InvariantViolation(_))) => {}
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_rejects_zero_quantity_movement() {
        let (mut ledger, clock) = setup();
        let a = add(&mut ledger, "A", 1, 5, 0);
        ledger.apply_movement(MovementRequest::exit(a, 2, clerk())).unwrap();

        let snapshot = edited_snapshot(&ledger, |v| v["movements"][0]["quantity"] = 0.into());
        assert_invariant_violation(Ledger::from_snapshot(snapshot, clock.clone()));

        let snapshot = edited_snapshot(&ledger, |v| v["movements"][0]["id"] = 0.into());
        assert_invariant_violation(Ledger::from_snapshot(snapshot, clock));
    }

    #[test]
    fn snapshot_rejects_product_id_at_end_of_range() {
        let (mut ledger, clock) = setup();
        add(&mut ledger, "A", 1, 5, 0);

        let snapshot = edited_snapshot(&ledger, |v| v["products"][0]["id"] = u64::MAX.into());
        assert_invariant_violation(Ledger::from_snapshot(snapshot, clock.clone()));

        let snapshot = edited_snapshot(&ledger, |v| v["products"][0]["id"] = 0.into());
        assert_invariant_violation(Ledger::from_snapshot(snapshot, clock));
    }

    #[test]
    fn snapshot_rejects_movement_id_at_end_of_range() {
        let (mut ledger, clock) = setup();
        let a = add(&mut ledger, "A", 1, 5, 0);
        ledger.apply_movement(MovementRequest::entry(a, 1, admin())).unwrap();

        let snapshot = edited_snapshot(&ledger, |v| v["movements"][0]["id"] = u64::MAX.into());
        assert_invariant_violation(Ledger::from_snapshot(snapshot, clock));
    }

    #[test]
    fn exhausted_product_sequence_fails_without_inserting() {
        let (mut ledger, clock) = setup();
        let mut snapshot = ledger.snapshot();
        snapshot.next_product_id = Some(ProductId::new(u64::MAX));
        ledger = Ledger::from_snapshot(snapshot, clock).unwrap();

        let err = ledger
            .create_product(NewProduct::new("Last", Money::ZERO, 1, 0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::InvariantViolation(_))));
        assert_eq!(ledger.total_products(), 0);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Move { product: u64, exit: bool, quantity: i64 },
            Advance { minutes: i64 },
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (1u64..=4, any::<bool>(), -5i64..40)
                    .prop_map(|(product, exit, quantity)| Op::Move { product, exit, quantity }),
                1 => (0i64..600).prop_map(|minutes| Op::Advance { minutes }),
            ]
        }

        fn seeded() -> (Ledger, Arc<FixedClock>) {
            let (mut ledger, clock) = setup();
            add(&mut ledger, "P", 1_500, 15, 5);
            add(&mut ledger, "Q", 999, 3, 10);
            add(&mut ledger, "R", 250, 7, 0);
            (ledger, clock)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: quantities never go negative, the log grows by exactly one per
            /// accepted movement and zero per rejection, existing records never change,
            /// and rejections leave quantities untouched.
            #[test]
            fn ledger_invariants_hold_over_any_sequence(ops in prop::collection::vec(op(), 0..60)) {
                let (mut ledger, clock) = seeded();

                for op in ops {
                    match op {
                        Op::Advance { minutes } => clock.advance(Duration::minutes(minutes)),
                        Op::Move { product, exit, quantity } => {
                            let id = ProductId::new(product);
                            let before_log = ledger.movements().to_vec();
                            let before_qty = ledger.product(id).map(Product::quantity);
                            let kind = if exit { MovementKind::Exit } else { MovementKind::Entry };

                            let result = ledger.apply_movement(MovementRequest::new(id, kind, quantity, clerk()));
                            let after_qty = ledger.product(id).map(Product::quantity);

                            match result {
                                Ok(movement) => {
                                    prop_assert_eq!(ledger.movements().len(), before_log.len() + 1);
                                    prop_assert_eq!(&ledger.movements()[..before_log.len()], &before_log[..]);
                                    prop_assert_eq!(ledger.movements().last(), Some(&movement));
                                    let (before, after) = (before_qty.unwrap_or(0), after_qty.unwrap_or(0));
                                    match kind {
                                        MovementKind::Entry => prop_assert_eq!(after, before + movement.quantity()),
                                        MovementKind::Exit => prop_assert_eq!(after + movement.quantity(), before),
                                    }
                                }
                                Err(err) => {
                                    prop_assert_eq!(ledger.movements(), &before_log[..]);
                                    prop_assert_eq!(after_qty, before_qty);
                                    if quantity <= 0 && before_qty.is_some() {
                                        prop_assert!(matches!(err, LedgerError::InvalidQuantity(_)));
                                    }
                                }
                            }
                        }
                    }
                }

                let ids: Vec<MovementId> = ledger.movements().iter().map(StockMovement::id_typed).collect();
                prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            }

            /// Property: aggregates always equal a fresh recomputation from products.
            #[test]
            fn aggregates_match_fresh_recomputation(ops in prop::collection::vec(op(), 0..60)) {
                let (mut ledger, clock) = seeded();

                for op in ops {
                    match op {
                        Op::Advance { minutes } => clock.advance(Duration::minutes(minutes)),
                        Op::Move { product, exit, quantity } => {
                            let kind = if exit { MovementKind::Exit } else { MovementKind::Entry };
                            let _ = ledger.apply_movement(MovementRequest::new(ProductId::new(product), kind, quantity, admin()));
                        }
                    }

                    let products = ledger.products();
                    let expected_value: u64 = products.iter().map(|p| p.quantity() * p.price().cents()).sum();
                    prop_assert_eq!(ledger.total_value(), Money::from_cents(expected_value));

                    let expected_low: Vec<ProductId> = products
                        .iter()
                        .filter(|p| p.quantity() <= p.min_stock())
                        .map(Product::id_typed)
                        .collect();
                    let low: Vec<ProductId> = ledger.list_low_stock().iter().map(Product::id_typed).collect();
                    prop_assert_eq!(low, expected_low);
                }
            }

            /// Property: an exit larger than the stock is always refused and changes nothing.
            #[test]
            fn overdraw_is_always_refused(stock in 0u64..500, extra in 1i64..500) {
                let (mut ledger, _) = setup();
                let id = add(&mut ledger, "P", 100, stock, 0);

                let err = ledger
                    .apply_movement(MovementRequest::exit(id, stock as i64 + extra, clerk()))
                    .unwrap_err();
                prop_assert!(
                    matches!(err, LedgerError::InsufficientStock { .. }),
                    "expected InsufficientStock, got {:?}",
                    err
                );
                prop_assert_eq!(ledger.product(id).unwrap().quantity(), stock);
                prop_assert!(ledger.movements().is_empty());
            }
        }
    }
}
