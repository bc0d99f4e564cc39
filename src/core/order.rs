//! Order intake sessions.
//!
//! A session lives in one ticket channel and belongs to one customer. It moves
//! through item selection, quantity, payment method and confirmation. Sessions
//! expire after a TTL and are evicted when their channel is deleted, when the
//! order is cancelled, or when it is confirmed (a session is consumed once).
//! A confirmed order can be rated once by its customer within the rating TTL.

use crate::{
    core::catalog::{Catalog, CatalogItem, format_price},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

/// Where a session is in the order flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    /// Waiting for an item
    SelectingItem,
    /// Item chosen, waiting for a quantity
    EnteringQuantity,
    /// Quantity set, waiting for a payment method
    ChoosingPayment,
    /// Everything chosen, waiting for confirmation
    AwaitingConfirmation,
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SelectingItem => "waiting for an item",
            Self::EnteringQuantity => "waiting for a quantity",
            Self::ChoosingPayment => "waiting for a payment method",
            Self::AwaitingConfirmation => "waiting for confirmation",
        };
        f.write_str(label)
    }
}

/// An order in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSession {
    /// Ticket channel the order lives in
    pub channel_id: u64,
    /// Customer who started the order
    pub customer_id: u64,
    /// Current stage
    pub stage: OrderStage,
    /// Selected item
    pub item: Option<CatalogItem>,
    /// Selected quantity
    pub quantity: Option<u32>,
    /// Selected payment method
    pub payment_method: Option<String>,
    /// When the session started
    pub started_at: DateTime<Utc>,
}

impl OrderSession {
    /// Total price of the current selection, if item and quantity are known.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        Some(self.item.as_ref()?.price.saturating_mul(u64::from(self.quantity?)))
    }

    /// One line per choice made so far.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        if let Some(item) = &self.item {
            lines.push(format!("Item: {} ({})", item.name, format_price(item.price)));
        }
        if let Some(quantity) = self.quantity {
            lines.push(format!("Quantity: {quantity}"));
        }
        if let Some(total) = self.total() {
            lines.push(format!("Total: {}", format_price(total)));
        }
        if let Some(method) = &self.payment_method {
            lines.push(format!("Payment: {method}"));
        }
        lines.join("\n")
    }
}

/// A confirmed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedOrder {
    /// Order id
    pub id: Uuid,
    /// Ticket channel
    pub channel_id: u64,
    /// Customer
    pub customer_id: u64,
    /// Ordered item
    pub item: CatalogItem,
    /// Quantity
    pub quantity: u32,
    /// Payment method
    pub payment_method: String,
    /// `item.price * quantity`
    pub total: u64,
    /// Confirmation time
    pub confirmed_at: DateTime<Utc>,
}

/// A customer's rating of a confirmed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testimonial {
    /// Rated order
    pub order_id: Uuid,
    /// Customer
    pub customer_id: u64,
    /// Item name at order time
    pub item_name: String,
    /// 1..=5
    pub stars: u8,
    /// Free text
    pub text: String,
    /// When the rating was given
    pub rated_at: DateTime<Utc>,
}

impl Testimonial {
    /// Star string such as `⭐⭐⭐⭐☆`.
    #[must_use]
    pub fn star_bar(&self) -> String {
        let filled = usize::from(self.stars.min(5));
        format!("{}{}", "⭐".repeat(filled), "☆".repeat(5 - filled))
    }

    /// Star bar followed by the review, or a placeholder when there is no text.
    #[must_use]
    pub fn body(&self) -> String {
        let text = if self.text.is_empty() {
            "_No review text_"
        } else {
            self.text.as_str()
        };
        format!("{}\n\n{text}", self.star_bar())
    }
}

/// In-memory order sessions with TTL-based expiry.
#[derive(Debug)]
pub struct OrderSessionStore {
    sessions: DashMap<u64, OrderSession>,
    pending_ratings: DashMap<u64, ConfirmedOrder>,
    session_ttl: Duration,
    rating_ttl: Duration,
}

impl OrderSessionStore {
    /// Creates a store with the given TTLs in seconds.
    #[must_use]
    pub fn new(session_ttl_secs: u64, rating_ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            pending_ratings: DashMap::new(),
            session_ttl: seconds(session_ttl_secs),
            rating_ttl: seconds(rating_ttl_secs),
        }
    }

    fn session_expired(&self, session: &OrderSession, now: DateTime<Utc>) -> bool {
        now - session.started_at >= self.session_ttl
    }

    fn rating_expired(&self, order: &ConfirmedOrder, now: DateTime<Utc>) -> bool {
        now - order.confirmed_at >= self.rating_ttl
    }

    /// Starts an order in `channel_id` for `customer_id`.
    pub fn start(&self, channel_id: u64, customer_id: u64) -> Result<OrderSession> {
        self.start_at(channel_id, customer_id, Utc::now())
    }

    fn start_at(&self, channel_id: u64, customer_id: u64, now: DateTime<Utc>) -> Result<OrderSession> {
        use dashmap::mapref::entry::Entry;

        let session = OrderSession {
            channel_id,
            customer_id,
            stage: OrderStage::SelectingItem,
            item: None,
            quantity: None,
            payment_method: None,
            started_at: now,
        };

        match self.sessions.entry(channel_id) {
            Entry::Occupied(mut entry) => {
                if !self.session_expired(entry.get(), now) {
                    return Err(Error::SessionExists);
                }
                entry.insert(session.clone());
            }
            Entry::Vacant(entry) => {
                entry.insert(session.clone());
            }
        }
        info!("Order started in channel {channel_id} by {customer_id}");
        Ok(session)
    }

    /// Current session in `channel_id`, if it exists and has not expired.
    #[must_use]
    pub fn get(&self, channel_id: u64) -> Option<OrderSession> {
        let now = Utc::now();
        let session = self.sessions.get(&channel_id)?.value().clone();
        if self.session_expired(&session, now) {
            self.sessions
                .remove_if(&channel_id, |_, s| self.session_expired(s, now));
            return None;
        }
        Some(session)
    }

    /// Applies `step` to the caller's live session, enforcing the expected stage.
    fn advance<F>(
        &self,
        channel_id: u64,
        customer_id: u64,
        expected: OrderStage,
        action: &str,
        now: DateTime<Utc>,
        step: F,
    ) -> Result<OrderSession>
    where
        F: FnOnce(&mut OrderSession) -> Result<()>,
    {
        let mut entry = self
            .sessions
            .get_mut(&channel_id)
            .ok_or(Error::SessionNotFound)?;
        if entry.customer_id != customer_id {
            return Err(Error::SessionNotFound);
        }
        if self.session_expired(entry.value(), now) {
            drop(entry);
            self.sessions.remove(&channel_id);
            debug!("Order session in channel {channel_id} expired");
            return Err(Error::SessionNotFound);
        }
        if entry.stage != expected {
            return Err(Error::InvalidStage {
                action: action.to_string(),
                stage: entry.stage.to_string(),
            });
        }
        step(entry.value_mut())?;
        Ok(entry.value().clone())
    }

    /// Selects the item to order.
    pub fn select_item(
        &self,
        catalog: &Catalog,
        channel_id: u64,
        customer_id: u64,
        item: &str,
    ) -> Result<OrderSession> {
        let item = catalog.item(item)?.clone();
        self.advance(
            channel_id,
            customer_id,
            OrderStage::SelectingItem,
            "select an item",
            Utc::now(),
            |session| {
                session.item = Some(item);
                session.stage = OrderStage::EnteringQuantity;
                Ok(())
            },
        )
    }

    /// Sets the quantity; must be at least one.
    pub fn set_quantity(&self, channel_id: u64, customer_id: u64, quantity: i64) -> Result<OrderSession> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(Error::InvalidQuantity { quantity })?;
        self.advance(
            channel_id,
            customer_id,
            OrderStage::EnteringQuantity,
            "set the quantity",
            Utc::now(),
            |session| {
                session.quantity = Some(quantity);
                session.stage = OrderStage::ChoosingPayment;
                Ok(())
            },
        )
    }

    /// Chooses one of the catalog's payment methods.
    pub fn choose_payment(
        &self,
        catalog: &Catalog,
        channel_id: u64,
        customer_id: u64,
        method: &str,
    ) -> Result<OrderSession> {
        let method = catalog.payment_method(method)?.to_string();
        self.advance(
            channel_id,
            customer_id,
            OrderStage::ChoosingPayment,
            "choose a payment method",
            Utc::now(),
            |session| {
                session.payment_method = Some(method);
                session.stage = OrderStage::AwaitingConfirmation;
                Ok(())
            },
        )
    }

    /// Confirms the order, consuming the session and opening a rating window.
    pub fn confirm(&self, channel_id: u64, customer_id: u64) -> Result<ConfirmedOrder> {
        self.confirm_at(channel_id, customer_id, Utc::now())
    }

    fn confirm_at(&self, channel_id: u64, customer_id: u64, now: DateTime<Utc>) -> Result<ConfirmedOrder> {
        let session = self.advance(
            channel_id,
            customer_id,
            OrderStage::AwaitingConfirmation,
            "confirm",
            now,
            |_| Ok(()),
        )?;
        // Only the caller that actually removes the session gets the order.
        let (_, session) = self
            .sessions
            .remove_if(&channel_id, |_, s| s.started_at == session.started_at)
            .ok_or(Error::SessionNotFound)?;

        let (Some(item), Some(quantity), Some(payment_method)) =
            (session.item, session.quantity, session.payment_method)
        else {
            return Err(Error::SessionNotFound);
        };
        let order = ConfirmedOrder {
            id: Uuid::new_v4(),
            channel_id,
            customer_id,
            total: item.price.saturating_mul(u64::from(quantity)),
            item,
            quantity,
            payment_method,
            confirmed_at: now,
        };
        self.pending_ratings.insert(customer_id, order.clone());
        info!(
            "Order {} confirmed in channel {channel_id}: {} x{}",
            order.id, order.item.name, order.quantity
        );
        Ok(order)
    }

    /// Cancels the caller's order in `channel_id`.
    pub fn cancel(&self, channel_id: u64, customer_id: u64) -> Result<OrderSession> {
        self.sessions
            .remove_if(&channel_id, |_, s| s.customer_id == customer_id)
            .map(|(_, session)| session)
            .ok_or(Error::SessionNotFound)
    }

    /// Drops the session of a deleted channel. Returns whether one existed.
    pub fn evict_channel(&self, channel_id: u64) -> bool {
        let evicted = self.sessions.remove(&channel_id).is_some();
        if evicted {
            info!("Evicted order session for deleted channel {channel_id}");
        }
        evicted
    }

    /// Rates the customer's most recent confirmed order. Consumes the rating window.
    pub fn rate(&self, customer_id: u64, stars: i64, text: String) -> Result<Testimonial> {
        self.rate_at(customer_id, stars, text, Utc::now())
    }

    fn rate_at(&self, customer_id: u64, stars: i64, text: String, now: DateTime<Utc>) -> Result<Testimonial> {
        let stars = u8::try_from(stars)
            .ok()
            .filter(|s| (1..=5).contains(s))
            .ok_or_else(|| Error::InvalidRating {
                message: format!("stars must be between 1 and 5, got {stars}"),
            })?;

        let (_, order) = self
            .pending_ratings
            .remove(&customer_id)
            .ok_or_else(|| Error::InvalidRating {
                message: "no confirmed order is waiting for a rating".to_string(),
            })?;
        if self.rating_expired(&order, now) {
            return Err(Error::InvalidRating {
                message: "the rating window for your last order has closed".to_string(),
            });
        }

        Ok(Testimonial {
            order_id: order.id,
            customer_id,
            item_name: order.item.name,
            stars,
            text: text.trim().to_string(),
            rated_at: now,
        })
    }

    /// Removes expired sessions and rating windows. Returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    /// [`Self::sweep_expired`] against an explicit clock.
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, s| {
            let keep = !self.session_expired(s, now);
            if !keep {
                removed += 1;
            }
            keep
        });
        self.pending_ratings.retain(|_, order| {
            let keep = !self.rating_expired(order, now);
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            debug!("Swept {removed} expired order entries");
        }
        removed
    }

    /// Number of live sessions (expired ones included until swept).
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

fn seconds(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
