//! In-memory per-user cart sessions. The cart is owned exclusively by one
//! user's session; totals are never cached here but projected from current
//! state on every read (see [`crate::pricing`]). Lock scopes are short and
//! never held across an await point.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::coupon::Coupon;
use crate::error::AppError;
use crate::models::CartLine;

/// One user's checkout-session state: ordered cart lines, the at-most-one
/// applied coupon, and the single-outstanding-submission flag.
#[derive(Debug, Default)]
pub struct CartSession {
    pub lines: Vec<CartLine>,
    pub coupon: Option<Coupon>,
    checkout_in_flight: bool,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, CartSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_session<R>(&self, user_id: Uuid, f: impl FnOnce(&mut CartSession) -> R) -> R {
        let mut sessions = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(sessions.entry(user_id).or_default())
    }

    /// Snapshot of the user's lines and coupon for pricing or assembly.
    pub fn snapshot(&self, user_id: Uuid) -> (Vec<CartLine>, Option<Coupon>) {
        let sessions = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(&user_id)
            .map(|s| (s.lines.clone(), s.coupon.clone()))
            .unwrap_or_default()
    }

    /// Adds a line. An equivalent configuration (same product, design, size,
    /// color) merges by incrementing quantity rather than duplicating.
    pub fn add_line(&self, user_id: Uuid, line: CartLine) -> CartLine {
        self.with_session(user_id, |session| {
            if let Some(existing) = session
                .lines
                .iter_mut()
                .find(|l| l.same_configuration(&line))
            {
                existing.quantity += line.quantity;
                return existing.clone();
            }
            session.lines.push(line.clone());
            line
        })
    }

    /// Sets a line's quantity; zero or below removes the line instead. A
    /// missing id reports `false` so callers can 404.
    pub fn set_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> bool {
        self.with_session(user_id, |session| {
            let Some(idx) = session.lines.iter().position(|l| l.id == line_id) else {
                return false;
            };
            match u32::try_from(quantity) {
                Ok(q) if q >= 1 => session.lines[idx].quantity = q,
                _ => {
                    session.lines.remove(idx);
                }
            }
            true
        })
    }

    /// Removes by id; removing an absent line is not an error.
    pub fn remove_line(&self, user_id: Uuid, line_id: Uuid) {
        self.with_session(user_id, |session| {
            session.lines.retain(|l| l.id != line_id);
        });
    }

    /// Empties the session: lines and coupon. The cart-clear teardown point;
    /// also invoked after a successful checkout. The map entry only goes away
    /// when no checkout is in flight, so clearing mid-submission cannot free
    /// the submission slot or detach it from the live guard.
    pub fn clear(&self, user_id: Uuid) {
        let mut sessions = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(&user_id) {
            Some(session) if session.checkout_in_flight => {
                session.lines.clear();
                session.coupon = None;
            }
            _ => {
                sessions.remove(&user_id);
            }
        }
    }

    /// Applies a coupon, replacing any previously applied one.
    pub fn apply_coupon(&self, user_id: Uuid, coupon: Coupon) {
        self.with_session(user_id, |session| session.coupon = Some(coupon));
    }

    pub fn remove_coupon(&self, user_id: Uuid) {
        self.with_session(user_id, |session| session.coupon = None);
    }

    /// Claims the session's single checkout slot. While the returned guard is
    /// alive, further submissions for the same user are rejected; drop order
    /// does not matter because the guard releases the slot on drop, success
    /// or not.
    pub fn begin_checkout(&self, user_id: Uuid) -> Result<CheckoutGuard, AppError> {
        let claimed = self.with_session(user_id, |session| {
            if session.checkout_in_flight {
                false
            } else {
                session.checkout_in_flight = true;
                true
            }
        });
        if !claimed {
            return Err(AppError::CheckoutInFlight);
        }
        Ok(CheckoutGuard {
            store: self.clone(),
            user_id,
        })
    }
}

/// RAII release of the per-session checkout slot.
pub struct CheckoutGuard {
    store: SessionStore,
    user_id: Uuid,
}

impl Drop for CheckoutGuard {
    fn drop(&mut self) {
        let mut sessions = self
            .store
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = sessions.get_mut(&self.user_id) {
            session.checkout_in_flight = false;
        }
    }
}
