//! Persistent FIFO waiting list for guest vehicles.
//!
//! The queue is a fixed-capacity ring in memory mirrored row for row by the
//! `guest_waiting_list` table. The table is authoritative: every mutation
//! writes the row first and only then moves the ring, so a failed write
//! leaves both sides as they were. On startup the ring is rebuilt from the
//! table in arrival order.
//!
//! # Usage
//!
//! ```no_run
//! use aptpark_services::waitlist::{Enqueued, GuestWaitList};
//! use aptpark_storage::{Database, NewWaitlistEntry};
//! use aptpark_core::VehicleType;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::in_memory().await?;
//! let mut queue = GuestWaitList::load(db, 50).await?;
//!
//! let outcome = queue
//!     .enqueue(&NewWaitlistEntry {
//!         resident_id: "RES001".into(),
//!         vehicle_number: "MH12CD0001".into(),
//!         vehicle_brand: "Kia".into(),
//!         vehicle_type: VehicleType::FourWheeler,
//!     })
//!     .await?;
//! assert!(matches!(outcome, Enqueued::Added(_)));
//! # Ok(())
//! # }
//! ```

use crate::error::ServiceResult;
use aptpark_storage::repositories::waitlist;
use aptpark_storage::{Database, NewWaitlistEntry, WaitlistEntry};
use tracing::{debug, info, warn};

/// Result of [`GuestWaitList::enqueue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Enqueued {
    /// Stored with its allocated id and arrival time
    Added(WaitlistEntry),
    /// Nothing was written
    Full,
}

/// Bounded FIFO of guest vehicles waiting for a spare slot.
#[derive(Debug)]
pub struct GuestWaitList {
    db: Database,
    ring: Vec<Option<WaitlistEntry>>,
    front: usize,
    /// Index of the last pushed element; starts one before slot 0
    rear: usize,
    len: usize,
}

impl GuestWaitList {
    /// Rebuild the queue from the store, oldest first, up to `capacity`.
    ///
    /// A capacity of zero is raised to one.
    pub async fn load(db: Database, capacity: usize) -> ServiceResult<Self> {
        let capacity = capacity.max(1);

        let mut conn = db.acquire().await?;
        let rows = waitlist::load_in_arrival_order(&mut conn, capacity).await?;
        drop(conn);

        let mut queue = Self {
            db,
            ring: vec![None; capacity],
            front: 0,
            rear: capacity - 1,
            len: 0,
        };
        for entry in rows {
            queue.push(entry);
        }

        info!(loaded = queue.len, capacity, "Guest waiting list loaded");
        Ok(queue)
    }

    fn push(&mut self, entry: WaitlistEntry) {
        self.rear = (self.rear + 1) % self.ring.len();
        self.ring[self.rear] = Some(entry);
        self.len += 1;
    }

    fn advance(&mut self) {
        self.ring[self.front] = None;
        self.front = (self.front + 1) % self.ring.len();
        self.len -= 1;
    }

    /// Store a new entry and append it at the back.
    ///
    /// # Errors
    ///
    /// A storage failure leaves the queue unchanged.
    pub async fn enqueue(&mut self, entry: &NewWaitlistEntry) -> ServiceResult<Enqueued> {
        if self.is_full() {
            debug!(vehicle = %entry.vehicle_number, "Waiting list full");
            return Ok(Enqueued::Full);
        }

        let mut conn = self.db.acquire().await?;
        let stored = waitlist::insert(&mut conn, entry).await?;
        drop(conn);

        info!(
            waitlist_id = stored.waitlist_id,
            vehicle = %stored.vehicle_number,
            "Guest vehicle added to waiting list"
        );
        self.push(stored.clone());
        Ok(Enqueued::Added(stored))
    }

    /// Remove and return the oldest entry.
    ///
    /// The row is deleted before the ring advances. A front entry whose row
    /// is already gone is skipped.
    ///
    /// # Errors
    ///
    /// A storage failure leaves the queue unchanged.
    pub async fn dequeue(&mut self) -> ServiceResult<Option<WaitlistEntry>> {
        while let Some(entry) = self.peek().cloned() {
            let mut conn = self.db.acquire().await?;
            let removed = waitlist::delete(&mut conn, entry.waitlist_id).await?;
            drop(conn);

            self.advance();
            if removed > 0 {
                info!(waitlist_id = entry.waitlist_id, "Guest vehicle left waiting list");
                return Ok(Some(entry));
            }
            warn!(
                waitlist_id = entry.waitlist_id,
                "Waiting list row already removed, skipping"
            );
        }

        Ok(None)
    }

    /// Entry at the front, if any.
    pub fn peek(&self) -> Option<&WaitlistEntry> {
        if self.len == 0 {
            return None;
        }
        self.ring[self.front].as_ref()
    }

    /// Entries in FIFO order.
    pub fn snapshot(&self) -> Vec<WaitlistEntry> {
        (0..self.len)
            .filter_map(|offset| self.ring[(self.front + offset) % self.ring.len()].clone())
            .collect()
    }

    /// `true` when the vehicle is already waiting (case-insensitive)
    pub fn contains(&self, vehicle_number: &str) -> bool {
        self.ring
            .iter()
            .flatten()
            .any(|entry| entry.vehicle_number.eq_ignore_ascii_case(vehicle_number))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.ring.len()
    }

    pub fn capacity(&self) -> usize {
        self.ring.len()
    }
}
