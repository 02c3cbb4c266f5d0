// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process ledger of outstanding vouchers.
//!
//! The balance check alone cannot stop two concurrent requests for the same
//! address from both passing before either mints. Issuance therefore reserves
//! the address first, checks the balance, and only then signs. A reservation
//! is committed for as long as the issued voucher is valid, or released if
//! issuance fails.
//!
//! Held addresses are never evicted. When the ledger is full, expired
//! vouchers are purged; if every slot is still live, new reservations are
//! refused until one frees up.
//!
//! The ledger lives in this process only; replicas do not share it.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use lru::LruCache;

/// Default number of addresses tracked.
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Copy)]
enum Entry {
    /// Issuance in progress.
    Pending,
    /// Voucher handed out; valid until the deadline.
    Issued(Instant),
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        match self {
            Entry::Pending => true,
            Entry::Issued(deadline) => *deadline > now,
        }
    }
}

/// Why a reservation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    #[error("address is reserved or holds an unexpired voucher")]
    Held,

    #[error("voucher ledger is full")]
    Full,
}

/// Tracks which addresses currently hold (or are being issued) a voucher.
pub struct VoucherLedger {
    entries: Mutex<LruCache<Address, Entry>>,
}

impl VoucherLedger {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<Address, Entry>> {
        // Entries stay consistent even if a holder panicked; every critical
        // section is a handful of map operations with no await.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve `address` for issuance.
    ///
    /// Refused with [`Refusal::Held`] while another issuance for the address
    /// is in progress or a previously issued voucher has not yet expired, and
    /// with [`Refusal::Full`] when no slot can be freed without dropping a
    /// live entry.
    pub fn reserve(&self, address: Address) -> Result<Reservation<'_>, Refusal> {
        let now = Instant::now();
        let mut entries = self.entries();
        match entries.peek(&address) {
            Some(entry) if entry.is_live(now) => return Err(Refusal::Held),
            Some(_) => {}
            None if entries.len() >= entries.cap().get() => {
                purge_expired(&mut entries, now);
                if entries.len() >= entries.cap().get() {
                    return Err(Refusal::Full);
                }
            }
            None => {}
        }

        // Either the key is present or there is a free slot: nothing is evicted.
        entries.put(address, Entry::Pending);
        Ok(Reservation {
            ledger: self,
            address,
            committed: false,
        })
    }

    /// Whether `address` is currently reserved or holds an unexpired voucher.
    pub fn is_held(&self, address: &Address) -> bool {
        self.entries()
            .peek(address)
            .is_some_and(|entry| entry.is_live(Instant::now()))
    }

    fn release(&self, address: &Address) {
        let mut entries = self.entries();
        if matches!(entries.peek(address), Some(Entry::Pending)) {
            entries.pop(address);
        }
    }

    fn commit(&self, address: Address, deadline: Instant) {
        self.entries().put(address, Entry::Issued(deadline));
    }
}

fn purge_expired(entries: &mut LruCache<Address, Entry>, now: Instant) {
    let expired: Vec<Address> = entries
        .iter()
        .filter(|(_, entry)| !entry.is_live(now))
        .map(|(address, _)| *address)
        .collect();
    for address in expired {
        entries.pop(&address);
    }
}

impl Default for VoucherLedger {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Exclusive hold on an address during issuance. Released on drop unless
/// [`commit`](Self::commit)ted.
pub struct Reservation<'a> {
    ledger: &'a VoucherLedger,
    address: Address,
    committed: bool,
}

impl Reservation<'_> {
    /// Keep the address held for `valid_for`, the lifetime of the voucher.
    pub fn commit(mut self, valid_for: Duration) {
        self.ledger.commit(self.address, Instant::now() + valid_for);
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.ledger.release(&self.address);
        }
    }
}
