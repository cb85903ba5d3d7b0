//! Caller-owned session state
//!
//! The query client is stateless. Whatever has to survive between searches
//! (the current filters, the last credential the user supplied, which search
//! is the latest) lives here, owned by the caller.

use crate::{Credential, FilterState};

/// Sequence number identifying one search invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Filters, remembered credential and query sequencing for one user session
#[derive(Debug, Clone)]
pub struct Session {
    filters: FilterState,
    initial: FilterState,
    credential: Option<Credential>,
    issued: u64,
}

impl Session {
    pub fn new(filters: FilterState) -> Self {
        Self {
            initial: filters.clone(),
            filters,
            credential: None,
            issued: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// Put every filter back to what the session started with
    pub fn reset_filters(&mut self) {
        self.filters = self.initial.clone();
    }

    /// The credential used by the most recent search, if any
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn remember_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    pub fn forget_credential(&mut self) {
        self.credential = None;
    }

    /// Issue the ticket for a new search
    ///
    /// Every earlier ticket becomes stale.
    pub fn begin_query(&mut self) -> QueryTicket {
        self.issued += 1;
        QueryTicket(self.issued)
    }

    /// Whether `ticket` belongs to the most recently started search
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.issued
    }
}
