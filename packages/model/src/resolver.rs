//! Ordering guard for asynchronous field-value lookups.
//!
//! The resolver that actually fetches options lives outside this crate. The
//! gate only decides whether a finished lookup may still be applied: each new
//! request for a field supersedes the previous one, and cancelled or
//! superseded results are dropped.

use std::collections::HashMap;

/// Handle identifying one lookup for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    field: String,
    generation: u64,
}

impl RequestTicket {
    pub fn field(&self) -> &str {
        &self.field
    }
}

#[derive(Debug, Default)]
pub struct ResolverGate {
    in_flight: HashMap<String, u64>,
    next_generation: u64,
}

impl ResolverGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup for `field`, superseding any in-flight one
    pub fn begin(&mut self, field: &str) -> RequestTicket {
        self.next_generation += 1;
        self.in_flight
            .insert(field.to_string(), self.next_generation);
        RequestTicket {
            field: field.to_string(),
            generation: self.next_generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.in_flight.get(&ticket.field) == Some(&ticket.generation)
    }

    /// Hand back `result` only if `ticket` is still the latest lookup
    pub fn accept<T>(&mut self, ticket: &RequestTicket, result: T) -> Option<T> {
        if !self.is_current(ticket) {
            return None;
        }
        self.in_flight.remove(&ticket.field);
        Some(result)
    }

    /// Drop the in-flight lookup for one field
    pub fn cancel(&mut self, field: &str) {
        self.in_flight.remove(field);
    }

    /// Teardown: every outstanding result becomes stale
    pub fn cancel_all(&mut self) {
        self.in_flight.clear();
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }
}
