//! Generic repository layer.
//!
//! # Responsibility
//! - Compose a query context, a static table handle and a mapping contract
//!   into reusable CRUD operations.
//! - Give concrete repositories a typed error surface instead of raw SQL
//!   errors.
//!
//! # Invariants
//! - Repositories borrow the context per call; they never open, pool or
//!   close connections and hold no state between calls.
//! - Every operation reports failure as a typed `RepoError`. Collapsing a
//!   failure into absence is opt-in at the call site via `OrAbsent`.

mod error;
mod simple_repo;

pub use error::{OrAbsent, RepoError, RepoResult};
pub use simple_repo::SimpleRepository;
