//! Currency conversion math.
//!
//! Expenses may be submitted in any currency; the workflow engine only ever
//! sees amounts already converted to the company's base currency. The
//! conversion arithmetic lives here; fetching rates is the API layer's job.

pub mod conversion;

pub use conversion::convert_amount;
