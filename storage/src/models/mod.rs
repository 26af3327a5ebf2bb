//! Persisted models.

mod runtime_info;
mod wa_entry;

pub use runtime_info::RuntimeInfo;
pub use wa_entry::WaEntry;
