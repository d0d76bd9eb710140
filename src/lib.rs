pub mod backends;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod notify; // Expose for tests (MemorySink)
pub mod observability;
