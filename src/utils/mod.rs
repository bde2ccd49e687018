//! Helpers shared across the crate: the rayon thread pool configured from
//! `GENOMEKIT_NUM_THREADS` and small macros for getters and builder-style
//! setters.

use log::warn;
use once_cell::sync::Lazy;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};

/// Environment variable holding the number of worker threads.
pub const NUM_THREADS_ENV: &str = "GENOMEKIT_NUM_THREADS";

/// Thread count requested through [`NUM_THREADS_ENV`]. `0` lets rayon pick
/// one thread per core.
fn requested_threads() -> usize {
    match std::env::var(NUM_THREADS_ENV) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring {}={}, not a thread count", NUM_THREADS_ENV, value);
            0
        }),
        Err(_) => 0,
    }
}

/// Pool used for per-gene parallel work. Sized on first use.
pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    ThreadPoolBuilder::new()
        .num_threads(requested_threads())
        .thread_name(|idx| format!("genomekit-{}", idx))
        .build()
        .expect("Failed to create thread pool")
});

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}
