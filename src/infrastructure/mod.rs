// Infrastructure implementations for Callscope.

pub mod concurrency;
pub mod json_provider;
pub mod memory_provider;

pub use json_provider::JsonSourceProvider;
pub use memory_provider::StaticProvider;
