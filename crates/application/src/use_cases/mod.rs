//! Application use cases (business logic orchestration).

mod commit_resource;

pub use commit_resource::*;
