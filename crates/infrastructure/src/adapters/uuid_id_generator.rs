//! UUID id generator adapter

use scopebind_application::ports::IdGenerator;
use scopebind_domain::generate_id;

/// Id generator producing time-ordered UUID v7 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    /// Creates a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        generate_id()
    }
}
