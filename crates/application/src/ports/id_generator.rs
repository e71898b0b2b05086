//! Id generation port.

/// Port for producing fresh unique ids.
pub trait IdGenerator: Send + Sync {
    /// Returns an id never returned before.
    fn generate(&self) -> String;
}
