use anyhow::Result;

/// Produces messages for actors without receiving any of its own.
pub(crate) trait MessageSource {
    /// Returns true when the source is exhausted.
    fn run(&mut self) -> Result<bool>;
}
