use anyhow::Result;

pub(crate) trait Actor<T> {
    fn startup(&mut self) -> Result<()>;

    /// Returns true when the actor is done and should be shut down.
    fn handle_message(&mut self, msg: T) -> Result<bool>;
}
