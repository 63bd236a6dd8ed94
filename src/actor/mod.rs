#[allow(clippy::module_inception)]
pub(crate) mod actor;
pub(crate) mod console_input_actor;
pub(crate) mod message_source;
pub(crate) mod notifier_actor;
pub(crate) mod tick_actor;
pub(crate) mod tracker_actor;
