pub(crate) mod cards;
pub(crate) mod controller;
pub(crate) mod layout;
pub(crate) mod registry;
pub(crate) mod sequencer;
pub(crate) mod session;
pub(crate) mod viewport;
