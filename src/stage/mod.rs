pub(crate) mod intent;
pub(crate) mod recording;
