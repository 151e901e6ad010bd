pub(crate) mod battery;
pub(crate) mod display;
