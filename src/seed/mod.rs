pub(crate) mod hash;
pub(crate) mod key;
pub(crate) mod rng;
