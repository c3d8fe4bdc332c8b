pub(crate) mod composer;
pub(crate) mod series;
pub(crate) mod text_block;
