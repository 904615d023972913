pub(crate) mod rows;
