pub(crate) mod id_assigner;
pub(crate) mod output;
