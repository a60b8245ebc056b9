pub mod integer;
pub mod primal;
pub mod trivial;
