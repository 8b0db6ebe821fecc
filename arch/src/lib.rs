pub mod addr;
pub mod directive;
pub mod encode;
pub mod inst;
pub mod reg;
