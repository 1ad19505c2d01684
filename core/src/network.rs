pub mod resolver;
pub mod tcp;
