pub mod cbu;

pub use cbu::CbuProvider;
