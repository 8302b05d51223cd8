pub mod global_variables;
#[cfg(feature = "reqwest")]
pub mod http;
pub mod prediction;
