pub mod abi;

pub use abi::{AbiSummary, load_compiled_abi};
