// Service exports
pub mod extract;
pub mod oracle;

pub use extract::extract_json_block;
pub use oracle::{build_prompt, OracleClient, OracleError, OracleOutcome};
