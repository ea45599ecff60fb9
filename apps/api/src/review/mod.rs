// CV review: turns an unreliable model completion into a typed result.
// All provider calls go through llm_client; nothing here talks HTTP to a model.

pub mod assembler;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;
