//! In-memory `ModelGateway` for pipeline and handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{GatewayError, ModelCompletion, ModelGateway};

/// What the scripted gateway does on every call.
#[derive(Debug, Clone)]
pub enum Script {
    Complete(String),
    Reject { status: u16, message: String },
    Timeout,
    MissingCredential(&'static str),
    /// Never resolves; only a caller-side timeout ends the call.
    Hang,
    /// Panics inside the gateway call.
    Panic,
}

#[derive(Debug)]
pub struct ScriptedGateway {
    script: Script,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedGateway {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(&self, prompt: &str) -> Result<ModelCompletion, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        match &self.script {
            Script::Complete(text) => Ok(ModelCompletion::new(text.clone())),
            Script::Reject { status, message } => Err(GatewayError::Api {
                status: *status,
                message: message.clone(),
            }),
            Script::Timeout => Err(GatewayError::Timeout),
            Script::MissingCredential(variable) => Err(GatewayError::MissingCredential {
                variable: *variable,
            }),
            Script::Panic => panic!("scripted gateway panic"),
            Script::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending future never resolves")
            }
        }
    }

    fn provider(&self) -> &'static str {
        "Scripted"
    }
}
