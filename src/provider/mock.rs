//! Scripted provider for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{
    CompletionProvider, CompletionRequest, CompletionStage, ProviderError, ProviderKind,
    ProviderResult,
};

type Script = dyn Fn(&CompletionRequest) -> ProviderResult<String> + Send + Sync;

/// Replies produced by a closure; calls are counted per stage and requests recorded.
pub struct ScriptedProvider {
    kind: ProviderKind,
    script: Box<Script>,
    calls: [AtomicUsize; 3],
    requests: Mutex<Vec<CompletionRequest>>,
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("kind", &self.kind)
            .field("calls", &self.total_calls())
            .finish()
    }
}

fn slot(stage: CompletionStage) -> usize {
    match stage {
        CompletionStage::Interpret => 0,
        CompletionStage::Rank => 1,
        CompletionStage::Refine => 2,
    }
}

impl ScriptedProvider {
    pub fn new<F>(kind: ProviderKind, script: F) -> Self
    where
        F: Fn(&CompletionRequest) -> ProviderResult<String> + Send + Sync + 'static,
    {
        Self {
            kind,
            script: Box::new(script),
            calls: [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)],
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Same reply for every stage.
    pub fn replying(kind: ProviderKind, reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self::new(kind, move |_| Ok(reply.clone()))
    }

    /// Reply chosen by stage; a `None` stage fails.
    pub fn per_stage(
        kind: ProviderKind,
        interpret: Option<&str>,
        rank: Option<&str>,
        refine: Option<&str>,
    ) -> Self {
        let replies = [interpret, rank, refine].map(|r| r.map(str::to_string));
        Self::new(kind, move |request| {
            replies[slot(request.stage)]
                .clone()
                .ok_or_else(|| ProviderError::Request {
                    kind,
                    message: format!("no scripted {} reply", request.stage.as_str()),
                })
        })
    }

    /// Fails every call.
    pub fn failing(kind: ProviderKind) -> Self {
        Self::new(kind, move |_| {
            Err(ProviderError::Request {
                kind,
                message: "scripted failure".to_string(),
            })
        })
    }

    pub fn calls(&self, stage: CompletionStage) -> usize {
        self.calls[slot(stage)].load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        self.calls[slot(request.stage)].fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());
        (self.script)(&request)
    }
}
