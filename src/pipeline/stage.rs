//! Transform stages and the pipeline that runs them.

use tracing::debug;

use crate::error::Result;
use crate::types::ModuleRequest;
use crate::validation::Diagnostics;

/// State handed to every stage while one request is transformed.
#[derive(Debug)]
pub struct TransformContext<'a> {
    pub request: ModuleRequest<'a>,
    /// Non-fatal problems reported by any stage.
    pub diagnostics: Diagnostics,
}

impl<'a> TransformContext<'a> {
    pub fn new(id: &'a str) -> Self {
        Self {
            request: ModuleRequest::parse(id),
            diagnostics: Diagnostics::new(),
        }
    }
}

/// A named step of the transform pipeline.
///
/// Returning `Ok(None)` leaves the code unchanged.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn transform(&self, ctx: &mut TransformContext<'_>, code: &str) -> Result<Option<String>>;
}

/// Final text of one request and what was reported on the way.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub code: String,
    pub diagnostics: Diagnostics,
}

/// An ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn Stage>) {
        self.stages.push(stage);
    }

    /// Index of the stage called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|stage| stage.name() == name)
    }

    pub fn insert(&mut self, index: usize, stage: Box<dyn Stage>) {
        self.stages.insert(index, stage);
    }

    /// Replace the stage called `name` with whatever `wrap` builds from it.
    /// Returns false if there is no such stage.
    pub fn wrap(&mut self, name: &str, wrap: impl FnOnce(Box<dyn Stage>) -> Box<dyn Stage>) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        let stage = self.stages.remove(index);
        self.stages.insert(index, wrap(stage));
        true
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage over `code` for the request `id`.
    pub fn run(&self, id: &str, code: &str) -> Result<TransformOutput> {
        let mut ctx = TransformContext::new(id);
        let mut current = code.to_string();

        for stage in &self.stages {
            if let Some(next) = stage.transform(&mut ctx, &current)? {
                debug!(stage = stage.name(), id, "stage transformed request");
                current = next;
            }
        }

        Ok(TransformOutput {
            code: current,
            diagnostics: ctx.diagnostics,
        })
    }
}
