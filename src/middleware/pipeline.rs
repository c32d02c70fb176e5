//! Ordered request stages evaluated before a handler runs.
//!
//! Each stage either lets the request continue or halts it with a response.
//! The first halt ends the request; the handler runs only when every stage
//! continued, and then exactly once.
//!
//! ```ignore
//! let gated = Pipeline::new()
//!     .stage(AuthorizationGate::new(sessions, "session"))
//!     .apply(gated_routes);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Request, State},
    http::request::Parts,
    middleware::{self, Next},
    response::Response,
};

pub enum Flow {
    Continue,
    Halt(Response),
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Stages may attach request-scoped values to `parts.extensions`.
    async fn evaluate(&self, parts: &mut Parts) -> Flow;
}

#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub async fn run(&self, req: Request, next: Next) -> Response {
        let (mut parts, body) = req.into_parts();

        for stage in &self.stages {
            if let Flow::Halt(res) = stage.evaluate(&mut parts).await {
                tracing::debug!(
                    stage = stage.name(),
                    status = %res.status(),
                    "request halted"
                );
                return res;
            }
        }

        next.run(Request::from_parts(parts, body)).await
    }

    /// Run this pipeline in front of every route of `router`.
    ///
    /// Applied with `route_layer`, so unmatched paths still fall through to 404.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(self, drive))
    }
}

async fn drive(State(pipeline): State<Pipeline>, req: Request, next: Next) -> Response {
    pipeline.run(req, next).await
}
