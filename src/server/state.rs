use axum::extract::FromRef;

use crate::analysis::AnalysisRequestor;
use crate::covers::CoverRequestor;
use crate::upload::UploadStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedUploadStore = Arc<UploadStore>;
pub type GuardedAnalysisRequestor = Arc<AnalysisRequestor>;
pub type GuardedCoverRequestor = Arc<CoverRequestor>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub upload_store: GuardedUploadStore,
    pub analysis_requestor: GuardedAnalysisRequestor,
    pub cover_requestor: GuardedCoverRequestor,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        upload_store: GuardedUploadStore,
        analysis_requestor: GuardedAnalysisRequestor,
        cover_requestor: GuardedCoverRequestor,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            upload_store,
            analysis_requestor,
            cover_requestor,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedUploadStore {
    fn from_ref(input: &ServerState) -> Self {
        input.upload_store.clone()
    }
}

impl FromRef<ServerState> for GuardedAnalysisRequestor {
    fn from_ref(input: &ServerState) -> Self {
        input.analysis_requestor.clone()
    }
}

impl FromRef<ServerState> for GuardedCoverRequestor {
    fn from_ref(input: &ServerState) -> Self {
        input.cover_requestor.clone()
    }
}
