//! Request handlers and their wire types.

use axum::extract::{Path, State};
use axum::Json;
use curia_engine::{compute_decision, Decision, DecisionPolicy};
use curia_service::{ServiceError, SessionSummary};
use curia_session::{SessionSettings, VoteStatus};
use curia_types::{SessionId, StakerInput, StakerRecord, StakingParams, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::server::RpcState;

fn validate_records(records: &[StakerRecord]) -> Result<Vec<StakerInput>, RpcError> {
    records
        .iter()
        .map(|r| r.validate())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RpcError::Service(ServiceError::Validation(e)))
}

// ── Preview ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub stakers: Vec<StakerRecord>,
    #[serde(default)]
    pub params: StakingParams,
    #[serde(default)]
    pub policy: DecisionPolicy,
}

/// Stateless what-if computation: nothing is persisted, no session exists.
pub async fn preview(
    Json(req): Json<PreviewRequest>,
) -> Result<Json<Decision>, RpcError> {
    let stakers = validate_records(&req.stakers)?;
    let decision = compute_decision(&stakers, &req.params, &req.policy)
        .map_err(|e| RpcError::Service(ServiceError::Session(e.into())))?;
    Ok(Json(decision))
}

// ── Sessions ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OpenSessionRequest {
    pub session_id: String,
    pub campaign_id: String,
    /// Overrides the host's configured defaults when present.
    pub settings: Option<SessionSettings>,
}

#[derive(Serialize)]
pub struct OpenSessionResponse {
    pub session_id: String,
    pub expires_at: u64,
}

pub async fn open_session(
    State(state): State<RpcState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<Json<OpenSessionResponse>, RpcError> {
    let id = SessionId::new(req.session_id.as_str());
    state
        .hub
        .open_session(
            id.clone(),
            req.campaign_id.as_str().into(),
            req.settings,
            Timestamp::now(),
        )
        .await?;
    let summary = state.hub.summary(&id).await?;
    Ok(Json(OpenSessionResponse {
        session_id: req.session_id,
        expires_at: summary.expires_at.as_secs(),
    }))
}

pub async fn get_session(
    State(state): State<RpcState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, RpcError> {
    let summary = state.hub.summary(&SessionId::new(id)).await?;
    Ok(Json(summary))
}

// ── Votes ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VoteRequest {
    #[serde(flatten)]
    pub staker: StakerRecord,
}

#[derive(Serialize)]
pub struct VoteResponse {
    pub status: VoteStatus,
    /// Present when this vote finalized the session.
    pub decision: Option<Decision>,
}

pub async fn submit_vote(
    State(state): State<RpcState>,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, RpcError> {
    let staker = req
        .staker
        .validate()
        .map_err(|e| RpcError::Service(ServiceError::Validation(e)))?;
    let receipt = state
        .hub
        .submit_vote(&SessionId::new(id), staker, Timestamp::now())
        .await?;
    Ok(Json(VoteResponse {
        status: receipt.status,
        decision: receipt.decision,
    }))
}

// ── Escalation ───────────────────────────────────────────────────────────

pub async fn escalate(
    State(state): State<RpcState>,
    Path(id): Path<String>,
) -> Result<Json<Decision>, RpcError> {
    let decision = state
        .hub
        .force_escalate(&SessionId::new(id), Timestamp::now())
        .await?;
    Ok(Json(decision))
}
