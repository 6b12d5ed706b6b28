//! Moderation hub — owns all live sessions and their collaborators.
//!
//! Concurrency model: the hub keeps each session behind its own async
//! mutex inside a read-write-locked map. Vote submission and expiry
//! evaluation for one session serialize on that session's mutex;
//! different sessions never contend. Map write locks are only taken for
//! insert/evict and never while a session mutex is held.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use curia_engine::{Decision, VoteTally};
use curia_session::{
    DecisionEvent, ModerationSession, SessionError, SessionSettings, SessionState, VoteReceipt,
};
use curia_store::{DecisionSink, SessionStore};
use curia_types::{CampaignId, SessionId, StakerInput, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::shutdown::ShutdownController;

type SessionCell = Arc<Mutex<ModerationSession>>;

/// Read-only view of one session, served to inspection endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub campaign_id: CampaignId,
    pub state: SessionState,
    pub opened_at: Timestamp,
    pub expires_at: Timestamp,
    pub vote_count: usize,
    pub tally: VoteTally,
}

impl SessionSummary {
    fn from_session(session: &ModerationSession) -> Self {
        let (tally, _) = session.evaluate();
        Self {
            session_id: session.session_id.clone(),
            campaign_id: session.campaign_id.clone(),
            state: session.state,
            opened_at: session.opened_at,
            expires_at: session.expires_at(),
            vote_count: session.vote_count(),
            tally,
        }
    }
}

/// The moderation host: routes votes, sweeps expiring windows, persists
/// snapshots, and emits decision events.
pub struct ModerationHub {
    sessions: RwLock<HashMap<SessionId, SessionCell>>,
    max_sessions: usize,
    defaults: SessionSettings,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn DecisionSink>,
}

impl ModerationHub {
    pub fn new(
        defaults: SessionSettings,
        max_sessions: usize,
        store: Arc<dyn SessionStore>,
        sink: Arc<dyn DecisionSink>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            defaults,
            store,
            sink,
        }
    }

    /// The settings snapshot newly opened sessions receive when the caller
    /// does not supply one.
    pub fn default_settings(&self) -> &SessionSettings {
        &self.defaults
    }

    /// Number of live (non-terminal) sessions.
    pub async fn open_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Open a session for a completion entering moderation.
    ///
    /// Settings default to the hub's configured snapshot; either way they
    /// are validated fail-fast and frozen for the session's lifetime.
    pub async fn open_session(
        &self,
        session_id: SessionId,
        campaign_id: CampaignId,
        settings: Option<SessionSettings>,
        now: Timestamp,
    ) -> Result<(), ServiceError> {
        let mut map = self.sessions.write().await;
        if map.contains_key(&session_id) {
            return Err(ServiceError::DuplicateSession(session_id.to_string()));
        }
        if map.len() >= self.max_sessions {
            return Err(ServiceError::CapacityReached(self.max_sessions));
        }

        let settings = settings.unwrap_or_else(|| self.defaults.clone());
        let session =
            ModerationSession::open(session_id.clone(), campaign_id, settings, now)?;
        self.persist(&session)?;

        tracing::info!(session = %session_id, expires_at = %session.expires_at(), "moderation session opened");
        map.insert(session_id, Arc::new(Mutex::new(session)));
        Ok(())
    }

    /// Submit (or replace) a staker's vote.
    ///
    /// If the window has already elapsed the session is finalized first and
    /// the vote is rejected as a state error, exactly as if the sweeper had
    /// gotten there before the voter.
    pub async fn submit_vote(
        &self,
        id: &SessionId,
        staker: StakerInput,
        now: Timestamp,
    ) -> Result<VoteReceipt, ServiceError> {
        let cell = match self.lookup(id).await {
            Ok(cell) => cell,
            Err(miss) => return Err(self.closed_or(id, miss)),
        };
        let receipt = {
            let mut session = cell.lock().await;

            if let Some(decision) = session.check_expiry(now) {
                self.finalize_io(&session, &decision)?;
                drop(session);
                self.evict(id).await;
                return Err(ServiceError::Session(SessionError::SessionClosed {
                    id: id.to_string(),
                    verdict: decision.verdict,
                }));
            }

            let receipt = session.submit_vote(staker, now)?;
            match &receipt.decision {
                Some(decision) => self.finalize_io(&session, decision)?,
                None => self.persist(&session)?,
            }
            receipt
        };

        if receipt.decision.is_some() {
            self.evict(id).await;
        }
        Ok(receipt)
    }

    /// Re-evaluate every live session's window; finalize the expired ones.
    ///
    /// A persistence failure for one session is logged and does not stop
    /// the sweep for the others.
    pub async fn sweep_expired(&self, now: Timestamp) -> Vec<(SessionId, Decision)> {
        let entries: Vec<(SessionId, SessionCell)> = {
            let map = self.sessions.read().await;
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        let mut finalized = Vec::new();
        for (id, cell) in entries {
            let mut session = cell.lock().await;
            if let Some(decision) = session.check_expiry(now) {
                if let Err(e) = self.finalize_io(&session, &decision) {
                    tracing::error!(session = %id, error = %e, "failed to persist expiry finalization");
                }
                finalized.push((id.clone(), decision));
            }
        }

        for (id, _) in &finalized {
            self.evict(id).await;
        }
        finalized
    }

    /// Operator override: force an open session to ESCALATED.
    pub async fn force_escalate(
        &self,
        id: &SessionId,
        now: Timestamp,
    ) -> Result<Decision, ServiceError> {
        let cell = match self.lookup(id).await {
            Ok(cell) => cell,
            Err(miss) => return Err(self.closed_or(id, miss)),
        };
        let decision = {
            let mut session = cell.lock().await;
            let decision = session.force_escalate(now)?;
            self.finalize_io(&session, &decision)?;
            decision
        };
        self.evict(id).await;
        Ok(decision)
    }

    /// Read-only view of a session, live or archived.
    pub async fn summary(&self, id: &SessionId) -> Result<SessionSummary, ServiceError> {
        if let Ok(cell) = self.lookup(id).await {
            let session = cell.lock().await;
            return Ok(SessionSummary::from_session(&session));
        }
        // Terminal sessions are evicted from the live map; fall back to the
        // archived snapshot.
        let session = self.load(id)?;
        Ok(SessionSummary::from_session(&session))
    }

    /// Reload open sessions from the store after a restart.
    ///
    /// Returns how many sessions were restored into the live map.
    pub async fn restore(&self) -> Result<usize, ServiceError> {
        let ids = self.store.list_open_sessions()?;
        let mut map = self.sessions.write().await;
        let mut restored = 0;
        for id in ids {
            if map.contains_key(&id) {
                continue;
            }
            let session = self.load(&id)?;
            if session.is_terminal() {
                continue;
            }
            map.insert(id, Arc::new(Mutex::new(session)));
            restored += 1;
        }
        if restored > 0 {
            tracing::info!(count = restored, "restored open sessions from store");
        }
        Ok(restored)
    }

    async fn lookup(&self, id: &SessionId) -> Result<SessionCell, ServiceError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::SessionNotFound(id.to_string()))
    }

    async fn evict(&self, id: &SessionId) {
        self.sessions.write().await.remove(id);
    }

    /// Terminal sessions leave the live map but stay in the archive.
    /// Distinguish "closed" from "never existed" on a live-map miss.
    fn closed_or(&self, id: &SessionId, miss: ServiceError) -> ServiceError {
        if let Ok(session) = self.load(id) {
            if let Some(verdict) = session.state.verdict() {
                return ServiceError::Session(SessionError::SessionClosed {
                    id: id.to_string(),
                    verdict,
                });
            }
        }
        miss
    }

    fn load(&self, id: &SessionId) -> Result<ModerationSession, ServiceError> {
        let bytes = self.store.get_session(id)?;
        bincode::deserialize(&bytes).map_err(|e| ServiceError::Serialization(e.to_string()))
    }

    fn persist(&self, session: &ModerationSession) -> Result<(), ServiceError> {
        let bytes = bincode::serialize(session)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        self.store.put_session(&session.session_id, &bytes)?;
        Ok(())
    }

    /// Persist the terminal snapshot, archive the id, and publish the
    /// decision event.
    ///
    /// A sink failure is logged, not propagated: the verdict is already
    /// settled and the notification layer owns its own retries.
    fn finalize_io(
        &self,
        session: &ModerationSession,
        decision: &Decision,
    ) -> Result<(), ServiceError> {
        self.persist(session)?;
        self.store.archive_session(&session.session_id)?;

        let event = DecisionEvent {
            session_id: session.session_id.clone(),
            campaign_id: session.campaign_id.clone(),
            verdict: decision.verdict,
            pool_split: decision.pool_split,
            decided_at: session.state_changed_at,
        };
        if let Err(e) = self.sink.publish(&event) {
            tracing::warn!(session = %session.session_id, error = %e, "decision sink publish failed");
        }
        Ok(())
    }
}

/// Spawn the timer-driven expiry sweeper.
///
/// Ticks every `refresh_interval_ms` and re-evaluates all live windows;
/// stops when the shutdown controller fires.
pub fn spawn_sweeper(
    hub: Arc<ModerationHub>,
    refresh_interval_ms: u64,
    shutdown: &ShutdownController,
) -> JoinHandle<()> {
    let mut shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_millis(refresh_interval_ms.max(1)));
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::debug!("expiry sweeper stopping");
                    break;
                }
                _ = interval.tick() => {
                    let finalized = hub.sweep_expired(Timestamp::now()).await;
                    if !finalized.is_empty() {
                        tracing::info!(count = finalized.len(), "finalized expired sessions");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curia_engine::{AutoResolvePolicy, DecisionPolicy};
    use curia_nullables::{FailingSessionStore, RecordingSink};
    use curia_store::MemorySessionStore;
    use curia_types::{StakingParams, Verdict, VoteChoice, Wallet};

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn staker(wallet: &str, stake: f64, age: u32, vote: VoteChoice) -> StakerInput {
        StakerInput {
            wallet: Wallet::new(wallet),
            stake,
            stake_age_days: age,
            xp: 0.0,
            vote,
        }
    }

    fn settings(min_voters: u32) -> SessionSettings {
        SessionSettings {
            vote_window_hours: 24,
            params: StakingParams {
                stake_fraction_threshold: 0.0,
                ..Default::default()
            },
            policy: DecisionPolicy {
                min_voters,
                threshold_ratio: 1.0,
                auto_resolve: AutoResolvePolicy::Escalate,
            },
        }
    }

    fn hub_with(
        defaults: SessionSettings,
        max: usize,
    ) -> (Arc<ModerationHub>, Arc<MemorySessionStore>, Arc<RecordingSink>) {
        let store = Arc::new(MemorySessionStore::new());
        let sink = Arc::new(RecordingSink::new());
        let hub = Arc::new(ModerationHub::new(defaults, max, store.clone(), sink.clone()));
        (hub, store, sink)
    }

    #[tokio::test]
    async fn open_vote_finalize_flow() {
        let (hub, store, sink) = hub_with(settings(2), 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();
        assert_eq!(hub.open_count().await, 1);

        hub.submit_vote(&"sess-1".into(), staker("0xaaa", 1000.0, 30, VoteChoice::Yes), ts(1_100))
            .await
            .unwrap();
        let receipt = hub
            .submit_vote(&"sess-1".into(), staker("0xbbb", 900.0, 60, VoteChoice::Yes), ts(1_200))
            .await
            .unwrap();

        let decision = receipt.decision.expect("quorum of yes votes should finalize");
        assert_eq!(decision.verdict, Verdict::Approved);

        // The session left the live map, was archived, and the event fired.
        assert_eq!(hub.open_count().await, 0);
        assert!(store.list_open_sessions().unwrap().is_empty());
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].verdict, Verdict::Approved);
        assert_eq!(events[0].session_id, SessionId::new("sess-1"));
    }

    #[tokio::test]
    async fn duplicate_session_rejected() {
        let (hub, _, _) = hub_with(settings(3), 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(0))
            .await
            .unwrap();
        let err = hub
            .open_session("sess-1".into(), "camp-2".into(), None, ts(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateSession(_)));
    }

    #[tokio::test]
    async fn capacity_limit_enforced() {
        let (hub, _, _) = hub_with(settings(3), 2);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(0))
            .await
            .unwrap();
        hub.open_session("sess-2".into(), "camp-2".into(), None, ts(0))
            .await
            .unwrap();
        let err = hub
            .open_session("sess-3".into(), "camp-3".into(), None, ts(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CapacityReached(2)));
    }

    #[tokio::test]
    async fn vote_on_unknown_session() {
        let (hub, _, _) = hub_with(settings(3), 16);
        let err = hub
            .submit_vote(&"ghost".into(), staker("0xaaa", 100.0, 30, VoteChoice::Yes), ts(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn sweep_finalizes_expired_sessions() {
        let (hub, store, sink) = hub_with(settings(3), 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();

        // Nothing to do before the window closes.
        assert!(hub.sweep_expired(ts(1_000 + 24 * 3600 - 1)).await.is_empty());

        let finalized = hub.sweep_expired(ts(1_000 + 24 * 3600)).await;
        assert_eq!(finalized.len(), 1);
        assert_eq!(finalized[0].1.verdict, Verdict::Escalated);
        assert_eq!(hub.open_count().await, 0);
        assert!(store.list_open_sessions().unwrap().is_empty());
        assert_eq!(sink.event_count(), 1);
    }

    #[tokio::test]
    async fn vote_after_expiry_finalizes_then_rejects() {
        let (hub, _, sink) = hub_with(settings(3), 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();

        let err = hub
            .submit_vote(
                &"sess-1".into(),
                staker("0xaaa", 1000.0, 30, VoteChoice::Yes),
                ts(1_000 + 24 * 3600 + 5),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Session(SessionError::SessionClosed { .. })
        ));
        // The expiry path finalized (escalate policy) and notified.
        assert_eq!(sink.event_count(), 1);
        assert_eq!(sink.events()[0].verdict, Verdict::Escalated);
    }

    #[tokio::test]
    async fn summary_live_and_archived() {
        let (hub, _, _) = hub_with(settings(2), 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();
        hub.submit_vote(&"sess-1".into(), staker("0xaaa", 1000.0, 30, VoteChoice::Yes), ts(1_100))
            .await
            .unwrap();

        let live = hub.summary(&"sess-1".into()).await.unwrap();
        assert_eq!(live.state, SessionState::Open);
        assert_eq!(live.vote_count, 1);
        assert_eq!(live.tally.eligible_count, 1);

        hub.submit_vote(&"sess-1".into(), staker("0xbbb", 900.0, 60, VoteChoice::Yes), ts(1_200))
            .await
            .unwrap();

        // Finalized and evicted, but still summarizable from the archive.
        let archived = hub.summary(&"sess-1".into()).await.unwrap();
        assert_eq!(archived.state, SessionState::Approved);
        assert_eq!(archived.vote_count, 2);
    }

    #[tokio::test]
    async fn force_escalate_notifies_without_pool_split() {
        let (hub, _, sink) = hub_with(settings(3), 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();

        let decision = hub.force_escalate(&"sess-1".into(), ts(2_000)).await.unwrap();
        assert_eq!(decision.verdict, Verdict::Escalated);
        assert!(decision.pool_split.is_none());
        assert_eq!(hub.open_count().await, 0);
        assert_eq!(sink.event_count(), 1);
    }

    #[tokio::test]
    async fn restore_reloads_open_sessions() {
        let store = Arc::new(MemorySessionStore::new());
        let sink = Arc::new(RecordingSink::new());
        let hub1 = ModerationHub::new(settings(3), 16, store.clone(), sink.clone());
        hub1.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();
        hub1.submit_vote(&"sess-1".into(), staker("0xaaa", 1000.0, 30, VoteChoice::Yes), ts(1_100))
            .await
            .unwrap();

        // A fresh hub over the same store picks the session back up.
        let hub2 = ModerationHub::new(settings(3), 16, store, sink);
        assert_eq!(hub2.restore().await.unwrap(), 1);
        let summary = hub2.summary(&"sess-1".into()).await.unwrap();
        assert_eq!(summary.vote_count, 1);
        assert_eq!(summary.state, SessionState::Open);
    }

    #[tokio::test]
    async fn store_failure_propagates_at_open() {
        let hub = ModerationHub::new(
            settings(3),
            16,
            Arc::new(FailingSessionStore::new()),
            Arc::new(RecordingSink::new()),
        );
        let err = hub
            .open_session("sess-1".into(), "camp-1".into(), None, ts(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(hub.open_count().await, 0);
    }

    #[tokio::test]
    async fn pool_split_flows_into_event() {
        let defaults = SessionSettings {
            params: StakingParams {
                stake_fraction_threshold: 0.0,
                enable_adaptive_democracy: true,
                total_pool_eur: 510.0,
                majority_pool_ratio: 0.9,
                ..Default::default()
            },
            policy: DecisionPolicy {
                min_voters: 1,
                threshold_ratio: 1.0,
                auto_resolve: AutoResolvePolicy::Escalate,
            },
            vote_window_hours: 24,
        };
        let (hub, _, sink) = hub_with(defaults, 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();
        hub.submit_vote(&"sess-1".into(), staker("0xaaa", 1000.0, 30, VoteChoice::Yes), ts(1_100))
            .await
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        let split = events[0].pool_split.expect("split should be present");
        assert!((split.majority_share_eur - 459.0).abs() < 1e-9);
        assert!((split.minority_share_eur - 51.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn vote_on_archived_session_is_closed_not_missing() {
        let (hub, _, _) = hub_with(settings(3), 16);
        hub.open_session("sess-1".into(), "camp-1".into(), None, ts(1_000))
            .await
            .unwrap();
        hub.force_escalate(&"sess-1".into(), ts(2_000)).await.unwrap();

        let err = hub
            .submit_vote(&"sess-1".into(), staker("0xaaa", 1000.0, 30, VoteChoice::Yes), ts(2_100))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Session(SessionError::SessionClosed {
                verdict: Verdict::Escalated,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn sweeper_task_stops_on_shutdown() {
        let (hub, _, _) = hub_with(settings(3), 16);
        let shutdown = ShutdownController::new();
        let handle = spawn_sweeper(hub, 10, &shutdown);
        shutdown.shutdown();
        handle.await.expect("sweeper should exit cleanly");
    }
}
