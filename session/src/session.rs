//! Moderation session — the stateful wrapper over the decision core.
//!
//! A session is created when a campaign completion enters moderation,
//! mutated by incoming votes and by window-expiry evaluation, and archived
//! once terminal. Transition evaluation runs on two triggers: every
//! incoming vote re-runs the decision rule (so a settled outcome cannot be
//! flipped by late votes), and window expiry runs it one final time before
//! falling back to the auto-resolve policy.

use crate::error::SessionError;
use crate::settings::SessionSettings;
use curia_engine::{aggregate, finalize, resolve, Decision, Ruling, VoteTally};
use curia_types::{CampaignId, SessionId, StakerInput, Timestamp, Verdict, Wallet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The lifecycle state of a moderation session.
///
/// `Open` is the only non-terminal state; no terminal state is
/// re-enterable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Accepting votes until the window elapses or an early-resolve
    /// condition is met.
    Open,
    /// Terminal: the completion passed moderation.
    Approved,
    /// Terminal: the completion failed moderation.
    Rejected,
    /// Terminal: handed to external review (policy fallback or operator
    /// override).
    Escalated,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        *self != Self::Open
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Open => None,
            Self::Approved => Some(Verdict::Approved),
            Self::Rejected => Some(Verdict::Rejected),
            Self::Escalated => Some(Verdict::Escalated),
        }
    }

    fn from_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Approved => Self::Approved,
            Verdict::Rejected => Self::Rejected,
            Verdict::Escalated => Self::Escalated,
        }
    }
}

/// How a submitted vote was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteStatus {
    /// First vote from this wallet in the round.
    Recorded,
    /// Superseded a prior vote from the same wallet (last-write-wins).
    Replaced,
}

/// Result of a successful vote submission.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteReceipt {
    pub status: VoteStatus,
    /// Present when this vote satisfied a terminal condition and the
    /// session transitioned immediately.
    pub decision: Option<Decision>,
}

/// One campaign completion under stake-weighted review.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModerationSession {
    pub session_id: SessionId,
    pub campaign_id: CampaignId,
    pub opened_at: Timestamp,
    pub state: SessionState,
    pub state_changed_at: Timestamp,
    settings: SessionSettings,
    /// Latest position per wallet.
    votes: HashMap<Wallet, StakerInput>,
}

impl ModerationSession {
    /// Open a new session. Settings are validated fail-fast and frozen for
    /// the session's lifetime.
    pub fn open(
        session_id: SessionId,
        campaign_id: CampaignId,
        settings: SessionSettings,
        now: Timestamp,
    ) -> Result<Self, SessionError> {
        settings.validate()?;
        Ok(Self {
            session_id,
            campaign_id,
            opened_at: now,
            state: SessionState::Open,
            state_changed_at: now,
            settings,
            votes: HashMap::new(),
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// When the voting window closes.
    pub fn expires_at(&self) -> Timestamp {
        self.opened_at
            .plus_hours(u64::from(self.settings.vote_window_hours))
    }

    /// Whether the voting window has elapsed.
    pub fn window_expired(&self, now: Timestamp) -> bool {
        self.opened_at.has_expired(self.settings.window_secs(), now)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Number of recorded positions (eligible or not).
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Snapshot of the current vote set. Order is irrelevant: aggregation
    /// sorts by wallet before folding.
    pub fn current_votes(&self) -> Vec<StakerInput> {
        self.votes.values().cloned().collect()
    }

    /// Recompute the tally and ruling for the current vote set.
    ///
    /// Referentially transparent: an unchanged vote set always yields an
    /// identical result, which is what makes per-vote and periodic
    /// re-evaluation safe.
    pub fn evaluate(&self) -> (VoteTally, Ruling) {
        let votes = self.current_votes();
        let tally = aggregate(&votes, &self.settings.params);
        let ruling = resolve(&tally, &self.settings.params, &self.settings.policy);
        (tally, ruling)
    }

    /// Record a vote (insert-or-replace by wallet) and re-run the decision
    /// rule.
    ///
    /// Rules:
    /// - A terminal session rejects the vote with [`SessionError::SessionClosed`].
    /// - An elapsed window rejects the vote; the expiry sweep finalizes.
    /// - If the updated tally satisfies a terminal condition the session
    ///   transitions immediately and the receipt carries the decision.
    pub fn submit_vote(
        &mut self,
        staker: StakerInput,
        now: Timestamp,
    ) -> Result<VoteReceipt, SessionError> {
        if let Some(verdict) = self.state.verdict() {
            return Err(SessionError::SessionClosed {
                id: self.session_id.to_string(),
                verdict,
            });
        }
        if self.window_expired(now) {
            return Err(SessionError::WindowElapsed(self.session_id.to_string()));
        }

        let status = match self.votes.insert(staker.wallet.clone(), staker) {
            Some(_) => VoteStatus::Replaced,
            None => VoteStatus::Recorded,
        };

        let (tally, ruling) = self.evaluate();
        let decision = match ruling {
            Ruling::Verdict(verdict) => Some(self.transition(&tally, verdict, now)),
            Ruling::QuorumUnmet | Ruling::Deadlocked => None,
        };

        Ok(VoteReceipt { status, decision })
    }

    /// Evaluate window expiry.
    ///
    /// If the window has elapsed on an open session, the decision rule runs
    /// one final time; without a clear verdict the auto-resolve policy
    /// applies. Returns the finalizing decision, or `None` when nothing
    /// changed.
    pub fn check_expiry(&mut self, now: Timestamp) -> Option<Decision> {
        if self.state.is_terminal() || !self.window_expired(now) {
            return None;
        }

        let (tally, ruling) = self.evaluate();
        let verdict = match ruling {
            Ruling::Verdict(verdict) => verdict,
            Ruling::QuorumUnmet | Ruling::Deadlocked => {
                self.settings.policy.auto_resolve.verdict()
            }
        };
        Some(self.transition(&tally, verdict, now))
    }

    /// Operator override: force an open session to ESCALATED.
    ///
    /// A forced transition, not a cancellation — there is no in-flight
    /// computation to interrupt.
    pub fn force_escalate(&mut self, now: Timestamp) -> Result<Decision, SessionError> {
        if let Some(verdict) = self.state.verdict() {
            return Err(SessionError::SessionClosed {
                id: self.session_id.to_string(),
                verdict,
            });
        }
        let votes = self.current_votes();
        let tally = aggregate(&votes, &self.settings.params);
        Ok(self.transition(&tally, Verdict::Escalated, now))
    }

    fn transition(&mut self, tally: &VoteTally, verdict: Verdict, now: Timestamp) -> Decision {
        self.state = SessionState::from_verdict(verdict);
        self.state_changed_at = now;
        tracing::info!(
            session = %self.session_id,
            campaign = %self.campaign_id,
            verdict = %verdict,
            participants = tally.eligible_count + tally.ineligible_count,
            "moderation session finalized"
        );
        finalize(tally, &self.settings.params, verdict)
    }
}
