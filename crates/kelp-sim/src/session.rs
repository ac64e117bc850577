//! Session driver: owns the ledger and every actor.
//!
//! All mutation flows through one [`Session`]: actors build bundles, the
//! session pushes them, and after every committed step it re-queries the
//! ledger and replaces each actor's coin set wholesale. The full-replace
//! policy is deliberate — actor state can never silently diverge from
//! ledger truth, even when a step had side effects the actor didn't
//! initiate.
//!
//! Index 0 is the sentinel `nobody` actor, which only exists to sink
//! rewards no caller claimed.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use kelp_core::error::RejectReason;
use kelp_core::traits::{LedgerService, StepEffects};
use kelp_core::types::{Coin, Condition, Contract, Hash256, SpendBundle};
use kelp_wallet::{Actor, KeyStore, Seed, WalletError, combine};

use crate::config::SimConfig;
use crate::error::SessionError;
use crate::ledger::Ledger;

/// Handle to an actor owned by a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(usize);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Where a created coin should go.
///
/// The tagged variant resolved once at the call boundary — either a known
/// actor of this session or a contract's puzzle hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpendTarget {
    /// Pay to a session actor's locking program.
    Actor(ActorId),
    /// Pay to a contract's puzzle hash.
    Contract(Hash256),
}

impl From<&Contract> for SpendTarget {
    fn from(contract: &Contract) -> Self {
        SpendTarget::Contract(contract.puzzle_hash())
    }
}

/// Options for [`Session::spend_coin`].
///
/// Defaults describe a value transfer of 1 mote back to the spender. The
/// raw `solution` override bypasses the value-transfer instruction entirely
/// and is mutually exclusive with `recipient`/`remainder`.
#[derive(Clone, Debug)]
pub struct SpendConfig {
    /// Amount of the created output coin, in motes.
    pub amount: u64,
    /// Recipient of the created coin. `None` pays the spender itself.
    pub recipient: Option<SpendTarget>,
    /// Where to send any remainder. `None` drops it as an implicit fee.
    pub remainder: Option<SpendTarget>,
    /// Verbatim condition override for non-standard spends.
    pub solution: Option<Vec<Condition>>,
}

impl Default for SpendConfig {
    fn default() -> Self {
        Self {
            amount: 1,
            recipient: None,
            remainder: None,
            solution: None,
        }
    }
}

impl SpendConfig {
    /// Value transfer of `amount` motes.
    pub fn value(amount: u64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Raw condition override; bypasses the value-transfer defaults.
    pub fn raw(solution: Vec<Condition>) -> Self {
        Self {
            solution: Some(solution),
            ..Self::default()
        }
    }

    /// Direct the created coin at `target`.
    pub fn to(mut self, target: SpendTarget) -> Self {
        self.recipient = Some(target);
        self
    }

    /// Send any remainder to `target`.
    pub fn remainder_to(mut self, target: SpendTarget) -> Self {
        self.remainder = Some(target);
        self
    }
}

/// Outcome of pushing a bundle: either the step's effects or the ledger's
/// reason for refusing it. Rejections are data — callers branch on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushResult {
    /// The bundle was committed by a production step.
    Committed {
        /// Coins created by the step (bundle outputs plus issuance).
        additions: Vec<Coin>,
        /// Coins consumed by the step.
        removals: Vec<Coin>,
    },
    /// The ledger refused the bundle; nothing changed.
    Rejected(RejectReason),
}

impl PushResult {
    /// Whether the bundle was committed.
    pub fn is_committed(&self) -> bool {
        matches!(self, PushResult::Committed { .. })
    }

    /// The rejection reason, if any.
    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            PushResult::Rejected(reason) => Some(reason),
            PushResult::Committed { .. } => None,
        }
    }

    /// Created coins locked to `puzzle_hash` — "which of my coins did this
    /// transaction give me".
    pub fn additions_for(&self, puzzle_hash: &Hash256) -> Vec<Coin> {
        match self {
            PushResult::Committed { additions, .. } => additions
                .iter()
                .filter(|c| c.puzzle_hash == *puzzle_hash)
                .cloned()
                .collect(),
            PushResult::Rejected(_) => Vec::new(),
        }
    }
}

/// Process-wide simulation state: the ledger, the clock, and every actor.
pub struct Session {
    config: SimConfig,
    ledger: Box<dyn LedgerService>,
    keys: KeyStore,
    actors: Vec<Actor>,
}

impl Session {
    /// Create a session backed by a fresh in-memory ledger.
    pub fn new(config: SimConfig) -> Self {
        let ledger = Box::new(Ledger::new(config.clone()));
        Self::with_ledger(ledger, config)
    }

    /// Create a session over an externally-provided ledger service.
    pub fn with_ledger(ledger: Box<dyn LedgerService>, config: SimConfig) -> Self {
        let mut keys = KeyStore::new(Seed::generate());
        let nobody = Actor::new("nobody", keys.derive(0).clone());
        Self {
            config,
            ledger,
            keys,
            actors: vec![nobody],
        }
    }

    /// Register a new actor and return its handle.
    pub fn add_actor(&mut self, name: &str) -> ActorId {
        let index = self.actors.len();
        let keypair = self.keys.derive(index as u32).clone();
        let actor = Actor::new(name, keypair);
        debug!(name, id = index, puzzle_hash = %actor.puzzle_hash(), "registered actor");
        self.actors.push(actor);
        ActorId(index)
    }

    /// The sentinel actor that sinks unclaimed rewards.
    pub fn nobody(&self) -> ActorId {
        ActorId(0)
    }

    /// Borrow an actor.
    pub fn actor(&self, id: ActorId) -> Result<&Actor, SessionError> {
        self.actors.get(id.0).ok_or(SessionError::UnknownActor(id))
    }

    /// An actor's current balance, in motes.
    pub fn balance(&self, id: ActorId) -> Result<u64, SessionError> {
        Ok(self.actor(id)?.balance())
    }

    /// Number of committed production steps.
    pub fn height(&self) -> u64 {
        self.ledger.height()
    }

    /// Simulated time since genesis.
    pub fn current_time(&self) -> Duration {
        Duration::from_secs(self.ledger.height() * self.config.block_time_secs)
    }

    /// The session's configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Query the ledger for unspent coins locked by an arbitrary puzzle
    /// hash — the window onto coins no actor controls (contracts).
    pub fn unspent_by_puzzle_hash(&self, puzzle_hash: &Hash256) -> Vec<Coin> {
        self.ledger.unspent_by_puzzle_hash(puzzle_hash)
    }

    /// Submit a bundle; on acceptance commit it with one production step
    /// (reward to `nobody`) and refresh every actor.
    ///
    /// On rejection the result returns immediately — time does not advance
    /// and no coin set changes.
    pub fn push_tx(&mut self, bundle: SpendBundle) -> PushResult {
        if let Err(reason) = self.ledger.submit(&bundle) {
            info!(%reason, "spend bundle rejected");
            return PushResult::Rejected(reason);
        }
        let reward_puzzle_hash = self.actors[0].puzzle_hash();
        let effects = self.ledger.advance_step(reward_puzzle_hash);
        self.refresh_all();
        PushResult::Committed {
            additions: effects.created,
            removals: effects.destroyed,
        }
    }

    /// Advance one production step with no pending transaction, crediting
    /// `beneficiary` (default: `nobody`), then refresh every actor.
    pub fn farm_block(&mut self, beneficiary: Option<ActorId>) -> Result<StepEffects, SessionError> {
        let id = beneficiary.unwrap_or_else(|| self.nobody());
        let reward_puzzle_hash = self.actor(id)?.puzzle_hash();
        let effects = self.ledger.advance_step(reward_puzzle_hash);
        debug!(height = self.ledger.height(), beneficiary = %id, "farmed block");
        self.refresh_all();
        Ok(effects)
    }

    /// Farm blocks until the simulated clock has advanced by `duration`.
    pub fn skip_time(
        &mut self,
        duration: Duration,
        beneficiary: Option<ActorId>,
    ) -> Result<(), SessionError> {
        let step = self.config.block_time_secs.max(1);
        let blocks = duration.as_secs().div_ceil(step);
        for _ in 0..blocks {
            self.farm_block(beneficiary)?;
        }
        Ok(())
    }

    /// Return one coin worth at least `amount` motes, merging smaller coins
    /// first when no single coin suffices.
    ///
    /// An explicit loop rather than recursion: every committed combine
    /// strictly reduces the actor's coin count, so the iteration count is
    /// bounded by the initial count.
    pub fn choose_coin(&mut self, id: ActorId, amount: u64) -> Result<Coin, SessionError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount("target must be non-zero".into()).into());
        }
        loop {
            let bundle = {
                let actor = self.actor(id)?;
                let selection = actor.select_coins(amount)?;
                if let [coin] = selection.coins.as_slice() {
                    return Ok(coin.clone());
                }
                debug!(
                    actor = actor.name(),
                    inputs = selection.coins.len(),
                    total = selection.total,
                    "merging coins to cover target"
                );
                combine::combine_bundle(actor, &selection.coins, &self.config.genesis_challenge)?
            };
            if let PushResult::Rejected(reason) = self.push_tx(bundle) {
                return Err(SessionError::CombineRejected(reason));
            }
        }
    }

    /// Construct, sign, and push one spend of `coin` per `config`.
    ///
    /// Defaults emit a create-coin instruction for `config.amount` directed
    /// at the spender or the named recipient, with an optional remainder
    /// output; a raw solution bypasses that entirely.
    pub fn spend_coin(
        &mut self,
        id: ActorId,
        coin: &Coin,
        config: SpendConfig,
    ) -> Result<PushResult, SessionError> {
        let challenge = self.config.genesis_challenge;
        let bundle = if let Some(solution) = config.solution {
            if config.recipient.is_some() || config.remainder.is_some() {
                return Err(SessionError::ConflictingSpendOptions);
            }
            self.actor(id)?.spend_with_solution(coin, solution, &challenge)?
        } else {
            let recipient = match config.recipient {
                Some(target) => self.resolve_target(target)?,
                None => self.actor(id)?.puzzle_hash(),
            };
            let mut payments = vec![(recipient, config.amount)];
            if let Some(target) = config.remainder {
                let remainder = self.resolve_target(target)?;
                let change = coin.amount.checked_sub(config.amount).ok_or_else(|| {
                    WalletError::InvalidAmount(format!(
                        "amount {} exceeds coin value {}",
                        config.amount, coin.amount
                    ))
                })?;
                if change > 0 {
                    payments.push((remainder, change));
                }
            }
            self.actor(id)?.pay_spend(coin, &payments, &challenge)?
        };
        Ok(self.push_tx(bundle))
    }

    /// Fund a new contract-locked coin of `amount` motes.
    ///
    /// Raises only when no funding coin can be assembled at all; a ledger
    /// rejection of the attempt comes back as `Ok(None)` so callers can
    /// branch on it directly.
    pub fn launch_contract(
        &mut self,
        id: ActorId,
        contract: &Contract,
        amount: u64,
    ) -> Result<Option<Coin>, SessionError> {
        let funding = self.choose_coin(id, amount)?;
        let challenge = self.config.genesis_challenge;
        let bundle = {
            let actor = self.actor(id)?;
            let mut payments = vec![(contract.puzzle_hash(), amount)];
            let change = funding.amount - amount;
            if change > 0 {
                payments.push((actor.puzzle_hash(), change));
            }
            actor.pay_spend(&funding, &payments, &challenge)?
        };
        let predicted = contract.predict_coin(funding.coin_id(), amount);
        match self.push_tx(bundle) {
            PushResult::Committed { additions, .. } => {
                let launched = additions
                    .into_iter()
                    .find(|c| c.coin_id() == predicted.coin_id());
                if launched.is_none() {
                    warn!(%predicted, "committed launch did not create the predicted coin");
                }
                Ok(launched)
            }
            PushResult::Rejected(reason) => {
                debug!(%reason, "contract launch rejected");
                Ok(None)
            }
        }
    }

    /// Transfer `amount` motes from one actor to another: choose (merging
    /// if needed) a covering coin, pay the target, remainder back to the
    /// sender.
    pub fn give_kelp(
        &mut self,
        from: ActorId,
        to: ActorId,
        amount: u64,
    ) -> Result<PushResult, SessionError> {
        self.actor(to)?;
        let coin = self.choose_coin(from, amount)?;
        self.spend_coin(
            from,
            &coin,
            SpendConfig::value(amount)
                .to(SpendTarget::Actor(to))
                .remainder_to(SpendTarget::Actor(from)),
        )
    }

    /// Tear the session down, releasing ledger resources.
    ///
    /// Dropping the session has the same effect; this form just makes the
    /// release explicit at the end of a scenario.
    pub fn close(mut self) {
        self.ledger.close();
    }

    fn resolve_target(&self, target: SpendTarget) -> Result<Hash256, SessionError> {
        match target {
            SpendTarget::Actor(id) => Ok(self.actor(id)?.puzzle_hash()),
            SpendTarget::Contract(puzzle_hash) => Ok(puzzle_hash),
        }
    }

    fn refresh_all(&mut self) {
        for actor in &mut self.actors {
            let coins = self.ledger.unspent_by_puzzle_hash(&actor.puzzle_hash());
            actor.replace_coins(coins);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.ledger.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("height", &self.ledger.height())
            .field("actors", &self.actors.len())
            .finish()
    }
}
