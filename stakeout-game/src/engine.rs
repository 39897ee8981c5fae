use crate::agent::{build_roster, AgentId};
use crate::config::{Account, GameConfig, RevealPolicy};
use crate::error::{GameError, Result, SettlementError};
use crate::log::{GameLog, LogEntry, LogKind};
use crate::prompts::{personality_prompt, round_prompt, FILLER_STATEMENT};
use crate::session::{GameSession, GameState, LossReason, Outcome};
use crate::settlement::{SettlementController, SettlementResult};
use crate::stop::StopSignal;
use crate::suspicion::SuspicionModel;
use crate::voting;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stakeout_core::{
    AgentConfig, AgentHandle, Amount, CannedResponder, Ledger, Responder, ResponderError, TxId,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::timeout;

const LOG_FEED_CAPACITY: usize = 512;

/// Where an agent's statements come from.
#[derive(Debug, Clone)]
enum Voice {
    Remote(AgentHandle),
    /// The responder could not initialise this agent; use stock lines.
    StandIn,
}

/// How a call to [`RoundEngine::run`] ended.
#[derive(Debug)]
pub enum RunReport {
    Finished {
        outcome: Outcome,
        settlement: std::result::Result<SettlementResult, SettlementError>,
    },
    /// Stopped externally; the session is still `Playing`.
    Halted { round: u32 },
}

/// Drives a single game session from bet placement to settlement.
pub struct RoundEngine {
    config: GameConfig,
    ledger: Arc<dyn Ledger>,
    responder: Arc<dyn Responder>,
    stand_in: CannedResponder,
    settlement: SettlementController,
    suspicion: SuspicionModel,
    rng: StdRng,
    feed: broadcast::Sender<LogEntry>,
    session: GameSession,
    voices: Vec<Voice>,
    /// Speakers still owed a statement in an interrupted round.
    pending: Option<VecDeque<AgentId>>,
}

impl RoundEngine {
    pub fn new(
        config: GameConfig,
        ledger: Arc<dyn Ledger>,
        responder: Arc<dyn Responder>,
    ) -> Result<Self> {
        config.validate()?;

        let (feed, _) = broadcast::channel(LOG_FEED_CAPACITY);
        let settlement =
            SettlementController::new(ledger.clone(), config.house.clone(), config.payout_bps);
        let suspicion = SuspicionModel::new(config.suspicion.clone());

        Ok(Self {
            session: GameSession::new(GameLog::with_feed(feed.clone())),
            config,
            ledger,
            responder,
            stand_in: CannedResponder::new(),
            settlement,
            suspicion,
            rng: StdRng::from_entropy(),
            feed,
            voices: Vec::new(),
            pending: None,
        })
    }

    /// Make suspicion noise, starting scores and stand-in lines reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.stand_in = CannedResponder::seeded(seed.wrapping_add(1));
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn state(&self) -> &GameState {
        self.session.state()
    }

    pub fn progress(&self) -> f64 {
        self.session.progress(self.config.max_rounds)
    }

    /// Live feed of log entries, across resets.
    pub fn subscribe_log(&self) -> broadcast::Receiver<LogEntry> {
        self.feed.subscribe()
    }

    /// Discard the current session and start over in `Setup`.
    pub fn reset(&mut self) {
        tracing::info!("Resetting game {}", self.session.id());
        self.session = GameSession::new(GameLog::with_feed(self.feed.clone()));
        self.voices.clear();
        self.pending = None;
    }

    /// `Setup -> ImpostorSelected`: take the player's bet and build the roster.
    ///
    /// Nothing is mutated unless the bet transfer succeeds.
    pub async fn place_bet(&mut self, player: &Account, bet: Amount) -> Result<TxId> {
        if self.session.state != GameState::Setup {
            return Err(GameError::invalid_state("Bet already placed for this game"));
        }

        player.validate("Player")?;
        self.config.house.validate("House")?;
        self.config.validate()?;

        if bet < self.config.min_bet {
            return Err(GameError::validation(format!(
                "Bet amount must be at least {} STX",
                self.config.min_bet
            )));
        }

        let balance = self.ledger.get_balance(&player.address).await?;
        if balance < bet {
            return Err(GameError::InsufficientBalance {
                need: bet,
                available: balance,
            });
        }

        tracing::info!(
            "Game {}: transferring bet of {} from {}",
            self.session.id(),
            bet,
            player.address
        );
        let txid = self
            .ledger
            .transfer(&player.private_key, &self.config.house.address, bet)
            .await
            .map_err(|e| {
                tracing::warn!("Game {}: bet transfer failed: {}", self.session.id(), e);
                e
            })?;

        self.session.bet_amount = bet;
        self.session.player_address = player.address.clone();
        self.session.player_balance = Some(balance - bet);
        self.session.log.system(format!(
            "Transferred {} STX to game address {} (TxID: {})",
            bet, self.config.house.address, txid
        ));

        self.session.agents = build_roster(
            self.config.roster_size,
            self.config.suspicion.initial_spread,
            &mut self.rng,
        );
        self.init_voices().await;

        self.session.state = GameState::ImpostorSelected;
        tracing::info!(
            "Game {} ready for impostor selection with {} agents",
            self.session.id(),
            self.session.agents.len()
        );

        Ok(txid)
    }

    async fn init_voices(&mut self) {
        let mut voices = Vec::with_capacity(self.session.agents.len());

        for agent in &self.session.agents {
            let config = AgentConfig {
                network: self.config.network,
                enable_conversational: true,
                personality_prompt: personality_prompt(agent),
                name: agent.name().to_string(),
            };

            let init = timeout(self.config.responder_timeout, self.responder.init(&config))
                .await
                .unwrap_or(Err(ResponderError::Timeout(self.config.responder_timeout)));

            match init {
                Ok(handle) => {
                    tracing::debug!("{} initialised as agent #{}", agent.name(), handle.id);
                    voices.push(Voice::Remote(handle));
                }
                Err(e) => {
                    tracing::warn!("Failed to initialise {}: {}; using stand-in", agent.name(), e);
                    self.session.log.system(format!(
                        "{} could not be reached; using stand-in responses.",
                        agent.name()
                    ));
                    voices.push(Voice::StandIn);
                }
            }
        }

        self.voices = voices;
    }

    /// `ImpostorSelected -> Playing`: the operator picks the impostor.
    pub fn designate_impostor(&mut self, agent_id: AgentId) -> Result<()> {
        if self.session.state != GameState::ImpostorSelected {
            return Err(GameError::invalid_state(
                "Impostor can only be chosen after the bet is placed",
            ));
        }
        if self.session.agent(agent_id).is_none() {
            return Err(GameError::AgentNotFound(agent_id));
        }

        for agent in self.session.agents.iter_mut() {
            agent.set_impostor(agent.id() == agent_id);
        }

        let name = self
            .session
            .agent(agent_id)
            .map(|a| a.name().to_string())
            .unwrap_or_default();
        self.session.state = GameState::Playing;
        self.session
            .log
            .system(format!("Game started! {} is the secret impostor.", name));
        tracing::info!("Game {} started, impostor is {}", self.session.id(), name);

        Ok(())
    }

    /// Play rounds until the game finishes or `stop` fires.
    ///
    /// A halted game stays `Playing` and may be resumed with a new signal. A
    /// round interrupted mid-statements is completed first, vote included.
    pub async fn run(&mut self, mut stop: StopSignal) -> Result<RunReport> {
        if self.session.state != GameState::Playing {
            return Err(GameError::invalid_state("Game is not in progress"));
        }

        let max_rounds = self.config.max_rounds;
        loop {
            let mut speakers = match self.pending.take() {
                Some(remaining) => {
                    self.session
                        .log
                        .system(format!("Resuming round {}", self.session.round));
                    remaining
                }
                None => {
                    if self.session.round >= max_rounds {
                        break;
                    }
                    if stop.is_stopped() {
                        return Ok(self.halt());
                    }

                    self.session.round += 1;
                    self.session
                        .log
                        .system(format!("--- Round {} ---", self.session.round));
                    tracing::info!(
                        "Game {} round {}/{} ({:.0}%)",
                        self.session.id(),
                        self.session.round,
                        max_rounds,
                        self.progress() * 100.0
                    );
                    self.session.living().map(|a| a.id()).collect()
                }
            };
            let round = self.session.round;

            while let Some(speaker) = speakers.front().copied() {
                if stop.is_stopped() {
                    self.pending = Some(speakers);
                    return Ok(self.halt());
                }
                speakers.pop_front();
                self.take_statement(speaker, round).await;
                if stop.pause(self.config.pacing.statement).await {
                    self.pending = Some(speakers);
                    return Ok(self.halt());
                }
            }

            if round % self.config.vote_interval == 0 {
                voting::conduct_vote(
                    &mut self.session.agents,
                    &mut self.session.log,
                    self.config.reveal,
                );

                let (impostors, crew) = self.session.living_counts();
                tracing::info!(
                    "Alive crewmates: {}, alive impostors: {}",
                    crew,
                    impostors
                );

                if impostors == 0 {
                    return Ok(self.finish(Outcome::PlayerWin).await);
                }
                if impostors >= crew {
                    return Ok(self
                        .finish(Outcome::PlayerLoss(LossReason::ImpostorOutnumberedCrew))
                        .await);
                }

                if stop.pause(self.config.pacing.vote).await {
                    return Ok(self.halt());
                }
            }

            if round < max_rounds && stop.pause(self.config.pacing.round).await {
                return Ok(self.halt());
            }
        }

        Ok(self
            .finish(Outcome::PlayerLoss(LossReason::ImpostorSurvived))
            .await)
    }

    /// Retry-safe settlement entry point; a settled game is never paid twice.
    pub async fn settle(&mut self) -> std::result::Result<SettlementResult, SettlementError> {
        let outcome = self
            .session
            .outcome()
            .ok_or(SettlementError::NotFinished(self.session.id()))?;
        self.settlement.settle(&mut self.session, outcome).await
    }

    async fn take_statement(&mut self, speaker: AgentId, round: u32) {
        let Some(index) = self.session.agents.iter().position(|a| a.id() == speaker) else {
            return;
        };
        let agent = &self.session.agents[index];
        let prompt = round_prompt(agent.is_impostor(), round);
        let name = agent.name().to_string();

        let reply = match self.voices.get(index) {
            Some(Voice::Remote(handle)) => {
                timeout(
                    self.config.responder_timeout,
                    self.responder.respond(handle, &prompt),
                )
                .await
                .unwrap_or(Err(ResponderError::Timeout(self.config.responder_timeout)))
            }
            Some(Voice::StandIn) => Ok(self.stand_in.line().to_string()),
            None => Err(ResponderError::AgentNotFound(speaker)),
        };

        let statement = match reply {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("{} returned an empty statement", name);
                FILLER_STATEMENT.to_string()
            }
            Err(e) => {
                tracing::warn!("{} response error: {}", name, e);
                FILLER_STATEMENT.to_string()
            }
        };

        tracing::debug!("{}: {}", name, statement);
        self.session
            .log
            .push(LogKind::Statement, statement.clone(), Some(speaker));
        self.suspicion
            .apply(&mut self.session.agents, speaker, &statement, &mut self.rng);
    }

    fn halt(&mut self) -> RunReport {
        tracing::info!(
            "Game {} stopped at round {}",
            self.session.id(),
            self.session.round
        );
        self.session.log.system("Game stopped by user");
        RunReport::Halted {
            round: self.session.round,
        }
    }

    async fn finish(&mut self, outcome: Outcome) -> RunReport {
        self.session.state = GameState::Finished { outcome };
        self.session
            .log
            .system(format!("GAME OVER: {}", outcome.message()));
        tracing::info!(
            "Game {} finished after {} rounds: {:?}",
            self.session.id(),
            self.session.round,
            outcome
        );

        if self.config.reveal == RevealPolicy::OnGameEnd {
            if let Some(impostor) = self.session.impostor() {
                let text = format!("{} was the impostor.", impostor.name());
                self.session.log.system(text);
            }
        }

        let settlement = self.settlement.settle(&mut self.session, outcome).await;
        if let Err(e) = &settlement {
            tracing::warn!("Game {} settlement error: {}", self.session.id(), e);
        }

        RunReport::Finished {
            outcome,
            settlement,
        }
    }
}
