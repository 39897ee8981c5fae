//! Per-agent suspicion scores derived from what other agents say.
//!
//! A statement raises an observer's score when it names the observer or
//! sounds accusatory. Impostor accusations land harder. A small bounded
//! noise term is drawn from the caller's random source, so a seeded
//! generator (or zero amplitude) makes updates reproducible.

use crate::agent::{Agent, AgentId};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspicionConfig {
    pub base_delta: f64,
    pub deflection_bonus: f64,
    /// Noise is drawn from `[-noise, +noise]`.
    pub noise: f64,
    /// Starting scores are drawn from `[0, initial_spread)`.
    pub initial_spread: f64,
    pub keywords: Vec<String>,
}

impl Default for SuspicionConfig {
    fn default() -> Self {
        Self {
            base_delta: 0.10,
            deflection_bonus: 0.05,
            noise: 0.025,
            initial_spread: 0.3,
            keywords: ["suspicious", "acting weird", "strange", "doubt"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl SuspicionConfig {
    /// No noise and no starting spread.
    pub fn deterministic() -> Self {
        Self {
            noise: 0.0,
            initial_spread: 0.0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuspicionModel {
    config: SuspicionConfig,
}

impl SuspicionModel {
    pub fn new(config: SuspicionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuspicionConfig {
        &self.config
    }

    /// Deterministic part of the update, before noise.
    pub fn delta(&self, observer: &Agent, speaker: &Agent, statement: &str) -> f64 {
        let text = statement.to_lowercase();
        let mentioned = text.contains(&observer.name().to_lowercase());
        let accusatory = self
            .config
            .keywords
            .iter()
            .any(|k| text.contains(&k.to_lowercase()));

        if !(mentioned || accusatory) {
            return 0.0;
        }

        let mut delta = self.config.base_delta;
        if speaker.is_impostor() {
            delta += self.config.deflection_bonus;
        }
        delta
    }

    /// New suspicion for `observer` after hearing `speaker` say `statement`.
    pub fn update<R: Rng + ?Sized>(
        &self,
        observer: &Agent,
        speaker: &Agent,
        statement: &str,
        rng: &mut R,
    ) -> f64 {
        if observer.id() == speaker.id() {
            return observer.suspicion();
        }

        let mut change = self.delta(observer, speaker, statement);
        if self.config.noise > 0.0 {
            change += rng.gen_range(-self.config.noise..=self.config.noise);
        }

        (observer.suspicion() + change).clamp(0.0, 1.0)
    }

    /// Update every other living agent after `speaker_id` has spoken.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        agents: &mut [Agent],
        speaker_id: AgentId,
        statement: &str,
        rng: &mut R,
    ) {
        let Some(speaker) = agents.iter().find(|a| a.id() == speaker_id).cloned() else {
            return;
        };

        for observer in agents
            .iter_mut()
            .filter(|a| a.is_alive() && a.id() != speaker_id)
        {
            let next = self.update(observer, &speaker, statement, rng);
            observer.set_suspicion(next);
        }
    }
}
