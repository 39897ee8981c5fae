use rand::Rng;
use serde::{Deserialize, Serialize};

pub type AgentId = u32;

#[derive(Debug, Clone, Copy)]
pub struct Persona {
    pub name: &'static str,
    pub personality: &'static str,
}

/// Fixed roster; games take the first `n` entries.
pub const PERSONAS: [Persona; 6] = [
    Persona {
        name: "Detective Dave",
        personality: "You are a methodical detective who carefully analyzes evidence and behavior patterns. You ask probing questions and make logical deductions.",
    },
    Persona {
        name: "Nervous Nancy",
        personality: "You are very anxious and jumpy, often scared of being wrongly accused. You tend to panic and over-explain your actions.",
    },
    Persona {
        name: "Confident Carl",
        personality: "You are very self-assured and often take charge of discussions. You're not afraid to make bold accusations.",
    },
    Persona {
        name: "Analytical Anna",
        personality: "You approach everything with cold logic and statistical analysis. You speak in data and probabilities.",
    },
    Persona {
        name: "Joker Jim",
        personality: "You use humor to deflect tension and make light of serious situations. Even during accusations, you crack jokes.",
    },
    Persona {
        name: "Silent Sam",
        personality: "You're quiet and observant, speaking only when necessary. When you do speak, it's usually very insightful.",
    },
];

/// A simulated participant in one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: String,
    persona: String,
    alive: bool,
    is_impostor: bool,
    suspicion: f64,
}

impl Agent {
    pub fn new(id: AgentId, persona: &Persona, suspicion: f64) -> Self {
        Self {
            id,
            name: persona.name.to_string(),
            persona: persona.personality.to_string(),
            alive: true,
            is_impostor: false,
            suspicion: suspicion.clamp(0.0, 1.0),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_impostor(&self) -> bool {
        self.is_impostor
    }

    pub fn suspicion(&self) -> f64 {
        self.suspicion
    }

    pub(crate) fn set_suspicion(&mut self, value: f64) {
        self.suspicion = value.clamp(0.0, 1.0);
    }

    pub(crate) fn set_impostor(&mut self, is_impostor: bool) {
        self.is_impostor = is_impostor;
    }

    pub(crate) fn eliminate(&mut self) {
        self.alive = false;
    }
}

/// Build `count` agents from the persona roster with a small random starting suspicion.
pub fn build_roster<R: Rng + ?Sized>(count: usize, initial_spread: f64, rng: &mut R) -> Vec<Agent> {
    PERSONAS
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, persona)| {
            let suspicion = if initial_spread > 0.0 {
                rng.gen_range(0.0..initial_spread)
            } else {
                0.0
            };
            Agent::new(index as AgentId, persona, suspicion)
        })
        .collect()
}

/// Counts of living impostors and living crew.
pub fn living_counts(agents: &[Agent]) -> (usize, usize) {
    agents
        .iter()
        .filter(|a| a.is_alive())
        .fold((0, 0), |(impostors, crew), agent| {
            if agent.is_impostor() {
                (impostors + 1, crew)
            } else {
                (impostors, crew + 1)
            }
        })
}
