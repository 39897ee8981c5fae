use crate::agent::Agent;

/// Substituted when an agent's statement cannot be generated.
pub const FILLER_STATEMENT: &str = "I'm not sure what to think about all this...";

/// System prompt used when an agent persona is created.
pub fn personality_prompt(agent: &Agent) -> String {
    format!(
        "You are {name} playing Among Us. {persona}

IMPORTANT: You are NOT a blockchain assistant. You are playing a social deduction game.
- Make observations about other players
- Share suspicions naturally
- Defend yourself when accused
- Vote based on behavior and evidence
- Stay in character at all times
- Engage in the social aspects of the game

Respond as your character would in Among Us discussions, voting phases, and social interactions.",
        name = agent.name(),
        persona = agent.persona(),
    )
}

pub fn round_prompt(is_impostor: bool, round: u32) -> String {
    if is_impostor {
        format!(
            "You are the impostor in Among Us. You need to blend in and deflect suspicion while subtly casting doubt on others. The game is in round {}. Make a statement that sounds innocent but might redirect suspicion. Keep it brief (1-2 sentences).",
            round
        )
    } else {
        format!(
            "You are a crew member in Among Us trying to identify the impostor. It's round {}. Share your observations or suspicions about other players' behavior. Keep it brief (1-2 sentences).",
            round
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::PERSONAS;

    #[test]
    fn test_round_prompts_differ_by_role() {
        let impostor = round_prompt(true, 4);
        let crew = round_prompt(false, 4);

        assert!(impostor.contains("impostor") && impostor.contains("round 4"));
        assert!(crew.contains("crew member") && crew.contains("round 4"));
        assert_ne!(impostor, crew);
    }

    #[test]
    fn test_personality_prompt_embeds_persona() {
        let agent = Agent::new(0, &PERSONAS[4], 0.0);
        let prompt = personality_prompt(&agent);
        assert!(prompt.starts_with("You are Joker Jim playing Among Us."));
        assert!(prompt.contains(PERSONAS[4].personality));
    }
}
