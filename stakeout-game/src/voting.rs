//! Ballots, tallies and eliminations for the voting phase.

use crate::agent::{Agent, AgentId};
use crate::config::RevealPolicy;
use crate::log::{GameLog, LogKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: AgentId,
    pub target: AgentId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub ballots: Vec<Ballot>,
    /// Vote counts per living agent, in roster order.
    pub counts: Vec<(AgentId, usize)>,
    pub eliminated: Option<AgentId>,
}

/// Who `voter` votes for among the living agents.
///
/// Crew pick the most suspicious other agent. The impostor picks the least
/// suspicious crewmate, falling back to any other living agent. Ties go to
/// the first agent in roster order.
pub fn choose_target(voter: &Agent, living: &[&Agent]) -> Option<AgentId> {
    let others: Vec<&Agent> = living
        .iter()
        .copied()
        .filter(|a| a.id() != voter.id())
        .collect();

    if voter.is_impostor() {
        let lowest_crew = others
            .iter()
            .filter(|a| !a.is_impostor())
            .fold(None::<&&Agent>, |best, candidate| match best {
                Some(b) if b.suspicion() <= candidate.suspicion() => Some(b),
                _ => Some(candidate),
            });
        return lowest_crew.or_else(|| others.first()).map(|a| a.id());
    }

    others
        .iter()
        .fold(None::<&&Agent>, |best, candidate| match best {
            Some(b) if b.suspicion() >= candidate.suspicion() => Some(b),
            _ => Some(candidate),
        })
        .map(|a| a.id())
}

/// Compute ballots and the elimination target without touching any state.
pub fn tally(agents: &[Agent]) -> VoteOutcome {
    let living: Vec<&Agent> = agents.iter().filter(|a| a.is_alive()).collect();

    let ballots: Vec<Ballot> = living
        .iter()
        .filter_map(|voter| {
            choose_target(voter, &living).map(|target| Ballot {
                voter: voter.id(),
                target,
            })
        })
        .collect();

    let counts: Vec<(AgentId, usize)> = living
        .iter()
        .map(|a| {
            let votes = ballots.iter().filter(|b| b.target == a.id()).count();
            (a.id(), votes)
        })
        .collect();

    // first maximum wins in a left-to-right scan
    let eliminated = counts
        .iter()
        .filter(|(_, votes)| *votes > 0)
        .fold(None::<&(AgentId, usize)>, |best, current| match best {
            Some(b) if b.1 >= current.1 => Some(b),
            _ => Some(current),
        })
        .map(|(id, _)| *id);

    VoteOutcome {
        ballots,
        counts,
        eliminated,
    }
}

/// Run a vote over the living agents, eliminate the loser and narrate it.
pub fn conduct_vote(
    agents: &mut [Agent],
    log: &mut GameLog,
    reveal: RevealPolicy,
) -> Option<AgentId> {
    log.system("Voting Phase - Each agent votes for who they think is most suspicious!");

    let outcome = tally(agents);
    let name_of = |agents: &[Agent], id: AgentId| {
        agents
            .iter()
            .find(|a| a.id() == id)
            .map(|a| a.name().to_string())
            .unwrap_or_default()
    };

    for ballot in &outcome.ballots {
        let text = format!(
            "{} votes for {}",
            name_of(agents, ballot.voter),
            name_of(agents, ballot.target)
        );
        tracing::debug!("{}", text);
        log.push(LogKind::Vote, text, Some(ballot.voter));
    }

    let Some(eliminated_id) = outcome.eliminated else {
        log.system("No one was voted out this round.");
        return None;
    };

    let agent = agents.iter_mut().find(|a| a.id() == eliminated_id)?;
    agent.eliminate();

    let text = match reveal {
        RevealPolicy::OnElimination if agent.is_impostor() => {
            format!("{} was voted out (THE IMPOSTOR!)", agent.name())
        }
        RevealPolicy::OnElimination => {
            format!("{} was voted out (innocent crew member)", agent.name())
        }
        RevealPolicy::OnGameEnd => format!("{} was voted out", agent.name()),
    };

    tracing::info!("{}", text);
    log.system(text);
    Some(eliminated_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::PERSONAS;

    fn roster(suspicions: &[f64], impostor: usize) -> Vec<Agent> {
        suspicions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let mut agent = Agent::new(i as AgentId, &PERSONAS[i], *s);
                agent.set_impostor(i == impostor);
                agent
            })
            .collect()
    }

    #[test]
    fn test_crew_vote_for_most_suspicious_and_impostor_for_least() {
        let agents = roster(&[0.2, 0.5, 0.1, 0.3, 0.4], 2);
        let outcome = tally(&agents);

        let targets: Vec<(AgentId, AgentId)> =
            outcome.ballots.iter().map(|b| (b.voter, b.target)).collect();
        assert_eq!(targets, vec![(0, 1), (1, 4), (2, 0), (3, 1), (4, 1)]);

        // impostor never had the top score, so the most suspicious crewmate goes
        assert_eq!(outcome.eliminated, Some(1));
        assert!(!agents[outcome.eliminated.unwrap() as usize].is_impostor());
    }

    #[test]
    fn test_ties_break_in_roster_order() {
        let agents = roster(&[0.0, 0.0, 0.0, 0.0, 0.0], 2);
        let outcome = tally(&agents);

        let targets: Vec<AgentId> = outcome.ballots.iter().map(|b| b.target).collect();
        assert_eq!(targets, vec![1, 0, 0, 0, 0]);
        assert_eq!(outcome.eliminated, Some(0));
    }

    #[test]
    fn test_vote_count_tie_goes_to_first_in_scan() {
        // 0 -> 1, 1 -> 2, impostor 2 -> 0: one vote each
        let mut agents = roster(&[0.1, 0.5, 0.3, 0.0], 2);
        agents[3].eliminate();
        let outcome = tally(&agents);

        assert_eq!(outcome.counts, vec![(0, 1), (1, 1), (2, 1)]);
        assert_eq!(outcome.eliminated, Some(0));
    }

    #[test]
    fn test_lone_impostor_falls_back_to_any_agent() {
        let mut agents = roster(&[0.4, 0.1, 0.2, 0.3], 1);
        agents[0].eliminate();
        agents[2].eliminate();
        agents[3].eliminate();
        let mut second = Agent::new(4, &PERSONAS[4], 0.0);
        second.set_impostor(true);
        agents.push(second);

        let living: Vec<&Agent> = agents.iter().filter(|a| a.is_alive()).collect();
        assert_eq!(choose_target(&agents[1], &living), Some(4));
    }

    #[test]
    fn test_single_survivor_casts_no_vote() {
        let mut agents = roster(&[0.1, 0.2, 0.3, 0.4], 0);
        for agent in agents.iter_mut().skip(1) {
            agent.eliminate();
        }
        let mut log = GameLog::new();

        let outcome = tally(&agents);
        assert!(outcome.ballots.is_empty());
        assert_eq!(outcome.eliminated, None);

        assert_eq!(conduct_vote(&mut agents, &mut log, RevealPolicy::OnElimination), None);
        assert_eq!(log.last().unwrap().text, "No one was voted out this round.");
    }

    #[test]
    fn test_never_eliminates_dead_agents_and_at_most_one() {
        let mut agents = roster(&[0.9, 0.8, 0.1, 0.2, 0.3, 0.4], 5);
        agents[0].eliminate();
        let before: Vec<bool> = agents.iter().map(|a| a.is_alive()).collect();
        let mut log = GameLog::new();

        let eliminated = conduct_vote(&mut agents, &mut log, RevealPolicy::OnElimination)
            .expect("someone is voted out");
        assert_ne!(eliminated, 0);

        let newly_dead = agents
            .iter()
            .zip(before)
            .filter(|(agent, was_alive)| *was_alive && !agent.is_alive())
            .count();
        assert_eq!(newly_dead, 1);
    }

    #[test]
    fn test_vote_log_entries_and_reveal() {
        let mut agents = roster(&[0.0, 0.0, 0.9, 0.0, 0.0], 2);
        let mut log = GameLog::new();

        let eliminated = conduct_vote(&mut agents, &mut log, RevealPolicy::OnElimination);
        assert_eq!(eliminated, Some(2));
        assert_eq!(log.of_kind(LogKind::Vote).count(), 5);
        assert_eq!(
            log.last().unwrap().text,
            "Confident Carl was voted out (THE IMPOSTOR!)"
        );

        let mut agents = roster(&[0.0, 0.0, 0.9, 0.0, 0.0], 2);
        let mut log = GameLog::new();
        conduct_vote(&mut agents, &mut log, RevealPolicy::OnGameEnd);
        assert_eq!(log.last().unwrap().text, "Confident Carl was voted out");
    }
}
