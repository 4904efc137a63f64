//! Simulated agents and the registry that holds their live state.

use serde::{Deserialize, Serialize};

/// Fixed identity of a simulated agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    Orchestrator,
    Weather,
    News,
}

impl AgentId {
    /// Every agent, in display order.
    pub const ALL: [AgentId; 3] = [AgentId::Orchestrator, AgentId::Weather, AgentId::News];

    pub fn display_name(self) -> &'static str {
        match self {
            AgentId::Orchestrator => "Orchestrator Node",
            AgentId::Weather => "Weather Agent",
            AgentId::News => "News Agent",
        }
    }

    /// Nominal latency shown on the agent card.
    pub fn latency_ms(self) -> u32 {
        match self {
            AgentId::Orchestrator => 45,
            AgentId::Weather => 120,
            AgentId::News => 210,
        }
    }

    fn index(self) -> usize {
        match self {
            AgentId::Orchestrator => 0,
            AgentId::Weather => 1,
            AgentId::News => 2,
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Status of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Active,
    Error,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Active => "active",
            AgentStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// A simulated worker unit.
///
/// All fields are owned values, so `clone()` yields a structurally
/// independent copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub display_name: String,
    pub status: AgentStatus,
    pub current_task: Option<String>,
    pub latency_ms: u32,
}

impl Agent {
    fn idle(id: AgentId) -> Self {
        Self {
            id,
            display_name: id.display_name().to_string(),
            status: AgentStatus::Idle,
            current_task: None,
            latency_ms: id.latency_ms(),
        }
    }
}

/// Live status of every agent.
///
/// Holds exactly one entry per [`AgentId`]; entries are reset between runs
/// but never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRegistry {
    /// A registry with every agent idle.
    pub fn new() -> Self {
        Self {
            agents: AgentId::ALL.into_iter().map(Agent::idle).collect(),
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    /// Set an agent's status and current task.
    pub(crate) fn set(&mut self, id: AgentId, status: AgentStatus, task: Option<&str>) {
        let agent = &mut self.agents[id.index()];
        agent.status = status;
        agent.current_task = task.map(str::to_string);
    }

    /// Return every agent to idle with no task.
    pub(crate) fn reset(&mut self) {
        for id in AgentId::ALL {
            self.set(id, AgentStatus::Idle, None);
        }
    }

    /// Deep copy of the agent collection.
    pub fn capture(&self) -> Vec<Agent> {
        self.agents.clone()
    }
}
