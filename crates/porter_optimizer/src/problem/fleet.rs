use crate::problem::agent::{Agent, AgentIdx};

/// The warehouse roster. Always finite: agents are physical machines and
/// people, never an open-ended pool.
#[derive(Debug, Clone)]
pub struct Fleet {
    agents: Vec<Agent>,
}

impl Fleet {
    pub fn new(agents: Vec<Agent>) -> Self {
        Fleet { agents }
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[inline]
    pub fn agent(&self, agent_id: AgentIdx) -> &Agent {
        &self.agents[agent_id]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
