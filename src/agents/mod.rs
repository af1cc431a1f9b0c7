//! Language-model analysts
//!
//! An agent is a fixed persona plus a task prompt. There is no agent
//! runtime: each recommendation is a single completion call.

pub mod format;
pub mod recommendation;

pub use recommendation::RecommendationAgents;

/// Persona rendered into the system prompt of a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub expected_output: &'static str,
}

impl AgentProfile {
    #[must_use]
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {}.\nYour goal: {}\nBackground: {}\nExpected output: {}",
            self.role, self.goal, self.backstory, self.expected_output
        )
    }
}

pub const FLIGHT_ANALYST: AgentProfile = AgentProfile {
    role: "AI Flight Analyst",
    goal: "Recommend the best flight by assessing price, duration, stops, and convenience.",
    backstory: "An AI specialist that performs detailed comparisons of flight options across multiple criteria.",
    expected_output: "A concise, data-driven recommendation highlighting the top flights selection according to the analyzed details.",
};

pub const HOTEL_ANALYST: AgentProfile = AgentProfile {
    role: "AI Hotel Analyst",
    goal: "Analyze hotel options and recommend the best one by considering price, rating, location and amenities.",
    backstory: "AI expert which provides in-depth analysis in comparing hotel options based on multiple factors.",
    expected_output: "A concise, data-driven recommendation highlighting the top hotels selection according to the analyzed details.",
};

pub const TRAVEL_PLANNER: AgentProfile = AgentProfile {
    role: "AI Travel Planner",
    goal: "Generate a full itinerary for the traveler, incorporating both flight schedules and hotel accommodations.",
    backstory: "AI-driven itinerary planner offering an optimized daily plan including travel logistics, accommodation, and key experiences.",
    expected_output: "A Markdown itinerary with one '## Day N: title' section per day and bullet-point activities.",
};
