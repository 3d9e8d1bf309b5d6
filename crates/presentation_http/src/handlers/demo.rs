//! Canned reservations for trying the API from a frontend

use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemoScenario {
    pub name: &'static str,
    pub customer_name: &'static str,
    pub special_request_text: &'static str,
    pub dietary_preferences: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DemoScenariosResponse {
    pub scenarios: &'static [DemoScenario],
}

pub const DEMO_SCENARIOS: [DemoScenario; 6] = [
    DemoScenario {
        name: "VIP Anniversary Dinner",
        customer_name: "James & Claire Whitfield",
        special_request_text: "This is our 25th wedding anniversary. We are VIP members. Please arrange a window table with a cake and champagne.",
        dietary_preferences: "No specific dietary restrictions",
    },
    DemoScenario {
        name: "Severe Allergy Alert",
        customer_name: "Maria Santos",
        special_request_text: "My daughter has a severe nut allergy and carries an epipen. Please ensure absolutely no cross-contamination. This is life-threatening.",
        dietary_preferences: "Nut-free, dairy-free",
    },
    DemoScenario {
        name: "Celebrity Birthday",
        customer_name: "Alex Rivera",
        special_request_text: "Birthday celebration for a celebrity guest. Need private dining area. They are a frequent visitor. Please keep it discreet.",
        dietary_preferences: "Pescatarian, gluten-free",
    },
    DemoScenario {
        name: "Simple Vegetarian Request",
        customer_name: "Priya Sharma",
        special_request_text: "First time visiting. Would love a quiet corner table if possible.",
        dietary_preferences: "Vegetarian, no onion or garlic",
    },
    DemoScenario {
        name: "No-Show Warning Guest",
        customer_name: "David Chen",
        special_request_text: "Previous no-show customer returning. Has been flagged before. Requesting specific table near the bar.",
        dietary_preferences: "Non-vegetarian, lactose intolerant",
    },
    DemoScenario {
        name: "Medical Emergency Risk",
        customer_name: "Sarah Al-Rashidi",
        special_request_text: "Guest has celiac disease and anaphylaxis risk with shellfish. Medical alert bracelet carrier. Emergency contact must be kept on file.",
        dietary_preferences: "Strict gluten-free, no shellfish, halal",
    },
];

pub async fn get_demo_scenarios() -> Json<DemoScenariosResponse> {
    Json(DemoScenariosResponse {
        scenarios: &DEMO_SCENARIOS,
    })
}

#[cfg(test)]
mod tests {
    use application::FallbackTagger;

    use super::*;

    #[test]
    fn urgent_scenarios_are_flagged_by_keyword_rules() {
        let tagger = FallbackTagger::new();
        let urgent: Vec<_> = DEMO_SCENARIOS
            .iter()
            .filter(|s| {
                tagger
                    .tag(s.special_request_text, s.dietary_preferences)
                    .is_urgent()
            })
            .map(|s| s.name)
            .collect();

        assert_eq!(urgent, ["Severe Allergy Alert", "Medical Emergency Risk"]);
    }
}
