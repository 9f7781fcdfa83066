use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Response quota granted to a new free-plan organization.
pub const DEFAULT_ALLOWED_RESPONSES: i64 = 10;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    FreeTrialOver,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::FreeTrialOver => "free_trial_over",
        }
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "free_trial_over" => Ok(Plan::FreeTrialOver),
            other => Err(format!("unknown plan '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub plan: Plan,
    pub allowed_responses_count: i64,
}

impl Organization {
    pub fn new_free(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            image_url: None,
            plan: Plan::Free,
            allowed_responses_count: DEFAULT_ALLOWED_RESPONSES,
        }
    }

    pub fn apply(&mut self, patch: OrganizationPatch) {
        if let Some(v) = patch.name {
            self.name = Some(v);
        }
        if let Some(v) = patch.image_url {
            self.image_url = Some(v);
        }
        if let Some(v) = patch.plan {
            self.plan = v;
        }
        if let Some(v) = patch.allowed_responses_count {
            self.allowed_responses_count = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationPatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub plan: Option<Plan>,
    pub allowed_responses_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_round_trips_through_str() {
        for plan in [Plan::Free, Plan::Pro, Plan::FreeTrialOver] {
            assert_eq!(plan.as_str().parse::<Plan>().unwrap(), plan);
        }
        assert!("enterprise".parse::<Plan>().is_err());
    }

    #[test]
    fn test_plan_wire_format() {
        let json = serde_json::to_string(&Plan::FreeTrialOver).unwrap();
        assert_eq!(json, r#""free_trial_over""#);
    }
}
