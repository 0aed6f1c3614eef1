use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Goal, GoalKind};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("goal title is required")]
    EmptyTitle,
    #[error("goal target must be greater than zero")]
    InvalidTarget,
    #[error("no goal with id {0}")]
    NotFound(Uuid),
}

/// Daily and weekly wellness targets with simple +1/-1 progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalBoard {
    pub goals: Vec<Goal>,
}

impl Default for GoalBoard {
    fn default() -> Self {
        Self {
            goals: vec![
                new_goal(GoalKind::Water, "Daily Water Intake", 8, "glasses"),
                new_goal(GoalKind::Exercise, "Weekly Exercise", 150, "minutes"),
            ],
        }
    }
}

fn new_goal(kind: GoalKind, title: &str, target: u32, unit: &str) -> Goal {
    Goal {
        id: Uuid::new_v4(),
        kind,
        title: title.to_string(),
        target,
        current: 0,
        unit: unit.to_string(),
        completed: false,
    }
}

impl GoalBoard {
    pub fn add(
        &mut self,
        kind: GoalKind,
        title: &str,
        target: u32,
        unit: &str,
    ) -> Result<Uuid, GoalError> {
        if title.trim().is_empty() {
            return Err(GoalError::EmptyTitle);
        }
        if target == 0 {
            return Err(GoalError::InvalidTarget);
        }
        let goal = new_goal(kind, title.trim(), target, unit.trim());
        let id = goal.id;
        self.goals.push(goal);
        Ok(id)
    }

    pub fn increment(&mut self, id: Uuid) -> Result<&Goal, GoalError> {
        let goal = self.find_mut(id)?;
        if goal.current < goal.target {
            goal.current += 1;
        }
        goal.completed = goal.current >= goal.target;
        Ok(goal)
    }

    pub fn decrement(&mut self, id: Uuid) -> Result<&Goal, GoalError> {
        let goal = self.find_mut(id)?;
        goal.current = goal.current.saturating_sub(1);
        goal.completed = goal.current >= goal.target;
        Ok(goal)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<(), GoalError> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        if self.goals.len() == before {
            return Err(GoalError::NotFound(id));
        }
        Ok(())
    }

    fn find_mut(&mut self, id: Uuid) -> Result<&mut Goal, GoalError> {
        self.goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(GoalError::NotFound(id))
    }
}
