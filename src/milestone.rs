use crate::models::MilestoneView;

pub const MILESTONE_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MilestoneState {
    #[default]
    Idle,
    Celebrating { milestone: u32 },
}

/// Tracks which streak milestones have been celebrated during this process.
///
/// A milestone is a positive multiple of [`MILESTONE_STEP`]. Each value opens
/// the dialog at most once: `highest_shown` only grows, and is reset by
/// constructing a new notifier (i.e. on restart).
#[derive(Debug, Clone, Default)]
pub struct MilestoneNotifier {
    state: MilestoneState,
    highest_shown: u32,
}

impl MilestoneNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the latest streak. Returns true when this call opened the dialog.
    pub fn observe(&mut self, streak: u32) -> bool {
        if !is_milestone(streak) || streak <= self.highest_shown {
            return false;
        }
        self.highest_shown = streak;
        self.state = MilestoneState::Celebrating { milestone: streak };
        true
    }

    pub fn dismiss(&mut self) {
        self.state = MilestoneState::Idle;
    }

    pub fn state(&self) -> MilestoneState {
        self.state
    }

    pub fn highest_shown(&self) -> u32 {
        self.highest_shown
    }

    pub fn view(&self) -> MilestoneView {
        let milestone = match self.state {
            MilestoneState::Idle => None,
            MilestoneState::Celebrating { milestone } => Some(milestone),
        };
        MilestoneView {
            celebrating: milestone.is_some(),
            milestone,
            highest_shown: self.highest_shown,
        }
    }
}

pub fn is_milestone(streak: u32) -> bool {
    streak > 0 && streak % MILESTONE_STEP == 0
}
