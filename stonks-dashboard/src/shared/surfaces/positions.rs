use super::ViewSurface;
use crate::shared::types::Position;

/// Holdings table, always shown in ascending name order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionsSurface {
    positions: Vec<Position>,
}

impl PositionsSurface {
    pub fn set_positions(&mut self, positions: Vec<Position>) {
        self.positions = positions;
    }

    /// Sorted at read time; stable and case-sensitive
    pub fn sorted(&self) -> Vec<&Position> {
        let mut sorted: Vec<&Position> = self.positions.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl ViewSurface for PositionsSurface {
    type Update = Vec<Position>;

    fn update(&mut self, update: Vec<Position>) {
        self.set_positions(update);
    }
}
