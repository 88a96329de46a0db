//! Named muscle groups.

use crate::muscle::Muscle;

/// A named container of muscles sharing an origin/insertion segment pair.
#[derive(Debug, Clone)]
pub struct MuscleGroup {
    name: String,
    origin_segment: String,
    insertion_segment: String,
    muscles: Vec<Muscle>,
}

impl MuscleGroup {
    /// Create an empty group.
    pub fn new(name: &str, origin_segment: &str, insertion_segment: &str) -> Self {
        Self {
            name: name.to_string(),
            origin_segment: origin_segment.to_string(),
            insertion_segment: insertion_segment.to_string(),
            muscles: Vec::new(),
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the origin segment shared by the group.
    pub fn origin_segment(&self) -> &str {
        &self.origin_segment
    }

    /// Name of the insertion segment shared by the group.
    pub fn insertion_segment(&self) -> &str {
        &self.insertion_segment
    }

    /// Append a muscle to the group.
    pub fn add_muscle(&mut self, muscle: Muscle) {
        self.muscles.push(muscle);
    }

    /// Number of muscles in the group.
    pub fn nb_muscles(&self) -> usize {
        self.muscles.len()
    }

    /// Muscles of the group, in insertion order.
    pub fn muscles(&self) -> &[Muscle] {
        &self.muscles
    }

    /// Mutable access to the muscles.
    pub fn muscles_mut(&mut self) -> &mut [Muscle] {
        &mut self.muscles
    }

    /// Muscle at `idx`. Panics if the index is out of range.
    pub fn muscle(&self, idx: usize) -> &Muscle {
        assert!(
            idx < self.muscles.len(),
            "muscle index {} out of range in group {:?} ({} muscles)",
            idx,
            self.name,
            self.muscles.len()
        );
        &self.muscles[idx]
    }

    /// Mutable muscle at `idx`. Panics if the index is out of range.
    pub fn muscle_mut(&mut self, idx: usize) -> &mut Muscle {
        assert!(
            idx < self.muscles.len(),
            "muscle index {} out of range in group {:?} ({} muscles)",
            idx,
            self.name,
            self.muscles.len()
        );
        &mut self.muscles[idx]
    }
}
