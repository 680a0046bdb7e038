//! Degree-of-freedom identifiers.
//!
//! Each DOF is a mutually exclusive resource: at most one task with a
//! given `Dof` may be executing at any integer instant. [`Dof::ALL`]
//! fixes both the iteration and the Gantt rendering order.

use std::fmt;

/// One independent mechanical axis of the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dof {
    /// Feed axis (main linear drive).
    Fz,
    /// Pipe carousel.
    Sr,
    /// Manipulator arm (store/retrieve).
    Me,
    /// Manipulator gripper.
    Mg,
    /// Manipulator arm (retract/assist).
    Mr,
    /// Upper clamp (lock/unlock).
    Dh,
    /// Power head spin.
    Pr,
    /// Lower clamp.
    Cb,
}

impl Dof {
    /// All DOFs in fixed rendering/iteration order.
    pub const ALL: [Dof; 8] = [
        Dof::Fz,
        Dof::Sr,
        Dof::Me,
        Dof::Mg,
        Dof::Mr,
        Dof::Dh,
        Dof::Pr,
        Dof::Cb,
    ];

    /// Short display name, as used in task names and the Gantt legend.
    pub const fn name(self) -> &'static str {
        match self {
            Dof::Fz => "Fz",
            Dof::Sr => "Sr",
            Dof::Me => "Me",
            Dof::Mg => "Mg",
            Dof::Mr => "Mr",
            Dof::Dh => "Dh",
            Dof::Pr => "Pr",
            Dof::Cb => "Cb",
        }
    }
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_dofs_have_distinct_names() {
        let mut names: Vec<&str> = Dof::ALL.iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Dof::ALL.len());
    }
}
