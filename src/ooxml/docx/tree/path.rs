/// Location of a node inside a part, used in error reports.
///
/// Paths are written as slash-separated steps, each a short node label and
/// the index among its siblings: `body/tbl[0]/tr[2]/tc[1]/p[0]/r[3]`.
use smallvec::SmallVec;
use std::fmt;

/// One step of a [`NodePath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathStep {
    /// Node label (`p`, `r`, `tbl`, `tr`, `tc`, `sdt`, `ins`, ...)
    pub label: &'static str,
    /// Index among the parent's children
    pub index: usize,
}

/// Path from the part root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    steps: SmallVec<[PathStep; 8]>,
}

impl NodePath {
    /// The part root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path by one step.
    pub fn child(&self, label: &'static str, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep { label, index });
        Self { steps }
    }

    /// Steps from the root.
    #[inline]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Depth of the node.
    #[inline]
    pub fn depth(&self) -> usize {
        self.steps.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "/");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}[{}]", step.label, step.index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = NodePath::root().child("tbl", 0).child("tr", 2).child("tc", 1);
        assert_eq!(path.to_string(), "tbl[0]/tr[2]/tc[1]");
        assert_eq!(path.depth(), 3);
        assert_eq!(NodePath::root().to_string(), "/");
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = NodePath::root().child("p", 4);
        let _ = parent.child("r", 0);
        assert_eq!(parent.depth(), 1);
    }
}
