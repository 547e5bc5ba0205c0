/// Which labels currently have the pointer over them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: Vec<bool>,
}

impl HoverState {
    pub fn new(label_count: usize) -> Self {
        Self {
            hovered: vec![false; label_count],
        }
    }

    /// Resizes for a new set of labels, forgetting every previous hover.
    pub fn reset(&mut self, label_count: usize) {
        self.hovered.clear();
        self.hovered.resize(label_count, false);
    }

    /// Returns `false` if `label` is not one of the tracked labels.
    pub fn set(&mut self, label: usize, hovered: bool) -> bool {
        match self.hovered.get_mut(label) {
            Some(slot) => {
                *slot = hovered;
                true
            }
            None => false,
        }
    }

    pub fn is_hovered(&self, label: usize) -> bool {
        self.hovered.get(label).copied().unwrap_or(false)
    }

    pub fn any_hovered(&self) -> bool {
        self.hovered.iter().any(|h| *h)
    }

    pub fn len(&self) -> usize {
        self.hovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hovered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_each_label() {
        let mut hover = HoverState::new(3);
        assert!(!hover.any_hovered());
        assert!(hover.set(1, true));
        assert!(hover.is_hovered(1));
        assert!(!hover.is_hovered(0));
        assert!(hover.any_hovered());
        assert!(hover.set(2, true));
        assert!(hover.set(1, false));
        assert!(hover.any_hovered());
        assert!(hover.set(2, false));
        assert!(!hover.any_hovered());
    }

    #[test]
    fn unknown_label_is_ignored() {
        let mut hover = HoverState::new(2);
        assert!(!hover.set(2, true));
        assert!(!hover.any_hovered());
        assert!(!hover.is_hovered(7));
    }

    #[test]
    fn reset_clears_hover() {
        let mut hover = HoverState::new(2);
        hover.set(0, true);
        hover.reset(4);
        assert_eq!(hover.len(), 4);
        assert!(!hover.any_hovered());
        hover.reset(0);
        assert!(hover.is_empty());
    }
}
