//! Camera angle selector.
//!
//! A row of mutually exclusive camera angles; selecting one deactivates the
//! rest. The first angle is active initially.

use crate::error::CoreError;

/// Angles offered when the page does not configure its own.
pub const DEFAULT_ANGLES: &[&str] = &["Top", "Side", "Player"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AngleSelector {
    angles: Vec<String>,
    active: usize,
}

impl AngleSelector {
    pub fn new<I, S>(angles: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let angles: Vec<String> = angles.into_iter().map(Into::into).collect();
        if angles.is_empty() {
            return Err(CoreError::Validation(
                "At least one camera angle is required".into(),
            ));
        }
        Ok(Self { angles, active: 0 })
    }

    /// Activate `name`, deactivating every other angle.
    pub fn select(&mut self, name: &str) -> Result<(), CoreError> {
        let index = self
            .angles
            .iter()
            .position(|a| a == name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown camera angle '{name}'")))?;
        self.active = index;
        Ok(())
    }

    pub fn active(&self) -> &str {
        &self.angles[self.active]
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active() == name
    }

    pub fn angles(&self) -> &[String] {
        &self.angles
    }
}

impl Default for AngleSelector {
    fn default() -> Self {
        Self {
            angles: DEFAULT_ANGLES.iter().map(|a| a.to_string()).collect(),
            active: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn first_angle_starts_active() {
        let selector = AngleSelector::default();
        assert_eq!(selector.active(), "Top");
    }

    #[test]
    fn selecting_one_deactivates_the_rest() {
        let mut selector = AngleSelector::default();
        selector.select("Side").expect("known angle");

        let active: Vec<_> = selector
            .angles()
            .iter()
            .filter(|a| selector.is_active(a))
            .collect();
        assert_eq!(active, ["Side"]);
    }

    #[test]
    fn unknown_angle_is_rejected_and_keeps_state() {
        let mut selector = AngleSelector::default();
        assert_matches!(selector.select("Drone"), Err(CoreError::Validation(_)));
        assert_eq!(selector.active(), "Top");
    }

    #[test]
    fn empty_selector_is_rejected() {
        assert_matches!(
            AngleSelector::new(Vec::<String>::new()),
            Err(CoreError::Validation(_))
        );
    }
}
