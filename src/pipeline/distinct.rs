/// Distinct-until-changed filter.
///
/// Suppresses a candidate that equals the last value it forwarded; the first
/// candidate always passes.
#[derive(Debug, Default)]
pub struct Distinct<T> {
    last: Option<T>,
}

impl<T: PartialEq> Distinct<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Returns true when `candidate` differs from the last forwarded value,
    /// recording it as the new last value.
    pub fn admit(&mut self, candidate: T) -> bool {
        if self.last.as_ref() == Some(&candidate) {
            return false;
        }
        self.last = Some(candidate);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_always_passes() {
        let mut filter = Distinct::new();
        assert!(filter.admit("shirt"));
    }

    #[test]
    fn consecutive_duplicates_are_suppressed() {
        let mut filter = Distinct::new();
        assert!(filter.admit(("shirt", 1, 20)));
        assert!(!filter.admit(("shirt", 1, 20)));
        assert!(filter.admit(("shirt", 2, 20)));
        // Non-consecutive repeats pass again.
        assert!(filter.admit(("shirt", 1, 20)));
    }

    #[test]
    fn reset_forgets_the_last_value() {
        let mut filter = Distinct::new();
        assert!(filter.admit(1));
        filter.reset();
        assert!(filter.admit(1));
    }
}
