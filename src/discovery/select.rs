//! Matching policy: prefix filter, exact driver identity, first match wins

use super::candidate::TtyCandidate;

/// Which TTY entries qualify as the CAN adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    /// Only names starting with this are examined
    pub name_prefix: String,
    /// Required first line of `device/uevent`, compared exactly
    pub driver: String,
}

impl MatchRule {
    pub fn new(name_prefix: &str, driver: &str) -> Self {
        Self {
            name_prefix: name_prefix.to_string(),
            driver: driver.to_string(),
        }
    }

    /// Whether the entry is looked at at all
    pub fn considers(&self, candidate: &TtyCandidate) -> bool {
        candidate.name.starts_with(&self.name_prefix)
    }

    pub fn matches(&self, candidate: &TtyCandidate) -> bool {
        self.considers(candidate) && candidate.driver.as_deref() == Some(self.driver.as_str())
    }
}

/// First matching candidate in listing order
pub fn find_device<'a>(candidates: &'a [TtyCandidate], rule: &MatchRule) -> Option<&'a TtyCandidate> {
    candidates.iter().find(|c| rule.matches(c))
}

/// Every matching candidate in listing order
pub fn all_matches<'a>(candidates: &'a [TtyCandidate], rule: &MatchRule) -> Vec<&'a TtyCandidate> {
    candidates.iter().filter(|c| rule.matches(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftdi_rule() -> MatchRule {
        MatchRule::new("ttyUSB", "DRIVER=ftdi_sio")
    }

    #[test]
    fn test_single_match() {
        let candidates = vec![TtyCandidate::new("ttyUSB0", Some("DRIVER=ftdi_sio"))];
        assert_eq!(find_device(&candidates, &ftdi_rule()).unwrap().name, "ttyUSB0");
    }

    #[test]
    fn test_first_in_listing_order_wins() {
        let candidates = vec![
            TtyCandidate::new("ttyUSB3", Some("DRIVER=ftdi_sio")),
            TtyCandidate::new("ttyUSB1", Some("DRIVER=ftdi_sio")),
        ];
        let rule = ftdi_rule();
        assert_eq!(find_device(&candidates, &rule).unwrap().name, "ttyUSB3");
        assert_eq!(all_matches(&candidates, &rule).len(), 2);
    }

    #[test]
    fn test_no_match() {
        let candidates = vec![
            TtyCandidate::new("ttyUSB0", Some("DRIVER=pl2303")),
            TtyCandidate::new("ttyS0", None),
            TtyCandidate::new("tty1", None),
        ];
        assert!(find_device(&candidates, &ftdi_rule()).is_none());
    }

    #[test]
    fn test_prefix_filter_applies_before_driver() {
        let candidates = vec![
            TtyCandidate::new("ttyACM0", Some("DRIVER=ftdi_sio")),
            TtyCandidate::new("ttyUSB0", Some("DRIVER=ftdi_sio")),
        ];
        assert_eq!(find_device(&candidates, &ftdi_rule()).unwrap().name, "ttyUSB0");
    }

    #[test]
    fn test_driver_comparison_is_exact() {
        let candidates = vec![
            TtyCandidate::new("ttyUSB0", Some("DRIVER=ftdi_sio_custom")),
            TtyCandidate::new("ttyUSB1", Some("driver=ftdi_sio")),
        ];
        assert!(find_device(&candidates, &ftdi_rule()).is_none());
    }
}
