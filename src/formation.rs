/// Parsed tactical shape: unit counts for each line of the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formation {
    pub defenders: u32,
    pub midfielders: u32,
    pub attackers: u32,
}

// The training pipeline was fit with (4,4,2) as the fallback shape, so that
// default is the compatibility-relevant one.
pub const DEFAULT_FORMATION: Formation = Formation {
    defenders: 4,
    midfielders: 4,
    attackers: 2,
};

impl Formation {
    pub const fn new(defenders: u32, midfielders: u32, attackers: u32) -> Self {
        Self {
            defenders,
            midfielders,
            attackers,
        }
    }

    /// Parses a raw formation label such as "4-4-2" or "4-2-3-1".
    ///
    /// Total: any missing or malformed label degrades to `default` instead of
    /// failing. A four-line shape collapses the two middle counts into a
    /// single midfield count.
    pub fn parse(label: Option<&str>, default: Formation) -> Formation {
        let Some(label) = label else {
            return default;
        };
        let label = label.trim();
        if !label.contains('-') {
            return default;
        }
        let parts = label
            .split('-')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>();
        let Ok(parts) = parts else {
            return default;
        };
        match parts.as_slice() {
            [def, mid, att] => Formation::new(*def, *mid, *att),
            [def, mid_a, mid_b, att] => match mid_a.checked_add(*mid_b) {
                Some(mid) => Formation::new(*def, mid, *att),
                None => default,
            },
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_FORMATION, Formation};

    #[test]
    fn parses_three_line_labels() {
        assert_eq!(
            Formation::parse(Some("4-3-3"), DEFAULT_FORMATION),
            Formation::new(4, 3, 3)
        );
        assert_eq!(
            Formation::parse(Some(" 3-5-2 "), DEFAULT_FORMATION),
            Formation::new(3, 5, 2)
        );
    }

    #[test]
    fn collapses_four_line_labels_into_midfield() {
        assert_eq!(
            Formation::parse(Some("4-2-3-1"), DEFAULT_FORMATION),
            Formation::new(4, 5, 1)
        );
        assert_eq!(
            Formation::parse(Some("3-4-2-1"), DEFAULT_FORMATION),
            Formation::new(3, 6, 1)
        );
    }

    #[test]
    fn malformed_labels_fall_back_to_default() {
        for label in [
            Some(""),
            Some("442"),
            Some("4-4-x"),
            Some("4-4"),
            Some("4-4-2-1-0"),
            Some("--"),
            Some("0-4294967295-1-0"),
            None,
        ] {
            assert_eq!(Formation::parse(label, DEFAULT_FORMATION), DEFAULT_FORMATION);
        }
    }

    #[test]
    fn parse_is_pure() {
        let first = Formation::parse(Some("5-3-2"), DEFAULT_FORMATION);
        let second = Formation::parse(Some("5-3-2"), DEFAULT_FORMATION);
        assert_eq!(first, second);
    }
}
