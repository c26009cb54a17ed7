use bagit_core::{BagError, Version};
use proptest::prelude::*;

proptest! {
    #[test]
    fn major_minor_round_trips(major in any::<u32>(), minor in any::<u32>()) {
        let parsed = Version::parse(&format!("{major}.{minor}")).unwrap();
        prop_assert_eq!(parsed, Version::new(major, minor));
        prop_assert_eq!(parsed.to_string().parse::<Version>().unwrap(), parsed);
    }

    #[test]
    fn no_separator_always_fails(s in "[^.]*") {
        let is_malformed = matches!(Version::parse(&s), Err(BagError::MalformedVersion { .. }));
        prop_assert!(is_malformed);
    }

    #[test]
    fn ordering_is_lexicographic(a in any::<(u32, u32)>(), b in any::<(u32, u32)>()) {
        prop_assert_eq!(Version::new(a.0, a.1).cmp(&Version::new(b.0, b.1)), a.cmp(&b));
    }
}
