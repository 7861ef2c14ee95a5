//! Core identifier types for the `ConflictRetry` library.
//!
//! All types use smart constructors to ensure validity at construction time,
//! following the "parse, don't validate" principle. Once constructed, a value
//! is always valid - no further validation is needed downstream.

use nutype::nutype;

/// An identifier naming a category of failure.
///
/// Failure kinds replace exception-class hierarchies with explicit tags:
/// a kind is just a name, and any "is a more specific form of" relationship
/// between kinds is declared separately in a
/// [`KindTaxonomy`](crate::taxonomy::KindTaxonomy).
///
/// `FailureKind` values are guaranteed to be non-empty and at most
/// 128 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct FailureKind(String);

/// The logical identity of a protected operation.
///
/// Used as the key under which a retry policy is registered in a
/// [`PolicyRegistry`](crate::registry::PolicyRegistry). Guaranteed to be
/// non-empty and at most 255 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct OperationId(String);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn failure_kind_accepts_valid_strings(s in "[a-zA-Z0-9_-]{1,128}") {
            let result = FailureKind::try_new(s.clone());
            prop_assert!(result.is_ok());
            let kind = result.unwrap();
            prop_assert_eq!(kind.as_ref(), &s);
        }

        #[test]
        fn failure_kind_trims_whitespace(s in " {0,5}[a-zA-Z0-9_-]{1,100} {0,5}") {
            let result = FailureKind::try_new(s.clone());
            prop_assert!(result.is_ok());
            let kind = result.unwrap();
            prop_assert_eq!(kind.as_ref(), s.trim());
        }

        #[test]
        fn failure_kind_rejects_blank_strings(s in " {0,20}") {
            prop_assert!(FailureKind::try_new(s).is_err());
        }

        #[test]
        fn failure_kind_roundtrip_serialization(s in "[a-zA-Z0-9_-]{1,128}") {
            let kind = FailureKind::try_new(s).unwrap();
            let json = serde_json::to_string(&kind).unwrap();
            let deserialized: FailureKind = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(kind, deserialized);
        }

        #[test]
        fn operation_id_accepts_valid_strings(s in "[a-zA-Z0-9_.:-]{1,255}") {
            let result = OperationId::try_new(s.clone());
            prop_assert!(result.is_ok());
            let id = result.unwrap();
            prop_assert_eq!(id.as_ref(), &s);
        }

        #[test]
        fn operation_id_rejects_strings_over_255_chars(s in "[a-zA-Z0-9]{256,400}") {
            prop_assert!(OperationId::try_new(s).is_err());
        }
    }

    #[test]
    fn failure_kind_rejects_specific_invalid_cases() {
        assert!(FailureKind::try_new("").is_err());
        assert!(FailureKind::try_new("   ").is_err());
        assert!(FailureKind::try_new("\t\n").is_err());

        let long_string = "a".repeat(129);
        assert!(FailureKind::try_new(long_string).is_err());

        let max_string = "a".repeat(128);
        assert!(FailureKind::try_new(max_string).is_ok());
    }

    #[test]
    fn operation_id_rejects_empty_strings() {
        assert!(OperationId::try_new("").is_err());
        assert!(OperationId::try_new("  ").is_err());
    }

    #[test]
    fn failure_kind_display_shows_raw_value() {
        let kind = FailureKind::try_new("optimistic-lock-conflict").unwrap();
        assert_eq!(kind.to_string(), "optimistic-lock-conflict");
    }
}
