//! Flag evaluation policy.
//!
//! Pure functions deciding whether a flag is active for a user. The policy
//! is, in order: disabled short-circuit, explicit target match, then a
//! deterministic percentage rollout over a hash of the user id.

use crate::models::{EvaluationReason, EvaluationResult, Flag};

/// Folds a user id into a rollout bucket in `0..100`.
///
/// The fold is `hash = (hash * 31 + codepoint) % 100` over the characters
/// left to right, starting at 0. Multiplier 31 and modulus 100 are contract
/// values: independent implementations must agree on which users land in
/// which bucket, and raising a flag's percentage must only ever add users
/// (bucket membership is monotone in the threshold).
pub fn rollout_bucket(user_id: &str) -> i32 {
    let mut hash: u32 = 0;
    for c in user_id.chars() {
        hash = (hash.wrapping_mul(31).wrapping_add(c as u32)) % 100;
    }
    hash as i32
}

/// Tests case-insensitive membership of `user_id` in a comma-separated
/// target list. Entries are trimmed; empty entries are ignored.
pub fn is_targeted(target_user_ids: &str, user_id: &str) -> bool {
    let needle = user_id.to_lowercase();
    target_user_ids
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .any(|entry| entry.to_lowercase() == needle)
}

/// Evaluates a flag snapshot for a user.
///
/// A target match overrides the rollout percentage in the include direction
/// only: a targeted user is enabled even at 0% rollout, and there is no
/// mechanism to exclude a user from an otherwise-matching rollout.
pub fn evaluate(flag: &Flag, user_id: &str) -> EvaluationResult {
    if !flag.enabled {
        return EvaluationResult::new(&flag.name, false, EvaluationReason::Disabled);
    }

    if let Some(targets) = flag.target_user_ids.as_deref() {
        if !targets.trim().is_empty() && is_targeted(targets, user_id) {
            return EvaluationResult::new(&flag.name, true, EvaluationReason::Targeted);
        }
    }

    if rollout_bucket(user_id) < flag.rollout_percentage {
        EvaluationResult::new(&flag.name, true, EvaluationReason::RolloutMatch)
    } else {
        EvaluationResult::new(&flag.name, false, EvaluationReason::NotInRollout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_flag(enabled: bool, rollout: i32, targets: Option<&str>) -> Flag {
        Flag {
            id: 1,
            name: "Beta".to_string(),
            key: "beta".to_string(),
            enabled,
            rollout_percentage: rollout,
            target_user_ids: targets.map(|t| t.to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rollout_bucket_known_values() {
        // Hand-computed folds over ASCII code points.
        assert_eq!(rollout_bucket("alice"), 40);
        assert_eq!(rollout_bucket("bob"), 17);
        assert_eq!(rollout_bucket("charlie"), 78);
        assert_eq!(rollout_bucket(""), 0);
    }

    #[test]
    fn test_rollout_bucket_deterministic() {
        for user in ["alice", "bob", "user-12345", "日本語ユーザー"] {
            assert_eq!(rollout_bucket(user), rollout_bucket(user));
        }
    }

    #[test]
    fn test_rollout_bucket_in_range() {
        for i in 0..500 {
            let bucket = rollout_bucket(&format!("user-{}", i));
            assert!((0..100).contains(&bucket), "bucket out of range: {}", bucket);
        }
    }

    #[test]
    fn test_rollout_monotonic_in_percentage() {
        // Anyone included at P1 stays included at every P2 > P1.
        let users: Vec<String> = (0..100).map(|i| format!("user-{}", i)).collect();
        let included_at = |p: i32| -> Vec<bool> {
            let flag = test_flag(true, p, None);
            users.iter().map(|u| evaluate(&flag, u).enabled).collect()
        };

        let mut previous = included_at(0);
        assert!(previous.iter().all(|included| !included));
        for p in 1..=100 {
            let current = included_at(p);
            for (was_in, now_in) in previous.iter().zip(&current) {
                assert!(*now_in || !*was_in, "user dropped out when raising rollout to {}", p);
            }
            previous = current;
        }
        assert!(previous.iter().all(|included| *included));
    }

    #[test]
    fn test_disabled_short_circuits_everything() {
        let flag = test_flag(false, 100, Some("alice"));
        let result = evaluate(&flag, "alice");
        assert!(!result.enabled);
        assert_eq!(result.reason, EvaluationReason::Disabled);
        assert_eq!(result.feature, "Beta");
    }

    #[test]
    fn test_targeted_overrides_zero_rollout() {
        let flag = test_flag(true, 0, Some("alice,bob"));
        let result = evaluate(&flag, "alice");
        assert!(result.enabled);
        assert_eq!(result.reason, EvaluationReason::Targeted);
    }

    #[test]
    fn test_target_membership_case_insensitive() {
        let flag = test_flag(true, 0, Some("Alice, BOB"));
        assert_eq!(evaluate(&flag, "alice").reason, EvaluationReason::Targeted);
        assert_eq!(evaluate(&flag, "bob").reason, EvaluationReason::Targeted);
        assert_eq!(evaluate(&flag, "ALICE").reason, EvaluationReason::Targeted);
    }

    #[test]
    fn test_target_list_trims_and_drops_empty_entries() {
        assert!(is_targeted(" alice , ,bob,, ", "bob"));
        assert!(is_targeted(" alice , ,bob,, ", "alice"));
        assert!(!is_targeted(" alice , ,bob,, ", ""));
        assert!(!is_targeted(",,,", "alice"));
    }

    #[test]
    fn test_non_targeted_user_falls_through_to_rollout() {
        // charlie's bucket is 78, below a 100% rollout.
        let flag = test_flag(true, 100, Some("alice"));
        let result = evaluate(&flag, "charlie");
        assert!(result.enabled);
        assert_eq!(result.reason, EvaluationReason::RolloutMatch);
    }

    #[test]
    fn test_fifty_percent_rollout_splits_by_bucket() {
        let flag = test_flag(true, 50, None);

        // alice: bucket 40 < 50
        let result = evaluate(&flag, "alice");
        assert!(result.enabled);
        assert_eq!(result.reason, EvaluationReason::RolloutMatch);

        // charlie: bucket 78 >= 50
        let result = evaluate(&flag, "charlie");
        assert!(!result.enabled);
        assert_eq!(result.reason, EvaluationReason::NotInRollout);
    }

    #[test]
    fn test_zero_rollout_excludes_everyone() {
        let flag = test_flag(true, 0, None);
        for user in ["alice", "bob", "charlie", ""] {
            let result = evaluate(&flag, user);
            assert!(!result.enabled);
            assert_eq!(result.reason, EvaluationReason::NotInRollout);
        }
    }

    #[test]
    fn test_full_rollout_includes_everyone() {
        let flag = test_flag(true, 100, None);
        for i in 0..100 {
            let result = evaluate(&flag, &format!("user-{}", i));
            assert!(result.enabled);
            assert_eq!(result.reason, EvaluationReason::RolloutMatch);
        }
    }

    #[test]
    fn test_blank_target_list_is_ignored() {
        let flag = test_flag(true, 100, Some("   "));
        let result = evaluate(&flag, "alice");
        assert_eq!(result.reason, EvaluationReason::RolloutMatch);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let flag = test_flag(true, 50, Some("alice"));
        let first = evaluate(&flag, "bob");
        for _ in 0..10 {
            assert_eq!(evaluate(&flag, "bob"), first);
        }
    }
}
