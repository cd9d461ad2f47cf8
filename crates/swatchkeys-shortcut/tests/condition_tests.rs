use std::collections::HashMap;

use swatchkeys_shortcut::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn context(flags: &[(&str, bool)]) -> HashMap<String, bool> {
        flags
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_parse_terms() {
        let condition = Condition::parse(" editing && ! readonly &&  && focused ");
        assert_eq!(
            condition.terms(),
            &[
                ConditionTerm {
                    negated: false,
                    field: "editing".to_string()
                },
                ConditionTerm {
                    negated: true,
                    field: "readonly".to_string()
                },
                ConditionTerm {
                    negated: false,
                    field: "focused".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_evaluate_conjunction() {
        let condition = Condition::parse("editing && !readonly");
        assert!(condition.evaluate(&context(&[("editing", true), ("readonly", false)])));
        assert!(condition.evaluate(&context(&[("editing", true)])));
        assert!(!condition.evaluate(&context(&[("editing", true), ("readonly", true)])));
        assert!(!condition.evaluate(&context(&[])));
    }

    #[test]
    fn test_empty_condition_is_true() {
        assert!(Condition::parse("").evaluate(&context(&[])));
        assert!(Condition::parse(" && ").evaluate(&context(&[])));
    }

    #[test]
    fn test_cache_ref_counting() {
        let mut evaluator = ConditionEvaluator::new();
        evaluator.acquire("editing");
        evaluator.acquire("editing");
        evaluator.acquire("!editing");
        assert_eq!(evaluator.len(), 2);
        assert_eq!(evaluator.ref_count("editing"), 2);

        evaluator.release("editing");
        assert_eq!(evaluator.ref_count("editing"), 1);
        evaluator.release("editing");
        assert_eq!(evaluator.ref_count("editing"), 0);
        assert_eq!(evaluator.len(), 1);

        // Releasing an unknown expression does nothing
        evaluator.release("unknown");
        assert_eq!(evaluator.len(), 1);
    }

    #[test]
    fn test_set_flag_reevaluates_cache() {
        let mut evaluator = ConditionEvaluator::new();
        evaluator.acquire("editing");
        evaluator.acquire("!editing");
        assert!(!evaluator.is_satisfied("editing"));
        assert!(evaluator.is_satisfied("!editing"));

        evaluator.set_flag("editing", true);
        assert!(evaluator.is_satisfied("editing"));
        assert!(!evaluator.is_satisfied("!editing"));
        assert_eq!(evaluator.flag("editing"), Some(true));
        assert_eq!(evaluator.flag("other"), None);
    }

    #[test]
    fn test_new_entry_sees_current_context() {
        let mut evaluator = ConditionEvaluator::new();
        evaluator.set_flag("drawing", true);
        evaluator.acquire("drawing");
        assert!(evaluator.is_satisfied("drawing"));
    }

    #[test]
    fn test_uncached_expression_is_satisfied() {
        let evaluator = ConditionEvaluator::new();
        assert!(evaluator.is_satisfied("anything"));
    }
}
