//! Validation gate
//!
//! Runs before any merge: a stage's answers reach the record only when every
//! question in the active set holds a real answer.

use crate::catalog::QuestionSet;
use crate::error::ValidationError;
use crate::record::StageAnswers;

/// Check `answers` against every question in `set`.
///
/// A question is unanswered when its key is absent or its value equals the
/// question's sentinel. A choice value outside the option list is invalid.
/// Keys that do not belong to `set` are ignored.
///
/// # Errors
/// Returns [`ValidationError`] listing unanswered and invalid keys in
/// display order.
pub fn check(set: &QuestionSet, answers: &StageAnswers) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    let mut invalid = Vec::new();

    for question in set.questions {
        match answers.get(question.key) {
            None => missing.push(question.key.to_string()),
            Some(value) if question.is_sentinel(value) => missing.push(question.key.to_string()),
            Some(value) if !question.accepts(value) => invalid.push(question.key.to_string()),
            Some(_) => {}
        }
    }

    if missing.is_empty() && invalid.is_empty() {
        tracing::debug!("Gate passed for stage {}", set.stage);
        Ok(())
    } else {
        tracing::debug!(
            "Gate failed for stage {}: missing={:?} invalid={:?}",
            set.stage,
            missing,
            invalid
        );
        Err(ValidationError {
            stage: set.stage,
            missing,
            invalid,
        })
    }
}

/// Answers pre-filled with every question's sentinel, the state of a fresh form
#[must_use]
pub fn blank_form(set: &QuestionSet) -> StageAnswers {
    set.questions.iter().map(|q| (q.key, q.sentinel())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{all_sets, question_set, Input};
    use crate::stage::Stage;
    use proptest::prelude::*;

    fn first_options(set: &QuestionSet) -> StageAnswers {
        set.questions
            .iter()
            .map(|q| match q.input {
                Input::Choice { options, .. } => (q.key, options[0]),
                Input::Text => (q.key, "REG-7"),
            })
            .collect()
    }

    #[test]
    fn fresh_form_fails_with_every_key_missing() {
        let set = question_set(Stage::Basics).unwrap();
        let err = check(set, &blank_form(set)).unwrap_err();
        assert_eq!(err.missing, ["Registration Code", "Age Group", "Gender", "KK Number"]);
        assert!(err.invalid.is_empty());
    }

    #[test]
    fn complete_answers_pass() {
        for set in all_sets() {
            assert!(check(set, &first_options(set)).is_ok(), "stage {}", set.stage);
        }
    }

    #[test]
    fn absent_key_counts_as_missing() {
        let set = question_set(Stage::OwnershipGate).unwrap();
        let err = check(set, &StageAnswers::new()).unwrap_err();
        assert_eq!(err.missing, ["Running Business"]);
    }

    #[test]
    fn unknown_option_is_invalid() {
        let set = question_set(Stage::OwnershipGate).unwrap();
        let err = check(set, &StageAnswers::new().with("Running Business", "Maybe")).unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(err.invalid, ["Running Business"]);
    }

    #[test]
    fn sentinel_is_compared_by_equality_not_prefix() {
        // "Select" is the compliance sentinel; a longer value starting with it is
        // simply not an option.
        let set = question_set(Stage::OwnerCompliance).unwrap();
        let mut answers = first_options(set);
        answers.set("Fire Safety", "Selective");
        let err = check(set, &answers).unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(err.invalid, ["Fire Safety"]);
    }

    #[test]
    fn extra_keys_are_ignored() {
        let set = question_set(Stage::OwnershipGate).unwrap();
        let answers = StageAnswers::new()
            .with("Running Business", "No")
            .with("fe1", "Other");
        assert!(check(set, &answers).is_ok());
    }

    proptest! {
        #[test]
        fn prop_gate_fails_iff_some_question_is_at_sentinel(
            stage_idx in 0usize..6,
            mask in prop::collection::vec(any::<bool>(), 18),
        ) {
            let set = all_sets()[stage_idx];
            let mut answers = first_options(set);
            let mut expected_missing = Vec::new();
            for (q, blank) in set.questions.iter().zip(mask.iter()) {
                if *blank {
                    answers.set(q.key, q.sentinel());
                    expected_missing.push(q.key.to_string());
                }
            }

            match check(set, &answers) {
                Ok(()) => prop_assert!(expected_missing.is_empty()),
                Err(err) => prop_assert_eq!(err.missing, expected_missing),
            }
        }
    }
}
