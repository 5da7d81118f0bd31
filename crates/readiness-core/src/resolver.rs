//! Stage resolver
//!
//! Pure transition function over (stage, classification, validated answers).
//! Classification is derived only when leaving stage 1 or 1.5; every later
//! transition passes it through untouched.

use crate::catalog::{self, AGE_GROUP_KEY, BELOW_18, NO, OWNERSHIP_KEY, YES};
use crate::error::ResolveError;
use crate::record::StageAnswers;
use crate::stage::{Classification, Stage};

/// Result of a forward transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Stage to move to
    pub next: Stage,
    /// Classification after the transition
    pub classification: Classification,
    /// Answers to merge into the record
    pub merge: StageAnswers,
}

/// Compute the forward transition out of `stage`.
///
/// `answers` must already have passed the validation gate for `stage`.
/// Only keys belonging to the stage's question set are returned for merging,
/// and none for the ownership gate, whose answer only routes.
///
/// # Errors
/// - [`ResolveError::Terminal`] when called on the terminal stage
/// - [`ResolveError::ClassificationMismatch`] when the stage belongs to another branch
/// - [`ResolveError::UnexpectedAnswer`] when a routing answer is absent or unknown
pub fn resolve(
    stage: Stage,
    classification: Classification,
    answers: &StageAnswers,
) -> Result<Transition, ResolveError> {
    let set = catalog::question_set(stage).ok_or(ResolveError::Terminal)?;

    if let Some(required) = stage.required_classification() {
        if required != classification {
            return Err(ResolveError::ClassificationMismatch {
                stage,
                required,
                actual: classification,
            });
        }
    }

    let (next, classification) = match stage {
        Stage::Basics => {
            if routing_answer(answers, AGE_GROUP_KEY)? == BELOW_18 {
                (Stage::FutureAssessment, Classification::Future)
            } else {
                (Stage::OwnershipGate, classification)
            }
        }
        Stage::OwnershipGate => match routing_answer(answers, OWNERSHIP_KEY)? {
            YES => (Stage::OwnerProfile, Classification::Owner),
            NO => (Stage::StarterAssessment, Classification::Starter),
            other => {
                return Err(ResolveError::UnexpectedAnswer {
                    key: OWNERSHIP_KEY.to_string(),
                    value: Some(other.to_string()),
                })
            }
        },
        Stage::FutureAssessment | Stage::StarterAssessment | Stage::OwnerCompliance => {
            (Stage::Complete, classification)
        }
        Stage::OwnerProfile => (Stage::OwnerCompliance, classification),
        Stage::Complete => return Err(ResolveError::Terminal),
    };

    let merge = if set.records_answers {
        set.keys()
            .filter_map(|key| answers.get(key).map(|value| (key, value)))
            .collect()
    } else {
        StageAnswers::new()
    };

    Ok(Transition {
        next,
        classification,
        merge,
    })
}

fn routing_answer<'a>(answers: &'a StageAnswers, key: &str) -> Result<&'a str, ResolveError> {
    answers.get(key).ok_or_else(|| ResolveError::UnexpectedAnswer {
        key: key.to_string(),
        value: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn basics(age: &str) -> StageAnswers {
        StageAnswers::new()
            .with("Registration Code", "REG-1")
            .with(AGE_GROUP_KEY, age)
            .with("Gender", "Female")
            .with("KK Number", "3")
    }

    #[test]
    fn below_18_routes_straight_to_future_branch() {
        let t = resolve(Stage::Basics, Classification::Unclassified, &basics(BELOW_18)).unwrap();
        assert_eq!(t.next, Stage::FutureAssessment);
        assert_eq!(t.classification, Classification::Future);
        assert_eq!(t.merge.len(), 4);
    }

    #[test]
    fn adult_goes_through_ownership_gate() {
        let t = resolve(Stage::Basics, Classification::Unclassified, &basics("31–40")).unwrap();
        assert_eq!(t.next, Stage::OwnershipGate);
        assert_eq!(t.classification, Classification::Unclassified);
    }

    #[test]
    fn ownership_gate_rederives_after_basics_reanswered() {
        let t = resolve(Stage::Basics, Classification::Future, &basics("41–50")).unwrap();
        assert_eq!((t.next, t.classification), (Stage::OwnershipGate, Classification::Future));

        let no = StageAnswers::new().with(OWNERSHIP_KEY, NO);
        let t = resolve(Stage::OwnershipGate, t.classification, &no).unwrap();
        assert_eq!(t.classification, Classification::Starter);
    }

    #[test]
    fn ownership_gate_classifies_without_merging() {
        let yes = StageAnswers::new().with(OWNERSHIP_KEY, YES);
        let t = resolve(Stage::OwnershipGate, Classification::Unclassified, &yes).unwrap();
        assert_eq!((t.next, t.classification), (Stage::OwnerProfile, Classification::Owner));
        assert!(t.merge.is_empty());

        let no = StageAnswers::new().with(OWNERSHIP_KEY, NO);
        let t = resolve(Stage::OwnershipGate, Classification::Unclassified, &no).unwrap();
        assert_eq!((t.next, t.classification), (Stage::StarterAssessment, Classification::Starter));
    }

    #[test]
    fn owner_profile_leads_to_compliance() {
        let t = resolve(Stage::OwnerProfile, Classification::Owner, &StageAnswers::new()).unwrap();
        assert_eq!(t.next, Stage::OwnerCompliance);
    }

    #[test]
    fn compliance_is_rejected_off_the_owner_branch() {
        let err = resolve(Stage::OwnerCompliance, Classification::Starter, &StageAnswers::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::ClassificationMismatch { required: Classification::Owner, .. }));
    }

    #[test]
    fn terminal_has_no_forward_transition() {
        assert_eq!(
            resolve(Stage::Complete, Classification::Future, &StageAnswers::new()),
            Err(ResolveError::Terminal)
        );
    }

    #[test]
    fn merge_excludes_foreign_keys() {
        let answers = basics("20–30").with("fe1", "Other");
        let t = resolve(Stage::Basics, Classification::Unclassified, &answers).unwrap();
        assert_eq!(t.merge.get("fe1"), None);
        assert_eq!(t.merge.get("Gender"), Some("Female"));
    }

    #[test]
    fn missing_routing_answer_is_reported() {
        let err = resolve(Stage::OwnershipGate, Classification::Unclassified, &StageAnswers::new())
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnexpectedAnswer {
                key: OWNERSHIP_KEY.to_string(),
                value: None
            }
        );
    }

    fn branch_stage() -> impl Strategy<Value = (Stage, Classification)> {
        prop_oneof![
            Just((Stage::FutureAssessment, Classification::Future)),
            Just((Stage::StarterAssessment, Classification::Starter)),
            Just((Stage::OwnerProfile, Classification::Owner)),
            Just((Stage::OwnerCompliance, Classification::Owner)),
        ]
    }

    fn any_stage() -> impl Strategy<Value = Stage> {
        prop_oneof![
            Just(Stage::Basics),
            Just(Stage::OwnershipGate),
            Just(Stage::FutureAssessment),
            Just(Stage::StarterAssessment),
            Just(Stage::OwnerProfile),
            Just(Stage::OwnerCompliance),
            Just(Stage::Complete),
        ]
    }

    fn any_classification() -> impl Strategy<Value = Classification> {
        prop_oneof![
            Just(Classification::Unclassified),
            Just(Classification::Future),
            Just(Classification::Starter),
            Just(Classification::Owner),
        ]
    }

    fn any_answers() -> impl Strategy<Value = StageAnswers> {
        prop_oneof![
            prop_oneof![Just(BELOW_18), Just("20–30"), Just("31–40"), Just("Above 60")]
                .prop_map(basics),
            prop_oneof![Just(YES), Just(NO), Just("Maybe")]
                .prop_map(|v| StageAnswers::new().with(OWNERSHIP_KEY, v)),
            ("[a-z0-9]{1,4}", "[A-Za-z ]{0,10}")
                .prop_map(|(key, value)| StageAnswers::new().with(key, value).with("fe1", "Yes")),
            Just(StageAnswers::new()),
        ]
    }

    proptest! {
        #[test]
        fn prop_classification_is_immutable_after_gate(
            (stage, classification) in branch_stage(),
            value in "[A-Za-z ]{0,10}",
        ) {
            let answers = StageAnswers::new().with("fe1", value.clone()).with("s1", value);
            let t = resolve(stage, classification, &answers).unwrap();
            prop_assert_eq!(t.classification, classification);
        }

        #[test]
        fn prop_resolve_is_pure(
            stage in any_stage(),
            classification in any_classification(),
            answers in any_answers(),
        ) {
            let first = resolve(stage, classification, &answers);
            let second = resolve(stage, classification, &answers);
            prop_assert_eq!(&first, &second);
            prop_assert!(answers.len() >= first.map(|t| t.merge.len()).unwrap_or_default());
        }
    }
}
