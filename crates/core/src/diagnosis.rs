//! Rule-based diagnosis engine.
//!
//! Maps a set of observed symptom tokens to the candidate conditions it is consistent with,
//! using a fixed battery of boolean rules. Each rule is either a disjunction of clauses (a
//! clause holds when all of its required symptoms are present and none of its excluded
//! symptoms are) or an "only this symptom" guard that needs the input to be exactly one
//! symptom.
//!
//! The engine is a pure function of its input: tokens outside the vocabulary are accepted and
//! simply never satisfy a clause, and nothing is ever rejected.
//!
//! Results are returned in ascending byte order of their labels, so `COVID-19` sorts before
//! `Common Cold`.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::symptom::Symptom;

const FEVER: &str = Symptom::Fever.as_str();
const COUGH: &str = Symptom::Cough.as_str();
const HEADACHE: &str = Symptom::Headache.as_str();
const SORE_THROAT: &str = Symptom::SoreThroat.as_str();
const RUNNY_NOSE: &str = Symptom::RunnyNose.as_str();
const SHORTNESS_OF_BREATH: &str = Symptom::ShortnessOfBreath.as_str();
const FATIGUE: &str = Symptom::Fatigue.as_str();
const MUSCLE_ACHES: &str = Symptom::MuscleAches.as_str();
const NAUSEA: &str = Symptom::Nausea.as_str();
const VOMITING: &str = Symptom::Vomiting.as_str();
const DIARRHEA: &str = Symptom::Diarrhea.as_str();
const LOSS_OF_TASTE: &str = Symptom::LossOfTaste.as_str();
const LOSS_OF_SMELL: &str = Symptom::LossOfSmell.as_str();
const CHEST_PAIN: &str = Symptom::ChestPain.as_str();
const DIZZINESS: &str = Symptom::Dizziness.as_str();
const RASH: &str = Symptom::Rash.as_str();
const JOINT_PAIN: &str = Symptom::JointPain.as_str();
const CHILLS: &str = Symptom::Chills.as_str();

/// A candidate condition the engine can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    CommonCold,
    Flu,
    Covid19,
    Pneumonia,
    Gastroenteritis,
    Migraine,
    AllergicReaction,
    StrepThroat,
    Bronchitis,
    FoodPoisoning,
    Sinusitis,
    Asthma,
    AnxietyPanicAttack,
    Dehydration,
    InflammatoryArthritis,
    Arthritis,
    FeverUnknownCause,
    TensionHeadache,
    SkinCondition,
}

impl Condition {
    /// Every condition, in rule declaration order.
    pub const ALL: [Condition; 19] = [
        Condition::CommonCold,
        Condition::Flu,
        Condition::Covid19,
        Condition::Pneumonia,
        Condition::Gastroenteritis,
        Condition::Migraine,
        Condition::AllergicReaction,
        Condition::StrepThroat,
        Condition::Bronchitis,
        Condition::FoodPoisoning,
        Condition::Sinusitis,
        Condition::Asthma,
        Condition::AnxietyPanicAttack,
        Condition::Dehydration,
        Condition::InflammatoryArthritis,
        Condition::Arthritis,
        Condition::FeverUnknownCause,
        Condition::TensionHeadache,
        Condition::SkinCondition,
    ];

    /// The user-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            Condition::CommonCold => "Common Cold",
            Condition::Flu => "Flu",
            Condition::Covid19 => "COVID-19",
            Condition::Pneumonia => "Pneumonia",
            Condition::Gastroenteritis => "Gastroenteritis",
            Condition::Migraine => "Migraine",
            Condition::AllergicReaction => "Allergic Reaction",
            Condition::StrepThroat => "Strep Throat",
            Condition::Bronchitis => "Bronchitis",
            Condition::FoodPoisoning => "Food Poisoning",
            Condition::Sinusitis => "Sinusitis",
            Condition::Asthma => "Asthma",
            Condition::AnxietyPanicAttack => "Anxiety/Panic Attack",
            Condition::Dehydration => "Dehydration",
            Condition::InflammatoryArthritis => "Inflammatory Arthritis",
            Condition::Arthritis => "Arthritis",
            Condition::FeverUnknownCause => "Fever (Unknown Cause)",
            Condition::TensionHeadache => "Tension Headache",
            Condition::SkinCondition => "Skin Condition",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Conditions order by label so that result sets iterate alphabetically.
impl Ord for Condition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label().cmp(other.label())
    }
}

impl PartialOrd for Condition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One conjunctive term of a rule.
#[derive(Debug)]
struct Clause {
    all_of: &'static [&'static str],
    none_of: &'static [&'static str],
}

impl Clause {
    fn matches(&self, present: &HashSet<&str>) -> bool {
        self.all_of.iter().all(|s| present.contains(s))
            && !self.none_of.iter().any(|s| present.contains(s))
    }
}

/// `clause!(A, B)` requires A and B; `clause!(A; not B)` also requires B to be absent.
macro_rules! clause {
    ($($present:expr),+ $(; not $($absent:expr),+)?) => {
        Clause {
            all_of: &[$($present),+],
            none_of: &[$($($absent),+)?],
        }
    };
}

#[derive(Debug)]
enum Trigger {
    /// Fires when at least one clause matches.
    AnyOf(&'static [Clause]),
    /// Fires when the distinct input is exactly this one symptom.
    Only(&'static str),
}

#[derive(Debug)]
struct Rule {
    condition: Condition,
    trigger: Trigger,
}

impl Rule {
    fn fires(&self, present: &HashSet<&str>) -> bool {
        match &self.trigger {
            Trigger::AnyOf(clauses) => clauses.iter().any(|c| c.matches(present)),
            Trigger::Only(symptom) => present.len() == 1 && present.contains(symptom),
        }
    }
}

static RULES: [Rule; 19] = [
    Rule {
        condition: Condition::CommonCold,
        trigger: Trigger::AnyOf(&[
            clause!(RUNNY_NOSE, SORE_THROAT),
            clause!(RUNNY_NOSE, COUGH),
            clause!(SORE_THROAT, COUGH),
            clause!(RUNNY_NOSE, HEADACHE),
        ]),
    },
    Rule {
        condition: Condition::Flu,
        trigger: Trigger::AnyOf(&[
            clause!(FEVER, COUGH),
            clause!(FEVER, MUSCLE_ACHES),
            clause!(FEVER, FATIGUE, HEADACHE),
            clause!(FEVER, CHILLS),
            clause!(MUSCLE_ACHES, FATIGUE, HEADACHE),
        ]),
    },
    Rule {
        condition: Condition::Covid19,
        trigger: Trigger::AnyOf(&[
            clause!(FEVER, COUGH, LOSS_OF_TASTE),
            clause!(FEVER, SHORTNESS_OF_BREATH),
            clause!(LOSS_OF_TASTE, LOSS_OF_SMELL),
            clause!(FEVER, FATIGUE, MUSCLE_ACHES),
            clause!(COUGH, LOSS_OF_TASTE),
            clause!(COUGH, LOSS_OF_SMELL),
            clause!(FEVER, HEADACHE, SORE_THROAT),
        ]),
    },
    Rule {
        condition: Condition::Pneumonia,
        trigger: Trigger::AnyOf(&[
            clause!(FEVER, COUGH, SHORTNESS_OF_BREATH),
            clause!(CHEST_PAIN, COUGH, FEVER),
            clause!(SHORTNESS_OF_BREATH, CHEST_PAIN),
            clause!(FEVER, CHILLS, SHORTNESS_OF_BREATH),
        ]),
    },
    Rule {
        condition: Condition::Gastroenteritis,
        trigger: Trigger::AnyOf(&[
            clause!(NAUSEA, VOMITING, DIARRHEA),
            clause!(NAUSEA, DIARRHEA),
            clause!(VOMITING, DIARRHEA),
            clause!(NAUSEA, VOMITING),
            clause!(DIARRHEA, FEVER),
        ]),
    },
    Rule {
        condition: Condition::Migraine,
        trigger: Trigger::AnyOf(&[
            clause!(HEADACHE, NAUSEA),
            clause!(HEADACHE, DIZZINESS),
            clause!(HEADACHE, VOMITING),
        ]),
    },
    Rule {
        condition: Condition::AllergicReaction,
        trigger: Trigger::AnyOf(&[
            clause!(RASH, RUNNY_NOSE),
            clause!(RASH, SORE_THROAT),
            clause!(RASH, SHORTNESS_OF_BREATH),
        ]),
    },
    Rule {
        condition: Condition::StrepThroat,
        trigger: Trigger::AnyOf(&[clause!(SORE_THROAT, FEVER; not RUNNY_NOSE, COUGH)]),
    },
    Rule {
        condition: Condition::Bronchitis,
        trigger: Trigger::AnyOf(&[
            clause!(COUGH, CHEST_PAIN),
            clause!(COUGH, FATIGUE),
            clause!(COUGH, SHORTNESS_OF_BREATH),
        ]),
    },
    Rule {
        condition: Condition::FoodPoisoning,
        trigger: Trigger::AnyOf(&[
            clause!(NAUSEA, VOMITING),
            clause!(DIARRHEA, NAUSEA),
            clause!(VOMITING, DIARRHEA, FEVER),
        ]),
    },
    Rule {
        condition: Condition::Sinusitis,
        trigger: Trigger::AnyOf(&[
            clause!(HEADACHE, RUNNY_NOSE),
            clause!(HEADACHE, SORE_THROAT, RUNNY_NOSE),
            clause!(HEADACHE, FEVER, RUNNY_NOSE),
        ]),
    },
    Rule {
        condition: Condition::Asthma,
        trigger: Trigger::AnyOf(&[
            clause!(SHORTNESS_OF_BREATH, COUGH),
            clause!(SHORTNESS_OF_BREATH, CHEST_PAIN),
        ]),
    },
    Rule {
        condition: Condition::AnxietyPanicAttack,
        trigger: Trigger::AnyOf(&[
            clause!(SHORTNESS_OF_BREATH, DIZZINESS),
            clause!(CHEST_PAIN, DIZZINESS),
            clause!(NAUSEA, DIZZINESS, SHORTNESS_OF_BREATH),
        ]),
    },
    Rule {
        condition: Condition::Dehydration,
        trigger: Trigger::AnyOf(&[
            clause!(DIZZINESS, FATIGUE),
            clause!(HEADACHE, DIZZINESS, FATIGUE),
        ]),
    },
    // The two arthritis rules split on fever, so exactly one of them fires for joint pain.
    Rule {
        condition: Condition::InflammatoryArthritis,
        trigger: Trigger::AnyOf(&[clause!(JOINT_PAIN, FEVER)]),
    },
    Rule {
        condition: Condition::Arthritis,
        trigger: Trigger::AnyOf(&[clause!(JOINT_PAIN; not FEVER)]),
    },
    Rule {
        condition: Condition::FeverUnknownCause,
        trigger: Trigger::Only(FEVER),
    },
    Rule {
        condition: Condition::TensionHeadache,
        trigger: Trigger::Only(HEADACHE),
    },
    Rule {
        condition: Condition::SkinCondition,
        trigger: Trigger::Only(RASH),
    },
];

/// Returns every condition activated by `symptoms`, sorted by label and without duplicates.
///
/// Duplicate tokens are ignored. Tokens are matched exactly against the canonical symptom
/// text (see [`Symptom::as_str`]); anything else is inert, although it still counts towards
/// the size of the input for the single-symptom rules.
pub fn predict<S: AsRef<str>>(symptoms: &[S]) -> Vec<Condition> {
    let present: HashSet<&str> = symptoms.iter().map(AsRef::as_ref).collect();

    let conditions: BTreeSet<Condition> = RULES
        .iter()
        .filter(|rule| rule.fires(&present))
        .map(|rule| rule.condition)
        .collect();

    tracing::debug!(
        symptoms = present.len(),
        conditions = conditions.len(),
        "diagnosis rules evaluated"
    );

    conditions.into_iter().collect()
}

/// Convenience wrapper over [`predict`] for recorded [`Symptom`] values.
pub fn predict_for(symptoms: &[Symptom]) -> Vec<Condition> {
    let tokens: Vec<&str> = symptoms.iter().map(|s| s.as_str()).collect();
    predict(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(symptoms: &[&str]) -> Vec<&'static str> {
        predict(symptoms).into_iter().map(Condition::label).collect()
    }

    #[test]
    fn empty_input_yields_no_conditions() {
        let none: [&str; 0] = [];
        assert!(predict(&none).is_empty());
    }

    #[test]
    fn runny_nose_and_sore_throat_is_common_cold() {
        assert_eq!(labels(&["runny nose", "sore throat"]), ["Common Cold"]);
    }

    #[test]
    fn fever_and_cough_is_flu_only() {
        assert_eq!(labels(&["fever", "cough"]), ["Flu"]);
    }

    #[test]
    fn fever_cough_and_loss_of_taste() {
        assert_eq!(labels(&["fever", "cough", "loss of taste"]), ["COVID-19", "Flu"]);
    }

    #[test]
    fn strep_throat_needs_absence_of_cough_and_runny_nose() {
        assert_eq!(labels(&["sore throat", "fever"]), ["Strep Throat"]);
        assert_eq!(
            labels(&["sore throat", "fever", "cough"]),
            ["Common Cold", "Flu"]
        );
        assert_eq!(
            labels(&["sore throat", "fever", "runny nose"]),
            ["Common Cold"]
        );
    }

    #[test]
    fn arthritis_branches_are_mutually_exclusive() {
        assert_eq!(labels(&["joint pain", "fever"]), ["Inflammatory Arthritis"]);
        assert_eq!(labels(&["joint pain"]), ["Arthritis"]);

        for extra in Symptom::ALL {
            let found = predict(&["joint pain", extra.as_str()]);
            let both = found.contains(&Condition::Arthritis)
                && found.contains(&Condition::InflammatoryArthritis);
            assert!(!both, "both arthritis labels fired with {extra}");
        }
    }

    #[test]
    fn single_symptom_fallbacks_need_exactly_one_symptom() {
        assert_eq!(labels(&["fever"]), ["Fever (Unknown Cause)"]);
        assert_eq!(labels(&["headache"]), ["Tension Headache"]);
        assert_eq!(labels(&["rash"]), ["Skin Condition"]);

        assert!(!predict(&["fever", "cough"]).contains(&Condition::FeverUnknownCause));
        assert!(!predict(&["headache", "chills"]).contains(&Condition::TensionHeadache));
        assert!(!predict(&["rash", "fatigue"]).contains(&Condition::SkinCondition));
    }

    #[test]
    fn duplicate_tokens_do_not_change_the_result() {
        assert_eq!(labels(&["fever", "fever"]), ["Fever (Unknown Cause)"]);
        assert_eq!(
            labels(&["nausea", "vomiting", "nausea"]),
            labels(&["nausea", "vomiting"])
        );
    }

    #[test]
    fn unknown_tokens_are_inert_but_count_towards_size() {
        assert!(predict(&["sneezing"]).is_empty());
        assert!(predict(&["Fever"]).is_empty());
        assert_eq!(labels(&["fever", "cough", "sneezing"]), ["Flu"]);
        assert!(predict(&["fever", "sneezing"]).is_empty());
    }

    #[test]
    fn gastroenteritis_and_food_poisoning_co_fire() {
        assert_eq!(
            labels(&["nausea", "vomiting"]),
            ["Food Poisoning", "Gastroenteritis"]
        );
        assert_eq!(labels(&["diarrhea", "fever"]), ["Gastroenteritis"]);
    }

    #[test]
    fn respiratory_combinations() {
        assert_eq!(
            labels(&["shortness of breath", "chest pain"]),
            ["Asthma", "Pneumonia"]
        );
        assert_eq!(
            labels(&["cough", "shortness of breath"]),
            ["Asthma", "Bronchitis"]
        );
        assert_eq!(
            labels(&["fever", "cough", "shortness of breath"]),
            ["Asthma", "Bronchitis", "COVID-19", "Flu", "Pneumonia"]
        );
    }

    #[test]
    fn head_and_general_combinations() {
        assert_eq!(labels(&["headache", "runny nose"]), ["Common Cold", "Sinusitis"]);
        assert_eq!(labels(&["headache", "nausea"]), ["Migraine"]);
        assert_eq!(labels(&["dizziness", "fatigue"]), ["Dehydration"]);
        assert_eq!(
            labels(&["shortness of breath", "dizziness"]),
            ["Anxiety/Panic Attack"]
        );
        assert_eq!(labels(&["rash", "runny nose"]), ["Allergic Reaction"]);
        assert_eq!(labels(&["muscle aches", "fatigue", "headache"]), ["Flu"]);
        assert_eq!(labels(&["loss of taste", "loss of smell"]), ["COVID-19"]);
    }

    #[test]
    fn results_are_sorted_by_label_bytes() {
        assert_eq!(
            labels(&["cough", "loss of smell", "runny nose"]),
            ["COVID-19", "Common Cold"]
        );

        let everything: Vec<&str> = Symptom::ALL.iter().map(|s| s.as_str()).collect();
        let found = labels(&everything);
        let mut sorted = found.clone();
        sorted.sort_unstable();
        assert_eq!(found, sorted);
    }

    #[test]
    fn full_vocabulary_never_duplicates_and_skips_guarded_rules() {
        let everything: Vec<&str> = Symptom::ALL.iter().map(|s| s.as_str()).collect();
        let found = predict(&everything);

        let distinct: HashSet<Condition> = found.iter().copied().collect();
        assert_eq!(distinct.len(), found.len());

        assert_eq!(found.len(), 14);
        for excluded in [
            Condition::StrepThroat,
            Condition::Arthritis,
            Condition::FeverUnknownCause,
            Condition::TensionHeadache,
            Condition::SkinCondition,
        ] {
            assert!(!found.contains(&excluded), "{excluded} should not fire");
        }
    }

    #[test]
    fn input_order_does_not_matter_and_calls_are_repeatable() {
        let forward = predict(&["fever", "headache", "sore throat", "runny nose"]);
        let backward = predict(&["runny nose", "sore throat", "headache", "fever"]);
        assert_eq!(forward, backward);
        assert_eq!(
            forward,
            predict(&["fever", "headache", "sore throat", "runny nose"])
        );
    }

    #[test]
    fn every_condition_is_reachable() {
        let mut seen: HashSet<Condition> = HashSet::new();
        let symptoms = Symptom::ALL;
        for a in symptoms {
            seen.extend(predict(&[a.as_str()]));
            for b in symptoms {
                seen.extend(predict(&[a.as_str(), b.as_str()]));
            }
        }
        for condition in Condition::ALL {
            assert!(seen.contains(&condition), "{condition} never fired");
        }
    }

    #[test]
    fn predict_for_matches_token_prediction() {
        assert_eq!(
            predict_for(&[Symptom::Nausea, Symptom::Diarrhea]),
            predict(&["nausea", "diarrhea"])
        );
    }

    #[test]
    fn rule_table_covers_each_condition_once() {
        let conditions: Vec<Condition> = RULES.iter().map(|r| r.condition).collect();
        assert_eq!(conditions, Condition::ALL);
    }
}
