//! End-to-end drill sessions driven through the public engine API.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use drill_core::{
    Feedback, InputError, Presentation, SessionError, SessionReporter, Stage, StageEngine, Wait,
    WordPair,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{
    answer, engine, engine_with, fruit, letters_of, resolve, step, FailingSink, RecordingSink,
};

/// Answer every pair of the active stage correctly.
fn clear_stage(engine: &mut StageEngine) {
    let stage = engine.active_stage();
    while engine.active_stage() == stage && !engine.is_completed() {
        step(engine, true);
    }
}

fn reach(engine: &mut StageEngine, stage: Stage) {
    while engine.active_stage() != stage {
        clear_stage(engine);
    }
}

#[test]
fn empty_list_is_rejected() {
    let result = StageEngine::from_pairs(vec![], StdRng::seed_from_u64(0));
    assert_eq!(result.err(), Some(SessionError::EmptyList));
}

#[test]
fn session_starts_at_stage_one_with_empty_sets() {
    let engine = engine(1);
    let state = engine.state();

    assert_eq!(state.active_stage, Stage::WordChoice);
    assert!(!state.completed);
    assert!(state.studied_sets.iter().all(BTreeSet::is_empty));

    let Presentation::Choice { prompt, answers, .. } = engine.presentation() else {
        panic!("stage 1 presents choices");
    };
    assert_eq!(prompt, engine.current_pair().translation);
    assert_eq!(answers.len(), 4);
}

#[test]
fn four_correct_picks_move_to_stage_two() {
    let mut engine = engine(2);

    for round in 0..4 {
        assert_eq!(engine.active_stage(), Stage::WordChoice);
        let transition = answer(&mut engine, true);
        assert_eq!(engine.state().studied(Stage::WordChoice).len(), round + 1);
        resolve(&mut engine, transition);
    }

    let state = engine.state();
    assert_eq!(state.active_stage, Stage::TranslationChoice);
    assert_eq!(state.studied(Stage::WordChoice).len(), 4);
    assert!(state.studied(Stage::TranslationChoice).is_empty());

    let Presentation::Choice {
        stage,
        prompt,
        answers,
        picked,
    } = engine.presentation()
    else {
        panic!("stage 2 presents choices");
    };
    assert_eq!(stage, Stage::TranslationChoice);
    assert_eq!(prompt, engine.current_pair().value);
    assert_eq!(picked, None);
    assert_eq!(answers.len(), 4);
    let correct: Vec<_> = answers.iter().filter(|a| a.is_correct).collect();
    assert_eq!(correct.len(), 1);
    assert_eq!(correct[0].text, engine.current_pair().translation);
}

#[test]
fn last_pick_of_stage_waits_for_stage_transition_delay() {
    let mut engine = engine(3);
    for _ in 0..3 {
        step(&mut engine, true);
    }

    let transition = answer(&mut engine, true);
    assert_eq!(
        transition.wait,
        Wait::After {
            delay: engine.timing().stage_transition()
        }
    );
    assert_eq!(engine.active_stage(), Stage::WordChoice);
}

#[test]
fn miss_never_repeats_pair_while_others_remain() {
    for seed in 0..40 {
        let mut engine = engine(seed);
        let mut coin = StdRng::seed_from_u64(seed + 1000);

        while engine.active_stage() == Stage::WordChoice {
            let before = engine.state();
            let unstudied = 4 - before.studied(Stage::WordChoice).len();
            let correct = coin.random_bool(0.5);

            step(&mut engine, correct);
            if correct || engine.active_stage() != Stage::WordChoice {
                continue;
            }

            let after = engine.state();
            if unstudied >= 2 {
                assert_ne!(after.current_pair_index, before.current_pair_index, "seed {seed}");
            } else {
                assert_eq!(after.current_pair_index, before.current_pair_index, "seed {seed}");
            }
        }
    }
}

#[test]
fn studied_sets_follow_most_recent_answer() {
    for seed in 0..20 {
        let mut engine = engine(seed);
        let mut coin = StdRng::seed_from_u64(seed + 500);
        let mut stages_seen = vec![Stage::WordChoice];

        while !engine.is_completed() {
            let stage = engine.active_stage();
            let index = engine.state().current_pair_index;
            let before = engine.state().studied(stage).clone();
            assert!(!before.contains(&index), "presented pair is never studied");

            let correct = coin.random_bool(0.7);
            let transition = answer(&mut engine, correct);

            let mut expected = before.clone();
            if correct {
                expected.insert(index);
            }
            assert_eq!(engine.state().studied(stage), &expected, "seed {seed}");

            resolve(&mut engine, transition);

            let now = engine.active_stage();
            if now != stage {
                assert_eq!(engine.state().studied(stage).len(), 4, "stage exited incomplete");
                stages_seen.push(now);
            }
        }

        assert_eq!(stages_seen, Stage::ALL.to_vec());
    }
}

#[test]
fn answer_set_regenerates_for_each_pair() {
    let mut engine = engine(4);
    step(&mut engine, true);

    let current = engine.current_pair().value.clone();
    let Presentation::Choice { answers, picked, .. } = engine.presentation() else {
        panic!("still in stage 1");
    };
    assert_eq!(picked, None);
    assert!(answers.iter().any(|a| a.is_correct && a.text == current));
}

#[test]
fn input_is_refused_while_transition_pending() {
    let mut engine = engine(5);
    let transition = answer(&mut engine, true);
    let state = engine.state();

    let correct = engine.current_pair().value.clone();
    assert_eq!(engine.submit_choice(&correct), Err(InputError::TransitionPending));
    assert_eq!(engine.state(), state);
    assert_eq!(engine.pending(), Some(transition));

    resolve(&mut engine, transition);
    assert_eq!(engine.pending(), None);
}

#[test]
fn stale_ticket_is_ignored() {
    let mut engine = engine(6);
    let first = answer(&mut engine, true);
    resolve(&mut engine, first);

    let second = answer(&mut engine, true);
    let state = engine.state();
    assert!(!engine.advance(first.ticket));
    assert_eq!(engine.state(), state);
    assert!(engine.advance(second.ticket));
    assert!(!engine.advance(second.ticket));
}

#[test]
fn off_list_choice_counts_as_miss() {
    let mut engine = engine(7);
    let index = engine.state().current_pair_index;

    let Feedback::Answered { correct, transition } = engine.submit_choice("banana").unwrap() else {
        panic!("choice is evaluated at once");
    };
    assert!(!correct);
    assert!(engine.state().studied(Stage::WordChoice).is_empty());
    let Presentation::Choice { picked, .. } = engine.presentation() else {
        panic!("stage 1 presents choices");
    };
    assert_eq!(picked, None);

    resolve(&mut engine, transition);
    assert_ne!(engine.state().current_pair_index, index);
}

#[test]
fn blank_choice_is_rejected() {
    let mut engine = engine(7);
    let state = engine.state();
    assert_eq!(engine.submit_choice("  "), Err(InputError::EmptyAnswer));
    assert_eq!(engine.state(), state);
    assert_eq!(engine.pending(), None);
}

#[test]
fn single_pair_miss_then_hit_completes_stage_one() {
    let mut engine = engine_with(vec![WordPair::new("apple", "яблоко")], 19);
    let mut submissions = 0;

    let Feedback::Answered { correct, transition } = engine.submit_choice("pear").unwrap() else {
        panic!("choice is evaluated at once");
    };
    submissions += 1;
    assert!(!correct);
    resolve(&mut engine, transition);
    assert_eq!(engine.active_stage(), Stage::WordChoice);
    assert_eq!(engine.state().current_pair_index, 0);

    let Feedback::Answered { correct, transition } = engine.submit_choice("apple").unwrap() else {
        panic!("choice is evaluated at once");
    };
    submissions += 1;
    assert!(correct);
    resolve(&mut engine, transition);

    assert_eq!(submissions, 2);
    let state = engine.state();
    assert_eq!(state.active_stage, Stage::TranslationChoice);
    assert_eq!(state.studied(Stage::WordChoice).len(), 1);
    assert!(state.studied(Stage::TranslationChoice).is_empty());
}

#[test]
fn list_without_letters_is_rejected() {
    let pairs = vec![WordPair::new("apple", "яблоко"), WordPair::new("-", "dash")];
    let result = StageEngine::from_pairs(pairs, StdRng::seed_from_u64(0));
    assert_eq!(result.err(), Some(SessionError::NoLetters { index: 1 }));
}

#[test]
fn input_for_another_stage_is_rejected() {
    let mut engine = engine(8);
    assert_eq!(
        engine.submit_letter('a'),
        Err(InputError::NotAccepted {
            stage: Stage::WordChoice
        })
    );
    assert_eq!(
        engine.submit_text("apple"),
        Err(InputError::NotAccepted {
            stage: Stage::WordChoice
        })
    );
    assert_eq!(engine.acknowledge_and_advance(), Err(InputError::NothingToAcknowledge));
}

#[test]
fn stage_three_wrong_letter_routes_to_incorrect_path() {
    let mut engine = engine(9);
    reach(&mut engine, Stage::LetterAssembly);

    let index = engine.state().current_pair_index;
    let transition = answer(&mut engine, false);

    let Presentation::Assembly { assembly, .. } = engine.presentation() else {
        panic!("stage 3 presents slots");
    };
    assert!(assembly.is_complete(), "all slots filled despite the miss");
    assert!(!engine.state().studied(Stage::LetterAssembly).contains(&index));
    assert_eq!(
        transition.wait,
        Wait::After {
            delay: engine.timing().answer_feedback()
        }
    );

    resolve(&mut engine, transition);
    assert_ne!(engine.state().current_pair_index, index);
}

#[test]
fn stage_three_marker_clears_with_its_token() {
    let mut engine = engine(10);
    reach(&mut engine, Stage::LetterAssembly);

    let expected = letters_of(&engine.current_pair().value)[0];
    let wrong = match engine.presentation() {
        Presentation::Assembly { assembly, .. } => {
            *assembly.available().iter().find(|c| **c != expected).unwrap()
        }
        _ => panic!("stage 3 presents slots"),
    };

    let Ok(Feedback::LetterMissed {
        slot,
        marker,
        clear_after,
    }) = engine.submit_letter(wrong)
    else {
        panic!("wrong letter is a miss");
    };
    assert_eq!(slot, 0);
    assert_eq!(clear_after, engine.timing().letter_error());

    assert!(engine.clear_letter_error(marker));
    assert!(!engine.clear_letter_error(marker));
    assert!(engine.pending().is_none(), "a miss does not end the pair");
}

#[test]
fn stage_three_rejects_letters_not_in_word() {
    let mut engine = engine(11);
    reach(&mut engine, Stage::LetterAssembly);

    let state = engine.state();
    assert_eq!(engine.submit_letter('ж'), Err(InputError::LetterUnavailable('ж')));
    assert_eq!(engine.state(), state);
}

#[test]
fn stage_four_accepts_padded_mixed_case() {
    let mut engine = engine(12);
    reach(&mut engine, Stage::FreeText);

    let index = engine.state().current_pair_index;
    let typed = format!(" {} ", engine.current_pair().value.to_uppercase());
    let feedback = engine.submit_text(&typed).unwrap();

    let Feedback::Answered { correct, transition } = feedback else {
        panic!("text is evaluated at once");
    };
    assert!(correct);
    assert_eq!(
        transition.wait,
        Wait::After {
            delay: engine.timing().text_success()
        }
    );
    assert!(engine.state().studied(Stage::FreeText).contains(&index));
}

#[test]
fn stage_four_miss_reveals_answer_and_waits_for_acknowledge() {
    let mut engine = engine(13);
    reach(&mut engine, Stage::FreeText);

    let target = engine.current_pair().value.clone();
    let transition = answer(&mut engine, false);
    assert_eq!(transition.wait, Wait::Acknowledge);

    let Presentation::FreeText { revealed, .. } = engine.presentation() else {
        panic!("stage 4 presents a text prompt");
    };
    assert_eq!(revealed, Some(target.as_str()));

    assert!(!engine.advance(transition.ticket), "misses never auto-advance");
    assert_eq!(engine.submit_text(&target), Err(InputError::TransitionPending));

    engine.acknowledge_and_advance().unwrap();
    let Presentation::FreeText { revealed, .. } = engine.presentation() else {
        panic!("still in stage 4");
    };
    assert_eq!(revealed, None);
    assert_ne!(engine.current_pair().value, target);
}

#[test]
fn single_pair_miss_at_stage_four_is_presented_again() {
    let mut engine = engine_with(vec![WordPair::new("apple", "яблоко")], 14);
    reach(&mut engine, Stage::FreeText);

    step(&mut engine, false);
    assert_eq!(engine.state().current_pair_index, 0);
    assert!(!engine.is_completed());

    step(&mut engine, true);
    assert!(engine.is_completed());
}

#[tokio::test]
async fn full_session_reports_exactly_once() {
    let sink = Arc::new(RecordingSink::default());
    let mut engine = engine(15).with_reporter(SessionReporter::new("learner-1", sink.clone()));

    let mut submissions = 0;
    while !engine.is_completed() {
        step(&mut engine, true);
        submissions += 1;
    }
    assert_eq!(submissions, 16);

    engine.take_report_handle().expect("report spawned").await.unwrap();
    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].user_id, "learner-1");
    assert_eq!(events[0].pair_count, 4);

    let state = engine.state();
    assert!(state.completed);
    assert!(state.studied_sets.iter().all(|set| set.len() == 4));
}

#[tokio::test]
async fn failing_sink_does_not_undo_completion() {
    let reporter = SessionReporter::new("learner-2", Arc::new(FailingSink));
    let mut engine = engine(16).with_reporter(reporter);
    while !engine.is_completed() {
        step(&mut engine, true);
    }

    engine.take_report_handle().expect("report spawned").await.unwrap();
    assert!(engine.state().completed);
    assert!(matches!(engine.presentation(), Presentation::Completed));
}

#[test]
fn completion_without_runtime_still_completes() {
    let sink = Arc::new(RecordingSink::default());
    let reporter = SessionReporter::new("learner-3", sink.clone());
    let mut engine = engine_with(fruit(), 17).with_reporter(reporter);
    while !engine.is_completed() {
        step(&mut engine, true);
    }

    assert!(engine.take_report_handle().is_none());
    assert!(sink.events.lock().unwrap().is_empty());
    assert!(engine.state().completed);
}

#[test]
fn completed_session_refuses_input() {
    let mut engine = engine(18);
    while !engine.is_completed() {
        step(&mut engine, true);
    }

    assert_eq!(engine.submit_text("apple"), Err(InputError::SessionCompleted));
    assert_eq!(engine.submit_choice("apple"), Err(InputError::SessionCompleted));
    assert_eq!(engine.acknowledge_and_advance(), Err(InputError::SessionCompleted));
    assert_eq!(engine.state().active_stage, Stage::FreeText);
}
