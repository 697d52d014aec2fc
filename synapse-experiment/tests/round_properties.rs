use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use synapse_core::{Colour, GridLetter, RoundPhase, Trial};
use synapse_experiment::{
    DifficultyStore, DualNBack, Exercise, ExerciseSession, MatchMarks, MemoryDifficultyStore,
    LevelBounds, RoundController, RoundEvent, RoundSummary, SessionLog, StroopFocus, TaskSwitch,
    TaskSwitchConfig, TrialTicket,
};
use synapse_timing::ManualTimer;

fn controller<E: Exercise>(
    exercise: E,
    seed: u64,
) -> (RoundController<E, ManualTimer, StdRng>, ManualTimer) {
    let timer = ManualTimer::new();
    let c = RoundController::new(exercise, timer.clone(), StdRng::seed_from_u64(seed));
    (c, timer)
}

fn summary_of<S>(events: Vec<RoundEvent<S>>) -> Option<RoundSummary> {
    events.into_iter().find_map(|event| match event {
        RoundEvent::RoundComplete(summary) => Some(summary),
        _ => None,
    })
}

/// Plays a round where `answer` decides each response (None lets the trial
/// time out).
fn play<E, F>(
    c: &mut RoundController<E, ManualTimer, StdRng>,
    timer: &ManualTimer,
    level: u32,
    mut answer: F,
) -> RoundSummary
where
    E: Exercise,
    F: FnMut(&E, &Trial<E::Stimulus>, E::Response) -> Option<E::Response>,
{
    c.start(level).unwrap();
    loop {
        let trial = c.current_trial().cloned().expect("round in progress");
        let expected = c.expected_response().unwrap();
        let events = match answer(c.exercise(), &trial, expected) {
            Some(response) => {
                timer.advance_ms(300);
                c.submit_response(response).unwrap()
            }
            None => {
                let limit = c.current_settings().unwrap().time_limit_ms;
                timer.advance_ms(limit);
                c.update().unwrap()
            }
        };
        if let Some(summary) = summary_of(events) {
            return summary;
        }
    }
}

#[test]
fn results_stay_within_bounds() {
    let mut rng = StdRng::seed_from_u64(99);
    let (mut c, timer) = controller(DualNBack::default(), 1);
    for level in 1..=4 {
        let summary = play(&mut c, &timer, level, |_, _, _| {
            Some(MatchMarks {
                position: rng.random_bool(0.3),
                letter: rng.random_bool(0.3),
            })
        });
        let r = summary.result;
        assert_eq!(r.decisions, 2 * r.total_trials);
        assert!(r.correct_count <= r.decisions);
        assert!((0.0..=100.0).contains(&r.accuracy));
    }

    let (mut c, timer) = controller(StroopFocus::default(), 2);
    for level in 1..=4 {
        let palette = c.exercise().palette(level).to_vec();
        let summary = play(&mut c, &timer, level, |_, _, _| {
            if rng.random_bool(0.2) {
                None
            } else {
                Some(Some(palette[rng.random_range(0..palette.len())]))
            }
        });
        let r = summary.result;
        assert_eq!(r.decisions, r.total_trials);
        assert!(r.correct_count <= r.decisions);
        assert!((0.0..=100.0).contains(&r.accuracy));
    }
}

#[test]
fn two_back_position_match_scores_correct() {
    let game = DualNBack::default();
    let settings = game.settings(2);
    let history: Vec<Trial<GridLetter>> = [(5, 'H'), (1, 'K'), (5, 'T')]
        .into_iter()
        .enumerate()
        .map(|(index, (cell, letter))| Trial {
            index,
            stimulus: GridLetter { cell, letter },
        })
        .collect();
    let marks = MatchMarks {
        position: true,
        letter: false,
    };
    let scores = game.evaluate(&settings, &history, &history[2], &marks);
    assert!(scores.iter().all(|s| s.correct));
}

#[test]
fn stroop_ink_never_equals_word() {
    let game = StroopFocus::default();
    let mut rng = StdRng::seed_from_u64(2024);
    for level in 1..=4 {
        let settings = game.settings(level);
        for _ in 0..1000 {
            let cue = game.generate(&settings, &[], &mut rng);
            assert_ne!(cue.word, cue.ink);
        }
    }
}

#[test]
fn zero_switch_probability_never_switches() {
    let mut config = TaskSwitchConfig::default();
    for level in &mut config.levels {
        level.switch_probability = 0.0;
    }
    let (mut c, timer) = controller(TaskSwitch::new(config).unwrap(), 3);
    let mut rules = Vec::new();
    play(&mut c, &timer, 4, |_, trial, expected| {
        rules.push(trial.stimulus.rule);
        Some(expected)
    });
    assert_eq!(rules.len(), 24);
    assert!(rules.iter().all(|rule| *rule == rules[0]));
}

#[test]
fn high_accuracy_advances_until_max() {
    let (mut c, timer) = controller(DualNBack::default(), 4);
    let summary = play(&mut c, &timer, 2, |_, _, expected| Some(expected));
    assert_eq!(summary.result.accuracy, 100.0);
    assert_eq!(summary.next_level, 3);

    let summary = play(&mut c, &timer, 4, |_, _, expected| Some(expected));
    assert_eq!(summary.next_level, 4);
}

#[test]
fn timeout_counts_once_and_advances() {
    let (mut c, timer) = controller(StroopFocus::default(), 5);
    c.start(1).unwrap();
    let first = c.current_ticket().unwrap();

    timer.advance_ms(4500);
    let events = c.update().unwrap();
    assert_eq!(events.len(), 2);
    let RoundEvent::TrialScored { outcome, .. } = &events[0] else {
        panic!("expected the timed out trial to be scored");
    };
    assert!(outcome.timed_out);
    assert_eq!(outcome.response_ms, 4500.0);
    assert!(matches!(&events[1], RoundEvent::TrialStarted(cue) if cue.trial.index == 1));

    // nothing further fires until the new deadline
    assert!(c.update().unwrap().is_empty());
    assert!(c.on_timeout(first).unwrap().is_empty());
    assert_eq!(c.running_totals(), Some((0, 1, 1)));
    assert_eq!(c.trial_progress(), Some((2, 10)));
}

#[test]
fn unmarked_timeout_before_reference_scores_both_dimensions() {
    let (mut c, timer) = controller(DualNBack::default(), 12);
    c.start(2).unwrap();
    assert_eq!(c.expected_response(), Some(MatchMarks::default()));

    timer.advance_ms(2600);
    let events = c.update().unwrap();
    let RoundEvent::TrialScored { trial, outcome } = &events[0] else {
        panic!("expected the timed out trial to be scored");
    };
    assert_eq!(trial.index, 0);
    assert!(outcome.timed_out);
    assert_eq!(outcome.response_ms, 2600.0);
    assert_eq!(outcome.correct_count(), 2);
    assert!(matches!(&events[1], RoundEvent::TrialStarted(cue) if cue.trial.index == 1));
    assert_eq!(c.running_totals(), Some((2, 2, 1)));
}

#[test]
fn reset_is_idempotent() {
    let (mut c, _) = controller(TaskSwitch::default(), 6);
    c.reset();
    assert_eq!(c.phase(), RoundPhase::Idle);

    c.start(2).unwrap();
    assert!(c.is_clock_armed());
    c.reset();
    c.reset();
    assert_eq!(c.phase(), RoundPhase::Idle);
    assert!(!c.is_clock_armed());
    assert!(c.current_trial().is_none());
    assert!(c.last_summary().is_none());

    // responses after a reset are ignored
    assert!(c.submit_response(None).unwrap().is_empty());
}

#[test]
fn stale_tickets_are_ignored() {
    let (mut c, timer) = controller(StroopFocus::default(), 7);
    c.start(1).unwrap();
    let first = c.current_ticket().unwrap();
    timer.advance_ms(200);
    let answer = c.expected_response().unwrap();
    c.submit_response(answer).unwrap();
    assert!(c.on_timeout(first).unwrap().is_empty());
    assert_eq!(c.running_totals(), Some((1, 1, 0)));

    // a ticket from an abandoned round does not touch the new one
    let previous_round = c.current_ticket().unwrap();
    c.reset();
    c.start(1).unwrap();
    let current = c.current_ticket().unwrap();
    assert_eq!(current.trial, 0);
    assert_ne!(current.round, previous_round.round);
    assert!(c.on_timeout(previous_round).unwrap().is_empty());
    let ticket = TrialTicket {
        round: current.round,
        trial: 0,
    };
    assert_eq!(c.on_timeout(ticket).unwrap().len(), 2);
}

#[test]
fn perfect_participant_climbs_and_stays() {
    let timer = ManualTimer::new();
    let c = RoundController::new(StroopFocus::default(), timer.clone(), StdRng::seed_from_u64(8));
    let mut session = ExerciseSession::new(
        c,
        MemoryDifficultyStore::new(1, stroop_bounds()),
        SessionLog::default(),
    );
    for _ in 0..6 {
        session.start_round().unwrap();
        while session.controller().phase() != RoundPhase::Complete {
            timer.advance_ms(250);
            let answer = session.controller().expected_response().unwrap();
            session.submit(answer).unwrap();
        }
    }
    assert_eq!(session.store().difficulty(), 4);
    let levels: Vec<u32> = session.sink().records().map(|r| r.result.level).collect();
    assert_eq!(levels, vec![1, 2, 3, 4, 4, 4]);
}

#[test]
fn chance_participant_drifts_down() {
    let timer = ManualTimer::new();
    let c = RoundController::new(StroopFocus::default(), timer.clone(), StdRng::seed_from_u64(9));
    let mut session = ExerciseSession::new(
        c,
        MemoryDifficultyStore::new(4, stroop_bounds()),
        SessionLog::default(),
    );
    let mut guesses = StdRng::seed_from_u64(10);
    for _ in 0..6 {
        session.start_round().unwrap();
        while session.controller().phase() != RoundPhase::Complete {
            timer.advance_ms(1000);
            let guess = Colour::POOL[guesses.random_range(0..Colour::POOL.len())];
            session.submit(Some(guess)).unwrap();
        }
    }
    assert_eq!(session.store().difficulty(), 1);
    assert_eq!(session.sink().latest().map(|r| r.result.level), Some(1));
}

fn stroop_bounds() -> LevelBounds {
    StroopFocus::default().bounds()
}
