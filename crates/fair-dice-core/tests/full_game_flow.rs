//! Integration tests for the full game flow.
//!
//! These tests play complete games through the public API, the way the
//! terminal front end drives it.

use fair_dice_core::{
    game::{pick_computer_die, throw_face},
    probability_matrix, win_probability, Commitment, DiceConfiguration, Error, FairRandomRound,
    GameResult, MacTag, MoveOrder, Participant, SecretKey,
};

fn classic_dice() -> Vec<DiceConfiguration> {
    ["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect()
}

/// Run one round the way an honest user does: record the published tag,
/// contribute, then check the reveal against what was published
fn play_round(range: u32, peer_value: u32) -> fair_dice_core::Reveal {
    let mut round = FairRandomRound::start(range).unwrap();
    let published = round.mac().to_string();

    round.contribute(peer_value).unwrap();
    let reveal = round.reveal().unwrap();

    // The user only has hex strings to work with
    let mac: MacTag = published.parse().unwrap();
    let key: SecretKey = reveal.secret_key.to_string().parse().unwrap();
    assert!(Commitment::verify(&mac, &key, reveal.self_value));
    assert_eq!(reveal.result, (reveal.self_value + peer_value) % range);
    reveal
}

#[test]
fn test_full_game() {
    let dice = classic_dice();
    let matrix = probability_matrix(&dice);
    assert_eq!(matrix.size(), 3);

    // Phase 1: move order
    let toss = play_round(2, 1);
    let order = MoveOrder::from_reveal(&toss).unwrap();
    assert_eq!(
        order.first == Participant::User,
        toss.self_value == 1,
        "user moves first exactly when the guess matches"
    );

    // Phase 2: die selection, first mover picks from all dice
    let mut available: Vec<usize> = (0..dice.len()).collect();
    let mut picks = Vec::new();
    for participant in order.sequence() {
        let pick = match participant {
            Participant::Computer => pick_computer_die(&available).unwrap(),
            Participant::User => available[0],
        };
        available.retain(|&i| i != pick);
        picks.push((participant, pick));
    }
    assert_ne!(picks[0].1, picks[1].1);

    // Phase 3: throws, first mover throws first
    let mut faces = Vec::new();
    for (i, (participant, pick)) in picks.iter().enumerate() {
        let reveal = play_round(6, i as u32 + 2);
        let face = throw_face(&dice[*pick], &reveal).unwrap();
        assert!(dice[*pick].faces().contains(&face));
        faces.push((*participant, face));
    }

    // Phase 4: judge
    let face_of = |who: Participant| faces.iter().find(|(p, _)| *p == who).unwrap().1;
    let computer = face_of(Participant::Computer);
    let user = face_of(Participant::User);
    match GameResult::judge(computer, user) {
        GameResult::ComputerWins => assert!(computer > user),
        GameResult::UserWins => assert!(user > computer),
        GameResult::Draw => assert_eq!(user, computer),
    }
}

#[test]
fn test_documented_probability_for_classic_set() {
    let dice = classic_dice();

    assert_eq!(format!("{:.4}", win_probability(&dice[1], &dice[0])), "0.4444");
    assert_eq!(format!("{:.4}", win_probability(&dice[0], &dice[1])), "0.5556");

    let rows = probability_matrix(&dice).to_f64_rows();
    assert_eq!(rows[1][0], 16.0 / 36.0);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row[i], 1.0 / 3.0);
    }
}

#[test]
fn test_abandoned_round_produces_no_result() {
    let mut round = FairRandomRound::start(6).unwrap();
    round.contribute(3).unwrap();

    let aborted = round.abort();
    assert_eq!(aborted.range, 6);
}

#[test]
fn test_out_of_sequence_calls_are_typed_errors() {
    let mut round = FairRandomRound::start(2).unwrap();

    assert!(matches!(round.reveal(), Err(Error::ProtocolState { .. })));
    assert!(matches!(
        FairRandomRound::start(0),
        Err(Error::InvalidRange(0))
    ));
}

#[test]
fn test_independent_rounds_on_threads() {
    let handles: Vec<_> = (0..4)
        .map(|peer| {
            std::thread::spawn(move || {
                let mut round = FairRandomRound::start(6).unwrap();
                round.contribute(peer).unwrap();
                round.reveal().unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().verify());
    }
}
