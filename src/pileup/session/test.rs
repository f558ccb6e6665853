use std::num::NonZeroU8;
use std::time::Duration;

use assert_matches::assert_matches;

use super::*;
use crate::pileup::{Card, ConfigError, Pattern, DECK_SIZE};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn config() -> Config {
    Config {
        autoplay_interval_ms: 100,
        collect_delay_ms: 50,
        penalty_delay_ms: 30,
        message_ms: 200,
        seed: Some(1),
    }
}

/// Builds a complete deal, with the specified ranks at the front of each deck.
fn deal(player_front: &[u8], cpu_front: &[u8]) -> Deal {
    let mut pool: Vec<Card> = Deck::default().into_iter().collect();
    let mut take = |r: u8| {
        let idx = pool.iter().position(|c| c.rank.value() == r).unwrap();
        pool.remove(idx)
    };
    let mut player: Vec<Card> = player_front.iter().map(|&r| take(r)).collect();
    let mut cpu: Vec<Card> = cpu_front.iter().map(|&r| take(r)).collect();
    let fill = 20 - player.len();
    player.extend(pool.drain(..fill));
    cpu.extend(pool.drain(..));
    Deal { player, cpu }
}

fn session(player_front: &[u8], cpu_front: &[u8]) -> (Session, Instant) {
    let t0 = Instant::now();
    let mut session = Session::new(config(), t0).unwrap();
    session
        .new_game_with(deal(player_front, cpu_front), t0)
        .unwrap();
    (session, t0)
}

fn pile_ranks(session: &Session) -> Vec<u8> {
    session.snapshot().pile.iter().map(|(r, _)| r.value()).collect()
}

fn counts(session: &Session) -> (usize, usize) {
    let snapshot = session.snapshot();
    (snapshot.player_cards, snapshot.cpu_cards)
}

#[test]
fn test_new_session() {
    let t0 = Instant::now();
    let session = Session::new(config(), t0).unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.player_cards, 20);
    assert_eq!(snapshot.cpu_cards, 20);
    assert!(snapshot.pile.is_empty());
    assert_eq!(
        snapshot.state,
        TurnState::Normal {
            to_play: Side::Player
        }
    );
    assert_eq!(snapshot.message, None);
    assert!(!snapshot.game_over);
    assert_eq!(snapshot.winner, None);
    assert_eq!(session.next_deadline(), Some(t0 + ms(100)));
}

#[test]
fn test_seeded_sessions_match() {
    let t0 = Instant::now();
    let mut a = Session::new(config(), t0).unwrap();
    let mut b = Session::new(config(), t0).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.new_game(t0), b.new_game(t0));
}

#[test]
fn test_invalid_deal_rejected() {
    let (mut session, t0) = session(&[], &[]);
    let mut bad = deal(&[], &[]);
    bad.cpu.pop();
    assert_matches!(
        session.new_game_with(bad, t0),
        Err(SetupError::UnevenDeal { .. })
    );
}

#[test]
fn test_zero_interval_rejected() {
    let t0 = Instant::now();
    let zero = Config {
        autoplay_interval_ms: 0,
        ..config()
    };
    assert_matches!(
        Session::new(zero.clone(), t0),
        Err(SetupError::Config(ConfigError::ZeroInterval))
    );
    assert_matches!(
        Session::with_deal(zero, deal(&[], &[]), t0),
        Err(SetupError::Config(ConfigError::ZeroInterval))
    );
}

#[test]
fn test_autoplay() {
    let (mut session, t0) = session(&[7], &[8]);
    assert!(!session.tick(t0 + ms(99)));
    assert!(session.tick(t0 + ms(100)));
    assert_eq!(counts(&session), (19, 20));
    assert_eq!(session.snapshot().pile, vec![(card_rank(7), Side::Player)]);
    assert!(session.tick(t0 + ms(200)));
    assert_eq!(pile_ranks(&session), vec![7, 8]);
    assert_eq!(
        session.state(),
        &TurnState::Normal {
            to_play: Side::Player
        }
    );
    let played: Vec<_> = std::iter::from_fn(|| session.pop_event()).collect();
    assert_matches!(
        played.as_slice(),
        [
            Event::Played {
                side: Side::Player,
                ..
            },
            Event::Played { side: Side::Cpu, .. }
        ]
    );
}

fn card_rank(r: u8) -> Rank {
    Rank::try_from(r).unwrap()
}

#[test]
fn test_collect_after_delay() {
    let (mut session, t0) = session(&[2, 9], &[5, 6]);
    session.tick(t0 + ms(100));
    assert_eq!(
        session.state(),
        &TurnState::Forced {
            to_play: Side::Cpu,
            flips_remaining: NonZeroU8::new(2).unwrap(),
        }
    );
    session.tick(t0 + ms(200));
    session.tick(t0 + ms(300));
    assert_eq!(
        session.state(),
        &TurnState::Collecting {
            beneficiary: Side::Player
        }
    );
    assert_eq!(session.next_deadline(), Some(t0 + ms(350)));

    assert!(!session.tick(t0 + ms(349)));
    assert_eq!(pile_ranks(&session), vec![2, 5, 6]);

    assert!(session.tick(t0 + ms(350)));
    assert!(session.pile().is_empty());
    assert_eq!(counts(&session), (22, 18));
    assert_eq!(
        session.state(),
        &TurnState::Normal {
            to_play: Side::Player
        }
    );

    // The beneficiary leads on the next tick.
    session.tick(t0 + ms(400));
    assert_eq!(session.snapshot().pile, vec![(card_rank(9), Side::Player)]);
}

#[test]
fn test_claim_match() {
    let (mut session, t0) = session(&[4], &[6]);
    session.tick(t0 + ms(100));
    session.tick(t0 + ms(200));
    assert_eq!(session.claim(t0 + ms(250)), Claim::Matched(Pattern::Ten));

    let snapshot = session.snapshot();
    assert_eq!((snapshot.player_cards, snapshot.cpu_cards), (21, 19));
    assert!(snapshot.pile.is_empty());
    assert_eq!(snapshot.message.as_deref(), Some("THE TEN!"));
    assert_eq!(
        snapshot.state,
        TurnState::Normal {
            to_play: Side::Player
        }
    );

    // Autoplay waits for the message to clear.
    assert_eq!(session.next_deadline(), Some(t0 + ms(450)));
    assert!(!session.tick(t0 + ms(449)));
    assert_eq!(counts(&session), (21, 19));
    assert!(session.tick(t0 + ms(450)));
    assert_eq!(session.message(), None);
    assert!(!session.tick(t0 + ms(549)));
    session.tick(t0 + ms(550));
    assert_eq!(counts(&session), (20, 19));
}

#[test]
fn test_false_claim() {
    let (mut session, t0) = session(&[3], &[8]);
    session.tick(t0 + ms(100));
    session.tick(t0 + ms(200));
    let before = session.state().clone();
    assert_eq!(pile_ranks(&session), vec![3, 8]);

    assert_eq!(session.claim(t0 + ms(210)), Claim::Missed);
    assert_eq!(session.message(), Some("NO MATCH!"));
    // Only one penalty at a time.
    assert_eq!(session.claim(t0 + ms(215)), Claim::Ignored);

    assert!(!session.tick(t0 + ms(239)));
    assert_eq!(counts(&session), (19, 19));
    assert!(session.tick(t0 + ms(240)));
    assert_eq!(counts(&session), (18, 20));
    assert_eq!(session.state(), &before);
    assert_eq!(session.message(), None);
    assert_eq!(pile_ranks(&session), vec![3, 8]);

    // Autoplay picks up again after the penalty.
    assert!(!session.tick(t0 + ms(339)));
    session.tick(t0 + ms(340));
    assert_eq!(pile_ranks(&session).len(), 3);
}

#[test]
fn test_claim_ignored_while_collecting() {
    let (mut session, t0) = session(&[1], &[5]);
    session.tick(t0 + ms(100));
    session.tick(t0 + ms(200));
    assert_matches!(session.state(), TurnState::Collecting { .. });
    assert_eq!(session.claim(t0 + ms(210)), Claim::Ignored);
    assert_eq!(counts(&session), (19, 19));
}

#[test]
fn test_pause_defers_collect() {
    let (mut session, t0) = session(&[2, 9], &[5, 6]);
    for t in [100, 200, 300] {
        session.tick(t0 + ms(t));
    }
    assert!(session.pause());
    assert!(!session.tick(t0 + ms(1000)));
    assert!(session.snapshot().state.is_paused());
    assert_eq!(pile_ranks(&session), vec![2, 5, 6]);

    assert!(session.resume(t0 + ms(1000)));
    assert_eq!(
        session.state(),
        &TurnState::Collecting {
            beneficiary: Side::Player
        }
    );
    assert_eq!(session.next_deadline(), Some(t0 + ms(1050)));
    session.tick(t0 + ms(1050));
    assert_eq!(counts(&session), (22, 18));
}

#[test]
fn test_pause_resume_round_trip() {
    let (mut session, t0) = session(&[3], &[8]);
    session.tick(t0 + ms(100));
    session.tick(t0 + ms(200));
    let before = session.snapshot();

    assert!(session.toggle_pause(t0 + ms(210)));
    assert!(!session.pause());
    session.tick(t0 + ms(900));
    assert_eq!(counts(&session), (19, 19));
    assert_eq!(session.claim(t0 + ms(950)), Claim::Ignored);

    assert!(session.toggle_pause(t0 + ms(1000)));
    assert_eq!(session.snapshot(), before);
    assert!(!session.resume(t0 + ms(1000)));
}

#[test]
fn test_new_game_cancels_pending() {
    let (mut session, t0) = session(&[2, 9], &[5, 6]);
    for t in [100, 200, 300] {
        session.tick(t0 + ms(t));
    }
    assert_eq!(session.next_deadline(), Some(t0 + ms(350)));

    session.new_game_with(deal(&[7], &[8]), t0 + ms(310)).unwrap();
    assert!(!session.tick(t0 + ms(360)));
    assert_eq!(counts(&session), (20, 20));
    assert!(session.pile().is_empty());
    assert_eq!(session.next_deadline(), Some(t0 + ms(410)));
}

#[test]
fn test_new_game_cancels_penalty() {
    let (mut session, t0) = session(&[3], &[8]);
    session.tick(t0 + ms(100));
    session.tick(t0 + ms(200));
    assert_eq!(session.claim(t0 + ms(210)), Claim::Missed);

    session.new_game(t0 + ms(220));
    assert_eq!(session.message(), None);
    session.tick(t0 + ms(300));
    assert_eq!(counts(&session), (20, 20));
    // Claims are heard again.
    assert_eq!(session.claim(t0 + ms(300)), Claim::Missed);
}

#[test]
fn test_plays_to_completion() {
    let t0 = Instant::now();
    let mut session = Session::new(config(), t0).unwrap();
    let mut steps = 0;
    while let Some(deadline) = session.next_deadline() {
        session.tick(deadline);
        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.player_cards + snapshot.cpu_cards + snapshot.pile.len(),
            DECK_SIZE
        );
        steps += 1;
        assert!(steps < 200_000, "game did not finish");
    }
    let snapshot = session.snapshot();
    assert!(snapshot.game_over);
    let loser_cards = match snapshot.winner {
        Some(Side::Player) => snapshot.cpu_cards,
        Some(Side::Cpu) => snapshot.player_cards,
        None => unreachable!(),
    };
    assert_eq!(loser_cards, 0);
    // Nothing is left running.
    assert!(!session.tick(t0 + Duration::from_secs(1_000_000)));
}
