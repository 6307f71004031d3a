use super::*;
use crate::{RecordingStage, Timings};

fn controller() -> JourneyController<RecordingStage> {
    JourneyController::new(JourneyLayout::default(), RecordingStage::new()).unwrap()
}

#[test]
fn actions_parse_from_compact_syntax() {
    assert_eq!("start".parse::<Action>().unwrap(), Action::Start);
    assert_eq!(" resize ".parse::<Action>().unwrap(), Action::Resize);
    assert_eq!(
        "advance:3".parse::<Action>().unwrap(),
        Action::Advance(CardIndex(3))
    );
    assert_eq!(
        "close: 1".parse::<Action>().unwrap(),
        Action::Close(CardIndex(1))
    );
    assert_eq!(
        "reopen:0".parse::<Action>().unwrap(),
        Action::Reopen(CardIndex(0))
    );
    assert!("advance".parse::<Action>().is_err());
    assert!("advance:x".parse::<Action>().is_err());
    assert!("jump:1".parse::<Action>().is_err());
}

#[test]
fn actions_serialize_with_tag_and_card() {
    let s = serde_json::to_string(&Action::Advance(CardIndex(2))).unwrap();
    assert_eq!(s, r#"{"action":"advance","card":2}"#);
    let a: Action = serde_json::from_str(r#"{"action":"start"}"#).unwrap();
    assert_eq!(a, Action::Start);
}

#[test]
fn new_rejects_invalid_layout() {
    let mut layout = JourneyLayout::default();
    layout.card_count = 0;
    assert!(JourneyController::new(layout, RecordingStage::new()).is_err());
}

#[tokio::test(start_paused = true)]
async fn commands_before_start_are_ignored() {
    let c = controller();
    assert_eq!(
        c.advance(CardIndex(0)).await,
        CommandOutcome::Ignored(IgnoreReason::NotStarted)
    );
    assert_eq!(
        c.close_card(CardIndex(0)),
        CommandOutcome::Ignored(IgnoreReason::NotStarted)
    );
    assert_eq!(
        c.reopen_card(CardIndex(0)).await,
        CommandOutcome::Ignored(IgnoreReason::NotVisited)
    );
    assert!(c.stage().intents().is_empty());
}

#[tokio::test(start_paused = true)]
async fn init_parks_marker_and_centers_start_prompt() {
    let c = controller();
    c.init().await;
    let stage = c.stage();
    let intents = stage.intents();
    assert_eq!(intents[0], Intent::SetPathVisible { visible: false });
    assert!(matches!(intents[1], Intent::PlaceStartBoard { at } if at == Point::new(640.0, 220.0)));
    assert_eq!(
        intents[2],
        Intent::MoveMarker {
            at: Point::new(200.0, 100.0)
        }
    );
    // Start prompt center is at absolute y = 220, above half a viewport: clamped to 0.
    assert_eq!(stage.scrolls(), vec![(0.0, ScrollBehavior::Instant)]);
}

#[tokio::test(start_paused = true)]
async fn start_twice_is_ignored() {
    let c = controller();
    assert!(matches!(
        c.start_journey().await,
        CommandOutcome::Animated { .. }
    ));
    assert_eq!(
        c.start_journey().await,
        CommandOutcome::Ignored(IgnoreReason::AlreadyStarted)
    );
}

#[tokio::test(start_paused = true)]
async fn advance_is_ignored_while_a_hop_sequence_runs() {
    let c = controller();
    c.start_journey().await;

    let (hop, adv) = tokio::join!(c.run_segment(SegmentIndex(1)), async {
        tokio::task::yield_now().await;
        c.advance(CardIndex(0)).await
    });
    assert!(matches!(hop, SegmentOutcome::Completed { .. }));
    assert_eq!(adv, CommandOutcome::Ignored(IgnoreReason::Busy));
}

#[tokio::test(start_paused = true)]
async fn close_hides_card_and_marker_and_leaves_reopen_marker() {
    let c = controller();
    c.start_journey().await;
    c.stage_mut().take_intents();

    assert_eq!(c.close_card(CardIndex(0)), CommandOutcome::Instant);
    let snap = c.snapshot();
    assert_eq!(snap.active_card, None);
    assert!(!snap.marker.visible);

    let stage = c.stage();
    let at = snap.checkpoints[1];
    assert_eq!(
        stage.intents(),
        &[
            Intent::HideCard { card: CardIndex(0) },
            Intent::ShowReopenMarker {
                card: CardIndex(0),
                at,
                anchor: crate::ReopenAnchor::Center,
            },
            Intent::SetMarkerVisible { visible: false },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_cards_are_ignored() {
    let c = controller();
    c.start_journey().await;
    assert_eq!(
        c.advance(CardIndex(99)).await,
        CommandOutcome::Ignored(IgnoreReason::UnknownCard)
    );
    assert_eq!(
        c.reopen_card(CardIndex(99)).await,
        CommandOutcome::Ignored(IgnoreReason::UnknownCard)
    );
}

#[tokio::test]
async fn instant_timings_never_suspend_the_journey() {
    let mut layout = JourneyLayout::default();
    layout.timings = Timings::instant();
    let c = JourneyController::new(layout, RecordingStage::new()).unwrap();
    // No paused clock here: any real sleep would make this test slow, not wrong.
    c.init().await;
    for action in ["start", "advance:0", "advance:1", "close:2", "reopen:0"] {
        c.dispatch(action.parse().unwrap()).await;
    }
    let snap = c.snapshot();
    assert_eq!(snap.visited, vec![CardIndex(0), CardIndex(1), CardIndex(2)]);
    assert_eq!(snap.active_card, Some(CardIndex(0)));
}

#[tokio::test(start_paused = true)]
async fn advance_only_moves_on_from_the_open_card() {
    let c = controller();
    c.start_journey().await;
    let before = c.snapshot();
    c.stage_mut().take_intents();

    assert_eq!(
        c.advance(CardIndex(3)).await,
        CommandOutcome::Ignored(IgnoreReason::NotActive)
    );
    assert!(c.stage().intents().is_empty());
    assert_eq!(c.snapshot(), before);

    assert_eq!(c.close_card(CardIndex(0)), CommandOutcome::Instant);
    assert_eq!(
        c.advance(CardIndex(0)).await,
        CommandOutcome::Ignored(IgnoreReason::NotActive)
    );
    assert_eq!(c.snapshot().unlocked, before.unlocked);
    assert_eq!(c.stage().count(|i| matches!(i, Intent::HideCard { .. })), 1);
}

#[tokio::test(start_paused = true)]
async fn close_requires_the_open_card_and_no_hop_in_flight() {
    let c = controller();
    c.start_journey().await;
    c.stage_mut().take_intents();

    assert_eq!(
        c.close_card(CardIndex(1)),
        CommandOutcome::Ignored(IgnoreReason::NotActive)
    );
    assert!(c.stage().intents().is_empty());

    let (adv, close) = tokio::join!(c.advance(CardIndex(0)), async {
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        let out = c.close_card(CardIndex(1));
        (out, c.is_animating(), c.snapshot().marker.visible)
    });
    assert!(matches!(adv, CommandOutcome::Animated { .. }));
    assert_eq!(close, (CommandOutcome::Ignored(IgnoreReason::Busy), true, true));

    assert_eq!(c.snapshot().active_card, Some(CardIndex(1)));
    assert_eq!(c.close_card(CardIndex(1)), CommandOutcome::Instant);
    assert_eq!(
        c.close_card(CardIndex(1)),
        CommandOutcome::Ignored(IgnoreReason::NotActive)
    );
}

#[tokio::test(start_paused = true)]
async fn reopen_closes_the_open_card_first() {
    let c = controller();
    c.start_journey().await;
    c.advance(CardIndex(0)).await;
    c.stage_mut().take_intents();

    assert_eq!(c.reopen_card(CardIndex(0)).await, CommandOutcome::Instant);
    let shown: Vec<Intent> = c
        .stage()
        .intents()
        .iter()
        .filter(|i| matches!(i, Intent::ShowCard { .. } | Intent::HideCard { .. }))
        .cloned()
        .collect();
    assert_eq!(
        shown,
        vec![
            Intent::HideCard { card: CardIndex(1) },
            Intent::ShowCard { card: CardIndex(0) },
        ]
    );

    // Reopening the open card only re-centers.
    c.stage_mut().take_intents();
    assert_eq!(c.reopen_card(CardIndex(0)).await, CommandOutcome::Instant);
    assert_eq!(c.stage().count(|i| matches!(i, Intent::ShowCard { .. })), 0);
    assert!(!c.stage().scrolls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropped_first_hop_leaves_the_journey_startable() {
    let c = controller();

    let (start, hop) = tokio::join!(c.start_journey(), async {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        c.run_segment(SegmentIndex(0)).await
    });
    assert_eq!(start, CommandOutcome::Ignored(IgnoreReason::Busy));
    assert!(matches!(hop, SegmentOutcome::Completed { .. }));
    assert!(!c.snapshot().started);
    assert_eq!(c.snapshot().active_card, None);

    assert!(matches!(
        c.start_journey().await,
        CommandOutcome::Animated { .. }
    ));
    assert_eq!(c.snapshot().active_card, Some(CardIndex(0)));
}
