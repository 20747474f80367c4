use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use kudos::{
    domain::{DisplayState, NotificationCard},
    notifications::{AchievementDisplay, Renderer, TokioTimer},
    service::ServiceContext,
};

const DWELL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Shown(String, Instant),
    Cleared(Instant),
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Seen>>,
}

impl Renderer for Recorder {
    fn show(&self, card: &NotificationCard, _expires_at: Instant) {
        self.seen.lock().push(Seen::Shown(card.title.clone(), Instant::now()));
    }

    fn clear(&self) {
        self.seen.lock().push(Seen::Cleared(Instant::now()));
    }
}

fn mount(context: &ServiceContext, recorder: &Arc<Recorder>) -> kudos::notifications::MountedDisplay {
    AchievementDisplay::new(
        context.queue.clone(),
        Arc::new(TokioTimer::current()),
        recorder.clone(),
        DWELL,
    )
    .mount()
}

#[tokio::test(start_paused = true)]
async fn test_two_achievements_in_one_turn() -> anyhow::Result<()> {
    let context = ServiceContext::new(None);
    let recorder = Arc::new(Recorder::default());
    let display = mount(&context, &recorder);
    let start = Instant::now();

    context.achievement_service.trigger_achievement("First Steps", "Completed onboarding", 10);
    context.achievement_service.trigger_achievement("Quick Learner", "Finished first module", 20);

    tokio::time::sleep(Duration::from_secs(11)).await;

    assert_eq!(
        *recorder.seen.lock(),
        vec![
            Seen::Shown("First Steps".to_string(), start),
            Seen::Cleared(start + DWELL),
            Seen::Shown("Quick Learner".to_string(), start + DWELL),
            Seen::Cleared(start + DWELL * 2),
        ]
    );
    assert_eq!(display.state(), DisplayState::Idle);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_staggered_producers_keep_order() -> anyhow::Result<()> {
    let context = Arc::new(ServiceContext::new(None));
    let recorder = Arc::new(Recorder::default());
    let _display = mount(&context, &recorder);

    let mut producers = Vec::new();
    for batch in 0..3u32 {
        let context = context.clone();
        producers.push(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500 * u64::from(batch))).await;
            for i in 0..3 {
                context.achievement_service.trigger_achievement(
                    format!("batch {} #{}", batch, i),
                    "",
                    batch * 10 + i,
                );
            }
        }));
    }
    for producer in producers {
        producer.await?;
    }

    tokio::time::sleep(DWELL * 10).await;

    let titles: Vec<String> = recorder
        .seen
        .lock()
        .iter()
        .filter_map(|seen| match seen {
            Seen::Shown(title, _) => Some(title.clone()),
            Seen::Cleared(_) => None,
        })
        .collect();
    let expected: Vec<String> = (0..3)
        .flat_map(|batch| (0..3).map(move |i| format!("batch {} #{}", batch, i)))
        .collect();
    assert_eq!(titles, expected);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unmount_stops_the_dwell_timer() -> anyhow::Result<()> {
    let context = ServiceContext::new(None);
    let recorder = Arc::new(Recorder::default());
    let display = mount(&context, &recorder);

    context.achievement_service.trigger_achievement("Streak", "Seven days in a row", 7);
    context.achievement_service.trigger_achievement("Helper", "Answered a question", 3);
    tokio::time::sleep(Duration::from_secs(1)).await;
    display.unmount();

    let after_unmount = recorder.seen.lock().len();
    tokio::time::sleep(DWELL * 4).await;

    assert_eq!(after_unmount, 2);
    assert_eq!(recorder.seen.lock().len(), 2);
    assert_eq!(context.channel.listener_count(), 0);

    // Later triggers wait in the shared queue for the next display.
    context.achievement_service.trigger_achievement("Night Owl", "Posted after midnight", 1);
    assert_eq!(context.queue.len(), 1);

    Ok(())
}
