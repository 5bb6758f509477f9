//! The async host loop on a paused clock.

use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use recall_dom::Document;
use recall_engine::{
    Disposition, LifecycleConfig, LifecycleController, PageEvent, PhaseKind, RecordingNotifier,
    StaticCommands, run,
};
use recall_types::{Key, KeyEvent};
use tokio::sync::mpsc;
use url::Url;

use crate::common::{CLAUDE_PAGE, document};

const INPUT: &str = r#"[data-testid="chat-input"]"#;

#[tokio::test(start_paused = true)]
async fn late_input_then_navigation() {
    let doc = document("https://claude.ai/chat/1", "<main></main>");
    let notifier = Rc::new(RecordingNotifier::new());
    let controller = LifecycleController::new(
        doc.clone(),
        LifecycleConfig::default(),
        Rc::new(StaticCommands::default()),
        notifier.clone(),
    );

    let (events, events_rx) = mpsc::unbounded_channel();
    let (reports_tx, mut reports) = mpsc::unbounded_channel();
    let local = tokio::task::LocalSet::new();
    let handle = local.spawn_local(run(controller, events_rx, Some(reports_tx)));

    let up = |target| PageEvent::KeyDown {
        target,
        event: KeyEvent::plain(Key::ArrowUp),
    };

    local
        .run_until(async {
            // Nothing to attach to yet.
            tokio::time::sleep(Duration::from_millis(1200)).await;
            events.send(up(None)).unwrap();
            assert_eq!(reports.recv().await.unwrap().1, Disposition::PassThrough);

            doc.set_markup(CLAUDE_PAGE);
            tokio::time::sleep(Duration::from_millis(400)).await;
            let input = doc.query_selector(INPUT);
            events.send(up(input)).unwrap();
            assert_eq!(reports.recv().await.unwrap().1, Disposition::Consumed);
            assert_eq!(doc.text_content(input.unwrap()), "show an example");
            assert_eq!(notifier.visible().as_deref(), Some("2/2"));

            doc.set_location(Url::parse("https://claude.ai/chat/2").unwrap());
            events.send(PageEvent::DomMutated).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(notifier.visible(), None);

            tokio::time::sleep(Duration::from_millis(500)).await;
            events.send(up(doc.query_selector(INPUT))).unwrap();
            assert_eq!(reports.recv().await.unwrap().1, Disposition::Consumed);
        })
        .await;

    drop(events);
    let controller = local.run_until(handle).await.unwrap();
    assert_eq!(controller.phase(), PhaseKind::Inert);
}
