use std::sync::Arc;

use shared::domain::{EventGroupId, EventId};
use tokio::sync::Notify;

use crate::{
    error::ScreenError,
    events::{EventDetail, EventsController, GroupEditView, GroupSubmission},
    state::LoadState,
    test_support::{event, group, FakeEventsGateway, RecordingNotifier},
    validation::ValidationError,
};

fn controller(
    gateway: FakeEventsGateway,
) -> (
    Arc<EventsController>,
    Arc<FakeEventsGateway>,
    Arc<RecordingNotifier>,
) {
    let gateway = Arc::new(gateway);
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = EventsController::new(gateway.clone(), notifier.clone());
    (controller, gateway, notifier)
}

fn seeded() -> FakeEventsGateway {
    FakeEventsGateway::with_data(
        vec![group(1, "Workshops"), group(2, "Talks")],
        vec![
            event(10, "Launch", "2024-03-05T18:30:00Z"),
            event(11, "Retro", "2024-06-01"),
        ],
    )
}

#[tokio::test]
async fn mount_loads_groups_and_events() {
    let (controller, gateway, _) = controller(seeded());
    controller.mount().await.expect("mount");

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.load, LoadState::Ready);
    assert_eq!(snapshot.groups.len(), 2);
    assert_eq!(snapshot.events.len(), 2);
    assert_eq!(snapshot.events[1].date.to_string(), "2024-06-01");
    assert_eq!(gateway.fetch_calls(), 1);
}

#[tokio::test]
async fn partial_fetch_failure_keeps_previous_collections() {
    let (controller, _, notifier) = controller(FakeEventsGateway {
        fail_fetch_events: true,
        ..seeded()
    });

    assert!(controller.mount().await.is_err());

    let snapshot = controller.snapshot().await;
    assert!(matches!(snapshot.load, LoadState::Failed(_)));
    assert!(snapshot.groups.is_empty());
    assert!(snapshot.events.is_empty());
    assert_eq!(notifier.failures(), ["Failed to fetch event data"]);
}

#[tokio::test]
async fn adding_a_group_resets_input_and_refetches() {
    let (controller, gateway, notifier) = controller(seeded());
    controller.mount().await.expect("mount");
    let before = controller.snapshot().await.groups.len();

    controller.set_new_group_name("Meetups").await;
    let outcome = controller.add_group().await.expect("add group");
    assert!(matches!(outcome, GroupSubmission::Created(_)));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.new_group_name, "");
    assert_eq!(snapshot.groups.len(), before + 1);
    assert_eq!(snapshot.groups.last().map(|g| g.group_name.as_str()), Some("Meetups"));
    assert!(!snapshot.is_loading);
    assert_eq!(gateway.fetch_calls(), 2);
    assert_eq!(notifier.successes(), ["Event group created successfully"]);
}

#[tokio::test]
async fn blank_group_name_is_reported_without_gateway_call() {
    let (controller, gateway, notifier) = controller(seeded());
    controller.mount().await.expect("mount");

    let err = controller.add_group().await.expect_err("blank name");
    assert!(matches!(
        err,
        ScreenError::Validation(ValidationError::MissingGroupName)
    ));
    assert_eq!(gateway.create_calls(), 0);
    assert_eq!(gateway.fetch_calls(), 1);
    assert_eq!(notifier.failures(), ["Event group name is required"]);
}

#[tokio::test]
async fn failed_group_create_keeps_input_and_skips_refetch() {
    let (controller, gateway, notifier) = controller(FakeEventsGateway {
        fail_create: true,
        ..seeded()
    });
    controller.mount().await.expect("mount");
    controller.set_new_group_name("Meetups").await;

    assert!(matches!(controller.add_group().await, Err(ScreenError::Gateway(_))));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.new_group_name, "Meetups");
    assert_eq!(snapshot.groups.len(), 2);
    assert!(!snapshot.is_loading);
    assert_eq!(gateway.fetch_calls(), 1);
    assert_eq!(notifier.failures(), ["Failed to create event group"]);
}

#[tokio::test]
async fn second_add_while_loading_is_rejected_as_busy() {
    let gate = Arc::new(Notify::new());
    let (controller, gateway, _) = controller(FakeEventsGateway {
        create_gate: Some(gate.clone()),
        ..seeded()
    });
    controller.mount().await.expect("mount");
    controller.set_new_group_name("Meetups").await;

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.add_group().await }
    });
    while gateway.create_calls() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(controller.snapshot().await.is_loading);

    let second = controller.add_group().await.expect("second add");
    assert_eq!(second, GroupSubmission::Busy);
    assert_eq!(gateway.create_calls(), 1);

    gate.notify_one();
    assert!(matches!(
        first.await.expect("join").expect("first add"),
        GroupSubmission::Created(_)
    ));
    assert_eq!(controller.snapshot().await.groups.len(), 3);
}

#[tokio::test]
async fn saving_an_edit_renames_only_the_target_group() {
    let (controller, gateway, notifier) = controller(seeded());
    controller.mount().await.expect("mount");

    assert!(controller.start_editing(EventGroupId(2)).await);
    assert_eq!(
        controller.snapshot().await.editing,
        Some(GroupEditView {
            id: EventGroupId(2),
            group_name: "Talks".to_string(),
        })
    );
    assert!(controller.edit_group_name("Keynotes").await);

    let ack = controller.save_editing().await.expect("save");
    assert!(ack.is_some());

    let snapshot = controller.snapshot().await;
    let names: Vec<_> = snapshot.groups.iter().map(|g| g.group_name.as_str()).collect();
    assert_eq!(names, ["Workshops", "Keynotes"]);
    assert_eq!(snapshot.editing, None);
    assert_eq!(gateway.update_calls(), 1);
    assert_eq!(notifier.successes(), ["Event group updated successfully"]);
}

#[tokio::test]
async fn cancelling_an_edit_discards_the_draft() {
    let (controller, gateway, _) = controller(seeded());
    controller.mount().await.expect("mount");

    controller.start_editing(EventGroupId(1)).await;
    controller.edit_group_name("Renamed").await;
    controller.cancel_editing().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.editing, None);
    assert_eq!(snapshot.groups[0].group_name, "Workshops");
    assert_eq!(gateway.update_calls(), 0);
    assert_eq!(controller.save_editing().await.expect("no-op"), None);
}

#[tokio::test]
async fn failed_update_keeps_the_row_in_edit_mode() {
    let (controller, _, notifier) = controller(FakeEventsGateway {
        fail_update: true,
        ..seeded()
    });
    controller.mount().await.expect("mount");
    controller.start_editing(EventGroupId(1)).await;
    controller.edit_group_name("Labs").await;

    assert!(controller.save_editing().await.is_err());

    let snapshot = controller.snapshot().await;
    assert_eq!(
        snapshot.editing.map(|editing| editing.group_name),
        Some("Labs".to_string())
    );
    assert_eq!(snapshot.groups[0].group_name, "Workshops");
    assert_eq!(notifier.failures(), ["Failed to update event group"]);
}

#[tokio::test]
async fn editing_unknown_group_is_refused() {
    let (controller, _, _) = controller(seeded());
    controller.mount().await.expect("mount");

    assert!(!controller.start_editing(EventGroupId(99)).await);
    assert!(!controller.edit_group_name("Nope").await);
}

#[tokio::test]
async fn event_detail_tracks_selection() {
    let (controller, _, _) = controller(seeded());
    controller.mount().await.expect("mount");

    assert!(controller.view_event(EventId(11)).await);
    match controller.snapshot().await.detail {
        Some(EventDetail::Existing(event)) => assert_eq!(event.event_name, "Retro"),
        other => panic!("unexpected detail: {other:?}"),
    }

    controller.open_new_event().await;
    assert_eq!(controller.snapshot().await.detail, Some(EventDetail::New));

    controller.close_event().await;
    assert_eq!(controller.snapshot().await.detail, None);
    assert!(!controller.view_event(EventId(404)).await);
}

#[tokio::test]
async fn unmount_stops_pending_group_create_from_touching_state() {
    let gate = Arc::new(Notify::new());
    let (controller, gateway, notifier) = controller(FakeEventsGateway {
        create_gate: Some(gate.clone()),
        ..seeded()
    });
    controller.mount().await.expect("mount");
    controller.set_new_group_name("Meetups").await;

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.add_group().await }
    });
    while gateway.create_calls() == 0 {
        tokio::task::yield_now().await;
    }
    controller.unmount();

    assert!(matches!(
        pending.await.expect("join"),
        Err(ScreenError::Cancelled)
    ));
    assert_eq!(gateway.fetch_calls(), 1);
    assert_eq!(controller.snapshot().await.new_group_name, "Meetups");
    assert!(notifier.toasts().is_empty());
}
