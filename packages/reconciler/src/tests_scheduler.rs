/// Scheduler tests: quantum boundaries, restarts, failure pinning and
/// generation bookkeeping
use crate::*;
use arbor_vdom::{create_element, props, Child, Component, ComponentError, Props, VNode};
use std::cell::Cell;
use std::rc::Rc;

fn setup() -> (Scheduler<MemoryHost>, NodeId) {
    let mut host = MemoryHost::new();
    let container = host.create_node("body");
    host.take_ops();
    (Scheduler::new(host), container)
}

fn list(items: &[&str]) -> VNode {
    create_element(
        "ul",
        None,
        items
            .iter()
            .map(|item| Child::from(create_element("li", None, [*item]))),
    )
}

#[test]
fn test_render_does_not_touch_host() {
    let (mut scheduler, container) = setup();
    scheduler.render(list(&["a"]), container);

    assert!(scheduler.has_pending_work());
    assert_eq!(scheduler.next_unit(), Some(FiberId::ROOT));
    assert!(scheduler.host().ops().is_empty());
    assert!(scheduler.current_root().is_none());
}

#[test]
fn test_idle_without_render() {
    let (mut scheduler, _) = setup();
    assert_eq!(scheduler.flush().unwrap(), WorkStatus::Idle);
    assert!(!scheduler.has_pending_work());
}

#[test]
fn test_exhausted_deadline_makes_no_progress() {
    let (mut scheduler, container) = setup();
    scheduler.render(list(&["a"]), container);

    let status = scheduler.drive_work_loop(&|| 0.5).unwrap();
    assert_eq!(status, WorkStatus::Yielded { performed: 0 });
    assert!(status.needs_reschedule());
    assert_eq!(scheduler.next_unit(), Some(FiberId::ROOT));
}

#[test]
fn test_yield_threshold_from_config() {
    let mut host = MemoryHost::new();
    let container = host.create_node("body");
    let config = ReconcilerConfig {
        yield_threshold: 10.0,
        ..ReconcilerConfig::default()
    };
    let mut scheduler = Scheduler::with_config(host, config);
    scheduler.render(list(&["a"]), container);

    let status = scheduler.drive_work_loop(&|| 5.0).unwrap();
    assert_eq!(status, WorkStatus::Yielded { performed: 0 });

    let status = scheduler.drive_work_loop(&|| 10.0).unwrap();
    assert!(matches!(status, WorkStatus::Committed(_)));
}

#[test]
fn test_host_untouched_until_commit() {
    let (mut scheduler, container) = setup();
    scheduler.render(list(&["a", "b"]), container);

    // root, ul, li, text, li, text
    for _ in 0..5 {
        let status = scheduler.drive_work_loop(&UnitBudget::new(1)).unwrap();
        assert_eq!(status, WorkStatus::Yielded { performed: 1 });
        assert!(scheduler.host().children(container).is_empty());
        assert!(scheduler
            .host()
            .ops()
            .iter()
            .all(|op| !matches!(op, HostOp::AppendChild { .. })));
    }

    let status = scheduler.drive_work_loop(&UnitBudget::new(1)).unwrap();
    assert_eq!(
        status,
        WorkStatus::Committed(CommitSummary {
            placements: 5,
            updates: 0,
            deletions: 0,
        })
    );
    assert!(!status.needs_reschedule());
    assert_eq!(
        scheduler.host().inner_markup(container),
        "<ul><li>a</li><li>b</li></ul>"
    );
}

#[test]
fn test_render_mid_traversal_restarts() {
    let (mut scheduler, container) = setup();
    scheduler.render(list(&["a"]), container);
    scheduler.flush().unwrap();
    let committed_generation = scheduler.current_root().unwrap().generation();

    scheduler.render(list(&["b", "c"]), container);
    scheduler.drive_work_loop(&UnitBudget::new(3)).unwrap();
    assert!(scheduler.has_pending_work());

    scheduler.render(list(&["d"]), container);
    assert_eq!(scheduler.next_unit(), Some(FiberId::ROOT));
    assert!(scheduler.deletions().is_empty());
    assert_eq!(
        scheduler.current_root().unwrap().generation(),
        committed_generation
    );
    assert_eq!(scheduler.host().inner_markup(container), "<ul><li>a</li></ul>");

    scheduler.flush().unwrap();
    assert_eq!(scheduler.host().inner_markup(container), "<ul><li>d</li></ul>");
    assert_eq!(
        scheduler.current_root().unwrap().base(),
        Some(committed_generation)
    );
}

#[test]
fn test_component_failure_pins_traversal() {
    let attempts = Rc::new(Cell::new(0));
    let counter = Rc::clone(&attempts);
    let flaky = Component::new("Flaky", move |_: &Props| {
        counter.set(counter.get() + 1);
        if counter.get() < 3 {
            Err(ComponentError::new("not ready"))
        } else {
            Ok(create_element("span", None, ["ok"]))
        }
    });

    let (mut scheduler, container) = setup();
    scheduler.render(VNode::component(flaky), container);

    let err = scheduler.flush().unwrap_err();
    assert!(matches!(err, ReconcileError::Component { ref component, .. } if component == "Flaky"));
    let pinned = scheduler.next_unit();
    assert!(pinned.is_some());
    assert!(scheduler.current_root().is_none());

    assert!(scheduler.flush().is_err());
    assert_eq!(scheduler.next_unit(), pinned);

    let status = scheduler.flush().unwrap();
    assert!(matches!(status, WorkStatus::Committed(_)));
    assert_eq!(attempts.get(), 3);
    assert_eq!(scheduler.host().inner_markup(container), "<span>ok</span>");
}

#[test]
fn test_generations_rotate_on_commit() {
    let (mut scheduler, container) = setup();

    scheduler.render(list(&["a"]), container);
    scheduler.flush().unwrap();
    assert_eq!(scheduler.current_root().unwrap().generation(), 1);
    assert!(scheduler.previous_root().is_none());

    scheduler.render(list(&["a"]), container);
    scheduler.flush().unwrap();
    assert_eq!(scheduler.current_root().unwrap().generation(), 2);
    assert_eq!(scheduler.previous_root().unwrap().generation(), 1);
    assert_eq!(scheduler.current_root().unwrap().base(), Some(1));

    let current = scheduler.current_root().unwrap();
    let previous = scheduler.previous_root().unwrap();
    for (_, fiber) in current.iter().skip(1) {
        let alt = fiber.alternate().expect("every position existed before");
        assert_eq!(previous.get(alt).node_type(), fiber.node_type());
        assert_eq!(previous.get(alt).host(), fiber.host());
    }
}

#[test]
fn test_deleted_component_removes_first_host_descendant() {
    let badge = Component::new("Badge", |props: &Props| {
        Ok(create_element("em", None, props.children().to_vec()))
    });

    let (mut scheduler, container) = setup();
    let tree = |with_badge: bool| {
        let mut children = vec![Child::from(create_element("b", None, ["title"]))];
        if with_badge {
            children.push(Child::from(create_element(badge.clone(), None, ["new"])));
        }
        create_element("div", None, children)
    };

    scheduler.render(tree(true), container);
    scheduler.flush().unwrap();
    assert_eq!(
        scheduler.host().inner_markup(container),
        "<div><b>title</b><em>new</em></div>"
    );

    scheduler.host_mut().take_ops();
    scheduler.render(tree(false), container);
    let status = scheduler.flush().unwrap();
    assert!(matches!(status, WorkStatus::Committed(CommitSummary { deletions: 1, .. })));
    assert_eq!(scheduler.host().inner_markup(container), "<div><b>title</b></div>");

    let removals: Vec<&HostOp> = scheduler
        .host()
        .ops()
        .iter()
        .filter(|op| matches!(op, HostOp::RemoveChild { .. }))
        .collect();
    assert_eq!(removals.len(), 1);

    let previous = scheduler.previous_root().unwrap();
    let deleted = previous.get(scheduler.deletions()[0]);
    assert_eq!(deleted.effect(), Effect::Deletion);
    assert!(deleted.host().is_none());
}

#[test]
fn test_discarded_deletion_never_reaches_host() {
    let (mut scheduler, container) = setup();
    scheduler.render(list(&["a", "b"]), container);
    scheduler.flush().unwrap();
    scheduler.host_mut().take_ops();

    // root, ul: the second li is tagged for deletion, then abandoned
    scheduler.render(list(&["a"]), container);
    scheduler.drive_work_loop(&UnitBudget::new(2)).unwrap();
    assert_eq!(scheduler.deletions().len(), 1);
    let stale = scheduler.deletions()[0];
    assert_eq!(
        scheduler.current_root().unwrap().get(stale).effect(),
        Effect::Deletion
    );

    scheduler.render(list(&["a", "b"]), container);
    let status = scheduler.flush().unwrap();

    assert!(matches!(
        status,
        WorkStatus::Committed(CommitSummary { deletions: 0, placements: 0, .. })
    ));
    assert!(scheduler
        .host()
        .ops()
        .iter()
        .all(|op| !matches!(op, HostOp::RemoveChild { .. })));
    assert_eq!(
        scheduler.host().inner_markup(container),
        "<ul><li>a</li><li>b</li></ul>"
    );
}
