use arbor_reconciler::{HostBinding, MemoryHost, Scheduler, UnitBudget};
use arbor_vdom::{create_element, props, Child, VNode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn table(rows: usize, revision: usize) -> VNode {
    let body = (0..rows).map(|row| {
        Child::from(create_element(
            "tr",
            props([("class", if row % 2 == 0 { "even" } else { "odd" })]),
            (0..4).map(|col| {
                Child::from(create_element(
                    "td",
                    None,
                    [format!("{}:{}:{}", row, col, revision)],
                ))
            }),
        ))
    });
    create_element("table", None, [Child::from(create_element("tbody", None, body))])
}

fn initial_render(c: &mut Criterion) {
    let element = table(250, 0);

    c.bench_function("initial_render_1000_cells", |b| {
        b.iter(|| {
            let mut host = MemoryHost::new();
            let container = host.create_node("body");
            let mut scheduler = Scheduler::new(host);
            scheduler.render(black_box(element.clone()), container);
            scheduler.flush().unwrap()
        })
    });
}

fn rerender_changed_text(c: &mut Criterion) {
    let mut host = MemoryHost::new();
    let container = host.create_node("body");
    let mut scheduler = Scheduler::new(host);
    scheduler.render(table(250, 0), container);
    scheduler.flush().unwrap();

    let mut revision = 0;
    c.bench_function("rerender_1000_cells", |b| {
        b.iter(|| {
            revision += 1;
            scheduler.host_mut().take_ops();
            scheduler.render(black_box(table(250, revision)), container);
            scheduler.flush().unwrap()
        })
    });
}

fn sliced_render(c: &mut Criterion) {
    let element = table(250, 0);

    c.bench_function("sliced_render_16_units_per_quantum", |b| {
        b.iter(|| {
            let mut host = MemoryHost::new();
            let container = host.create_node("body");
            let mut scheduler = Scheduler::new(host);
            scheduler.render(black_box(element.clone()), container);
            while scheduler.has_pending_work() {
                scheduler.drive_work_loop(&UnitBudget::new(16)).unwrap();
            }
        })
    });
}

criterion_group!(benches, initial_render, rerender_changed_text, sliced_render);
criterion_main!(benches);
