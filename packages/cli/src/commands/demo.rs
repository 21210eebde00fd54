use anyhow::{bail, Result};
use arbor_reconciler::{
    CommitSummary, HostBinding, MemoryHost, NodeId, ReconcilerConfig, Scheduler, UnitBudget,
    WorkStatus,
};
use arbor_vdom::{create_element, props, Child, Component, Listener, PropValue, Props, VNode};
use clap::Args;
use colored::Colorize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Units of work per scheduling quantum (0 = finish in one quantum)
    #[arg(short, long, default_value = "2")]
    pub units_per_slice: usize,

    /// Directory holding arbor.config.json (defaults to current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print host tree snapshots as JSON instead of markup
    #[arg(long)]
    pub json: bool,
}

/// Renders the demo application twice: the initial version, then an edit
/// that changes text, swaps the click listener and drops the paragraph.
pub fn demo(args: DemoArgs, cwd: &Path) -> Result<()> {
    let config_dir = args.config.clone().unwrap_or_else(|| cwd.to_path_buf());
    let config = ReconcilerConfig::load(&config_dir)?;
    debug!(?config, "Loaded reconciler config");

    println!("{}", "🌳 Rendering demo application...".bright_blue().bold());

    let clicks = Rc::new(RefCell::new(Vec::new()));
    let app = app_component(Rc::clone(&clicks));

    let mut host = MemoryHost::new();
    let container = host.create_node("body");
    let mut scheduler = Scheduler::with_config(host, config);

    for version in 1..=2 {
        let element = create_element(
            app.clone(),
            props([("version", PropValue::from(version))]),
            Vec::<VNode>::new(),
        );
        scheduler.render(element, container);
        let (summary, quanta) = drive(&mut scheduler, args.units_per_slice)?;

        println!();
        println!(
            "{} v{} committed in {} quanta: {} placements, {} updates, {} deletions",
            "✓".green(),
            version,
            quanta,
            summary.placements,
            summary.updates,
            summary.deletions
        );
        print_tree(scheduler.host(), container, args.json)?;

        let Some(&root) = scheduler.host().children(container).first() else {
            bail!("Demo application rendered nothing into the container");
        };
        scheduler.host().dispatch(root, "click");
    }

    println!();
    for line in clicks.borrow().iter() {
        println!("  {} {}", "⚡".yellow(), line);
    }

    Ok(())
}

fn app_component(clicks: Rc<RefCell<Vec<String>>>) -> Component {
    let v1_click = {
        let clicks = Rc::clone(&clicks);
        Listener::new(move |event| clicks.borrow_mut().push(format!("v1 handled {}", event.name)))
    };
    let v2_click = {
        let clicks = Rc::clone(&clicks);
        Listener::new(move |event| clicks.borrow_mut().push(format!("v2 handled {}", event.name)))
    };

    Component::new("App", move |app_props: &Props| {
        let version = app_props
            .get("version")
            .cloned()
            .unwrap_or(PropValue::Number(1.0));
        let first = version == PropValue::Number(1.0);

        let listener = if first { &v1_click } else { &v2_click };
        let mut children = vec![Child::from(create_element(
            "a",
            props([
                ("href", PropValue::from("https://github.com/lbwa/how-react-works")),
                ("target", PropValue::from("_blank")),
                ("rel", PropValue::from("noopener noreferrer")),
            ]),
            [if first { "github repo" } else { "github repository" }],
        ))];
        if first {
            children.push(Child::from(create_element("p", None, ["paragraph element"])));
        }

        Ok(create_element(
            "div",
            props([
                ("className", PropValue::from(format!("jsx-application v{}", version))),
                ("onclick", PropValue::from(listener.clone())),
            ]),
            children,
        ))
    })
}

fn drive(
    scheduler: &mut Scheduler<MemoryHost>,
    units_per_slice: usize,
) -> Result<(CommitSummary, usize)> {
    let mut quanta = 0;
    loop {
        quanta += 1;
        let status = if units_per_slice == 0 {
            scheduler.flush()?
        } else {
            scheduler.drive_work_loop(&UnitBudget::new(units_per_slice))?
        };
        match status {
            WorkStatus::Committed(summary) => return Ok((summary, quanta)),
            WorkStatus::Yielded { performed } => debug!(quantum = quanta, performed, "Yielded"),
            WorkStatus::Idle => bail!("Nothing was scheduled"),
        }
    }
}

fn print_tree(host: &MemoryHost, container: NodeId, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&host.snapshot(container))?);
    } else {
        println!("  {}", host.inner_markup(container).bright_white());
    }
    Ok(())
}
