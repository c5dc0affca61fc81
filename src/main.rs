use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dsviz::{
    parse_sequence, ArrayModel, BstModel, Document, InorderLayout, LayoutConfig, LinkedListModel,
    MergeTreeBuilder, Persist, Sequence, StackModel, StructureKind, SubtreeWidthLayout,
    TreeLayout, TreeLayoutStrategy, TreeSnapshot, Value,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dsviz", about = "Build, trace and lay out visualised data structures")]
struct Cli {
    /// Log mutations and trace steps to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a merge tree (greedy two-lightest merge) and print its replay trace.
    MergeTree {
        /// Weights, separated by commas or whitespace.
        #[arg(required = true)]
        weights: Vec<String>,
        /// Save the process as a document.
        #[arg(long)]
        save: Option<PathBuf>,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Build a binary search tree, optionally find/delete a key, and lay it out.
    Bst {
        /// Keys inserted in order.
        #[arg(required = true)]
        values: Vec<String>,
        /// Key to search for after building.
        #[arg(long)]
        find: Option<String>,
        /// Key to delete after building.
        #[arg(long)]
        delete: Option<String>,
        /// Save the resulting tree as a document.
        #[arg(long)]
        save: Option<PathBuf>,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Build an array (or linked list) and apply positional edits.
    Sequence {
        /// Initial values.
        values: Vec<String>,
        /// Use the linked-list backing.
        #[arg(long)]
        linked: bool,
        /// Insert `INDEX=VALUE` (repeatable, applied in order).
        #[arg(long, value_name = "INDEX=VALUE")]
        insert: Vec<String>,
        /// Delete the element at INDEX (repeatable, applied after inserts).
        #[arg(long, value_name = "INDEX")]
        delete: Vec<usize>,
        /// Save the result as a document.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Push values onto a stack, then pop some.
    Stack {
        /// Values pushed bottom to top.
        values: Vec<String>,
        /// Number of pops.
        #[arg(long, default_value_t = 0)]
        pop: usize,
        /// Save the result as a document.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Lay out the tree stored in a saved bst or merge_tree document.
    Layout {
        /// Document path.
        document: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Reserve a width per subtree.
    Subtree,
    /// One column per node in in-order sequence.
    Inorder,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Layout strategy.
    #[arg(long, value_enum, default_value_t = Strategy::Subtree)]
    strategy: Strategy,
    /// Gap between sibling subtrees.
    #[arg(long, default_value_t = 90.0)]
    h_gap: f64,
    /// Distance between rows.
    #[arg(long, default_value_t = 130.0)]
    v_gap: f64,
    /// Node box width.
    #[arg(long, default_value_t = 70.0)]
    node_diameter: f64,
    /// Offset of a lone child from its parent.
    #[arg(long, default_value_t = 60.0)]
    min_offset: f64,
}

impl LayoutArgs {
    fn run(&self, snapshot: &TreeSnapshot) -> Result<TreeLayout> {
        let engine: Box<dyn TreeLayoutStrategy> = match self.strategy {
            Strategy::Subtree => Box::new(SubtreeWidthLayout::new(
                LayoutConfig::default()
                    .with_horizontal_gap(self.h_gap)
                    .with_vertical_gap(self.v_gap)
                    .with_node_diameter(self.node_diameter)
                    .with_min_horizontal_offset(self.min_offset),
            )),
            Strategy::Inorder => Box::new(InorderLayout::default()),
        };
        engine
            .layout(snapshot)
            .with_context(|| format!("{} layout failed", engine.name()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::MergeTree {
            weights,
            save,
            layout,
        } => run_merge_tree(&weights, save, &layout, cli.json)?,
        Commands::Bst {
            values,
            find,
            delete,
            save,
            layout,
        } => run_bst(&values, find, delete, save, &layout, cli.json)?,
        Commands::Sequence {
            values,
            linked,
            insert,
            delete,
            save,
        } => {
            if linked {
                run_sequence(LinkedListModel::new(), &values, &insert, &delete, save, cli.json)?
            } else {
                run_sequence(ArrayModel::new(), &values, &insert, &delete, save, cli.json)?
            }
        }
        Commands::Stack { values, pop, save } => run_stack(&values, pop, save, cli.json)?,
        Commands::Layout { document, layout } => run_layout(document, &layout, cli.json)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_all(raw: &[String]) -> Vec<Value> {
    raw.iter().flat_map(|chunk| parse_sequence(chunk)).collect()
}

fn parse_one(raw: &str) -> Result<Value> {
    let mut values = parse_sequence(raw);
    if values.len() != 1 {
        bail!("expected exactly one value, got '{}'", raw);
    }
    Ok(values.remove(0))
}

fn run_merge_tree(
    weights: &[String],
    save: Option<PathBuf>,
    layout_args: &LayoutArgs,
    json: bool,
) -> Result<()> {
    let values = parse_all(weights);
    let process = MergeTreeBuilder::new()
        .build_process(values)
        .context("merge tree build failed")?;

    if process.is_empty() {
        bail!("enter at least one positive weight");
    }

    let layout = layout_args.run(&process.final_tree)?;
    if let Some(path) = save {
        process
            .save_to(&path)
            .with_context(|| format!("failed to save process to {}", path.display()))?;
    }

    if json {
        let fingerprint = process.fingerprint()?;
        let out = serde_json::json!({
            "process": process,
            "layout": layout,
            "fingerprint": fingerprint,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let initial: Vec<String> = process
        .initial
        .iter()
        .map(|node| format!("#{}={}", node.id, node.value))
        .collect();
    println!("leaves\t{}", initial.join(" "));
    for (i, step) in process.sorting.iter().enumerate() {
        println!(
            "sort {}\tmove #{} {} -> {}\tbefore={:?}",
            i + 1,
            step.key_id,
            step.from_index,
            step.insert_index,
            step.array_before
        );
    }
    for (i, step) in process.building.iter().enumerate() {
        println!(
            "merge {}\t#{} + #{} -> {}",
            i + 1,
            step.left_id,
            step.right_id,
            step.parent
        );
    }
    if let Some(total) = process.total_weight() {
        println!("root weight\t{}", total);
    }
    print_layout(&layout);
    Ok(())
}

fn run_bst(
    values: &[String],
    find: Option<String>,
    delete: Option<String>,
    save: Option<PathBuf>,
    layout_args: &LayoutArgs,
    json: bool,
) -> Result<()> {
    let mut bst = BstModel::new();
    bst.create_from_sequence(parse_all(values))
        .context("failed to build tree")?;

    let found = find
        .map(|raw| -> Result<_> { Ok(bst.find(parse_one(&raw)?)?) })
        .transpose()?;
    let deleted = delete
        .map(|raw| -> Result<_> { Ok(bst.delete(parse_one(&raw)?)?) })
        .transpose()?;

    let snapshot = bst.snapshot();
    let layout = layout_args.run(&snapshot)?;
    if let Some(path) = save {
        bst.save_to(&path)
            .with_context(|| format!("failed to save tree to {}", path.display()))?;
    }

    if json {
        let out = serde_json::json!({
            "tree": snapshot,
            "layout": layout,
            "find": found.as_ref().map(|o| serde_json::json!({"found": o.found, "path": o.path})),
            "delete": deleted.as_ref().map(|o| serde_json::json!({"removed": o.found, "path": o.path})),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if let Some(outcome) = found {
        match outcome.found {
            Some(id) => println!("find\tfound #{}\tpath={:?}", id, outcome.path),
            None => println!("find\tnot found\tpath={:?}", outcome.path),
        }
    }
    if let Some(outcome) = deleted {
        match outcome.found {
            Some(id) => println!("delete\tremoved #{}\tpath={:?}", id, outcome.path),
            None => println!("delete\tnot found\tpath={:?}", outcome.path),
        }
    }
    println!("nodes\t{}\theight={}", bst.len(), bst.height());
    print_layout(&layout);
    Ok(())
}

fn run_sequence<S>(
    mut model: S,
    values: &[String],
    inserts: &[String],
    deletes: &[usize],
    save: Option<PathBuf>,
    json: bool,
) -> Result<()>
where
    S: Sequence + Persist,
{
    model.create_from_sequence(parse_all(values));

    for edit in inserts {
        let (index, raw) = edit
            .split_once('=')
            .with_context(|| format!("insert '{}' is not INDEX=VALUE", edit))?;
        let index: usize = index
            .trim()
            .parse()
            .with_context(|| format!("invalid index in '{}'", edit))?;
        let id = model
            .insert(index, parse_one(raw)?)
            .with_context(|| format!("insert '{}' failed", edit))?;
        tracing::info!(id, index, "inserted");
    }
    for &index in deletes {
        let removed = model
            .delete(index)
            .with_context(|| format!("delete at {} failed", index))?;
        tracing::info!(id = removed.id, index, "deleted");
    }

    finish_sequence(S::KIND, &model.snapshot(), || model.to_document(), save, json)
}

fn run_stack(values: &[String], pops: usize, save: Option<PathBuf>, json: bool) -> Result<()> {
    let mut stack = StackModel::new();
    stack.create_from_sequence(parse_all(values));
    for _ in 0..pops {
        let cell = stack.pop().context("pop failed")?;
        if !json {
            println!("pop\t#{}={}", cell.id, cell.value);
        }
    }
    finish_sequence(
        StructureKind::Stack,
        &stack.snapshot(),
        || stack.to_document(),
        save,
        json,
    )
}

fn finish_sequence<F>(
    kind: StructureKind,
    cells: &[dsviz::Cell],
    document: F,
    save: Option<PathBuf>,
    json: bool,
) -> Result<()>
where
    F: FnOnce() -> Result<Document, dsviz::PersistError>,
{
    let doc = document().context("failed to capture document")?;
    if let Some(path) = save {
        std::fs::write(&path, doc.to_json_pretty()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if json {
        println!("{}", doc.to_json_pretty()?);
        return Ok(());
    }

    let rendered: Vec<String> = cells
        .iter()
        .map(|cell| format!("#{}={}", cell.id, cell.value))
        .collect();
    println!("{}\t[{}]", kind, rendered.join(", "));
    Ok(())
}

fn run_layout(path: PathBuf, layout_args: &LayoutArgs, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc = Document::from_json(&text).context("failed to parse document")?;
    let kind = doc.kind()?;
    if !kind.is_tree() {
        bail!("{} documents hold no tree to lay out", kind);
    }
    let snapshot = doc.tree_nodes()?;
    let layout = layout_args.run(&snapshot)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print_layout(&layout);
    }
    Ok(())
}

fn print_layout(layout: &TreeLayout) {
    for (id, point) in layout.iter() {
        println!("#{}\tx={:.1}\ty={:.1}", id, point.x, point.y);
    }
}
