use chrono::Utc;
use uuid::Uuid;

use recite::passage::PassageDraft;
use recite::store::{CsvStore, PassageRepository};
use recite::{Error, Result, classify, tracker};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage();
        std::process::exit(1);
    }

    let (opts, rest) = parse_options(&args[2..]);
    let outcome = match args[1].as_str() {
        "add" => cmd_add(&opts, &rest),
        "import" => cmd_import(&opts, &rest),
        "due" => cmd_due(&opts),
        "review" => cmd_review(&opts, &rest),
        "list" => cmd_list(&opts),
        "delete" => cmd_delete(&opts, &rest),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn usage() {
    eprintln!("Usage: recite <command> [args...] [-d DIR] [-u OWNER]");
    eprintln!("Commands:");
    eprintln!("  add <prompt> <reference> <text>   Add a passage");
    eprintln!("  import <file.json>                Import passages with backfilled history");
    eprintln!("  due                               Show passages due for review, by tier");
    eprintln!("  review <id>                       Mark a passage reviewed now");
    eprintln!("  list                              List passages with tier and history");
    eprintln!("  delete <id>                       Delete a passage and its history");
    eprintln!("Options:");
    eprintln!("  -d DIR     data directory (default ./recite-data)");
    eprintln!("  -u OWNER   owner name (default \"local\")");
}

struct Options {
    dir: String,
    owner: String,
}

fn parse_options(args: &[String]) -> (Options, Vec<String>) {
    let mut dir = "recite-data".to_string();
    let mut owner = "local".to_string();
    let mut rest = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "-d" && i + 1 < args.len() {
            dir = args[i + 1].clone();
            i += 2;
        } else if args[i] == "-u" && i + 1 < args.len() {
            owner = args[i + 1].clone();
            i += 2;
        } else {
            rest.push(args[i].clone());
            i += 1;
        }
    }
    (Options { dir, owner }, rest)
}

fn parse_passage_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::InvalidInput(format!("invalid passage id {s:?}: {e}")))
}

fn cmd_add(opts: &Options, rest: &[String]) -> Result<()> {
    if rest.len() != 3 {
        eprintln!("Usage: recite add <prompt> <reference> <text>");
        std::process::exit(1);
    }
    let mut store = CsvStore::open(&opts.dir)?;
    let draft = PassageDraft {
        prompt: rest[0].clone(),
        reference: rest[1].clone(),
        text: rest[2].clone(),
    };
    let passage = tracker::add_passage(&mut store, &opts.owner, draft, Utc::now())?;
    println!("Added {} ({})", passage.reference, passage.id);
    Ok(())
}

fn cmd_import(opts: &Options, rest: &[String]) -> Result<()> {
    if rest.len() != 1 {
        eprintln!("Usage: recite import <file.json>");
        std::process::exit(1);
    }
    let data = std::fs::read_to_string(&rest[0])?;
    let drafts: Vec<PassageDraft> = serde_json::from_str(&data)?;
    let mut store = CsvStore::open(&opts.dir)?;
    let created = tracker::import_passages(&mut store, &opts.owner, drafts, Utc::now())?;
    println!("Imported {} passages.", created.len());
    Ok(())
}

fn cmd_due(opts: &Options) -> Result<()> {
    let store = CsvStore::open(&opts.dir)?;
    let queues = tracker::review_queues(&store, &opts.owner, Utc::now())?;
    if queues.is_empty() {
        println!("Nothing due for review.");
        return Ok(());
    }
    for (label, queue) in [
        ("Daily", &queues.daily),
        ("Weekly", &queues.weekly),
        ("Monthly", &queues.monthly),
        ("Yearly", &queues.yearly),
    ] {
        if queue.is_empty() {
            continue;
        }
        println!("{} ({}):", label, queue.len());
        for p in queue {
            println!("  {}  {} — {}", p.passage.id, p.passage.reference, p.passage.prompt);
        }
    }
    Ok(())
}

fn cmd_review(opts: &Options, rest: &[String]) -> Result<()> {
    if rest.len() != 1 {
        eprintln!("Usage: recite review <id>");
        std::process::exit(1);
    }
    let id = parse_passage_id(&rest[0])?;
    let mut store = CsvStore::open(&opts.dir)?;
    tracker::record_review(&mut store, id, Utc::now())?;
    if let Some(p) = store.get(id)? {
        println!("Recorded review of {}.", p.reference);
    }
    Ok(())
}

fn cmd_list(opts: &Options) -> Result<()> {
    let store = CsvStore::open(&opts.dir)?;
    let now = Utc::now();
    let passages = store.passages_for_owner(&opts.owner)?;
    if passages.is_empty() {
        println!("No passages.");
        return Ok(());
    }
    for p in &passages {
        let c = classify::classify(p.reviews.len(), p.last_review(), now)?;
        let marker = if c.due { " (due)" } else { "" };
        println!(
            "{}  {}  {} reviews, {}{}",
            p.passage.id,
            p.passage.reference,
            p.reviews.len(),
            c.tier.label(),
            marker
        );
    }
    Ok(())
}

fn cmd_delete(opts: &Options, rest: &[String]) -> Result<()> {
    if rest.len() != 1 {
        eprintln!("Usage: recite delete <id>");
        std::process::exit(1);
    }
    let id = parse_passage_id(&rest[0])?;
    let mut store = CsvStore::open(&opts.dir)?;
    store.delete(id)?;
    println!("Deleted passage {id} and its review history.");
    Ok(())
}
