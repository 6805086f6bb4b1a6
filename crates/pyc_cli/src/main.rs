use pyc_runtime::{OrDie, Runtime, RuntimeConfig};
use tracing_subscriber::EnvFilter;

mod programs;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const USAGE: &str = "Usage: pyc <program> [args]";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_usage() {
    eprintln!("{USAGE}");
    eprintln!();
    eprintln!("Programs:");
    for p in programs::PROGRAMS {
        eprintln!("  {:<14}{}", p.name, p.about);
    }
}

fn main() {
    init_tracing();
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(name) = argv.first() else {
        print_usage();
        std::process::exit(2);
    };
    if name == "--list" {
        for p in programs::PROGRAMS {
            println!("{}", p.name);
        }
        return;
    }
    let Some(program) = programs::find(name) else {
        eprintln!("Unknown program: {name}");
        print_usage();
        std::process::exit(2);
    };

    let mut rt = match Runtime::with_config(RuntimeConfig::from_env()) {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}", e.message());
            std::process::exit(1);
        }
    };
    let ctx = rt.new_context(None, program.slots).or_die(&mut rt);
    rt.init_context(ctx, &argv).or_die(&mut rt);
    tracing::debug!(program = program.name, "running");
    (program.run)(&mut rt, ctx).or_die(&mut rt);

    let stats = rt.gc_stats();
    tracing::debug!(
        collections = stats.collections,
        total_marked = stats.total_marked,
        "finished"
    );
    if let Err(e) = rt.flush_output() {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("stdout error: {e}");
            std::process::exit(2);
        }
    }
}
