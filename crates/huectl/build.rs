use std::fs;
use std::path::Path;

use clap::CommandFactory;

// cli.rs keeps to clap + clap_complete (both build-dependencies), so the
// command tree can be included here without compiling the rest of the
// crate.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR not set by Cargo");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");

    // Walk the command tree with a worklist, emitting one page per
    // command: huectl.1, huectl-light.1, huectl-light-set.1, ...
    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let name = cmd.get_name().to_owned();
        write_man_page(&cmd, &man_dir.join(format!("{name}.1")));

        for sub in cmd.get_subcommands() {
            pending.push(sub.clone().name(format!("{name}-{}", sub.get_name())));
        }
    }
}

fn write_man_page(cmd: &clap::Command, path: &Path) {
    let mut page = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut page)
        .unwrap_or_else(|e| panic!("failed to render {}: {e}", path.display()));
    fs::write(path, page)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}
